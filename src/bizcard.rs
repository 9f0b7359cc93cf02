// 🪪 Business Card - Profile plus a toggleable portfolio

use serde::Serialize;

use crate::config::CardConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    pub blurb: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BizCard {
    pub name: String,
    pub title: String,
    pub handle: String,
    projects: Vec<Project>,
    portfolio_visible: bool,
}

impl Default for BizCard {
    fn default() -> Self {
        Self::new(&CardConfig::default())
    }
}

impl BizCard {
    pub fn new(config: &CardConfig) -> Self {
        let projects = config
            .projects
            .iter()
            .map(|name| Project {
                name: name.clone(),
                blurb: config.project_blurb.clone(),
            })
            .collect();

        Self {
            name: config.name.clone(),
            title: config.title.clone(),
            handle: config.handle.clone(),
            projects,
            portfolio_visible: false,
        }
    }

    /// Portfolio button: show the project list, or hide it again
    pub fn toggle_portfolio(&mut self) -> bool {
        self.portfolio_visible = !self.portfolio_visible;
        log::debug!("Portfolio visible: {}", self.portfolio_visible);
        self.portfolio_visible
    }

    pub fn portfolio_visible(&self) -> bool {
        self.portfolio_visible
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Projects currently on screen (empty while the portfolio is hidden)
    pub fn visible_projects(&self) -> &[Project] {
        if self.portfolio_visible {
            self.projects.as_slice()
        } else {
            &[]
        }
    }

    /// "Name: ..." line as shown on the card
    pub fn name_line(&self) -> String {
        format!("Name: {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let card = BizCard::default();
        assert_eq!(card.name_line(), "Name: Mai, Guang-Ting");
        assert_eq!(card.handle, "@themilesCompose");
        assert_eq!(card.projects().len(), 6);
        assert_eq!(
            card.projects()[5],
            Project {
                name: "Project 6".to_string(),
                blurb: "A great Project".to_string(),
            }
        );
    }

    #[test]
    fn test_portfolio_toggle() {
        let mut card = BizCard::default();
        assert!(!card.portfolio_visible());
        assert!(card.visible_projects().is_empty());

        assert!(card.toggle_portfolio());
        assert_eq!(card.visible_projects().len(), 6);

        assert!(!card.toggle_portfolio());
        assert!(card.visible_projects().is_empty());
    }

    #[test]
    fn test_project_order_preserved() {
        let config = CardConfig {
            projects: vec!["Zeta".to_string(), "Alpha".to_string()],
            ..CardConfig::default()
        };
        let card = BizCard::new(&config);
        let names: Vec<&str> = card.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }
}
