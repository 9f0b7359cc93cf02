use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use tutorial_apps::{
    format_currency, format_percent, AppConfig, BillForm, BizCard, MoneyCounter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Tip,
    Counter,
    Card,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Tip => Page::Counter,
            Page::Counter => Page::Card,
            Page::Card => Page::Tip,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Tip => Page::Card,
            Page::Counter => Page::Tip,
            Page::Card => Page::Counter,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Tip => "Tip Calculator",
            Page::Counter => "Tap Counter",
            Page::Card => "Business Card",
        }
    }
}

pub struct App {
    pub bill_form: BillForm,
    pub counter: MoneyCounter,
    pub card: BizCard,
    pub current_page: Page,
    pub projects_state: TableState,
}

impl App {
    pub fn new(config: &AppConfig, page: Page) -> Self {
        let card = BizCard::new(&config.card);
        let mut projects_state = TableState::default();
        if !card.projects().is_empty() {
            projects_state.select(Some(0));
        }

        Self {
            bill_form: BillForm::new(&config.tip),
            counter: MoneyCounter::new(&config.counter),
            card,
            current_page: page,
            projects_state,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn next_project(&mut self) {
        let len = self.card.visible_projects().len();
        if len == 0 {
            return;
        }
        let i = match self.projects_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.projects_state.select(Some(i));
    }

    pub fn previous_project(&mut self) {
        let len = self.card.visible_projects().len();
        if len == 0 {
            return;
        }
        let i = match self.projects_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.projects_state.select(Some(i));
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            _ => match self.current_page {
                Page::Tip => self.handle_tip_key(key.code),
                Page::Counter => self.handle_counter_key(key.code),
                Page::Card => self.handle_card_key(key.code),
            },
        }
        false
    }

    fn handle_tip_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.bill_form.push_char(c);
            }
            KeyCode::Backspace => self.bill_form.pop_char(),
            KeyCode::Delete => self.bill_form.clear(),
            // Split and tip controls only show up once a bill is entered
            KeyCode::Char('+') | KeyCode::Up if self.bill_form.is_valid() => {
                self.bill_form.increment_split()
            }
            KeyCode::Char('-') | KeyCode::Down if self.bill_form.is_valid() => {
                self.bill_form.decrement_split()
            }
            KeyCode::Right if self.bill_form.is_valid() => self.bill_form.step_slider_up(),
            KeyCode::Left if self.bill_form.is_valid() => self.bill_form.step_slider_down(),
            _ => {}
        }
    }

    fn handle_counter_key(&mut self, code: KeyCode) {
        if let KeyCode::Char(' ') | KeyCode::Enter = code {
            self.counter.tap();
        }
    }

    fn handle_card_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char('p') => {
                self.card.toggle_portfolio();
                self.projects_state.select(Some(0));
            }
            KeyCode::Down | KeyCode::Char('j') => self.next_project(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_project(),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, event::read);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Surface the loop's error only after the terminal is usable again
    res.context("Terminal UI failed")
}

fn run_app<B, E>(terminal: &mut Terminal<B>, app: &mut App, mut next_event: E) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    E: FnMut() -> io::Result<Event>,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = next_event()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Tip => render_tip_page(f, chunks[1], app),
        Page::Counter => render_counter_page(f, chunks[1], app),
        Page::Card => render_card_page(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Tip, Page::Counter, Page::Card];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

// ============================================================================
// TIP CALCULATOR
// ============================================================================

fn render_tip_page(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.bill_form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Total per person
            Constraint::Length(3), // Bill input
            Constraint::Min(0),    // Split / tip controls
        ])
        .split(area);

    let total = Paragraph::new(vec![
        Line::from(Span::styled("Total Per Person", Style::default().fg(Color::White))),
        Line::from(Span::styled(
            format_currency(form.total_per_person()),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(total, chunks[0]);

    let input_style = if form.last_error().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("$ ", Style::default().fg(Color::DarkGray)),
        Span::styled(form.bill_text(), input_style),
        Span::styled("_", Style::default().fg(Color::DarkGray).add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Enter Bill "));
    f.render_widget(input, chunks[1]);

    if !form.is_valid() {
        return;
    }

    let controls = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Split
            Constraint::Length(1), // Tip
            Constraint::Length(1), // Percent
            Constraint::Length(1), // Slider
            Constraint::Min(0),    // Error
        ])
        .margin(1)
        .split(chunks[2]);

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let split = Paragraph::new(Line::from(vec![
        Span::styled("Split   ", label),
        Span::styled("[-] ", key),
        Span::raw(form.split_by().to_string()),
        Span::styled(" [+]", key),
    ]));
    f.render_widget(split, controls[0]);

    let tip = Paragraph::new(Line::from(vec![
        Span::styled("Tip     ", label),
        Span::raw(format_currency(form.tip_amount())),
    ]));
    f.render_widget(tip, controls[1]);

    let percent = Paragraph::new(format_percent(form.tip_percent())).alignment(Alignment::Center);
    f.render_widget(percent, controls[2]);

    let slider = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .ratio(form.slider_position().clamp(0.0, 1.0) as f64)
        .label("");
    f.render_widget(slider, controls[3]);

    if let Some(err) = form.last_error() {
        let error = Paragraph::new(Span::styled(err, Style::default().fg(Color::Red)));
        f.render_widget(error, controls[4]);
    }
}

// ============================================================================
// TAP COUNTER
// ============================================================================

fn render_counter_page(f: &mut Frame, area: Rect, app: &App) {
    let counter = &app.counter;

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            counter.display(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("  ╭────────────╮  ", Style::default().fg(Color::Magenta))),
        Line::from(vec![
            Span::styled("  │", Style::default().fg(Color::Magenta)),
            Span::styled(format!("{:^12}", counter.label()), Style::default().fg(Color::White)),
            Span::styled("│  ", Style::default().fg(Color::Magenta)),
        ]),
        Line::from(Span::styled("  ╰────────────╯  ", Style::default().fg(Color::Magenta))),
    ];

    if counter.is_rich() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            "You are rich!",
            Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
        )));
    }

    let panel = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Tap Counter "));

    f.render_widget(panel, area);
}

// ============================================================================
// BUSINESS CARD
// ============================================================================

fn render_card_page(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let card = &app.card;
    let button_style = if card.portfolio_visible() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White).bg(Color::Blue)
    };

    let profile = Paragraph::new(vec![
        Line::from(Span::styled(
            card.name_line(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(card.title.as_str()),
        Line::from(Span::styled(card.handle.as_str(), Style::default().fg(Color::DarkGray))),
        Line::from("─────────────────────────"),
        Line::from(Span::styled(" Portfolio ", button_style)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(" Business Card "),
    );
    f.render_widget(profile, chunks[0]);

    if !card.portfolio_visible() {
        return;
    }

    let rows: Vec<Row> = card
        .visible_projects()
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(p.blurb.clone()).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(24), Constraint::Min(10)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray))
                .title(" Projects "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[1], &mut app.projects_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);

    let mut status_spans = vec![];
    match app.current_page {
        Page::Tip => {
            status_spans.push(Span::styled("0-9 .", key));
            status_spans.push(Span::raw(" Bill | "));
            status_spans.push(Span::styled("+/-", key));
            status_spans.push(Span::raw(" Split | "));
            status_spans.push(Span::styled("←/→", key));
            status_spans.push(Span::raw(" Tip | "));
        }
        Page::Counter => {
            status_spans.push(Span::styled("Space", key));
            status_spans.push(Span::raw(" Tap | "));
        }
        Page::Card => {
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" Portfolio | "));
            status_spans.push(Span::styled("↑/↓", key));
            status_spans.push(Span::raw(" Nav | "));
        }
    }
    status_spans.push(Span::styled("Tab", key));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("q", key));
    status_spans.push(Span::raw(" Quit"));

    let status = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_page_cycle() {
        let mut app = App::new(&AppConfig::default(), Page::Tip);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Counter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Tip);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_page, Page::Card);
    }

    #[test]
    fn test_tip_keys_drive_form() {
        let mut app = App::new(&AppConfig::default(), Page::Tip);

        // Controls are inert until a bill is entered
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.bill_form.split_by(), 1);

        type_str(&mut app, "120");
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);

        assert_eq!(app.bill_form.split_by(), 3);
        assert_eq!(app.bill_form.tip_percent(), 50);
        assert_eq!(app.bill_form.total_per_person(), 60.0);

        let text = screen_text(&mut app);
        assert!(text.contains("Total Per Person"));
        assert!(text.contains("$60.00"));
        assert!(text.contains("50 %"));
    }

    #[test]
    fn test_counter_page_taps() {
        let mut app = App::new(&AppConfig::default(), Page::Counter);
        for _ in 0..11 {
            press(&mut app, KeyCode::Char(' '));
        }
        assert_eq!(app.counter.value(), 11);

        let text = screen_text(&mut app);
        assert!(text.contains("$11"));
        assert!(text.contains("You are rich!"));
    }

    #[test]
    fn test_card_portfolio_navigation() {
        let mut app = App::new(&AppConfig::default(), Page::Card);
        assert!(!screen_text(&mut app).contains("A great Project"));

        press(&mut app, KeyCode::Enter);
        assert!(app.card.portfolio_visible());
        press(&mut app, KeyCode::Up);
        assert_eq!(app.projects_state.selected(), Some(5));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.projects_state.selected(), Some(0));

        let text = screen_text(&mut app);
        assert!(text.contains("Project 1"));
        assert!(text.contains("A great Project"));
    }

    #[test]
    fn test_event_error_ends_loop_with_error() {
        let mut app = App::new(&AppConfig::default(), Page::Tip);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        let mut events = vec![
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed")),
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE))),
        ];
        let res = run_app(&mut terminal, &mut app, || events.pop().unwrap());

        let err = res.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(app.bill_form.bill_text(), "5");
    }

    #[test]
    fn test_event_loop_quits_cleanly() {
        let mut app = App::new(&AppConfig::default(), Page::Counter);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        let mut events = vec![
            Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)),
        ];
        let res = run_app(&mut terminal, &mut app, || Ok(events.pop().unwrap()));

        assert!(res.is_ok());
        assert_eq!(app.counter.value(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(&AppConfig::default(), Page::Counter);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Esc));
        assert!(!press(&mut app, KeyCode::Enter));
    }
}
