// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

// Use library instead of local modules
use tutorial_apps::{format_currency, AppConfig, BillForm, BillInput, TipResult};

#[derive(Parser)]
#[command(name = "tutorial-apps", version, about = "Tip calculator, tap counter and business card")]
struct Cli {
    /// Path to config.toml (defaults to the user config dir, then ./tutorial-apps.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the terminal UI (default)
    Ui {
        /// Screen to start on
        #[arg(long, value_enum, default_value_t = PageArg::Tip)]
        page: PageArg,
    },
    /// Compute tip and per-person total once and print it
    Calc {
        /// Bill amount, e.g. 84.20
        amount: String,

        /// Number of people sharing the bill
        #[arg(short, long, default_value_t = 1)]
        split: u32,

        /// Tip percent (0-100)
        #[arg(short, long, default_value_t = 0)]
        tip: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PageArg {
    Tip,
    Counter,
    Card,
}

#[derive(Serialize)]
struct CalcOutput {
    input: BillInput,
    result: TipResult,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Command::Ui { .. }));
    init_logging(interactive);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        None => run_ui_mode(&config, PageArg::Tip)?,
        Some(Command::Ui { page }) => run_ui_mode(&config, page)?,
        Some(Command::Calc { amount, split, tip, json }) => run_calc(&amount, split, tip, json)?,
        Some(Command::Config) => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

/// Log to stderr. The TUI owns the terminal, so it only logs when RUST_LOG
/// asks for it explicitly.
fn init_logging(interactive: bool) {
    if interactive && std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn run_calc(amount: &str, split: u32, tip: u32, json: bool) -> Result<()> {
    let mut form = BillForm::default();
    form.set_bill_text(amount);
    let bill = form.parse_bill()?;

    let input = BillInput::validated(bill, split, tip)?;
    let result = input.compute();
    log::info!("Calculated {:?} -> {:?}", input, result);

    if json {
        let output = CalcOutput { input, result };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("🧾 Bill:             {}", format_currency(input.amount));
    println!("👥 Split:            {}", input.split_count);
    println!("💁 Tip:              {} ({}%)", format_currency(result.tip_amount), input.tip_percent);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("💰 Total Per Person: {}", format_currency(result.per_person_amount));

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig, page: PageArg) -> Result<()> {
    let page = match page {
        PageArg::Tip => ui::Page::Tip,
        PageArg::Counter => ui::Page::Counter,
        PageArg::Card => ui::Page::Card,
    };

    let mut app = ui::App::new(config, page);
    ui::run_ui(&mut app)?;

    println!("✅ UI closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig, _page: PageArg) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use one-shot mode: tutorial-apps calc <amount> --split N --tip P");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_calc() {
        let args = ["tutorial-apps", "calc", "100", "-s", "4", "--tip", "10"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Command::Calc { amount, split, tip, json }) => {
                assert_eq!(amount, "100");
                assert_eq!(split, 4);
                assert_eq!(tip, 10);
                assert!(!json);
            }
            _ => panic!("expected calc subcommand"),
        }
    }

    #[test]
    fn test_cli_defaults_to_ui() {
        let cli = Cli::try_parse_from(["tutorial-apps", "--config", "x.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));

        let cli = Cli::try_parse_from(["tutorial-apps", "ui", "--page", "card"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Ui { page: PageArg::Card })));
    }

    #[test]
    fn test_calc_rejects_bad_input() {
        assert!(run_calc("abc", 1, 10, false).is_err());
        assert!(run_calc("100", 0, 10, false).is_err());
        assert!(run_calc("100", 1, 150, false).is_err());
        assert!(run_calc("100", 4, 10, true).is_ok());
    }
}
