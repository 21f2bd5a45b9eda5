mod bot;
mod doctor;

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use crate::core::config::{BotConfig, DEFAULT_CONFIG_FILE};
use crate::core::terminal::{self, print_error};

fn print_help() {
    terminal::print_banner();

    println!(" {}", style("Commands").bold().underlined());
    terminal::print_usage_line("run", "Start the bot and the daily digest (default)");
    terminal::print_usage_line("pin-now", "Publish and pin the digest once, then exit");
    terminal::print_usage_line("doctor", "Check configuration and spreadsheet access");
    terminal::print_usage_line("help", "Show this message");

    println!(
        "\n {} {} [command] [--config <path>]",
        style("Usage:").bold(),
        style("relbot").green()
    );
    println!(
        " Config defaults to ./{}; environment variables override it.\n",
        DEFAULT_CONFIG_FILE
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CliArgs {
    pub command: String,
    pub config: Option<PathBuf>,
}

/// `args[0]` is the binary name. The first bare word is the command.
pub(crate) fn parse_cli_args(args: &[String]) -> CliArgs {
    let mut command: Option<String> = None;
    let mut config = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--help" | "-h" => {
                command = Some("help".to_string());
                i += 1;
            }
            other => {
                if command.is_none() {
                    command = Some(other.to_string());
                }
                i += 1;
            }
        }
    }
    CliArgs {
        command: command.unwrap_or_else(|| "run".to_string()),
        config,
    }
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let parsed = parse_cli_args(&args);

    match parsed.command.as_str() {
        "help" => {
            print_help();
            Ok(())
        }
        "run" => {
            let config = BotConfig::load(parsed.config.as_deref()).await?;
            crate::logging::init(&config.log_level);
            bot::run_bot(config).await
        }
        "pin-now" => {
            let config = BotConfig::load(parsed.config.as_deref()).await?;
            crate::logging::init(&config.log_level);
            bot::pin_now(config).await
        }
        "doctor" => {
            let config = BotConfig::load(parsed.config.as_deref()).await?;
            doctor::run_doctor(&config).await
        }
        other => {
            print_error(&format!("Unknown command: {}", other));
            print_help();
            Ok(())
        }
    }
}
