mod aggregate;
mod cli;
mod datekey;
mod error;
mod fmt;
mod grid;
mod line;
mod messages;
mod models;
mod reports;
mod scanner;
mod settings;
mod sheets;
mod webhook;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Context, SettingsCommands};
use error::{AppError, Result};

fn init_logging(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let ctx = Context::from_cli(&cli);
    let result = match cli.command {
        Commands::Pl {
            date,
            base_date,
            scheduled,
        } => cli::pl::run(&ctx, date, base_date, scheduled),
        Commands::Period {
            from_date,
            to_date,
            json,
        } => cli::period::run(&ctx, &from_date, &to_date, json),
        Commands::Cash { today, scheduled } => cli::cash::run(&ctx, today, scheduled),
        Commands::Notify {
            title,
            message,
            emoji,
            sender,
            timestamp,
        } => cli::notify::run(&ctx, &title, &message, emoji, sender, timestamp),
        Commands::Form { sheet, row } => cli::form::run(&ctx, &sheet, row),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => cli::settings::show(&ctx),
            SettingsCommands::Set {
                token,
                prompt_token,
                group_id,
                workbook_path,
                pl_sheet,
                user_name,
                api_base,
                data_dir,
            } => cli::settings::set(
                &ctx,
                token,
                prompt_token,
                group_id,
                workbook_path,
                pl_sheet,
                user_name,
                api_base,
                data_dir,
            ),
        },
        Commands::Check => cli::check::run(&ctx),
        Commands::Webhook { file } => cli::webhook::run(&ctx, file),
        Commands::Demo => cli::demo::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
