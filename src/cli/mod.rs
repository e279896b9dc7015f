pub mod cash;
pub mod check;
pub mod demo;
pub mod form;
pub mod notify;
pub mod period;
pub mod pl;
pub mod settings;
pub mod webhook;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::datekey::parse_date;
use crate::error::{AppError, Result};
use crate::grid::XlsxWorkbook;
use crate::line::{LineClient, Notifier, SendResult, StdoutNotifier};
use crate::settings::{default_settings_path, load_settings, shellexpand_path, Settings};

#[derive(Parser)]
#[command(
    name = "plnotify",
    version,
    about = "Send daily P&L and cash balance summaries from a workbook to a LINE group."
)]
pub struct Cli {
    /// Settings file (default: ~/.config/plnotify/settings.json)
    #[arg(long, global = true, env = "PLNOTIFY_CONFIG")]
    pub config: Option<PathBuf>,
    /// Workbook to read, overriding the saved setting
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,
    /// Print messages to stdout instead of sending them
    #[arg(long = "dry-run", global = true)]
    pub dry_run: bool,
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send the company-wide PL for one day (default: yesterday).
    Pl {
        /// Date to report: YYYY-MM-DD
        #[arg(long, conflicts_with = "base_date")]
        date: Option<String>,
        /// Use the base date stored in A1 of the PL sheet
        #[arg(long = "base-date")]
        base_date: bool,
        /// Scheduled run: log and exit quietly when there is no data
        #[arg(long)]
        scheduled: bool,
    },
    /// Send PL totals and daily averages for a period of up to 31 days.
    Period {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: String,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: String,
        /// Print the {success, error} result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send yesterday's actual cash balance against next month-end's budget.
    Cash {
        /// Treat this date as today: YYYY-MM-DD
        #[arg(long)]
        today: Option<String>,
        /// Scheduled run: log and exit quietly when there is no data
        #[arg(long)]
        scheduled: bool,
    },
    /// Send a free-form notification.
    Notify {
        /// Title line
        #[arg(long)]
        title: String,
        /// Message body
        #[arg(long)]
        message: String,
        /// Leading emoji (default: 📢)
        #[arg(long)]
        emoji: Option<String>,
        /// Append the configured user name as sender
        #[arg(long)]
        sender: bool,
        /// Append the current time
        #[arg(long)]
        timestamp: bool,
    },
    /// Send a form response row from a response sheet.
    Form {
        /// Response sheet name
        #[arg(long)]
        sheet: String,
        /// Row number (default: last row)
        #[arg(long)]
        row: Option<usize>,
    },
    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Verify the access token against the LINE API.
    Check,
    /// Process a LINE webhook body (file or stdin) and log group ids.
    Webhook {
        /// JSON body file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Render every report from built-in sample data without sending.
    Demo,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current configuration status.
    Show,
    /// Save one or more settings.
    Set {
        /// Channel access token
        #[arg(long, conflicts_with = "prompt_token")]
        token: Option<String>,
        /// Prompt for the channel access token without echo
        #[arg(long = "prompt-token")]
        prompt_token: bool,
        /// Recipient group id (C + 32 hex digits)
        #[arg(long = "group-id")]
        group_id: Option<String>,
        /// Path to the workbook
        #[arg(long = "workbook-path")]
        workbook_path: Option<String>,
        /// Name of the PL sheet
        #[arg(long = "pl-sheet")]
        pl_sheet: Option<String>,
        /// Sender name used by `notify --sender`
        #[arg(long = "user-name")]
        user_name: Option<String>,
        /// LINE API base URL
        #[arg(long = "api-base")]
        api_base: Option<String>,
        /// Directory for the webhook log
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
}

/// Settings and overrides resolved once per invocation.
pub struct Context {
    pub settings_path: PathBuf,
    pub settings: Settings,
    pub workbook: Option<PathBuf>,
    pub dry_run: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
        let settings = load_settings(&settings_path);
        Self {
            settings_path,
            settings,
            workbook: cli.workbook.clone(),
            dry_run: cli.dry_run,
        }
    }

    pub fn open_workbook(&self) -> Result<XlsxWorkbook> {
        let path = match (&self.workbook, &self.settings.workbook) {
            (Some(p), _) => p.clone(),
            (None, Some(p)) => PathBuf::from(shellexpand_path(p)),
            (None, None) => {
                return Err(AppError::Settings(
                    "no workbook configured. Pass --workbook or run `plnotify settings set --workbook-path`".into(),
                ))
            }
        };
        XlsxWorkbook::open(&path)
    }

    pub fn notifier(&self) -> Result<Box<dyn Notifier>> {
        if self.dry_run {
            return Ok(Box::new(StdoutNotifier));
        }
        Ok(Box::new(LineClient::new(self.settings.line_config()?)?))
    }

    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| AppError::Other(format!("unreadable date '{raw}' (expected YYYY-MM-DD)")))
}

/// Send `text` and report the outcome on the terminal.
pub(crate) fn deliver(ctx: &Context, text: &str, what: &str) -> Result<()> {
    let result: SendResult = ctx.notifier()?.send(text);
    if ctx.dry_run {
        return result.into_result();
    }
    if result.success {
        println!("{} {what}", "✅ Sent".green().bold());
    }
    result.into_result()
}
