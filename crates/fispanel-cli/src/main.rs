//! Fispanel CLI - terminal console for the receipt/license admin API
//!
//! # Quick Start
//!
//! ```bash
//! fispanel login -u admin
//! fispanel dashboard
//! fispanel licenses list
//! fispanel sessions list --license 5 --select 42
//! fispanel receipts export --start-date 2025-03-01 --end-date 2025-03-31
//! ```
//!
//! The login is kept in `<config dir>/fispanel/credentials.json` until
//! `fispanel logout`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::*;
use fispanel_client::DEFAULT_API_URL;
use fispanel_core::forms::DEFAULT_EXTEND_DAYS;
use fispanel_core::{DateRangeForm, SessionFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod context;
mod display;

use commands::{activities, auth, dashboard, licenses, receipts, sessions, users};
use context::Context;

/// Fispanel - receipt and license administration
#[derive(Parser)]
#[command(name = "fispanel")]
#[command(author = "Fispanel Contributors")]
#[command(version)]
#[command(about = "Administer licenses, devices, sessions and receipts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Admin API base URL
    #[arg(long, global = true, env = "FISPANEL_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Credentials file (defaults to the user config directory)
    #[arg(long, global = true, env = "FISPANEL_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the token
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "FISPANEL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored login
    Logout,

    /// Show the logged-in operator
    Whoami,

    /// Show stat cards and the last seven days
    Dashboard,

    /// Manage licenses
    Licenses {
        #[command(subcommand)]
        action: LicenseCommands,
    },

    /// Manage devices
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Browse and export receipts
    Receipts {
        #[command(subcommand)]
        action: ReceiptCommands,
    },

    /// Show the last 100 activities
    Activities,

    /// Browse sessions
    Sessions {
        #[command(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Subcommand)]
enum LicenseCommands {
    /// List all licenses
    List,

    /// Show one license in detail
    Show { id: i64 },

    /// Create a license
    Create {
        /// Company name
        #[arg(short, long)]
        company: String,

        /// Contact e-mail
        #[arg(long)]
        email: Option<String>,

        /// Contact phone
        #[arg(long)]
        phone: Option<String>,

        /// Validity in days
        #[arg(short, long, default_value = "365")]
        days: u32,

        /// Maximum number of devices
        #[arg(short, long, default_value = "1")]
        max_devices: u32,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a license
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Add days to a license
    Extend {
        id: i64,

        /// Days to add
        #[arg(short, long, default_value_t = DEFAULT_EXTEND_DAYS)]
        days: u32,
    },

    /// Suspend a license
    Suspend {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all devices
    List,

    /// Show one device in detail
    Show { id: i64 },

    /// Delete a device
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct RangeArgs {
    /// First day, YYYY-MM-DD
    #[arg(long)]
    start_date: Option<String>,

    /// Last day, YYYY-MM-DD
    #[arg(long)]
    end_date: Option<String>,
}

impl From<RangeArgs> for DateRangeForm {
    fn from(args: RangeArgs) -> Self {
        Self {
            start_date: args.start_date,
            end_date: args.end_date,
        }
    }
}

#[derive(Subcommand)]
enum ReceiptCommands {
    /// Show the first 100 receipts of a date range
    List {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Write a date range to CSV
    Export {
        #[command(flatten)]
        range: RangeArgs,

        /// Output file (defaults to fisler_<start>_<end>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List sessions, optionally filtered
    List {
        /// Only sessions of this license
        #[arg(long)]
        license: Option<i64>,

        /// Only sessions of this user
        #[arg(long)]
        user: Option<i64>,

        /// Also show this session in detail
        #[arg(long)]
        select: Option<i64>,
    },

    /// Show one session in detail
    Show { id: i64 },

    /// Write all receipts of a session to CSV
    Export {
        id: i64,

        /// Output file (defaults to oturum_<id>_fisler.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        display::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = Context::open(&cli.api_url, cli.credentials, cli.timeout)?;

    match cli.command {
        Commands::Login { username, password } => {
            print_banner();
            auth::login(&mut ctx, username, password).await?;
        }
        Commands::Logout => auth::logout(&mut ctx)?,
        Commands::Whoami => auth::whoami(&ctx)?,
        Commands::Dashboard => dashboard::show(&mut ctx).await?,

        Commands::Licenses { action } => match action {
            LicenseCommands::List => licenses::list(&mut ctx).await?,
            LicenseCommands::Show { id } => licenses::show(&mut ctx, id).await?,
            LicenseCommands::Create {
                company,
                email,
                phone,
                days,
                max_devices,
                notes,
            } => {
                let args = licenses::CreateArgs {
                    company_name: company,
                    contact_email: email,
                    contact_phone: phone,
                    days,
                    max_devices,
                    notes,
                };
                licenses::create(&mut ctx, args).await?;
            }
            LicenseCommands::Delete { id, yes } => licenses::delete(&mut ctx, id, yes).await?,
            LicenseCommands::Extend { id, days } => licenses::extend(&mut ctx, id, days).await?,
            LicenseCommands::Suspend { id, yes } => licenses::suspend(&mut ctx, id, yes).await?,
        },

        Commands::Users { action } => match action {
            UserCommands::List => users::list(&mut ctx).await?,
            UserCommands::Show { id } => users::show(&mut ctx, id).await?,
            UserCommands::Delete { id, yes } => users::delete(&mut ctx, id, yes).await?,
        },

        Commands::Receipts { action } => match action {
            ReceiptCommands::List { range } => receipts::list(&mut ctx, range.into()).await?,
            ReceiptCommands::Export { range, output } => {
                receipts::export(&mut ctx, range.into(), output).await?
            }
        },

        Commands::Activities => activities::list(&mut ctx).await?,

        Commands::Sessions { action } => match action {
            SessionCommands::List {
                license,
                user,
                select,
            } => {
                let filter = SessionFilter {
                    license_id: license,
                    user_id: user,
                };
                sessions::list(&mut ctx, filter, select).await?;
            }
            SessionCommands::Show { id } => sessions::show(&mut ctx, id).await?,
            SessionCommands::Export { id, output } => sessions::export(&mut ctx, id, output).await?,
        },
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", "╔══════════════════════════════════════════════╗".bright_cyan());
    println!(
        "{}{}{}",
        "║  ".bright_cyan(),
        "Fispanel".bright_white().bold(),
        " - Receipt & License Administration  ║".bright_cyan()
    );
    println!("{}", "╚══════════════════════════════════════════════╝".bright_cyan());
}
