mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod notifier;
mod services;
mod workflow;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::notify::{self, NotifyCommandArgs};
use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "triage-notifier",
    author,
    version,
    about = "Forwards new helpdesk tickets to a triage service"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a ticket in a local store and run it through triage.
    Notify(NotifyArgs),
    /// Manage notifier configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct NotifyArgs {
    /// Ticket identifier.
    #[arg(long)]
    id: u64,
    #[arg(long)]
    subject: Option<String>,
    /// Last message of the ticket.
    #[arg(long)]
    body: Option<String>,
    /// The ticket was opened by a staff member.
    #[arg(long)]
    staff: bool,
    /// Network origin tag of the creating request (e.g. the X-VLAN header).
    #[arg(long)]
    origin: Option<String>,
    /// JSON file standing in for the helpdesk ticket table.
    #[arg(long, default_value = "tickets.json")]
    store: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Notify(args) => run_notify(args).await,
    }
}

async fn run_notify(args: NotifyArgs) -> AppResult<()> {
    let config = AppConfig::load()?;
    let id = args.id;

    let status = notify::run(
        config,
        NotifyCommandArgs {
            id: args.id,
            subject: args.subject,
            body: args.body,
            staff: args.staff,
            origin: args.origin,
            store: args.store,
        },
    )
    .await?;

    println!("Ticket {id} is {status}.");
    Ok(())
}
