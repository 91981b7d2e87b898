//! Longeviva CLI - Admin account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin interactively
//! lv-cli admin create
//!
//! # Create an admin without prompts
//! lv-cli admin create "Mario Rossi" mario@longeviva.it "password123"
//!
//! # Delete an admin
//! lv-cli admin delete
//!
//! # List admins
//! lv-cli admin list
//! ```
//!
//! # Commands
//!
//! - `admin create` - Create an admin account
//! - `admin delete` - Delete an admin account after confirmation
//! - `admin list` - List admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use longeviva_admin::services::AdminAccountService;
use tracing_subscriber::EnvFilter;

use commands::admin::create::{CreateMode, CreateOptions};
use commands::admin::{AdminCommandError, connect};
use console::{Console, StdinPrompt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "lv-cli")]
#[command(author, version, about = "Longeviva admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin (interactive without arguments)
    Create {
        /// Name, email and password; omit all three for interactive mode
        #[arg(value_names = ["NAME", "EMAIL", "PASSWORD"])]
        args: Vec<String>,

        /// Print the password in the final receipt
        #[arg(long)]
        show_password: bool,

        /// Delete the new identity again if a later step fails
        #[arg(long)]
        compensate: bool,
    },
    /// Delete an admin after confirmation
    Delete,
    /// List admin accounts
    List,
}

fn init_tracing() {
    // Reports go to stdout; logs stay on stderr and quiet by default
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let mut prompt = StdinPrompt;
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut console = Console::new(&mut prompt, &mut stdout, &mut stderr);

    let result = match cli.command {
        Commands::Admin { action } => run_admin(action, &mut console).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            let _ = writeln!(console.err, "❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_admin(
    action: AdminAction,
    console: &mut Console<'_>,
) -> Result<ExitCode, AdminCommandError> {
    match action {
        AdminAction::Create {
            args,
            show_password,
            compensate,
        } => {
            let mode = match CreateMode::from_args(&args) {
                Ok(mode) => mode,
                Err(given) => {
                    commands::admin::create::print_usage(console, given)?;
                    return Ok(ExitCode::FAILURE);
                }
            };
            let clients = connect()?;
            let service = AdminAccountService::new(&clients.auth, &clients.firestore)
                .with_compensation(compensate);
            commands::admin::create::run(&service, mode, CreateOptions { show_password }, console)
                .await?;
        }
        AdminAction::Delete => {
            let clients = connect()?;
            let service = AdminAccountService::new(&clients.auth, &clients.firestore);
            commands::admin::delete::run(&service, console).await?;
        }
        AdminAction::List => {
            // Listing never fails the process
            match connect() {
                Ok(clients) => {
                    let service = AdminAccountService::new(&clients.auth, &clients.firestore);
                    commands::admin::list::run(&service, console).await?;
                }
                Err(e) => writeln!(console.err, "❌ Errore: {e}")?,
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
