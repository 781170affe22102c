//! Greenbasket CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! gb-cli migrate
//!
//! # Seed the database with a sample catalog
//! gb-cli seed
//!
//! # Create an admin user
//! gb-cli admin create -u admin -p changeit -n "Store Admin"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gb-cli")]
#[command(author, version, about = "Greenbasket CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a sample catalog
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Admin display name
        #[arg(short, long, default_value = "")]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                name,
            } => {
                commands::admin::create_user(&username, &password, &name).await?;
            }
        },
    }
    Ok(())
}
