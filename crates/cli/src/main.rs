//! Vitrine CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vitrine-cli migrate
//!
//! # Create an account
//! vitrine-cli user create -e ana@example.com -p 'a long password'
//!
//! # Seed a published demo vitrine for that account
//! vitrine-cli seed demo -e ana@example.com -p 'a long password' --slug demo
//! ```
//!
//! Reads `VITRINE_DATABASE_URL` (or `DATABASE_URL`), loading `.env` if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed development data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create a published demo vitrine with products
    Demo {
        /// Email of an existing account
        #[arg(short, long)]
        email: String,

        /// Password of that account
        #[arg(short, long)]
        password: String,

        /// Slug of the demo vitrine
        #[arg(short, long, default_value = "demo")]
        slug: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, password } => {
                commands::user::create(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Demo {
                email,
                password,
                slug,
            } => commands::seed::demo(&email, &password, &slug).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_seed_defaults() {
        let cli = Cli::try_parse_from(["vitrine-cli", "seed", "demo", "-e", "a@b.co", "-p", "x"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Seed {
            target: SeedTarget::Demo { slug, .. },
        } = cli.command
        else {
            panic!("expected seed demo");
        };
        assert_eq!(slug, "demo");
    }
}
