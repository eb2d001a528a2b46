// CLI module for operator tasks that need direct database or secret access

pub mod issue_token;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::types::db::user::UserRole;

/// Staffdesk employee lifecycle backend
#[derive(Parser, Debug)]
#[command(name = "staffdesk")]
#[command(about = "Employee onboarding and KYC backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Run pending migrations on both databases and exit
    Migrate,

    /// Mint a bearer token for an operator or integration
    IssueToken {
        /// Subject recorded as the actor in audit events
        #[arg(long)]
        sub: String,

        /// admin, hr, manager or employee
        #[arg(long, value_parser = parse_role)]
        role: UserRole,

        #[arg(long, default_value_t = 60)]
        ttl_minutes: i64,
    },
}

impl Cli {
    /// Subcommand to run; `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    UserRole::parse(value).ok_or_else(|| format!("unknown role '{}'", value))
}
