//! authctl - token and permission tooling for the TON platform
//!
//! Mints and inspects tokens with the deployment's signing configuration and
//! prints the permission catalog and role table.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use ton_auth::auth::credentials::hash_password;
use ton_auth::auth::rbac::{all_permissions, default_roles_for};
use ton_auth::utils::{ErrorResponse, init_logging};
use ton_auth::{Config, TokenService};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "authctl", version, about = "Token and permission tooling")]
struct Cli {
    /// YAML configuration file; the environment is used when absent
    #[arg(long, short, env = "TON_AUTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mint an access/refresh pair
    Issue {
        #[arg(long)]
        user_id: u64,
        #[arg(long)]
        username: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        email: String,
    },
    /// Validate a token and print its claims
    Inspect { token: String },
    /// Exchange a refresh token for a new pair
    Refresh { token: String },
    /// Print every valid permission
    Catalog,
    /// Print the static permissions of a role
    Role { name: String },
    /// Print an Argon2 hash of a password
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env().context("loading configuration from the environment")?,
    };
    init_logging(config.logging())?;
    debug!(command = ?cli.command, "authctl starting");

    match cli.command {
        Command::Issue {
            user_id,
            username,
            role,
            email,
        } => {
            let tokens = TokenService::new(config.auth())?;
            let pair = tokens.issue_token_pair(user_id, &username, &role, &email)?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Command::Inspect { token } => {
            let tokens = TokenService::new(config.auth())?;
            match tokens.validate(&token) {
                Ok(claims) => println!("{}", serde_json::to_string_pretty(&claims)?),
                Err(e) => {
                    let body = ErrorResponse::from_auth_error(&e);
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Refresh { token } => {
            let tokens = TokenService::new(config.auth())?;
            let pair = tokens.refresh(&token)?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Command::Catalog => {
            for permission in all_permissions() {
                println!("{}", permission);
            }
        }
        Command::Role { name } => {
            let table = default_roles_for(&config.auth().rbac);
            if !table.contains_role(&name) {
                bail!(
                    "unknown role '{}'; known roles: {}",
                    name,
                    table.roles().join(", ")
                );
            }
            for permission in table.role_permissions(&name) {
                println!("{}", permission);
            }
        }
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
