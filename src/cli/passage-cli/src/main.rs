//! Passage CLI - Command line interface.
//!
//! Runs the browser-context helpers against a cookie jar seeded from the
//! command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use passage_cookies::BrowserCookies;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "passage")]
#[command(about = "Nubster Passage CLI - Inspect the current session")]
#[command(version)]
struct Cli {
    /// Cookies to load, as a `Cookie` header value (`name=value; other=value`)
    #[arg(long, env = "PASSAGE_COOKIE")]
    cookie: Option<String>,

    /// Print the cookie jar after the command (picks up refreshed sessions)
    #[arg(long)]
    show_cookies: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current user
    Whoami {
        /// Output format (json, id)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Check whether a session is present
    Status,
}

// ============================================================================
// Command Handlers
// ============================================================================

async fn cmd_whoami(format: &str) -> Result<()> {
    let user = passage_session::get_current_user()
        .await
        .context("Failed to fetch current user")?;

    let Some(user) = user else {
        println!("Not signed in");
        return Ok(());
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&user)?),
        "id" => println!("{}", user.id),
        _ => anyhow::bail!("Unknown format: {}. Use 'json' or 'id'", format),
    }

    Ok(())
}

async fn cmd_status() -> Result<()> {
    let authenticated = passage_session::is_authenticated()
        .await
        .context("Failed to check session")?;

    if authenticated {
        println!("Signed in");
    } else {
        println!("Not signed in");
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let jar = BrowserCookies::shared();

    if let Some(cookie) = &cli.cookie {
        jar.load_cookie_header(cookie);
    }

    match cli.command {
        Commands::Whoami { format } => cmd_whoami(&format).await?,
        Commands::Status => cmd_status().await?,
    }

    if cli.show_cookies {
        println!("Cookie: {}", jar.cookie_header());
    }

    Ok(())
}
