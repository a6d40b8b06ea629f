use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use portana_api::services::{
    AccountServiceTrait, PnlServiceTrait, PortfolioServiceTrait, PositionServiceTrait,
    PriceServiceTrait, UserServiceTrait,
};
use portana_api::{CredentialStore, FileCredentialStore, PortanaServices, User};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all users
    Users,
    /// Positions aggregated per symbol
    Positions { user_id: Option<String> },
    /// Positions grouped by account
    PositionsByAccount { user_id: Option<String> },
    /// Daily portfolio value
    Portfolio { user_id: Option<String> },
    /// Trailing-window returns
    RollingReturns { user_id: Option<String> },
    RealizedPnl { user_id: Option<String> },
    UnrealizedPnl { user_id: Option<String> },
    /// Daily analytics snapshots
    Metrics { user_id: Option<String> },
    /// Latest price per symbol
    Prices,
    /// List brokerage accounts
    Accounts,
    /// Positions held in one account
    AccountPositions { account_id: String },
    /// Every position row
    AllPositions,
    /// Store a user and bearer token for later calls
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored user
    Logout,
    /// Show the stored user
    Whoami,
}

/// Per-user commands default to the signed-in user.
fn resolve_user(explicit: Option<String>, store: &FileCredentialStore) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    store
        .current_user_id()
        .context("Failed to read stored credentials")?
        .context("No user id given and nobody is logged in (run `portana login`)")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(
    command: Command,
    services: &PortanaServices,
    store: &FileCredentialStore,
) -> Result<()> {
    match command {
        Command::Users => print_json(&services.users.get_all_users().await?),
        Command::Positions { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.positions.get_position_summaries(&user_id).await?)
        }
        Command::PositionsByAccount { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.positions.get_positions_by_account(&user_id).await?)
        }
        Command::Portfolio { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.portfolio.get_portfolio_summaries(&user_id).await?)
        }
        Command::RollingReturns { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.portfolio.get_rolling_returns(&user_id).await?)
        }
        Command::RealizedPnl { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.pnl.get_realized_pnl(&user_id).await?)
        }
        Command::UnrealizedPnl { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.pnl.get_unrealized_pnl(&user_id).await?)
        }
        Command::Metrics { user_id } => {
            let user_id = resolve_user(user_id, store)?;
            print_json(&services.portfolio.get_portfolio_metrics(&user_id).await?)
        }
        Command::Prices => print_json(&services.prices.get_prices().await?),
        Command::Accounts => print_json(&services.accounts.get_accounts().await?),
        Command::AccountPositions { account_id } => {
            print_json(&services.accounts.get_account_positions(&account_id).await?)
        }
        Command::AllPositions => print_json(&services.accounts.get_all_positions().await?),
        Command::Login {
            user_id,
            token,
            name,
            email,
        } => {
            let user = User {
                id: user_id,
                name,
                email,
                token: Some(token),
            };
            store
                .set_user(user)
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            tracing::info!("Credentials saved to {}", store.path().display());
            Ok(())
        }
        Command::Logout => {
            store
                .clear_user()
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            tracing::info!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = store
                .current_user()
                .context("Failed to read stored credentials")?
                .map(|u| User { token: None, ..u });
            print_json(&user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_user_wins_over_stored_user() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("c.json"), None).unwrap();
        store.set_user(User::new("stored").with_token("t")).unwrap();

        assert_eq!(resolve_user(Some("7".into()), &store).unwrap(), "7");
        assert_eq!(resolve_user(None, &store).unwrap(), "stored");
    }

    #[test]
    fn missing_user_is_an_error() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("c.json"), None).unwrap();
        assert!(resolve_user(None, &store).is_err());
    }
}
