//! BudgetIt CLI - weekly budgeting with AI insights
//!
//! Usage:
//!   budgetit signin --email E --password P   Sign in (session is remembered)
//!   budgetit expenses add -a 250 -c food     Record an expense
//!   budgetit budgets set -c food -a 2000     Set a weekly budget
//!   budgetit dashboard                       Totals, breakdown and insights
//!   budgetit chat "How to save more money?"  Ask the budget assistant

mod cli;
mod commands;


use anyhow::{Context, Result};
use budgetit_core::Config;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url);
    }

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
            user_type,
        } => commands::cmd_signup(&config, &name, &email, &password, user_type).await,
        Commands::Signin { email, password } => {
            commands::cmd_signin(&config, &email, &password).await
        }
        Commands::Logout => commands::cmd_logout(&config).await,
        Commands::Whoami => commands::cmd_whoami(&config).await,
        Commands::Expenses { action } => {
            let session = commands::require_session(&config).await?;
            match action {
                None => commands::cmd_expenses_list(session.api(), 20).await,
                Some(ExpensesAction::List { limit }) => {
                    commands::cmd_expenses_list(session.api(), limit).await
                }
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    description,
                    date,
                }) => {
                    commands::cmd_expenses_add(session.api(), amount, category, description, date)
                        .await
                }
            }
        }
        Commands::Budgets { action } => {
            let session = commands::require_session(&config).await?;
            match action {
                None | Some(BudgetsAction::List) => commands::cmd_budgets_list(session.api()).await,
                Some(BudgetsAction::Set {
                    category,
                    amount,
                    period,
                }) => commands::cmd_budgets_set(session.api(), category, amount, period).await,
            }
        }
        Commands::Goals { action } => {
            let session = commands::require_session(&config).await?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(session.api()).await,
                Some(GoalsAction::Add {
                    title,
                    target_amount,
                    target_date,
                }) => {
                    commands::cmd_goals_add(session.api(), &title, target_amount, target_date).await
                }
            }
        }
        Commands::Dashboard { no_notify, seed } => {
            let session = commands::require_session(&config).await?;
            let notify = if no_notify {
                None
            } else {
                Some(config.notification_duration)
            };
            commands::cmd_dashboard(session.api(), notify, seed).await
        }
        Commands::Insights { json } => {
            let session = commands::require_session(&config).await?;
            commands::cmd_insights(session.api(), json).await
        }
        Commands::Chat { message } => commands::cmd_chat(message.as_deref()).await,
    }
}
