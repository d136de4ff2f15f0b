//! Account command implementations (signup, signin, logout, whoami)

use anyhow::{bail, Context, Result};
use budgetit_core::{ApiClient, Config, Session, SessionStore, SignupRequest, UserType};

/// Resume the stored session (anonymous if there is none or it expired)
pub async fn open_session(config: &Config) -> Session {
    let api = ApiClient::new(&config.api_url);
    let store = SessionStore::new(config.session_path());
    Session::restore(api, store).await
}

/// Resume the stored session, failing if nobody is signed in
pub async fn require_session(config: &Config) -> Result<Session> {
    let session = open_session(config).await;
    if !session.is_authenticated() {
        bail!("Not signed in. Run 'budgetit signin' first.");
    }
    Ok(session)
}

fn anonymous_session(config: &Config) -> Session {
    Session::anonymous(
        ApiClient::new(&config.api_url),
        SessionStore::new(config.session_path()),
    )
}

pub async fn cmd_signup(
    config: &Config,
    name: &str,
    email: &str,
    password: &str,
    user_type: UserType,
) -> Result<()> {
    let mut session = anonymous_session(config);
    let request = SignupRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        user_type,
    };
    let user = session
        .signup(&request)
        .await
        .context("Failed to create account")?;

    println!("🎉 Welcome to BudgetIt, {}!", user.name);
    println!("   Signed in as {} ({})", user.email, user.user_type);
    Ok(())
}

pub async fn cmd_signin(config: &Config, email: &str, password: &str) -> Result<()> {
    let mut session = anonymous_session(config);
    let user = session
        .login(email, password)
        .await
        .context("Failed to sign in")?;

    println!("👋 Welcome back, {}!", user.name);
    Ok(())
}

pub async fn cmd_logout(config: &Config) -> Result<()> {
    let mut session = open_session(config).await;
    if !session.is_authenticated() {
        println!("Not signed in.");
        // Still drop any stale session file
        session.logout().await?;
        return Ok(());
    }
    session.logout().await.context("Failed to sign out")?;
    println!("✓ Signed out");
    Ok(())
}

pub async fn cmd_whoami(config: &Config) -> Result<()> {
    let session = open_session(config).await;
    match session.user() {
        Some(user) => {
            println!();
            println!("👤 {}", user.name);
            println!("   ─────────────────────────────");
            println!("   Email: {}", user.email);
            println!("   Type:  {}", user.user_type);
            println!("   Backend: {}", config.api_url);
        }
        None => {
            println!("Not signed in. Run 'budgetit signin' or 'budgetit signup'.");
        }
    }
    Ok(())
}
