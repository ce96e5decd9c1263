//! Auth command handlers.
//!
//! Commands that change the session build an [`AuthRuntime`], dispatch
//! intents and read the resulting state, the same way an interactive
//! front-end would. `status` only reads the store.

use std::io::{self, BufRead, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use cookbook_auth::{AuthAction, AuthRuntime, AuthState, Navigator, RouteHistory};
use cookbook_core::config::Config;
use cookbook_core::identity::{IdentityApi, IdentityClient};
use cookbook_core::session_store::{SessionStore, mask_token};
use cookbook_types::{AuthMode, Credentials, Session};

fn build_runtime(config: &Config) -> Result<AuthRuntime> {
    let identity =
        IdentityClient::new(config.identity.clone()).context("build identity client")?;
    let navigator = Arc::new(RouteHistory::new());
    Ok(AuthRuntime::new(
        Arc::new(identity) as Arc<dyn IdentityApi>,
        SessionStore::open_default(),
        navigator as Arc<dyn Navigator>,
    ))
}

/// Reads the stored session as auto-login would see it, without touching
/// the file or arming a timer.
fn stored_session(store: &SessionStore) -> Result<Option<Session>> {
    Ok(store
        .load()?
        .map(Session::from)
        .filter(Session::has_token))
}

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        return Ok(password);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("No password provided (use --password, COOKBOOK_PASSWORD or stdin)");
    }
    Ok(password)
}

fn describe_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let left = expires_at - now;
    if left.num_seconds() <= 0 {
        format!("expired at {}", expires_at.to_rfc3339())
    } else {
        format!(
            "expires at {} ({} min left)",
            expires_at.to_rfc3339(),
            left.num_minutes()
        )
    }
}

pub async fn authenticate(
    config: &Config,
    mode: AuthMode,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let credentials = Credentials::new(email, read_password(password)?);
    let mut runtime = build_runtime(config)?;

    let action = match mode {
        AuthMode::Login => AuthAction::LoginStart(credentials),
        AuthMode::Signup => AuthAction::SignupStart(credentials),
    };
    runtime.dispatcher().dispatch(action);
    let state = runtime.run_until(|s| !s.loading).await;

    if let Some(error) = state.error {
        bail!(error);
    }
    let Some(session) = state.session else {
        bail!("Authentication finished without a session");
    };

    let verb = match mode {
        AuthMode::Login => "Logged in",
        AuthMode::Signup => "Signed up",
    };
    println!("{verb} as {}", session.email);
    println!("Session {}", describe_expiry(session.expires_at, Utc::now()));
    println!("Saved to {}", runtime.store().path().display());
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let mut runtime = build_runtime(config)?;
    let had_session = runtime.store().path().exists();

    runtime.dispatcher().dispatch(AuthAction::Logout);
    runtime.drain();

    if had_session {
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

/// Reports the stored session without resuming it, so an expired record
/// is shown rather than logged out.
pub fn status() -> Result<()> {
    let Some(session) = stored_session(&SessionStore::open_default())? else {
        println!("Not logged in");
        return Ok(());
    };

    println!("Logged in as {}", session.email);
    println!("User ID: {}", session.user_id);
    println!("Token: {}", mask_token(&session.token));
    println!("Session {}", describe_expiry(session.expires_at, Utc::now()));
    Ok(())
}

pub async fn watch(config: &Config) -> Result<()> {
    let mut runtime = build_runtime(config)?;

    let Some(session) = stored_session(runtime.store())? else {
        println!("Not logged in");
        return Ok(());
    };

    println!(
        "Watching session for {} ({})",
        session.email,
        describe_expiry(session.expires_at, Utc::now())
    );

    runtime.dispatcher().dispatch(AuthAction::AutoLogin);
    let watched = async {
        runtime.run_until(AuthState::is_authenticated).await;
        runtime.run_until(|s| !s.is_authenticated()).await
    };

    tokio::select! {
        _ = watched => {
            println!("Session expired; logged out.");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("listen for Ctrl+C")?;
            println!("Stopped watching.");
        }
    }
    Ok(())
}
