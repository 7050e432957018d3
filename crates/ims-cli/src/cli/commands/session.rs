//! `ims login|logout|session`.

use anyhow::Result;
use ims_core::config::ImsConfig;
use ims_core::session::SessionStore;

use super::api_client;

pub async fn run_login(cfg: &ImsConfig, email: &str, password: &str) -> Result<()> {
    let api = api_client(cfg)?;
    api.login(email, password).await?;
    println!("Logged in as {email}.");
    Ok(())
}

pub fn run_logout(cfg: &ImsConfig) -> Result<()> {
    api_client(cfg)?.logout()?;
    println!("Logged out.");
    Ok(())
}

pub fn run_session() -> Result<()> {
    let store = SessionStore::open_default()?;
    let session = store.current()?;
    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    let who = session
        .user
        .as_ref()
        .and_then(|u| u.get("email"))
        .and_then(|e| e.as_str())
        .unwrap_or("unknown user");
    println!("Logged in as {who}.");
    println!(
        "Refresh token: {}",
        if session.refresh_token.is_some() { "present" } else { "none" }
    );
    if let Some(path) = store.storage().path() {
        println!("Session file: {}", path.display());
    }
    Ok(())
}
