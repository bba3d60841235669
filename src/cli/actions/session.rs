//! Session commands. Each one starts a browser context over the persisted
//! session file and drives the pages the way a user would, so the route
//! guard and the `401` handling behave exactly as they do interactively.

use crate::{
    app_lib::{AppConfig, ExecutionContext, FileStorage, LOGIN_PATH},
    components::{AlertKind, View},
    routes::{CHANGE_PASSWORD_PATH, REGISTER_PATH},
    Browser,
};
use anyhow::{anyhow, bail, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

#[derive(Debug)]
pub enum Command {
    Register {
        email: String,
        password: SecretString,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Whoami,
    ChangePassword {
        current_password: SecretString,
        new_password: SecretString,
    },
}

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub command: Command,
}

/// Execute a session command.
/// # Errors
/// Returns an error if the page reports one, the session cannot be persisted,
/// or the API ends the session.
pub async fn execute(args: Args) -> Result<()> {
    debug!(storage = %args.config.storage_path.display(), "opening session");

    let storage = FileStorage::new(args.config.storage_path.clone());
    let mut browser = Browser::new(args.config, ExecutionContext::browser(storage))?;

    match args.command {
        Command::Register { email, password } => register(&mut browser, &email, &password).await,
        Command::Login { email, password } => login(&mut browser, &email, &password).await,
        Command::Logout => logout(&browser),
        Command::Whoami => whoami(&mut browser).await,
        Command::ChangePassword {
            current_password,
            new_password,
        } => change_password(&mut browser, &current_password, &new_password).await,
    }
}

async fn register(browser: &mut Browser, email: &str, password: &SecretString) -> Result<()> {
    browser.goto(REGISTER_PATH).await?;
    browser.fill("Email", email)?;
    browser.fill("Password", password.expose_secret())?;
    browser.fill("Confirm password", password.expose_secret())?;
    browser.click("Register").await?;

    check_alerts(&browser.view())?;
    if browser.url() != LOGIN_PATH {
        bail!("Registration did not complete");
    }

    println!("Account created for {email}; log in to continue.");
    Ok(())
}

async fn login(browser: &mut Browser, email: &str, password: &SecretString) -> Result<()> {
    browser.goto(LOGIN_PATH).await?;
    browser.fill("Email", email)?;
    browser.fill("Password", password.expose_secret())?;
    browser.click("Log in").await?;

    let view = browser.view();
    check_alerts(&view)?;
    if !browser.session().is_authenticated() {
        bail!("Login did not complete");
    }

    info!("session persisted");
    println!("{view}");
    Ok(())
}

fn logout(browser: &Browser) -> Result<()> {
    if !browser.session().is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    browser.auth().logout()?;
    println!("Logged out.");
    Ok(())
}

async fn whoami(browser: &mut Browser) -> Result<()> {
    if !browser.session().is_authenticated() {
        bail!("Not logged in");
    }

    browser.goto("/").await?;

    if browser.url() == LOGIN_PATH {
        bail!("Session expired; log in again");
    }

    let view = browser.view();
    check_alerts(&view)?;
    println!("{view}");
    Ok(())
}

async fn change_password(
    browser: &mut Browser,
    current_password: &SecretString,
    new_password: &SecretString,
) -> Result<()> {
    browser.goto(CHANGE_PASSWORD_PATH).await?;
    if browser.url() != CHANGE_PASSWORD_PATH {
        bail!("Not logged in");
    }

    browser.fill("Current password", current_password.expose_secret())?;
    browser.fill("New password", new_password.expose_secret())?;
    browser.fill("Confirm new password", new_password.expose_secret())?;
    browser.click("Change password").await?;

    if browser.url() == LOGIN_PATH {
        bail!("Session expired; log in again");
    }
    check_alerts(&browser.view())?;

    println!("Password changed.");
    Ok(())
}

/// Fails with the first error alert on the page.
fn check_alerts(view: &View) -> Result<()> {
    match view
        .alerts
        .iter()
        .find(|alert| alert.kind == AlertKind::Error)
    {
        Some(alert) => Err(anyhow!(alert.message.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Alert;

    #[test]
    fn check_alerts_reports_first_error() {
        let view = View::new("Login")
            .alert(Some(Alert::info("Welcome")))
            .alert(Some(Alert::error("Incorrect email or password")));
        let err = check_alerts(&view).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");

        assert!(check_alerts(&View::new("Home")).is_ok());
    }

    #[tokio::test]
    async fn logout_without_session_is_a_no_op() {
        let path = crate::app_lib::storage::tests::TempPath::new();
        let config = AppConfig::default()
            .with_api_base_url("http://127.0.0.1:9")
            .with_storage_path(path.0.clone());

        let result = execute(Args {
            config,
            command: Command::Logout,
        })
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn whoami_requires_session() {
        let path = crate::app_lib::storage::tests::TempPath::new();
        let config = AppConfig::default()
            .with_api_base_url("http://127.0.0.1:9")
            .with_storage_path(path.0.clone());

        let err = execute(Args {
            config,
            command: Command::Whoami,
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Not logged in");
    }

    #[tokio::test]
    async fn change_password_requires_session() {
        let path = crate::app_lib::storage::tests::TempPath::new();
        let config = AppConfig::default()
            .with_api_base_url("http://127.0.0.1:9")
            .with_storage_path(path.0.clone());

        let err = execute(Args {
            config,
            command: Command::ChangePassword {
                current_password: SecretString::from("Password@123"),
                new_password: SecretString::from("Password@456"),
            },
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Not logged in");
    }
}
