//! Landing page. With a session it loads the current account, which also
//! revalidates the token: a rejected token ends the session on the spot.

use crate::{
    app::AppContext,
    app_lib::{AppError, LOGIN_PATH},
    components::{Alert, View},
    features::auth::{client, types::UserPublic},
};
use tracing::{debug, instrument};

const LOG_OUT: &str = "Log out";

#[derive(Debug, Default)]
pub struct HomePage {
    user: Option<UserPublic>,
    error: Option<AppError>,
}

impl HomePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip_all)]
    pub(super) async fn load(&mut self, ctx: &AppContext) {
        if !ctx.auth.current().is_authenticated() {
            return;
        }

        match client::read_current_user(&ctx.api).await {
            Ok(user) => self.user = Some(user),
            Err(err) => {
                debug!("failed to load current user: {err}");
                self.error = Some(err);
            }
        }
    }

    #[must_use]
    pub fn view(&self, ctx: &AppContext) -> View {
        let view = View::new("Home").heading("Super Impress");

        if !ctx.auth.current().is_authenticated() {
            return view
                .paragraph("You are not signed in.")
                .link("Log in", LOGIN_PATH)
                .link("Register", super::REGISTER_PATH);
        }

        let view = match &self.user {
            Some(user) => view.paragraph(format!("Signed in as {}", user.email)),
            None => view.paragraph("Signed in"),
        };

        view.alert(self.error.as_ref().map(|err| Alert::error(err.message())))
            .link("Change password", super::CHANGE_PASSWORD_PATH)
            .button(LOG_OUT)
    }

    pub(super) fn click(
        &mut self,
        ctx: &AppContext,
        label: &str,
    ) -> Result<Option<String>, AppError> {
        if label != LOG_OUT {
            return Ok(None);
        }

        self.user = None;
        ctx.auth.logout()?;
        Ok(Some(LOGIN_PATH.to_string()))
    }
}
