use crate::{
    app::AppContext,
    app_lib::{AppError, HOME_PATH},
    components::{Alert, Field, Form, InputType, View},
    features::auth::client,
};
use tracing::{debug, instrument};

/// Login page: exchanges email and password for an access token and starts
/// the session.
#[derive(Debug)]
pub struct LoginPage {
    pub form: Form,
    error: Option<AppError>,
}

impl LoginPage {
    #[must_use]
    pub fn new() -> Self {
        let form = Form::new(
            "Log in to your account",
            vec![
                Field::new("email", "Email", InputType::Email).autocomplete("email"),
                Field::new("password", "Password", InputType::Password)
                    .autocomplete("current-password"),
            ],
            "Log in",
        );
        Self { form, error: None }
    }

    #[must_use]
    pub fn view(&self) -> View {
        View::new("Log in")
            .heading("Log in")
            .form(self.form.clone())
            .alert(self.error.as_ref().map(|err| Alert::error(err.message())))
            .link("Create an account", super::REGISTER_PATH)
    }

    #[instrument(skip_all)]
    pub(super) async fn submit(&mut self, ctx: &AppContext) -> Result<Option<String>, AppError> {
        self.error = None;

        let email = self.form.value("email").trim().to_string();
        let password = self.form.value("password").to_string();
        if email.is_empty() || password.trim().is_empty() {
            self.error = Some(AppError::Validation(
                "Email and password are required.".to_string(),
            ));
            return Ok(None);
        }

        match client::login_api(&ctx.api, &email, &password).await {
            Ok(token) => {
                ctx.auth.login(&token.access_token)?;
                debug!("login succeeded");
                Ok(Some(HOME_PATH.to_string()))
            }
            Err(err) => {
                debug!("login failed: {err}");
                self.form.clear_secrets();
                self.error = Some(err);
                Ok(None)
            }
        }
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}
