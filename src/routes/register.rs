//! Registration page. Inputs are validated locally for early feedback; the
//! API remains the authority and its `detail` messages are shown verbatim.

use crate::{
    app::AppContext,
    app_lib::{AppError, LOGIN_PATH},
    components::{Alert, Field, Form, InputType, View},
    features::auth::{
        client,
        validation::{valid_email, valid_password, MIN_PASSWORD_LENGTH},
    },
};
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct RegisterPage {
    pub form: Form,
    error: Option<AppError>,
}

impl RegisterPage {
    #[must_use]
    pub fn new() -> Self {
        let form = Form::new(
            "Create your account",
            vec![
                Field::new("email", "Email", InputType::Email).autocomplete("email"),
                Field::new("password", "Password", InputType::Password)
                    .autocomplete("new-password"),
                Field::new("confirm_password", "Confirm password", InputType::Password)
                    .autocomplete("new-password"),
            ],
            "Register",
        );
        Self { form, error: None }
    }

    #[must_use]
    pub fn view(&self) -> View {
        View::new("Register")
            .heading("Create an account")
            .form(self.form.clone())
            .alert(self.error.as_ref().map(|err| Alert::error(err.message())))
            .link("Already have an account? Log in", LOGIN_PATH)
    }

    fn validate(&self) -> Result<(), AppError> {
        if let Some(label) = self.form.first_missing() {
            return Err(AppError::Validation(format!("{label} is required.")));
        }
        if !valid_email(self.form.value("email").trim()) {
            return Err(AppError::Validation(
                "Enter a valid email address.".to_string(),
            ));
        }
        if !valid_password(self.form.value("password")) {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters."
            )));
        }
        if self.form.value("password") != self.form.value("confirm_password") {
            return Err(AppError::Validation("Passwords do not match.".to_string()));
        }
        Ok(())
    }

    #[instrument(skip_all)]
    pub(super) async fn submit(&mut self, ctx: &AppContext) -> Result<Option<String>, AppError> {
        self.error = None;

        if let Err(err) = self.validate() {
            self.error = Some(err);
            return Ok(None);
        }

        let email = self.form.value("email").trim().to_string();
        match client::register_api(&ctx.api, &email, self.form.value("password")).await {
            Ok(user) => {
                debug!(user_id = %user.id, "account registered");
                Ok(Some(LOGIN_PATH.to_string()))
            }
            Err(err) => {
                self.form.clear_secrets();
                self.error = Some(err);
                Ok(None)
            }
        }
    }
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}
