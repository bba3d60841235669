//! Change-password page, reachable only with an authenticated session (see
//! [`super::Route::is_protected`]). A successful change keeps the session and
//! returns to the home page.

use crate::{
    app::AppContext,
    app_lib::{AppError, HOME_PATH},
    components::{Alert, Field, Form, InputType, View},
    features::auth::{
        client,
        types::PasswordChange,
        validation::{valid_password, MIN_PASSWORD_LENGTH},
    },
};
use tracing::{info, instrument};

#[derive(Debug)]
pub struct ChangePasswordPage {
    pub form: Form,
    error: Option<AppError>,
}

impl ChangePasswordPage {
    #[must_use]
    pub fn new() -> Self {
        let form = Form::new(
            "Change your password",
            vec![
                Field::new("current_password", "Current password", InputType::Password)
                    .autocomplete("current-password"),
                Field::new("new_password", "New password", InputType::Password)
                    .autocomplete("new-password"),
                Field::new(
                    "confirm_new_password",
                    "Confirm new password",
                    InputType::Password,
                )
                .autocomplete("new-password"),
            ],
            "Change password",
        );
        Self { form, error: None }
    }

    #[must_use]
    pub fn view(&self) -> View {
        View::new("Change Password")
            .heading("Change Password")
            .form(self.form.clone())
            .alert(self.error.as_ref().map(|err| Alert::error(err.message())))
    }

    fn validate(&self) -> Result<PasswordChange, AppError> {
        if let Some(label) = self.form.first_missing() {
            return Err(AppError::Validation(format!("{label} is required.")));
        }

        let current = self.form.value("current_password");
        let new = self.form.value("new_password");
        if !valid_password(new) {
            return Err(AppError::Validation(format!(
                "New password must be at least {MIN_PASSWORD_LENGTH} characters."
            )));
        }
        if new != self.form.value("confirm_new_password") {
            return Err(AppError::Validation(
                "New passwords do not match.".to_string(),
            ));
        }
        if new == current {
            return Err(AppError::Validation(
                "New password must differ from the current password.".to_string(),
            ));
        }

        Ok(PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
        })
    }

    #[instrument(skip_all)]
    pub(super) async fn submit(&mut self, ctx: &AppContext) -> Result<Option<String>, AppError> {
        self.error = None;

        let request = match self.validate() {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err);
                return Ok(None);
            }
        };

        match client::change_password(&ctx.api, &request).await {
            Ok(()) => {
                info!("password changed");
                Ok(Some(HOME_PATH.to_string()))
            }
            Err(err) => {
                self.form.clear_secrets();
                self.error = Some(err);
                Ok(None)
            }
        }
    }
}

impl Default for ChangePasswordPage {
    fn default() -> Self {
        Self::new()
    }
}
