//! Page table of the application. A path resolves to a [`Route`]; protected
//! routes run the auth guard before their page is built.

mod change_password;
mod home;
mod login;
mod not_found;
mod register;

pub use change_password::ChangePasswordPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use register::RegisterPage;

use crate::{
    app::AppContext,
    app_lib::{AppError, LOGIN_PATH},
    components::View,
    features::auth::{require_auth, GuardOutcome, Session},
};

pub const CHANGE_PASSWORD_PATH: &str = "/change-password";
pub const REGISTER_PATH: &str = "/register";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    ChangePassword,
    NotFound,
}

impl Route {
    /// Resolves a location, ignoring query string, fragment and a trailing slash.
    #[must_use]
    pub fn resolve(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match path {
            "" | "/" => Self::Home,
            LOGIN_PATH => Self::Login,
            REGISTER_PATH => Self::Register,
            CHANGE_PASSWORD_PATH => Self::ChangePassword,
            _ => Self::NotFound,
        }
    }

    /// Routes that need an authenticated session.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::ChangePassword)
    }

    /// Pre-render check for this route.
    #[must_use]
    pub fn guard(self, session: &Session) -> GuardOutcome {
        if self.is_protected() {
            require_auth(session)
        } else {
            GuardOutcome::Render
        }
    }
}

/// The page currently mounted in a browser context.
#[derive(Debug)]
pub enum Screen {
    Home(HomePage),
    Login(LoginPage),
    Register(RegisterPage),
    ChangePassword(ChangePasswordPage),
    NotFound(NotFoundPage),
}

impl Screen {
    #[must_use]
    pub fn new(route: Route) -> Self {
        match route {
            Route::Home => Self::Home(HomePage::new()),
            Route::Login => Self::Login(LoginPage::new()),
            Route::Register => Self::Register(RegisterPage::new()),
            Route::ChangePassword => Self::ChangePassword(ChangePasswordPage::new()),
            Route::NotFound => Self::NotFound(NotFoundPage),
        }
    }

    /// Runs the page's data loading after it is mounted.
    pub async fn load(&mut self, ctx: &AppContext) {
        if let Self::Home(page) = self {
            page.load(ctx).await;
        }
    }

    #[must_use]
    pub fn view(&self, ctx: &AppContext) -> View {
        match self {
            Self::Home(page) => page.view(ctx),
            Self::Login(page) => page.view(),
            Self::Register(page) => page.view(),
            Self::ChangePassword(page) => page.view(),
            Self::NotFound(page) => page.view(),
        }
    }

    /// Types into the field with the given label.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` when the page has no such field.
    pub fn fill(&mut self, label: &str, value: &str) -> Result<(), AppError> {
        match self {
            Self::Login(page) => page.form.fill(label, value),
            Self::Register(page) => page.form.fill(label, value),
            Self::ChangePassword(page) => page.form.fill(label, value),
            Self::Home(_) | Self::NotFound(_) => Err(no_such("field", label)),
        }
    }

    /// Clicks the button with the given label and returns where to navigate next.
    ///
    /// Submission failures are shown on the page, not returned.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` when the page has no such button, and
    /// storage errors raised while starting or ending the session.
    pub async fn click(
        &mut self,
        ctx: &AppContext,
        label: &str,
    ) -> Result<Option<String>, AppError> {
        match self {
            Self::Login(page) if page.form.submit.label == label => page.submit(ctx).await,
            Self::Register(page) if page.form.submit.label == label => page.submit(ctx).await,
            Self::ChangePassword(page) if page.form.submit.label == label => {
                page.submit(ctx).await
            }
            Self::Home(page) if page.view(ctx).has_button(label) => page.click(ctx, label),
            _ => Err(no_such("button", label)),
        }
    }
}

fn no_such(kind: &str, label: &str) -> AppError {
    AppError::Navigation(format!("No {kind} labelled \"{label}\" on this page"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn resolve_normalizes_locations() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("/login?next=/"), Route::Login);
        assert_eq!(Route::resolve("/register/"), Route::Register);
        assert_eq!(Route::resolve("/change-password#form"), Route::ChangePassword);
        assert_eq!(Route::resolve("/admin"), Route::NotFound);
    }

    #[test]
    fn only_change_password_is_guarded() {
        let anonymous = Session::anonymous();
        for route in [Route::Home, Route::Login, Route::Register, Route::NotFound] {
            assert_eq!(route.guard(&anonymous), GuardOutcome::Render);
        }

        assert_eq!(
            Route::ChangePassword.guard(&anonymous),
            GuardOutcome::Redirect {
                status: StatusCode::FOUND,
                location: "/login".to_string(),
            }
        );
        assert_eq!(
            Route::ChangePassword.guard(&Session::with_token("abc")),
            GuardOutcome::Render
        );
    }
}
