//! Headless browser shell. A [`Browser`] is one browser context: it owns the
//! session store (hydrated when the context starts), the navigation history,
//! and the API client with the auth interceptors registered. Pages are driven
//! the way a user drives them: go to a location, fill labelled fields, click
//! buttons.

use crate::{
    app_lib::{ApiClient, AppConfig, AppError, ExecutionContext, History},
    components::View,
    features::auth::{AuthStore, BearerAuth, GuardOutcome, Session, UnauthorizedGuard},
    routes::{Route, Screen},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Upper bound on guard redirects and forced navigations for one `goto`.
const MAX_REDIRECTS: usize = 5;
const BLANK: &str = "about:blank";

/// Services shared by the pages of one browser context.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub auth: AuthStore,
    pub api: ApiClient,
    pub history: Arc<History>,
}

impl AppContext {
    /// Hydrates the session and builds the API pipeline:
    /// bearer auth on the way out, `401` handling on the way in.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: AppConfig, execution: ExecutionContext) -> Result<Self, AppError> {
        let auth = AuthStore::new(execution);
        let history = Arc::new(History::new());

        let api = ApiClient::new(&config)?
            .with_request_interceptor(Arc::new(BearerAuth::new(auth.clone())))
            .with_response_interceptor(Arc::new(UnauthorizedGuard::new(
                auth.clone(),
                history.clone(),
            )));

        Ok(Self {
            config,
            auth,
            api,
            history,
        })
    }
}

pub struct Browser {
    ctx: AppContext,
    screen: Option<Screen>,
}

impl Browser {
    /// Starts a browser context. The session is hydrated before this returns,
    /// so the first route guard already sees the persisted token.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: AppConfig, execution: ExecutionContext) -> Result<Self, AppError> {
        Ok(Self {
            ctx: AppContext::new(config, execution)?,
            screen: None,
        })
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.ctx.auth
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.ctx.auth.current()
    }

    /// Current location.
    #[must_use]
    pub fn url(&self) -> String {
        self.ctx
            .history
            .current()
            .unwrap_or_else(|| BLANK.to_string())
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.screen
            .as_ref()
            .map_or_else(|| View::new(BLANK), |screen| screen.view(&self.ctx))
    }

    /// Navigates to `location`, following guard redirects and forced
    /// navigations raised while the page loads.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` after too many consecutive redirects.
    #[instrument(skip(self))]
    pub async fn goto(&mut self, location: &str) -> Result<(), AppError> {
        let mut target = location.to_string();

        for _ in 0..=MAX_REDIRECTS {
            let route = Route::resolve(&target);

            match route.guard(&self.ctx.auth.current()) {
                GuardOutcome::Redirect {
                    status,
                    location: next,
                } => {
                    debug!(%status, from = %target, to = %next, "route guard redirect");
                    target = next;
                }
                GuardOutcome::Render => {
                    self.ctx.history.commit(&target);
                    let mut screen = Screen::new(route);
                    screen.load(&self.ctx).await;
                    self.screen = Some(screen);

                    match self.take_forced_navigation() {
                        Some(next) => target = next,
                        None => return Ok(()),
                    }
                }
            }
        }

        Err(AppError::Navigation(format!(
            "Too many redirects while loading {location}"
        )))
    }

    /// Types `value` into the field labelled `label` on the current page.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` if no page is loaded or the label is unknown.
    pub fn fill(&mut self, label: &str, value: &str) -> Result<(), AppError> {
        self.screen
            .as_mut()
            .ok_or_else(|| AppError::Navigation("No page loaded".to_string()))?
            .fill(label, value)
    }

    /// Clicks the button labelled `label` and follows the resulting navigation.
    /// A forced navigation from the `401` handler wins over the page's own target.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` if no page is loaded or the label is
    /// unknown, and storage errors from starting or ending the session.
    #[instrument(skip(self))]
    pub async fn click(&mut self, label: &str) -> Result<(), AppError> {
        let screen = self
            .screen
            .as_mut()
            .ok_or_else(|| AppError::Navigation("No page loaded".to_string()))?;

        let next = screen.click(&self.ctx, label).await?;

        if let Some(target) = self.take_forced_navigation().or(next) {
            self.goto(&target).await?;
        }

        Ok(())
    }

    /// Pending forced navigation, dropped when it targets the current location
    /// so the page keeps its error message.
    fn take_forced_navigation(&self) -> Option<String> {
        let pending = self.ctx.history.take_pending()?;
        if self.ctx.history.current().as_deref() == Some(pending.as_str()) {
            debug!(location = %pending, "already at forced navigation target");
            None
        } else {
            Some(pending)
        }
    }
}
