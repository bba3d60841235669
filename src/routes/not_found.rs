use crate::{app_lib::HOME_PATH, components::View};

/// Fallback for unknown locations.
#[derive(Debug, Default)]
pub struct NotFoundPage;

impl NotFoundPage {
    #[must_use]
    pub fn view(&self) -> View {
        View::new("Not found")
            .heading("Page not found")
            .paragraph("The page you requested does not exist.")
            .link("Go Home", HOME_PATH)
    }
}
