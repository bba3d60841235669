//! View models for pages: forms, alerts and the rendered view.

mod alert;
mod form;
mod view;

pub use alert::{Alert, AlertKind};
pub use form::{Button, Field, Form, InputType};
pub use view::{Link, View};
