use super::{Alert, Form};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

/// Rendered state of a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub title: String,
    /// Level-1 heading.
    pub heading: Option<String>,
    pub form: Option<Form>,
    pub alerts: Vec<Alert>,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
    pub buttons: Vec<&'static str>,
}

impl View {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    #[must_use]
    pub fn form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    #[must_use]
    pub fn alert(mut self, alert: Option<Alert>) -> Self {
        self.alerts.extend(alert);
        self
    }

    #[must_use]
    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    #[must_use]
    pub fn link(mut self, label: &'static str, href: &'static str) -> Self {
        self.links.push(Link { label, href });
        self
    }

    #[must_use]
    pub fn button(mut self, label: &'static str) -> Self {
        self.buttons.push(label);
        self
    }

    /// True if a button with this exact label is visible, standalone or as a form submit.
    #[must_use]
    pub fn has_button(&self, label: &str) -> bool {
        self.buttons.contains(&label)
            || self
                .form
                .as_ref()
                .is_some_and(|form| form.submit.label == label)
    }
}

/// Plain-text rendering used by the CLI. Field values are never printed.
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading.as_deref().unwrap_or(&self.title))?;
        for alert in &self.alerts {
            writeln!(f, "{alert}")?;
        }
        for paragraph in &self.paragraphs {
            writeln!(f, "{paragraph}")?;
        }
        if let Some(form) = &self.form {
            writeln!(f, "{}:", form.name)?;
            for field in &form.fields {
                writeln!(f, "  {}", field.label)?;
            }
            writeln!(f, "  [{}]", form.submit.label)?;
        }
        for label in &self.buttons {
            writeln!(f, "[{label}]")?;
        }
        for link in &self.links {
            writeln!(f, "{} -> {}", link.label, link.href)?;
        }
        Ok(())
    }
}
