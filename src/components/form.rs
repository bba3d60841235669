//! Form model shared by the auth pages. Fields are addressed by their visible
//! label, exactly as a user (or a browser test) would find them.

use crate::app_lib::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    Email,
    Password,
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub id: &'static str,
    pub label: &'static str,
    pub input_type: InputType,
    pub autocomplete: &'static str,
    pub required: bool,
    pub value: String,
}

impl Field {
    #[must_use]
    pub fn new(id: &'static str, label: &'static str, input_type: InputType) -> Self {
        Self {
            id,
            label,
            input_type,
            autocomplete: "off",
            required: true,
            value: String::new(),
        }
    }

    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'static str) -> Self {
        self.autocomplete = autocomplete;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub disabled: bool,
}

/// A named form with labelled inputs and one submit button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form {
    /// Accessible name of the form.
    pub name: &'static str,
    pub fields: Vec<Field>,
    pub submit: Button,
}

impl Form {
    #[must_use]
    pub fn new(name: &'static str, fields: Vec<Field>, submit_label: &'static str) -> Self {
        Self {
            name,
            fields,
            submit: Button {
                label: submit_label,
                disabled: false,
            },
        }
    }

    #[must_use]
    pub fn field(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.label == label)
    }

    /// Sets the value of the field whose label matches exactly.
    ///
    /// # Errors
    /// Returns `AppError::Navigation` when no field carries `label`.
    pub fn fill(&mut self, label: &str, value: &str) -> Result<(), AppError> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.label == label)
            .ok_or_else(|| AppError::Navigation(format!("No field labelled \"{label}\"")))?;
        field.value = value.to_string();
        Ok(())
    }

    /// Value of the field with the given id; empty when the id is unknown.
    #[must_use]
    pub fn value(&self, id: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map_or("", |field| field.value.as_str())
    }

    /// Clears password inputs after a failed submit; other fields keep their values.
    pub fn clear_secrets(&mut self) {
        for field in &mut self.fields {
            if field.input_type == InputType::Password {
                field.value.clear();
            }
        }
    }

    /// Returns the label of the first required field left blank.
    #[must_use]
    pub fn first_missing(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|field| field.required && field.value.trim().is_empty())
            .map(|field| field.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> Form {
        Form::new(
            "Log in",
            vec![
                Field::new("email", "Email", InputType::Email),
                Field::new("password", "Password", InputType::Password),
            ],
            "Log in",
        )
    }

    #[test]
    fn fill_matches_exact_label() {
        let mut form = login_form();
        form.fill("Email", "user@example.com").unwrap();
        form.fill("Password", "Password@123").unwrap();

        assert_eq!(form.value("email"), "user@example.com");
        assert_eq!(form.value("password"), "Password@123");
        assert!(form.fill("password", "x").is_err());
        assert!(form.fill("Confirm password", "x").is_err());
    }

    #[test]
    fn missing_and_secret_handling() {
        let mut form = login_form();
        assert_eq!(form.first_missing(), Some("Email"));

        form.fill("Email", "user@example.com").unwrap();
        form.fill("Password", "  ").unwrap();
        assert_eq!(form.first_missing(), Some("Password"));

        form.fill("Password", "secret").unwrap();
        assert_eq!(form.first_missing(), None);

        form.clear_secrets();
        assert_eq!(form.value("email"), "user@example.com");
        assert_eq!(form.value("password"), "");
    }
}
