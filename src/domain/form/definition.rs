//! Form definition aggregate.
//!
//! A form definition is owned by an external collaborator; this crate
//! consumes it read-only.

use crate::domain::foundation::{FormId, ValidationError};
use serde::{Deserialize, Serialize};

use super::FieldList;

/// Copy shown on the welcome stage before the conversation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeCopy {
    /// Headline shown above the call to action.
    pub title: String,
    /// Supporting message explaining what the form is about.
    pub message: String,
    /// Label for the button that starts the conversation.
    pub cta_label: String,
}

impl WelcomeCopy {
    /// Creates welcome copy with a default call-to-action label.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            cta_label: "Fill out form".to_string(),
        }
    }

    /// Sets the call-to-action label.
    pub fn with_cta_label(mut self, label: impl Into<String>) -> Self {
        self.cta_label = label.into();
        self
    }
}

/// Static definition of one form: its identity, copy, and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    id: FormId,
    title: String,
    overview: Option<String>,
    welcome: WelcomeCopy,
    fields: FieldList,
}

impl FormDefinition {
    /// Creates a form definition.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is empty or whitespace only
    pub fn new(
        id: FormId,
        title: impl Into<String>,
        welcome: WelcomeCopy,
        fields: FieldList,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id,
            title,
            overview: None,
            welcome,
            fields,
        })
    }

    /// Sets the overview text describing the form's purpose.
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    /// Returns the form id.
    pub fn id(&self) -> &FormId {
        &self.id
    }

    /// Returns the form title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the overview text, if any.
    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }

    /// Returns the welcome-screen copy.
    pub fn welcome(&self) -> &WelcomeCopy {
        &self.welcome
    }

    /// Returns the ordered field list.
    pub fn fields(&self) -> &FieldList {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{FieldDescriptor, FieldName};

    fn sample_fields() -> FieldList {
        FieldList::new(vec![
            FieldDescriptor::new(FieldName::new("name").unwrap(), 0),
            FieldDescriptor::new(FieldName::new("email").unwrap(), 1),
        ])
    }

    #[test]
    fn new_creates_definition_with_fields() {
        let form = FormDefinition::new(
            FormId::new(),
            "Customer survey",
            WelcomeCopy::new("Welcome", "Tell us about yourself"),
            sample_fields(),
        )
        .unwrap();

        assert_eq!(form.title(), "Customer survey");
        assert_eq!(form.fields().len(), 2);
        assert!(form.overview().is_none());
    }

    #[test]
    fn rejects_empty_title() {
        let result = FormDefinition::new(
            FormId::new(),
            "  ",
            WelcomeCopy::new("Welcome", "Hi"),
            sample_fields(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn with_overview_sets_overview() {
        let form = FormDefinition::new(
            FormId::new(),
            "Survey",
            WelcomeCopy::new("Welcome", "Hi"),
            sample_fields(),
        )
        .unwrap()
        .with_overview("Collects contact details");

        assert_eq!(form.overview(), Some("Collects contact details"));
    }

    #[test]
    fn welcome_copy_defaults_cta_label() {
        let copy = WelcomeCopy::new("Welcome", "Hi");
        assert_eq!(copy.cta_label, "Fill out form");

        let copy = copy.with_cta_label("Start");
        assert_eq!(copy.cta_label, "Start");
    }
}
