//! Field descriptors and the ordered field list.
//!
//! Field names are used verbatim as dialogue markers: the answering agent
//! tags each question with `[fieldName]` and the tracker resolves that tag
//! against this list.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier of a form field, used verbatim as a dialogue marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a field name.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is empty or whitespace only
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("field_name"));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static definition of one form field and its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: FieldName,
    order: u32,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    pub fn new(name: FieldName, order: u32) -> Self {
        Self { name, order }
    }

    /// Returns the field name.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Returns the field's position as declared by the form definition.
    pub fn order(&self) -> u32 {
        self.order
    }
}

/// The ordered list of field descriptors for one form.
///
/// # Invariants
///
/// - Insertion order is preserved; the list is never reordered.
/// - Duplicate names are tolerated; lookups collapse to the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<FieldDescriptor>);

impl FieldList {
    /// Creates a field list from descriptors, preserving their order.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self(fields)
    }

    /// Returns the zero-based position of the first field whose name equals
    /// `identifier` (case-sensitive exact match), or `None` if absent.
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.0.iter().position(|f| f.name().as_str() == identifier)
    }

    /// Returns the descriptor at the given position.
    pub fn get(&self, index: usize) -> Option<&FieldDescriptor> {
        self.0.get(index)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.0.iter()
    }
}

impl FromIterator<FieldDescriptor> for FieldList {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
