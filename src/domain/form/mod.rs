//! Form domain module.
//!
//! Static form definitions: the ordered field descriptors the dialogue walks
//! through, plus the welcome-screen copy shown before the conversation starts.

mod definition;
mod field;

pub use definition::{FormDefinition, WelcomeCopy};
pub use field::{FieldDescriptor, FieldList, FieldName};
