//! Field markers carried in agent turn text.
//!
//! The answering agent tags each question with a trailing bracketed marker,
//! e.g. `"What is your name? [name]"`. The marker is parsed once when an
//! agent turn is finalized and carried alongside the turn as a structured
//! [`TurnAnnotation`], so downstream consumers never re-scan the raw text.

use serde::{Deserialize, Serialize};

/// Reserved marker value signaling that the dialogue is complete.
///
/// Matched case-insensitively against the extracted field identifier.
pub const COMPLETION_SENTINEL: &str = "finish";

/// Extracts the field identifier from an agent turn's text.
///
/// Returns the inner text of the first bracketed span `[...]` that contains
/// no nested brackets, verbatim and untrimmed. Returns `None` when no such
/// span exists; the turn is then non-field-advancing (e.g. small talk).
pub fn extract_field_identifier(text: &str) -> Option<&str> {
    let mut open = None;
    for (i, c) in text.char_indices() {
        match c {
            '[' => open = Some(i),
            ']' => {
                if let Some(start) = open {
                    return Some(&text[start + 1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Structured annotation parsed from a finalized agent turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAnnotation {
    answered_field: String,
}

impl TurnAnnotation {
    /// Parses the annotation from an agent turn's content.
    ///
    /// Returns `None` when the turn carries no field marker.
    pub fn parse(content: &str) -> Option<Self> {
        extract_field_identifier(content).map(|field| Self {
            answered_field: field.to_string(),
        })
    }

    /// Returns the field identifier named by the marker, verbatim.
    pub fn answered_field(&self) -> &str {
        &self.answered_field
    }

    /// Returns true if the marker is the completion sentinel.
    pub fn signals_completion(&self) -> bool {
        self.answered_field.eq_ignore_ascii_case(COMPLETION_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod extraction {
        use super::*;

        #[test]
        fn extracts_single_marker_verbatim() {
            assert_eq!(
                extract_field_identifier("What is your name? [name]"),
                Some("name")
            );
        }

        #[test]
        fn returns_none_without_brackets() {
            assert_eq!(extract_field_identifier("Nice to meet you!"), None);
        }

        #[test]
        fn first_marker_wins() {
            assert_eq!(extract_field_identifier("[first] and [second]"), Some("first"));
        }

        #[test]
        fn nested_brackets_resolve_to_innermost_span() {
            // The first span containing no nested brackets is "[inner]".
            assert_eq!(extract_field_identifier("a [b [inner] c]"), Some("inner"));
        }

        #[test]
        fn does_not_trim_inner_whitespace() {
            assert_eq!(extract_field_identifier("Question? [ name ]"), Some(" name "));
        }

        #[test]
        fn empty_span_yields_empty_identifier() {
            assert_eq!(extract_field_identifier("odd []"), Some(""));
        }

        #[test]
        fn stray_closing_bracket_is_ignored() {
            assert_eq!(extract_field_identifier("a] then [name]"), Some("name"));
        }

        #[test]
        fn unclosed_bracket_yields_none() {
            assert_eq!(extract_field_identifier("dangling [name"), None);
        }

        proptest! {
            #[test]
            fn any_single_span_is_returned_exactly(
                prefix in "[^\\[\\]]{0,40}",
                inner in "[^\\[\\]]{0,20}",
                suffix in "[^\\[\\]]{0,40}",
            ) {
                let text = format!("{prefix}[{inner}]{suffix}");
                prop_assert_eq!(extract_field_identifier(&text), Some(inner.as_str()));
            }

            #[test]
            fn bracket_free_text_never_matches(text in "[^\\[\\]]{0,80}") {
                prop_assert_eq!(extract_field_identifier(&text), None);
            }
        }
    }

    mod annotation {
        use super::*;

        #[test]
        fn parse_carries_the_identifier() {
            let annotation = TurnAnnotation::parse("What is q1? [q1]").unwrap();
            assert_eq!(annotation.answered_field(), "q1");
            assert!(!annotation.signals_completion());
        }

        #[test]
        fn parse_returns_none_for_plain_text() {
            assert!(TurnAnnotation::parse("Just chatting").is_none());
        }

        #[test]
        fn sentinel_matches_case_insensitively() {
            for marker in ["[finish]", "[Finish]", "[FINISH]"] {
                let annotation = TurnAnnotation::parse(marker).unwrap();
                assert!(annotation.signals_completion(), "marker {marker} should complete");
            }
        }

        #[test]
        fn sentinel_requires_full_match() {
            let annotation = TurnAnnotation::parse("[finished]").unwrap();
            assert!(!annotation.signals_completion());
        }

        #[test]
        fn serializes_answered_field() {
            let annotation = TurnAnnotation::parse("[email]").unwrap();
            let json = serde_json::to_string(&annotation).unwrap();
            assert_eq!(json, "{\"answered_field\":\"email\"}");
        }
    }
}
