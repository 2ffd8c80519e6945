//! Semantic ref resolution.
//!
//! Each question gets a unique ref. Titles matching a [`SemanticPattern`]
//! receive the pattern's canonical key; repeated matches on the same base key
//! receive `<base>_<n>`. Titles matching nothing receive `field_<position>`.
//!
//! [`SemanticPattern`]: crate::patterns::SemanticPattern

use std::collections::HashMap;

use tracing::trace;

use crate::patterns::PatternTable;

/// Prefix of positional refs for unmatched titles.
pub const POSITIONAL_REF_PREFIX: &str = "field_";

/// The ref chosen for one question, plus the helper text that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefAssignment {
    pub reference: String,
    /// Canonical key of the matched pattern, `None` for positional refs.
    pub pattern_key: Option<&'static str>,
    /// Helper text of the first instance of this base key.
    pub helper_text: Option<&'static str>,
}

/// Per-base bookkeeping: how many questions matched, and the first
/// instance's helper text.
#[derive(Debug, Clone, Copy)]
struct BaseUsage {
    count: usize,
    helper_text: Option<&'static str>,
}

/// Assigns refs across one form. Create one per transform call.
#[derive(Debug)]
pub struct RefResolver<'t> {
    table: &'t PatternTable,
    usage: HashMap<&'static str, BaseUsage>,
}

impl<'t> RefResolver<'t> {
    pub fn new(table: &'t PatternTable) -> Self {
        Self {
            table,
            usage: HashMap::new(),
        }
    }

    /// Resolve the ref for the field at 1-based `field_position`.
    pub fn assign(&mut self, title: &str, field_position: usize) -> RefAssignment {
        let Some(pattern) = self.table.find(title) else {
            return RefAssignment {
                reference: format!("{POSITIONAL_REF_PREFIX}{field_position}"),
                pattern_key: None,
                helper_text: None,
            };
        };

        let base = pattern.base_key();
        let usage = self.usage.entry(base).or_insert(BaseUsage {
            count: 0,
            helper_text: pattern.helper_text,
        });
        usage.count += 1;

        let reference = if usage.count == 1 {
            pattern.canonical_key.to_string()
        } else {
            format!("{base}_{}", usage.count)
        };

        trace!(title, reference = %reference, instance = usage.count, "pattern ref assigned");

        RefAssignment {
            reference,
            pattern_key: Some(pattern.canonical_key),
            helper_text: usage.helper_text,
        }
    }
}
