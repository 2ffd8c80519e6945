//! Questionnaire repair and form-definition synthesis for Questform.
//!
//! This crate turns loosely structured, model-produced questionnaire JSON
//! into a valid hosting-service form definition: repaired questions,
//! semantic refs, yes/no coercion, and skip logic. The entry point is
//! [`pipeline::validate_and_fix`].

pub mod assembler;
pub mod branching;
pub mod canonicalize;
pub mod coercion;
pub mod extract;
pub mod patterns;
pub mod pipeline;
pub mod resolver;
pub mod submission;

pub use extract::parse_model_output;
pub use patterns::{PatternTable, SemanticPattern};
pub use pipeline::{validate_and_fix, validate_and_fix_with};
pub use submission::{SubmissionPayload, prepare_submission};
