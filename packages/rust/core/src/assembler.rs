//! Schema assembler.
//!
//! Turns repaired, keyed, coerced questions into hosting-service fields,
//! in input order, and builds the settings overlay.

use tracing::debug;

use questform_shared::{
    Choice, Diagnostic, Field, FieldProperties, FieldValidations, FormSettings, QuestionKind,
    TransformConfig,
};

use crate::canonicalize::FixedQuestion;
use crate::resolver::RefAssignment;

/// Build one field from a canonical question and its resolved ref.
///
/// A choice-kind question that reaches this point without any labels is
/// emitted as `short_text`: the hosting service rejects empty choice lists.
pub fn assemble_field(
    question: &FixedQuestion,
    assignment: &RefAssignment,
    diagnostics: &mut Vec<Diagnostic>,
) -> Field {
    let mut kind = question.kind;
    if kind.is_choice() && question.choices.is_empty() {
        diagnostics.push(Diagnostic::field(
            question.position,
            format!("{kind} without choices emitted as short_text"),
        ));
        kind = QuestionKind::ShortText;
    }

    let validations = build_validations(kind, question);

    let properties = FieldProperties {
        description: question
            .description
            .clone()
            .or_else(|| assignment.helper_text.map(str::to_string)),
        choices: if kind.is_choice() {
            question
                .choices
                .iter()
                .map(|label| Choice {
                    label: label.clone(),
                })
                .collect()
        } else {
            Vec::new()
        },
    };

    Field {
        kind,
        title: question.title.clone(),
        reference: assignment.reference.clone(),
        validations: (!validations.is_empty()).then_some(validations),
        properties: (!properties.is_empty()).then_some(properties),
    }
}

fn build_validations(kind: QuestionKind, question: &FixedQuestion) -> FieldValidations {
    let mut validations = FieldValidations {
        required: question.required,
        ..FieldValidations::default()
    };
    if kind == QuestionKind::Number {
        let (min, max) = normalize_bounds(question.min, question.max);
        validations.min_value = min;
        validations.max_value = max;
    }
    validations
}

/// Clamp the lower bound to ≥ 0, then lift an upper bound that falls below it.
pub fn normalize_bounds(min: Option<f64>, max: Option<f64>) -> (Option<f64>, Option<f64>) {
    let min = min.map(|m| m.max(0.0));
    let max = match (min, max) {
        (Some(lo), Some(hi)) if hi < lo => Some(lo),
        (_, hi) => hi,
    };
    (min, max)
}

/// The settings overlay with the public/trial pair forced off last.
pub fn build_settings(config: &TransformConfig) -> FormSettings {
    let mut settings = config.settings.clone();
    if settings.is_public || settings.is_trial {
        debug!("caller settings asked for a public or trial form; overriding");
    }
    settings.force_private();
    settings
}
