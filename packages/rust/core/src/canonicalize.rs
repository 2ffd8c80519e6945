//! Canonicalizer: best-effort repair of the raw, model-produced envelope.
//!
//! Input is arbitrary JSON purporting to be
//! `{title, description?, questions: [...]}`. Every malformed piece is
//! repaired in place and reported as a [`Diagnostic`]; nothing here fails.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use questform_shared::{Diagnostic, QuestionKind, TransformConfig};

// ---------------------------------------------------------------------------
// Canonical records
// ---------------------------------------------------------------------------

/// The repaired envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct FormEnvelope {
    pub title: String,
    /// True when `title` is the placeholder rather than caller-provided.
    pub title_repaired: bool,
    pub description: Option<String>,
    pub questions: Vec<FixedQuestion>,
}

/// One repaired question. Every member is either type-checked or absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedQuestion {
    /// 1-based position in the raw `questions` array.
    pub position: usize,
    pub kind: QuestionKind,
    pub title: String,
    /// Ref supplied by the extractor, if any. Resolution does not use it.
    pub explicit_ref: Option<String>,
    pub required: Option<bool>,
    pub description: Option<String>,
    /// Trimmed, non-empty, de-duplicated labels. Only kept for choice kinds.
    pub choices: Vec<String>,
    /// Numeric bounds. Only kept for the `number` kind.
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FixedQuestion {
    fn new(position: usize) -> Self {
        Self {
            position,
            kind: QuestionKind::default(),
            title: String::new(),
            explicit_ref: None,
            required: None,
            description: None,
            choices: Vec::new(),
            min: None,
            max: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Repair the envelope and every question in it.
#[instrument(skip_all)]
pub fn canonicalize(
    input: &Value,
    config: &TransformConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> FormEnvelope {
    let Some(obj) = input.as_object() else {
        diagnostics.push(Diagnostic::structural("input is not an object"));
        return FormEnvelope {
            title: config.placeholder_title.clone(),
            title_repaired: true,
            description: None,
            questions: Vec::new(),
        };
    };

    let (title, title_repaired) = match non_blank_str(obj.get("title")) {
        Some(t) => (t.to_string(), false),
        None => {
            diagnostics.push(Diagnostic::structural(format!(
                "title is required; using \"{}\"",
                config.placeholder_title
            )));
            (config.placeholder_title.clone(), true)
        }
    };

    let description = match obj.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(_) => {
            diagnostics.push(Diagnostic::structural(
                "description must be a string; dropped",
            ));
            None
        }
    };

    let raw_questions: &[Value] = match obj.get("questions") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => {
            diagnostics.push(Diagnostic::structural(
                "questions must be an array; using an empty list",
            ));
            &[]
        }
    };

    let questions: Vec<FixedQuestion> = raw_questions
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| canonicalize_question(raw, i + 1, config, diagnostics))
        .collect();

    debug!(
        raw = raw_questions.len(),
        kept = questions.len(),
        title_repaired,
        "envelope canonicalized"
    );

    FormEnvelope {
        title,
        title_repaired,
        description,
        questions,
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Repair a single question. Returns `None` only when the entry is not an object.
pub fn canonicalize_question(
    raw: &Value,
    position: usize,
    config: &TransformConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<FixedQuestion> {
    let Some(q) = raw.as_object() else {
        diagnostics.push(Diagnostic::field(position, "not an object; skipped"));
        return None;
    };

    let mut fixed = FixedQuestion::new(position);

    fixed.kind = match q.get("type") {
        Some(Value::String(name)) => QuestionKind::from_wire(name).unwrap_or_else(|| {
            diagnostics.push(Diagnostic::field(
                position,
                format!("unknown type \"{name}\"; using short_text"),
            ));
            QuestionKind::ShortText
        }),
        _ => {
            diagnostics.push(Diagnostic::field(
                position,
                "type is required; using short_text",
            ));
            QuestionKind::ShortText
        }
    };

    fixed.title = match non_blank_str(q.get("title")) {
        Some(t) => t.to_string(),
        None => {
            let placeholder = config.placeholder_question_title(position);
            diagnostics.push(Diagnostic::field(
                position,
                format!("title is required; using \"{placeholder}\""),
            ));
            placeholder
        }
    };

    fixed.required = match q.get("required") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            let coerced = truthy(other);
            diagnostics.push(Diagnostic::field(
                position,
                format!("required is not a boolean; read as {coerced}"),
            ));
            Some(coerced)
        }
    };

    fixed.explicit_ref = non_blank_str(q.get("ref")).map(str::to_string);

    match q.get("properties") {
        Some(Value::Object(props)) => apply_properties(&mut fixed, props, diagnostics),
        _ if fixed.kind.is_choice() => {
            diagnostics.push(Diagnostic::field(
                position,
                format!("{} requires properties.choices", fixed.kind),
            ));
        }
        _ => {}
    }

    Some(fixed)
}

fn apply_properties(
    fixed: &mut FixedQuestion,
    props: &Map<String, Value>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let position = fixed.position;

    if let Some(Value::String(desc)) = props.get("description") {
        let desc = desc.trim();
        if !desc.is_empty() {
            fixed.description = Some(desc.to_string());
        }
    }

    if fixed.kind.is_choice() {
        match props.get("choices") {
            Some(Value::Array(items)) => {
                fixed.choices = clean_labels(items);
                if fixed.choices.is_empty() {
                    diagnostics.push(Diagnostic::field(
                        position,
                        format!("{} has no usable choices", fixed.kind),
                    ));
                }
            }
            _ => {
                diagnostics.push(Diagnostic::field(
                    position,
                    format!("{} requires properties.choices", fixed.kind),
                ));
            }
        }
    }

    if fixed.kind == QuestionKind::Number {
        fixed.min = numeric_bound(props, "min", position, diagnostics);
        fixed.max = numeric_bound(props, "max", position, diagnostics);
    }
}

/// Trim labels, drop empty ones, and de-duplicate by exact string match,
/// keeping first-seen order. Accepts `{label}` objects and bare strings.
pub fn clean_labels(items: &[Value]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let raw = match item {
            Value::String(s) => s.as_str(),
            Value::Object(obj) => match obj.get("label") {
                Some(Value::String(s)) => s.as_str(),
                _ => continue,
            },
            _ => continue,
        };
        let label = raw.trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

fn numeric_bound(
    props: &Map<String, Value>,
    key: &str,
    position: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<f64> {
    match props.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => {
            diagnostics.push(Diagnostic::field(
                position,
                format!("{key} is not a number; ignored"),
            ));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A string value with non-whitespace content, trimmed.
fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Loose truthiness for non-boolean `required` values.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use questform_shared::Severity;

    fn run(input: Value) -> (FormEnvelope, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let env = canonicalize(&input, &TransformConfig::default(), &mut diagnostics);
        (env, diagnostics)
    }

    #[test]
    fn non_object_input_yields_placeholder_envelope() {
        for input in [json!(null), json!(42), json!("text"), json!([1, 2])] {
            let (env, diags) = run(input);
            assert_eq!(env.title, "問診票");
            assert!(env.title_repaired);
            assert!(env.questions.is_empty());
            assert_eq!(diags[0].severity, Severity::Structural);
        }
    }

    #[test]
    fn missing_title_and_questions_are_repaired() {
        let (env, diags) = run(json!({"questions": "nope"}));
        assert_eq!(env.title, "問診票");
        assert!(env.title_repaired);
        assert!(env.questions.is_empty());
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let (env, _) = run(json!({"title": "   ", "questions": []}));
        assert!(env.title_repaired);
    }

    #[test]
    fn non_string_description_is_dropped() {
        let (env, diags) = run(json!({"title": "T", "description": 5, "questions": []}));
        assert!(env.description.is_none());
        assert!(diags[0].message.contains("description"));

        let (env, _) = run(json!({"title": "T", "description": " intro ", "questions": []}));
        assert_eq!(env.description.as_deref(), Some("intro"));
    }

    #[test]
    fn unknown_or_missing_type_becomes_short_text() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": [
                {"type": "checkbox", "title": "A"},
                {"title": "B"},
                {"type": 7, "title": "C"}
            ]
        }));
        assert!(env.questions.iter().all(|q| q.kind == QuestionKind::ShortText));
        assert_eq!(diags.len(), 3);
        assert_eq!(diags[0].position, Some(1));
        assert!(diags[0].message.contains("checkbox"));
    }

    #[test]
    fn missing_question_title_uses_position() {
        let (env, _) = run(json!({
            "title": "T",
            "questions": [{"type": "date", "title": "X"}, {"type": "date"}]
        }));
        assert_eq!(env.questions[1].title, "質問2");
    }

    #[test]
    fn non_object_question_is_skipped_but_keeps_numbering() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": ["oops", {"type": "email"}]
        }));
        assert_eq!(env.questions.len(), 1);
        assert_eq!(env.questions[0].position, 2);
        assert_eq!(env.questions[0].title, "質問2");
        assert_eq!(diags[0].position, Some(1));
    }

    #[test]
    fn required_is_coerced_to_boolean() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": [
                {"type": "short_text", "title": "A", "required": true},
                {"type": "short_text", "title": "B", "required": "yes"},
                {"type": "short_text", "title": "C", "required": 0},
                {"type": "short_text", "title": "D"}
            ]
        }));
        let required: Vec<_> = env.questions.iter().map(|q| q.required).collect();
        assert_eq!(required, vec![Some(true), Some(true), Some(false), None]);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn choice_labels_are_trimmed_and_deduplicated() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": [{
                "type": "multiple_choice",
                "title": "Colour",
                "properties": {"choices": [
                    {"label": " Red "}, {"label": "Red"}, {"label": ""},
                    {"label": "red"}, "Blue", {"nope": 1}, 3
                ]}
            }]
        }));
        assert_eq!(env.questions[0].choices, vec!["Red", "red", "Blue"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn choice_kind_without_labels_is_kept_with_diagnostic() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": [
                {"type": "dropdown", "title": "A", "properties": {"choices": [{"label": "  "}]}},
                {"type": "dropdown", "title": "B"}
            ]
        }));
        assert_eq!(env.questions.len(), 2);
        assert!(env.questions.iter().all(|q| q.choices.is_empty()));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn bounds_only_accepted_as_numbers_on_number_kind() {
        let (env, diags) = run(json!({
            "title": "T",
            "questions": [
                {"type": "number", "title": "Age", "properties": {"min": 0, "max": "120"}},
                {"type": "short_text", "title": "Name", "properties": {"min": 1, "max": 5}}
            ]
        }));
        assert_eq!(env.questions[0].min, Some(0.0));
        assert_eq!(env.questions[0].max, None);
        assert_eq!(env.questions[1].min, None);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("max"));
    }

    #[test]
    fn explicit_ref_and_description_are_trimmed() {
        let (env, _) = run(json!({
            "title": "T",
            "questions": [{
                "type": "short_text",
                "title": "A",
                "ref": "  custom  ",
                "properties": {"description": "  help  "}
            }]
        }));
        assert_eq!(env.questions[0].explicit_ref.as_deref(), Some("custom"));
        assert_eq!(env.questions[0].description.as_deref(), Some("help"));
    }
}
