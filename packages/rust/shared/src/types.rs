//! Wire types for questform.
//!
//! Output-side structures mirror the hosting service's form-creation
//! contract field-for-field: the `type` names, validation keys and logic
//! grammar are fixed by that service.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{QuestformError, Result};

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// The nine field kinds accepted by the hosting service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    ShortText,
    LongText,
    MultipleChoice,
    Dropdown,
    YesNo,
    Date,
    Number,
    Email,
    PhoneNumber,
}

impl QuestionKind {
    /// Every kind, in contract order.
    pub const ALL: [QuestionKind; 9] = [
        Self::ShortText,
        Self::LongText,
        Self::MultipleChoice,
        Self::Dropdown,
        Self::YesNo,
        Self::Date,
        Self::Number,
        Self::Email,
        Self::PhoneNumber,
    ];

    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::MultipleChoice => "multiple_choice",
            Self::Dropdown => "dropdown",
            Self::YesNo => "yes_no",
            Self::Date => "date",
            Self::Number => "number",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }

    /// Look up a kind by its exact wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Kinds that require a list of choice labels.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Dropdown)
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// One entry of the emitted `fields` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub title: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validations: Option<FieldValidations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FieldProperties>,
}

/// `validations` block. Absent entirely when every member is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub min_value: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub max_value: Option<f64>,
}

impl FieldValidations {
    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.min_value.is_none() && self.max_value.is_none()
    }
}

/// `properties` block. Absent entirely when every member is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl FieldProperties {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.choices.is_empty()
    }
}

/// A single choice label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
}

/// Whole-valued bounds go out as JSON integers (`20`, not `20.0`).
fn serialize_bound<S: Serializer>(
    value: &Option<f64>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => s.serialize_i64(*v as i64),
        Some(v) => s.serialize_f64(*v),
        None => s.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Logic
// ---------------------------------------------------------------------------

/// A per-field logic block (`{"type": "field", "ref": ..., "actions": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicRule {
    #[serde(rename = "type")]
    pub scope: RuleScope,
    #[serde(rename = "ref")]
    pub reference: String,
    pub actions: Vec<LogicAction>,
}

impl LogicRule {
    /// "When `anchor` is answered `false`, jump to `target`."
    pub fn skip_when_false(anchor: &str, target: &str) -> Self {
        Self {
            scope: RuleScope::Field,
            reference: anchor.to_string(),
            actions: vec![LogicAction {
                action: ActionKind::Jump,
                details: JumpDetails {
                    to: JumpTarget {
                        kind: TargetKind::Field,
                        value: target.to_string(),
                    },
                },
                condition: Condition {
                    op: ConditionOp::Is,
                    vars: vec![
                        LogicVar::Field(anchor.to_string()),
                        LogicVar::Constant(false),
                    ],
                },
            }],
        }
    }

    /// Ref of the first jump destination, if any.
    pub fn jump_target(&self) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.action == ActionKind::Jump)
            .map(|a| a.details.to.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Field,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicAction {
    pub action: ActionKind,
    pub details: JumpDetails,
    pub condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Jump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpDetails {
    pub to: JumpTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpTarget {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub value: String,
}

/// Jump destinations understood by the hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Field,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub op: ConditionOp,
    pub vars: Vec<LogicVar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Is,
}

/// `{"type": "field", "value": "<ref>"}` or `{"type": "constant", "value": <bool>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LogicVar {
    Field(String),
    Constant(bool),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Form-level settings overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    pub language: String,
    pub progress_bar: String,
    pub show_progress_bar: bool,
    pub show_typeform_branding: bool,
    pub show_question_number: bool,
    pub show_key_hint_on_choices: bool,
    pub autosave_progress: bool,
    pub meta: SettingsMeta,
    pub is_public: bool,
    pub is_trial: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsMeta {
    pub allow_indexing: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            language: "ja".into(),
            progress_bar: "proportion".into(),
            show_progress_bar: true,
            show_typeform_branding: false,
            show_question_number: false,
            show_key_hint_on_choices: true,
            autosave_progress: true,
            meta: SettingsMeta {
                allow_indexing: false,
            },
            is_public: false,
            is_trial: false,
        }
    }
}

impl FormSettings {
    /// Force the non-public/non-trial pair. Always applied last.
    pub fn force_private(&mut self) {
        self.is_public = false;
        self.is_trial = false;
    }
}

// ---------------------------------------------------------------------------
// FormDefinition
// ---------------------------------------------------------------------------

/// The repaired form, ready for the hosting service (`fixedJson`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logic: Vec<LogicRule>,
    pub settings: FormSettings,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The envelope was malformed and replaced.
    Structural,
    /// A single question was repaired in place.
    Field,
    /// An intentional rewrite, not a defect.
    Notice,
    /// The form is unusable as-is; surfaced through `valid: false`.
    Critical,
}

/// One entry of the diagnostics accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based position of the question in the input, if question-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Structural,
            position: None,
            message: message.into(),
        }
    }

    pub fn field(position: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Field,
            position: Some(position),
            message: message.into(),
        }
    }

    pub fn notice(position: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Notice,
            position: Some(position),
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            position: None,
            message: message.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(pos) => write!(f, "question {pos}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of one transform call: `{valid, errors, fixedJson}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(rename = "fixedJson")]
    pub fixed_json: FormDefinition,
    /// Structured form of `errors`, in the same order.
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Build the result from the finished definition and its diagnostics.
    pub fn new(fixed_json: FormDefinition, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            valid: !diagnostics.iter().any(Diagnostic::is_critical),
            errors: diagnostics.iter().map(ToString::to_string).collect(),
            fixed_json,
            diagnostics,
        }
    }

    /// Refuse definitions the hosting service cannot accept at all.
    ///
    /// Non-critical repairs are fine; an empty title or an empty field list
    /// is not.
    pub fn ensure_submittable(&self) -> Result<&FormDefinition> {
        if self.fixed_json.title.trim().is_empty() || self.fixed_json.fields.is_empty() {
            return Err(QuestformError::validation(format!(
                "definition cannot be submitted: {}",
                self.errors.join(", ")
            )));
        }
        Ok(&self.fixed_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names_roundtrip() {
        for kind in QuestionKind::ALL {
            assert_eq!(QuestionKind::from_wire(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).expect("serialize kind");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(QuestionKind::from_wire("checkbox"), None);
        assert_eq!(QuestionKind::from_wire("Short_Text"), None);
    }

    #[test]
    fn field_omits_empty_blocks() {
        let field = Field {
            kind: QuestionKind::ShortText,
            title: "お名前".into(),
            reference: "field_1".into(),
            validations: None,
            properties: None,
        };
        let json = serde_json::to_value(&field).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "short_text", "title": "お名前", "ref": "field_1"})
        );
    }

    #[test]
    fn whole_bounds_serialize_as_integers() {
        let v = FieldValidations {
            required: Some(true),
            min_value: Some(0.0),
            max_value: Some(2.5),
        };
        let json = serde_json::to_string(&v).expect("serialize");
        assert_eq!(json, r#"{"required":true,"min_value":0,"max_value":2.5}"#);
    }

    #[test]
    fn skip_rule_matches_hosting_grammar() {
        let rule = LogicRule::skip_when_false("hasAllergies", "drinksAlcohol");
        let json = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "field",
                "ref": "hasAllergies",
                "actions": [{
                    "action": "jump",
                    "details": {"to": {"type": "field", "value": "drinksAlcohol"}},
                    "condition": {
                        "op": "is",
                        "vars": [
                            {"type": "field", "value": "hasAllergies"},
                            {"type": "constant", "value": false}
                        ]
                    }
                }]
            })
        );
        assert_eq!(rule.jump_target(), Some("drinksAlcohol"));
    }

    #[test]
    fn terminal_target_deserializes() {
        let raw = r#"{"type": "terminal", "value": "default_tys"}"#;
        let target: JumpTarget = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(target.kind, TargetKind::Terminal);
    }

    #[test]
    fn default_settings_are_private() {
        let mut settings = FormSettings::default();
        assert!(!settings.is_public);
        assert!(!settings.is_trial);
        settings.is_public = true;
        settings.force_private();
        assert!(!settings.is_public);
        assert_eq!(settings.language, "ja");
    }

    #[test]
    fn diagnostic_display_includes_position() {
        assert_eq!(
            Diagnostic::field(3, "title is missing").to_string(),
            "question 3: title is missing"
        );
        assert_eq!(
            Diagnostic::structural("input is not an object").to_string(),
            "input is not an object"
        );
    }

    #[test]
    fn result_validity_tracks_critical_only() {
        let form = FormDefinition {
            title: "問診票".into(),
            fields: vec![],
            logic: vec![],
            settings: FormSettings::default(),
        };
        let ok = ValidationResult::new(form.clone(), vec![Diagnostic::field(1, "trimmed")]);
        assert!(ok.valid);
        assert_eq!(ok.errors, vec!["question 1: trimmed".to_string()]);

        let bad = ValidationResult::new(form, vec![Diagnostic::critical("no questions")]);
        assert!(!bad.valid);
        assert!(bad.ensure_submittable().is_err());
    }
}
