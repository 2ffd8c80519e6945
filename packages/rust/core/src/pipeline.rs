//! End-to-end transform: raw model JSON → repaired form definition.
//!
//! Stages run in a fixed order: canonicalize → coerce → resolve refs →
//! assemble fields → synthesize skip logic → settings. The transform never
//! fails; everything that went wrong is reported in the result's
//! diagnostics.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use questform_shared::{Diagnostic, FormDefinition, TransformConfig, ValidationResult};

use crate::assembler::{assemble_field, build_settings};
use crate::branching::synthesize_skip_logic;
use crate::canonicalize::canonicalize;
use crate::coercion::coerce_binary_choice;
use crate::patterns::PatternTable;
use crate::resolver::RefResolver;

/// Validate and repair `input` with the built-in defaults and pattern table.
pub fn validate_and_fix(input: &Value) -> ValidationResult {
    validate_and_fix_with(input, &TransformConfig::default(), &PatternTable::builtin())
}

/// Validate and repair `input` with an explicit config and pattern table.
#[instrument(skip_all)]
pub fn validate_and_fix_with(
    input: &Value,
    config: &TransformConfig,
    table: &PatternTable,
) -> ValidationResult {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    let mut envelope = canonicalize(input, config, &mut diagnostics);

    // Ref counters live only for this call.
    let mut resolver = RefResolver::new(table);
    let mut coerced = 0usize;

    let fields: Vec<_> = envelope
        .questions
        .iter_mut()
        .enumerate()
        .map(|(idx, question)| {
            if coerce_binary_choice(question, &mut diagnostics) {
                coerced += 1;
            }

            let assignment = resolver.assign(&question.title, idx + 1);
            if let Some(explicit) = question
                .explicit_ref
                .as_deref()
                .filter(|r| *r != assignment.reference)
            {
                debug!(
                    position = question.position,
                    explicit,
                    assigned = %assignment.reference,
                    "explicit ref replaced"
                );
            }

            assemble_field(question, &assignment, &mut diagnostics)
        })
        .collect();

    let logic = synthesize_skip_logic(&fields);

    if envelope.title_repaired {
        warn!(title = %envelope.title, "form title missing after repair");
        diagnostics.push(Diagnostic::critical(
            "form title is missing; placeholder title used",
        ));
    }
    if fields.is_empty() {
        warn!("no usable questions after repair");
        diagnostics.push(Diagnostic::critical("form has no usable questions"));
    }

    let definition = FormDefinition {
        title: envelope.title,
        fields,
        logic,
        settings: build_settings(config),
    };

    let result = ValidationResult::new(definition, diagnostics);

    info!(
        valid = result.valid,
        fields = result.fixed_json.fields.len(),
        rules = result.fixed_json.logic.len(),
        coerced,
        diagnostics = result.errors.len(),
        has_description = envelope.description.is_some(),
        "form validated"
    );

    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::extract::parse_model_output;
    use questform_shared::{QuestionKind, Severity};

    fn fixture(name: &str) -> Value {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/json")
            .join(name);
        let text = std::fs::read_to_string(&path).expect("read fixture");
        parse_model_output(&text).expect("decode fixture")
    }

    fn refs(result: &ValidationResult) -> Vec<&str> {
        result
            .fixed_json
            .fields
            .iter()
            .map(|f| f.reference.as_str())
            .collect()
    }

    #[test]
    fn non_object_input_is_repaired_not_rejected() {
        for input in [json!(null), json!(42), json!("text"), json!([1, 2, 3])] {
            let result = validate_and_fix(&input);
            assert!(!result.valid);
            assert_eq!(result.fixed_json.title, "問診票");
            assert!(result.fixed_json.fields.is_empty());
            assert!(result.diagnostics.iter().any(Diagnostic::is_critical));
        }
    }

    #[test]
    fn well_formed_form_is_valid_without_errors() {
        let input = json!({
            "title": "初診問診票",
            "questions": [
                {"type": "number", "title": "年齢", "required": true},
                {"type": "date", "title": "生年月日", "required": true}
            ]
        });
        let result = validate_and_fix(&input);
        assert!(result.valid, "errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
        assert_eq!(refs(&result), vec!["patientAge", "patientBirthDate"]);
    }

    #[test]
    fn scenario_a_binary_choice_end_to_end() {
        let input = json!({
            "title": "T",
            "questions": [{
                "type": "multiple_choice",
                "title": "お薬を飲んでいますか",
                "properties": {"choices": [{"label": "はい"}, {"label": "いいえ"}]}
            }]
        });
        let result = validate_and_fix(&input);
        let field = &result.fixed_json.fields[0];
        assert_eq!(field.kind, QuestionKind::YesNo);
        assert!(field.properties.as_ref().is_none_or(|p| p.choices.is_empty()));
        assert!(result.valid);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Notice)
        );
    }

    #[test]
    fn scenario_b_skip_rule_end_to_end() {
        let input = json!({
            "title": "T",
            "questions": [
                {"type": "yes_no", "title": "Q1"},
                {"type": "short_text", "title": "Q2"},
                {"type": "number", "title": "Q3"},
                {"type": "yes_no", "title": "Q4"}
            ]
        });
        let result = validate_and_fix(&input);
        let logic = &result.fixed_json.logic;
        assert_eq!(logic.len(), 1);
        assert_eq!(logic[0].reference, "field_1");
        assert_eq!(logic[0].jump_target(), Some("field_4"));
    }

    #[test]
    fn scenario_c_repeat_family_members() {
        let input = json!({
            "title": "T",
            "questions": [
                {"type": "yes_no", "title": "ご家族はいますか"},
                {"type": "yes_no", "title": "ご家族はいますか（2人目）"}
            ]
        });
        let result = validate_and_fix(&input);
        assert_eq!(refs(&result), vec!["hasFamily_1", "hasFamily_2"]);
    }

    #[test]
    fn scenario_d_negative_bounds_end_to_end() {
        let input = json!({
            "title": "T",
            "questions": [{
                "type": "number",
                "title": "Q",
                "properties": {"min": -5, "max": -10}
            }]
        });
        let result = validate_and_fix(&input);
        let json = serde_json::to_value(&result).expect("serialize");
        let validations = &json["fixedJson"]["fields"][0]["validations"];
        assert_eq!(validations["min_value"], 0);
        assert_eq!(validations["max_value"], 0);
    }

    #[test]
    fn scenario_e_duplicate_unmatched_titles() {
        let input = json!({
            "title": "T",
            "questions": [
                {"type": "short_text", "title": "Favourite colour"},
                {"type": "short_text", "title": "Favourite colour"}
            ]
        });
        let result = validate_and_fix(&input);
        assert_eq!(refs(&result), vec!["field_1", "field_2"]);
    }

    #[test]
    fn skipped_entries_do_not_consume_positions() {
        let input = json!({
            "title": "T",
            "questions": ["junk", {"type": "short_text", "title": "Favourite colour"}]
        });
        let result = validate_and_fix(&input);
        assert_eq!(refs(&result), vec!["field_1"]);
        assert_eq!(result.errors[0], "question 1: not an object; skipped");
    }

    #[test]
    fn missing_title_is_critical() {
        let input = json!({"questions": [{"type": "short_text", "title": "Q"}]});
        let result = validate_and_fix(&input);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("placeholder title")));
        assert!(result.ensure_submittable().is_ok());
    }

    #[test]
    fn zero_questions_is_critical_and_not_submittable() {
        let result = validate_and_fix(&json!({"title": "T", "questions": []}));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["form has no usable questions"]);
        assert!(result.ensure_submittable().is_err());
    }

    #[test]
    fn field_repairs_keep_the_form_valid() {
        let input = json!({
            "title": "T",
            "questions": [{"type": "essay", "required": "yes"}]
        });
        let result = validate_and_fix(&input);
        assert!(result.valid);
        let field = &result.fixed_json.fields[0];
        assert_eq!(field.kind, QuestionKind::ShortText);
        assert_eq!(field.title, "質問1");
        assert_eq!(field.validations.as_ref().and_then(|v| v.required), Some(true));
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn config_overrides_placeholders_and_settings() {
        let mut config = TransformConfig {
            placeholder_title: "Intake".into(),
            question_title_prefix: "Question ".into(),
            ..TransformConfig::default()
        };
        config.settings.language = "en".into();
        config.settings.is_public = true;

        let input = json!({"questions": [{"type": "long_text"}]});
        let result = validate_and_fix_with(&input, &config, &PatternTable::builtin());
        assert_eq!(result.fixed_json.title, "Intake");
        assert_eq!(result.fixed_json.fields[0].title, "Question 1");
        assert_eq!(result.fixed_json.settings.language, "en");
        assert!(!result.fixed_json.settings.is_public);
    }

    #[test]
    fn output_wire_shape() {
        let input = json!({
            "title": "T",
            "questions": [
                {"type": "yes_no", "title": "Q1", "required": true},
                {"type": "dropdown", "title": "Q2", "properties": {"choices": ["A", " A ", "B"]}},
                {"type": "yes_no", "title": "Q3"}
            ]
        });
        let json = serde_json::to_value(validate_and_fix(&input)).expect("serialize");
        assert_eq!(json["valid"], true);
        assert!(json["errors"].as_array().is_some_and(Vec::is_empty));
        assert_eq!(json["fixedJson"]["fields"][0]["type"], "yes_no");
        assert_eq!(json["fixedJson"]["fields"][0]["ref"], "field_1");
        assert_eq!(json["fixedJson"]["fields"][0]["validations"]["required"], true);
        assert_eq!(
            json["fixedJson"]["fields"][1]["properties"]["choices"],
            json!([{"label": "A"}, {"label": "B"}])
        );
        assert_eq!(json["fixedJson"]["logic"][0]["type"], "field");
        assert_eq!(json["fixedJson"]["logic"][0]["actions"][0]["action"], "jump");
        assert_eq!(
            json["fixedJson"]["logic"][0]["actions"][0]["details"]["to"],
            json!({"type": "field", "value": "field_3"})
        );
        assert_eq!(json["fixedJson"]["settings"]["is_public"], false);
        assert!(json.get("diagnostics").is_none());
    }

    #[test]
    fn no_logic_key_without_rules() {
        let input = json!({"title": "T", "questions": [{"type": "short_text", "title": "Q"}]});
        let json = serde_json::to_value(validate_and_fix(&input)).expect("serialize");
        assert!(json["fixedJson"].get("logic").is_none());
    }

    #[test]
    fn intake_fixture_resolves_semantic_refs() {
        let result = validate_and_fix(&fixture("intake.fixture.json"));
        assert!(result.valid, "errors: {:?}", result.errors);

        let refs = refs(&result);
        let unique: HashSet<_> = refs.iter().collect();
        assert_eq!(unique.len(), refs.len());
        assert!(refs.contains(&"patientAge"));
        assert!(refs.contains(&"patientBirthDate"));

        // allergy: はい/いいえ dropdown coerced, so it anchors a skip rule
        let allergy = result
            .fixed_json
            .fields
            .iter()
            .find(|f| f.title.contains("アレルギー"))
            .expect("allergy field");
        assert_eq!(allergy.kind, QuestionKind::YesNo);
        assert!(
            result
                .fixed_json
                .logic
                .iter()
                .any(|r| r.reference == allergy.reference)
        );
    }

    #[test]
    fn malformed_fixture_is_repaired() {
        let result = validate_and_fix(&fixture("malformed.fixture.json"));
        assert!(!result.valid);
        assert!(!result.fixed_json.fields.is_empty());
        for field in &result.fixed_json.fields {
            if field.kind.is_choice() {
                let choices = field.properties.as_ref().map_or(0, |p| p.choices.len());
                assert!(choices >= 1, "{} has no choices", field.reference);
            }
            let bounds = field.validations.as_ref().map(|v| (v.min_value, v.max_value));
            if let Some((Some(lo), Some(hi))) = bounds {
                assert!(0.0 <= lo && lo <= hi);
            }
        }
    }
}
