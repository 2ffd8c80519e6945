//! Shaping of the create-form request body.

use serde::Serialize;
use tracing::{debug, instrument};

use questform_shared::{Field, FormDefinition, FormSettings, LogicRule, Result, ValidationResult};

/// The exact body posted to the hosting service's create-form endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub title: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logic: Vec<LogicRule>,
    pub settings: FormSettings,
}

impl SubmissionPayload {
    /// Build the payload from a finished definition.
    ///
    /// A non-blank `title_override` replaces the definition's title. The
    /// settings keep whatever the definition carries, except that a blank
    /// language falls back to the default and the public/trial pair is
    /// always off.
    pub fn prepare(definition: &FormDefinition, title_override: Option<&str>) -> Self {
        let title = title_override
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&definition.title)
            .to_string();

        let mut settings = definition.settings.clone();
        if settings.language.trim().is_empty() {
            settings.language = FormSettings::default().language;
        }
        settings.force_private();

        Self {
            title,
            fields: definition.fields.clone(),
            logic: definition.logic.clone(),
            settings,
        }
    }
}

/// Gate a validation result and shape its payload.
///
/// Fails when the definition has no title or no fields.
#[instrument(skip_all)]
pub fn prepare_submission(
    result: &ValidationResult,
    title_override: Option<&str>,
) -> Result<SubmissionPayload> {
    let definition = result.ensure_submittable()?;
    let payload = SubmissionPayload::prepare(definition, title_override);
    debug!(
        title = %payload.title,
        fields = payload.fields.len(),
        rules = payload.logic.len(),
        "submission payload prepared"
    );
    Ok(payload)
}
