//! Binary-question detection.
//!
//! A choice question whose two labels are an affirmative/negative pair
//! ("はい / いいえ", "あり / なし", "Yes / No", ...) is really a yes/no
//! question. Rewriting it to [`QuestionKind::YesNo`] lets the branching pass
//! key off the field type instead of label wording.

use tracing::debug;

use questform_shared::{Diagnostic, QuestionKind};

use crate::canonicalize::FixedQuestion;

/// Substrings signalling an affirmative answer (matched case-insensitively).
const AFFIRMATIVE: &[&str] = &[
    "あり",
    "ある",
    "はい",
    "有",
    "する",
    "します",
    "できる",
    "持っている",
    "いる",
    "yes",
];

/// Substrings signalling a negative answer (matched case-insensitively).
const NEGATIVE: &[&str] = &[
    "なし",
    "ない",
    "いいえ",
    "無",
    "しない",
    "しません",
    "できない",
    "持っていない",
    "いない",
    "no",
];

fn contains_any(label: &str, keywords: &[&str]) -> bool {
    let label = label.to_lowercase();
    keywords.iter().any(|k| label.contains(k))
}

fn is_affirmative(label: &str) -> bool {
    contains_any(label, AFFIRMATIVE)
}

fn is_negative(label: &str) -> bool {
    contains_any(label, NEGATIVE)
}

/// True if `labels` is exactly one affirmative label and one negative label,
/// in either order.
pub fn is_binary_pair(labels: &[String]) -> bool {
    let [a, b] = labels else {
        return false;
    };
    if a.is_empty() || b.is_empty() || a == b {
        return false;
    }
    (is_affirmative(a) && is_negative(b)) || (is_negative(a) && is_affirmative(b))
}

/// Downgrade a binary choice question to yes/no, dropping its labels.
///
/// Returns `true` if the question was rewritten.
pub fn coerce_binary_choice(
    question: &mut FixedQuestion,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    if !question.kind.is_choice() || !is_binary_pair(&question.choices) {
        return false;
    }

    debug!(
        position = question.position,
        from = %question.kind,
        labels = ?question.choices,
        "binary choice coerced to yes_no"
    );
    diagnostics.push(Diagnostic::notice(
        question.position,
        format!(
            "{} with labels \"{}\" / \"{}\" converted to yes_no",
            question.kind, question.choices[0], question.choices[1]
        ),
    ));

    question.kind = QuestionKind::YesNo;
    question.choices.clear();
    true
}
