//! Skip-logic synthesis from field adjacency.
//!
//! A yes/no field followed by a run of non-yes/no fields reads as "ask the
//! details only if yes". For each such anchor, answering `false` jumps to
//! the first field after the run. A run that reaches the end of the form has
//! nothing to jump to and gets no rule.

use tracing::{debug, instrument};

use questform_shared::{Field, LogicRule, QuestionKind};

/// Derive skip rules for `fields` in one forward pass.
#[instrument(skip_all, fields(fields = fields.len()))]
pub fn synthesize_skip_logic(fields: &[Field]) -> Vec<LogicRule> {
    let mut rules = Vec::new();
    let mut anchor = 0;

    while anchor < fields.len() {
        if fields[anchor].kind != QuestionKind::YesNo || fields[anchor].reference.is_empty() {
            anchor += 1;
            continue;
        }

        let run = fields[anchor + 1..]
            .iter()
            .take_while(|f| f.kind != QuestionKind::YesNo)
            .count();
        let target = anchor + run + 1;

        if let Some(jump_to) = fields.get(target).filter(|_| run > 0) {
            debug!(
                anchor = %fields[anchor].reference,
                target = %jump_to.reference,
                skipped = run,
                "skip rule emitted"
            );
            rules.push(LogicRule::skip_when_false(
                &fields[anchor].reference,
                &jump_to.reference,
            ));
        }

        // resume at the field after the run; never re-enter it
        anchor = target;
    }

    rules
}
