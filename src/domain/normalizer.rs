use crate::domain::errors::AuthError;
use crate::domain::hooks::{HookResult, HookValue};

// What a single hook invocation amounted to, resolved once so the
// dispatcher never inspects raw hook results itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    // Nothing produced and the request error left alone (or cleared).
    Passthrough,
    // Nothing produced but `request.error` was rewritten in place.
    Mutated(AuthError),
    // A value was raised or returned; the stage stops here.
    Produced(HookValue),
}

impl HookOutcome {
    pub fn short_circuits(&self) -> bool {
        matches!(self, HookOutcome::Produced(_))
    }
}

// Classify a hook result against the request error seen before and after
// the hook ran.
pub fn classify(
    result: HookResult,
    before: Option<&AuthError>,
    after: Option<&AuthError>,
) -> HookOutcome {
    match result {
        Err(raised) => HookOutcome::Produced(raised),
        // An empty returned string is falsy, same as returning nothing.
        Ok(Some(HookValue::Text(text))) if text.is_empty() => classify_mutation(before, after),
        Ok(Some(returned)) => HookOutcome::Produced(returned),
        Ok(None) => classify_mutation(before, after),
    }
}

fn classify_mutation(before: Option<&AuthError>, after: Option<&AuthError>) -> HookOutcome {
    match after {
        Some(current) if Some(current) != before => HookOutcome::Mutated(current.clone()),
        _ => HookOutcome::Passthrough,
    }
}

// Fold an outcome into the effective error of the stage.
pub fn normalize(outcome: HookOutcome, existing: Option<AuthError>) -> Option<AuthError> {
    match outcome {
        HookOutcome::Produced(HookValue::Error(error)) => Some(error),
        HookOutcome::Produced(HookValue::Text(text)) => Some(AuthError::script_failed(text)),
        HookOutcome::Mutated(error) => Some(error),
        HookOutcome::Passthrough => existing,
    }
}
