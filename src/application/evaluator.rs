//! Sufficiency evaluator - asks the model whether the conversation fills a target.

use tracing::{debug, warn};

use crate::domain::collection::prompts::evaluation_prompt;
use crate::domain::collection::{parse_verdict, EvaluationError, Message, ModelConfig, TargetField, Verdict};
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Raw evaluator output together with the verdict read from it.
///
/// The raw text is kept even when no verdict can be read, so callers can
/// record it before failing.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub raw: String,
    pub verdict: Result<Verdict, EvaluationError>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SufficiencyEvaluator;

impl SufficiencyEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Judges `messages` against `target`.
    ///
    /// # Errors
    /// Returns invocation failures. Output that claims sufficiency but has
    /// no `<result>` comes back as `Ok` with an `Err` verdict.
    pub async fn evaluate(
        &self,
        provider: &dyn AIProvider,
        model: &ModelConfig,
        target: &TargetField,
        messages: &[Message],
    ) -> Result<Evaluation, AIError> {
        let request = CompletionRequest::new(evaluation_prompt(target, messages))
            .with_temperature(model.temperature);
        let raw = provider.complete(request).await?.content;

        let verdict = parse_verdict(&raw);
        match &verdict {
            Ok(verdict) => {
                debug!(target_id = %target.id, sufficient = verdict.is_sufficient(), "Evaluated answer")
            }
            Err(e) => warn!(target_id = %target.id, error = %e, "Unreadable verdict"),
        }

        Ok(Evaluation { raw, verdict })
    }
}
