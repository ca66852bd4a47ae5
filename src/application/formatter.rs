//! Answer formatter - converts an accepted answer into the target's shape.

use serde_json::Value;
use tracing::debug;

use crate::domain::collection::prompts::conversion_prompt;
use crate::domain::collection::{parse_shaped_response, ModelConfig, TargetField};
use crate::ports::{AIError, AIProvider, CompletionRequest};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerFormatter;

impl AnswerFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Asks the model to reshape `answer` like `target.example`, then parses
    /// the reply. Unparsable replies are kept as cleaned text.
    ///
    /// # Errors
    /// Only invocation failures are returned.
    pub async fn format(
        &self,
        provider: &dyn AIProvider,
        model: &ModelConfig,
        target: &TargetField,
        answer: &str,
    ) -> Result<Value, AIError> {
        let request = CompletionRequest::new(conversion_prompt(target, answer))
            .with_temperature(model.temperature);
        let response = provider.complete(request).await?;

        let value = parse_shaped_response(&response.content, &target.example);
        debug!(target_id = %target.id, structured = !value.is_string(), "Formatted answer");
        Ok(value)
    }
}
