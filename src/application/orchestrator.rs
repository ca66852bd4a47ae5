//! Collection orchestrator - runs the collector state machine for one turn.
//!
//! A run picks its entry step from the last message, executes steps along
//! the transition table until it exits, appends the completion summary when
//! every required target is collected, and persists the state once.
//!
//! Step failures never escape a run: they set `node_result = error`, keep
//! the error text in the state, and end the run.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::conversation_store::ConversationStore;
use super::evaluator::SufficiencyEvaluator;
use super::formatter::AnswerFormatter;
use super::target_catalog::TargetCatalog;
use crate::domain::collection::prompts::question_prompt;
use crate::domain::collection::{
    confirmation_message, entry_step, render_summary, transition, CollectedResult, CollectorStep,
    ConversationState, EvaluationError, MessageRole, NodeResult, Transition, Verdict,
};
use crate::ports::{AIError, AIProvider, CatalogError, CompletionRequest, ProviderFactory};

/// Failure inside a single step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("target catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    #[error("model invocation failed: {0}")]
    Invocation(#[from] AIError),

    #[error("unreadable evaluation: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("{step} requires a current target")]
    NoCurrentTarget { step: CollectorStep },
}

pub struct CollectionOrchestrator {
    catalog: Arc<TargetCatalog>,
    store: Arc<ConversationStore>,
    providers: Arc<dyn ProviderFactory>,
    evaluator: SufficiencyEvaluator,
    formatter: AnswerFormatter,
}

impl CollectionOrchestrator {
    pub fn new(
        catalog: Arc<TargetCatalog>,
        store: Arc<ConversationStore>,
        providers: Arc<dyn ProviderFactory>,
    ) -> Self {
        Self {
            catalog,
            store,
            providers,
            evaluator: SufficiencyEvaluator::new(),
            formatter: AnswerFormatter::new(),
        }
    }

    /// Runs one turn on the stored state and returns the resulting state.
    ///
    /// When the last message is from the assistant nothing runs and the
    /// stored state is returned untouched.
    pub async fn run(&self) -> ConversationState {
        let mut state = self.store.load().await;

        let Some(entry) = entry_step(&state.messages) else {
            debug!("Last message is from the assistant, nothing to run");
            return state;
        };

        self.run_from(entry, &mut state).await;

        if state.node_result == NodeResult::AllTargetsComplete {
            state.add_message(MessageRole::Assistant, render_summary(&state.results));
            info!(results = state.results.len(), "All targets collected");
        }

        self.store.save(&state).await;
        state
    }

    /// Executes steps from `entry` until the transition table exits.
    pub async fn run_from(&self, entry: CollectorStep, state: &mut ConversationState) {
        let mut step = entry;
        loop {
            self.execute(step, state).await;
            match transition(step, state.node_result) {
                Transition::Next(next) => step = next,
                Transition::Exit => break,
            }
        }
    }

    /// Executes a single step, downgrading any failure to `node_result = error`.
    pub async fn execute(&self, step: CollectorStep, state: &mut ConversationState) {
        log_node("enter", step, state);

        let outcome = match step {
            CollectorStep::FindMissing => self.find_missing(state).await,
            CollectorStep::GenerateQuestion => self.generate_question(state).await,
            CollectorStep::ProcessAnswer => self.process_answer(state).await,
        };

        match outcome {
            Ok(()) => state.error = None,
            Err(e) => {
                warn!(%step, error = %e, "Step failed");
                state.node_result = NodeResult::Error;
                state.error = Some(e.to_string());
            }
        }

        log_node("exit", step, state);
    }

    async fn find_missing(&self, state: &mut ConversationState) -> Result<(), StepError> {
        match self.catalog.first_missing_required(&state.results).await? {
            Some(target) => {
                state.current_target = Some(target);
                state.node_result = NodeResult::TargetFound;
            }
            None => {
                state.current_target = None;
                state.node_result = NodeResult::AllTargetsComplete;
            }
        }
        Ok(())
    }

    async fn generate_question(&self, state: &mut ConversationState) -> Result<(), StepError> {
        let target = state.current_target.clone().ok_or(StepError::NoCurrentTarget {
            step: CollectorStep::GenerateQuestion,
        })?;
        let provider = self.provider_for(state)?;

        let request = CompletionRequest::new(question_prompt(&target))
            .with_temperature(state.model_or_default().temperature);
        let question = provider.complete(request).await?.content;

        state.add_message(MessageRole::Assistant, question.trim());
        state.node_result = NodeResult::QuestionGenerated;
        Ok(())
    }

    async fn process_answer(&self, state: &mut ConversationState) -> Result<(), StepError> {
        let Some(target) = state.current_target.clone() else {
            debug!("No current target, nothing to evaluate");
            state.node_result = NodeResult::AnswerInsufficient;
            return Ok(());
        };
        let model = state.model_or_default();
        let provider = self.provider_for(state)?;

        let evaluation = self
            .evaluator
            .evaluate(provider.as_ref(), &model, &target, &state.messages)
            .await?;
        state.add_message(MessageRole::Debug, evaluation.raw);

        match evaluation.verdict? {
            Verdict::Sufficient { extracted } => {
                let data = self
                    .formatter
                    .format(provider.as_ref(), &model, &target, &extracted)
                    .await?;
                if !state.record_result(CollectedResult::for_target(&target, data)) {
                    warn!(target_id = %target.id, "Target already collected, keeping first result");
                }
                state.add_message(MessageRole::Assistant, confirmation_message(&target.name));
                state.current_target = None;
                state.node_result = NodeResult::AnswerSufficient;
            }
            Verdict::Insufficient { follow_up } => {
                state.add_message(MessageRole::Assistant, follow_up);
                state.node_result = NodeResult::AnswerInsufficient;
            }
        }
        Ok(())
    }

    fn provider_for(&self, state: &ConversationState) -> Result<Arc<dyn AIProvider>, AIError> {
        self.providers.provider_for(&state.model_or_default())
    }
}

fn log_node(phase: &str, step: CollectorStep, state: &ConversationState) {
    info!(
        phase,
        %step,
        messages = state.messages.len(),
        current_target = state.current_target.as_ref().map(|t| t.id.as_str()).unwrap_or("-"),
        results = state.results.len(),
        node_result = %state.node_result,
        "Collector node"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, StaticProviderFactory};
    use crate::adapters::catalog::StaticTargetSource;
    use crate::adapters::storage::InMemoryStateStorage;
    use crate::domain::collection::{ExampleShape, Message, ModelConfig, TargetField};
    use serde_json::json;

    const SUFFICIENT: &str =
        "<sufficient><code>SUFFICIENT</code><reason>ok</reason><result>Faster intake</result></sufficient>";

    struct Harness {
        orchestrator: CollectionOrchestrator,
        provider: MockAIProvider,
        storage: InMemoryStateStorage,
    }

    fn harness(initial: Option<ConversationState>) -> Harness {
        let provider = MockAIProvider::new();
        let storage = match initial {
            Some(state) => InMemoryStateStorage::with_state(state),
            None => InMemoryStateStorage::new(),
        };
        let source = StaticTargetSource::from_fields(vec![
            TargetField::new("goal", "Goal", "What it achieves", ExampleShape::from_value(json!("x"))),
            TargetField::new("deadline", "Deadline", "When", ExampleShape::from_value(json!("Q3"))),
        ]);
        let orchestrator = CollectionOrchestrator::new(
            Arc::new(TargetCatalog::new(Arc::new(source))),
            Arc::new(ConversationStore::new(Arc::new(storage.clone()))),
            Arc::new(StaticProviderFactory::new(Arc::new(provider.clone()))),
        );
        Harness {
            orchestrator,
            provider,
            storage,
        }
    }

    fn awaiting_goal_answer(answer: &str) -> ConversationState {
        let mut state = ConversationState::new();
        state.current_target = Some(TargetField::new(
            "goal",
            "Goal",
            "What it achieves",
            ExampleShape::from_value(json!("x")),
        ));
        state.node_result = NodeResult::QuestionGenerated;
        state.messages.push(Message::assistant("What is the goal?"));
        state.messages.push(Message::user(answer));
        state
    }

    #[tokio::test]
    async fn first_run_asks_for_first_target() {
        let h = harness(None);
        h.provider.push_response("What is the goal?");

        let state = h.orchestrator.run().await;

        assert_eq!(state.current_target.as_ref().map(|t| t.id.as_str()), Some("goal"));
        assert_eq!(state.node_result, NodeResult::QuestionGenerated);
        assert_eq!(state.messages, vec![Message::assistant("What is the goal?")]);
        assert_eq!(h.storage.write_count(), 1);
    }

    #[tokio::test]
    async fn assistant_last_is_noop() {
        let mut initial = ConversationState::new();
        initial.messages.push(Message::assistant("waiting"));
        let h = harness(Some(initial.clone()));

        let state = h.orchestrator.run().await;

        assert_eq!(state, initial);
        assert_eq!(h.provider.call_count(), 0);
        assert_eq!(h.storage.write_count(), 0);
    }

    #[tokio::test]
    async fn sufficient_answer_saves_and_moves_on() {
        let h = harness(Some(awaiting_goal_answer("Faster intake")));
        h.provider.push_response(SUFFICIENT);
        h.provider.push_response("Faster intake");
        h.provider.push_response("When should it ship?");

        let state = h.orchestrator.run().await;

        assert_eq!(state.results["goal"].data, json!("Faster intake"));
        assert_eq!(state.current_target.as_ref().map(|t| t.id.as_str()), Some("deadline"));
        assert_eq!(state.node_result, NodeResult::QuestionGenerated);

        let tail: Vec<(MessageRole, &str)> = state.messages[2..]
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            tail,
            vec![
                (MessageRole::Debug, SUFFICIENT),
                (
                    MessageRole::Assistant,
                    "'Goal' is successfully saved. Let's move on to the next item."
                ),
                (MessageRole::Assistant, "When should it ship?"),
            ]
        );
    }

    #[tokio::test]
    async fn insufficient_answer_asks_follow_up() {
        let h = harness(Some(awaiting_goal_answer("hmm")));
        h.provider.push_response(
            "<insufficient><code>INSUFFICIENT</code><result>What outcome do you expect?</result></insufficient>",
        );

        let state = h.orchestrator.run().await;

        assert_eq!(state.node_result, NodeResult::AnswerInsufficient);
        assert!(state.results.is_empty());
        assert_eq!(state.current_target.as_ref().map(|t| t.id.as_str()), Some("goal"));
        assert_eq!(state.messages.last(), Some(&Message::assistant("What outcome do you expect?")));
        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn answer_without_current_target_is_insufficient_without_llm() {
        let mut initial = ConversationState::new();
        initial.messages.push(Message::user("hello?"));
        let h = harness(Some(initial));

        let state = h.orchestrator.run().await;

        assert_eq!(state.node_result, NodeResult::AnswerInsufficient);
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn sufficient_code_without_result_ends_turn_in_error() {
        let raw = "<sufficient><code>SUFFICIENT</code><reason>ok</reason></sufficient>";
        let h = harness(Some(awaiting_goal_answer("Faster intake")));
        h.provider.push_response(raw);

        let state = h.orchestrator.run().await;

        assert_eq!(state.node_result, NodeResult::Error);
        assert!(state
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("Missing <result> inside <sufficient> block"));
        assert!(state.results.is_empty());
        assert_eq!(state.messages.last(), Some(&Message::debug(raw)));
        assert_eq!(state.current_target.as_ref().map(|t| t.id.as_str()), Some("goal"));
        assert_eq!(h.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn invocation_failure_records_error_without_message() {
        let failing = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "ollama down".to_string(),
        });
        let storage = InMemoryStateStorage::new();
        let orchestrator = CollectionOrchestrator::new(
            Arc::new(TargetCatalog::new(Arc::new(StaticTargetSource::from_fields(vec![
                TargetField::new("goal", "Goal", "d", ExampleShape::from_value(json!("x"))),
            ])))),
            Arc::new(ConversationStore::new(Arc::new(storage.clone()))),
            Arc::new(StaticProviderFactory::new(Arc::new(failing))),
        );

        let state = orchestrator.run().await;

        assert_eq!(state.node_result, NodeResult::Error);
        assert!(state.messages.is_empty());
        assert!(state.error.as_deref().unwrap_or_default().contains("ollama down"));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn missing_credential_downgrades_step_to_error() {
        let mut initial = ConversationState::new();
        initial.model_config = Some(ModelConfig::hosted("gpt-4o", 0.5, ""));
        let h = harness(Some(initial));

        let state = h.orchestrator.run().await;

        assert_eq!(state.node_result, NodeResult::Error);
        assert!(state.error.as_deref().unwrap_or_default().contains("requires a credential"));
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_step_clears_previous_error() {
        let mut initial = ConversationState::new();
        initial.error = Some("earlier failure".to_string());
        initial.node_result = NodeResult::Error;
        let h = harness(Some(initial));
        h.provider.push_response("What is the goal?");

        let state = h.orchestrator.run().await;

        assert_eq!(state.error, None);
        assert_eq!(state.node_result, NodeResult::QuestionGenerated);
    }

    #[tokio::test]
    async fn generate_question_without_target_is_error() {
        let h = harness(None);
        let mut state = ConversationState::new();

        h.orchestrator
            .execute(CollectorStep::GenerateQuestion, &mut state)
            .await;

        assert_eq!(state.node_result, NodeResult::Error);
        assert_eq!(
            state.error.as_deref(),
            Some("generate_question requires a current target")
        );
    }
}
