//! Application layer - wires the collection domain to the ports.
//!
//! - `TargetCatalog` - memoized target definitions
//! - `ConversationStore` - cached state with a content-hash write gate
//! - `SufficiencyEvaluator` / `AnswerFormatter` - the two LLM judgements of an answer
//! - `CollectionOrchestrator` - one turn of the collector state machine
//! - `CollectorAgent` - turn-level facade for front-ends

mod agent;
mod conversation_store;
mod evaluator;
mod formatter;
mod orchestrator;
mod target_catalog;

pub use agent::{CollectorAgent, FieldStatus, TurnOutcome};
pub use conversation_store::{content_hash, ConversationStore};
pub use evaluator::{Evaluation, SufficiencyEvaluator};
pub use formatter::AnswerFormatter;
pub use orchestrator::{CollectionOrchestrator, StepError};
pub use target_catalog::TargetCatalog;
