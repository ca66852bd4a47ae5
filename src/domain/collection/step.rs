//! Collector Steps
//!
//! The fixed state machine driving one collection turn. The graph is small
//! and known up front, so it is a plain transition function rather than a
//! general graph runtime.

use std::fmt;

use super::state::{Message, MessageRole, NodeResult};

/// A step of the collector state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorStep {
    FindMissing,
    GenerateQuestion,
    ProcessAnswer,
}

impl CollectorStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorStep::FindMissing => "find_missing",
            CollectorStep::GenerateQuestion => "generate_question",
            CollectorStep::ProcessAnswer => "process_answer",
        }
    }
}

impl fmt::Display for CollectorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the run goes after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(CollectorStep),
    /// End the run and wait for the user
    Exit,
}

/// Choose the step a run starts from, or `None` when there is nothing to do
pub fn entry_step(messages: &[Message]) -> Option<CollectorStep> {
    match messages.last().map(|m| m.role) {
        None => Some(CollectorStep::FindMissing),
        Some(MessageRole::User) => Some(CollectorStep::ProcessAnswer),
        Some(MessageRole::Assistant) => None,
        Some(_) => Some(CollectorStep::FindMissing),
    }
}

/// Transition table of the collector
pub fn transition(from: CollectorStep, result: NodeResult) -> Transition {
    match (from, result) {
        (CollectorStep::FindMissing, NodeResult::TargetFound) => {
            Transition::Next(CollectorStep::GenerateQuestion)
        }
        (CollectorStep::FindMissing, _) => Transition::Exit,
        (CollectorStep::GenerateQuestion, _) => Transition::Exit,
        (CollectorStep::ProcessAnswer, NodeResult::AnswerSufficient) => {
            Transition::Next(CollectorStep::FindMissing)
        }
        (CollectorStep::ProcessAnswer, _) => Transition::Exit,
    }
}
