//! Collection Domain Module
//!
//! Pure logic for filling a fixed set of target fields through conversation.
//! Nothing in here talks to an LLM or touches the filesystem; the application
//! layer wires these pieces to the ports.
//!
//! # Architecture
//!
//! - **Targets**: field definitions and their example shapes
//! - **ConversationState**: the single persisted unit (messages, results, model)
//! - **Steps**: the fixed transition table of the collector state machine
//! - **Verdict / Shape parsing**: tolerant extraction from untrusted model output
//! - **Prompts / Summary**: text the collector sends and shows
//!
//! # Example
//!
//! ```ignore
//! use collection::{entry_step, transition, CollectorStep, Transition};
//!
//! let step = entry_step(&state.messages);
//! let next = transition(CollectorStep::FindMissing, state.node_result);
//! ```

pub mod errors;
pub mod prompts;
pub mod shape;
pub mod state;
pub mod step;
pub mod summary;
pub mod target;
pub mod verdict;

pub use errors::*;
pub use shape::*;
pub use state::*;
pub use step::*;
pub use summary::*;
pub use target::*;
pub use verdict::*;
