//! Domain layer containing collection logic and types.
//!
//! # Module Organization
//!
//! - `collection` - Target fields, conversation state, verdict parsing, answer shaping and prompts

pub mod collection;
