//! Field Collector - conversational collection of a fixed set of fields
//!
//! An LLM asks one question per missing required field, judges whether the
//! user's answer is sufficient, converts accepted answers into the shape of
//! the field's example, and persists the conversation between turns.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
