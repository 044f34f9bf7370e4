//! UIForge Agent - LLM-backed oracles
//!
//! Implements the IR synthesis, IR repair and code repair oracles of
//! `uiforge-core` over any OpenAI-compatible chat completion API.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod client;
pub mod openai_compatible;
pub mod oracles;
pub mod prompts;

pub use client::{LlmChatClient, LlmChatCompletion};
pub use openai_compatible::OpenAiCompatibleClient;
pub use oracles::LlmOracles;
