//! Cooking Assistant API Library
//!
//! A WhatsApp cooking assistant: Twilio webhook in, OpenAI chat completions
//! for understanding and replies, MongoDB for user state. This library holds
//! the domain model, the assistant logic, the infrastructure adapters and
//! the HTTP layer; `main.rs` wires them together.

pub mod api;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
