//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers (HTTP layers, tools) decoupled from storage details.

pub mod item_service;
pub mod position_service;
pub mod project_service;
