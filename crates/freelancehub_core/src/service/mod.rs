//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP/UI callers decoupled from storage details.

pub mod dashboard_service;
pub mod project_service;
