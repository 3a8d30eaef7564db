//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine calls and persistence into use-case level APIs.
//! - Keep presentation callers decoupled from storage details.

pub mod overlay_service;
pub mod plant_summary;
