//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, derived views and persistence into use-case APIs.
//! - Keep front ends decoupled from storage details.

pub mod tracker_service;
