//! Assessment core for AI-assisted grant and procurement administration.
//!
//! The pipeline runs in three stages: field extraction from raw document
//! text, rubric scoring against a fund's configured criteria (with a
//! deterministic fallback when the completion backend is unavailable), and
//! template filling that maps a finished assessment onto placeholder-bearing
//! output documents.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
