//! Financial Suitability Platform API Library
//!
//! This library provides the core functionality for the Financial
//! Suitability Platform API: the static government-scheme catalog and its
//! eligibility filter, prompt construction and response extraction for
//! the Gemini integration, the AI orchestration service, data models, and
//! HTTP handlers.
//!
//! # Modules
//!
//! - `advisor`: AI orchestration (analysis, recommendations, explanation).
//! - `config`: Configuration management.
//! - `errors`: Error handling types and message sanitization.
//! - `extractor`: JSON extraction from free-text model responses.
//! - `gemini`: Gemini `generateContent` client.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `prompts`: Prompt construction.
//! - `schemes`: Scheme catalog and eligibility filter.

pub mod advisor;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod gemini;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schemes;
