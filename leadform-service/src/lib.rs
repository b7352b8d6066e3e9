//! leadform-service: conversational lead-capture service.
//!
//! Form owners define chat-driven forms grounded in contextual documents;
//! end users converse with an AI assistant that collects structured data and
//! produces a qualified lead record on submission.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
