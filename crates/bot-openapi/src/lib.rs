//! # bot-openapi
//!
//! reqwest-backed implementation of [`bot_core::OpenApi`].

mod client;
mod config;

pub use client::{HttpOpenApi, TRACE_ID_HEADER};
pub use config::{OpenApiConfig, DEFAULT_BASE_URL, SANDBOX_BASE_URL};
