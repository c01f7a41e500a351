//! Diabetes triage prediction service
//!
//! Loads one model artifact at startup and serves it over HTTP.

pub mod api;
pub mod config;
