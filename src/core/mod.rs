//! Configuration and Slack payload models

pub mod config;
pub mod models;
