//! Chatscope - a terminal dashboard for inspecting chatbot conversation logs
//!
//! This library exposes modules for use in integration tests.

pub mod api;
pub mod app;
pub mod clipboard;
pub mod events;
pub mod models;
pub mod prefs;
pub mod query;
pub mod schema;
pub mod ui;
