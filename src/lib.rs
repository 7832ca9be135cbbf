//! linkstash — a bookmark and tag persistence engine with hierarchical import.
//!
//! This library crate exposes all modules for use by host applications and
//! integration tests.

pub mod app;
pub mod command_handler;
pub mod database;
pub mod managers;
pub mod services;
pub mod types;
