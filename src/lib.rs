//! # Birthday Reminder Bot
//!
//! A Telegram bot that keeps a register of employees and their positions and
//! announces birthdays to administrators every day.
//!
//! ## Features
//! - Admin-only commands for adding positions and employees
//! - Guided, step-by-step employee form with per-step validation
//! - Daily birthday scan at a configured local time and timezone
//! - Photo announcements when an employee has a photo on file
//! - Persistent storage with SQLite

/// Bot command handlers, the intake form and conversation state
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Error taxonomy shared across the crate
pub mod error;
/// Background services: the birthday scan and the health endpoint
pub mod services;
/// Utility functions for dates, validation, formatting and logging
pub mod utils;
