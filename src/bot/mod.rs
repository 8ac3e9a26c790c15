pub mod commands;
pub mod conversation;
pub mod handlers;
pub mod workflow;
