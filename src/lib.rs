pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod identity;
pub mod ui;
