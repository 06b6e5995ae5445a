pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod finance;
pub mod realtime;
pub mod store;
