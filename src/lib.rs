pub mod commands;
pub mod config;
pub mod export;
pub mod extract;
pub mod process;
pub mod session;
