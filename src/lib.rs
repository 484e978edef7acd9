pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod page_loader;
pub mod scanner;
