pub mod actions;
pub mod cli;
pub mod config;
pub mod github;
pub mod output;
pub mod query;
pub mod run;
pub mod server;
