pub mod cli;
pub mod cmd;
pub mod config;
pub mod fs_store;
pub mod logging;
