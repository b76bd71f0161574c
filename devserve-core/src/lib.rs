pub mod handler;
pub mod plugin;
pub mod proxy;
pub mod raw_config;
pub mod resolve;
pub mod signal;
