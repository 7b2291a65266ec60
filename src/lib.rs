pub mod config;
pub mod entity;
pub mod logging;
pub mod replay;
pub mod store;
