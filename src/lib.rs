pub mod auth;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod domain;
pub mod editor;
pub mod error;
pub mod ftp;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod storage;
