pub mod companion;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod subscribe;
