pub mod app;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod promote;
pub mod session;
pub mod shared;
pub mod tui;
pub mod watch;
