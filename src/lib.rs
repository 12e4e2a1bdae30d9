pub mod cache;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod pairs;
pub mod redirect;
pub mod resolver;
pub mod search;
pub mod tui;

mod tui_shell;
