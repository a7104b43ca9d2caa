//! Console GPU catalog: an interactive arrow-key menu engine over a small
//! JSON-backed store of GPUs and the parts they reference.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod screens;
pub mod tui;
pub mod types;
pub mod ui;
pub mod util;
