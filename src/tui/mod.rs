//! TUI module for interactive terminal interface

mod app;
pub mod widgets;

pub use app::{run, App, TuiConfig};
