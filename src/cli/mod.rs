//! Command-line interface module.

mod args;
pub mod common;
pub mod render;
pub mod serve;

pub use args::{Cli, Commands, DEFAULT_CONFIG, IncludeArgs, RenderArgs, ServeArgs};
