//! CLI Adapter
//!
//! Command definitions and terminal rendering. The web dashboard is an
//! external consumer of the same pipeline payloads; this CLI is the
//! built-in one.

pub mod commands;
pub mod render;

pub use commands::{BestCmd, BoardCmd, CliApp, Command, ScreenArgs, SearchCmd, TokenCmd};
