pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::ShellContext;
pub use shell::{run_cli, CliMode};
