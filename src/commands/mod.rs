//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod unpack;
pub mod uncram;
pub mod hexbin;
pub mod encode;
pub mod completions;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("File not found")]
    FileNotFound
}
