//! CLI module for the blogmatter command-line interface
//!
//! Argument parsing lives in [`args`], the handlers that drive the library in
//! [`commands`], and the stdin/stdout prompt provider in [`terminal`].

pub mod args;
pub mod commands;
pub mod terminal;
