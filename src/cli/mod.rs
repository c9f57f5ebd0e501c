//! Command Line Interface (CLI) layer for insarchive.
//!
//! This module defines argument parsing (`args`) and the orchestration
//! logic (`runner`) for the three converter subcommands. It wires
//! user-provided options to the underlying library functionality exposed
//! via `insarchive::api`.
//!
//! If you are embedding insarchive into another application, prefer using
//! the high-level `insarchive::api` module instead of calling the CLI code.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
