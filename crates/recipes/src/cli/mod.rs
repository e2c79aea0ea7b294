//! # CLI Layer
//!
//! This module is **one possible UI client** for recipes; it is not the application itself.
//!
//! The CLI layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Naked Execution
//!
//! Running `recipes` with no subcommand lists the collection in the default order.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Dispatch from parsed arguments to `RecipesApi`
//! - `print`: Output formatting (lists, full records, messages, JSON)
//! - `logging`: Tracing subscriber wiring

mod commands;
mod logging;
mod print;
mod setup;

pub use commands::run;
