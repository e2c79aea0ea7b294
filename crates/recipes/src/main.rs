//! # recipes
//!
//! Command-line client for the `recipeapp` recipe store.
//!
//! The binary only parses arguments, sets up logging and prints results. All
//! storage, interchange and query behavior lives in `recipeapp`; see its crate
//! documentation for the layering.
//!
//! ## Storage Selection
//!
//! By default recipes live in the private data directory (`RECIPES_DATA` or the
//! OS data dir). `--dir <path>` grants a directory of your choosing, which then
//! wins over every other backend for that run.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
