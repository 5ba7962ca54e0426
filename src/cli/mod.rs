//! # CLI Module
//!
//! Command-line front end for the generator, shipped as the `stencil-gen`
//! binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Run the configured templates over one or more contracts:
//!
//! ```bash
//! stencil-gen generate --spec petstore.yaml --config templates/es6/stencil.yaml --output api
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Contract document, repeatable; processed in order
//! - `--config <FILE>` - Template configuration (YAML, JSON or TOML)
//! - `--output <DIR>` - Output root (default: current directory)
//! - `--force` - Overwrite existing files; without it existing files are kept
//!   and listed as possibly stale
//! - `--dry-run` - Log what would be written without touching the disk
//!
//! ### `inspect`
//!
//! Print the definition index and route groups of a contract:
//!
//! ```bash
//! stencil-gen inspect --spec petstore.yaml --group-by x-swagger-router-controller
//! ```
//!
//! `--verbose` is accepted by every command and raises logging to `debug`.

mod commands;


pub use commands::{generate_summary, inspect_report, run, run_cli, Cli, Commands};
