//! # Pipeline Module
//!
//! Drives one contract document from text to a list of [`Artifact`]s.
//!
//! ## Flow
//!
//! ```text
//! text ─ parse_contract ─▶ ContractModel ─▶ DefinitionIndex ─┐
//!                                  │                          ├─▶ perDefinition rules ─▶ artifacts
//!                                  └─▶ group_operations ──────┴─▶ perPath rules ───────▶ artifacts
//! ```
//!
//! 1. The contract is parsed and its definitions indexed.
//! 2. Every configured template is loaded and compiled once per [`Generator`].
//! 3. Each `perDefinition` rule renders one artifact per definition with the
//!    context `{model, definition, definitionMap, options}`, written to
//!    `target/<lowercased name><extension>`.
//! 4. Each `perPath` rule groups the operations by its `groupBy` field and
//!    renders one artifact per group with the context
//!    `{fileName, groupKey, members, definitionMap, model, options}`, written to
//!    `target/<fileName><extension>`.
//!
//! Any failure aborts the document; artifacts are only handed out once the
//! whole document has rendered. An [`ArtifactSink`] persists them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use swagger_stencil::pipeline::{ContractDocument, FsSink, Generator};
//! use swagger_stencil::render::HelperSet;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut generator =
//!     Generator::from_config_file(Path::new("templates/es6/stencil.yaml"), &HelperSet::builtin())?;
//! let mut sink = FsSink::new("generated");
//! let document = ContractDocument::from_path(Path::new("petstore.yaml"))?;
//! generator.generate_all([document], &mut sink)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod emit;
mod sink;

pub use config::{DefinitionSpec, GeneratorConfig, RouteSpec};
pub use emit::{artifact_path, escapes_root, Artifact, ContractDocument, Generator, PostProcessor};
pub use sink::{ArtifactSink, FsSink, MemorySink, WriteReport};
