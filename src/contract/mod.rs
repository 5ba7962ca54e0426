//! # Contract Module
//!
//! Turns a Swagger-style contract document into the in-memory model the
//! renderer works from.
//!
//! ## Overview
//!
//! ```text
//! contract text → load::parse_contract → ContractModel
//!                                     ├→ index::DefinitionIndex   (#/definitions/<name> → definition)
//!                                     └→ group::group_operations  (group key → [operation, ...])
//! ```
//!
//! - **[`load`]** parses YAML (or JSON, a YAML subset) and checks the top-level
//!   shape: a `paths` mapping and an optional `definitions` mapping. Nothing
//!   below the top level is validated.
//! - **[`index`]** annotates every definition with `definitionName` and
//!   `referencePath` and keys it by its reference path.
//! - **[`group`]** walks the paths, keeps the configured verbs and buckets the
//!   operations by a grouping field (operation level first, path level second).
//!
//! All maps are order-preserving, so a fixed document always yields the same
//! definition order and group order.

mod group;
mod index;
mod load;
mod types;

pub use group::*;
pub use index::*;
pub use load::*;
pub use types::*;
