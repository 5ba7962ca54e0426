//! # swagger-stencil
//!
//! **swagger-stencil** turns a Swagger 2.0 contract into source files by
//! running user supplied templates over its type definitions and its route
//! operations.
//!
//! ## Architecture
//!
//! - **[`contract`]** - Contract parsing, the definition index and route grouping
//! - **[`render`]** - Template compilation, rendering and the helper library
//! - **[`pipeline`]** - Configuration, the emission pipeline and artifact sinks
//! - **[`cli`]** - The `stencil-gen` command-line front end
//! - **[`logging`]** - Structured logging setup
//! - **[`error`]** - The crate error type
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(stencil-gen)
//!     participant Gen as pipeline::Generator
//!     participant Contract as contract
//!     participant Render as render::TemplateRenderer
//!     participant Sink as pipeline::FsSink
//!
//!     CLI->>Gen: from_config_file(stencil.yaml)
//!     CLI->>Gen: generate_all(documents, sink)
//!     Gen->>Render: compile every configured template once
//!     Gen->>Contract: parse_contract(text)
//!     Gen->>Contract: DefinitionIndex::build(&model)
//!     loop perDefinition rule, definition
//!         Gen->>Render: render {model, definition, definitionMap, options}
//!     end
//!     Gen->>Contract: group_operations(&model, groupBy, operations)
//!     loop perPath rule, group
//!         Gen->>Render: render {fileName, groupKey, members, ...}
//!     end
//!     Gen->>Sink: accept(document, artifacts)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use swagger_stencil::pipeline::{DefinitionSpec, Generator, GeneratorConfig};
//! use swagger_stencil::render::{HelperSet, InlineTemplates};
//!
//! let config = GeneratorConfig::new()
//!     .per_definition("model.j2", DefinitionSpec::new("models", ".txt"));
//! let templates = InlineTemplates::new()
//!     .with("model.j2", "{% call upperFirst() %}{{ definition.definitionName }}{% endcall %}");
//! let mut generator = Generator::new(config, templates, &HelperSet::builtin());
//!
//! let artifacts = generator
//!     .generate("pets.yaml", "paths: {}\ndefinitions:\n  pet: {type: object}\n")
//!     .unwrap();
//! assert_eq!(artifacts[0].path.to_str(), Some("models/pet.txt"));
//! assert_eq!(artifacts[0].contents, "Pet");
//! ```

pub mod cli;
pub mod contract;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;

pub use contract::{load_contract, parse_contract, ContractModel, DefinitionIndex, RouteGroups};
pub use error::{GenError, Result};
pub use pipeline::{Artifact, Generator, GeneratorConfig};
pub use render::{HelperSet, TemplateRenderer};
