//! # Render Module
//!
//! Template compilation and rendering on top of `minijinja`.
//!
//! ## Overview
//!
//! - **[`TemplateRenderer`]** compiles each template once and hands out
//!   [`CompiledTemplate`] handles that render a context into text.
//! - **[`HelperSet`]** is the explicit, immutable helper map a renderer is
//!   built from: the built-ins plus any caller-supplied helpers, which may
//!   shadow built-ins by name.
//! - **[`helpers`]** holds the built-in helpers in a form that does not need
//!   the engine: each takes a [`Branches`] implementation in place of its
//!   block, so it can be exercised with plain closures.
//! - **[`TemplateSource`]** abstracts where template text comes from
//!   ([`FsTemplates`], [`InlineTemplates`]).
//!
//! ## Block helpers
//!
//! Helpers that take a block are used with `{% call %}`. Branching helpers
//! call their block with two arguments, the branch context and whether the
//! primary branch was selected:
//!
//! ```text
//! {% call(def, found) withDef(schema, definitionMap) %}
//!   {% if found %}new {{ def.definitionName }}(value){% else %}value{% endif %}
//! {% endcall %}
//! ```
//!
//! Text helpers call their block with no arguments and transform the output:
//!
//! ```text
//! {% call capsplit('_') %}{{ operation.operationId }}{% endcall %}
//! ```
//!
//! | Helper          | Arguments                        | Kind      |
//! |-----------------|----------------------------------|-----------|
//! | `arrayContains` | `array, value`                   | branching |
//! | `compare`       | `lvalue, operator, rvalue`       | branching |
//! | `property`      | `context, name, newName`         | branching |
//! | `withContext`   | `value`                          | branching |
//! | `withDef`       | `reference, definitionMap`       | branching |
//! | `lowerFirst`    |                                  | text      |
//! | `upperFirst`    |                                  | text      |
//! | `lowercase`     |                                  | text      |
//! | `uppercase`     |                                  | text      |
//! | `capsplit`      | `joiner`                         | text      |

mod engine;
pub mod helpers;
mod registry;
mod source;

pub use engine::{CompiledTemplate, TemplateRenderer};
pub use helpers::{Blocks, Branches};
pub use registry::{HelperFn, HelperSet};
pub use source::{FsTemplates, InlineTemplates, TemplateSource};
