#![allow(dead_code)]

use std::path::PathBuf;

use swagger_stencil::pipeline::{Artifact, Generator, GeneratorConfig};
use swagger_stencil::render::{HelperSet, InlineTemplates};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

pub fn bundled_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/es6/stencil.yaml")
}

/// Render `text` with inline templates and the built-in helpers.
pub fn render_inline(
    config: GeneratorConfig,
    templates: InlineTemplates,
    text: &str,
) -> swagger_stencil::Result<Vec<Artifact>> {
    Generator::new(config, templates, &HelperSet::builtin()).generate("inline.yaml", text)
}

pub fn find<'a>(artifacts: &'a [Artifact], path: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.path == PathBuf::from(path))
        .unwrap_or_else(|| panic!("no artifact at {path}"))
}
