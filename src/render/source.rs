use indexmap::IndexMap;
use std::io;
use std::path::{Path, PathBuf};

/// Where template sources come from.
///
/// Template identifiers are the keys of the `perDefinition` / `perPath`
/// configuration; a source maps an identifier to template text.
pub trait TemplateSource {
    /// Read the source text of template `id`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the template does not exist or cannot be read.
    fn load(&self, id: &str) -> io::Result<String>;
}

/// Templates read from disk, relative identifiers resolved against a root.
#[derive(Debug, Clone)]
pub struct FsTemplates {
    root: PathBuf,
}

impl FsTemplates {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl TemplateSource for FsTemplates {
    fn load(&self, id: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(id))
    }
}

/// Templates held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct InlineTemplates {
    templates: IndexMap<String, String>,
}

impl InlineTemplates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(id.into(), source.into());
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(id.into(), source.into());
    }
}

impl TemplateSource for InlineTemplates {
    fn load(&self, id: &str) -> io::Result<String> {
        self.templates.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no inline template `{id}`"))
        })
    }
}
