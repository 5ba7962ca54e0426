use super::emit::{escapes_root, Artifact};
use crate::error::{GenError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Consumer of finished artifacts, e.g. a file writer.
///
/// Receives all artifacts of a document at once, and only after the whole
/// document rendered successfully.
pub trait ArtifactSink {
    /// Accept the artifacts generated from `document`.
    ///
    /// # Errors
    ///
    /// Implementation specific; file writers return [`GenError::Io`].
    fn accept(&mut self, document: &str, artifacts: Vec<Artifact>) -> Result<()>;
}

/// Collects artifacts in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
}

impl MemorySink {
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn accept(&mut self, _document: &str, artifacts: Vec<Artifact>) -> Result<()> {
        self.artifacts.extend(artifacts);
        Ok(())
    }
}

/// What an [`FsSink`] did with the artifacts it received.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Files written (or, in dry-run mode, that would have been written)
    pub written: Vec<PathBuf>,
    /// Existing files left untouched because `force` was off
    pub skipped: Vec<PathBuf>,
}

/// Writes artifacts below an output root.
///
/// Existing files are skipped unless `force` is set. In dry-run mode nothing
/// touches the disk; the sink only logs and records what it would write.
/// Artifacts whose path is absolute or climbs out of the root are refused
/// before anything is written.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    force: bool,
    dry_run: bool,
    report: WriteReport,
}

impl FsSink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsSink {
            root: root.into(),
            force: false,
            dry_run: false,
            report: WriteReport::default(),
        }
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn report(&self) -> &WriteReport {
        &self.report
    }

    fn write(&self, dest: &Path, contents: &str) -> Result<()> {
        let io_err = |source| GenError::Io {
            path: dest.to_path_buf(),
            source,
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(dest, contents).map_err(io_err)
    }
}

impl ArtifactSink for FsSink {
    fn accept(&mut self, document: &str, artifacts: Vec<Artifact>) -> Result<()> {
        if let Some(outside) = artifacts.iter().find(|a| escapes_root(&a.path)) {
            return Err(GenError::OutputPath {
                item: document.to_string(),
                path: outside.path.clone(),
            });
        }
        for artifact in artifacts {
            let dest = self.root.join(&artifact.path);
            if dest.exists() && !self.force {
                warn!(document, path = %dest.display(), "skipping existing file (use --force to overwrite)");
                self.report.skipped.push(dest);
                continue;
            }
            if self.dry_run {
                info!(document, path = %dest.display(), bytes = artifact.contents.len(), "dry run: would write");
            } else {
                self.write(&dest, &artifact.contents)?;
                info!(document, path = %dest.display(), "generated");
            }
            self.report.written.push(dest);
        }
        Ok(())
    }
}
