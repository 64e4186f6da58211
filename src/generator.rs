//! Generator
//!
//! Ties a collection source to the two synthesizers and the filesystem:
//! generate both artifacts in memory, write the enabled ones, or compare the
//! enabled ones with what is on disk.
//!
//! This is what a host runs at startup and after every collection change.

use std::path::{Path, PathBuf};

use crate::checksum::Checksum;
use crate::codegen::{generate_ts_schema, generate_zod_schema, GeneratedOutput};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::source::CollectionSource;

/// Both generated artifacts of one run
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub ts_schema: GeneratedOutput,
    pub zod_schema: GeneratedOutput,
}

/// How an on-disk artifact differs from a fresh generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    /// Nothing at the output path
    Missing,
    /// File content differs
    Stale,
}

/// One out-of-date artifact
#[derive(Debug, Clone)]
pub struct Drift {
    pub path: PathBuf,
    pub kind: DriftKind,
    /// Freshly generated text
    pub expected: String,
    /// Text currently on disk
    pub actual: Option<String>,
}

/// Generation driver
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator; the configuration is validated up front
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate both artifacts without touching the filesystem
    pub fn generate<S: CollectionSource + ?Sized>(&self, source: &S) -> Result<Artifacts> {
        let collections = source.list_collections()?;
        tracing::debug!(count = collections.len(), "generating artifacts");

        Ok(Artifacts {
            ts_schema: generate_ts_schema(&collections, &self.config.ts_schema)?,
            zod_schema: generate_zod_schema(&collections, &self.config.zod_schema)?,
        })
    }

    /// Generate and write every enabled artifact, returning the written paths
    pub fn run<S: CollectionSource + ?Sized>(&self, source: &S) -> Result<Vec<PathBuf>> {
        let artifacts = self.generate(source)?;
        let mut written = Vec::new();
        for (path, output) in self.enabled(&artifacts) {
            write_artifact(path, &output.code)?;
            written.push(path.to_path_buf());
        }
        Ok(written)
    }

    /// Compare every enabled artifact on disk with a fresh generation
    pub fn check<S: CollectionSource + ?Sized>(&self, source: &S) -> Result<Vec<Drift>> {
        let artifacts = self.generate(source)?;
        let mut drift = Vec::new();

        for (path, output) in self.enabled(&artifacts) {
            let expected = Checksum::of(&output.code);
            match Checksum::from_file(path)? {
                Some(actual) if actual == expected => {
                    tracing::debug!(path = %path.display(), checksum = %actual, "artifact up to date");
                }
                Some(_) => drift.push(Drift {
                    path: path.to_path_buf(),
                    kind: DriftKind::Stale,
                    expected: output.code.clone(),
                    // non-UTF-8 content is reported lossily
                    actual: Some(String::from_utf8_lossy(&std::fs::read(path)?).into_owned()),
                }),
                None => drift.push(Drift {
                    path: path.to_path_buf(),
                    kind: DriftKind::Missing,
                    expected: output.code.clone(),
                    actual: None,
                }),
            }
        }

        Ok(drift)
    }

    fn enabled<'a>(&'a self, artifacts: &'a Artifacts) -> Vec<(&'a Path, &'a GeneratedOutput)> {
        let mut out = Vec::new();
        if self.config.ts_schema.generate_file {
            out.push((self.config.ts_schema.output_path.as_path(), &artifacts.ts_schema));
        }
        if self.config.zod_schema.generate_file {
            out.push((self.config.zod_schema.output_path.as_path(), &artifacts.zod_schema));
        }
        out
    }
}

/// Overwrite `path` with `data`, creating parent directories (mode 0644 on Unix)
pub fn write_artifact(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }

    tracing::info!(path = %path.display(), bytes = data.len(), "wrote artifact");
    Ok(())
}
