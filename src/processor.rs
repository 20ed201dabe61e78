//! Spec processing: read → transpile → write one output file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cache::IncrementalCache;
use crate::error::{Result, SpecError};
use crate::options::{BatchConfig, ModuleTarget, TranspileOptions};
use crate::renamer::Rename;
use crate::transpile::{transpile_module, Transpiled};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSpec {
    pub output_path: PathBuf,
    pub renamed: Vec<Rename>,
    pub cached: bool,
}

/// `greet.ts` → `greet.js`, `a.js` → `a.js`, `view.tsx` → `view.tsx.js`.
///
/// Only a trailing `.ts` is stripped, and only when something is left.
pub fn output_file_name(spec_path: &Path, target: ModuleTarget) -> String {
    let base = spec_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = target.extension();

    let mut name = match base.strip_suffix(".ts") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => base,
    };
    if !name.ends_with(ext) {
        name.push_str(ext);
    }
    name
}

/// Creates `dir` if it is missing. Parents are not created.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir(dir).map_err(|source| SpecError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!("Created output directory {}", dir.display());
    }
    Ok(())
}

pub struct SpecProcessor {
    output_dir: PathBuf,
    options: TranspileOptions,
    cache: Option<IncrementalCache>,
}

impl SpecProcessor {
    pub fn new(output_dir: impl Into<PathBuf>, options: TranspileOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
            cache: None,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        let mut processor = Self::new(&config.output_dir, config.transpile.clone());
        if let Some(cache_dir) = &config.cache_dir {
            processor.cache = Some(IncrementalCache::new(cache_dir, &config.transpile));
        }
        processor
    }

    pub fn output_path_for(&self, spec_path: &Path) -> PathBuf {
        self.output_dir
            .join(output_file_name(spec_path, self.options.module))
    }

    fn transpile(&self, spec_path: &Path, source: &str) -> Result<(Transpiled, bool)> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(spec_path, source) {
                return Ok((hit, true));
            }
        }

        let transpiled = transpile_module(source, spec_path, &self.options)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(spec_path, source, &transpiled) {
                tracing::warn!("{}", e);
            }
        }
        Ok((transpiled, false))
    }

    pub fn process(&self, spec_path: &Path) -> Result<ProcessedSpec> {
        let started = Instant::now();

        let source = fs::read_to_string(spec_path).map_err(|source| SpecError::Read {
            path: spec_path.to_path_buf(),
            source,
        })?;

        let (transpiled, cached) = self.transpile(spec_path, &source)?;

        let output_path = self.output_path_for(spec_path);
        ensure_output_dir(&self.output_dir)?;
        fs::write(&output_path, &transpiled.code).map_err(|source| SpecError::Write {
            path: output_path.clone(),
            source,
        })?;

        tracing::debug!(
            "{} -> {} ({} renames, cached: {}, {:?})",
            spec_path.display(),
            output_path.display(),
            transpiled.renamed.len(),
            cached,
            started.elapsed()
        );

        Ok(ProcessedSpec {
            output_path,
            renamed: transpiled.renamed,
            cached,
        })
    }
}
