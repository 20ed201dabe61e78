//! Options Module for the Spec Compiler
//!
//! `TranspileOptions` is the transform configuration handed to every file.
//! `BatchConfig` holds the fixed directories and policies of a batch run.
//! Neither is mutated once a run has started.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// AST passes that run on the parsed program before the TypeScript transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeforePass {
    /// snake_case variables → camelCase. See `renamer`.
    RenameVariables,
}

/// Module format the codegen emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleTarget {
    /// `import`/`export` statements are emitted as written.
    #[default]
    EsNext,
}

impl ModuleTarget {
    pub fn extension(&self) -> &'static str {
        match self {
            ModuleTarget::EsNext => ".js",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspileOptions {
    pub before: Vec<BeforePass>,
    pub module: ModuleTarget,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions {
            before: vec![BeforePass::RenameVariables],
            module: ModuleTarget::EsNext,
        }
    }
}

impl TranspileOptions {
    /// Options with no before-passes: plain TypeScript stripping.
    pub fn without_passes() -> Self {
        TranspileOptions {
            before: Vec::new(),
            ..Self::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// What the driver does when one spec fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// First failure ends the batch and is returned to the caller.
    #[default]
    Abort,
    /// Failures are logged and collected; remaining specs still run.
    Continue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File names skipped during discovery, compared ASCII case-insensitively.
    pub ignored_files: Vec<String>,
    pub sort_entries: bool,
    pub on_error: FailurePolicy,
    pub cache_dir: Option<PathBuf>,
    pub transpile: TranspileOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input_dir: PathBuf::from("specs"),
            output_dir: PathBuf::from("dist"),
            ignored_files: vec![".DS_STORE".to_string()],
            sort_entries: true,
            on_error: FailurePolicy::Abort,
            cache_dir: None,
            transpile: TranspileOptions::default(),
        }
    }
}

impl BatchConfig {
    /// Default configuration rooted at `base` instead of the working directory.
    pub fn rooted_at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        BatchConfig {
            input_dir: base.join("specs"),
            output_dir: base.join("dist"),
            ..Self::default()
        }
    }

    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.ignored_files
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_rename_then_esnext() {
        let options = TranspileOptions::default();
        assert_eq!(options.before, vec![BeforePass::RenameVariables]);
        assert_eq!(options.module, ModuleTarget::EsNext);
        assert_eq!(options.module.extension(), ".js");
    }

    #[test]
    fn test_ds_store_ignored_any_case() {
        let config = BatchConfig::default();
        assert!(config.is_ignored(".DS_STORE"));
        assert!(config.is_ignored(".DS_Store"));
        assert!(!config.is_ignored("greet.ts"));
    }

    #[test]
    fn test_options_serialize_stably() {
        let json = serde_json::to_string(&TranspileOptions::default()).unwrap();
        assert_eq!(json, r#"{"before":["renameVariables"],"module":"esNext"}"#);
    }
}
