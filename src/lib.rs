//! # Spec Compiler
//!
//! Batch TypeScript → JavaScript transpiler for a directory of specs.
//!
//! ## Pipeline Invariants
//!
//! 1. **One spec, one output**: every entry of the input directory (except
//!    ignored OS artifacts) maps to exactly one `<name>.js` in the output
//!    directory. Names collide only when base names do; the last write wins.
//!
//! 2. **Before-passes run on the parsed tree**: the variable rename pass sees
//!    the TypeScript program before types are stripped and before codegen.
//!
//! 3. **Sequential**: a spec is fully read, transformed and written before the
//!    next one is opened. Each spec gets its own arena.
//!
//! 4. **Deterministic**: the same inputs and options produce byte-identical
//!    outputs, so a failed run can simply be repeated.
//!
//! 5. **Failure scope**: an unreadable input directory is logged and ends the
//!    run cleanly. A per-spec failure aborts the batch unless
//!    `FailurePolicy::Continue` is configured.

mod batch;
mod cache;
mod discovery;
mod error;
mod logger;
mod options;
mod processor;
mod progress;
mod renamer;
mod transpile;


pub use batch::{run_batch, BatchOutcome, BatchReport, SpecFailure};
pub use cache::IncrementalCache;
pub use discovery::{discover_specs, SpecFile};
pub use error::{Result, SpecError};
pub use logger::{init_cli_logger, Level, LogSink, MemorySink, SpecLogger, TracingSink};
pub use options::{BatchConfig, BeforePass, FailurePolicy, ModuleTarget, TranspileOptions};
pub use processor::{ensure_output_dir, output_file_name, ProcessedSpec, SpecProcessor};
pub use progress::{render_bar, ConsoleProgress, NoProgress, Progress};
pub use renamer::{camel_case_name, rename_variables, Rename};
pub use transpile::{source_type_for, transpile_module, Transpiled};
