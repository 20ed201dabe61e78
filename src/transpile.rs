//! Transpile Module for the Spec Compiler
//!
//! One source file in, one JavaScript module out:
//! parse → before-passes → TypeScript transform → codegen.
//! Each call owns its arena; nothing outlives the returned `Transpiled`.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SpecError};
use crate::options::{BeforePass, ModuleTarget, TranspileOptions};
use crate::renamer::{rename_variables, Rename};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transpiled {
    pub code: String,
    pub renamed: Vec<Rename>,
}

/// `.tsx`/`.jsx` get JSX; everything else is a TypeScript module, whatever
/// its extension.
pub fn source_type_for(path: &Path) -> SourceType {
    let is_jsx = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("tsx") | Some("jsx")
    );
    SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(is_jsx)
}

fn transform_options_for(target: ModuleTarget) -> TransformOptions {
    match target {
        // No module plugin: import/export pass through untouched.
        ModuleTarget::EsNext => TransformOptions::default(),
    }
}

fn messages<E: std::fmt::Display>(errors: &[E]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

/// Transpiles `source`. `path` is only used for diagnostics and to pick the
/// source type; the file is not touched.
pub fn transpile_module(source: &str, path: &Path, options: &TranspileOptions) -> Result<Transpiled> {
    let allocator = Allocator::default();
    let source_type = source_type_for(path);

    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(SpecError::Parse {
            path: path.to_path_buf(),
            messages: messages(&ret.errors),
        });
    }
    let mut program = ret.program;

    let mut renamed = Vec::new();
    for pass in &options.before {
        match pass {
            BeforePass::RenameVariables => {
                renamed.extend(rename_variables(&mut program, &allocator));
            }
        }
    }

    // Scoping is rebuilt after the before-passes so it sees the new names.
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();
    let transform_options = transform_options_for(options.module);
    let ret = Transformer::new(&allocator, path, &transform_options)
        .build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(SpecError::Transform {
            path: path.to_path_buf(),
            messages: messages(&ret.errors),
        });
    }

    let code = Codegen::new().build(&program).code;
    Ok(Transpiled { code, renamed })
}
