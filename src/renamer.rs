//! Variable rename pass.
//!
//! Rewrites lower snake_case variable bindings (`user_name`) and every
//! reference that resolves to them into camelCase (`userName`). Resolution
//! goes through `oxc_semantic`, so globals, property names and same-named
//! identifiers bound elsewhere are left alone.
//!
//! A symbol keeps its name when:
//! - it is part of the module's export surface,
//! - it is a constructor parameter property (`private a_b: T`), which is also
//!   a class member,
//! - it is ambient (`declare const a_b`, or inside a `declare` block) and so
//!   names something defined outside the file,
//! - it is the target of a shorthand assignment pattern (`({ a_b } = obj)`),
//! - its camelCase form is already spelled somewhere in the file.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, walk_mut, Visit, VisitMut};
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_syntax::symbol::{SymbolFlags, SymbolId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref SNAKE_CASE_RE: Regex =
        Regex::new(r"^(_*)([a-z][a-z0-9]*(?:_[a-z0-9]+)+)(_*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// camelCase form of a lower snake_case name, or `None` if the name does not
/// follow the rule. Leading and trailing underscores are preserved.
pub fn camel_case_name(name: &str) -> Option<String> {
    let caps = SNAKE_CASE_RE.captures(name)?;
    let mut out = caps[1].to_string();
    for (i, segment) in caps[2].split('_').enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out.push_str(&caps[3]);
    Some(out)
}

/// Runs the pass over `program`. The allocator must be the arena the program
/// was parsed into; new identifier names are allocated there.
///
/// Returns one entry per renamed symbol, in declaration order.
pub fn rename_variables<'a>(program: &mut Program<'a>, allocator: &'a Allocator) -> Vec<Rename> {
    let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();

    let mut collector = NameCollector {
        scoping: &scoping,
        names: HashSet::new(),
        pinned: HashSet::new(),
        ambient_depth: 0,
    };
    collector.visit_program(program);

    let (plan, renames) = plan_renames(&scoping, &collector.names, &collector.pinned);
    if plan.is_empty() {
        return renames;
    }

    let mut renamer = SymbolRenamer {
        allocator,
        scoping: &scoping,
        plan: &plan,
    };
    renamer.visit_program(program);

    renames
}

fn plan_renames(
    scoping: &Scoping,
    names: &HashSet<String>,
    pinned: &HashSet<SymbolId>,
) -> (HashMap<SymbolId, String>, Vec<Rename>) {
    let mut plan = HashMap::new();
    let mut renames = Vec::new();
    // target name -> source name that claimed it
    let mut claimed: HashMap<String, String> = HashMap::new();

    for symbol_id in scoping.symbol_ids() {
        let flags = scoping.symbol_flags(symbol_id);
        if !flags.intersects(SymbolFlags::Variable) || flags.intersects(SymbolFlags::Ambient) {
            continue;
        }
        if pinned.contains(&symbol_id) {
            continue;
        }
        let name = scoping.symbol_name(symbol_id).to_string();
        let Some(target) = camel_case_name(&name) else {
            continue;
        };
        if names.contains(&target) {
            continue;
        }
        match claimed.get(&target) {
            Some(owner) if *owner != name => continue,
            Some(_) => {}
            None => {
                claimed.insert(target.clone(), name.clone());
            }
        }
        plan.insert(symbol_id, target.clone());
        renames.push(Rename { from: name, to: target });
    }

    (plan, renames)
}

fn reference_symbol(scoping: &Scoping, ident: &IdentifierReference) -> Option<SymbolId> {
    ident
        .reference_id
        .get()
        .and_then(|reference_id| scoping.get_reference(reference_id).symbol_id())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRE-SCAN
// ═══════════════════════════════════════════════════════════════════════════════

struct NameCollector<'s> {
    scoping: &'s Scoping,
    /// Every identifier spelling in the file, bound or not.
    names: HashSet<String>,
    pinned: HashSet<SymbolId>,
    /// Nesting depth of `declare module` / `declare namespace` bodies.
    ambient_depth: usize,
}

impl NameCollector<'_> {
    fn pin_pattern(&mut self, pattern: &BindingPattern) {
        match pattern {
            BindingPattern::BindingIdentifier(id) => {
                if let Some(symbol_id) = id.symbol_id.get() {
                    self.pinned.insert(symbol_id);
                }
            }
            BindingPattern::ObjectPattern(obj) => {
                for prop in &obj.properties {
                    self.pin_pattern(&prop.value);
                }
                if let Some(rest) = &obj.rest {
                    self.pin_pattern(&rest.argument);
                }
            }
            BindingPattern::ArrayPattern(arr) => {
                for elem in arr.elements.iter().flatten() {
                    self.pin_pattern(elem);
                }
                if let Some(rest) = &arr.rest {
                    self.pin_pattern(&rest.argument);
                }
            }
            BindingPattern::AssignmentPattern(assign) => {
                self.pin_pattern(&assign.left);
            }
        }
    }

    fn pin_reference(&mut self, ident: &IdentifierReference) {
        if let Some(symbol_id) = reference_symbol(self.scoping, ident) {
            self.pinned.insert(symbol_id);
        }
    }
}

impl<'a> Visit<'a> for NameCollector<'_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(Declaration::VariableDeclaration(var_decl)) = &decl.declaration {
            for d in &var_decl.declarations {
                self.pin_pattern(&d.id);
            }
        }
        // `export { a_b }` without a source refers to a local binding
        if decl.source.is_none() {
            for specifier in &decl.specifiers {
                if let ModuleExportName::IdentifierReference(ident) = &specifier.local {
                    self.pin_reference(ident);
                }
            }
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_formal_parameter(&mut self, param: &FormalParameter<'a>) {
        // `constructor(private a_b: T)` also declares `this.a_b`
        if param.has_modifier() {
            self.pin_pattern(&param.pattern);
        }
        walk::walk_formal_parameter(self, param);
    }

    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        if decl.declare || self.ambient_depth > 0 {
            for d in &decl.declarations {
                self.pin_pattern(&d.id);
            }
        }
        walk::walk_variable_declaration(self, decl);
    }

    fn visit_ts_module_declaration(&mut self, decl: &TSModuleDeclaration<'a>) {
        if decl.declare {
            self.ambient_depth += 1;
            walk::walk_ts_module_declaration(self, decl);
            self.ambient_depth -= 1;
        } else {
            walk::walk_ts_module_declaration(self, decl);
        }
    }

    fn visit_assignment_target_property_identifier(
        &mut self,
        prop: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        self.pin_reference(&prop.binding);
        walk::walk_assignment_target_property_identifier(self, prop);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REWRITE
// ═══════════════════════════════════════════════════════════════════════════════

struct SymbolRenamer<'a, 's> {
    allocator: &'a Allocator,
    scoping: &'s Scoping,
    plan: &'s HashMap<SymbolId, String>,
}

impl<'a> SymbolRenamer<'a, '_> {
    fn binding_target(&self, ident: &BindingIdentifier<'a>) -> Option<&str> {
        ident
            .symbol_id
            .get()
            .and_then(|symbol_id| self.plan.get(&symbol_id))
            .map(String::as_str)
    }

    fn reference_target(&self, ident: &IdentifierReference<'a>) -> Option<&str> {
        reference_symbol(self.scoping, ident)
            .and_then(|symbol_id| self.plan.get(&symbol_id))
            .map(String::as_str)
    }

    fn pattern_is_renamed(&self, pattern: &BindingPattern<'a>) -> bool {
        match pattern {
            BindingPattern::BindingIdentifier(id) => self.binding_target(id).is_some(),
            BindingPattern::AssignmentPattern(assign) => self.pattern_is_renamed(&assign.left),
            _ => false,
        }
    }
}

impl<'a> VisitMut<'a> for SymbolRenamer<'a, '_> {
    fn visit_binding_identifier(&mut self, ident: &mut BindingIdentifier<'a>) {
        if let Some(new_name) = self.binding_target(ident) {
            ident.name = self.allocator.alloc_str(new_name).into();
        }
    }

    fn visit_identifier_reference(&mut self, ident: &mut IdentifierReference<'a>) {
        if let Some(new_name) = self.reference_target(ident) {
            ident.name = self.allocator.alloc_str(new_name).into();
        }
    }

    // `{ user_name }` -> `{ user_name: userName }`
    fn visit_object_property(&mut self, prop: &mut ObjectProperty<'a>) {
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                if self.reference_target(ident).is_some() {
                    prop.shorthand = false;
                }
            }
        }
        walk_mut::walk_object_property(self, prop);
    }

    // `const { user_name } = x` -> `const { user_name: userName } = x`
    fn visit_binding_property(&mut self, prop: &mut BindingProperty<'a>) {
        if prop.shorthand && self.pattern_is_renamed(&prop.value) {
            prop.shorthand = false;
        }
        walk_mut::walk_binding_property(self, prop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_codegen::Codegen;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn rename(source: &str) -> (String, Vec<Rename>) {
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_typescript(true)
            .with_module(true);
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let mut program = ret.program;
        let renamed = rename_variables(&mut program, &allocator);
        (Codegen::new().build(&program).code, renamed)
    }

    #[test]
    fn test_camel_case_name() {
        assert_eq!(camel_case_name("user_name").as_deref(), Some("userName"));
        assert_eq!(camel_case_name("_cache_key").as_deref(), Some("_cacheKey"));
        assert_eq!(camel_case_name("item_2").as_deref(), Some("item2"));
        assert_eq!(camel_case_name("a_b_c_").as_deref(), Some("aBC_"));
        assert_eq!(camel_case_name("userName"), None);
        assert_eq!(camel_case_name("MAX_SIZE"), None);
        assert_eq!(camel_case_name("plain"), None);
        assert_eq!(camel_case_name("double__under"), None);
    }

    #[test]
    fn test_renames_binding_and_references() {
        let (code, renamed) = rename(
            "const user_name: string = 'ada';\nconsole.log(user_name);\nlet total_count = 0;\ntotal_count += 1;",
        );
        assert!(code.contains("userName"));
        assert!(code.contains("console.log(userName)"));
        assert!(code.contains("totalCount += 1"));
        assert!(!code.contains("user_name"));
        assert_eq!(
            renamed,
            vec![
                Rename {
                    from: "user_name".to_string(),
                    to: "userName".to_string()
                },
                Rename {
                    from: "total_count".to_string(),
                    to: "totalCount".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_params_and_catch_params_are_renamed() {
        let (code, _) = rename(
            "function greet(first_name: string) { try { return first_name; } catch (some_err) { throw some_err; } }",
        );
        assert!(code.contains("function greet(firstName"));
        assert!(code.contains("return firstName"));
        assert!(code.contains("throw someErr"));
    }

    #[test]
    fn test_globals_properties_and_functions_untouched() {
        let (code, renamed) =
            rename("function do_thing() {}\nconst obj = { a: 1 };\nobj.some_prop = global_value;\ndo_thing();");
        assert!(code.contains("function do_thing()"));
        assert!(code.contains("obj.some_prop = global_value"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_shorthand_property_keeps_key() {
        let (code, _) = rename("const item_id = 4;\nconst payload = { item_id };");
        assert!(code.contains("item_id: itemId"));
    }

    #[test]
    fn test_shorthand_destructuring_keeps_key() {
        let (code, _) =
            rename("const { first_name, last_name = 'x' } = person;\nconsole.log(first_name, last_name);");
        assert!(code.contains("first_name: firstName"));
        assert!(code.contains("last_name: lastName"));
        assert!(code.contains("console.log(firstName, lastName)"));
    }

    #[test]
    fn test_exports_keep_their_names() {
        let (code, renamed) = rename(
            "export const max_size = 10;\nconst page_size = 5;\nexport { page_size };",
        );
        assert!(code.contains("max_size"));
        assert!(code.contains("page_size"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_existing_camel_name_blocks_rename() {
        let (code, renamed) = rename("const user_name = 1;\nconst userName = 2;\nuser_name + userName;");
        assert!(code.contains("user_name + userName"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_conflicting_targets_first_wins() {
        let (code, renamed) = rename("let foo_12 = 1;\nlet foo_1_2 = 2;\nfoo_12 + foo_1_2;");
        assert!(code.contains("foo12 + foo_1_2"));
        assert_eq!(renamed.len(), 1);
    }

    #[test]
    fn test_shorthand_assignment_target_pinned() {
        let (code, renamed) = rename("let row_count;\n({ row_count } = stats);");
        assert!(code.contains("row_count"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_parameter_properties_keep_their_names() {
        let (code, renamed) = rename(
            "export class User {\n  constructor(private user_name: string, readonly created_at: number, plain_arg: string) {}\n  get label() { return this.user_name; }\n}",
        );
        assert!(code.contains("private user_name"));
        assert!(code.contains("readonly created_at"));
        assert!(code.contains("return this.user_name"));
        assert_eq!(
            renamed,
            vec![Rename {
                from: "plain_arg".to_string(),
                to: "plainArg".to_string()
            }]
        );
    }

    #[test]
    fn test_declare_const_keeps_global_name() {
        let (code, renamed) = rename("declare const build_env: string;\nexport const mode = build_env;");
        assert!(code.contains("mode = build_env"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_declare_blocks_keep_their_names() {
        let (code, renamed) = rename(
            "declare namespace settings {\n  let api_key: string;\n}\ndeclare module \"env\" {\n  const base_url: string;\n}",
        );
        assert!(code.contains("api_key"));
        assert!(code.contains("base_url"));
        assert!(renamed.is_empty());
    }

    #[test]
    fn test_namespace_exports_keep_their_names() {
        let (code, renamed) = rename(
            "namespace store {\n  export const max_items = 3;\n  const local_only = max_items;\n  console.log(local_only);\n}",
        );
        assert!(code.contains("max_items"));
        assert!(code.contains("console.log(localOnly)"));
        assert_eq!(
            renamed,
            vec![Rename {
                from: "local_only".to_string(),
                to: "localOnly".to_string()
            }]
        );
    }

    #[test]
    fn test_pass_is_deterministic() {
        let source = "let a_b = 1; let c_d = a_b; function f(e_f) { return e_f + c_d; }";
        assert_eq!(rename(source), rename(source));
    }
}
