//! Integration tests for cross-file resolution.
//!
//! Covers:
//! - Module lookup
//! - `-st-extends` targets under both strictness settings
//! - Import binding and symbol tables, including redeclarations
//! - Cross-file variables and cycles
//! - Symbol definitions through re-export chains

use std::collections::BTreeMap;

use stylable::{
    ExtendsTarget, JsModule, JsValue, Module, Origin, Resolver, Strictness, StylableError, Symbol,
    SymbolKind, Stylesheet,
};

fn sheet(css: &str, namespace: &str, source: &str) -> Stylesheet {
    Stylesheet::from_css(css, Some(namespace), source).unwrap()
}

fn resolver(modules: Vec<(&str, Module)>) -> Resolver {
    Resolver::new(
        modules
            .into_iter()
            .map(|(path, module)| (path.to_string(), module))
            .collect::<BTreeMap<_, _>>(),
    )
}

// ============================================================================
// MODULES
// ============================================================================

#[test]
fn test_resolve_missing_module() {
    let resolver = resolver(vec![]);
    let err = resolver.resolve_module("./nope.css").unwrap_err();
    assert_eq!(err, StylableError::UnresolvedModule("./nope.css".into()));
    assert_eq!(err.to_string(), "can't resolve \"./nope.css\"");
}

#[test]
fn test_register_and_invalidate() {
    let mut resolver = resolver(vec![]);
    resolver.register("./a.css", sheet(".a {}", "A", "a.css"));
    assert!(resolver.stylesheet("./a.css").is_some());
    assert!(resolver.invalidate("./a.css").is_some());
    assert!(resolver.module("./a.css").is_none());
}

// ============================================================================
// EXTENDS
// ============================================================================

#[test]
fn test_class_without_extends_resolves_to_its_sheet() {
    let resolver = resolver(vec![]);
    let local = sheet(".a {}", "L", "l.css");
    match resolver.resolve(&local, "a").unwrap() {
        Some(ExtendsTarget::Sheet(target)) => assert!(std::ptr::eq(target, &local)),
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn test_extends_default_import() {
    let resolver = resolver(vec![("./button.css", sheet("", "Button", "button.css").into())]);
    let local = sheet(
        r#":import { -st-from: "./button.css"; -st-default: Button; } .a { -st-extends: Button; }"#,
        "L",
        "l.css",
    );
    match resolver.resolve(&local, "a").unwrap() {
        Some(ExtendsTarget::Sheet(target)) => assert_eq!(target.namespace, "Button"),
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn test_extends_named_class() {
    let resolver = resolver(vec![("./kit.css", sheet(".label {}", "Kit", "kit.css").into())]);
    let local = sheet(
        r#":import { -st-from: "./kit.css"; -st-named: label as Label; } .a { -st-extends: Label; }"#,
        "L",
        "l.css",
    );
    match resolver.resolve(&local, "a").unwrap() {
        Some(ExtendsTarget::Class(target, class)) => {
            assert_eq!(target.namespace, "Kit");
            assert_eq!(class, "label");
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn test_extends_local_class() {
    let resolver = resolver(vec![]);
    let local = sheet(".base {} .a { -st-extends: base; }", "L", "l.css");
    assert!(matches!(
        resolver.resolve(&local, "a").unwrap(),
        Some(ExtendsTarget::Class(_, "base"))
    ));
}

#[test]
fn test_unresolved_extends_lenient_and_strict() {
    let local = sheet(".a { -st-extends: Missing; }", "L", "l.css");

    let lenient = resolver(vec![]);
    assert!(lenient.resolve(&local, "a").unwrap().is_none());

    let strict = resolver(vec![]).with_strictness(Strictness::all());
    assert_eq!(
        strict.resolve(&local, "a").unwrap_err(),
        StylableError::UnresolvedExtends {
            class: "a".into(),
            target: "Missing".into(),
        }
    );
}

// ============================================================================
// SYMBOL TABLES
// ============================================================================

#[test]
fn test_resolve_imports_binds_everything() {
    let theme = sheet(
        ":vars { base: red; accent: value(base); } .title {}",
        "Theme",
        "theme.css",
    );
    let js = JsModule::new()
        .with_default("js-default")
        .with_export("size", "12px");
    let resolver = resolver(vec![("./theme.css", theme.into()), ("./consts.js", js.into())]);
    let local = sheet(
        r#"
        :import { -st-from: "./theme.css"; -st-named: accent, title as Heading; }
        :import { -st-from: "./consts.js"; -st-default: Consts; -st-named: size; }
        "#,
        "L",
        "l.css",
    );

    let symbols = resolver.resolve_imports(&local).unwrap();
    assert!(matches!(symbols.get("./theme.css"), Some(Symbol::Stylesheet(_))));
    assert!(matches!(symbols.get("accent"), Some(Symbol::Var(v)) if v == "red"));
    assert!(matches!(symbols.get("Heading"), Some(Symbol::Class(c)) if c == "Heading"));
    assert!(matches!(
        symbols.get("Consts"),
        Some(Symbol::JsValue(JsValue::Text(t))) if t == "js-default"
    ));
    assert!(matches!(
        symbols.get("size"),
        Some(Symbol::JsValue(JsValue::Text(t))) if t == "12px"
    ));
}

#[test]
fn test_redeclared_import_symbol() {
    let resolver = resolver(vec![("./a.css", sheet(":vars { name: x; }", "A", "a.css").into())]);
    let local = sheet(
        r#":import { -st-from: "./a.css"; -st-default: name; -st-named: name; }"#,
        "L",
        "l.css",
    );
    let err = resolver.resolve_symbols(&local).unwrap_err();
    assert_eq!(err, StylableError::RedeclareSymbol("name".into()));
    assert_eq!(err.to_string(), "redeclare symbol \"name\"");
}

#[test]
fn test_local_class_shadowing_import() {
    let resolver = resolver(vec![("./a.css", sheet("", "A", "a.css").into())]);
    let local = sheet(
        r#":import { -st-from: "./a.css"; -st-default: Comp; } .Comp {}"#,
        "L",
        "l.css",
    );
    assert_eq!(
        resolver.resolve_symbols(&local).unwrap_err(),
        StylableError::RedeclareSymbol("Comp".into())
    );
}

#[test]
fn test_var_colliding_with_class_reports_var() {
    let resolver = resolver(vec![]);
    let local = sheet(".color {} :vars { color: red; }", "L", "l.css");
    assert_eq!(
        resolver.resolve_symbols(&local).unwrap_err(),
        StylableError::RedeclareSymbol("color".into())
    );
}

#[test]
fn test_resolve_symbols_merges_local_names() {
    let resolver = resolver(vec![]);
    let local = sheet(":vars { a: 1px; b: value(a) solid; } .x {}", "L", "l.css");
    let symbols = resolver.resolve_symbols(&local).unwrap();
    assert!(matches!(symbols.get("b"), Some(Symbol::Var(v)) if v == "1px solid"));
    assert!(matches!(symbols.get("x"), Some(Symbol::Class(c)) if c == "x"));
    assert!(symbols.contains_key("root"));
}

// ============================================================================
// VARIABLES
// ============================================================================

#[test]
fn test_var_across_files() {
    let base = sheet(":vars { color: red; }", "Base", "base.css");
    let resolver = resolver(vec![("./base.css", base.into())]);
    let local = sheet(
        r#":import { -st-from: "./base.css"; -st-named: color as brand; } :vars { border: 1px solid value(brand); }"#,
        "L",
        "l.css",
    );
    assert_eq!(
        resolver.resolve_var(&local, "border").unwrap().as_deref(),
        Some("1px solid red")
    );
}

#[test]
fn test_var_cycle_in_one_file() {
    let resolver = resolver(vec![]);
    let local = sheet(":vars { a: value(b); b: value(a); }", "L", "l.css");
    assert!(matches!(
        resolver.resolve_var(&local, "a"),
        Err(StylableError::UnresolvableVariable(_))
    ));
}

#[test]
fn test_var_cycle_across_files() {
    let a = sheet(
        r#":import { -st-from: "./b.css"; -st-named: y; } :vars { x: value(y); }"#,
        "A",
        "a.css",
    );
    let b = sheet(
        r#":import { -st-from: "./a.css"; -st-named: x; } :vars { y: value(x); }"#,
        "B",
        "b.css",
    );
    let resolver = resolver(vec![("./a.css", a.into()), ("./b.css", b.into())]);
    let a = resolver.stylesheet("./a.css").unwrap();

    let err = resolver.resolve_var(a, "x").unwrap_err();
    assert_eq!(
        err,
        StylableError::UnresolvableVariable("x -> y -> x".into())
    );
    assert_eq!(err.to_string(), "Unresolvable variable: x -> y -> x");
}

#[test]
fn test_var_imported_back_and_forth() {
    let a = sheet(r#":import("./b.css") { -st-named: x; } .a {}"#, "A", "a.css");
    let b = sheet(r#":import("./a.css") { -st-named: x; } .b {}"#, "B", "b.css");
    let resolver = resolver(vec![("./a.css", a.into()), ("./b.css", b.into())]);
    let a = resolver.stylesheet("./a.css").unwrap();

    assert_eq!(
        resolver.resolve_var(a, "x"),
        Err(StylableError::UnresolvableVariable("x".into()))
    );
}

#[test]
fn test_var_renamed_through_imports() {
    let base = sheet(":vars { color: red; }", "Base", "base.css");
    let mid = sheet(
        r#":import("./base.css") { -st-named: color as tint; }"#,
        "Mid",
        "mid.css",
    );
    let resolver = resolver(vec![("./base.css", base.into()), ("./mid.css", mid.into())]);
    let local = sheet(
        r#":import("./mid.css") { -st-named: tint as brand; } :vars { c: value(brand); }"#,
        "L",
        "l.css",
    );
    assert_eq!(resolver.resolve_var(&local, "c").unwrap().as_deref(), Some("red"));
}

#[test]
fn test_unknown_var() {
    let resolver = resolver(vec![]);
    let local = sheet(":vars { a: 1; }", "L", "l.css");
    assert_eq!(resolver.resolve_var(&local, "b").unwrap(), None);
}

// ============================================================================
// SYMBOL DEFINITIONS
// ============================================================================

#[test]
fn test_definition_of_local_names() {
    let resolver = resolver(vec![]);
    let local = sheet(":vars { v: 1; } .c {}", "L", "l.css");

    assert_eq!(
        resolver.symbol_definition(&local, "default").unwrap().kind,
        SymbolKind::Stylesheet
    );
    assert_eq!(resolver.symbol_definition(&local, "c").unwrap().kind, SymbolKind::Class);
    assert_eq!(resolver.symbol_definition(&local, "v").unwrap().kind, SymbolKind::Var);
    assert_eq!(
        resolver.symbol_definition(&local, "nope").unwrap().kind,
        SymbolKind::NotFound
    );
}

#[test]
fn test_definition_through_reexports() {
    let a = sheet(".button {}", "A", "a.css");
    let b = sheet(r#":import { -st-from: "./a.css"; -st-named: button as Btn; }"#, "B", "b.css");
    let resolver = resolver(vec![("./a.css", a.into()), ("./b.css", b.into())]);
    let c = sheet(r#":import { -st-from: "./b.css"; -st-named: Btn; }"#, "C", "c.css");

    let definition = resolver.symbol_definition(&c, "Btn").unwrap();
    assert_eq!(definition.kind, SymbolKind::Class);
    assert_eq!(definition.local_name, "button");
    match definition.origin {
        Origin::Sheet(origin) => assert_eq!(origin.namespace, "A"),
        other => panic!("unexpected origin {other:?}"),
    }
}

#[test]
fn test_definition_of_js_export() {
    let resolver = resolver(vec![("./m.js", JsModule::new().with_export("fn", "x").into())]);
    let local = sheet(r#":import { -st-from: "./m.js"; -st-named: fn as helper; }"#, "L", "l.css");
    let definition = resolver.symbol_definition(&local, "helper").unwrap();
    assert_eq!(definition.kind, SymbolKind::JsExport);
    assert_eq!(definition.local_name, "fn");
    assert!(matches!(definition.origin, Origin::Js(_)));
}

#[test]
fn test_definition_of_default_import() {
    let resolver = resolver(vec![("./a.css", sheet("", "A", "a.css").into())]);
    let local = sheet(r#":import { -st-from: "./a.css"; -st-default: Comp; }"#, "L", "l.css");
    let definition = resolver.symbol_definition(&local, "Comp").unwrap();
    assert_eq!(definition.kind, SymbolKind::Stylesheet);
    assert!(matches!(definition.origin, Origin::Sheet(s) if s.namespace == "A"));
}

#[test]
fn test_circular_reexport() {
    let a = sheet(r#":import { -st-from: "./b.css"; -st-named: x; }"#, "A", "a.css");
    let b = sheet(r#":import { -st-from: "./a.css"; -st-named: x; }"#, "B", "b.css");
    let strict = resolver(vec![("./a.css", a.into()), ("./b.css", b.into())]);
    let a = strict.stylesheet("./a.css").unwrap();
    assert!(matches!(
        strict.symbol_definition(a, "x"),
        Err(StylableError::CircularReference(_))
    ));

    let lenient = strict.clone().with_strictness(Strictness::empty());
    let a = lenient.stylesheet("./a.css").unwrap();
    assert_eq!(
        lenient.symbol_definition(a, "x").unwrap().kind,
        SymbolKind::NotFound
    );
}
