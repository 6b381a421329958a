//! Integration tests for building stylesheet symbol tables.
//!
//! Covers:
//! - Namespaces
//! - Class discovery
//! - Typed class directives and their selector restrictions
//! - Imports, variables and mixin invocations

use stylable::{MixinValue, StylableError, Stylesheet};

fn sheet(css: &str) -> Stylesheet {
    Stylesheet::from_css(css, Some("Test"), "test.st.css").unwrap()
}

// ============================================================================
// NAMESPACE
// ============================================================================

#[test]
fn test_declared_namespace() {
    let sheet = Stylesheet::from_css("@namespace \"Comp\"; .a {}", None, "").unwrap();
    assert_eq!(sheet.namespace, "Comp");
}

#[test]
fn test_explicit_namespace_wins() {
    let sheet = Stylesheet::from_css("@namespace \"Comp\";", Some("Other"), "").unwrap();
    assert_eq!(sheet.namespace, "Other");
}

#[test]
fn test_quoted_empty_namespace() {
    let sheet = Stylesheet::from_css(".a {}", Some("''"), "").unwrap();
    assert_eq!(sheet.namespace, "");
}

// ============================================================================
// CLASSES
// ============================================================================

#[test]
fn test_root_always_exists() {
    let sheet = sheet("");
    assert_eq!(sheet.classes.get("root").map(String::as_str), Some("root"));
    assert!(sheet.typed_class("root").unwrap().is_root);
}

#[test]
fn test_classes_in_complex_selectors() {
    let sheet = sheet(".a .b > .c:not(.d), .e + div {}");
    let classes: Vec<_> = sheet.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, vec!["a", "b", "c", "d", "e", "root"]);
}

#[test]
fn test_classes_inside_media() {
    let sheet = sheet("@media screen { .inside {} }");
    assert!(sheet.classes.contains_key("inside"));
}

#[test]
fn test_pseudo_elements_are_not_classes() {
    let sheet = sheet(".a::icon {}");
    assert!(!sheet.classes.contains_key("icon"));
}

// ============================================================================
// TYPED CLASSES
// ============================================================================

#[test]
fn test_states() {
    let sheet = sheet(".root { -st-states: toggled, loading; }");
    assert_eq!(
        sheet.typed_class("root").unwrap().states,
        vec!["toggled", "loading"]
    );
}

#[test]
fn test_empty_states_is_empty_list() {
    let sheet = sheet(".a { -st-states: ; }");
    let typed = sheet.typed_class("a").expect("typed entry exists");
    assert!(typed.states.is_empty());
}

#[test]
fn test_extends_variant_and_root() {
    let sheet = sheet(
        ".a { -st-extends: Button; } .b { -st-variant: true; } .c { -st-root: true; -st-variant: false; }",
    );
    assert_eq!(sheet.typed_class("a").unwrap().extends.as_deref(), Some("Button"));
    assert!(sheet.is_variant("b"));
    assert!(!sheet.is_variant("c"));
    assert!(sheet.typed_class("c").unwrap().is_root);
}

#[test]
fn test_directive_on_complex_selector() {
    let err = Stylesheet::from_css(".a .b { -st-states: x; }", Some("T"), "").unwrap_err();
    assert_eq!(
        err,
        StylableError::ComplexSelectorDirective {
            directive: "-st-states".into(),
            selector: ".a .b".into(),
        }
    );
    assert_eq!(err.to_string(), "-st-states on complex selector: .a .b");
}

#[test]
fn test_extends_on_pseudo_class_selector() {
    let err = Stylesheet::from_css(".a:hover { -st-extends: B; }", Some("T"), "").unwrap_err();
    assert!(matches!(err, StylableError::ComplexSelectorDirective { .. }));
}

#[test]
fn test_unknown_directive_on_complex_selector() {
    let err = Stylesheet::from_css("div.a { -st-unknown: 1; }", Some("T"), "").unwrap_err();
    assert!(matches!(
        err,
        StylableError::ComplexSelectorDirective { directive, .. } if directive == "-st-unknown"
    ));
}

#[test]
fn test_mixin_allowed_on_complex_selector() {
    let sheet = sheet(".a:hover { -st-mixin: big; }");
    assert_eq!(
        sheet.mixin_selectors.get(".a:hover"),
        Some(&vec![MixinValue::new("big", vec![])])
    );
}

// ============================================================================
// IMPORTS
// ============================================================================

#[test]
fn test_import_block() {
    let sheet = sheet(
        r#":import { -st-from: "./button.st.css"; -st-default: Button; -st-named: icon, label as text; }"#,
    );
    assert_eq!(sheet.imports.len(), 1);
    let import = &sheet.imports[0];
    assert_eq!(import.from, "./button.st.css");
    assert_eq!(import.default_export.as_deref(), Some("Button"));
    assert_eq!(import.named.get("icon").map(String::as_str), Some("icon"));
    assert_eq!(import.named.get("label").map(String::as_str), Some("text"));
}

#[test]
fn test_import_argument_form() {
    let sheet = sheet(
        r#":import("./a.css") { -st-default: A; } :import("./b.js") { -st-named-Theme: theme; }"#,
    );
    assert_eq!(sheet.imports.len(), 2);
    assert_eq!(sheet.imports[0].from, "./a.css");
    assert_eq!(sheet.imports[1].from, "./b.js");
    assert_eq!(
        sheet.imports[1].named.get("Theme").map(String::as_str),
        Some("theme")
    );
}

#[test]
fn test_repeated_from_blocks_keep_every_import() {
    let sheet = sheet(
        r#":import { -st-from: "./a.st.css"; -st-default: A; }
           :import { -st-from: "./b.st.css"; -st-default: B; -st-named: x; }"#,
    );
    let imports: Vec<_> = sheet
        .imports
        .iter()
        .map(|i| (i.from.as_str(), i.default_export.as_deref(), i.named.len()))
        .collect();
    assert_eq!(
        imports,
        vec![("./a.st.css", Some("A"), 0), ("./b.st.css", Some("B"), 1)]
    );
}

#[test]
fn test_import_is_not_a_class_source() {
    let sheet = sheet(r#":import { -st-from: "./a.css"; -st-default: A; }"#);
    assert_eq!(sheet.classes.len(), 1);
}

// ============================================================================
// VARIABLES AND MIXINS
// ============================================================================

#[test]
fn test_vars_later_block_overrides() {
    let sheet = sheet(":vars { a: 1; b: 2; } :vars { a: 3; }");
    assert_eq!(sheet.vars.get("a").map(String::as_str), Some("3"));
    assert_eq!(sheet.vars.get("b").map(String::as_str), Some("2"));
}

#[test]
fn test_vars_keep_raw_values() {
    let sheet = sheet(":vars { border: 1px solid value(color); }");
    assert_eq!(
        sheet.vars.get("border").map(String::as_str),
        Some("1px solid value(color)")
    );
}

#[test]
fn test_mixin_list() {
    let sheet = sheet(".a { -st-mixin: big shadow(2px, red); }");
    assert_eq!(
        sheet.mixin_selectors[".a"],
        vec![
            MixinValue::new("big", vec![]),
            MixinValue::new("shadow", vec!["2px".into(), "red".into()]),
        ]
    );
}

#[test]
fn test_later_mixin_declaration_replaces() {
    let sheet = sheet(".a { -st-mixin: first; -st-mixin: second(1); }");
    assert_eq!(
        sheet.mixin_selectors[".a"],
        vec![MixinValue::new("second", vec!["1".into()])]
    );
}

#[test]
fn test_keyframes_are_recorded() {
    let sheet = sheet("@keyframes fade { from { opacity: 0; } } @keyframes spin {}");
    assert_eq!(sheet.keyframes, vec!["fade", "spin"]);
}
