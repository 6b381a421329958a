//! Integration tests for selector parsing and serialization.

use stcss::{Combinator, Selector, StcssError, parse_selector_list};

// ============================================================================
// SIMPLE SELECTORS
// ============================================================================

#[test]
fn test_class_selector() {
    let list = parse_selector_list(".btn-primary").unwrap();
    assert_eq!(
        list.selectors[0].parts[0].compound.selectors[0],
        Selector::Class("btn-primary".to_string())
    );
}

#[test]
fn test_type_and_id() {
    let list = parse_selector_list("div#main").unwrap();
    assert_eq!(
        list.selectors[0].parts[0].compound.selectors,
        vec![Selector::Type("div".into()), Selector::Id("main".into())]
    );
}

#[test]
fn test_attribute_selector_is_raw() {
    let list = parse_selector_list(".a[data-x=\"1\"]").unwrap();
    assert_eq!(
        list.selectors[0].parts[0].compound.selectors[1],
        Selector::Attribute("data-x=\"1\"".into())
    );
}

#[test]
fn test_import_pseudo_class_argument() {
    let list = parse_selector_list(":import(\"./button.css\")").unwrap();
    assert_eq!(
        list.selectors[0].parts[0].compound.selectors[0],
        Selector::PseudoClass {
            name: "import".into(),
            argument: Some("\"./button.css\"".into()),
        }
    );
}

#[test]
fn test_global_keeps_raw_argument() {
    let list = parse_selector_list(":global(.a > .b)").unwrap();
    assert_eq!(
        list.selectors[0].parts[0].compound.selectors[0],
        Selector::PseudoClass {
            name: "global".into(),
            argument: Some(".a > .b".into()),
        }
    );
}

// ============================================================================
// COMBINATORS AND LISTS
// ============================================================================

#[test]
fn test_combinators() {
    let list = parse_selector_list(".a .b > .c + .d ~ .e").unwrap();
    let combinators: Vec<_> = list.selectors[0]
        .parts
        .iter()
        .map(|p| p.combinator)
        .collect();
    assert_eq!(
        combinators,
        vec![
            Combinator::Descendant,
            Combinator::Child,
            Combinator::AdjacentSibling,
            Combinator::GeneralSibling,
            Combinator::None,
        ]
    );
}

#[test]
fn test_selector_list() {
    let list = parse_selector_list(".a,.b ,  .c").unwrap();
    assert_eq!(list.selectors.len(), 3);
}

#[test]
fn test_serialization_is_normalized() {
    let list = parse_selector_list(".a>.b   .c,.d::e:hover").unwrap();
    assert_eq!(list.to_string(), ".a > .b .c, .d::e:hover");
}

#[test]
fn test_trailing_garbage_is_an_error() {
    assert_eq!(
        parse_selector_list(".a %"),
        Err(StcssError::InvalidSelector(".a %".into()))
    );
}

#[test]
fn test_keyframe_offsets_are_not_selectors() {
    assert!(parse_selector_list("50%").is_err());
}
