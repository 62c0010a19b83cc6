//! Tests for building and configuring `Grammar`s.

use crate::generate::{pattern, reference};
use crate::{Form, Grammar, GrammarError, Reason};

///////////////////////////////////////////////////////////////////////////////
//      Compile
///////////////////////////////////////////////////////////////////////////////

#[test]
fn compile_keeps_rule_order() {
    let grammar = grammar! {
        Root = [reference("B"), reference("A")];
        B = "b";
        A = "a";
    }
    .unwrap();
    assert_eq!(grammar.rule_names().collect::<Vec<_>>(), vec!["Root", "B", "A"]);
    assert_eq!(grammar.rule("A"), Some(&Form::Literal("a".to_owned())));
    assert_eq!(grammar.rule("C"), None);
    assert_eq!(grammar.root(), "Root");
    assert_eq!(grammar.depth_limit(), None);
}

#[test]
fn compile_reserved_name() {
    let err = grammar! {
        Root = "a";
        Error = "b";
    }
    .unwrap_err();
    if let GrammarError::ReservedName = err {
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn compile_duplicate_rule() {
    let err = Grammar::compile(vec![("Root", "a"), ("A", "b"), ("A", "c")]).unwrap_err();
    if let GrammarError::DuplicateRule { ref name } = err {
        assert_eq!(name, "A");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn compile_invalid_form() {
    let err = grammar! {
        Root = reference("Digits");
        Digits = pattern("[0-9");
    }
    .unwrap_err();
    if let GrammarError::InvalidForm { ref rule, .. } = err {
        assert_eq!(rule, "Digits");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
    assert_eq!(err.to_string(), "rule \"Digits\" has an invalid form");
}

#[test]
fn compile_missing_root() {
    let err = grammar! {
        Start = "a";
    }
    .unwrap_err();
    if let GrammarError::MissingRoot = err {
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn compile_empty() {
    let err = grammar! {}.unwrap_err();
    if let GrammarError::MissingRoot = err {
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn compile_undefined_rule() {
    let err = grammar! {
        Root = ["hot", one_of![reference("Animal"), reference("Food")]];
        Animal = "dog";
    }
    .unwrap_err();
    if let GrammarError::UndefinedRule { ref rule, ref name } = err {
        assert_eq!(rule, "Root");
        assert_eq!(name, "Food");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn compile_reports_first_problem() {
    // The reserved name is checked before the missing root.
    let err = Grammar::compile(vec![("Error", "a")]).unwrap_err();
    if let GrammarError::ReservedName = err {
    } else {
        panic!("Unexpected error: {:?}", err)
    }

    // Invalid forms are reported before undefined references.
    let err = grammar! {
        Root = reference("Nowhere");
        Bad = pattern(")");
    }
    .unwrap_err();
    if let GrammarError::InvalidForm { ref rule, .. } = err {
        assert_eq!(rule, "Bad");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

///////////////////////////////////////////////////////////////////////////////
//      Set Root
///////////////////////////////////////////////////////////////////////////////

#[test]
fn set_root() {
    let mut grammar = grammar! {
        Root = ["hot", reference("Animal")];
        Animal = "dog";
    }
    .unwrap();
    grammar.set_root("Animal").unwrap();
    assert_eq!(grammar.root(), "Animal");

    let node = grammar.parse("dog").unwrap();
    assert_eq!(node.rule, "Animal");

    let err = grammar.parse("dogs").unwrap_err();
    assert_eq!(err.reason, Reason::TrailingSource("Animal".to_owned()));
    assert_eq!(err.rule.as_deref(), Some("Animal"));
}

#[test]
fn set_root_invalid_name() {
    let mut grammar = grammar! {
        Root = "a";
    }
    .unwrap();
    let err = grammar.set_root("Leaf").unwrap_err();
    if let GrammarError::NoSuchRule { ref name } = err {
        assert_eq!(name, "Leaf");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
    assert_eq!(grammar.root(), "Root");
}

///////////////////////////////////////////////////////////////////////////////
//      Depth Limit
///////////////////////////////////////////////////////////////////////////////

#[test]
fn set_depth_limit() {
    let mut grammar = grammar! {
        Root = ["(", crate::generate::optional(reference("Root")), ")"];
    }
    .unwrap();
    grammar.set_depth_limit(Some(3));
    assert_eq!(grammar.depth_limit(), Some(3));

    assert!(grammar.parse("(())").is_ok());

    // The third nested `Root` would be the fourth active rule.
    let err = grammar.parse("((()))").unwrap_err();
    assert_eq!(err.reason, Reason::DepthLimit(3));
    assert_eq!(err.position.offset, 3);

    grammar.set_depth_limit(None);
    assert!(grammar.parse("((()))").is_ok());
}

///////////////////////////////////////////////////////////////////////////////
//      JSON
///////////////////////////////////////////////////////////////////////////////

#[test]
fn from_json() {
    let grammar = Grammar::from_json(
        r#"{
            "Root": ["star ", {"type": "OneOf", "forms": ["trek", {"type": "Ref", "name": "Wars"}]}],
            "Wars": "wars"
        }"#,
    )
    .unwrap();
    assert!(grammar.parse("star trek").is_ok());
    assert!(grammar.parse("star wars").is_ok());
    assert!(grammar.parse("star gate").is_err());
}

#[test]
fn from_json_invalid_document() {
    let err = Grammar::from_json("{\"Root\": ").unwrap_err();
    if let GrammarError::Json(_) = err {
    } else {
        panic!("Unexpected error: {:?}", err)
    }

    let err = Grammar::from_json("[\"Root\"]").unwrap_err();
    if let GrammarError::NotAMapping { ref found } = err {
        assert_eq!(found, "an array");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn from_json_invalid_rule() {
    let err = Grammar::from_json(r#"{"Root": {"type": "Ref", "name": "A"}, "A": null}"#)
        .unwrap_err();
    if let GrammarError::InvalidForm { ref rule, .. } = err {
        assert_eq!(rule, "A");
    } else {
        panic!("Unexpected error: {:?}", err)
    }
}

#[test]
fn to_json_reads_back() {
    let grammar = grammar! {
        Root = ["[", crate::generate::optional(crate::generate::separated(reference("Digit"), ",")), "]"];
        Digit = pattern("[0-9]");
    }
    .unwrap();
    let reloaded = Grammar::from_json_value(grammar.to_json()).unwrap();
    for name in grammar.rule_names() {
        assert_eq!(grammar.rule(name), reloaded.rule(name));
    }
}
