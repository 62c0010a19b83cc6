//! The structural matches behind a parse, and the values projected from them.

/// Defines tests for a grammar preparation step.
///
/// All tests are run for each preparation that is given via an invocation of
/// this macro.
macro_rules! run_tests {
    ($name:ident, $prepare:path) => {
        mod $name {
            use crate::generate::{many_of, optional, pattern, reference};
            use crate::tests::parse::pos;
            use crate::{Form, Grammar, GrammarResult, MatchKind, Position, Reason, Value};

            fn build(grammar: GrammarResult<Grammar>) -> Grammar {
                $prepare(grammar.unwrap())
            }

            fn text(s: &str) -> Value {
                Value::Text(s.to_owned())
            }

// Start of macro-instantiated module.

///////////////////////////////////////////////////////////////////////////////
//      Matches
///////////////////////////////////////////////////////////////////////////////

#[test]
fn match_structure() {
    let grammar = build(grammar! {
        Root = "x";
        Animal = "dog";
    });
    let form = Form::normalize(form!(["hot", many_of(reference("Animal"))])).unwrap();
    let m = grammar.match_form(&form, "hotdogdog!", Position::START).unwrap();
    assert_eq!(m.end, pos(9, 0, 9));

    if let MatchKind::Sequence(ref parts) = m.kind {
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].kind, MatchKind::Text("hot"));
        if let MatchKind::Repetition(ref animals) = parts[1].kind {
            assert_eq!(animals.len(), 2);
            assert_eq!(animals[1].start, pos(6, 0, 6));
            if let MatchKind::Rule(name, ref inner) = animals[1].kind {
                assert_eq!(name, "Animal");
                assert_eq!(inner.kind, MatchKind::Text("dog"));
            } else {
                panic!("Unexpected match: {:?}", animals[1])
            }
        } else {
            panic!("Unexpected match: {:?}", parts[1])
        }
    } else {
        panic!("Unexpected match: {:?}", m)
    }
}

#[test]
fn match_form_does_not_require_full_input() {
    let grammar = build(grammar! {
        Root = "x";
    });
    let form = Form::normalize(form!(pattern("[a-z]+"))).unwrap();
    let m = grammar.match_form(&form, "hot dog", Position::START).unwrap();
    assert_eq!(m.text("hot dog"), "hot");

    let at = pos(4, 0, 4);
    let m = grammar.match_form(&form, "hot dog", at).unwrap();
    assert_eq!(m.start, at);
    assert_eq!(m.text("hot dog"), "dog");
}

#[test]
fn match_form_undefined_rule() {
    let grammar = build(grammar! {
        Root = "x";
    });
    let form = Form::Reference("Missing".to_owned());
    let err = grammar.match_form(&form, "x", Position::START).unwrap_err();
    assert_eq!(err.reason, Reason::UndefinedRule("Missing".to_owned()));
}

#[test]
fn match_form_inside_character() {
    let grammar = build(grammar! {
        Root = "x";
    });
    let form = Form::Literal("ㅋ".to_owned());
    assert!(grammar.match_form(&form, "ㅋ", pos(1, 0, 1)).is_err());
}

#[test]
fn empty_optional_match() {
    let grammar = build(grammar! {
        Root = "x";
    });
    let form = Form::normalize(optional("maeby")).unwrap();
    let m = grammar.match_form(&form, "", Position::START).unwrap();
    assert_eq!(m.kind, MatchKind::Empty);
    assert!(m.is_empty());
    assert_eq!(m.as_value(), text(""));
}

///////////////////////////////////////////////////////////////////////////////
//      Values
///////////////////////////////////////////////////////////////////////////////

#[test]
fn nested_sequences_are_spliced() {
    let grammar = build(grammar! {
        Root = ["a", ["b", ["c", "d"]], "e"];
    });
    let node = grammar.parse("abcde").unwrap();
    assert_eq!(
        node.value,
        Value::List(vec![text("a"), text("b"), text("c"), text("d"), text("e")])
    );
}

#[test]
fn single_values_collapse() {
    let grammar = build(grammar! {
        Root = ["(", optional(reference("Word")), ")"];
        Word = [pattern("[a-z]+"), optional("!")];
    });

    let node = grammar.parse("(hot)").unwrap();
    let word = node.get("Word").unwrap();
    assert_eq!(word.value, text("hot"));

    let node = grammar.parse("(hot!)").unwrap();
    let word = node.get("Word").unwrap();
    assert_eq!(word.value, Value::List(vec![text("hot"), text("!")]));
}

#[test]
fn nodes_are_not_spliced() {
    let grammar = build(grammar! {
        Root = many_of(reference("Pair"));
        Pair = [pattern("[a-z]"), pattern("[0-9]")];
    });
    let source = "a1b2";
    let node = grammar.parse(source).unwrap();
    let pairs = node.get_all("Pair");
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[1].text(source), "b2");
    assert_eq!(pairs[1].value, Value::List(vec![text("b"), text("2")]));
    assert_eq!(node.children(), pairs);
}

#[test]
fn node_lookup_by_path() {
    let grammar = build(grammar! {
        Root = [reference("Head"), reference("Body")];
        Head = ["<", reference("Name"), ">"];
        Body = many_of(reference("Name"));
        Name = pattern("[a-z]+ ?");
    });
    let source = "<title>hot dog";
    let node = grammar.parse(source).unwrap();

    assert_eq!(node.get("Head.Name").unwrap().text(source), "title");
    assert_eq!(node.get("Body.Name").unwrap().text(source), "hot ");
    assert_eq!(node.get("Body").unwrap().get_all("Name").len(), 2);
    assert!(node.get("Name").is_none());
    assert!(node.get("Head.Body").is_none());
    assert!(node.child("Body").unwrap().value.as_list().is_some());
}

#[test]
fn node_positions_span_lines() {
    let grammar = build(grammar! {
        Root = [reference("Line"), many_of([pattern("\r\n|\r|\n"), reference("Line")])];
        Line = pattern("[a-z]+");
    });
    let source = "hot\r\ndog\rs";
    let node = grammar.parse(source).unwrap();
    let lines = node.get_all("Line");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].start, pos(5, 1, 0));
    assert_eq!(lines[1].end, pos(8, 1, 3));
    assert_eq!(lines[2].start, pos(9, 2, 0));
    assert_eq!(node.end, pos(10, 2, 1));
}

// End of macro-instantiated module.
        }
    };
}

run_tests!(compiled, crate::tests::parse::compiled);
run_tests!(reloaded, crate::tests::parse::reloaded);
