/*!
Semantic values projected from matches.

A [`Match`] records how the input was matched. Its [value](Match::as_value)
keeps only what a consumer of the parse is interested in: the matched text
and the named rules, in a shape that mirrors the grammar.

The projection follows a few rules:

- a literal or pattern match becomes its text, an empty optional match
  becomes empty text,
- a sequence or repetition becomes a list of its children's values, where
  empty values are dropped, nested lists are spliced into the enclosing list
  and a list of exactly one element is replaced by that element,
- a rule match becomes a [`Node`].

Values serialize with `serde` as plain JSON: text as strings, lists as
arrays and nodes as `{"ref", "value", "start", "end"}` objects.
*/

use std::ops::Range;

use serde::Serialize;

use crate::lines::Position;
use crate::matcher::{Match, MatchKind};

/// The semantic value of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Matched text.
    Text(String),
    /// The values of several forms.
    List(Vec<Value>),
    /// A matched rule.
    Node(Box<Node>),
}

/// A matched rule and its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// The name of the rule.
    #[serde(rename = "ref")]
    pub rule: String,
    /// The value of the rule's form.
    pub value: Value,
    /// Where the match starts.
    pub start: Position,
    /// Where the match ends.
    pub end: Position,
}

impl<'a> Match<'a> {
    /// Projects the match onto its semantic value.
    pub fn as_value(&self) -> Value {
        match self.kind {
            MatchKind::Text(text) => Value::Text(text.to_owned()),
            MatchKind::Empty => Value::Text(String::new()),
            MatchKind::Sequence(ref children) | MatchKind::Repetition(ref children) => {
                let mut values = Vec::with_capacity(children.len());
                for child in children {
                    match child.as_value() {
                        Value::List(list) => values.extend(list),
                        value => {
                            if !value.is_empty() {
                                values.push(value)
                            }
                        }
                    }
                }
                if values.len() == 1 {
                    if let Some(value) = values.pop() {
                        return value;
                    }
                }
                Value::List(values)
            }
            MatchKind::Rule(rule, ref inner) => Value::Node(Box::new(Node {
                rule: rule.to_owned(),
                value: inner.as_value(),
                start: self.start,
                end: self.end,
            })),
        }
    }

    /// Projects a rule match onto its [`Node`], or returns `None` for any
    /// other kind of match.
    pub fn as_node(&self) -> Option<Node> {
        match self.as_value() {
            Value::Node(node) => Some(*node),
            _ => None,
        }
    }
}

impl Value {
    /// Returns `true` for empty text and empty lists.
    pub fn is_empty(&self) -> bool {
        match *self {
            Value::Text(ref text) => text.is_empty(),
            Value::List(ref list) => list.is_empty(),
            Value::Node(_) => false,
        }
    }

    /// Returns the text, if the value is text.
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Value::Text(ref text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the elements, if the value is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match *self {
            Value::List(ref list) => Some(list.as_slice()),
            _ => None,
        }
    }

    /// Returns the node, if the value is a node.
    pub fn as_node(&self) -> Option<&Node> {
        match *self {
            Value::Node(ref node) => Some(&**node),
            _ => None,
        }
    }

    /// Returns the outermost nodes in this value, in order.
    ///
    /// Nodes nested inside other nodes are not included.
    pub fn nodes(&self) -> Vec<&Node> {
        match *self {
            Value::Text(_) => Vec::new(),
            Value::List(ref list) => list.iter().flat_map(Value::nodes).collect(),
            Value::Node(ref node) => vec![&**node],
        }
    }
}

impl Node {
    /// Returns the nodes of the rules matched directly by this rule.
    pub fn children(&self) -> Vec<&Node> {
        self.value.nodes()
    }

    /// Returns the first direct child matched by `rule`.
    pub fn child(&self, rule: &str) -> Option<&Node> {
        self.value.nodes().into_iter().find(|node| node.rule == rule)
    }

    /// Returns all direct children matched by `rule`.
    pub fn get_all(&self, rule: &str) -> Vec<&Node> {
        self.value
            .nodes()
            .into_iter()
            .filter(|node| node.rule == rule)
            .collect()
    }

    /// Follows a dot-separated path of rule names through nested children.
    ///
    /// ```
    /// # #[macro_use] extern crate form_grammar;
    /// # fn main() {
    /// use form_grammar::generate::reference;
    ///
    /// let grammar = grammar! {
    ///     Root = ["(", reference("Pair"), ")"];
    ///     Pair = [reference("Word"), ",", reference("Word")];
    ///     Word = form_grammar::generate::pattern("[a-z]+");
    /// }.unwrap();
    ///
    /// let source = "(hot,dog)";
    /// let root = grammar.parse(source).unwrap();
    /// assert_eq!(root.get("Pair.Word").unwrap().text(source), "hot");
    /// assert!(root.get("Word").is_none());
    /// # }
    /// ```
    pub fn get(&self, path: &str) -> Option<&Node> {
        path.split('.')
            .try_fold(self, |node, rule| node.child(rule))
    }

    /// Returns the text this node was matched against.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    /// Returns the byte range this node was matched against.
    pub fn span(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }
}
