/*!
This library matches text against grammars built from a small set of forms and
produces position-annotated parse trees.

# Grammars and Forms

A grammar maps rule names to *forms*:

| form          | matches                                                   |
|---------------|-----------------------------------------------------------|
| literal       | exactly the given text                                    |
| pattern       | a regular expression, anchored at the cursor              |
| sequence      | each form in order                                        |
| `oneOf`       | the first alternative that matches                        |
| `manyOf`      | the form one or more times, as often as possible          |
| `optional`    | the form, or nothing                                      |
| reference     | the named rule                                            |
| `except`      | the form, unless the matched text is one of the exceptions |

Grammars are described with [`RawForm`]s, usually through the [`grammar!`]
macro, and compiled into a [`Grammar`] once.
Every grammar has to define a `Root` rule, the rule name `Error` is reserved,
and every reference has to name a defined rule.
Grammars can also be [loaded from JSON][`Grammar::from_json`].

# Parsing

[`Grammar::parse`] matches the `Root` rule against the whole input.
Matching is ordered and greedy: alternatives are tried in order and the first
success wins, repetitions take as much as they can, and the matcher never
backtracks into a form that already succeeded.

A successful parse returns the [`Node`] of the root rule.
Nodes carry the rule name, the start and end [`Position`]s, and a [`Value`]:
matched text, a list of values, or further nodes for the rules that were
referenced.

A failed parse returns a [`MatchError`] with the position of the failure, the
innermost rule that was being matched and a message such as
`expected "dog"`.

# Examples

```
#[macro_use] extern crate form_grammar;
use form_grammar::generate::reference;
use form_grammar::Value;

# fn main() {
let grammar = grammar! {
    Root   = ["hot", reference("Animal")];
    Animal = one_of!["dog", "cat"];
}.unwrap();

let node = grammar.parse("hotdog").unwrap();
let animal = node.get("Animal").unwrap();
assert_eq!(animal.value, Value::Text("dog".to_owned()));
assert_eq!(animal.start.offset, 3);

let err = grammar.parse("hotcow").unwrap_err();
assert_eq!(err.rule.as_deref(), Some("Animal"));
assert_eq!(err.message(), r#"expected oneOf("dog", "cat")"#);
assert_eq!(err.position.column, 3);
# }
```

Positions count lines and columns, treating `\n`, `\r` and `\r\n` as one line
break each:

```
#[macro_use] extern crate form_grammar;
use form_grammar::Position;

# fn main() {
let grammar = grammar! {
    Root = "win\r\ndoze";
}.unwrap();

let node = grammar.parse("win\r\ndoze").unwrap();
assert_eq!(node.end, Position { offset: 9, line: 1, column: 4 });
# }
```

# Limitations

There is no memoization, so grammars with a lot of backtracking can take
exponential time. Left-recursive rules are detected and reported as
`circular reference detected` instead of being matched. Deeply nested input
recurses deeply; use [`Grammar::set_depth_limit`] when parsing untrusted
input.
*/

#![deny(missing_docs)]

#[macro_use]
pub mod generate;

mod error;
pub use crate::error::{
    ActiveReference, FormError, GrammarError, GrammarResult, MatchError, MatchResult, Reason,
};

pub mod form;
pub use crate::form::{Form, Pattern};

pub mod grammar;
pub use crate::grammar::Grammar;

pub mod lines;
pub use crate::lines::Position;

mod matcher;
pub use crate::matcher::{Match, MatchKind};

pub mod value;
pub use crate::value::{Node, Value};

pub use crate::generate::RawForm;
