/*!
Compiled grammars.

A [`Grammar`] is an ordered set of named rules, each holding a normalized
[`Form`]. It is validated once when compiled and immutable afterwards, so a
single grammar can serve any number of parses, also from several threads.

Matching is a recursive descent with ordered choice: alternatives are tried in
order and the first one that succeeds wins, repetitions are greedy, and
nothing that succeeded is ever reconsidered. Left recursion is reported as an
error instead of recursing forever.
*/

use std::collections::HashMap;

use serde_json::Value as Json;
use tracing::debug;

use crate::error::{GrammarError, GrammarResult, MatchResult};
use crate::form::Form;
use crate::generate::RawForm;
use crate::lines::Position;
use crate::matcher::{Attempt, Cause, Failure, Match, MatchKind, Matcher};
use crate::value::Node;

/// The name of the rule every grammar has to define.
pub const ROOT: &str = "Root";

/// A rule name grammars must not use.
pub const RESERVED: &str = "Error";

#[derive(Clone, Debug)]
struct Rule {
    name: String,
    form: Form,
}

/// A compiled grammar.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    by_name: HashMap<String, usize>,
    root: String,
    depth_limit: Option<usize>,
}

impl Grammar {
    /// Compiles a grammar from `(name, form)` pairs.
    ///
    /// Fails if
    ///
    /// - a rule is called `Error`,
    /// - two rules have the same name,
    /// - a form is malformed or contains an invalid pattern,
    /// - there is no `Root` rule, or
    /// - a reference names an undefined rule.
    ///
    /// The checks are made in this order.
    ///
    /// ```
    /// use form_grammar::generate::reference;
    /// use form_grammar::{Grammar, GrammarError, RawForm};
    ///
    /// let grammar = Grammar::compile(vec![
    ///     ("Root", RawForm::from(vec![RawForm::from("hot"), reference("Animal")])),
    ///     ("Animal", RawForm::from("dog")),
    /// ]);
    /// assert!(grammar.is_ok());
    ///
    /// let grammar = Grammar::compile(vec![("Root", reference("Animal"))]);
    /// match grammar {
    ///     Err(GrammarError::UndefinedRule { rule, name }) => {
    ///         assert_eq!(rule, "Root");
    ///         assert_eq!(name, "Animal");
    ///     }
    ///     _ => panic!("expected an undefined rule"),
    /// }
    /// ```
    pub fn compile<I, N, F>(rules: I) -> GrammarResult<Grammar>
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<RawForm>,
    {
        let mut compiled = Vec::new();
        let mut by_name = HashMap::new();
        for (name, form) in rules {
            let name = name.into();
            if name == RESERVED {
                return Err(GrammarError::ReservedName);
            }
            if by_name.contains_key(&name) {
                return Err(GrammarError::DuplicateRule { name });
            }
            let form = match Form::normalize(form.into()) {
                Ok(form) => form,
                Err(source) => return Err(GrammarError::InvalidForm { rule: name, source }),
            };
            by_name.insert(name.clone(), compiled.len());
            compiled.push(Rule { name, form });
        }

        if !by_name.contains_key(ROOT) {
            return Err(GrammarError::MissingRoot);
        }
        for rule in &compiled {
            if let Some(name) = rule
                .form
                .references()
                .into_iter()
                .find(|name| !by_name.contains_key(*name))
            {
                return Err(GrammarError::UndefinedRule {
                    rule: rule.name.clone(),
                    name: name.to_owned(),
                });
            }
        }

        debug!("Compiled grammar with {} rules", compiled.len());
        Ok(Grammar {
            rules: compiled,
            by_name,
            root: ROOT.to_owned(),
            depth_limit: None,
        })
    }

    /// Compiles a grammar from a JSON document mapping rule names to form
    /// descriptions.
    ///
    /// See [`RawForm::from_json`] for the form syntax.
    ///
    /// ```
    /// use form_grammar::Grammar;
    ///
    /// let grammar = Grammar::from_json(r#"{
    ///     "Root": ["hot", {"type": "Ref", "name": "Animal"}],
    ///     "Animal": {"type": "RegularExpression", "pattern": "dog|cat"}
    /// }"#).unwrap();
    ///
    /// assert!(grammar.parse("hotcat").is_ok());
    /// ```
    ///
    /// [`RawForm::from_json`]: crate::RawForm::from_json
    pub fn from_json(json: &str) -> GrammarResult<Grammar> {
        let value: Json = serde_json::from_str(json)?;
        Grammar::from_json_value(value)
    }

    /// Compiles a grammar from a parsed JSON document, see
    /// [`from_json`](Grammar::from_json).
    pub fn from_json_value(value: Json) -> GrammarResult<Grammar> {
        match value {
            Json::Object(rules) => Grammar::compile(
                rules.into_iter().map(|(name, form)| (name, RawForm::Json(form))),
            ),
            Json::Null => Err(not_a_mapping("null")),
            Json::Bool(_) => Err(not_a_mapping("a boolean")),
            Json::Number(_) => Err(not_a_mapping("a number")),
            Json::String(_) => Err(not_a_mapping("a string")),
            Json::Array(_) => Err(not_a_mapping("an array")),
        }
    }

    /// Describes the grammar as a JSON document that
    /// [`from_json_value`](Grammar::from_json_value) reads back.
    ///
    /// Only the rules are described; the root and depth limit are not.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.rules
                .iter()
                .map(|rule| (rule.name.clone(), rule.form.to_json()))
                .collect(),
        )
    }

    /// Sets the rule [`parse`](Grammar::parse) starts with.
    ///
    /// By default, this is `Root`.
    pub fn set_root(&mut self, name: &str) -> GrammarResult<()> {
        if !self.by_name.contains_key(name) {
            return Err(GrammarError::NoSuchRule {
                name: name.to_owned(),
            });
        }
        self.root = name.to_owned();
        Ok(())
    }

    /// Limits how deeply references may nest during a match.
    ///
    /// Exceeding the limit fails the whole match, even inside alternatives or
    /// optional forms. `None` removes the limit, which is the default.
    pub fn set_depth_limit(&mut self, limit: Option<usize>) {
        self.depth_limit = limit;
    }

    /// Returns the form of the rule called `name`.
    pub fn rule(&self, name: &str) -> Option<&Form> {
        self.by_name.get(name).map(|&index| &self.rules[index].form)
    }

    /// Returns the names of all rules in definition order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Returns the name of the rule [`parse`](Grammar::parse) starts with.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the configured depth limit.
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Parses `source`, which has to be matched completely by the root rule.
    ///
    /// ```
    /// # #[macro_use] extern crate form_grammar;
    /// # fn main() {
    /// let grammar = grammar! {
    ///     Root = "hotdog";
    /// }.unwrap();
    ///
    /// let node = grammar.parse("hotdog").unwrap();
    /// assert_eq!(node.rule, "Root");
    /// assert_eq!(node.end.offset, 6);
    ///
    /// let err = grammar.parse("hotdog in your mouth").unwrap_err();
    /// assert_eq!(err.to_string(), "unexpected source after Root at 0:6");
    /// # }
    /// ```
    ///
    /// Every active rule takes up stack space, so without a depth limit a
    /// deeply nested source can overflow the stack of the calling thread.
    /// Set a limit with [`set_depth_limit`](Grammar::set_depth_limit) before
    /// parsing untrusted input; exceeding it fails with
    /// [`Reason::DepthLimit`](crate::Reason::DepthLimit).
    ///
    /// ```
    /// # #[macro_use] extern crate form_grammar;
    /// # use form_grammar::generate::{optional, reference};
    /// # use form_grammar::Reason;
    /// # fn main() {
    /// let mut grammar = grammar! {
    ///     Root = ["(", optional(reference("Root")), ")"];
    /// }.unwrap();
    /// grammar.set_depth_limit(Some(16));
    ///
    /// let source = format!("{}{}", "(".repeat(10_000), ")".repeat(10_000));
    /// let err = grammar.parse(&source).unwrap_err();
    /// assert_eq!(err.reason, Reason::DepthLimit(16));
    /// # }
    /// ```
    pub fn parse(&self, source: &str) -> MatchResult<Node> {
        let mut matcher = Matcher::new(source, self.depth_limit);
        let result = self
            .attempt_body(&self.root, &mut matcher, Position::START)
            .and_then(|(rule, body)| {
                if body.end.offset < source.len() {
                    Err(Failure {
                        rule: Some(rule),
                        cause: Cause::TrailingSource(rule),
                        position: body.end,
                    })
                } else {
                    Ok(Node {
                        rule: rule.to_owned(),
                        value: body.as_value(),
                        start: Position::START,
                        end: body.end,
                    })
                }
            });
        result.map_err(|failure| {
            let err = failure.into_error();
            debug!("Parse failed: {}", err);
            err
        })
    }

    /// Matches a single form at `at`, without requiring the whole source to
    /// be consumed.
    ///
    /// References in `form` are resolved against this grammar. `at` has to
    /// lie on a character boundary of `source`, and its line and column should
    /// have been computed by the [position tracker](crate::lines).
    ///
    /// ```
    /// use form_grammar::generate::optional;
    /// use form_grammar::{Form, Grammar, MatchKind, Position};
    ///
    /// let grammar = Grammar::compile(vec![("Root", "x")]).unwrap();
    /// let form = Form::normalize(optional("maeby")).unwrap();
    ///
    /// let m = grammar.match_form(&form, "", Position::START).unwrap();
    /// assert_eq!(m.kind, MatchKind::Empty);
    /// assert_eq!(m.end, Position::START);
    /// ```
    pub fn match_form<'a>(
        &'a self,
        form: &'a Form,
        source: &'a str,
        at: Position,
    ) -> MatchResult<Match<'a>> {
        if !source.is_char_boundary(at.offset) {
            return Err(Failure::expected(form, at).into_error());
        }
        let mut matcher = Matcher::new(source, self.depth_limit);
        self.attempt(form, &mut matcher, at)
            .map_err(Failure::into_error)
    }

    /// Matches the rule called `name`, wrapping the result in a rule match.
    fn attempt_rule<'a>(
        &'a self,
        name: &'a str,
        matcher: &mut Matcher<'a>,
        at: Position,
    ) -> Attempt<'a> {
        let (name, body) = self.attempt_body(name, matcher, at)?;
        Ok(Match {
            start: at,
            end: body.end,
            kind: MatchKind::Rule(name, Box::new(body)),
        })
    }

    /// Matches the form of the rule called `name` and returns the rule's
    /// name along with the match of its form.
    fn attempt_body<'a>(
        &'a self,
        name: &'a str,
        matcher: &mut Matcher<'a>,
        at: Position,
    ) -> Result<(&'a str, Match<'a>), Failure<'a>> {
        let rule = match self.by_name.get(name) {
            Some(&index) => &self.rules[index],
            None => {
                return Err(Failure {
                    rule: None,
                    cause: Cause::UndefinedRule(name),
                    position: at,
                })
            }
        };
        let name = rule.name.as_str();
        matcher.enter(name, at)?;
        let result = self.attempt(&rule.form, matcher, at);
        matcher.leave();
        result
            .map(|body| (name, body))
            .map_err(|failure| failure.within(name))
    }

    fn attempt<'a>(
        &'a self,
        form: &'a Form,
        matcher: &mut Matcher<'a>,
        at: Position,
    ) -> Attempt<'a> {
        match *form {
            Form::Literal(ref text) => matcher.match_literal(form, text, at),
            Form::Pattern(ref pattern) => matcher.match_pattern(form, pattern, at),
            Form::Sequence(ref forms) => {
                let mut matches = Vec::with_capacity(forms.len());
                let mut cursor = at;
                for inner in forms {
                    let m = self.attempt(inner, matcher, cursor)?;
                    cursor = m.end;
                    matches.push(m);
                }
                Ok(Match {
                    start: at,
                    end: cursor,
                    kind: MatchKind::Sequence(matches),
                })
            }
            Form::OneOf(ref forms) => {
                for inner in forms {
                    match self.attempt(inner, matcher, at) {
                        Ok(m) => return Ok(m),
                        Err(failure) if failure.is_fatal() => return Err(failure),
                        Err(_) => {}
                    }
                }
                Err(Failure::expected(form, at))
            }
            Form::ManyOf(ref inner) => {
                let mut matches = Vec::new();
                let mut cursor = at;
                loop {
                    match self.attempt(inner, matcher, cursor) {
                        Ok(m) => {
                            let progressed = m.end.offset > cursor.offset;
                            cursor = m.end;
                            matches.push(m);
                            // An iteration that consumed nothing would repeat
                            // forever.
                            if !progressed {
                                break;
                            }
                        }
                        Err(failure) if failure.is_fatal() => return Err(failure),
                        Err(_) => break,
                    }
                }
                if matches.is_empty() {
                    return Err(Failure::expected(form, at));
                }
                Ok(Match {
                    start: at,
                    end: cursor,
                    kind: MatchKind::Repetition(matches),
                })
            }
            Form::Optional(ref inner) => match self.attempt(inner, matcher, at) {
                Ok(m) => Ok(m),
                Err(failure) if failure.is_fatal() => Err(failure),
                Err(_) => Ok(Match {
                    start: at,
                    end: at,
                    kind: MatchKind::Empty,
                }),
            },
            Form::Reference(ref name) => self.attempt_rule(name, matcher, at),
            Form::Except {
                form: ref inner,
                ref exclusions,
            } => {
                let m = self.attempt(inner, matcher, at)?;
                let consumed = m.text(matcher.source());
                if exclusions.iter().any(|exclusion| exclusion == consumed) {
                    return Err(Failure::expected(form, at));
                }
                Ok(m)
            }
        }
    }
}

fn not_a_mapping(found: &str) -> GrammarError {
    GrammarError::NotAMapping {
        found: found.to_owned(),
    }
}
