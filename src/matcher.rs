/*!
Per-match state and the structural match tree.

A [`Matcher`] lives for a single call to [`Grammar::parse`] or
[`Grammar::match_form`]. It holds the source, the stack of rules currently
being matched (used to detect left recursion) and the depth limit. The
dispatch over forms lives with the grammar; the matcher provides the leaf
operations it needs.

[`Grammar::parse`]: crate::Grammar::parse
[`Grammar::match_form`]: crate::Grammar::match_form
*/

use tracing::{debug, trace};

use crate::error::{ActiveReference, MatchError, Reason};
use crate::form::{Form, Pattern};
use crate::lines::Position;

/// A successful match of a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<'a> {
    /// Where the match starts.
    pub start: Position,
    /// Where the match ends.
    pub end: Position,
    /// What was matched.
    pub kind: MatchKind<'a>,
}

/// The structure of a [`Match`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchKind<'a> {
    /// Text matched by a literal or a pattern.
    Text(&'a str),
    /// An optional form that matched nothing.
    Empty,
    /// The matches of a sequence's forms.
    Sequence(Vec<Match<'a>>),
    /// The iterations of a repetition, at least one.
    Repetition(Vec<Match<'a>>),
    /// The match of a named rule.
    Rule(&'a str, Box<Match<'a>>),
}

impl<'a> Match<'a> {
    /// Returns the source text covered by this match.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    /// Returns `true` if the match consumed no input.
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

pub(crate) type Attempt<'a> = Result<Match<'a>, Failure<'a>>;

/// A failure that has not been turned into a [`MatchError`] yet.
///
/// Failures are created and discarded often while alternatives are tried, so
/// they only borrow what they describe.
#[derive(Debug)]
pub(crate) struct Failure<'a> {
    pub rule: Option<&'a str>,
    pub cause: Cause<'a>,
    pub position: Position,
}

#[derive(Debug)]
pub(crate) enum Cause<'a> {
    Expected(&'a Form),
    TrailingSource(&'a str),
    Circular(Vec<(&'a str, usize)>),
    DepthLimit(usize),
    UndefinedRule(&'a str),
}

impl<'a> Failure<'a> {
    pub fn expected(form: &'a Form, position: Position) -> Failure<'a> {
        Failure {
            rule: None,
            cause: Cause::Expected(form),
            position,
        }
    }

    /// Fatal failures end the whole match instead of letting alternatives or
    /// optional forms recover from them.
    pub fn is_fatal(&self) -> bool {
        matches!(self.cause, Cause::DepthLimit(_))
    }

    /// Stamps the failure with `rule` unless an inner rule already did.
    pub fn within(mut self, rule: &'a str) -> Failure<'a> {
        if self.rule.is_none() {
            self.rule = Some(rule);
        }
        self
    }

    pub fn into_error(self) -> MatchError {
        let reason = match self.cause {
            Cause::Expected(form) => Reason::Expected(form.to_string()),
            Cause::TrailingSource(rule) => Reason::TrailingSource(rule.to_owned()),
            Cause::Circular(chain) => Reason::CircularReference(
                chain
                    .into_iter()
                    .map(|(rule, offset)| ActiveReference {
                        rule: rule.to_owned(),
                        offset,
                    })
                    .collect(),
            ),
            Cause::DepthLimit(limit) => Reason::DepthLimit(limit),
            Cause::UndefinedRule(name) => Reason::UndefinedRule(name.to_owned()),
        };
        MatchError {
            rule: self.rule.map(ToOwned::to_owned),
            reason,
            position: self.position,
        }
    }
}

/// The state of a single match against a source.
pub(crate) struct Matcher<'a> {
    source: &'a str,
    /// Rules currently being matched and the offsets they were entered at,
    /// outermost first.
    active: Vec<(&'a str, usize)>,
    depth_limit: Option<usize>,
}

impl<'a> Matcher<'a> {
    pub fn new(source: &'a str, depth_limit: Option<usize>) -> Matcher<'a> {
        Matcher {
            source,
            active: Vec::new(),
            depth_limit,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn rest(&self, at: Position) -> &'a str {
        self.source.get(at.offset..).unwrap_or("")
    }

    /// Consumes `len` bytes of text at `at`.
    fn consume(&self, at: Position, len: usize) -> Match<'a> {
        let text = &self.rest(at)[..len];
        Match {
            start: at,
            end: at.after(text),
            kind: MatchKind::Text(text),
        }
    }

    pub fn match_literal(&self, form: &'a Form, text: &str, at: Position) -> Attempt<'a> {
        if self.rest(at).starts_with(text) {
            Ok(self.consume(at, text.len()))
        } else {
            Err(Failure::expected(form, at))
        }
    }

    pub fn match_pattern(&self, form: &'a Form, pattern: &Pattern, at: Position) -> Attempt<'a> {
        match pattern.match_len(self.rest(at)) {
            Some(len) => Ok(self.consume(at, len)),
            None => Err(Failure::expected(form, at)),
        }
    }

    /// Marks `rule` as being matched at `at`.
    ///
    /// Fails if the rule is already being matched at the same offset, which
    /// would recurse forever, or if the depth limit is reached. Every
    /// successful `enter` must be paired with a [`leave`](Matcher::leave).
    pub fn enter(&mut self, rule: &'a str, at: Position) -> Result<(), Failure<'a>> {
        if self
            .active
            .iter()
            .any(|&(name, offset)| name == rule && offset == at.offset)
        {
            debug!("Circular reference to {} at offset {}", rule, at.offset);
            return Err(Failure {
                rule: None,
                cause: Cause::Circular(self.active.clone()),
                position: at,
            });
        }
        if let Some(limit) = self.depth_limit {
            if self.active.len() >= limit {
                debug!("Reference depth limit of {} reached at {}", limit, at);
                return Err(Failure {
                    rule: None,
                    cause: Cause::DepthLimit(limit),
                    position: at,
                });
            }
        }
        trace!("Enter {} at {}", rule, at);
        self.active.push((rule, at.offset));
        Ok(())
    }

    pub fn leave(&mut self) {
        if let Some((rule, offset)) = self.active.pop() {
            trace!("Leave {} entered at offset {}", rule, offset);
        }
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.active.len()
    }
}
