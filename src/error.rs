/*!
This module provides error types and result types using them.

Errors come in two phases. Building a [`Grammar`] can fail with a
[`GrammarError`] (possibly wrapping a [`FormError`] for the offending rule).
Matching input against a compiled grammar can fail with a [`MatchError`],
which carries the position of the failure, the innermost rule that was being
matched, and a [`Reason`].

[`Grammar`]: crate::Grammar
*/

use std::fmt;
use std::result;

use thiserror::Error;

use crate::form::write_quoted;
use crate::lines::Position;

/// The result of building a grammar, holding either the desired return value
/// (`Ok`) or a [`GrammarError`] (`Err`).
///
/// ```
/// # #[macro_use] extern crate form_grammar;
/// # fn main() {
/// use form_grammar::GrammarError;
///
/// let result = grammar! {
///     Start = "hotdog";
/// };
///
/// match result {
///     Ok(grammar) => {
///         // Parse something with `grammar`.
///         # let _ = grammar;
///     }
///     Err(GrammarError::MissingRoot) => {
///         // Every grammar needs a `Root` rule.
///     }
///     # Err(_) => unreachable!(),
/// }
/// # }
/// ```
pub type GrammarResult<T> = result::Result<T, GrammarError>;

/// The result of matching input against a grammar, holding either the desired
/// return value (`Ok`) or a [`MatchError`] (`Err`).
///
/// ```
/// # #[macro_use] extern crate form_grammar;
/// # fn main() {
/// let grammar = grammar! {
///     Root = "hotdog";
/// }.unwrap();
///
/// match grammar.parse("hotcat") {
///     Ok(node) => {
///         // Do something with `node`.
///         # let _ = node;
///     }
///     Err(err) => {
///         assert_eq!(err.message(), "expected \"hotdog\"");
///         assert_eq!(err.rule.as_deref(), Some("Root"));
///         assert_eq!(err.position.offset, 0);
///     }
/// }
/// # }
/// ```
pub type MatchResult<T> = result::Result<T, MatchError>;

/// An error in a single form description.
#[derive(Debug, Error)]
pub enum FormError {
    /// The value cannot be interpreted as a form.
    #[error("unsupported form: {shape}")]
    Unsupported {
        /// A short description of the offending value.
        shape: String,
    },
    /// A regular expression failed to compile.
    #[error("invalid pattern /{pattern}/")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// The error reported by the regex engine.
        source: regex::Error,
    },
}

/// An error that occurred while building a grammar.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// A rule used the reserved name `Error`.
    #[error("the rule name \"Error\" is reserved")]
    ReservedName,
    /// Two rules share a name.
    #[error("rule \"{name}\" is defined more than once")]
    DuplicateRule {
        /// The repeated name.
        name: String,
    },
    /// The form of a rule could not be normalized.
    #[error("rule \"{rule}\" has an invalid form")]
    InvalidForm {
        /// The rule whose form is invalid.
        rule: String,
        /// What was wrong with the form.
        source: FormError,
    },
    /// The grammar has no `Root` rule.
    #[error("grammar has no \"Root\" rule")]
    MissingRoot,
    /// A reference names a rule that does not exist.
    #[error("rule \"{rule}\" references undefined rule \"{name}\"")]
    UndefinedRule {
        /// The rule containing the reference.
        rule: String,
        /// The missing rule.
        name: String,
    },
    /// A rule was requested by name but does not exist.
    #[error("no rule named \"{name}\"")]
    NoSuchRule {
        /// The requested name.
        name: String,
    },
    /// A JSON grammar description was not an object.
    #[error("a grammar description must be an object, found {found}")]
    NotAMapping {
        /// The kind of JSON value found instead.
        found: String,
    },
    /// A JSON grammar description could not be read.
    #[error("invalid grammar description")]
    Json(#[from] serde_json::Error),
}

/// A reference that is being matched, as recorded by the cycle guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveReference {
    /// The referenced rule.
    pub rule: String,
    /// The byte offset at which the rule was entered.
    pub offset: usize,
}

impl fmt::Display for ActiveReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ref(")?;
        write_quoted(f, &self.rule)?;
        write!(f, ") @ {}", self.offset)
    }
}

/// Why a match failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Reason {
    /// The input did not match a form; holds the form's rendering.
    #[error("expected {0}")]
    Expected(String),
    /// A rule was re-entered at the same offset; holds the active references,
    /// outermost first.
    #[error("circular reference detected {{{}}}", chain(.0))]
    CircularReference(Vec<ActiveReference>),
    /// The entry rule matched but did not consume the whole input; holds the
    /// entry rule's name.
    #[error("unexpected source after {0}")]
    TrailingSource(String),
    /// References were nested deeper than the configured limit.
    #[error("reference depth limit of {0} exceeded")]
    DepthLimit(usize),
    /// A form referenced a rule the grammar does not define.
    #[error("undefined rule {0:?}")]
    UndefinedRule(String),
}

fn chain(references: &[ActiveReference]) -> String {
    references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An error that occurred while matching input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason} at {position}")]
pub struct MatchError {
    /// The innermost rule being matched when the failure occurred, if any.
    pub rule: Option<String>,
    /// What went wrong.
    pub reason: Reason,
    /// Where it went wrong.
    pub position: Position,
}

impl MatchError {
    /// Returns the failure message without its position, e.g.
    /// `expected "hotdog"`.
    pub fn message(&self) -> String {
        self.reason.to_string()
    }
}
