//! Building blocks for describing grammars.
//!
//! Grammars are described with [`RawForm`] values, which are normalized into
//! [`Form`]s when a [`Grammar`] is compiled. Raw forms can be written with
//! plain Rust values (`"hot"`, `42`, `vec!["hot", "dog"]`), the builder
//! functions in this module, the list macros ([`seq!`], [`one_of!`],
//! [`many_of!`], ...) or loaded from JSON.
//!
//! The [`grammar!`] macro ties everything together:
//!
//! ```
//! # #[macro_use] extern crate form_grammar;
//! # fn main() {
//! use form_grammar::generate::{optional, reference, separated};
//!
//! let list = grammar! {
//!     Root = ["[", optional(separated(reference("Digit"), ",")), "]"];
//!     Digit = one_of!["1", "2", "3"];
//! }.unwrap();
//!
//! assert!(list.parse("[1,2,3]").is_ok());
//! assert!(list.parse("[1,]").is_err());
//! # }
//! ```
//!
//! [`Form`]: crate::Form
//! [`Grammar`]: crate::Grammar

use regex::Regex;
use serde_json::Value as Json;

use crate::error::FormError;
use crate::form::Form;

/// A grammar form as written, before normalization.
#[derive(Clone, Debug)]
pub enum RawForm {
    /// Matches the exact text.
    Literal(String),
    /// Matches every form in order.
    Sequence(Vec<RawForm>),
    /// A regular expression, compiled during normalization.
    Pattern(String),
    /// An already compiled regular expression.
    Regex(Regex),
    /// Matches the first alternative that succeeds.
    OneOf(Vec<RawForm>),
    /// Matches the form one or more times.
    ManyOf(Box<RawForm>),
    /// Matches the form or nothing.
    Optional(Box<RawForm>),
    /// Matches the named rule.
    Reference(String),
    /// Matches the form unless the consumed text is one of the exclusions.
    Except(Box<RawForm>, Vec<String>),
    /// A JSON form description, see [`RawForm::from_json`].
    Json(Json),
    /// An already normalized form.
    Form(Form),
}

impl RawForm {
    /// Reads a form from its JSON description.
    ///
    /// Strings, numbers and booleans are literals and arrays are sequences.
    /// Numbers are written the way Rust displays them, so `1.0` describes the
    /// literal `1` and `2.5` the literal `2.5`.
    /// Objects are tagged by their `"type"`:
    ///
    /// | type                | fields                 |
    /// |---------------------|------------------------|
    /// | `OneOf`             | `forms`                |
    /// | `ManyOf`            | `form`                 |
    /// | `Optional`          | `form`                 |
    /// | `Ref`               | `name`                 |
    /// | `Except`            | `form`, `exceptions`   |
    /// | `RegularExpression` | `pattern`              |
    ///
    /// ```
    /// use form_grammar::RawForm;
    /// use serde_json::json;
    ///
    /// let raw = RawForm::from_json(&json!(
    ///     ["star ", {"type": "OneOf", "forms": ["trek", "wars"]}]
    /// ));
    /// assert!(raw.is_ok());
    ///
    /// assert!(RawForm::from_json(&json!(null)).is_err());
    /// ```
    pub fn from_json(value: &Json) -> Result<RawForm, FormError> {
        match *value {
            Json::String(ref s) => Ok(RawForm::Literal(s.clone())),
            Json::Number(ref n) => Ok(RawForm::Literal(number_text(n))),
            Json::Bool(b) => Ok(RawForm::Literal(b.to_string())),
            Json::Array(ref items) => items
                .iter()
                .map(RawForm::from_json)
                .collect::<Result<_, _>>()
                .map(RawForm::Sequence),
            Json::Object(ref object) => {
                let tag = object.get("type").and_then(Json::as_str);
                let field = |name: &str| {
                    object.get(name).ok_or_else(|| FormError::Unsupported {
                        shape: format!(
                            "{} without \"{}\"",
                            tag.unwrap_or("object"),
                            name
                        ),
                    })
                };
                match tag {
                    Some("OneOf") => match *field("forms")? {
                        Json::Array(ref forms) => forms
                            .iter()
                            .map(RawForm::from_json)
                            .collect::<Result<_, _>>()
                            .map(RawForm::OneOf),
                        ref other => Err(unsupported("OneOf forms", other)),
                    },
                    Some("ManyOf") => Ok(many_of(RawForm::from_json(field("form")?)?)),
                    Some("Optional") => Ok(optional(RawForm::from_json(field("form")?)?)),
                    Some("Ref") => match *field("name")? {
                        Json::String(ref name) => Ok(reference(name.as_str())),
                        ref other => Err(unsupported("Ref name", other)),
                    },
                    Some("Except") => {
                        let form = RawForm::from_json(field("form")?)?;
                        let exclusions = match *field("exceptions")? {
                            Json::Array(ref items) => items
                                .iter()
                                .map(|item| match *item {
                                    Json::String(ref s) => Ok(s.clone()),
                                    Json::Number(ref n) => Ok(number_text(n)),
                                    Json::Bool(b) => Ok(b.to_string()),
                                    ref other => Err(unsupported("Except exception", other)),
                                })
                                .collect::<Result<Vec<_>, _>>()?,
                            ref other => return Err(unsupported("Except exceptions", other)),
                        };
                        Ok(RawForm::Except(Box::new(form), exclusions))
                    }
                    Some("RegularExpression") => match *field("pattern")? {
                        Json::String(ref source) => Ok(pattern(source.as_str())),
                        ref other => Err(unsupported("RegularExpression pattern", other)),
                    },
                    Some(other) => Err(FormError::Unsupported {
                        shape: format!("object of type \"{}\"", other),
                    }),
                    None => Err(FormError::Unsupported {
                        shape: "object without \"type\"".to_owned(),
                    }),
                }
            }
            Json::Null => Err(unsupported("form", value)),
        }
    }
}

/// Renders a JSON number as the literal text it describes.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Describes a JSON value that has the wrong kind for `what`.
fn unsupported(what: &str, value: &Json) -> FormError {
    let kind = match *value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    };
    FormError::Unsupported {
        shape: format!("{} given as {}", what, kind),
    }
}

///////////////////////////////////////////////////////////////////////////////
//      Conversions
///////////////////////////////////////////////////////////////////////////////

impl<'a> From<&'a str> for RawForm {
    fn from(text: &'a str) -> RawForm {
        RawForm::Literal(text.to_owned())
    }
}

impl From<String> for RawForm {
    fn from(text: String) -> RawForm {
        RawForm::Literal(text)
    }
}

impl<'a> From<&'a String> for RawForm {
    fn from(text: &'a String) -> RawForm {
        RawForm::Literal(text.clone())
    }
}

impl From<char> for RawForm {
    fn from(c: char) -> RawForm {
        RawForm::Literal(c.to_string())
    }
}

impl From<bool> for RawForm {
    fn from(b: bool) -> RawForm {
        RawForm::Literal(b.to_string())
    }
}

/// Numbers describe the literal text of their decimal rendering.
macro_rules! literal_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawForm {
                fn from(n: $t) -> RawForm {
                    RawForm::Literal(n.to_string())
                }
            }
        )*
    };
}

literal_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Regex> for RawForm {
    fn from(regex: Regex) -> RawForm {
        RawForm::Regex(regex)
    }
}

impl From<Form> for RawForm {
    fn from(form: Form) -> RawForm {
        RawForm::Form(form)
    }
}

impl From<Json> for RawForm {
    fn from(value: Json) -> RawForm {
        RawForm::Json(value)
    }
}

impl<T: Into<RawForm>> From<Vec<T>> for RawForm {
    fn from(forms: Vec<T>) -> RawForm {
        sequence(forms)
    }
}

impl<T: Into<RawForm>, const N: usize> From<[T; N]> for RawForm {
    fn from(forms: [T; N]) -> RawForm {
        sequence(forms)
    }
}

///////////////////////////////////////////////////////////////////////////////
//      Builders
///////////////////////////////////////////////////////////////////////////////

/// Matches every form in order.
pub fn sequence<I>(forms: I) -> RawForm
where
    I: IntoIterator,
    I::Item: Into<RawForm>,
{
    RawForm::Sequence(forms.into_iter().map(Into::into).collect())
}

/// Matches the first of `forms` that succeeds.
///
/// Alternatives are tried in order, so earlier alternatives win even when a
/// later one would consume more input.
pub fn one_of<I>(forms: I) -> RawForm
where
    I: IntoIterator,
    I::Item: Into<RawForm>,
{
    RawForm::OneOf(forms.into_iter().map(Into::into).collect())
}

/// Matches `form` one or more times, as often as possible.
pub fn many_of<F: Into<RawForm>>(form: F) -> RawForm {
    RawForm::ManyOf(Box::new(form.into()))
}

/// Repeats a choice between `forms`, or just the form if there is only one.
///
/// This is what [`many_of!`] expands to.
pub fn many_of_any(mut forms: Vec<RawForm>) -> RawForm {
    if forms.len() == 1 {
        if let Some(form) = forms.pop() {
            return many_of(form);
        }
    }
    many_of(RawForm::OneOf(forms))
}

/// Matches `form` or nothing.
pub fn optional<F: Into<RawForm>>(form: F) -> RawForm {
    RawForm::Optional(Box::new(form.into()))
}

/// Matches the rule called `name`.
pub fn reference<S: Into<String>>(name: S) -> RawForm {
    RawForm::Reference(name.into())
}

/// Matches the regular expression `source` at the cursor.
///
/// The pattern is compiled when the grammar is compiled; an invalid pattern
/// makes [`Grammar::compile`] fail.
///
/// [`Grammar::compile`]: crate::Grammar::compile
pub fn pattern<S: Into<String>>(source: S) -> RawForm {
    RawForm::Pattern(source.into())
}

/// Matches `form` unless the consumed text equals one of `exclusions`.
///
/// Exclusions are compared as text, so `except(pattern("[0-9]{2}"), [42])`
/// rejects the input `42`.
pub fn except<F, I>(form: F, exclusions: I) -> RawForm
where
    F: Into<RawForm>,
    I: IntoIterator,
    I::Item: ToString,
{
    RawForm::Except(
        Box::new(form.into()),
        exclusions.into_iter().map(|e| e.to_string()).collect(),
    )
}

/// Matches one or more occurrences of `form`, separated by `separator`.
///
/// A trailing separator is not consumed.
pub fn separated<F, S>(form: F, separator: S) -> RawForm
where
    F: Into<RawForm>,
    S: Into<RawForm>,
{
    let form = form.into();
    RawForm::Sequence(vec![
        form.clone(),
        optional(many_of(RawForm::Sequence(vec![separator.into(), form]))),
    ])
}

///////////////////////////////////////////////////////////////////////////////
//      Macros
///////////////////////////////////////////////////////////////////////////////

/// Converts one element of a form description into a [`RawForm`].
///
/// Square brackets describe a sequence and may mix element types and nest;
/// anything else is converted with `RawForm::from`.
///
/// ```
/// # #[macro_use] extern crate form_grammar;
/// # fn main() {
/// use form_grammar::generate::reference;
///
/// let form = form!(["hot", reference("Animal"), ["!", 1]]);
/// # let _ = form;
/// # }
/// ```
#[macro_export]
macro_rules! form {
    ([$($inner:tt)*]) => {
        $crate::RawForm::Sequence($crate::forms!($($inner)*))
    };
    ($e:expr) => {
        $crate::RawForm::from($e)
    };
}

/// Builds a `Vec<RawForm>` from comma separated elements, see [`form!`].
#[macro_export]
macro_rules! forms {
    // Elements are moved one by one into the accumulator in the first pair of
    // brackets. Bracketed elements are nested sequences and have to be
    // matched before plain expressions, which would read them as arrays.
    (@accum [$($done:expr,)*]) => {
        vec![$($done),*]
    };
    (@accum [$($done:expr,)*] [$($inner:tt)*]) => {
        $crate::forms!(@accum [$($done,)* $crate::form!([$($inner)*]),])
    };
    (@accum [$($done:expr,)*] [$($inner:tt)*] , $($tail:tt)*) => {
        $crate::forms!(@accum [$($done,)* $crate::form!([$($inner)*]),] $($tail)*)
    };
    (@accum [$($done:expr,)*] $e:expr) => {
        $crate::forms!(@accum [$($done,)* $crate::RawForm::from($e),])
    };
    (@accum [$($done:expr,)*] $e:expr , $($tail:tt)*) => {
        $crate::forms!(@accum [$($done,)* $crate::RawForm::from($e),] $($tail)*)
    };
    ($($tail:tt)*) => {
        $crate::forms!(@accum [] $($tail)*)
    };
}

/// Matches every element in order, see [`form!`] for the element syntax.
#[macro_export]
macro_rules! seq {
    ($($tail:tt)*) => {
        $crate::RawForm::Sequence($crate::forms!($($tail)*))
    };
}

/// Matches the first element that succeeds.
///
/// ```
/// # #[macro_use] extern crate form_grammar;
/// # fn main() {
/// let grammar = grammar! {
///     Root = ["star ", one_of!["trek", "wars"]];
/// }.unwrap();
///
/// assert!(grammar.parse("star wars").is_ok());
/// # }
/// ```
#[macro_export]
macro_rules! one_of {
    ($($tail:tt)*) => {
        $crate::RawForm::OneOf($crate::forms!($($tail)*))
    };
}

/// Matches any of the elements one or more times.
#[macro_export]
macro_rules! many_of {
    ($($tail:tt)*) => {
        $crate::generate::many_of_any($crate::forms!($($tail)*))
    };
}

/// Matches the sequence of all elements one or more times.
#[macro_export]
macro_rules! many_of_all {
    ($($tail:tt)*) => {
        $crate::generate::many_of($crate::seq!($($tail)*))
    };
}

/// Matches any of the elements zero or more times.
#[macro_export]
macro_rules! zero_or_more_of {
    ($($tail:tt)*) => {
        $crate::generate::optional($crate::many_of!($($tail)*))
    };
}

/// Matches the sequence of all elements zero or more times.
#[macro_export]
macro_rules! zero_or_more_of_all {
    ($($tail:tt)*) => {
        $crate::generate::optional($crate::many_of_all!($($tail)*))
    };
}

/// Compiles a grammar from rule definitions.
///
/// Each rule is written as `Name = form;`, where the form follows the syntax
/// of [`form!`]. The macro evaluates to a
/// [`GrammarResult<Grammar>`][`GrammarResult`].
///
/// ```
/// # #[macro_use] extern crate form_grammar;
/// # fn main() {
/// use form_grammar::generate::reference;
///
/// let grammar = grammar! {
///     Root = ["hot", reference("Animal")];
///     Animal = "dog";
/// }.unwrap();
///
/// let node = grammar.parse("hotdog").unwrap();
/// assert_eq!(node.get("Animal").unwrap().text("hotdog"), "dog");
/// # }
/// ```
///
/// [`GrammarResult`]: crate::GrammarResult
#[macro_export]
macro_rules! grammar {
    (@rules [$($done:expr,)*]) => {{
        let rules: ::std::vec::Vec<(&'static str, $crate::RawForm)> = vec![$($done),*];
        $crate::Grammar::compile(rules)
    }};
    (@rules [$($done:expr,)*] $name:ident = [$($body:tt)*] ; $($tail:tt)*) => {
        $crate::grammar!(
            @rules [$($done,)* (stringify!($name), $crate::form!([$($body)*])),]
            $($tail)*
        )
    };
    (@rules [$($done:expr,)*] $name:ident = $body:expr ; $($tail:tt)*) => {
        $crate::grammar!(
            @rules [$($done,)* (stringify!($name), $crate::form!($body)),]
            $($tail)*
        )
    };
    ($($tail:tt)*) => {
        $crate::grammar!(@rules [] $($tail)*)
    };
}
