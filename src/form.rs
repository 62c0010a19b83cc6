/*!
The normalized form tree.

A [`Form`] is what a [`RawForm`] becomes once it has been checked: patterns
are compiled, JSON descriptions are read, and single-element sequences are
collapsed. Forms are immutable and shared by every match against a grammar.

Every form has a canonical rendering (its `Display` implementation), which is
what failure messages show after `expected`:

```
use form_grammar::generate::{except, many_of, one_of, pattern};
use form_grammar::Form;

let form = Form::normalize(one_of(vec!["trek", "wars"])).unwrap();
assert_eq!(form.to_string(), r#"oneOf("trek", "wars")"#);

let form = Form::normalize(except(pattern("[0-9]{2}"), vec![42])).unwrap();
assert_eq!(form.to_string(), r#"except(/[0-9]{2}/, "42")"#);

let form = Form::normalize(many_of(vec!["hot", "dog"])).unwrap();
assert_eq!(form.to_string(), r#"manyOf(["hot", "dog"])"#);
```
*/

use std::fmt;

use regex::Regex;
use serde_json::{json, Value as Json};

use crate::error::FormError;
use crate::generate::RawForm;

/// A normalized grammar form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Form {
    /// Matches the exact text.
    Literal(String),
    /// Matches a regular expression anchored at the cursor.
    Pattern(Pattern),
    /// Matches every form in order.
    Sequence(Vec<Form>),
    /// Matches the first alternative that succeeds.
    OneOf(Vec<Form>),
    /// Matches the form one or more times, greedily.
    ManyOf(Box<Form>),
    /// Matches the form or nothing.
    Optional(Box<Form>),
    /// Matches the named rule.
    Reference(String),
    /// Matches `form` unless the consumed text is one of `exclusions`.
    Except {
        /// The form to match.
        form: Box<Form>,
        /// Texts that must not be matched.
        exclusions: Vec<String>,
    },
}

/// A compiled regular expression together with the pattern it was written as.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` so that it only matches at the start of the input.
    pub fn new(source: &str) -> Result<Pattern, FormError> {
        let regex = Regex::new(&format!("^(?:{})", source)).map_err(|err| {
            FormError::InvalidPattern {
                pattern: source.to_owned(),
                source: err,
            }
        })?;
        Ok(Pattern {
            source: source.to_owned(),
            regex,
        })
    }

    /// Uses an already compiled regular expression as it is, keeping any
    /// options it was built with.
    ///
    /// ```
    /// use form_grammar::Pattern;
    /// use regex::RegexBuilder;
    ///
    /// let regex = RegexBuilder::new("hot").case_insensitive(true).build().unwrap();
    /// let pattern = Pattern::from_regex(regex);
    /// assert_eq!(pattern.match_len("HOTdog"), Some(3));
    /// assert_eq!(pattern.match_len("a hot dog"), None);
    /// ```
    pub fn from_regex(regex: Regex) -> Pattern {
        Pattern {
            source: regex.as_str().to_owned(),
            regex,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the length of the match at the start of `input`, if any.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        // Searches are leftmost-first, so a match at the start is found
        // whenever one exists.
        self.regex
            .find(input)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Form {
    /// Normalizes a raw form.
    ///
    /// Normalizing an already normalized form (`RawForm::Form`) returns it
    /// unchanged.
    pub fn normalize(raw: RawForm) -> Result<Form, FormError> {
        Ok(match raw {
            RawForm::Literal(text) => Form::Literal(text),
            RawForm::Sequence(mut forms) => {
                if forms.len() == 1 {
                    if let Some(form) = forms.pop() {
                        return Form::normalize(form);
                    }
                }
                Form::Sequence(normalize_all(forms)?)
            }
            RawForm::Pattern(source) => Form::Pattern(Pattern::new(&source)?),
            RawForm::Regex(regex) => Form::Pattern(Pattern::from_regex(regex)),
            RawForm::OneOf(forms) => Form::OneOf(normalize_all(forms)?),
            RawForm::ManyOf(form) => Form::ManyOf(Box::new(Form::normalize(*form)?)),
            RawForm::Optional(form) => Form::Optional(Box::new(Form::normalize(*form)?)),
            RawForm::Reference(name) => Form::Reference(name),
            RawForm::Except(form, exclusions) => Form::Except {
                form: Box::new(Form::normalize(*form)?),
                exclusions,
            },
            RawForm::Json(value) => Form::normalize(RawForm::from_json(&value)?)?,
            RawForm::Form(form) => form,
        })
    }

    /// Describes the form in the JSON syntax read by [`RawForm::from_json`].
    ///
    /// Patterns are described by their source only; options of a regular
    /// expression built with `RegexBuilder` are not part of the description.
    ///
    /// ```
    /// use form_grammar::generate::{optional, reference};
    /// use form_grammar::Form;
    /// use serde_json::json;
    ///
    /// let form = Form::normalize(optional(reference("Animal"))).unwrap();
    /// assert_eq!(
    ///     form.to_json(),
    ///     json!({"type": "Optional", "form": {"type": "Ref", "name": "Animal"}})
    /// );
    /// ```
    pub fn to_json(&self) -> Json {
        match *self {
            Form::Literal(ref text) => Json::String(text.clone()),
            Form::Pattern(ref pattern) => json!({
                "type": "RegularExpression",
                "pattern": pattern.as_str(),
            }),
            Form::Sequence(ref forms) => Json::Array(forms.iter().map(Form::to_json).collect()),
            Form::OneOf(ref forms) => json!({
                "type": "OneOf",
                "forms": forms.iter().map(Form::to_json).collect::<Vec<_>>(),
            }),
            Form::ManyOf(ref form) => json!({"type": "ManyOf", "form": form.to_json()}),
            Form::Optional(ref form) => json!({"type": "Optional", "form": form.to_json()}),
            Form::Reference(ref name) => json!({"type": "Ref", "name": name}),
            Form::Except {
                ref form,
                ref exclusions,
            } => json!({
                "type": "Except",
                "form": form.to_json(),
                "exceptions": exclusions,
            }),
        }
    }

    /// Returns the names of all rules referenced by this form, in order of
    /// appearance.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match *self {
            Form::Literal(_) | Form::Pattern(_) => {}
            Form::Sequence(ref forms) | Form::OneOf(ref forms) => {
                for form in forms {
                    form.collect_references(names);
                }
            }
            Form::ManyOf(ref form) | Form::Optional(ref form) => {
                form.collect_references(names)
            }
            Form::Except { ref form, .. } => form.collect_references(names),
            Form::Reference(ref name) => names.push(name),
        }
    }
}

fn normalize_all(forms: Vec<RawForm>) -> Result<Vec<Form>, FormError> {
    forms.into_iter().map(Form::normalize).collect()
}

/// Writes `text` as a JSON string literal.
pub(crate) fn write_quoted(f: &mut fmt::Formatter, text: &str) -> fmt::Result {
    let quoted = serde_json::to_string(text).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

fn write_list(f: &mut fmt::Formatter, forms: &[Form]) -> fmt::Result {
    for (i, form) in forms.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", form)?;
    }
    Ok(())
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Form::Literal(ref text) => write_quoted(f, text),
            Form::Pattern(ref pattern) => write!(f, "/{}/", pattern.as_str()),
            Form::Sequence(ref forms) => {
                f.write_str("[")?;
                write_list(f, forms)?;
                f.write_str("]")
            }
            Form::OneOf(ref forms) => {
                f.write_str("oneOf(")?;
                write_list(f, forms)?;
                f.write_str(")")
            }
            Form::ManyOf(ref form) => write!(f, "manyOf({})", form),
            Form::Optional(ref form) => write!(f, "optional({})", form),
            Form::Reference(ref name) => {
                f.write_str("ref(")?;
                write_quoted(f, name)?;
                f.write_str(")")
            }
            Form::Except {
                ref form,
                ref exclusions,
            } => {
                write!(f, "except({}", form)?;
                for exclusion in exclusions {
                    f.write_str(", ")?;
                    write_quoted(f, exclusion)?;
                }
                f.write_str(")")
            }
        }
    }
}
