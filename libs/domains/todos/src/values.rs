//! Validated text value objects for task titles and descriptions.
//!
//! Both types share one character allow-list:
//! - ASCII letters and digits
//! - Hiragana (U+3040..U+309F), katakana (U+30A0..U+30FF)
//! - Half-width katakana (U+FF65..U+FF9F)
//! - Kanji (U+4E00..U+9FAF)
//! - Half-width and full-width space
//! - ASCII punctuation except the backslash
//!
//! Descriptions additionally accept line breaks (`\n`, `\r`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Characters accepted by both title and description, as a regex class body.
const ALLOWED_CLASS: &str = r##"a-zA-Z0-9\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{FF65}-\x{FF9F}\x{4E00}-\x{9FAF} \x{3000}!"\#$%\&'()*+,\-./:;<=>?@\[\]\^_`{|}\~"##;

static TITLE_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^[{ALLOWED_CLASS}]+$")).unwrap());

static DESCRIPTION_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^[{ALLOWED_CLASS}\n\r]+$")).unwrap());

/// Reasons a raw string was refused as a title or description.
///
/// The `Display` output is the message surfaced to clients as a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextValueError {
    #[error("{field} must be at least {min} character long")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters long")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not start or end with whitespace")]
    SurroundingWhitespace { field: &'static str },

    #[error("{field} contains a character that is not allowed")]
    DisallowedCharacter { field: &'static str },
}

struct TextRules {
    field: &'static str,
    min: usize,
    max: usize,
    reject_surrounding_whitespace: bool,
    allow_line_breaks: bool,
}

const TITLE_RULES: TextRules = TextRules {
    field: "Title",
    min: TitleValue::MIN_LENGTH,
    max: TitleValue::MAX_LENGTH,
    reject_surrounding_whitespace: true,
    allow_line_breaks: false,
};

const DESCRIPTION_RULES: TextRules = TextRules {
    field: "Description",
    min: DescriptionValue::MIN_LENGTH,
    max: DescriptionValue::MAX_LENGTH,
    reject_surrounding_whitespace: false,
    allow_line_breaks: true,
};

impl TextRules {
    /// Length is counted in code points. Length checks run before the
    /// whitespace and character checks so the reported message is stable.
    fn check(&self, value: &str) -> Result<(), TextValueError> {
        let length = value.chars().count();

        if length < self.min {
            return Err(TextValueError::TooShort {
                field: self.field,
                min: self.min,
            });
        }
        if length > self.max {
            return Err(TextValueError::TooLong {
                field: self.field,
                max: self.max,
            });
        }
        if self.reject_surrounding_whitespace && value.trim() != value {
            return Err(TextValueError::SurroundingWhitespace { field: self.field });
        }
        let characters = if self.allow_line_breaks {
            &*DESCRIPTION_CHARACTERS
        } else {
            &*TITLE_CHARACTERS
        };
        if !characters.is_match(value) {
            return Err(TextValueError::DisallowedCharacter { field: self.field });
        }

        Ok(())
    }
}

/// Task title: 1..=100 code points, no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleValue(String);

impl TitleValue {
    pub const MIN_LENGTH: usize = 1;
    pub const MAX_LENGTH: usize = 100;

    /// Validates `value` and wraps it. The input is never corrected.
    ///
    /// # Errors
    ///
    /// Returns [`TextValueError`] describing the first rule the input breaks.
    pub fn new(value: impl Into<String>) -> Result<Self, TextValueError> {
        let value = value.into();
        TITLE_RULES.check(&value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Task description: 1..=1000 code points, line breaks allowed.
///
/// Unlike [`TitleValue`], surrounding whitespace is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DescriptionValue(String);

impl DescriptionValue {
    pub const MIN_LENGTH: usize = 1;
    pub const MAX_LENGTH: usize = 1000;

    /// Validates `value` and wraps it. The input is never corrected.
    ///
    /// # Errors
    ///
    /// Returns [`TextValueError`] describing the first rule the input breaks.
    pub fn new(value: impl Into<String>) -> Result<Self, TextValueError> {
        let value = value.into();
        DESCRIPTION_RULES.check(&value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! text_value_conversions {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = TextValueError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_value_conversions!(TitleValue);
text_value_conversions!(DescriptionValue);
