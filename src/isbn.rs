//! ISBN-13 validation and derived ISBN state.
//!
//! Validation is boolean and never fails loudly: callers branch on the
//! result. `Isbn13` is available for code that wants a typed value.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::channels::ChannelRule;

pub const ISBN13_LEN: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    #[error("expected {expected} digits after normalization, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("non-digit character {0:?}")]
    NonDigit(char),
    #[error("check digit mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

/// Whether the current channel/ISBN combination blocks delivery.
///
/// Always derived from the channel rule and the ISBN text at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsbnState {
    NotRequired,
    Provided,
    RequiredUnset,
}

/// Strip hyphens and spaces.
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Check digit for the first twelve digits of an ISBN-13.
///
/// Weights alternate 1,3 starting at weight 1 for index 0.
pub fn check_digit(first_twelve: &[u8; 12]) -> u8 {
    let sum: u32 = first_twelve
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let weight = if i % 2 == 0 { 1 } else { 3 };
            u32::from(*d) * weight
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

fn digits_of(cleaned: &str) -> Result<[u8; ISBN13_LEN], IsbnError> {
    let found = cleaned.chars().count();
    if found != ISBN13_LEN {
        return Err(IsbnError::WrongLength {
            expected: ISBN13_LEN,
            found,
        });
    }

    let mut digits = [0u8; ISBN13_LEN];
    for (slot, c) in digits.iter_mut().zip(cleaned.chars()) {
        // to_digit(10) alone would accept non-ASCII digits from other scripts
        if !c.is_ascii_digit() {
            return Err(IsbnError::NonDigit(c));
        }
        *slot = c as u8 - b'0';
    }
    Ok(digits)
}

fn verify(digits: &[u8; ISBN13_LEN]) -> Result<(), IsbnError> {
    let mut head = [0u8; 12];
    head.copy_from_slice(&digits[..12]);
    let expected = check_digit(&head);
    let found = digits[12];
    if expected != found {
        return Err(IsbnError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

/// True iff `raw` reduces to exactly 13 digits with a correct check digit.
pub fn is_valid_isbn13(raw: &str) -> bool {
    let cleaned = normalize_isbn(raw);
    digits_of(&cleaned).and_then(|d| verify(&d)).is_ok()
}

/// Derive the ISBN state for a channel rule and the current ISBN text.
pub fn isbn_state(rule: &ChannelRule, isbn: &str) -> IsbnState {
    if !rule.requires_isbn {
        IsbnState::NotRequired
    } else if is_valid_isbn13(isbn) {
        IsbnState::Provided
    } else {
        IsbnState::RequiredUnset
    }
}

/// A validated ISBN-13 in canonical (digits only) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn13(String);

impl Isbn13 {
    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        let cleaned = normalize_isbn(raw);
        let digits = digits_of(&cleaned)?;
        verify(&digits)?;
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fixed 3-1-3-5-1 grouping. Not registration-group aware.
    pub fn hyphenated(&self) -> String {
        let s = &self.0;
        format!(
            "{}-{}-{}-{}-{}",
            &s[0..3],
            &s[3..4],
            &s[4..7],
            &s[7..12],
            &s[12..13]
        )
    }
}

impl fmt::Display for Isbn13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hyphenated())
    }
}

impl TryFrom<String> for Isbn13 {
    type Error = IsbnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn13> for String {
    fn from(value: Isbn13) -> Self {
        value.0
    }
}
