use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One answer bubble column on a question row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One bubble of a student ID digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IdDigit {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
}

impl IdDigit {
    pub const ALL: [IdDigit; 10] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for IdDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

pub type OptionSet = BTreeSet<OptionLetter>;

/// Outcome of reading a selection cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Empty,
    Marked(OptionSet),
    Invalid(Vec<String>),
}

/// Splits a cell such as `[a; c]`, `B,D` or `A C` into uppercase tokens.
pub fn tokenize_options(value: &str) -> Vec<String> {
    let mut text = value.trim();
    if text.starts_with('[') && text.ends_with(']') && text.len() >= 2 {
        text = &text[1..text.len() - 1];
    }
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

pub fn parse_selection(value: &str) -> Selection {
    let tokens = tokenize_options(value);
    if tokens.is_empty() {
        return Selection::Empty;
    }

    let mut selected = OptionSet::new();
    let mut invalid = BTreeSet::new();
    for token in tokens {
        match OptionLetter::from_token(&token) {
            Some(letter) => {
                selected.insert(letter);
            }
            None => {
                invalid.insert(token);
            }
        }
    }

    if invalid.is_empty() {
        Selection::Marked(selected)
    } else {
        Selection::Invalid(invalid.into_iter().collect())
    }
}

pub fn join_letters(set: &OptionSet, separator: &str) -> String {
    set.iter()
        .map(|letter| letter.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
