//! Derivation path parsing.
//!
//! Paths look like `m/44'/0'/1`: the letter `m` followed by zero or more
//! `/<decimal>` segments, each optionally suffixed with `'`. A path is valid
//! only if it matches that grammar *and* every segment fits in a `u32`.
//!
//! The `'` marker is recorded but derivation does not consult it; see
//! [`crate::config::HARDENED_OFFSET`].

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::HdKeyError;

static PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^m(/[0-9]+'?)*$").unwrap_or_else(|e| unreachable!("static path regex: {e}"))
});

/// One `/<index>['?]` component of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub index: u32,
    pub hardened: bool,
}

/// A parsed derivation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    segments: Vec<Segment>,
}

impl DerivationPath {
    /// Parse and validate `path`.
    pub fn parse(path: &str) -> Result<Self, HdKeyError> {
        if !PATH_REGEX.is_match(path) {
            return Err(HdKeyError::InvalidPath(path.to_string()));
        }

        let segments = path
            .split('/')
            .skip(1)
            .map(|raw| {
                let digits = raw.strip_suffix('\'');
                let hardened = digits.is_some();
                let index = digits
                    .unwrap_or(raw)
                    .parse::<u32>()
                    .map_err(|_| HdKeyError::InvalidPath(path.to_string()))?;
                Ok(Segment { index, hardened })
            })
            .collect::<Result<Vec<_>, HdKeyError>>()?;

        Ok(Self { segments })
    }

    /// The segments in derivation order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of derivation steps.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Child indices with `offset` added to each (wrapping at 2^32).
    pub fn indices(&self, offset: u32) -> impl Iterator<Item = u32> + '_ {
        self.segments
            .iter()
            .map(move |segment| segment.index.wrapping_add(offset))
    }
}

impl FromStr for DerivationPath {
    type Err = HdKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{}", segment.index)?;
            if segment.hardened {
                f.write_str("'")?;
            }
        }
        Ok(())
    }
}

/// `true` if `path` parses as a [`DerivationPath`].
pub fn is_valid_path(path: &str) -> bool {
    DerivationPath::parse(path).is_ok()
}
