//! Parsing and evaluation of width-only media queries.
//!
//! Only the subset the view needs is understood: an optional `screen` / `all`
//! media type followed by `and`-joined `(max-width: Npx)` and
//! `(min-width: Npx)` features. Both bounds are inclusive, as in CSS.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MediaQueryError {
    #[error("empty media query")]
    Empty,

    #[error("unsupported media type: {0}")]
    MediaType(String),

    #[error("unsupported media feature: {0}")]
    Feature(String),

    #[error("invalid length in media feature: {0}")]
    Length(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaQuery {
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
}

impl MediaQuery {
    pub fn max_width(px: u32) -> Self {
        Self {
            min_width: None,
            max_width: Some(px),
        }
    }

    pub fn parse(query: &str) -> Result<Self, MediaQueryError> {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return Err(MediaQueryError::Empty);
        }

        let mut parsed = MediaQuery::default();

        for (i, part) in query.split(" and ").map(str::trim).enumerate() {
            if let Some(feature) = part.strip_prefix('(').and_then(|p| p.strip_suffix(')')) {
                let (name, value) = feature
                    .split_once(':')
                    .ok_or_else(|| MediaQueryError::Feature(part.to_string()))?;
                match name.trim() {
                    "max-width" => parsed.max_width = Some(parse_px(value)?),
                    "min-width" => parsed.min_width = Some(parse_px(value)?),
                    other => return Err(MediaQueryError::Feature(other.to_string())),
                }
            } else if i == 0 && (part == "screen" || part == "all") {
                continue;
            } else {
                return Err(MediaQueryError::MediaType(part.to_string()));
            }
        }

        Ok(parsed)
    }

    /// Whether a viewport `width` CSS pixels wide satisfies the query.
    pub fn matches(&self, width: u32) -> bool {
        self.min_width.is_none_or(|min| width >= min)
            && self.max_width.is_none_or(|max| width <= max)
    }
}

fn parse_px(value: &str) -> Result<u32, MediaQueryError> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| MediaQueryError::Length(value.to_string()))
}

impl FromStr for MediaQuery {
    type Err = MediaQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaQuery::parse(s)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("screen")?;
        if let Some(min) = self.min_width {
            write!(f, " and (min-width: {}px)", min)?;
        }
        if let Some(max) = self.max_width {
            write!(f, " and (max-width: {}px)", max)?;
        }
        Ok(())
    }
}
