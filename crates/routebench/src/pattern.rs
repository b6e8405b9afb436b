//! Canonical route patterns and their translation into router syntaxes.
//!
//! Fixtures are written once with `:name` placeholders. Each adapter declares
//! the [`PatternSyntax`] its router expects and receives the rendered form.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use crate::error::HarnessError;

/// Placeholder syntax understood by a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSyntax {
    /// `/user/:id`
    Colon,
    /// `/user/{id}`
    Brace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed canonical pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a canonical `:name` pattern.
    ///
    /// Rejects anything that would not translate identically into every
    /// [`PatternSyntax`]: brace or wildcard characters, empty segments,
    /// malformed or repeated param names.
    pub fn parse(canonical: &str) -> Result<Self, HarnessError> {
        let Some(rest) = canonical.strip_prefix('/') else {
            return Err(HarnessError::untranslatable(canonical, "must start with '/'"));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for raw in rest.split('/') {
                segments.push(parse_segment(canonical, raw)?);
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if seen.contains(&name.as_str()) {
                    return Err(HarnessError::untranslatable(
                        canonical,
                        format!("parameter '{name}' appears twice"),
                    ));
                }
                seen.push(name);
            }
        }

        Ok(Self {
            source: canonical.to_string(),
            segments,
        })
    }

    /// The canonical text this pattern was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Param names in segment order.
    pub fn params(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Render in the given placeholder syntax.
    pub fn render(&self, syntax: PatternSyntax) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }

        let mut out = String::with_capacity(self.source.len() + self.segments.len());
        for segment in &self.segments {
            out.push('/');
            match (segment, syntax) {
                (Segment::Static(text), _) => out.push_str(text),
                (Segment::Param(name), PatternSyntax::Colon) => {
                    out.push(':');
                    out.push_str(name);
                }
                (Segment::Param(name), PatternSyntax::Brace) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }

    /// A concrete path matching this pattern, with every param replaced by
    /// its [`sample_value`].
    pub fn instantiate(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }

        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(text) => out.push_str(text),
                Segment::Param(name) => out.push_str(&sample_value(name)),
            }
        }
        out
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Deterministic concrete value for a param name.
pub fn sample_value(name: &str) -> Cow<'static, str> {
    match name {
        "name" => Cow::Borrowed("index"),
        "id" => Cow::Borrowed("42"),
        "lastname" => Cow::Borrowed("doe"),
        "zip" => Cow::Borrowed("10115"),
        "country" => Cow::Borrowed("de"),
        other => Cow::Owned(format!("{other}-1")),
    }
}

fn parse_segment(pattern: &str, raw: &str) -> Result<Segment, HarnessError> {
    if raw.is_empty() {
        return Err(HarnessError::untranslatable(pattern, "empty path segment"));
    }

    if let Some(name) = raw.strip_prefix(':') {
        if name.is_empty() {
            return Err(HarnessError::untranslatable(pattern, "parameter without a name"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(HarnessError::untranslatable(
                pattern,
                format!("invalid parameter name '{name}'"),
            ));
        }
        return Ok(Segment::Param(name.to_string()));
    }

    if let Some(c) = raw.chars().find(|c| matches!(c, '{' | '}' | '*' | ':' | '?' | '#')) {
        return Err(HarnessError::untranslatable(
            pattern,
            format!("unsupported character '{c}' in segment '{raw}'"),
        ));
    }

    Ok(Segment::Static(raw.to_string()))
}
