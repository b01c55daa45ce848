//! Line classification and argument tokenization.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex_lite::Regex;
use rhythm_core::InflationError;

use crate::config::InflaterConfig;

/// What a single input line is, before any parser state is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Comment,
    /// Text after the variable marker.
    Variable(&'a str),
    /// Trimmed text after the title marker.
    Title(&'a str),
    Content { text: &'a str, indented: bool },
}

/// Classify one raw line.
///
/// Comments may be indented. Variable declarations and titles must start at
/// column 0; indented lines are always content. When one marker is a prefix
/// of another, the longer one is tried first. Empty markers match nothing.
pub(crate) fn classify<'a>(line: &'a str, config: &InflaterConfig) -> Line<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if marked_by(trimmed, &config.comment_marker).is_some() {
        return Line::Comment;
    }

    let indented = line.starts_with(char::is_whitespace);
    if !indented {
        let title_first = config.title_marker.len() >= config.variable_marker.len();
        let title = marked_by(trimmed, &config.title_marker).map(|rest| Line::Title(rest.trim()));
        let variable = marked_by(trimmed, &config.variable_marker).map(Line::Variable);
        let marked = if title_first {
            title.or(variable)
        } else {
            variable.or(title)
        };
        if let Some(marked) = marked {
            return marked;
        }
    }

    Line::Content {
        text: trimmed,
        indented,
    }
}

fn marked_by<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    if marker.is_empty() {
        None
    } else {
        text.strip_prefix(marker)
    }
}

fn equals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*=\s*").expect("equals pattern"))
}

/// Split argument text into tokens. Whitespace around `=` is not significant,
/// so `width = 4` yields the single token `width=4`.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let collapsed: Cow<'_, str> = equals_re().replace_all(text.trim(), "=");
    collapsed.split_whitespace().map(str::to_owned).collect()
}

/// Split a token at its first `=` into key and optional value.
pub(crate) fn split_token(token: &str) -> Result<(&str, Option<&str>), InflationError> {
    let (key, value) = match token.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (token, None),
    };
    if key.is_empty() {
        return Err(InflationError::malformed_layer_declaration(format!(
            "argument '{}' has an empty key",
            token
        )));
    }
    Ok((key, value))
}
