//! Variable declarations and substitution.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;
use rhythm_core::InflationError;

use super::lexer::tokenize;

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_.-]*)\s*=\s*(.+)$").expect("declaration pattern")
    })
}

/// Variables declared before the first block of a config.
#[derive(Debug, Clone, Default)]
pub(crate) struct VariableTable {
    marker: String,
    values: HashMap<String, String>,
}

impl VariableTable {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            values: HashMap::new(),
        }
    }

    /// Parse `name=value` (the text after the marker) and store it.
    ///
    /// References inside the value are resolved now, so stored values never
    /// mention other variables. Redeclaring a name replaces its value.
    pub fn declare(&mut self, declaration: &str) -> Result<(&str, &str), InflationError> {
        let written = format!("{}{}", self.marker, declaration);
        self.insert(declaration, &written)
    }

    /// Like [`Self::declare`], for a declaration written without the marker.
    pub fn declare_unmarked(&mut self, declaration: &str) -> Result<(&str, &str), InflationError> {
        self.insert(declaration, declaration)
    }

    fn insert(&mut self, declaration: &str, written: &str) -> Result<(&str, &str), InflationError> {
        let malformed = || InflationError::malformed_variable_syntax(written);
        let caps = declaration_re()
            .captures(declaration.trim_end())
            .ok_or_else(malformed)?;
        let name = caps[1].to_string();
        let value = self.resolve_declared(&caps[2])?;

        self.values.insert(name.clone(), value);
        self.values
            .get_key_value(&name)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .ok_or_else(malformed)
    }

    /// A value that is exactly a reference takes the referenced value as is.
    /// Otherwise references in its tokens are substituted and the tokens
    /// rejoined; a value without references is kept verbatim.
    fn resolve_declared(&self, value: &str) -> Result<String, InflationError> {
        if let Some(name) = self.reference(value) {
            if let Ok(resolved) = self.lookup(name) {
                return Ok(resolved.to_string());
            }
        }
        let tokens = tokenize(value);
        let resolved = self.substitute(tokens.clone())?;
        if resolved == tokens {
            Ok(value.to_string())
        } else {
            Ok(resolved.join(" "))
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Replace references in already tokenized text.
    ///
    /// A whole-token reference expands to its value split into tokens; a
    /// reference in the value half of `key=value` is replaced verbatim.
    pub fn substitute(&self, tokens: Vec<String>) -> Result<Vec<String>, InflationError> {
        let mut resolved = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(name) = self.reference(&token) {
                resolved.extend(tokenize(self.lookup(name)?));
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) if self.reference(value).is_some() => {
                    let value = self.resolve_value(value)?;
                    resolved.push(format!("{}={}", key, value));
                }
                _ => resolved.push(token),
            }
        }
        Ok(resolved)
    }

    /// Name referenced by `text`, if it starts with the marker. An empty
    /// marker references nothing.
    fn reference<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.marker.is_empty() {
            return None;
        }
        text.strip_prefix(self.marker.as_str())
    }

    fn resolve_value<'a>(&'a self, value: &'a str) -> Result<&'a str, InflationError> {
        match self.reference(value) {
            Some(name) => self.lookup(name),
            None => Ok(value),
        }
    }

    fn lookup(&self, name: &str) -> Result<&str, InflationError> {
        self.get(name)
            .ok_or_else(|| InflationError::variable_not_found(name))
    }
}
