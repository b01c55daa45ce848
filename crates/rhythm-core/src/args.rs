//! Argument bundles.
//!
//! An [`ArgumentsBundle`] holds the `key[=value]` pairs declared for one
//! layer block, in source order, along with the layer type name so accessor
//! failures can name the layer they belong to.

use crate::error::{ErrorKind, InflationError};

/// Failure to interpret an argument value.
///
/// Wrapped as the cause of an `INFLATING_LAYER_GENERIC` error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("argument '{key}' expects true or false, got '{value}'")]
    NotABoolean { key: String, value: String },
}

/// Ordered `key[=value]` pairs parsed from one layer block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentsBundle {
    layer_type: String,
    entries: Vec<(String, Option<String>)>,
}

impl ArgumentsBundle {
    /// Create an empty bundle for the given layer type.
    pub fn new(layer_type: impl Into<String>) -> Self {
        Self {
            layer_type: layer_type.into(),
            entries: Vec::new(),
        }
    }

    /// Append an argument. Duplicate keys are kept; lookups see the last one.
    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style [`Self::push`].
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        self.push(key, value.map(str::to_owned));
        self
    }

    pub fn layer_type(&self) -> &str {
        &self.layer_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all pairs in declaration order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Value of the last occurrence of `key`. `None` when the key is absent
    /// or was declared as a bare flag.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).flatten()
    }

    /// Whether `key` occurs more than once.
    pub fn is_duplicated(&self, key: &str) -> bool {
        self.entries.iter().filter(|(k, _)| k == key).count() > 1
    }

    fn entry(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_deref())
    }

    /// Mandatory string argument.
    pub fn require_string(&self, key: &str, expected_type: &str) -> Result<&str, InflationError> {
        self.get(key)
            .ok_or_else(|| InflationError::argument_missing(&self.layer_type, key, expected_type))
    }

    /// Optional string argument. A bare flag has no value and fails.
    pub fn string_or<'a>(
        &'a self,
        key: &str,
        default: &'a str,
    ) -> Result<&'a str, InflationError> {
        match self.entry(key) {
            None => Ok(default),
            Some(Some(value)) => Ok(value),
            Some(None) => Err(self.wrong_type(key, "string", default)),
        }
    }

    /// Mandatory integer argument of any sign.
    pub fn require_int(&self, key: &str, example: &str) -> Result<i64, InflationError> {
        self.get(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| self.wrong_type(key, "integer", example))
    }

    /// Mandatory integer argument that must be strictly positive.
    pub fn require_positive_int(&self, key: &str, example: &str) -> Result<i64, InflationError> {
        self.get(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| InflationError::argument_not_positive(&self.layer_type, key, example))
    }

    /// Optional integer argument. A present but malformed value still fails.
    pub fn int_or(&self, key: &str, default: i64, example: &str) -> Result<i64, InflationError> {
        if self.contains_key(key) {
            self.require_int(key, example)
        } else {
            Ok(default)
        }
    }

    /// Mandatory float argument of any sign.
    pub fn require_float(&self, key: &str, example: &str) -> Result<f64, InflationError> {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.wrong_type(key, "float", example))
    }

    /// Mandatory float argument that must be strictly positive.
    pub fn require_positive_float(&self, key: &str, example: &str) -> Result<f64, InflationError> {
        self.get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| InflationError::argument_not_positive(&self.layer_type, key, example))
    }

    /// Optional float argument. A present but malformed value still fails.
    pub fn float_or(&self, key: &str, default: f64, example: &str) -> Result<f64, InflationError> {
        if self.contains_key(key) {
            self.require_float(key, example)
        } else {
            Ok(default)
        }
    }

    /// Mandatory argument restricted to `allowed` (exact, case-sensitive).
    pub fn require_one_of<'a>(
        &self,
        key: &str,
        allowed: &[&'a str],
    ) -> Result<&'a str, InflationError> {
        let actual = self.get(key);
        actual
            .and_then(|v| allowed.iter().copied().find(|a| *a == v))
            .ok_or_else(|| {
                InflationError::argument_not_one_of(&self.layer_type, key, actual, allowed)
            })
    }

    /// Optional argument restricted to `allowed`.
    pub fn one_of_or<'a>(
        &self,
        key: &str,
        allowed: &[&'a str],
        default: &'a str,
    ) -> Result<&'a str, InflationError> {
        if self.contains_key(key) {
            self.require_one_of(key, allowed)
        } else {
            Ok(default)
        }
    }

    /// Boolean argument: absent is `false`, a bare flag is `true`, otherwise
    /// the value must be `true` or `false` (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Result<bool, InflationError> {
        match self.entry(key) {
            None => Ok(false),
            Some(None) => Ok(true),
            Some(Some(value)) if value.eq_ignore_ascii_case("true") => Ok(true),
            Some(Some(value)) if value.eq_ignore_ascii_case("false") => Ok(false),
            Some(Some(value)) => Err(InflationError::with_message_and_cause(
                ErrorKind::InflatingLayerGeneric,
                format!("invalid boolean for layer '{}'", self.layer_type),
                ArgumentError::NotABoolean {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                vec![],
            )),
        }
    }

    fn wrong_type(&self, key: &str, expected_type: &str, example: &str) -> InflationError {
        InflationError::argument_wrong_type(&self.layer_type, key, expected_type, example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle() -> ArgumentsBundle {
        ArgumentsBundle::new("guide")
            .with("left", None)
            .with("width", Some("4"))
            .with("offset", Some("-2"))
            .with("ratio", Some("1.5"))
            .with("label", Some("a=b"))
            .with("gravity", Some("top"))
    }

    #[test]
    fn test_basic_accessors() {
        let args = bundle();
        assert_eq!(args.layer_type(), "guide");
        assert_eq!(args.len(), 6);
        assert!(args.contains_key("left"));
        assert_eq!(args.get("left"), None);
        assert_eq!(args.get("label"), Some("a=b"));
        assert!(!args.contains_key("missing"));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let args = ArgumentsBundle::new("fill")
            .with("color", Some("red"))
            .with("color", Some("blue"));
        assert_eq!(args.get("color"), Some("blue"));
        assert!(args.is_duplicated("color"));
        assert_eq!(args.iter().count(), 2);
    }

    #[test]
    fn test_require_string_missing() {
        let err = bundle().require_string("color", "color").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissing);
        assert_eq!(err.args(), &[json!("guide"), json!("color"), json!("color")]);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_require_string_flag_counts_as_missing() {
        let err = bundle().require_string("left", "string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissing);
    }

    #[test]
    fn test_string_or() {
        let args = bundle();
        assert_eq!(args.string_or("label", "none").unwrap(), "a=b");
        assert_eq!(args.string_or("caption", "none").unwrap(), "none");

        let err = args.string_or("left", "none").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotExpectedType);
        assert_eq!(
            err.args(),
            &[json!("guide"), json!("left"), json!("string"), json!("none")]
        );
    }

    #[test]
    fn test_positive_int() {
        let args = bundle();
        assert_eq!(args.require_positive_int("width", "4").unwrap(), 4);

        let err = args.require_positive_int("offset", "4").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotPositive);
        assert_eq!(err.args(), &[json!("guide"), json!("offset"), json!("4")]);

        let zero = ArgumentsBundle::new("guide").with("width", Some("0"));
        assert!(zero.require_positive_int("width", "4").is_err());
    }

    #[test]
    fn test_int_allows_zero_and_negative() {
        let args = bundle();
        assert_eq!(args.require_int("offset", "-2").unwrap(), -2);

        let err = args.require_int("ratio", "3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotExpectedType);
        assert_eq!(
            err.args(),
            &[json!("guide"), json!("ratio"), json!("integer"), json!("3")]
        );
    }

    #[test]
    fn test_int_or_default_and_bad_value() {
        let args = bundle();
        assert_eq!(args.int_or("limit", 7, "7").unwrap(), 7);
        assert!(args.int_or("label", 7, "7").is_err());
    }

    #[test]
    fn test_floats() {
        let args = bundle();
        assert_eq!(args.require_float("ratio", "1.5").unwrap(), 1.5);
        assert_eq!(args.require_positive_float("width", "1.5").unwrap(), 4.0);
        assert!(args.require_positive_float("offset", "1.5").is_err());
        assert_eq!(args.float_or("scale", 2.0, "2").unwrap(), 2.0);

        let nan = ArgumentsBundle::new("x").with("v", Some("NaN"));
        assert!(nan.require_float("v", "1.0").is_err());
    }

    #[test]
    fn test_one_of() {
        let args = bundle();
        let allowed = ["top", "bottom"];
        assert_eq!(args.require_one_of("gravity", &allowed).unwrap(), "top");

        let err = args.require_one_of("label", &allowed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentMissingOrNotOneOf);
        assert_eq!(
            err.args(),
            &[json!("guide"), json!("label"), json!("a=b"), json!(["top", "bottom"])]
        );

        let err = args.require_one_of("missing", &allowed).unwrap_err();
        assert_eq!(err.args()[2], serde_json::Value::Null);

        assert_eq!(args.one_of_or("missing", &allowed, "bottom").unwrap(), "bottom");
    }

    #[test]
    fn test_bool() {
        let args = ArgumentsBundle::new("guide")
            .with("outside", None)
            .with("dashed", Some("FALSE"))
            .with("bold", Some("True"))
            .with("weird", Some("yes"));
        assert!(args.get_bool("outside").unwrap());
        assert!(!args.get_bool("dashed").unwrap());
        assert!(args.get_bool("bold").unwrap());
        assert!(!args.get_bool("absent").unwrap());

        let err = args.get_bool("weird").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InflatingLayerGeneric);
        assert!(err.cause().is_some());
    }
}
