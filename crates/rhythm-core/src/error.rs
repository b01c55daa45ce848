//! Inflation error model.
//!
//! Every failure raised while inflating a config carries a stable
//! [`ErrorKind`], an optional 0-based line number, an optional message, an
//! optional wrapped cause and an ordered list of format arguments. Hosts use
//! `(kind, args)` to render localized messages, so neither the codes nor the
//! argument shapes documented on each kind may change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

/// Returned by [`InflationError::line_number`] when no line was attached.
pub const LINE_NOT_SPECIFIED: i64 = -1;

/// Boxed error type used for wrapped causes and factory failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Stable error kinds.
///
/// The numeric codes are used for cross-system localization and must never
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unclassified failure. No args.
    Generic,
    /// Two headers in one block, or no blank line between blocks.
    /// Args: [0] offending line.
    MalformedListSyntax,
    /// Variable declaration doesn't follow `<marker><name>=<value>`.
    /// Args: [0] declaration text.
    MalformedVariableSyntax,
    /// Variable declared after the first block header. No args.
    UnexpectedVariableDeclaration,
    /// Referenced variable was never declared. Args: [0] variable name.
    VariableNotFound,
    /// Title declared while a block is open. No args.
    UnexpectedTitleDeclaration,
    /// Layer type not registered. Args: [0] type name; [1] known types, sorted.
    UnknownLayerType,
    /// Layer declaration doesn't follow `<type> {<key>[=<value>]}*`. No args.
    MalformedLayerDeclaration,
    /// Unexpected failure while building a layer. Always wraps its cause.
    /// No args.
    InflatingLayerGeneric,
    /// Mandatory argument missing.
    /// Args: [0] layer type; [1] argument; [2] expected type.
    ArgumentMissing,
    /// Mandatory argument missing or not one of the accepted values.
    /// Args: [0] layer type; [1] argument; [2] actual value; [3] accepted values.
    ArgumentMissingOrNotOneOf,
    /// Mandatory argument missing or not strictly positive.
    /// Args: [0] layer type; [1] argument; [2] example.
    ArgumentMissingOrNotPositive,
    /// Mandatory argument missing or of the wrong type.
    /// Args: [0] layer type; [1] argument; [2] expected type; [3] example.
    ArgumentMissingOrNotExpectedType,
}

impl ErrorKind {
    /// All kinds, in code order.
    pub const ALL: [ErrorKind; 13] = [
        ErrorKind::Generic,
        ErrorKind::MalformedListSyntax,
        ErrorKind::MalformedVariableSyntax,
        ErrorKind::UnexpectedVariableDeclaration,
        ErrorKind::VariableNotFound,
        ErrorKind::UnexpectedTitleDeclaration,
        ErrorKind::UnknownLayerType,
        ErrorKind::MalformedLayerDeclaration,
        ErrorKind::InflatingLayerGeneric,
        ErrorKind::ArgumentMissing,
        ErrorKind::ArgumentMissingOrNotOneOf,
        ErrorKind::ArgumentMissingOrNotPositive,
        ErrorKind::ArgumentMissingOrNotExpectedType,
    ];

    /// Stable numeric code.
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::Generic => 0,
            ErrorKind::MalformedListSyntax => 1,
            ErrorKind::MalformedVariableSyntax => 2,
            ErrorKind::UnexpectedVariableDeclaration => 3,
            ErrorKind::VariableNotFound => 4,
            ErrorKind::UnexpectedTitleDeclaration => 5,
            ErrorKind::UnknownLayerType => 6,
            ErrorKind::MalformedLayerDeclaration => 10,
            ErrorKind::InflatingLayerGeneric => 11,
            ErrorKind::ArgumentMissing => 12,
            ErrorKind::ArgumentMissingOrNotOneOf => 13,
            ErrorKind::ArgumentMissingOrNotPositive => 14,
            ErrorKind::ArgumentMissingOrNotExpectedType => 15,
        }
    }

    /// Look a kind up by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Returns the string representation of the error kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Generic => "GENERIC",
            ErrorKind::MalformedListSyntax => "MALFORMED_LIST_SYNTAX",
            ErrorKind::MalformedVariableSyntax => "MALFORMED_VARIABLE_SYNTAX",
            ErrorKind::UnexpectedVariableDeclaration => "UNEXPECTED_VARIABLE_DECLARATION",
            ErrorKind::VariableNotFound => "VARIABLE_NOT_FOUND",
            ErrorKind::UnexpectedTitleDeclaration => "UNEXPECTED_TITLE_DECLARATION",
            ErrorKind::UnknownLayerType => "UNKNOWN_LAYER_TYPE",
            ErrorKind::MalformedLayerDeclaration => "MALFORMED_LAYER_DECLARATION",
            ErrorKind::InflatingLayerGeneric => "INFLATING_LAYER_GENERIC",
            ErrorKind::ArgumentMissing => "ARGUMENT_MISSING",
            ErrorKind::ArgumentMissingOrNotOneOf => "ARGUMENT_MISSING_OR_NOT_ONE_OF",
            ErrorKind::ArgumentMissingOrNotPositive => "ARGUMENT_MISSING_OR_NOT_POSITIVE",
            ErrorKind::ArgumentMissingOrNotExpectedType => {
                "ARGUMENT_MISSING_OR_NOT_EXPECTED_TYPE"
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure to inflate a declarative overlay config.
///
/// Constructors never set a line number. Only the inflater, which owns line
/// context, attaches one via [`InflationError::at_line`]; factories must not.
#[derive(Debug)]
pub struct InflationError {
    kind: ErrorKind,
    line: Option<usize>,
    message: Option<String>,
    cause: Option<BoxError>,
    args: Vec<Value>,
}

impl InflationError {
    /// Create an error with the given kind and format args.
    pub fn new(kind: ErrorKind, args: Vec<Value>) -> Self {
        Self {
            kind,
            line: None,
            message: None,
            cause: None,
            args,
        }
    }

    /// Create an error wrapping a cause.
    pub fn with_cause(kind: ErrorKind, cause: impl Into<BoxError>, args: Vec<Value>) -> Self {
        Self {
            cause: Some(cause.into()),
            ..Self::new(kind, args)
        }
    }

    /// Create an error with a detail message.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(kind, args)
        }
    }

    /// Create an error with both a detail message and a cause.
    pub fn with_message_and_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            message: Some(message.into()),
            cause: Some(cause.into()),
            ..Self::new(kind, args)
        }
    }

    /// Create a MALFORMED_LIST_SYNTAX error.
    pub fn malformed_list_syntax(line_text: &str) -> Self {
        Self::new(ErrorKind::MalformedListSyntax, vec![Value::from(line_text)])
    }

    /// Create a MALFORMED_VARIABLE_SYNTAX error.
    pub fn malformed_variable_syntax(declaration: &str) -> Self {
        Self::new(ErrorKind::MalformedVariableSyntax, vec![Value::from(declaration)])
    }

    /// Create an UNEXPECTED_VARIABLE_DECLARATION error.
    pub fn unexpected_variable_declaration() -> Self {
        Self::new(ErrorKind::UnexpectedVariableDeclaration, vec![])
    }

    /// Create a VARIABLE_NOT_FOUND error.
    pub fn variable_not_found(name: &str) -> Self {
        Self::new(ErrorKind::VariableNotFound, vec![Value::from(name)])
    }

    /// Create an UNEXPECTED_TITLE_DECLARATION error.
    pub fn unexpected_title_declaration() -> Self {
        Self::new(ErrorKind::UnexpectedTitleDeclaration, vec![])
    }

    /// Create an UNKNOWN_LAYER_TYPE error. `known` should already be sorted.
    pub fn unknown_layer_type(type_name: &str, known: &[String]) -> Self {
        Self::new(
            ErrorKind::UnknownLayerType,
            vec![Value::from(type_name), Value::from(known.to_vec())],
        )
    }

    /// Create a MALFORMED_LAYER_DECLARATION error.
    pub fn malformed_layer_declaration(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::MalformedLayerDeclaration, message, vec![])
    }

    /// Create an INFLATING_LAYER_GENERIC error wrapping `cause`.
    pub fn inflating_layer(cause: impl Into<BoxError>) -> Self {
        Self::with_cause(ErrorKind::InflatingLayerGeneric, cause, vec![])
    }

    /// Create an ARGUMENT_MISSING error.
    pub fn argument_missing(layer_type: &str, argument: &str, expected_type: &str) -> Self {
        Self::new(
            ErrorKind::ArgumentMissing,
            vec![
                Value::from(layer_type),
                Value::from(argument),
                Value::from(expected_type),
            ],
        )
    }

    /// Create an ARGUMENT_MISSING_OR_NOT_ONE_OF error. `actual` is `None`
    /// when the argument was absent or had no value.
    pub fn argument_not_one_of(
        layer_type: &str,
        argument: &str,
        actual: Option<&str>,
        accepted: &[&str],
    ) -> Self {
        Self::new(
            ErrorKind::ArgumentMissingOrNotOneOf,
            vec![
                Value::from(layer_type),
                Value::from(argument),
                actual.map(Value::from).unwrap_or(Value::Null),
                Value::from(accepted.to_vec()),
            ],
        )
    }

    /// Create an ARGUMENT_MISSING_OR_NOT_POSITIVE error.
    pub fn argument_not_positive(layer_type: &str, argument: &str, example: &str) -> Self {
        Self::new(
            ErrorKind::ArgumentMissingOrNotPositive,
            vec![
                Value::from(layer_type),
                Value::from(argument),
                Value::from(example),
            ],
        )
    }

    /// Create an ARGUMENT_MISSING_OR_NOT_EXPECTED_TYPE error.
    pub fn argument_wrong_type(
        layer_type: &str,
        argument: &str,
        expected_type: &str,
        example: &str,
    ) -> Self {
        Self::new(
            ErrorKind::ArgumentMissingOrNotExpectedType,
            vec![
                Value::from(layer_type),
                Value::from(argument),
                Value::from(expected_type),
                Value::from(example),
            ],
        )
    }

    /// Attach the 0-based line where the error occurred.
    ///
    /// A line that is already set is kept, so the innermost stage with line
    /// context wins and the number never changes once recorded.
    pub fn at_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable numeric code of [`Self::kind`].
    pub fn error_code(&self) -> i32 {
        self.kind.code()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Line number (0-based) or [`LINE_NOT_SPECIFIED`].
    pub fn line_number(&self) -> i64 {
        self.line.map_or(LINE_NOT_SPECIFIED, |line| line as i64)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Machine-readable snapshot for hosts that render their own messages.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code(),
            kind: self.kind,
            line: self.line,
            message: self.to_string(),
            args: self.args.clone(),
            cause: self.cause.as_ref().map(|c| c.to_string()),
        }
    }

    /// Default English rendering of `(kind, args)`.
    fn describe(&self) -> String {
        let arg = |i: usize| -> String {
            match self.args.get(i) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
                Some(Value::Null) | None => "<none>".to_string(),
                Some(other) => other.to_string(),
            }
        };

        match self.kind {
            ErrorKind::Generic => "inflation failed".to_string(),
            ErrorKind::MalformedListSyntax => format!(
                "malformed list syntax at '{}': blocks must be separated by a blank line",
                arg(0)
            ),
            ErrorKind::MalformedVariableSyntax => {
                format!("malformed variable declaration '{}'", arg(0))
            }
            ErrorKind::UnexpectedVariableDeclaration => {
                "variables must be declared before the first layer".to_string()
            }
            ErrorKind::VariableNotFound => format!("variable '{}' is not declared", arg(0)),
            ErrorKind::UnexpectedTitleDeclaration => {
                "title must follow a blank line or start the config".to_string()
            }
            ErrorKind::UnknownLayerType => format!(
                "unknown layer type '{}' (known types: {})",
                arg(0),
                arg(1)
            ),
            ErrorKind::MalformedLayerDeclaration => "malformed layer declaration".to_string(),
            ErrorKind::InflatingLayerGeneric => "failed to inflate layer".to_string(),
            ErrorKind::ArgumentMissing => format!(
                "layer '{}' requires argument '{}' of type {}",
                arg(0),
                arg(1),
                arg(2)
            ),
            ErrorKind::ArgumentMissingOrNotOneOf => format!(
                "layer '{}' argument '{}' is '{}', expected one of: {}",
                arg(0),
                arg(1),
                arg(2),
                arg(3)
            ),
            ErrorKind::ArgumentMissingOrNotPositive => format!(
                "layer '{}' requires a positive argument '{}', e.g. {}",
                arg(0),
                arg(1),
                arg(2)
            ),
            ErrorKind::ArgumentMissingOrNotExpectedType => format!(
                "layer '{}' requires argument '{}' of type {}, e.g. {}",
                arg(0),
                arg(1),
                arg(2),
                arg(3)
            ),
        }
    }
}

impl fmt::Display for InflationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}: ", self.kind)?;
        match &self.message {
            Some(message) => write!(f, "{}", message)?,
            None => write!(f, "{}", self.describe())?,
        }
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

impl StdError for InflationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Serializable form of an [`InflationError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: i32,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}
