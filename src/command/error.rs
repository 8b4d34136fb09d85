// Fri Jan 16 2026 - Alex

use thiserror::Error;

/// Errors produced while splitting a line into tokens.
///
/// Every variant carries the byte offset of the offending character so the
/// caller can point at it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Unterminated quote starting at offset {0}")]
    UnterminatedQuote(usize),
    #[error("Unfinished escape sequence at offset {0}")]
    UnfinishedEscape(usize),
    #[error("Invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
}

impl TokenizeError {
    pub fn offset(&self) -> usize {
        match self {
            TokenizeError::UnterminatedQuote(offset)
            | TokenizeError::UnfinishedEscape(offset)
            | TokenizeError::InvalidEscape(offset)
            | TokenizeError::UnexpectedEof(offset) => *offset,
        }
    }

    /// The same error with its offset moved `by` bytes to the right.
    pub fn shifted(&self, by: usize) -> Self {
        match self {
            TokenizeError::UnterminatedQuote(offset) => TokenizeError::UnterminatedQuote(offset + by),
            TokenizeError::UnfinishedEscape(offset) => TokenizeError::UnfinishedEscape(offset + by),
            TokenizeError::InvalidEscape(offset) => TokenizeError::InvalidEscape(offset + by),
            TokenizeError::UnexpectedEof(offset) => TokenizeError::UnexpectedEof(offset + by),
        }
    }

    /// A line of spaces with a `^` under the offending character of `input`.
    pub fn caret_line(&self, input: &str) -> String {
        let offset = self.offset().min(input.len());
        let column = input
            .get(..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset);
        format!("{}^", " ".repeat(column))
    }
}

/// Mistakes in a command definition. Raised only while registering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Command name '{0}' is already registered")]
    DuplicateName(String),

    #[error("Invalid command name '{0}': only ASCII letters and digits are allowed")]
    InvalidName(String),

    #[error("Invalid modifiers on parameter '{parameter}': {reason}")]
    InvalidModifierCombination { parameter: String, reason: String },

    #[error("Parameter '{parameter}' of type {type_name} cannot be converted from text")]
    NonConvertibleParameter { parameter: String, type_name: String },

    #[error("Raw command '{command}' must take exactly one text parameter")]
    RawInputArityMismatch { command: String },

    #[error("Parameter '{parameter}' is passed by reference; only by-value parameters are supported")]
    ByReferenceParameter { parameter: String },

    #[error("Verb '{verb}' cannot {reason}; register them on its sub-commands")]
    InvalidVerb { verb: String, reason: String },

    #[error("Default '{value}' for parameter '{parameter}' is invalid: {reason}")]
    InvalidDefault {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Failures while dispatching a line. These are recoverable: report and keep going.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing required argument '{parameter}' at position {index}")]
    MissingArgument {
        command: String,
        index: usize,
        parameter: String,
    },

    #[error("{command}: cannot convert '{token}' to {type_name} for '{parameter}': {reason}")]
    ArgumentConversion {
        command: String,
        parameter: String,
        token: String,
        type_name: String,
        reason: String,
    },

    #[error("{command}: expected at most {expected} argument(s), got {got}")]
    TooManyArguments {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl DispatchError {
    // Tokenizer offsets are relative to the text that was tokenized; re-base them on the enclosing line.
    pub(crate) fn rebased(self, by: usize) -> Self {
        match self {
            DispatchError::Tokenize(err) => DispatchError::Tokenize(err.shifted(by)),
            other => other,
        }
    }
}

pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
