//! Error types: one small enum per concern, manual `Display` + `Error`
//! impls, no `thiserror`.

use std::fmt;
use std::path::PathBuf;

/// A syntax error raised while tokenizing a stylesheet into an [`crate::ast::AstNode`] tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseErrorKind {
  pub message: String,
  pub line: u32,
  pub column: u32,
}

impl fmt::Display for ParseErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}:{}: {}", self.line, self.column, self.message)
  }
}

impl std::error::Error for ParseErrorKind {}

/// Errors raised while evaluating an `AstNode` tree into an `Engine`.
#[derive(Debug)]
pub enum EngineError {
  /// The parser failed on a primary operand.
  Parse(ParseErrorKind),
  /// Reading a primary stylesheet file failed.
  Io(PathBuf, std::io::Error),
}

impl fmt::Display for EngineError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      EngineError::Parse(e) => write!(f, "parse error: {}", e),
      EngineError::Io(path, e) => write!(f, "failed to read {}: {}", path.display(), e),
    }
  }
}

impl std::error::Error for EngineError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      EngineError::Parse(e) => Some(e),
      EngineError::Io(_, e) => Some(e),
    }
  }
}

impl From<ParseErrorKind> for EngineError {
  fn from(e: ParseErrorKind) -> Self {
    EngineError::Parse(e)
  }
}

/// Top-level error returned by the CLI binary.
#[derive(Debug)]
pub enum CliError {
  /// Wrong number of positional arguments.
  Usage(String),
  /// I/O error writing the result to the output target.
  Output(std::io::Error),
  /// The engine failed to build a model for one of the two inputs.
  Engine(EngineError),
}

impl fmt::Display for CliError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      CliError::Usage(msg) => write!(f, "{}", msg),
      CliError::Output(e) => write!(f, "failed to write output: {}", e),
      CliError::Engine(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for CliError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CliError::Usage(_) => None,
      CliError::Output(e) => Some(e),
      CliError::Engine(e) => Some(e),
    }
  }
}

impl From<EngineError> for CliError {
  fn from(e: EngineError) -> Self {
    CliError::Engine(e)
  }
}
