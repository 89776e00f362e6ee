//! Crate-level error types.
//!
//! Each boundary gets its own taxonomy, and every taxonomy is recovered
//! where it is detected: an [`EngineError`] leaves the scene at the last
//! successfully synchronized configuration, a [`ParseError`] leaves the
//! previously displayed structure in place, and an [`InterpreterError`]
//! degrades to a fallback message without touching state. None of them
//! terminate the session.

use std::fmt;

/// Failures reported by the visualization engine boundary.
#[derive(Debug)]
pub enum EngineError {
    /// An atomic scene transaction was rejected or failed partway.
    Transaction(String),
    /// The engine failed to load a structure into the scene.
    Load(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction(msg) => {
                write!(f, "scene transaction failed: {msg}")
            }
            Self::Load(msg) => write!(f, "structure load failed: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Failures while resolving a structure source (remote or local file).
#[derive(Debug)]
pub enum ParseError {
    /// The identifier is not a well-formed structure id.
    BadIdentifier(String),
    /// A color value is not a well-formed `#rrggbb` encoding.
    BadColor(String),
    /// Remote fetch of a structure file failed.
    Fetch(String),
    /// Local file I/O failure.
    Io(std::io::Error),
    /// A text-format file did not decode as UTF-8.
    Encoding(String),
    /// A view-preset file failed to parse or serialize.
    Preset(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadIdentifier(id) => {
                write!(f, "not a valid structure identifier: {id}")
            }
            Self::BadColor(msg) => {
                write!(f, "not a valid color: {msg}")
            }
            Self::Fetch(msg) => write!(f, "structure fetch failed: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encoding(msg) => {
                write!(f, "text structure file is not UTF-8: {msg}")
            }
            Self::Preset(msg) => write!(f, "preset parse error: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failures at the generative-language service boundary.
///
/// These never reach the user as errors; the interpreter recovers them
/// into a fixed fallback message with no state update.
#[derive(Debug)]
pub enum InterpreterError {
    /// Network or HTTP failure talking to the service.
    Service(String),
    /// The service envelope was missing the expected reply text.
    Envelope(String),
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(msg) => {
                write!(f, "language service request failed: {msg}")
            }
            Self::Envelope(msg) => {
                write!(f, "malformed language service response: {msg}")
            }
        }
    }
}

impl std::error::Error for InterpreterError {}
