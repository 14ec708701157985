//! Error types for `A3Lib`

use thiserror::Error;

/// The error type for `A3Lib` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Binary Primitive Errors ====================
    /// The stream ended before a declared length was satisfied.
    #[error("unexpected end of file at offset {offset}")]
    UnexpectedEof {
        /// Byte offset at which the read started.
        offset: u64,
    },

    /// A null-terminated string had no terminator before end of stream.
    #[error("unterminated string starting at offset {offset}")]
    MalformedString {
        /// Byte offset of the first string byte.
        offset: u64,
    },

    /// A string does not fit the fixed-width field it is written to.
    #[error("'{value}' is {} bytes, longer than its {width}-byte field", value.len())]
    FieldTooLong {
        /// The string that was rejected.
        value: String,
        /// Width of the field.
        width: usize,
    },

    // ==================== Header Errors ====================
    /// Header padding or layout is not what the format requires.
    #[error("malformed {format} header: {reason}")]
    MalformedHeader {
        /// Format name (e.g. "rapified config").
        format: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The file does not start with the expected magic bytes.
    #[error("unsupported {format} signature: {found:?}")]
    UnsupportedSignature {
        /// Format name.
        format: &'static str,
        /// The bytes found where the signature was expected.
        found: String,
    },

    /// The file declares a version this library cannot read.
    #[error("unsupported {format} version: {version}")]
    UnsupportedVersion {
        /// Format name.
        format: &'static str,
        /// Version found in the file.
        version: String,
    },

    // ==================== P3D Errors ====================
    /// The `TAGG` section signature is missing or misplaced.
    #[error("invalid TAGG section at offset {offset}")]
    InvalidTaggSection {
        /// Byte offset where `TAGG` was expected.
        offset: u64,
    },

    /// A TAGG payload length does not match the LOD it belongs to.
    #[error("TAGG '{name}' has length {found}, expected {expected}")]
    InvalidTaggLength {
        /// TAGG name.
        name: String,
        /// Length implied by the LOD counts.
        expected: u32,
        /// Length declared in the file.
        found: u32,
    },

    /// A face with an unsupported number of sides.
    #[error("face {index} has {sides} sides (expected 3 or 4)")]
    InvalidFace {
        /// Face index within its LOD.
        index: usize,
        /// Declared side count.
        sides: u32,
    },

    /// An end marker with unexpected length, a missing end marker, or trailing bytes.
    #[error("invalid terminator at offset {offset}: {what}")]
    InvalidTerminator {
        /// Description of the terminator problem.
        what: String,
        /// Byte offset where it was detected.
        offset: u64,
    },

    // ==================== Config Errors ====================
    /// A class parent name could not be resolved lexically.
    #[error("class '{class}' inherits from unresolved parent '{parent}'")]
    UnresolvedParent {
        /// Path of the class declaring the parent.
        class: String,
        /// The parent name that was not found.
        parent: String,
    },

    /// A class or property name collides with an existing one.
    #[error("duplicate definition of '{name}' in '{path}'")]
    DuplicateDefinition {
        /// Path of the enclosing class.
        path: String,
        /// The duplicated name.
        name: String,
    },

    /// A recognised but unsupported text-config statement.
    #[error("unsupported '{construct}' statement at line {line}, column {column}")]
    UnsupportedConstruct {
        /// Statement keyword.
        construct: String,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },

    /// A text config syntax error.
    #[error("config syntax error at line {line}, column {column}: {message}")]
    ConfigSyntax {
        /// Description of the error.
        message: String,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },

    /// An unknown entry or value tag in a rapified config.
    #[error("invalid rapified entry type {tag} at offset {offset}")]
    InvalidEntryType {
        /// The tag byte.
        tag: u8,
        /// Byte offset of the tag.
        offset: u64,
    },

    // ==================== RTM Errors ====================
    /// A bone could not be found in the supplied skeleton hierarchy.
    #[error("bone '{bone}' cannot be resolved in the supplied hierarchy")]
    UnresolvableBoneHierarchy {
        /// The bone name.
        bone: String,
    },

    /// A model config has no skeleton of the requested name under `CfgSkeletons`.
    #[error("skeleton '{name}' not found in CfgSkeletons")]
    MissingSkeleton {
        /// The requested skeleton name.
        name: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Input whose format could not be recognised.
    #[error("unrecognised format: {0}")]
    UnknownFormat(String),
}

/// Coarse failure categories shared by every codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad magic, version or header padding.
    MalformedHeader,
    /// Stream shorter than a declared length.
    UnexpectedEof,
    /// Config parent or RTM bone lookup failed.
    UnresolvedReference,
    /// Name collision where uniqueness is required.
    DuplicateDefinition,
    /// Text grammar `delete`/`enum` statements.
    UnsupportedConstruct,
    /// End markers with unexpected length or trailing bytes.
    InvalidTerminator,
    /// Operating system I/O failure.
    Io,
    /// Anything else (syntax, layout and interchange errors).
    Other,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::UnexpectedEof { .. } | Error::MalformedString { .. } => {
                ErrorCategory::UnexpectedEof
            }
            Error::MalformedHeader { .. }
            | Error::UnsupportedSignature { .. }
            | Error::UnsupportedVersion { .. }
            | Error::InvalidTaggSection { .. } => ErrorCategory::MalformedHeader,
            Error::UnresolvedParent { .. }
            | Error::UnresolvableBoneHierarchy { .. }
            | Error::MissingSkeleton { .. } => ErrorCategory::UnresolvedReference,
            Error::DuplicateDefinition { .. } => ErrorCategory::DuplicateDefinition,
            Error::UnsupportedConstruct { .. } => ErrorCategory::UnsupportedConstruct,
            Error::InvalidTerminator { .. } => ErrorCategory::InvalidTerminator,
            _ => ErrorCategory::Other,
        }
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `A3Lib` operations.
pub type Result<T> = std::result::Result<T, Error>;
