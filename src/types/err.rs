//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Some are expected, and are caught inside the library --- e.g. a [PipelineFault] degrades a check to an unknown result, and is never returned to a caller.
//! - Some are external --- e.g. a context returns [ErrorKind::InvalidState] when asked to translate itself while some scope is open.
//!
//! Names of the error enums --- for the most part --- overlap with the areas of the library they are raised in.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

/// The error type returned by fallible functions of the library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Config(ConfigError),
    Consistency(ConsistencyError),
    Lowering(LoweringError),
    Term(TermError),

    /// Some io error, e.g. when writing a weighted encoding.
    Io(std::io::ErrorKind),

    /// The context is in a state where the operation is not supported.
    InvalidState,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e:?}"),
            Self::Consistency(e) => write!(f, "consistency: {e:?}"),
            Self::Lowering(LoweringError::Incomplete(reason)) => write!(f, "lowering: {reason}"),
            Self::Term(e) => write!(f, "term: {e:?}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::InvalidState => write!(f, "invalid state"),
        }
    }
}

impl std::error::Error for ErrorKind {}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Io(e.kind())
    }
}

/// Errors when configuring a context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A value outside the bounds of the named option.
    OutOfRange(&'static str),
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Internal inconsistencies.
///
/// These are never the result of well-formed input, and instead indicate a defect in lowering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConsistencyError {
    /// After a satisfiable check some assumption was not true on the model of the engine.
    AssumptionFalsified(String),

    /// A literal returned by the engine as a premise (or core member) has no recorded provenance.
    UnresolvedLiteral(isize),
}

impl From<ConsistencyError> for ErrorKind {
    fn from(e: ConsistencyError) -> Self {
        ErrorKind::Consistency(e)
    }
}

/// Errors from lowering, when lowering is required to succeed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoweringError {
    /// Lowering returned unknown, for the given reason.
    Incomplete(String),
}

impl From<LoweringError> for ErrorKind {
    fn from(e: LoweringError) -> Self {
        ErrorKind::Lowering(e)
    }
}

/// Errors when constructing terms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TermError {
    /// Bit-vectors are between 1 and 64 bits wide.
    InvalidWidth(u32),

    /// Arguments whose sorts do not fit the operator.
    SortMismatch,

    /// A boolean argument was required.
    NotBoolean,

    /// A bit-vector argument was required.
    NotBitVector,
}

impl From<TermError> for ErrorKind {
    fn from(e: TermError) -> Self {
        ErrorKind::Term(e)
    }
}

/// Faults raised by a stage of the [pipeline](crate::pipeline).
///
/// A fault discards the pipeline, and the check which triggered the fault returns unknown.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PipelineFault {
    /// The resource limit of the term manager was triggered.
    Canceled,

    /// The bit-blaster exceeded its limit on the number of bits.
    BitLimit(usize),

    /// A term of the wrong sort was found in the goal.
    SortMismatch(String),

    /// Some fault in a stage added to the pipeline.
    Stage(&'static str, String),
}

impl std::fmt::Display for PipelineFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canceled => write!(f, "canceled"),
            Self::BitLimit(limit) => write!(f, "bit-blaster exceeded {limit} bits"),
            Self::SortMismatch(term) => write!(f, "ill-sorted term {term}"),
            Self::Stage(name, msg) => write!(f, "exception in {name}: {msg}"),
        }
    }
}
