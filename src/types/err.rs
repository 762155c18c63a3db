//! Error types used in the library.
//!
//! - Parse errors are raised when reading a formula, and when reading the printed value of a model binding.
//!   The latter should never occur with a well-behaved solver, and so is fatal to a sampling session.
//! - Build errors are raised when a formula cannot be represented, e.g. as a coefficient overflows.
//! - IO errors carry the [kind](std::io::ErrorKind) of the underlying error, so errors remain comparable.
//!
//! Names of the error enums --- for the most part --- overlap with the area of the library which raises them.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Build(BuildError),
    Config(ConfigError),
    IO(IOError),
    Parse(ParseError),
}

/// Noted errors when building a formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// Some coefficient or constant escaped the range of an `i64`.
    Overflow,

    /// A variable was declared twice.
    Redeclaration,
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors when configuring a session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A value outside the permitted range of the named option.
    OutOfRange(&'static str),
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

/// Errors with input or output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IOError {
    /// The input could not be read.
    Read(std::io::ErrorKind),

    /// The samples file could not be opened.
    /// Raised before any solving takes place.
    OpenSamples(std::io::ErrorKind),

    /// A sample could not be written.
    Write(std::io::ErrorKind),
}

impl From<IOError> for ErrorKind {
    fn from(e: IOError) -> Self {
        ErrorKind::IO(e)
    }
}

/// Errors during parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A closing parenthesis without an opening parenthesis, or the reverse.
    Unbalanced,

    /// Input ended within some expression.
    UnexpectedEnd,

    /// A symbol which was not declared.
    UnknownSymbol(String),

    /// A command or operator outside of the supported fragment.
    Unsupported(String),

    /// A term of one sort was given where a term of another sort was required.
    Sort(String),

    /// A product of two non-constant terms.
    Nonlinear,

    /// A numeral too large to represent.
    Numeral(String),

    /// The printed value of a model binding was not an integer or boolean literal.
    ModelLiteral(String),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}
