use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a topic suffix operation.
pub type PathResult<T> = Result<T, PathError>;

/// An error that occurred during a topic suffix operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// When a topic segment is invalid.
    #[error("Invalid topic segment: {0:?}")]
    InvalidTopicSegment(String),

    /// The suffix has no segments at all.
    #[error("Empty topic suffix")]
    EmptySuffix,

    /// Leading, trailing or doubled `/`.
    #[error("Empty segment in topic suffix: {0:?}")]
    EmptySegment(String),

    /// More than one `*` in a suffix.
    #[error("More than one `*` in topic suffix: {0:?}")]
    MultipleMultiWildcards(String),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `PathResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> PathResult<T> {
    Result::Ok(value)
}
