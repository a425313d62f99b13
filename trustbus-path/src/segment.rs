use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{PathError, PathResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Matches exactly one segment of a topic.
pub const SINGLE_WILDCARD: &str = "+";

/// Matches zero or more segments of a topic.
pub const MULTI_WILDCARD: &str = "*";

lazy_static! {
    static ref RE_VALID_TOPIC_SEGMENT: Regex = Regex::new(r"^[^\s/+*]+$").unwrap();
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A `TopicSegment` is a single part of a topic suffix. For example, the suffix
/// `building/floor2/+/temperature` includes the segments `building`, `floor2`, `+` and
/// `temperature`.
///
/// Unlike file system paths, topic segments are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopicSegment {
    /// A concrete segment.
    Named(String),

    /// `+`, matching exactly one segment.
    SingleWildcard,

    /// `*`, matching zero or more segments.
    MultiWildcard,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl TopicSegment {
    /// Validates a topic segment.
    pub fn validate(segment: &str) -> PathResult<()> {
        if segment == SINGLE_WILDCARD || segment == MULTI_WILDCARD {
            return Ok(());
        }

        if !RE_VALID_TOPIC_SEGMENT.is_match(segment) {
            return Err(PathError::InvalidTopicSegment(segment.to_owned()));
        }

        Ok(())
    }

    /// Returns whether the segment is a wildcard of either kind.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, TopicSegment::Named(_))
    }

    /// Returns the segment as a string.
    pub fn as_str(&self) -> &str {
        match self {
            TopicSegment::Named(segment) => segment.as_str(),
            TopicSegment::SingleWildcard => SINGLE_WILDCARD,
            TopicSegment::MultiWildcard => MULTI_WILDCARD,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for TopicSegment {
    type Err = PathError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        TopicSegment::try_from(segment)
    }
}

impl TryFrom<&str> for TopicSegment {
    type Error = PathError;

    fn try_from(segment: &str) -> Result<Self, Self::Error> {
        TopicSegment::validate(segment)?;
        match segment {
            SINGLE_WILDCARD => Ok(TopicSegment::SingleWildcard),
            MULTI_WILDCARD => Ok(TopicSegment::MultiWildcard),
            _ => Ok(TopicSegment::Named(segment.to_owned())),
        }
    }
}

impl Display for TopicSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
