use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{PathError, PathResult, TopicSegment};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The topic segment separator.
pub const TOPIC_SEPARATOR: char = '/';

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A validated topic suffix such as `building/floor2/+/temperature`.
///
/// A suffix may contain any number of `+` segments but at most one `*` segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicSuffix {
    segments: Vec<TopicSegment>,
}

/// The outcome of analyzing a raw topic suffix string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixAnalysis {
    /// Whether the suffix is syntactically valid.
    pub valid: bool,

    /// Whether the suffix contains a `+` segment.
    pub has_single_wildcard: bool,

    /// Whether the suffix contains a `*` segment.
    pub has_multi_wildcard: bool,

    /// The number of segments, or zero when invalid.
    pub segment_count: usize,

    /// Why the suffix is invalid.
    pub problem: Option<PathError>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl TopicSuffix {
    /// Creates a suffix from an iterator of segments.
    pub fn try_from_iter<'a>(iter: impl IntoIterator<Item = &'a str>) -> PathResult<Self> {
        let segments = iter
            .into_iter()
            .map(TopicSegment::try_from)
            .collect::<PathResult<Vec<_>>>()?;

        Self::from_segments(segments)
    }

    fn from_segments(segments: Vec<TopicSegment>) -> PathResult<Self> {
        if segments.is_empty() {
            return Err(PathError::EmptySuffix);
        }

        let stars = segments
            .iter()
            .filter(|s| **s == TopicSegment::MultiWildcard)
            .count();
        if stars > 1 {
            let joined = segments
                .iter()
                .map(TopicSegment::as_str)
                .collect::<Vec<_>>()
                .join("/");
            return Err(PathError::MultipleMultiWildcards(joined));
        }

        Ok(Self { segments })
    }

    /// Returns the segments of the suffix.
    pub fn get_segments(&self) -> &[TopicSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; an empty suffix cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns whether the suffix contains a `+` segment.
    pub fn has_single_wildcard(&self) -> bool {
        self.segments.contains(&TopicSegment::SingleWildcard)
    }

    /// Returns whether the suffix contains a `*` segment.
    pub fn has_multi_wildcard(&self) -> bool {
        self.segments.contains(&TopicSegment::MultiWildcard)
    }

    /// Returns whether the suffix names a single concrete topic.
    pub fn is_concrete(&self) -> bool {
        !self.segments.iter().any(TopicSegment::is_wildcard)
    }

    /// Checks whether `topic` is matched by this suffix used as a pattern.
    ///
    /// Wildcards in `topic` are compared literally.
    pub fn matches(&self, topic: &TopicSuffix) -> bool {
        matches_segments(&self.segments, &topic.segments)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Analyzes a raw topic suffix, reporting validity and wildcard usage.
pub fn analyze_suffix(suffix: &str) -> SuffixAnalysis {
    match TopicSuffix::from_str(suffix) {
        Ok(parsed) => SuffixAnalysis {
            valid: true,
            has_single_wildcard: parsed.has_single_wildcard(),
            has_multi_wildcard: parsed.has_multi_wildcard(),
            segment_count: parsed.len(),
            problem: None,
        },
        Err(e) => SuffixAnalysis {
            valid: false,
            has_single_wildcard: false,
            has_multi_wildcard: false,
            segment_count: 0,
            problem: Some(e),
        },
    }
}

fn matches_segments(pattern: &[TopicSegment], topic: &[TopicSegment]) -> bool {
    match pattern.split_first() {
        None => topic.is_empty(),
        Some((TopicSegment::MultiWildcard, rest)) => {
            (0..=topic.len()).any(|skip| matches_segments(rest, &topic[skip..]))
        }
        Some((TopicSegment::SingleWildcard, rest)) => {
            !topic.is_empty() && matches_segments(rest, &topic[1..])
        }
        Some((named, rest)) => {
            topic.first() == Some(named) && matches_segments(rest, &topic[1..])
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for TopicSuffix {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::EmptySuffix);
        }

        let segments = s
            .split(TOPIC_SEPARATOR)
            .map(|segment| {
                if segment.is_empty() {
                    return Err(PathError::EmptySegment(s.to_owned()));
                }
                TopicSegment::try_from(segment)
            })
            .collect::<PathResult<Vec<_>>>()?;

        Self::from_segments(segments)
    }
}

impl TryFrom<&str> for TopicSuffix {
    type Error = PathError;

    fn try_from(suffix: &str) -> Result<Self, Self::Error> {
        suffix.parse()
    }
}

impl Display for TopicSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.segments
                .iter()
                .map(TopicSegment::as_str)
                .collect::<Vec<_>>()
                .join("/")
        )
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
