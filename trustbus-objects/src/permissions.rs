use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ObjectError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How far below the granted topic a consume or tap permission reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WildcardScope {
    /// Only the exact topic, no wildcard subscriptions.
    Exact,

    /// Subscriptions may use `+`.
    SingleLevel,

    /// Subscriptions may use `+` and `*`.
    MultiLevel,
}

/// The permissions an access DOT grants on its topic.
///
/// The textual form is a sequence of tokens, each granted at most once:
///
/// | token            | permission                                 |
/// |------------------|--------------------------------------------|
/// | `C`, `C+`, `C*`  | consume, optionally with wildcards         |
/// | `T`, `T+`, `T*`  | tap, optionally with wildcards             |
/// | `P`              | publish                                    |
/// | `L`              | list                                       |
///
/// For example `C*P` grants consume with any wildcard plus publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessPermissions {
    consume: Option<WildcardScope>,
    tap: Option<WildcardScope>,
    publish: bool,
    list: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl AccessPermissions {
    /// Returns the consume scope, if consuming is granted.
    pub fn consume(&self) -> Option<WildcardScope> {
        self.consume
    }

    /// Returns the tap scope, if tapping is granted.
    pub fn tap(&self) -> Option<WildcardScope> {
        self.tap
    }

    /// Returns whether publishing is granted.
    pub fn can_publish(&self) -> bool {
        self.publish
    }

    /// Returns whether listing is granted.
    pub fn can_list(&self) -> bool {
        self.list
    }

    fn is_empty(&self) -> bool {
        self.consume.is_none() && self.tap.is_none() && !self.publish && !self.list
    }
}

impl WildcardScope {
    fn suffix(&self) -> &'static str {
        match self {
            WildcardScope::Exact => "",
            WildcardScope::SingleLevel => "+",
            WildcardScope::MultiLevel => "*",
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for AccessPermissions {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ObjectError::InvalidPermissions(s.to_owned());
        let mut permissions = AccessPermissions::default();
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                'C' | 'T' => {
                    let scope = match chars.peek() {
                        Some('+') => {
                            chars.next();
                            WildcardScope::SingleLevel
                        }
                        Some('*') => {
                            chars.next();
                            WildcardScope::MultiLevel
                        }
                        _ => WildcardScope::Exact,
                    };

                    let slot = if c == 'C' {
                        &mut permissions.consume
                    } else {
                        &mut permissions.tap
                    };
                    if slot.replace(scope).is_some() {
                        return Err(invalid());
                    }
                }
                'P' if !permissions.publish => permissions.publish = true,
                'L' if !permissions.list => permissions.list = true,
                _ => return Err(invalid()),
            }
        }

        if permissions.is_empty() {
            return Err(invalid());
        }

        Ok(permissions)
    }
}

impl Display for AccessPermissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(scope) = self.consume {
            write!(f, "C{}", scope.suffix())?;
        }
        if let Some(scope) = self.tap {
            write!(f, "T{}", scope.suffix())?;
        }
        if self.publish {
            write!(f, "P")?;
        }
        if self.list {
            write!(f, "L")?;
        }

        Ok(())
    }
}

impl Serialize for AccessPermissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AccessPermissions {
    fn deserialize<D>(deserializer: D) -> Result<AccessPermissions, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
