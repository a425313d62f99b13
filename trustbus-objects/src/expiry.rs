use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::{ObjectError, ObjectResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The absolute time after which a message or DOT must no longer be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Expiry(SystemTime);

/// An expiry given either as an absolute time or relative to now.
///
/// When both forms are supplied the relative one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirySpec {
    /// Absolute expiry.
    pub at: Option<SystemTime>,

    /// Expiry relative to the moment it is applied.
    pub after: Option<Duration>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Expiry {
    /// Creates an expiry at an absolute time.
    pub fn at(time: SystemTime) -> Self {
        Self(time)
    }

    /// Creates an expiry `delta` from now.
    ///
    /// # Errors
    ///
    /// Fails when `delta` pushes the time past what the platform can represent.
    pub fn from_now(delta: Duration) -> ObjectResult<Self> {
        SystemTime::now()
            .checked_add(delta)
            .map(Self)
            .ok_or(ObjectError::ExpiryOverflow(delta))
    }

    /// Returns the absolute expiry time.
    pub fn time(&self) -> SystemTime {
        self.0
    }

    /// Returns whether the expiry lies in the past.
    pub fn has_passed(&self) -> bool {
        self.0 <= SystemTime::now()
    }
}

impl ExpirySpec {
    /// Resolves the effective expiry, preferring the relative form.
    pub fn resolve(&self) -> ObjectResult<Option<Expiry>> {
        match (self.after, self.at) {
            (Some(delta), _) => Expiry::from_now(delta).map(Some),
            (None, Some(time)) => Ok(Some(Expiry::at(time))),
            (None, None) => Ok(None),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
