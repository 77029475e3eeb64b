use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, num::NonZeroU64, str::FromStr};
use thiserror::Error;

/// Identifier of a task (positive integer, never zero).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TaskId(NonZeroU64);

/// Raised when text cannot be interpreted as a task id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid task id `{input}`: expected a positive integer")]
pub struct InvalidTaskId {
    /// Offending input.
    pub input: String,
}

impl TaskId {
    /// The id assigned to the first task of an empty collection.
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    /// Wrap a raw value, returning `None` for zero.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Identifier following `self`.
    #[must_use]
    pub const fn successor(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Next free identifier given the ids already in use: `max + 1`, or `1` when empty.
    #[must_use]
    pub fn next_after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        existing
            .into_iter()
            .max()
            .map_or(Self::FIRST, Self::successor)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = InvalidTaskId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidTaskId {
                input: trimmed.to_owned(),
            })
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(self.get())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        Self::new(raw).ok_or_else(|| serde::de::Error::custom("task id must be a positive integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> TaskId {
        TaskId::new(raw).unwrap_or_else(|| panic!("{raw} is a valid id"))
    }

    #[test]
    fn next_after_empty_is_one() {
        assert_eq!(TaskId::next_after(Vec::new()), TaskId::FIRST);
        assert_eq!(TaskId::FIRST.get(), 1);
    }

    #[test]
    fn next_after_skips_gaps() {
        let next = TaskId::next_after([id(1), id(7), id(3)]);
        assert_eq!(next, id(8));
    }

    #[test]
    fn zero_is_rejected() {
        assert!(TaskId::new(0).is_none());
        let Err(err) = "0".parse::<TaskId>() else {
            panic!("zero must not parse");
        };
        assert_eq!(err.input, "0");
    }

    #[test]
    fn parse_trims_and_rejects_garbage() {
        assert_eq!(" 42 ".parse::<TaskId>().ok(), Some(id(42)));
        assert!("-3".parse::<TaskId>().is_err());
        assert!("abc".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
    }

    #[test]
    fn serde_uses_plain_numbers() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&id(5))?, "5");
        let parsed: TaskId = serde_json::from_str("12")?;
        assert_eq!(parsed, id(12));
        assert!(serde_json::from_str::<TaskId>("0").is_err());
        Ok(())
    }
}
