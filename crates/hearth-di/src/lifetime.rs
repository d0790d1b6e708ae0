//! Service lifetime policy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// A Lifetime expresses the conditions under which an instance of a type is
/// constructed or reused across distinct resolutions.
///
/// Only [`Lifetime::TRANSIENT`], [`Lifetime::SCOPED`] and [`Lifetime::SINGLETON`]
/// are defined. Other raw values can be built with [`Lifetime::from_raw`] (for
/// instance when read from an external source) but are rejected by every
/// operation that consumes a lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lifetime(u8);

impl Lifetime {
    /// A new instance is created every time the type is resolved.
    pub const TRANSIENT: Lifetime = Lifetime(1);

    /// One instance per resolution scope. Only valid for sharable types.
    pub const SCOPED: Lifetime = Lifetime(2);

    /// One instance per root provider, shared by every scope. Only valid for
    /// sharable types.
    pub const SINGLETON: Lifetime = Lifetime(3);

    const DEFINED: [Lifetime; 3] = [Self::TRANSIENT, Self::SCOPED, Self::SINGLETON];

    /// Wraps a raw value without validating it.
    pub const fn from_raw(value: u8) -> Self {
        Lifetime(value)
    }

    /// The raw value.
    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn is_defined(self) -> bool {
        Self::DEFINED.contains(&self)
    }

    /// Returns `self` if it is one of the defined lifetimes.
    pub fn validate(self) -> DiResult<Self> {
        if self.is_defined() {
            Ok(self)
        } else {
            Err(DiError::UndefinedLifetime { value: self.0 })
        }
    }

    /// Human readable name; `"Unknown"` for undefined values.
    pub fn name(self) -> &'static str {
        match self {
            Self::TRANSIENT => "Transient",
            Self::SCOPED => "Scoped",
            Self::SINGLETON => "Singleton",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Lifetime {
    type Error = DiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lifetime(value).validate()
    }
}

impl FromStr for Lifetime {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u8>() {
            return Lifetime::try_from(raw);
        }
        Self::DEFINED
            .into_iter()
            .find(|lifetime| lifetime.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DiError::UndefinedLifetimeName {
                name: trimmed.to_string(),
            })
    }
}

impl TryFrom<String> for Lifetime {
    type Error = DiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lifetime> for String {
    fn from(lifetime: Lifetime) -> Self {
        lifetime.name().to_lowercase()
    }
}
