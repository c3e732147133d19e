//! Typed access to handler arguments.
//!
//! Handlers receive `Option<Value>`; [`Args`] turns that into an object map
//! and offers extractors that report problems as
//! [`HandlerError::InvalidArgs`] with messages fit for the end user.

use serde_json::{Map, Value};

use crate::error::HandlerError;

type Result<T> = std::result::Result<T, HandlerError>;

/// Caller arguments of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Args {
    map: Map<String, Value>,
}

impl Args {
    /// Accepts `None`, `null` or a JSON object.
    pub fn from_value(value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self { map }),
            Some(_) => Err(HandlerError::InvalidArgs(
                "Arguments must be a JSON object".into(),
            )),
        }
    }

    /// Raw access; `null` is treated as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    /// Whether the caller supplied `name` at all, including as `null`.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// A required string, trimmed, that must not be empty.
    pub fn required_str(&self, name: &str) -> Result<String> {
        match self.optional_str(name)? {
            Some(s) => Ok(s),
            None => Err(invalid(format!("`{name}` is required"))),
        }
    }

    /// An optional string, trimmed.  Present-but-blank is an error.
    pub fn optional_str(&self, name: &str) -> Result<Option<String>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let s = value
            .as_str()
            .ok_or_else(|| invalid(format!("`{name}` must be a string")))?
            .trim();
        if s.is_empty() {
            return Err(invalid(format!("`{name}` must not be empty")));
        }
        Ok(Some(s.to_owned()))
    }

    pub fn optional_bool(&self, name: &str) -> Result<Option<bool>> {
        self.get(name)
            .map(|v| {
                v.as_bool()
                    .ok_or_else(|| invalid(format!("`{name}` must be a boolean")))
            })
            .transpose()
    }

    /// An optional non-negative integer that fits in `u32`.
    pub fn optional_u32(&self, name: &str) -> Result<Option<u32>> {
        self.get(name)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid(format!("`{name}` must be a non-negative integer")))
            })
            .transpose()
    }

    /// A patch field that may be cleared.
    ///
    /// Absent gives `None`, explicit `null` or a blank string gives
    /// `Some(None)`, a value gives `Some(Some(value))`.
    pub fn nullable_str(&self, name: &str) -> Result<Option<Option<String>>> {
        if !self.contains(name) {
            return Ok(None);
        }
        match self.get(name) {
            None => Ok(Some(None)),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Some(None)),
            Some(Value::String(s)) => Ok(Some(Some(s.trim().to_owned()))),
            Some(_) => Err(invalid(format!("`{name}` must be a string or null"))),
        }
    }

    /// Like [`Args::nullable_str`] for integers.
    pub fn nullable_u32(&self, name: &str) -> Result<Option<Option<u32>>> {
        if !self.contains(name) {
            return Ok(None);
        }
        match self.get(name) {
            None => Ok(Some(None)),
            Some(_) => self.optional_u32(name).map(Some),
        }
    }
}

fn invalid(msg: String) -> HandlerError {
    HandlerError::InvalidArgs(msg)
}
