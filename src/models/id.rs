use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Prefix carried by ids of recipes generated on the client
pub const AI_ID_PREFIX: &str = "ai_";

/// Opaque record identifier.
///
/// The backend sends numeric ids for catalogue recipes and users, while
/// generated recipes use `"ai_<millis>"`. Both are kept as text so that
/// favorites, lookups and the persisted store compare the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id for a freshly generated recipe
    pub fn generated(unix_millis: i64) -> Self {
        Self(format!("{}{}", AI_ID_PREFIX, unix_millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_generated(&self) -> bool {
        self.0.starts_with(AI_ID_PREFIX)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Id(text),
            RawId::Number(number) => Id(number.to_string()),
        })
    }
}
