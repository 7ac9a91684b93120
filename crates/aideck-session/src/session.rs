//! Session data structure

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::cookie::Cookie;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Cookies in the order the jar reported them
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    /// Last time the session was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(cookies: Vec<Cookie>) -> Self {
        Self {
            cookies,
            updated_at: Some(Utc::now()),
        }
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }
}

/// Session name → Session, kept in persistence order.
///
/// Serializes as a JSON object whose key order is the insertion order.
/// Overwriting an existing name keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMap {
    entries: Vec<(String, Session)>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Session> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Insert or replace; returns the previous session for `name`
    pub fn insert(&mut self, name: String, session: Session) -> Option<Session> {
        match self.position(&name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, session)),
            None => {
                self.entries.push((name, session));
                None
            }
        }
    }

    /// Remove `name`, keeping the order of the remaining entries
    pub fn remove(&mut self, name: &str) -> Option<Session> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).1)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl Serialize for SessionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, session) in &self.entries {
            map.serialize_entry(name, session)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SessionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SessionMapVisitor;

        impl<'de> Visitor<'de> for SessionMapVisitor {
            type Value = SessionMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of session names to sessions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SessionMap, A::Error> {
                let mut map = SessionMap::new();
                while let Some((name, session)) = access.next_entry::<String, Session>()? {
                    map.insert(name, session);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SessionMapVisitor)
    }
}
