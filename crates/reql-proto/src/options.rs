//! Global query options sent alongside a START query
//!
//! Deserializable so applications can keep defaults in their own config
//! files; unknown keys are carried through as extras.

use reql::{Value, r};
use serde::{Deserialize, Serialize};

use crate::protocol::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    Single,
    Majority,
    Outdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    /// Default database for tables referenced without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_mode: Option<ReadMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<Durability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noreply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_limit: Option<u64>,
    /// Options without a dedicated field, sent as given
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GlobalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = Some(mode);
        self
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = Some(durability);
        self
    }

    pub fn with_noreply(mut self, noreply: bool) -> Self {
        self.noreply = Some(noreply);
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_array_limit(mut self, limit: u64) -> Self {
        self.array_limit = Some(limit);
        self
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Named raw values ready for lifting; `db` is wrapped in a `DB` term.
    ///
    /// An extra that repeats a dedicated field is kept, so lifting reports it
    /// as a duplicate key.
    pub fn to_optargs(&self) -> Result<Vec<(String, Value)>, ProtocolError> {
        let mut entries = Vec::new();
        if let Some(db) = &self.db {
            entries.push(("db".to_string(), Value::from(r::db(db.as_str())?)));
        }
        if let Some(mode) = self.read_mode {
            entries.push(("read_mode".to_string(), Value::from(serde_json::to_value(mode)?)));
        }
        if let Some(durability) = self.durability {
            entries.push((
                "durability".to_string(),
                Value::from(serde_json::to_value(durability)?),
            ));
        }
        if let Some(noreply) = self.noreply {
            entries.push(("noreply".to_string(), Value::from(noreply)));
        }
        if let Some(profile) = self.profile {
            entries.push(("profile".to_string(), Value::from(profile)));
        }
        if let Some(limit) = self.array_limit {
            entries.push(("array_limit".to_string(), Value::from(limit)));
        }
        for (name, value) in &self.extra {
            entries.push((name.clone(), Value::from(value.clone())));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_sets_fields() {
        let opts = GlobalOptions::new()
            .with_db("test")
            .with_read_mode(ReadMode::Outdated)
            .with_noreply(true);
        assert_eq!(opts.db.as_deref(), Some("test"));
        assert_eq!(opts.read_mode, Some(ReadMode::Outdated));
        assert_eq!(opts.noreply, Some(true));
        assert_eq!(opts.profile, None);
    }

    #[test]
    fn loads_from_config_json() {
        let opts: GlobalOptions = serde_json::from_value(json!({
            "db": "blog",
            "durability": "soft",
            "binary_format": "raw",
        }))
        .unwrap();
        assert_eq!(opts.db.as_deref(), Some("blog"));
        assert_eq!(opts.durability, Some(Durability::Soft));
        assert_eq!(opts.extra.get("binary_format"), Some(&json!("raw")));
    }

    #[test]
    fn optargs_keep_field_order() {
        let opts = GlobalOptions::new()
            .with_db("test")
            .with_profile(true)
            .with_extra("time_format", json!("raw"));
        let names: Vec<_> = opts.to_optargs().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["db", "profile", "time_format"]);
    }
}
