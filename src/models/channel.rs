use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Single playable entry of a provider catalog
///
/// `cmd` is either a direct stream URL (M3U, Xtream, raw stream) or an opaque
/// portal command that must go through `create_link` (STB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epg_id: Option<String>,
}

impl Channel {
    pub fn new(id: i64, name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            cmd: cmd.into(),
            logo: None,
            group: None,
            epg_id: None,
        }
    }

    /// Name for list rendering; untitled entries fall back to their id
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Channel {}", self.id),
        }
    }
}

/// Portals emit ids as numbers or numeric strings; anything else maps to 0
fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;

    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Portals send `"cmd": null` for dead entries; keep them listable
fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
