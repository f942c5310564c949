//! Typed values whose payload field is named after their `type` tag.
//!
//! Notion nests the data for a typed object under a key matching its type:
//! `{"type": "equation", "equation": {"expression": "E = mc^2"}}`. The enum
//! variants hold a single field named after the tag to reproduce that shape
//! exactly. Deserialisation is strict: a `type` with no matching payload and
//! any key other than `type` and the payload are both rejected rather than
//! producing a partial record.

use serde::{Deserialize, Serialize};

use super::types::{NotionEquation, NotionLink};

/// The inline content of a text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<NotionLink>,
}

/// One rich text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextValue {
    Text { text: TextContent },
    Equation { equation: NotionEquation },
}

// Derived internally tagged deserialisation ignores keys beside the tag and
// payload; this impl rejects them.
impl<'de> Deserialize<'de> for RichTextValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;
        let mut map = serde_json::Map::deserialize(deserializer)?;
        let tag = map
            .get("type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| D::Error::missing_field("type"))?;
        if let Some(stray) = map.keys().find(|key| key.as_str() != "type" && **key != tag) {
            return Err(D::Error::custom(format!("unknown field `{stray}`")));
        }
        let payload = map
            .remove(&tag)
            .ok_or_else(|| D::Error::custom(format!("missing payload field `{tag}`")))?;
        match tag.as_str() {
            "text" => serde_json::from_value(payload)
                .map(|text| Self::Text { text })
                .map_err(D::Error::custom),
            "equation" => serde_json::from_value(payload)
                .map(|equation| Self::Equation { equation })
                .map_err(D::Error::custom),
            other => Err(D::Error::unknown_variant(other, &["text", "equation"])),
        }
    }
}
