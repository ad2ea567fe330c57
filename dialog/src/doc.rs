//! Persisted dialog document.
//!
//! This is the canonical file format and the only value that leaves the
//! editor: a `start` label, an optional opaque `replace` flag, NPC lines keyed
//! by label and player choice sets keyed by label. Both label maps keep
//! insertion order so serialised output is reproducible.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A complete branching dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Label of the first line or choice set.
    pub start: String,
    /// Authoring flag passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    #[serde(rename = "npcLines", default)]
    pub lines: IndexMap<String, Line>,
    #[serde(rename = "playerChoices", default)]
    pub choice_sets: IndexMap<String, Vec<Choice>>,
}

impl Document {
    /// Parse a document from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed JSON or for
    /// fields of the wrong shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// True when `label` names a line or a choice set.
    #[must_use]
    pub fn contains_label(&self, label: &str) -> bool {
        self.lines.contains_key(label) || self.choice_sets.contains_key(label)
    }
}

/// One NPC beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Subtitle; omitted means no subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Seconds before the response runs.
    #[serde(serialize_with = "numeric::serialize")]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidable_group: Option<HidableGroup>,
    /// What plays next. Absent means the dialog ends here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Triggers>,
}

impl Line {
    /// A bare line with only a duration.
    #[must_use]
    pub fn with_duration(duration: f64) -> Self {
        Self {
            text: None,
            duration,
            media: None,
            animation: None,
            camera: None,
            hidable_group: None,
            triggers: None,
        }
    }
}

/// One player option inside a choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    /// Label activated when this option is picked.
    pub triggers: String,
}

/// A media path, or a list of alternatives picked at random at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Media {
    One(String),
    Many(Vec<String>),
}

/// A line's `triggers` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Triggers {
    One(String),
    Many(Vec<String>),
}

/// Either the name of an animation sequence or an inline character animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Animation {
    Named(String),
    Character(CharacterAnimation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAnimation {
    pub name: String,
    pub pose_prop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_animation_stages: Option<Vec<BodyAnimationStage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_body_animations: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyAnimationStage {
    #[serde(serialize_with = "numeric::serialize")]
    pub start_animation: f64,
    #[serde(serialize_with = "numeric::serialize")]
    pub start_time: f64,
    #[serde(serialize_with = "numeric::serialize")]
    pub end_animation: f64,
    #[serde(serialize_with = "numeric::serialize")]
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_chest_physics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_butt_physics: Option<bool>,
}

/// Camera possessed while the line plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub name: String,
    /// Stay possessed after the dialog.
    pub keep_possessed: bool,
}

/// Group unhidden while the line plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HidableGroup {
    pub name: String,
    /// Hide again once the dialog completes.
    pub rehide: bool,
}

/// Number formatting shared by every `f64` field that ends up in JSON.
///
/// Whole values are written as integers (`3`, not `3.0`) so a document that
/// was authored by hand survives a load/export cycle byte-for-byte. Non-finite
/// values fall through to `serde_json`, which writes them as `null`.
pub(crate) mod numeric {
    use serde::Serializer;

    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    #[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp, clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() && value.trunc() == *value && value.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

#[cfg(test)]
#[path = "doc_test.rs"]
mod tests;
