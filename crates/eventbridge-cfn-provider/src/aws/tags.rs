//! Resource tag handling
//!
//! Rules and event buses accept tags. CloudFormation delivers them in two
//! places: the model's `Tags` list and the request's stack-level tag map.
//!
//! | Source | Precedence |
//! |--------|------------|
//! | model `Tags` | wins on key conflict |
//! | `desiredResourceTags` | stack-level tags |
//! | `systemTags` | `aws:`-prefixed, create only |

use crate::aws::error::TranslateError;
use aws_sdk_eventbridge::types::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys with this prefix are reserved and can't be removed by the caller
pub const RESERVED_PREFIX: &str = "aws:";

/// A tag as it appears in a resource model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Merge model tags over request-level tags.
pub fn merge(
    model_tags: &[ResourceTag],
    request_tags: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = request_tags.clone();
    for tag in model_tags {
        merged.insert(tag.key.clone(), tag.value.clone());
    }
    merged
}

/// Changes needed to move a resource from one tag set to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// New keys and keys whose value changed
    pub to_tag: BTreeMap<String, String>,
    /// Keys no longer present
    pub to_untag: Vec<String>,
}

impl TagDiff {
    pub fn between(
        previous: &BTreeMap<String, String>,
        desired: &BTreeMap<String, String>,
    ) -> Self {
        let to_tag = desired
            .iter()
            .filter(|(key, value)| previous.get(*key) != Some(*value))
            .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let to_untag = previous
            .keys()
            .filter(|key| !desired.contains_key(*key) && !key.starts_with(RESERVED_PREFIX))
            .cloned()
            .collect();
        Self { to_tag, to_untag }
    }

    pub fn is_empty(&self) -> bool {
        self.to_tag.is_empty() && self.to_untag.is_empty()
    }
}

/// Convert a tag map to SDK tags
pub fn to_sdk(tags: &BTreeMap<String, String>) -> Result<Vec<Tag>, TranslateError> {
    tags.iter()
        .map(|(key, value)| {
            Tag::builder()
                .key(key)
                .value(value)
                .build()
                .map_err(TranslateError::from)
        })
        .collect()
}

/// Convert SDK tags back into model tags, dropping reserved keys
pub fn from_sdk(tags: &[Tag]) -> Vec<ResourceTag> {
    tags.iter()
        .filter(|tag| !tag.key().starts_with(RESERVED_PREFIX))
        .map(|tag| ResourceTag::new(tag.key(), tag.value()))
        .collect()
}
