// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles image refs and non-empty command lists.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::types::ImageRef;

pub fn deserialize_image_ref<'de, D>(deserializer: D) -> Result<ImageRef, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ImageRef::parse(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_command<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("start_command needs at least one element"))
}
