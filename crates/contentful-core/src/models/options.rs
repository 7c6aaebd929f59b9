use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of a dropdown: what the operator sees and what gets stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub display_text: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(display_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            value: value.into(),
        }
    }
}

/// A content mapping; label and value are both the mapping name.
pub type MappingOption = SelectOption;

/// A content feed linked to a mapping; the value is the feed's entry id.
pub type PlaylistOption = SelectOption;

/// Playlist options keyed by mapping name.
pub type OptionsIndex = BTreeMap<String, Vec<PlaylistOption>>;

/// Both dropdown sources produced from a single fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsMapping {
    pub map_name_options: Vec<MappingOption>,
    pub playlist_options_mappings: OptionsIndex,
}

impl OptionsMapping {
    pub fn playlists_for(&self, map_name: &str) -> Option<&[PlaylistOption]> {
        self.playlist_options_mappings
            .get(map_name)
            .map(Vec::as_slice)
    }
}
