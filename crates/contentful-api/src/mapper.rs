//! Reshapes the nested mapping response into flat dropdown sources.

use contentful_core::models::{OptionsIndex, OptionsMapping, SelectOption};

use crate::types::ContentfulConfigResponse;

/// Build mapping-name options and the per-mapping playlist index.
///
/// Items keep their response order. Null items and items without a name are
/// skipped. Duplicate names each get a dropdown entry, and the last one's
/// feeds win in the index.
pub fn contentful_config_mapper(config: &ContentfulConfigResponse) -> OptionsMapping {
    let mut map_name_options = Vec::new();
    let mut playlist_options_mappings = OptionsIndex::new();

    for item in config.content_mapping_collection.items.iter().flatten() {
        let Some(name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };

        map_name_options.push(SelectOption::new(name, name));

        let playlists = item
            .feeds()
            .map(|feed| {
                SelectOption::new(feed.name.clone().unwrap_or_default(), feed.sys.id.clone())
            })
            .collect();
        playlist_options_mappings.insert(name.to_string(), playlists);
    }

    OptionsMapping {
        map_name_options,
        playlist_options_mappings,
    }
}
