use serde::Deserialize;

// ── GraphQL envelope ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

// ── Content mapping query ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentfulConfigResponse {
    pub content_mapping_collection: ContentMappingCollection,
}

#[derive(Debug, Deserialize)]
pub struct ContentMappingCollection {
    #[serde(default)]
    pub items: Vec<Option<ContentMappingItem>>,
}

/// One entry of the `contentMapping` content type.
///
/// Only `name` and `linkedFrom` are requested by the app's query; the other
/// fields exist on the content type and are accepted when a wider query
/// returns them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMappingItem {
    pub sys: Option<Sys>,
    pub name: Option<String>,
    pub linked_from: Option<LinkedFrom>,
    pub content_type: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedFrom {
    pub content_feed_collection: Option<ContentFeedCollection>,
}

#[derive(Debug, Deserialize)]
pub struct ContentFeedCollection {
    #[serde(default)]
    pub items: Vec<Option<ContentFeedItem>>,
}

/// A `contentFeed` entry that links back to a mapping; one playlist.
#[derive(Debug, Deserialize)]
pub struct ContentFeedItem {
    pub name: Option<String>,
    pub sys: Sys,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    pub id: String,
}

impl ContentMappingItem {
    /// Linked feeds in response order, skipping null entries.
    ///
    /// A null `linkedFrom` yields no feeds, so the mapping gets an empty
    /// playlist list instead of failing the whole fetch.
    pub fn feeds(&self) -> impl Iterator<Item = &ContentFeedItem> {
        self.linked_from
            .as_ref()
            .and_then(|l| l.content_feed_collection.as_ref())
            .into_iter()
            .flat_map(|c| c.items.iter().flatten())
    }
}
