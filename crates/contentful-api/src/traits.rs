//! Seam between the config form and whatever supplies its dropdown options.

use std::future::Future;

use contentful_core::models::OptionsMapping;

/// A source of mapping names and their playlist options.
///
/// [`ContentfulClient`](crate::ContentfulClient) is the production
/// implementation; the form only ever sees this trait.
pub trait OptionsSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch and reshape the options available in `space_id`.
    fn fetch_options(
        &self,
        space_id: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<OptionsMapping, Self::Error>> + Send;
}
