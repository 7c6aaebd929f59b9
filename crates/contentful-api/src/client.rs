use reqwest::Client;
use url::Url;

use contentful_core::config::DEFAULT_BASE_URL;
use contentful_core::models::OptionsMapping;

use super::error::ContentfulError;
use super::mapper::contentful_config_mapper;
use super::traits::OptionsSource;
use super::types::{ContentfulConfigResponse, GraphQLResponse};

const CONTENT_MAPPING_QUERY: &str = r#"{
  contentMappingCollection {
    items {
      name
      linkedFrom {
        contentFeedCollection {
          items {
            name
            sys {
              id
            }
          }
        }
      }
    }
  }
}"#;

/// Contentful GraphQL Content API client.
///
/// Credentials are per call: the same client serves whatever space/token
/// pair the operator has typed in.
pub struct ContentfulClient {
    base_url: String,
    http: Client,
}

impl ContentfulClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// `{base}/content/v1/spaces/{space_id}?access_token={api_key}`
    pub fn endpoint(&self, space_id: &str, api_key: &str) -> Result<Url, ContentfulError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ContentfulError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ContentfulError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["content", "v1", "spaces", space_id]);
        url.query_pairs_mut().append_pair("access_token", api_key);
        Ok(url)
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        space_id: &str,
        api_key: &str,
        query: &str,
    ) -> Result<T, ContentfulError> {
        let url = self.endpoint(space_id, api_key)?;
        // The token rides in the query string, so only the space is logged.
        tracing::debug!(operation, space_id, "Contentful GraphQL request");

        let resp = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            // reqwest errors print their URL, which carries the token.
            .map_err(|e| ContentfulError::Http(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "Contentful API error");
            return Err(ContentfulError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "Contentful response received");
        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| ContentfulError::Parse(e.without_url().to_string()))?;
        unwrap_data(body)
    }

    /// Fetch the raw content-mapping collection for a space.
    pub async fn get_contentful_config(
        &self,
        space_id: &str,
        api_key: &str,
    ) -> Result<ContentfulConfigResponse, ContentfulError> {
        self.graphql_request("ContentMappings", space_id, api_key, CONTENT_MAPPING_QUERY)
            .await
    }
}

impl Default for ContentfulClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionsSource for ContentfulClient {
    type Error = ContentfulError;

    async fn fetch_options(
        &self,
        space_id: &str,
        api_key: &str,
    ) -> Result<OptionsMapping, ContentfulError> {
        let config = self.get_contentful_config(space_id, api_key).await?;
        Ok(contentful_config_mapper(&config))
    }
}

/// Pull `data` out of the envelope. Partial data alongside errors is still
/// used; errors without data are not.
fn unwrap_data<T>(body: GraphQLResponse<T>) -> Result<T, ContentfulError> {
    match body.data {
        Some(data) => {
            if !body.errors.is_empty() {
                tracing::warn!(
                    count = body.errors.len(),
                    "Contentful returned partial data with errors"
                );
            }
            Ok(data)
        }
        None if !body.errors.is_empty() => {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            Err(ContentfulError::GraphQl(messages.join("; ")))
        }
        None => Err(ContentfulError::Parse("response has no data".into())),
    }
}
