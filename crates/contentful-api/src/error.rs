use thiserror::Error;

/// Errors from the Contentful GraphQL client.
#[derive(Debug, Error)]
pub enum ContentfulError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid endpoint URL: {0}")]
    Url(String),
}
