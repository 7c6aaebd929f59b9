//! Contentful GraphQL client for content-mapping and playlist options.

pub mod client;
pub mod error;
pub mod mapper;
pub mod traits;
pub mod types;

pub use client::ContentfulClient;
pub use error::ContentfulError;
pub use mapper::contentful_config_mapper;
pub use traits::OptionsSource;
