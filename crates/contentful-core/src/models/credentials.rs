use std::fmt;

/// Shortest Contentful delivery token the form will try to use.
pub const MIN_API_KEY_LEN: usize = 40;

/// Shortest Contentful space id the form will try to use.
pub const MIN_SPACE_ID_LEN: usize = 10;

/// API credentials for the Contentful GraphQL endpoint.
///
/// Both fields are kept exactly as typed; validity is a length gate only,
/// there is no format check.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub space_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            space_id: space_id.into(),
        }
    }

    pub fn api_key_long_enough(&self) -> bool {
        self.api_key.chars().count() >= MIN_API_KEY_LEN
    }

    pub fn space_id_long_enough(&self) -> bool {
        self.space_id.chars().count() >= MIN_SPACE_ID_LEN
    }

    /// True when both fields meet their minimum lengths. Anything shorter
    /// never reaches the network.
    pub fn is_valid(&self) -> bool {
        self.api_key_long_enough() && self.space_id_long_enough()
    }
}

// Keeps the delivery token out of log lines.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &format_args!("<{} chars>", self.api_key.chars().count()))
            .field("space_id", &self.space_id)
            .finish()
    }
}
