use serde::{Deserialize, Serialize};

use super::Credentials;

/// The configuration unit the host persists for this app.
///
/// Missing fields deserialize as empty strings, which is what a host hands
/// over on the very first run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectedConfig {
    pub api_key: String,
    pub space_id: String,
    pub map_name: String,
    pub playlist_id: String,
}

impl SelectedConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone(), self.space_id.clone())
    }
}

/// Reply to the host's "give me the latest config" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub config: SelectedConfig,
}
