mod credentials;
mod options;
mod selected_config;

pub use credentials::{Credentials, MIN_API_KEY_LEN, MIN_SPACE_ID_LEN};
pub use options::{MappingOption, OptionsIndex, OptionsMapping, PlaylistOption, SelectOption};
pub use selected_config::{ConfigUpdate, SelectedConfig};
