//! The config form as a pure state machine.
//!
//! `update()` mutates state and returns an [`Action`] describing the side
//! effect to run (schedule the debounce, fetch now, notify the host). The
//! driver in [`crate::handle`] interprets actions in one place, so the form
//! itself never touches timers, the network, or the host.

use serde::Serialize;

use contentful_core::config::StaleResponsePolicy;
use contentful_core::models::{
    Credentials, MappingOption, OptionsIndex, OptionsMapping, PlaylistOption, SelectOption,
    SelectedConfig,
};

// ── Messages ───────────────────────────────────────────────────────

/// Inputs to the form.
#[derive(Debug, Clone)]
pub enum Message {
    ApiKeyChanged(String),
    SpaceIdChanged(String),
    /// The shared debounce timer ran out without being rescheduled.
    DebounceElapsed,
    FetchCompleted {
        request: u64,
        result: Result<OptionsMapping, String>,
    },
    MapNameSelected(String),
    PlaylistIdSelected(String),
}

/// Side effects requested by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No side-effect.
    None,
    /// (Re)start the shared debounce timer, cancelling any pending one.
    ScheduleFetch,
    /// Fetch options right away.
    Fetch(FetchRequest),
    /// Tell the host a new config is ready to be pulled.
    NotifyHost,
}

/// One issued fetch, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub credentials: Credentials,
}

// ── State ──────────────────────────────────────────────────────────

/// Editable config form state.
#[derive(Debug)]
pub struct ConfigForm {
    credentials: Credentials,
    map_name: String,
    playlist_id: String,
    map_name_options: Vec<MappingOption>,
    playlist_options: OptionsIndex,
    policy: StaleResponsePolicy,
    last_request: u64,
}

impl ConfigForm {
    /// Seed the form from the host's config and return the mount action:
    /// an immediate fetch when the seeded credentials are already usable.
    pub fn mount(seed: Option<&SelectedConfig>, policy: StaleResponsePolicy) -> (Self, Action) {
        let seed = seed.cloned().unwrap_or_default();
        let mut form = Self {
            credentials: seed.credentials(),
            map_name: seed.map_name,
            playlist_id: seed.playlist_id,
            map_name_options: Vec::new(),
            playlist_options: OptionsIndex::new(),
            policy,
            last_request: 0,
        };

        let action = if form.credentials.is_valid() {
            Action::Fetch(form.issue_request())
        } else {
            Action::None
        };
        (form, action)
    }

    /// Handle a form message, returning the side effect to perform.
    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            // ── Credentials ─────────────────────────────────────
            Message::ApiKeyChanged(value) => {
                self.credentials.api_key = value;
                self.credentials_edited()
            }
            Message::SpaceIdChanged(value) => {
                self.credentials.space_id = value;
                self.credentials_edited()
            }
            Message::DebounceElapsed => {
                // Credentials may have been shortened after the timer was
                // armed; an edit that invalidates them does not reschedule.
                if self.credentials.is_valid() {
                    Action::Fetch(self.issue_request())
                } else {
                    tracing::debug!(
                        credentials = ?self.credentials,
                        "Debounce elapsed with invalid credentials, skipping fetch"
                    );
                    Action::None
                }
            }

            // ── Fetch results ───────────────────────────────────
            Message::FetchCompleted { request, result } => {
                if self.policy == StaleResponsePolicy::LastRequestedWins
                    && request != self.last_request
                {
                    tracing::debug!(
                        request,
                        latest = self.last_request,
                        "Dropping stale Contentful response"
                    );
                    return Action::None;
                }

                match result {
                    Ok(mapping) => {
                        tracing::debug!(
                            request,
                            mappings = mapping.map_name_options.len(),
                            "Contentful options loaded"
                        );
                        self.map_name_options = mapping.map_name_options;
                        self.playlist_options = mapping.playlist_options_mappings;
                    }
                    Err(e) => {
                        tracing::warn!(request, error = %e, "Error fetching Contentful config");
                        self.map_name_options.clear();
                    }
                }
                Action::None
            }

            // ── Selections ──────────────────────────────────────
            Message::MapNameSelected(map_name) => {
                self.map_name = map_name;
                Action::NotifyHost
            }
            Message::PlaylistIdSelected(playlist_id) => {
                self.playlist_id = playlist_id;
                Action::NotifyHost
            }
        }
    }

    fn credentials_edited(&mut self) -> Action {
        // Hide the stale dropdown while a refetch is pending.
        self.map_name_options.clear();
        if self.credentials.is_valid() {
            Action::ScheduleFetch
        } else {
            Action::None
        }
    }

    fn issue_request(&mut self) -> FetchRequest {
        self.last_request += 1;
        FetchRequest {
            id: self.last_request,
            credentials: self.credentials.clone(),
        }
    }

    /// The config the host gets when it pulls.
    pub fn snapshot(&self) -> SelectedConfig {
        SelectedConfig {
            api_key: self.credentials.api_key.clone(),
            space_id: self.credentials.space_id.clone(),
            map_name: self.map_name.clone(),
            playlist_id: self.playlist_id.clone(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn map_name_options(&self) -> &[MappingOption] {
        &self.map_name_options
    }

    pub fn playlist_options(&self) -> &OptionsIndex {
        &self.playlist_options
    }

    /// Playlist options for the currently selected mapping, if any.
    pub fn current_playlists(&self) -> Option<&[PlaylistOption]> {
        self.playlist_options
            .get(&self.map_name)
            .map(Vec::as_slice)
    }

    pub fn view(&self) -> FormView {
        let map_name = (!self.map_name_options.is_empty()).then(|| Dropdown {
            name: "mapName",
            placeholder: "Map Name",
            value: self.map_name.clone(),
            options: self.map_name_options.clone(),
        });

        let playlist_id = self
            .current_playlists()
            .filter(|options| !options.is_empty())
            .map(|options| Dropdown {
                name: "playlistId",
                placeholder: "Playlist Id",
                value: self.playlist_id.clone(),
                options: options.to_vec(),
            });

        FormView {
            api_key: TextInput {
                name: "apiKey",
                placeholder: "Api Key",
                value: self.credentials.api_key.clone(),
            },
            space_id: TextInput {
                name: "spaceId",
                placeholder: "Space Id",
                value: self.credentials.space_id.clone(),
            },
            map_name,
            playlist_id,
        }
    }
}

// ── View model ─────────────────────────────────────────────────────

/// Everything a renderer needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub api_key: TextInput,
    pub space_id: TextInput,
    /// Hidden while there are no mapping options.
    pub map_name: Option<Dropdown>,
    /// Hidden unless the selected mapping has playlists.
    pub playlist_id: Option<Dropdown>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub options: Vec<SelectOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "0123456789012345678901234567890123456789";
    const SPACE_ID: &str = "space12345";

    fn seeded() -> SelectedConfig {
        SelectedConfig {
            api_key: API_KEY.into(),
            space_id: SPACE_ID.into(),
            map_name: "Product".into(),
            playlist_id: "id1".into(),
        }
    }

    fn product_mapping() -> OptionsMapping {
        let mut index = OptionsIndex::new();
        index.insert(
            "Product".into(),
            vec![
                SelectOption::new("Feed A", "id1"),
                SelectOption::new("Feed B", "id2"),
            ],
        );
        index.insert("Empty".into(), Vec::new());
        OptionsMapping {
            map_name_options: vec![
                SelectOption::new("Product", "Product"),
                SelectOption::new("Empty", "Empty"),
            ],
            playlist_options_mappings: index,
        }
    }

    fn loaded_form() -> ConfigForm {
        let (mut form, action) =
            ConfigForm::mount(Some(&seeded()), StaleResponsePolicy::default());
        assert_eq!(
            action,
            Action::Fetch(FetchRequest {
                id: 1,
                credentials: Credentials::new(API_KEY, SPACE_ID),
            })
        );
        form.update(Message::FetchCompleted {
            request: 1,
            result: Ok(product_mapping()),
        });
        form
    }

    #[test]
    fn test_mount_without_config_is_empty() {
        let (form, action) = ConfigForm::mount(None, StaleResponsePolicy::default());
        assert_eq!(action, Action::None);
        assert_eq!(form.snapshot(), SelectedConfig::default());
        let view = form.view();
        assert!(view.map_name.is_none());
        assert!(view.playlist_id.is_none());
        assert_eq!(view.api_key.placeholder, "Api Key");
        assert_eq!(view.space_id.placeholder, "Space Id");
    }

    #[test]
    fn test_mount_with_short_credentials_does_not_fetch() {
        let seed = SelectedConfig {
            api_key: "short".into(),
            ..seeded()
        };
        let (_, action) = ConfigForm::mount(Some(&seed), StaleResponsePolicy::default());
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_snapshot_round_trips_seed() {
        let (form, _) = ConfigForm::mount(Some(&seeded()), StaleResponsePolicy::default());
        assert_eq!(form.snapshot(), seeded());
    }

    #[test]
    fn test_credential_edit_clears_options_and_schedules() {
        let mut form = loaded_form();
        assert!(form.view().map_name.is_some());

        let action = form.update(Message::SpaceIdChanged("otherspace1".into()));
        assert_eq!(action, Action::ScheduleFetch);
        assert!(form.map_name_options().is_empty());
        assert!(form.view().map_name.is_none());
        assert_eq!(form.snapshot().space_id, "otherspace1");
        // The index survives until a fetch replaces it.
        assert!(form.playlist_options().contains_key("Product"));
    }

    #[test]
    fn test_invalid_edit_clears_but_does_not_schedule() {
        let mut form = loaded_form();
        let action = form.update(Message::ApiKeyChanged("too-short".into()));
        assert_eq!(action, Action::None);
        assert!(form.map_name_options().is_empty());
        assert_eq!(form.credentials().api_key, "too-short");
    }

    #[test]
    fn test_debounce_elapsed_rechecks_credentials() {
        let (mut form, _) = ConfigForm::mount(None, StaleResponsePolicy::default());
        form.update(Message::ApiKeyChanged(API_KEY.into()));
        assert_eq!(
            form.update(Message::SpaceIdChanged(SPACE_ID.into())),
            Action::ScheduleFetch
        );
        form.update(Message::SpaceIdChanged("short".into()));
        assert_eq!(form.update(Message::DebounceElapsed), Action::None);

        form.update(Message::SpaceIdChanged(SPACE_ID.into()));
        match form.update(Message::DebounceElapsed) {
            Action::Fetch(req) => {
                assert_eq!(req.id, 1);
                assert_eq!(req.credentials, Credentials::new(API_KEY, SPACE_ID));
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_success_replaces_whole_index() {
        let mut form = loaded_form();

        let mut index = OptionsIndex::new();
        index.insert("Blog".into(), vec![SelectOption::new("Posts", "p1")]);
        form.update(Message::SpaceIdChanged("otherspace1".into()));
        form.update(Message::DebounceElapsed);
        form.update(Message::FetchCompleted {
            request: 2,
            result: Ok(OptionsMapping {
                map_name_options: vec![SelectOption::new("Blog", "Blog")],
                playlist_options_mappings: index,
            }),
        });

        assert_eq!(form.map_name_options().len(), 1);
        assert!(form.playlist_options().contains_key("Blog"));
        assert!(!form.playlist_options().contains_key("Product"));
    }

    #[test]
    fn test_fetch_failure_keeps_index() {
        let mut form = loaded_form();
        form.update(Message::FetchCompleted {
            request: 1,
            result: Err("connection refused".into()),
        });
        assert!(form.map_name_options().is_empty());
        assert_eq!(
            form.playlist_options(),
            &product_mapping().playlist_options_mappings
        );
    }

    #[test]
    fn test_dropdown_visibility() {
        let mut form = loaded_form();
        let view = form.view();
        let map_dropdown = view.map_name.unwrap();
        assert_eq!(map_dropdown.placeholder, "Map Name");
        assert_eq!(map_dropdown.value, "Product");
        assert_eq!(map_dropdown.options.len(), 2);
        let playlist_dropdown = view.playlist_id.unwrap();
        assert_eq!(playlist_dropdown.value, "id1");
        assert_eq!(playlist_dropdown.options.len(), 2);

        // Known mapping with no feeds hides the playlist dropdown.
        form.update(Message::MapNameSelected("Empty".into()));
        assert!(form.view().playlist_id.is_none());

        // Unknown mapping hides it too, without failing.
        form.update(Message::MapNameSelected("Missing".into()));
        let view = form.view();
        assert!(view.map_name.is_some());
        assert!(view.playlist_id.is_none());
        assert!(form.current_playlists().is_none());
    }

    #[test]
    fn test_selection_notifies_and_touches_one_field() {
        let mut form = loaded_form();
        let before = form.snapshot();

        assert_eq!(
            form.update(Message::MapNameSelected("Empty".into())),
            Action::NotifyHost
        );
        let after_map = form.snapshot();
        assert_eq!(after_map.map_name, "Empty");
        assert_eq!(
            SelectedConfig {
                map_name: before.map_name.clone(),
                ..after_map.clone()
            },
            before
        );

        assert_eq!(
            form.update(Message::PlaylistIdSelected("id2".into())),
            Action::NotifyHost
        );
        let after_playlist = form.snapshot();
        assert_eq!(after_playlist.playlist_id, "id2");
        assert_eq!(after_playlist.map_name, "Empty");
        assert_eq!(after_playlist.api_key, before.api_key);
    }

    #[test]
    fn test_last_resolved_wins_applies_old_response() {
        let (mut form, _) =
            ConfigForm::mount(Some(&seeded()), StaleResponsePolicy::LastResolvedWins);
        form.update(Message::SpaceIdChanged("otherspace1".into()));
        form.update(Message::DebounceElapsed);

        // Request 2 resolves first, then the slower request 1.
        let mut newer = OptionsIndex::new();
        newer.insert("Newer".into(), vec![SelectOption::new("n", "n")]);
        form.update(Message::FetchCompleted {
            request: 2,
            result: Ok(OptionsMapping {
                map_name_options: vec![SelectOption::new("Newer", "Newer")],
                playlist_options_mappings: newer,
            }),
        });
        form.update(Message::FetchCompleted {
            request: 1,
            result: Ok(product_mapping()),
        });

        assert_eq!(form.map_name_options()[0].value, "Product");
    }

    #[test]
    fn test_last_requested_wins_drops_old_response() {
        let (mut form, _) =
            ConfigForm::mount(Some(&seeded()), StaleResponsePolicy::LastRequestedWins);
        form.update(Message::SpaceIdChanged("otherspace1".into()));
        form.update(Message::DebounceElapsed);

        let mut newer = OptionsIndex::new();
        newer.insert("Newer".into(), vec![SelectOption::new("n", "n")]);
        form.update(Message::FetchCompleted {
            request: 2,
            result: Ok(OptionsMapping {
                map_name_options: vec![SelectOption::new("Newer", "Newer")],
                playlist_options_mappings: newer,
            }),
        });
        form.update(Message::FetchCompleted {
            request: 1,
            result: Err("late failure".into()),
        });

        assert_eq!(form.map_name_options()[0].value, "Newer");
        assert!(form.playlist_options().contains_key("Newer"));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let form = loaded_form();
        let json = serde_json::to_value(form.view()).unwrap();
        assert_eq!(json["apiKey"]["value"], API_KEY);
        assert_eq!(json["mapName"]["options"][0]["displayText"], "Product");
        assert_eq!(json["playlistId"]["options"][1]["value"], "id2");
    }
}
