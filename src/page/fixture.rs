use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ConfigError};
use crate::overlay::MarkerSpec;

use super::{HostPage, MediaState};

/// Serializable description of a page: URL, element texts and media state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFixture {
    pub url: String,
    /// Selector -> text content of each matching element.
    #[serde(default)]
    pub elements: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub media: Option<MediaState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountedMarker {
    pub container: String,
    pub marker: MarkerSpec,
}

/// In-memory page used by the CLI and by tests.
///
/// Mutators simulate client-side navigation, late comments and playback.
#[derive(Debug, Default)]
pub struct StaticPage {
    state: Mutex<PageFixture>,
    markers: Mutex<Vec<MountedMarker>>,
}

impl StaticPage {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::from_fixture(PageFixture {
            url: url.into(),
            ..PageFixture::default()
        })
    }

    #[must_use]
    pub fn from_fixture(fixture: PageFixture) -> Self {
        Self {
            state: Mutex::new(fixture),
            markers: Mutex::new(Vec::new()),
        }
    }

    /// Changes the URL without touching element content, like a client-side route.
    pub fn navigate(&self, url: impl Into<String>) {
        self.state().url = url.into();
    }

    /// Replaces every element matching `selector` with a single one holding `text`.
    pub fn set_text(&self, selector: &str, text: impl Into<String>) {
        self.state()
            .elements
            .insert(selector.to_owned(), vec![text.into()]);
    }

    /// Appends another element matching `selector`.
    pub fn push_text(&self, selector: &str, text: impl Into<String>) {
        self.state()
            .elements
            .entry(selector.to_owned())
            .or_default()
            .push(text.into());
    }

    pub fn remove(&self, selector: &str) {
        self.state().elements.remove(selector);
    }

    pub fn set_media(&self, media: Option<MediaState>) {
        self.state().media = media;
    }

    #[must_use]
    pub fn markers(&self) -> Vec<MountedMarker> {
        self.mounted().clone()
    }

    fn state(&self) -> MutexGuard<'_, PageFixture> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mounted(&self) -> MutexGuard<'_, Vec<MountedMarker>> {
        self.markers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostPage for StaticPage {
    fn location(&self) -> String {
        self.state().url.clone()
    }

    fn text(&self, selector: &str) -> Option<String> {
        self.state()
            .elements
            .get(selector)
            .and_then(|texts| texts.first())
            .cloned()
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        self.state()
            .elements
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn media(&self) -> Option<MediaState> {
        self.state().media
    }

    fn seek(&self, time: f64) -> bool {
        let mut state = self.state();
        let Some(media) = state.media.as_mut() else {
            return false;
        };
        media.current_time = if media.duration > 0.0 {
            time.clamp(0.0, media.duration)
        } else {
            time.max(0.0)
        };
        true
    }

    fn mount_marker(&self, container: &str, marker: &MarkerSpec) {
        self.mounted().push(MountedMarker {
            container: container.to_owned(),
            marker: marker.clone(),
        });
    }

    fn clear_markers(&self) {
        self.mounted().clear();
    }
}

/// Loads a page fixture from a `.toml` or `.json` file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unknown extension or
/// does not describe a page.
pub fn load_fixture(path: &Path) -> AppResult<StaticPage> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadFixture {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let fixture: PageFixture = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| invalid(path, err.to_string()))?,
        Some("json") => {
            serde_json::from_str(&content).map_err(|err| invalid(path, err.to_string()))?
        }
        Some(ext) => {
            return Err(AppError::config(ConfigError::UnsupportedExtension {
                ext: ext.to_owned(),
            }));
        }
        None => return Err(AppError::config(ConfigError::MissingExtension)),
    };
    if fixture.url.trim().is_empty() {
        return Err(invalid(path, "missing 'url'".to_owned()));
    }
    Ok(StaticPage::from_fixture(fixture))
}

fn invalid(path: &Path, message: String) -> AppError {
    AppError::config(ConfigError::InvalidFixture {
        path: path.to_path_buf(),
        message,
    })
}
