//! Actions accepted by the store, and the values they carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A visualization panel the user can show or hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Tree,
    Map,
    Entropy,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Tree, PanelId::Map, PanelId::Entropy];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Tree => "tree",
            PanelId::Map => "map",
            PanelId::Entropy => "entropy",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(PanelId::Tree),
            "map" => Ok(PanelId::Map),
            "entropy" => Ok(PanelId::Entropy),
            other => Err(format!("Unknown panel: {}", other)),
        }
    }
}

/// One half of a dataset; both must load before panels can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetPart {
    Metadata,
    Tree,
}

impl DatasetPart {
    pub const ALL: [DatasetPart; 2] = [DatasetPart::Metadata, DatasetPart::Tree];

    /// File name suffix appended to a dataset path.
    pub fn suffix(&self) -> &'static str {
        match self {
            DatasetPart::Metadata => "_meta.json",
            DatasetPart::Tree => "_tree.json",
        }
    }
}

/// Where the contents of a dropped file can be read from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// A path on the local filesystem (native drops).
    Path(std::path::PathBuf),
    /// Bytes already in memory.
    Bytes(Arc<[u8]>),
    /// A browser file handle, read lazily by the loader.
    #[cfg(target_arch = "wasm32")]
    Web(web_sys::File),
    /// A URL fetched relative to the page.
    #[cfg(target_arch = "wasm32")]
    Url(String),
    /// Only the name is known.
    Unavailable,
}

/// A file handle received from a drag-and-drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFile {
    pub name: String,
    pub source: FileSource,
}

#[cfg(test)]
impl DroppedFile {
    /// A dropped file whose contents are not accessible.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Unavailable,
        }
    }
}

/// Everything that can change store state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start loading the dataset at the current datapath.
    LoadDatasets,
    /// Files were dropped onto the window.
    FilesDropped(Vec<DroppedFile>),
    /// Select a different dataset.
    ChangeDatapath(String),
    TogglePanel(PanelId),
    SetNarrative(bool),
    BrowserDimensions { width: f32, height: f32 },
    /// `generation` identifies the load request the result belongs to.
    DatasetPartLoaded {
        datapath: String,
        part: DatasetPart,
        generation: u64,
    },
    DatasetPartFailed {
        datapath: String,
        part: DatasetPart,
        generation: u64,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_names() {
        for panel in PanelId::ALL {
            assert_eq!(panel.as_str().parse::<PanelId>(), Ok(panel));
        }
        assert!("frequencies".parse::<PanelId>().is_err());
    }
}
