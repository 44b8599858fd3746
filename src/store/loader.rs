//! Dataset loading pipeline.
//!
//! Uses channel-based communication to bridge async file reads and fetches
//! with egui's synchronous update loop. Each dataset path resolves to a
//! metadata file and a tree file; contents are only checked to be JSON.

use super::actions::{DatasetPart, FileSource};
use eframe::egui;
use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Errors that can occur while loading one part of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No file exists at the resolved location.
    NotFound(String),
    /// Reading the file failed.
    Io(String),
    /// The file is not valid JSON.
    InvalidJson(String),
    /// The browser fetch failed.
    Fetch(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(what) => write!(f, "Dataset not found: {}", what),
            LoadError::Io(msg) => write!(f, "Read failed: {}", msg),
            LoadError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            LoadError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// Outcome of loading one dataset part.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub datapath: String,
    pub part: DatasetPart,
    pub generation: u64,
    pub outcome: Result<(), LoadError>,
}

/// The store's view of the loading pipeline.
pub trait LoadService {
    /// Starts loading every part of `datapath`. Returns immediately.
    ///
    /// Results are tagged with `generation`.
    fn load(&mut self, datapath: &str, generation: u64);

    /// Makes a dropped file the source of `part` for `datapath`.
    fn register_dropped(&mut self, datapath: &str, part: DatasetPart, source: FileSource);
}

/// Channel-based loader for dataset files.
///
/// Reads are async but egui's update() is synchronous. Results are sent
/// through a channel and drained each frame with `try_recv()`.
pub struct DatasetLoader {
    ctx: egui::Context,
    data_root: String,
    dropped: HashMap<(String, DatasetPart), FileSource>,
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl DatasetLoader {
    pub fn new(ctx: egui::Context, data_root: impl Into<String>) -> Self {
        let (sender, receiver) = channel();
        Self {
            ctx,
            data_root: data_root.into(),
            dropped: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Non-blocking check for a completed part.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }

    fn location(&self, datapath: &str, part: DatasetPart) -> String {
        let root = self.data_root.trim_end_matches('/');
        if root.is_empty() {
            format!("{}{}", datapath, part.suffix())
        } else {
            format!("{}/{}{}", root, datapath, part.suffix())
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_read(&self, datapath: String, part: DatasetPart, generation: u64, source: FileSource) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();

        std::thread::spawn(move || {
            let outcome = read_source(&source).and_then(|bytes| validate_json(&bytes));
            let _ = sender.send(LoadResult {
                datapath,
                part,
                generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_read(&self, datapath: String, part: DatasetPart, generation: u64, source: FileSource) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match read_source(&source).await {
                Ok(bytes) => validate_json(&bytes),
                Err(e) => Err(e),
            };
            let _ = sender.send(LoadResult {
                datapath,
                part,
                generation,
                outcome,
            });
            ctx.request_repaint();
        });
    }
}

impl LoadService for DatasetLoader {
    fn load(&mut self, datapath: &str, generation: u64) {
        for part in DatasetPart::ALL {
            let source = match self.dropped.get(&(datapath.to_string(), part)) {
                Some(source) => source.clone(),
                None => remote_source(self.location(datapath, part)),
            };
            log::debug!("Loading {:?} of {} from {:?}", part, datapath, source);
            self.spawn_read(datapath.to_string(), part, generation, source);
        }
    }

    fn register_dropped(&mut self, datapath: &str, part: DatasetPart, source: FileSource) {
        self.dropped.insert((datapath.to_string(), part), source);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn remote_source(location: String) -> FileSource {
    FileSource::Path(location.into())
}

#[cfg(target_arch = "wasm32")]
fn remote_source(location: String) -> FileSource {
    FileSource::Url(page_url(&location))
}

/// Anchors a relative data location at the site root.
///
/// The page path is rewritten to the dataset path, so a page-relative URL
/// would resolve under it.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn page_url(location: &str) -> String {
    if location.starts_with('/') || location.contains("://") {
        location.to_string()
    } else {
        format!("/{}", location)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_source(source: &FileSource) -> Result<Vec<u8>, LoadError> {
    match source {
        FileSource::Path(path) => std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(path.display().to_string())
            } else {
                LoadError::Io(e.to_string())
            }
        }),
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        FileSource::Unavailable => Err(LoadError::Io("file contents unavailable".to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
async fn read_source(source: &FileSource) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    match source {
        FileSource::Url(url) => {
            let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".into()))?;
            let response = JsFuture::from(window.fetch_with_str(url))
                .await
                .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
            let response: web_sys::Response = response
                .dyn_into()
                .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;

            if response.status() == 404 {
                return Err(LoadError::NotFound(url.clone()));
            }
            if !response.ok() {
                return Err(LoadError::Fetch(format!("HTTP {} for {}", response.status(), url)));
            }

            let promise = response
                .array_buffer()
                .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
            let buffer = JsFuture::from(promise)
                .await
                .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }
        FileSource::Web(file) => {
            let buffer = JsFuture::from(file.array_buffer())
                .await
                .map_err(|e| LoadError::Io(format!("{:?}", e)))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        FileSource::Path(path) => Err(LoadError::Io(format!(
            "cannot read {} in the browser",
            path.display()
        ))),
        FileSource::Unavailable => Err(LoadError::Io("file contents unavailable".to_string())),
    }
}

fn validate_json(bytes: &[u8]) -> Result<(), LoadError> {
    serde_json::from_slice::<serde::de::IgnoredAny>(bytes)
        .map(|_| ())
        .map_err(|e| LoadError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_json() {
        assert!(validate_json(br#"{"title": "zika"}"#).is_ok());
        assert!(matches!(
            validate_json(b"not json"),
            Err(LoadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_location_joins_root() {
        let loader = DatasetLoader::new(egui::Context::default(), "data/");
        assert_eq!(
            loader.location("flu/h3n2", DatasetPart::Tree),
            "data/flu/h3n2_tree.json"
        );

        let loader = DatasetLoader::new(egui::Context::default(), "");
        assert_eq!(loader.location("zika", DatasetPart::Metadata), "zika_meta.json");
    }

    #[test]
    fn test_fetch_urls_are_root_anchored() {
        let loader = DatasetLoader::new(egui::Context::default(), "data");
        let location = loader.location("flu/h3n2", DatasetPart::Metadata);
        assert_eq!(page_url(&location), "/data/flu/h3n2_meta.json");

        assert_eq!(page_url("/static/zika_tree.json"), "/static/zika_tree.json");
        assert_eq!(
            page_url("https://data.example.org/zika_tree.json"),
            "https://data.example.org/zika_tree.json"
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let source = FileSource::Path("definitely/not/here_meta.json".into());
        assert!(matches!(read_source(&source), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_dropped_bytes_load_through_channel() {
        let mut loader = DatasetLoader::new(egui::Context::default(), "data");
        let bytes: std::sync::Arc<[u8]> = std::sync::Arc::from(&b"{}"[..]);
        for part in DatasetPart::ALL {
            loader.register_dropped("dropped/zika", part, FileSource::Bytes(bytes.clone()));
        }

        loader.load("dropped/zika", 3);

        let mut results = Vec::new();
        while results.len() < 2 {
            if let Ok(result) = loader
                .receiver
                .recv_timeout(std::time::Duration::from_secs(5))
            {
                results.push(result);
            } else {
                panic!("loader did not report both parts");
            }
        }
        assert!(results.iter().all(|r| r.outcome.is_ok()));
        assert!(results.iter().all(|r| r.datapath == "dropped/zika"));
        assert!(results.iter().all(|r| r.generation == 3));
    }
}
