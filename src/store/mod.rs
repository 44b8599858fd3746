//! Global application store.
//!
//! Holds the dataset, panel and narrative state that every part of the
//! viewer reads. State only changes through submitted [`Action`]s, which are
//! queued by a [`Dispatcher`] and applied in order by [`Store::process`].

mod actions;
pub mod loader;

pub use actions::{Action, DatasetPart, DroppedFile, FileSource, PanelId};
pub use loader::{DatasetLoader, LoadResult, LoadService};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Datapath prefix for datasets assembled from dropped files.
const DROPPED_PREFIX: &str = "dropped/";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetsState {
    /// Set once a dataset has been selected.
    pub ready: bool,
    /// Address of the selected dataset.
    pub datapath: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlsState {
    pub panels_to_display: Vec<PanelId>,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            panels_to_display: PanelId::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeState {
    pub display: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserDimensions {
    pub width: f32,
    pub height: f32,
}

/// Read model shared by the controller and the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub datasets: DatasetsState,
    pub metadata: LoadedState,
    pub tree: LoadedState,
    pub controls: ControlsState,
    pub narrative: NarrativeState,
    pub browser_dimensions: BrowserDimensions,
    /// Status message displayed in the title bar
    pub status_message: String,
}

impl StoreState {
    pub fn is_panel_shown(&self, panel: PanelId) -> bool {
        self.controls.panels_to_display.contains(&panel)
    }

    fn is_current(&self, datapath: &str) -> bool {
        self.datasets.datapath.as_deref() == Some(datapath)
    }
}

/// Channel through which actions are submitted to the store.
pub trait ActionSink {
    fn submit(&self, action: Action);
}

/// Queue-backed action sink handed out by the store.
///
/// Cloning shares the queue; the UI is single-threaded so no locking is needed.
#[derive(Clone, Default)]
pub struct Dispatcher {
    queue: Rc<RefCell<VecDeque<Action>>>,
}

impl Dispatcher {
    fn pop(&self) -> Option<Action> {
        self.queue.borrow_mut().pop_front()
    }
}

impl ActionSink for Dispatcher {
    fn submit(&self, action: Action) {
        self.queue.borrow_mut().push_back(action);
    }
}

/// The global store.
pub struct Store {
    state: StoreState,
    dispatcher: Dispatcher,
    revision: u64,
    /// Bumped by every `LoadDatasets`; only results carrying it are applied.
    load_generation: u64,
}

impl Store {
    pub fn new(initial_datapath: Option<String>, panels: Vec<PanelId>) -> Self {
        let mut state = StoreState {
            controls: ControlsState {
                panels_to_display: panels,
            },
            status_message: "Ready".to_string(),
            ..Default::default()
        };
        if let Some(datapath) = initial_datapath.filter(|p| !p.is_empty()) {
            state.datasets.datapath = Some(datapath);
            state.datasets.ready = true;
        }

        Self {
            state,
            dispatcher: Dispatcher::default(),
            revision: 0,
            load_generation: 0,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Incremented every time an action changes state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Feeds a completed loader result back in as an action.
    pub fn receive(&self, result: LoadResult) {
        let action = match result.outcome {
            Ok(()) => Action::DatasetPartLoaded {
                datapath: result.datapath,
                part: result.part,
                generation: result.generation,
            },
            Err(e) => Action::DatasetPartFailed {
                datapath: result.datapath,
                part: result.part,
                generation: result.generation,
                message: e.to_string(),
            },
        };
        self.dispatcher.submit(action);
    }

    /// Applies every queued action in submission order.
    ///
    /// Returns true if any of them changed state.
    pub fn process(&mut self, loader: &mut dyn LoadService) -> bool {
        let mut changed = false;
        while let Some(action) = self.dispatcher.pop() {
            if self.apply(action, loader) {
                self.revision += 1;
                changed = true;
            }
        }
        changed
    }

    fn apply(&mut self, action: Action, loader: &mut dyn LoadService) -> bool {
        let state = &mut self.state;
        match action {
            Action::LoadDatasets => {
                let Some(datapath) = state.datasets.datapath.clone() else {
                    log::warn!("Load requested without a dataset path");
                    return false;
                };
                state.metadata.loaded = false;
                state.tree.loaded = false;
                state.status_message = format!("Loading {}...", datapath);
                self.load_generation += 1;
                loader.load(&datapath, self.load_generation);
                true
            }
            Action::FilesDropped(files) => self.apply_dropped(files, loader),
            Action::ChangeDatapath(datapath) => {
                let datapath = datapath.trim().trim_matches('/').to_string();
                if datapath.is_empty() || state.is_current(&datapath) {
                    return false;
                }
                log::info!("Dataset path changed to {}", datapath);
                state.datasets.datapath = Some(datapath);
                state.datasets.ready = true;
                true
            }
            Action::TogglePanel(panel) => {
                let panels = &mut state.controls.panels_to_display;
                if let Some(index) = panels.iter().position(|p| *p == panel) {
                    panels.remove(index);
                } else {
                    panels.push(panel);
                }
                true
            }
            Action::SetNarrative(display) => {
                if state.narrative.display == display {
                    return false;
                }
                state.narrative.display = display;
                true
            }
            Action::BrowserDimensions { width, height } => {
                let dims = BrowserDimensions { width, height };
                if state.browser_dimensions == dims {
                    return false;
                }
                state.browser_dimensions = dims;
                true
            }
            Action::DatasetPartLoaded {
                datapath,
                part,
                generation,
            } => {
                if generation != self.load_generation || !state.is_current(&datapath) {
                    log::debug!("Discarding stale {:?} result for {}", part, datapath);
                    return false;
                }
                match part {
                    DatasetPart::Metadata => state.metadata.loaded = true,
                    DatasetPart::Tree => state.tree.loaded = true,
                }
                if state.metadata.loaded && state.tree.loaded {
                    log::info!("Dataset {} loaded", datapath);
                    state.status_message = format!("Loaded {}", datapath);
                }
                true
            }
            Action::DatasetPartFailed {
                datapath,
                part,
                generation,
                message,
            } => {
                if generation != self.load_generation || !state.is_current(&datapath) {
                    log::debug!("Discarding stale {:?} failure for {}", part, datapath);
                    return false;
                }
                log::error!("Failed to load {:?} of {}: {}", part, datapath, message);
                state.status_message = message;
                true
            }
        }
    }

    fn apply_dropped(&mut self, files: Vec<DroppedFile>, loader: &mut dyn LoadService) -> bool {
        let state = &mut self.state;
        if files.is_empty() {
            log::warn!("Drop contained no files");
            state.status_message = "No files were dropped".to_string();
            return true;
        }

        let Some((name, sources)) = match_dropped_dataset(files) else {
            state.status_message = format!(
                "Dropped files must include <name>{} and <name>{}",
                DatasetPart::Metadata.suffix(),
                DatasetPart::Tree.suffix()
            );
            log::warn!("{}", state.status_message);
            return true;
        };

        let datapath = format!("{}{}", DROPPED_PREFIX, name);
        for (part, source) in sources {
            loader.register_dropped(&datapath, part, source);
        }
        log::info!("Dropped dataset registered as {}", datapath);
        state.status_message = format!("Dropped dataset {}", name);
        if state.is_current(&datapath) {
            // Same name dropped again; the path won't change, so reload here.
            self.dispatcher.submit(Action::LoadDatasets);
        }
        state.datasets.datapath = Some(datapath);
        state.datasets.ready = true;
        true
    }
}

/// Finds the first `<name>_meta.json` with a matching `<name>_tree.json`.
fn match_dropped_dataset(files: Vec<DroppedFile>) -> Option<(String, Vec<(DatasetPart, FileSource)>)> {
    let meta_suffix = DatasetPart::Metadata.suffix();
    let tree_suffix = DatasetPart::Tree.suffix();

    let name = files.iter().find_map(|meta| {
        let name = meta.name.strip_suffix(meta_suffix)?;
        let tree_name = format!("{}{}", name, tree_suffix);
        files
            .iter()
            .any(|f| f.name == tree_name)
            .then(|| name.to_string())
    })?;

    let sources = files
        .into_iter()
        .filter_map(|file| {
            let part = DatasetPart::ALL
                .into_iter()
                .find(|part| file.name == format!("{}{}", name, part.suffix()))?;
            Some((part, file.source))
        })
        .collect();

    Some((name, sources))
}
