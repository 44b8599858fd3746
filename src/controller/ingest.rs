//! Whole-window drag-and-drop ingestion.
//!
//! Every drag-over and drop has its default prevented so the browser never
//! navigates to the dropped file. Dropped files are forwarded untouched as a
//! single [`Action::FilesDropped`]; deciding whether they make a dataset is
//! the loader's business.

use crate::store::{Action, ActionSink, DroppedFile, FileSource};
use eframe::egui;

/// Document events the listener registers for, and whether each one is
/// registered in the capture phase.
///
/// The egui canvas stops propagation of drag events, so only capturing
/// document listeners run before it.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub const DOCUMENT_EVENTS: [(&str, bool); 2] = [("dragover", true), ("drop", true)];

/// The parts of a drag event the listener needs.
pub trait DragDropEvent {
    fn prevent_default(&self);
    fn files(&self) -> Vec<DroppedFile>;
}

pub struct IngestionListener<S: ActionSink> {
    sink: S,
    #[cfg(target_arch = "wasm32")]
    document: Option<web::DocumentBinding>,
}

impl<S: ActionSink> IngestionListener<S> {
    /// Creates a listener that isn't bound to any event source yet.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            #[cfg(target_arch = "wasm32")]
            document: None,
        }
    }

    pub fn handle_drag_over(&self, event: &impl DragDropEvent) {
        event.prevent_default();
    }

    pub fn handle_drop(&self, event: &impl DragDropEvent) {
        event.prevent_default();
        let files = event.files();
        log::info!("{} file(s) dropped", files.len());
        self.sink.submit(Action::FilesDropped(files));
    }

    /// Forwards files egui reports as hovered or dropped on the native window.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn forward_native(&self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });

        if hovering {
            self.handle_drag_over(&NativeDrop::default());
        }
        if !dropped.is_empty() {
            self.handle_drop(&NativeDrop::from_egui(&dropped));
        }
    }

    /// Removes the document listeners, if any were registered.
    pub fn detach(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if self.document.take().is_some() {
            log::debug!("Drag-and-drop listeners removed");
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl<S: ActionSink + Clone + 'static> IngestionListener<S> {
    /// Registers `dragover` and `drop` handlers on the document, capture phase.
    ///
    /// Registration failure leaves the listener unbound; drops then fall
    /// through to the browser.
    pub fn attach(sink: S) -> Self {
        let mut listener = Self::new(sink.clone());
        match web::DocumentBinding::register(sink) {
            Ok(binding) => listener.document = Some(binding),
            Err(e) => log::warn!("Failed to register drag-and-drop listeners: {}", e),
        }
        listener
    }
}

/// A drop on the native window. There is no browser default to prevent.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
#[derive(Debug, Default)]
pub struct NativeDrop {
    files: Vec<DroppedFile>,
}

impl NativeDrop {
    pub fn from_egui(files: &[egui::DroppedFile]) -> Self {
        let files = files
            .iter()
            .map(|file| {
                let name = match &file.path {
                    Some(path) if file.name.is_empty() => path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    _ => file.name.clone(),
                };
                let source = match (&file.bytes, &file.path) {
                    (Some(bytes), _) => FileSource::Bytes(bytes.clone()),
                    (None, Some(path)) => FileSource::Path(path.clone()),
                    (None, None) => FileSource::Unavailable,
                };
                DroppedFile { name, source }
            })
            .collect();
        Self { files }
    }
}

impl DragDropEvent for NativeDrop {
    fn prevent_default(&self) {}

    fn files(&self) -> Vec<DroppedFile> {
        self.files.clone()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{DragDropEvent, IngestionListener, DOCUMENT_EVENTS};
    use crate::store::{ActionSink, DroppedFile, FileSource};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    impl DragDropEvent for web_sys::DragEvent {
        fn prevent_default(&self) {
            web_sys::Event::prevent_default(self);
        }

        fn files(&self) -> Vec<DroppedFile> {
            let Some(list) = self.data_transfer().and_then(|dt| dt.files()) else {
                return Vec::new();
            };
            (0..list.length())
                .filter_map(|i| list.get(i))
                .map(|file| DroppedFile {
                    name: file.name(),
                    source: FileSource::Web(file),
                })
                .collect()
        }
    }

    type Handler = Closure<dyn FnMut(web_sys::DragEvent)>;

    /// Document-level `dragover` and `drop` handlers, removed on drop.
    pub struct DocumentBinding {
        document: web_sys::Document,
        handlers: Vec<(&'static str, bool, Handler)>,
    }

    impl DocumentBinding {
        pub fn register<S: ActionSink + Clone + 'static>(sink: S) -> Result<Self, String> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or("no document")?;

            let mut binding = Self {
                document,
                handlers: Vec::new(),
            };
            for (event, capture) in DOCUMENT_EVENTS {
                let listener = IngestionListener::new(sink.clone());
                let handler: Handler = if event == "drop" {
                    Closure::wrap(Box::new(move |event: web_sys::DragEvent| {
                        listener.handle_drop(&event);
                    }) as Box<dyn FnMut(web_sys::DragEvent)>)
                } else {
                    Closure::wrap(Box::new(move |event: web_sys::DragEvent| {
                        listener.handle_drag_over(&event);
                    }) as Box<dyn FnMut(web_sys::DragEvent)>)
                };

                // On failure, dropping the partial binding removes what was added.
                binding
                    .document
                    .add_event_listener_with_callback_and_bool(
                        event,
                        handler.as_ref().unchecked_ref(),
                        capture,
                    )
                    .map_err(|e| format!("{:?}", e))?;
                binding.handlers.push((event, capture, handler));
            }

            Ok(binding)
        }
    }

    impl Drop for DocumentBinding {
        fn drop(&mut self) {
            for (event, capture, handler) in &self.handlers {
                let _ = self.document.remove_event_listener_with_callback_and_bool(
                    event,
                    handler.as_ref().unchecked_ref(),
                    *capture,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<Action>>>);

    impl ActionSink for RecordingSink {
        fn submit(&self, action: Action) {
            self.0.borrow_mut().push(action);
        }
    }

    #[derive(Default)]
    struct FakeEvent {
        names: Vec<&'static str>,
        prevented: Cell<u32>,
    }

    impl DragDropEvent for FakeEvent {
        fn prevent_default(&self) {
            self.prevented.set(self.prevented.get() + 1);
        }

        fn files(&self) -> Vec<DroppedFile> {
            self.names.iter().map(|n| DroppedFile::named(*n)).collect()
        }
    }

    #[test]
    fn test_drop_submits_exactly_one_action() {
        let sink = RecordingSink::default();
        let listener = IngestionListener::new(sink.clone());
        let event = FakeEvent {
            names: vec!["a.json", "b.json"],
            ..Default::default()
        };

        listener.handle_drop(&event);

        assert_eq!(event.prevented.get(), 1);
        assert_eq!(
            *sink.0.borrow(),
            vec![Action::FilesDropped(vec![
                DroppedFile::named("a.json"),
                DroppedFile::named("b.json"),
            ])]
        );
    }

    #[test]
    fn test_drag_over_always_prevents_default() {
        let sink = RecordingSink::default();
        let listener = IngestionListener::new(sink.clone());
        let event = FakeEvent::default();

        for _ in 0..3 {
            listener.handle_drag_over(&event);
        }

        assert_eq!(event.prevented.get(), 3);
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn test_empty_drop_is_forwarded() {
        let sink = RecordingSink::default();
        let listener = IngestionListener::new(sink.clone());

        listener.handle_drop(&FakeEvent::default());

        assert_eq!(*sink.0.borrow(), vec![Action::FilesDropped(Vec::new())]);
    }

    #[test]
    fn test_document_listeners_run_in_capture_phase() {
        let events: Vec<&str> = DOCUMENT_EVENTS.iter().map(|(event, _)| *event).collect();
        assert_eq!(events, vec!["dragover", "drop"]);
        assert!(DOCUMENT_EVENTS.iter().all(|(_, capture)| *capture));
    }

    #[test]
    fn test_native_drop_names_from_path() {
        let dropped = egui::DroppedFile {
            path: Some("/tmp/zika_meta.json".into()),
            ..Default::default()
        };

        let files = NativeDrop::from_egui(&[dropped]).files();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "zika_meta.json");
        assert_eq!(
            files[0].source,
            FileSource::Path("/tmp/zika_meta.json".into())
        );
    }
}
