//! Root orchestration controller.
//!
//! Keeps viewport geometry, sidebar layout, dataset loading and drag-and-drop
//! ingestion consistent with each other:
//!
//! - viewport monitor: breakpoint signal, feeds the layout controller
//! - layout controller: sidebar state and content padding
//! - load trigger: one load request per new dataset path
//! - ingestion listener: forwards dropped files to the store
//! - composer: loading spinner or the set of panels to mount
//!
//! Exactly one [`AppController`] is created at start-up and handed to the
//! application shell. [`AppController::teardown`] (also run on drop)
//! releases the listeners it registered.

pub mod compose;
pub mod ingest;
pub mod layout;
pub mod load_trigger;
pub mod viewport;

pub use compose::{compose, ComposeInput, PanelKind, PanelMount, RenderPlan};
pub use ingest::IngestionListener;
pub use layout::{LayoutController, Padding, SidebarLayout};
pub use load_trigger::LoadTrigger;
pub use viewport::{SubscriptionId, ViewportMonitor};

use crate::config::LayoutConfig;
use crate::store::{Action, ActionSink, LoadService, Store, StoreState};
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppController<S: ActionSink> {
    config: LayoutConfig,
    viewport: ViewportMonitor,
    viewport_subscription: Option<SubscriptionId>,
    layout: Rc<RefCell<LayoutController>>,
    ingestion: IngestionListener<S>,
    load_trigger: LoadTrigger,
    sink: S,
    /// Store revision last passed to `on_state_change`.
    observed_revision: u64,
}

impl<S: ActionSink + Clone + 'static> AppController<S> {
    /// Wires the collaborators together and observes the initial state.
    pub fn new(
        config: LayoutConfig,
        viewport: ViewportMonitor,
        ingestion: IngestionListener<S>,
        sink: S,
        initial: &StoreState,
    ) -> Self {
        let layout = Rc::new(RefCell::new(LayoutController::new(
            &config,
            viewport.is_wide(),
        )));

        let weak = Rc::downgrade(&layout);
        let viewport_subscription = Some(viewport.subscribe(move |wide| {
            if let Some(layout) = weak.upgrade() {
                layout.borrow_mut().viewport_changed(wide);
            }
        }));

        let mut controller = Self {
            config,
            viewport,
            viewport_subscription,
            layout,
            ingestion,
            load_trigger: LoadTrigger::new(),
            sink,
            observed_revision: 0,
        };
        controller.on_state_change(initial);
        controller
    }

    /// Mounts against the browser: media query and document listeners.
    #[cfg(target_arch = "wasm32")]
    pub fn mount(config: LayoutConfig, sink: S, initial: &StoreState) -> Self {
        let viewport = ViewportMonitor::with_media_query(config.controls_hidden_width);
        let ingestion = IngestionListener::attach(sink.clone());
        Self::new(config, viewport, ingestion, sink, initial)
    }

    /// Mounts natively; the shell reports widths and drops each frame.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn mount(config: LayoutConfig, sink: S, initial: &StoreState, width: f32) -> Self {
        let viewport = ViewportMonitor::new(config.controls_hidden_width, width);
        let ingestion = IngestionListener::new(sink.clone());
        Self::new(config, viewport, ingestion, sink, initial)
    }
}

impl<S: ActionSink> AppController<S> {
    /// Called once per store change, in order.
    pub fn on_state_change(&mut self, state: &StoreState) {
        if self.load_trigger.observe(state.datasets.datapath.as_deref()) {
            self.sink.submit(Action::LoadDatasets);
        }
    }

    /// Applies queued store actions and calls [`Self::on_state_change`] after
    /// each batch that changed state, until the store stops changing.
    ///
    /// A load request submitted by the trigger is processed in the same call.
    /// Returns true if the store changed.
    pub fn settle(&mut self, store: &mut Store, loader: &mut dyn LoadService) -> bool {
        let start = self.observed_revision;
        loop {
            store.process(loader);
            if store.revision() == self.observed_revision {
                break;
            }
            self.observed_revision = store.revision();
            self.on_state_change(store.state());
        }
        self.observed_revision != start
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportMonitor {
        &self.viewport
    }

    pub fn ingestion(&self) -> &IngestionListener<S> {
        &self.ingestion
    }

    pub fn load_trigger(&self) -> &LoadTrigger {
        &self.load_trigger
    }

    pub fn sidebar(&self) -> SidebarLayout {
        self.layout.borrow().sidebar()
    }

    pub fn viewport_wide(&self) -> bool {
        self.layout.borrow().viewport_wide()
    }

    pub fn controls_width(&self) -> f32 {
        self.layout.borrow().controls_width()
    }

    pub fn toggle_docked(&self) {
        self.layout.borrow_mut().toggle_docked();
    }

    pub fn set_open(&self, open: bool) {
        self.layout.borrow_mut().set_open(open);
    }

    pub fn padding(&self) -> Padding {
        self.layout.borrow().compute_padding()
    }

    /// Recomputed every frame from the current state.
    pub fn render_plan(&self, state: &StoreState) -> RenderPlan {
        compose(&ComposeInput {
            metadata_loaded: state.metadata.loaded,
            tree_loaded: state.tree.loaded,
            panels: &state.controls.panels_to_display,
            padding: self.padding(),
            narrative: state.narrative.display,
            viewport_height: state.browser_dimensions.height,
            spinner_offset: self.config.spinner_offset,
        })
    }

    /// Releases the viewport subscription and drag-and-drop listeners.
    pub fn teardown(&mut self) {
        if let Some(id) = self.viewport_subscription.take() {
            self.viewport.unsubscribe(id);
            self.viewport.detach();
            self.ingestion.detach();
            log::debug!("Controller listeners released");
        }
    }
}

impl<S: ActionSink> Drop for AppController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
