#![warn(clippy::all)]

//! strainview - A web-based phylogenomic dataset visualization client.
//!
//! The application shell wires the global store, the dataset loader and the
//! root controller together and renders the sidebar and content panels.
//! Datasets are selected by URL path (web) or command-line argument
//! (native), or by dropping files onto the window.

mod config;
mod controller;
mod store;
mod ui;
mod url_state;

use config::AppConfig;
use controller::AppController;
use eframe::egui;
use store::{ActionSink, DatasetLoader, Dispatcher, Store};

/// Native window width; the sidebar docks if this is past the breakpoint.
#[cfg(not(target_arch = "wasm32"))]
const INITIAL_WINDOW_SIZE: [f32; 2] = [1280.0, 800.0];

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(INITIAL_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "strainview",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Application shell.
pub struct ViewerApp {
    /// Persisted settings; the panel selection is written back on change
    config: AppConfig,

    /// Global dataset/panel state
    store: Store,

    /// Channel for async dataset loading
    loader: DatasetLoader,

    /// Root controller: layout, load trigger, drag-and-drop
    controller: AppController<Dispatcher>,

    /// Contents of the dataset path field
    dataset_input: String,

    /// Dataset path last reflected in the URL and the path field
    shown_datapath: Option<String>,
}

impl ViewerApp {
    /// Creates the single application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let config = AppConfig::load();
        let store = Store::new(url_state::initial_datapath(), config.initial_panels());
        let loader = DatasetLoader::new(cc.egui_ctx.clone(), config.data_root.clone());

        #[cfg(target_arch = "wasm32")]
        let controller =
            AppController::mount(config.layout.clone(), store.dispatcher(), store.state());
        #[cfg(not(target_arch = "wasm32"))]
        let controller = AppController::mount(
            config.layout.clone(),
            store.dispatcher(),
            store.state(),
            INITIAL_WINDOW_SIZE[0],
        );

        let shown_datapath = store.state().datasets.datapath.clone();
        let dataset_input = shown_datapath.clone().unwrap_or_default();
        log::info!(
            "Viewer started, dataset = {:?}, sidebar docked = {}",
            store.state().datasets.datapath,
            controller.sidebar().docked
        );

        Self {
            config,
            store,
            loader,
            controller,
            dataset_input,
            shown_datapath,
        }
    }

    /// Settles the store, then mirrors the result into the URL, the path
    /// field and the saved config.
    fn settle_store(&mut self) {
        let was_loaded = self.is_dataset_loaded();
        if !self.controller.settle(&mut self.store, &mut self.loader) {
            return;
        }

        if !was_loaded && self.is_dataset_loaded() {
            if let Some(elapsed) = self.controller.load_trigger().elapsed() {
                log::info!("Dataset ready {} ms after request", elapsed.as_millis());
            }
        }

        if self
            .config
            .remember_panels(&self.store.state().controls.panels_to_display)
        {
            self.config.save();
        }

        let datapath = &self.store.state().datasets.datapath;
        if *datapath != self.shown_datapath {
            if let Some(datapath) = datapath {
                url_state::push_datapath(datapath);
                self.dataset_input = datapath.clone();
            }
            self.shown_datapath = datapath.clone();
        }
    }

    fn is_dataset_loaded(&self) -> bool {
        let state = self.store.state();
        state.metadata.loaded && state.tree.loaded
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen = ctx.input(|i| i.screen_rect());

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.controller.viewport().observe_width(screen.width());
            self.controller.ingestion().forward_native(ctx);
        }

        let dims = self.store.state().browser_dimensions;
        if dims.width != screen.width() || dims.height != screen.height() {
            self.store.dispatcher().submit(store::Action::BrowserDimensions {
                width: screen.width(),
                height: screen.height(),
            });
        }

        while let Some(result) = self.loader.try_recv() {
            self.store.receive(result);
        }
        self.settle_store();

        let width = self.controller.controls_width();
        if let Some(open) = ui::sidebar_gesture(ctx, self.controller.sidebar(), width) {
            self.controller.set_open(open);
        }

        // Sidebar and toggle tab float above the content, which is offset by the padding
        ui::render_sidebar(
            ctx,
            self.controller.sidebar(),
            width,
            self.controller.layout_config().narrative_width,
            self.store.state(),
            &self.store.dispatcher(),
            &mut self.dataset_input,
        );
        if ui::render_toggle_tab(
            ctx,
            self.controller.sidebar(),
            self.controller.viewport_wide(),
            width,
        ) {
            self.controller.toggle_docked();
        }

        let plan = self.controller.render_plan(self.store.state());
        ui::render_contents(ctx, &plan, self.store.state());
    }
}
