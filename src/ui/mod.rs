//! UI modules for the strainview application.
//!
//! The UI is split into distinct parts:
//! - Sidebar: title bar plus dataset/panel controls, or the narrative
//! - Toggle tab: docks and undocks the sidebar
//! - Contents: loading spinner or the composed visualization panels

mod contents;
mod sidebar;
mod title_bar;

pub use contents::render_contents;
pub use sidebar::{render_sidebar, render_toggle_tab, sidebar_gesture};
