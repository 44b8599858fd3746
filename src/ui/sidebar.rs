//! Sidebar UI: controls or narrative, the toggle tab, and the edge swipe.

use super::title_bar::render_title_bar;
use crate::controller::SidebarLayout;
use crate::store::{Action, ActionSink, Dispatcher, PanelId, StoreState};
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

/// Distance from the left edge (px) where a swipe can open the sidebar.
const SWIPE_EDGE: f32 = 24.0;

/// Horizontal travel (px) that counts as a swipe.
const SWIPE_DISTANCE: f32 = 60.0;

const SIDEBAR_FILL: Color32 = Color32::from_rgb(30, 30, 38);

/// Renders the sidebar when it is docked or open.
pub fn render_sidebar(
    ctx: &egui::Context,
    sidebar: SidebarLayout,
    width: f32,
    narrative_width: f32,
    state: &StoreState,
    dispatcher: &Dispatcher,
    dataset_input: &mut String,
) {
    if !sidebar.docked && !sidebar.open {
        return;
    }

    let height = ctx.input(|i| i.screen_rect().height());
    egui::Area::new(egui::Id::new("sidebar"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(SIDEBAR_FILL)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(width - 16.0);
                    ui.set_min_height(height - 16.0);

                    render_title_bar(ui, state);
                    ui.separator();

                    if state.narrative.display {
                        render_narrative(ui, narrative_width, dispatcher);
                    } else {
                        render_controls(ui, state, dispatcher, dataset_input);
                    }
                });
        });
}

fn render_controls(
    ui: &mut egui::Ui,
    state: &StoreState,
    dispatcher: &Dispatcher,
    dataset_input: &mut String,
) {
    ui.heading("Dataset");
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(dataset_input)
                .hint_text("e.g. zika")
                .desired_width(ui.available_width() - 60.0)
                .font(egui::FontId::monospace(12.0)),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || submitted {
            dispatcher.submit(Action::ChangeDatapath(dataset_input.clone()));
        }
    });

    ui.add_space(10.0);
    ui.heading("Panels");
    for panel in PanelId::ALL {
        let mut shown = state.is_panel_shown(panel);
        let label = format!("{} {}", panel_icon(panel), panel);
        if ui.checkbox(&mut shown, label).changed() {
            dispatcher.submit(Action::TogglePanel(panel));
        }
    }

    ui.add_space(10.0);
    let mut narrative = state.narrative.display;
    if ui
        .checkbox(&mut narrative, format!("{} Narrative mode", icons::BOOK_OPEN))
        .changed()
    {
        dispatcher.submit(Action::SetNarrative(narrative));
    }

    ui.add_space(10.0);
    ui.label(
        RichText::new(format!(
            "{} Drop <name>_meta.json and <name>_tree.json anywhere to view them",
            icons::UPLOAD_SIMPLE
        ))
        .small()
        .color(Color32::GRAY),
    );
}

fn render_narrative(ui: &mut egui::Ui, narrative_width: f32, dispatcher: &Dispatcher) {
    ui.set_max_width(narrative_width.min(ui.available_width()));
    ui.heading(format!("{} Narrative", icons::BOOK_OPEN));
    ui.label("A guided walk through the dataset. The info and footer panels are hidden while it runs.");
    ui.add_space(10.0);
    if ui.button("Exit narrative").clicked() {
        dispatcher.submit(Action::SetNarrative(false));
    }
}

pub(super) fn panel_icon(panel: PanelId) -> &'static str {
    match panel {
        PanelId::Tree => icons::TREE_STRUCTURE,
        PanelId::Map => icons::MAP_TRIFOLD,
        PanelId::Entropy => icons::CHART_BAR,
    }
}

/// Renders the tab that docks and undocks the sidebar.
///
/// Returns true when it was clicked.
pub fn render_toggle_tab(
    ctx: &egui::Context,
    sidebar: SidebarLayout,
    viewport_wide: bool,
    width_when_open: f32,
) -> bool {
    let x = if sidebar.docked { width_when_open } else { 0.0 };
    let icon = if sidebar.docked {
        icons::CARET_LEFT
    } else {
        icons::CARET_RIGHT
    };
    let hint = if sidebar.docked && !viewport_wide {
        "Undock the sidebar to give the panels more room"
    } else {
        "Toggle sidebar"
    };

    egui::Area::new(egui::Id::new("sidebar_toggle"))
        .fixed_pos(egui::pos2(x, 8.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| ui.button(icon).on_hover_text(hint).clicked())
        .inner
}

/// Interprets pointer drags as the open/close gesture of a floating sidebar.
///
/// Returns the new open state, if the gesture changed it.
pub fn sidebar_gesture(ctx: &egui::Context, sidebar: SidebarLayout, width: f32) -> Option<bool> {
    if sidebar.docked {
        return None;
    }

    ctx.input(|i| {
        // A click outside a floating sidebar closes it.
        if sidebar.open && i.pointer.primary_clicked() {
            let pos = i.pointer.interact_pos()?;
            return (pos.x > width).then_some(false);
        }
        if !i.pointer.is_decidedly_dragging() {
            return None;
        }

        let origin = i.pointer.press_origin()?;

        let travel = i.pointer.interact_pos()?.x - origin.x;
        if !sidebar.open && origin.x <= SWIPE_EDGE && travel > SWIPE_DISTANCE {
            Some(true)
        } else if sidebar.open && travel < -SWIPE_DISTANCE {
            Some(false)
        } else {
            None
        }
    })
}
