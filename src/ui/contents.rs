//! Content area: the loading spinner or the composed panels.
//!
//! The panels themselves are placeholders for the real tree, map and
//! entropy renderers; they only honor the padding rectangle they receive.

use super::sidebar::panel_icon;
use crate::controller::{PanelKind, PanelMount, RenderPlan};
use crate::store::{PanelId, StoreState};
use eframe::egui::{self, Color32, Rect, RichText, Sense};
use egui_phosphor::regular as icons;

pub fn render_contents(ctx: &egui::Context, plan: &RenderPlan, state: &StoreState) {
    egui::CentralPanel::default().show(ctx, |ui| match plan {
        RenderPlan::Loading { margin_top } => {
            ui.vertical_centered(|ui| {
                ui.add_space(margin_top.max(0.0));
                ui.spinner();
                ui.label(RichText::new("Loading dataset...").color(Color32::GRAY));
            });
        }
        RenderPlan::Content { panels } => {
            let Some(first) = panels.first() else {
                return;
            };
            let padding = first.padding;
            let area = ui.max_rect();
            let content = Rect::from_min_max(
                egui::pos2(area.left() + padding.left, area.top() + padding.top),
                egui::pos2(area.right() - padding.right, area.bottom() - padding.bottom),
            );

            ui.scope_builder(egui::UiBuilder::new().max_rect(content), |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for mount in panels {
                        render_panel(ui, mount, state);
                        ui.add_space(8.0);
                    }
                });
            });
        }
    });
}

fn render_panel(ui: &mut egui::Ui, mount: &PanelMount, state: &StoreState) {
    let width = state.browser_dimensions.width - mount.padding.left - mount.padding.right;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        match mount.kind {
            PanelKind::Info => {
                ui.heading(format!("{} Dataset", icons::INFO));
                if let Some(datapath) = &state.datasets.datapath {
                    ui.label(RichText::new(datapath).monospace());
                }
                ui.label(format!(
                    "{} of {} panels shown",
                    state.controls.panels_to_display.len(),
                    PanelId::ALL.len()
                ));
            }
            PanelKind::Tree => {
                ui.heading(format!("{} Phylogeny", panel_icon(PanelId::Tree)));
                render_canvas(ui, 320.0, width);
            }
            PanelKind::Map => {
                ui.heading(format!("{} Transmissions", panel_icon(PanelId::Map)));
                if mount.force_new_projection {
                    ui.label(RichText::new("Reprojecting").small());
                }
                render_canvas(ui, 280.0, width);
            }
            PanelKind::Entropy => {
                ui.heading(format!("{} Diversity", panel_icon(PanelId::Entropy)));
                render_canvas(ui, 160.0, width);
            }
            PanelKind::Footer => {
                ui.label(
                    RichText::new("Drop dataset files anywhere in the window to view them locally.")
                        .small()
                        .color(Color32::GRAY),
                );
            }
        }
    });
}

fn render_canvas(ui: &mut egui::Ui, height: f32, width: f32) {
    let size = egui::vec2(ui.available_width(), height);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, Color32::from_rgb(20, 20, 35));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        format!("{:.0} px wide", width.max(0.0)),
        egui::FontId::proportional(12.0),
        Color32::GRAY,
    );
}
