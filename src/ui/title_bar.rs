//! Title bar: app name, current dataset and status.

use crate::store::StoreState;
use eframe::egui::{self, Color32, RichText};

pub fn render_title_bar(ui: &mut egui::Ui, state: &StoreState) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("strainview")
                .strong()
                .size(16.0)
                .color(Color32::WHITE),
        );

        let datapath = state.datasets.datapath.as_ref();
        if let Some(datapath) = datapath.filter(|_| state.datasets.ready) {
            ui.separator();
            ui.label(
                RichText::new(datapath)
                    .monospace()
                    .size(12.0)
                    .color(Color32::LIGHT_GRAY),
            );
        }
    });

    ui.label(
        RichText::new(&state.status_message)
            .size(12.0)
            .color(Color32::GRAY),
    );
}
