use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::map::CenterReadout;
use crate::theme;

/// Map center coordinates in the bottom-right corner
pub fn coordinate_readout_ui(mut contexts: EguiContexts, readout: Res<CenterReadout>) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Area::new(egui::Id::new("coordinate_readout"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(theme::ui::BUTTON_BACKGROUND)
                .corner_radius(4.0)
                .inner_margin(egui::Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(readout.label())
                            .color(theme::ui::READOUT_TEXT)
                            .monospace(),
                    );
                });
        });

    Ok(())
}
