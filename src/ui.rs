use bevy::diagnostic::{DiagnosticsStore, EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::camera::ToggleView;
use crate::config::GalleryConfig;
use crate::input::{InputSet, UiPointerCapture};

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Update, (ui_system, diagnostics_panel).before(InputSet));
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut ev_toggle: EventWriter<ToggleView>,
    mut capture: ResMut<UiPointerCapture>,
) {
    let ctx = contexts.ctx_mut();

    egui::Area::new("view_toggle".into())
        .fixed_pos(egui::pos2(20.0, 20.0))
        .show(ctx, |ui| {
            if ui.button("Toggle View").clicked() {
                ev_toggle.send(ToggleView);
            }
        });

    capture.0 = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
}

fn diagnostics_panel(
    mut contexts: EguiContexts,
    config: Res<GalleryConfig>,
    diagnostics: Res<DiagnosticsStore>,
) {
    if !config.show_diagnostics {
        return;
    }
    egui::Window::new("Diagnostics")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-20.0, 20.0))
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                if let Some(value) = fps.smoothed() {
                    ui.label(format!("FPS: {:.1}", value));
                }
            }
            if let Some(entity_count) = diagnostics.get(&EntityCountDiagnosticsPlugin::ENTITY_COUNT) {
                if let Some(value) = entity_count.value() {
                    ui.label(format!("Entities: {}", value));
                }
            }
        });
}
