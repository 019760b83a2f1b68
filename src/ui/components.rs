//! Reusable UI components
//!
//! Standalone widgets shared by the views and modals.

use crate::theme::{self, Palette};
use eframe::egui;

/// Uppercase caption above a control
pub fn caption(ui: &mut egui::Ui, p: &Palette, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_SMALL)
                .color(p.text_dim)
                .strong(),
        )
        .selectable(false),
    );
}

/// Combo box over `options` with a leading "all" entry that maps to `None`.
/// Returns true if the selection changed.
pub fn filter_combo(
    ui: &mut egui::Ui,
    id: &str,
    all_label: &str,
    options: &[String],
    selected: &mut Option<String>,
    enabled: bool,
) -> bool {
    let before = selected.clone();
    let text = selected.clone().unwrap_or_else(|| all_label.to_string());
    ui.add_enabled_ui(enabled, |ui| {
        egui::ComboBox::from_id_salt(id)
            .selected_text(text)
            .height(320.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(selected, None, all_label);
                for option in options {
                    ui.selectable_value(selected, Some(option.clone()), option.as_str());
                }
            });
    });
    *selected != before
}

/// Label / value pair used in the detail modal grid
pub fn field_row(ui: &mut egui::Ui, p: &Palette, label: &str, value: &str) {
    ui.label(
        egui::RichText::new(label)
            .size(theme::FONT_SMALL)
            .color(p.text_dim),
    );
    let value = if value.is_empty() { "—" } else { value };
    ui.label(
        egui::RichText::new(value)
            .monospace()
            .color(p.text_primary),
    );
    ui.end_row();
}

/// Centered spinner shown while the table loads
pub fn loading_indicator(ui: &mut egui::Ui, p: &Palette) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.add(egui::Spinner::new().size(48.0).color(p.primary));
        ui.add_space(theme::SPACING_XL);
        ui.label(
            egui::RichText::new("CARGANDO DATOS...")
                .size(theme::FONT_TITLE)
                .strong()
                .monospace()
                .color(p.text_primary),
        );
    });
}

/// Load failure panel. Returns true when the retry button is clicked.
pub fn error_panel(ui: &mut egui::Ui, p: &Palette, message: &str) -> bool {
    let mut retry = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.set_max_width(440.0);
        theme::notice_frame(p.error_bg, p.error_border).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                        .size(36.0)
                        .color(p.error_text),
                );
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new("NO SE PUDIERON CARGAR LOS DATOS")
                        .strong()
                        .color(p.error_text),
                );
                ui.add_space(theme::SPACING_SM);
                ui.add(
                    egui::Label::new(egui::RichText::new(message).color(p.error_text)).wrap(),
                );
                ui.add_space(theme::SPACING_LG);
                retry = ui
                    .add(theme::button_accent(
                        p,
                        format!("{}  Reintentar", egui_phosphor::regular::ARROW_CLOCKWISE),
                    ))
                    .clicked();
            });
        });
    });
    retry
}

/// Numbered step with an icon, used by the onboarding and tutorial modals
pub fn step(ui: &mut egui::Ui, p: &Palette, icon: &str, icon_color: egui::Color32, title: &str, body: &str) {
    ui.horizontal_top(|ui| {
        ui.label(egui::RichText::new(icon).size(22.0).color(icon_color));
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(title)
                    .size(theme::FONT_LABEL)
                    .strong()
                    .color(p.text_primary),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new(body)
                        .size(theme::FONT_SMALL + 1.0)
                        .color(p.text_muted),
                )
                .wrap(),
            );
        });
    });
}
