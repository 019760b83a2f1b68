//! Modal dialogs: onboarding, payment tutorial, record detail

use super::App;
use crate::constants::*;
use crate::currency;
use crate::settings::non_blank;
use crate::theme::{self, Palette};
use crate::types::*;
use crate::ui::components;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::time::Duration;
use tracing::{debug, info, warn};

fn backdrop() -> egui::Color32 {
    egui::Color32::from_black_alpha(170)
}

/// Title row with a close button on the right. Returns true when closed.
fn modal_header(ui: &mut egui::Ui, p: &Palette, title: &str, subtitle: Option<&str>) -> bool {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(title)
                    .size(theme::FONT_TITLE + 4.0)
                    .strong()
                    .color(p.text_primary),
            );
            if let Some(subtitle) = subtitle {
                ui.label(
                    egui::RichText::new(subtitle)
                        .size(theme::FONT_SMALL)
                        .strong()
                        .color(p.text_dim),
                );
            }
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            if ui.add(theme::button(p, icons::X)).on_hover_text("Cerrar").clicked() {
                close = true;
            }
        });
    });
    ui.add_space(theme::SPACING_SM);
    ui.separator();
    ui.add_space(theme::SPACING_MD);
    close
}

/// Friendly label for a CSV column in the detail view
fn field_label(column: &str) -> &str {
    match column {
        COL_BRAND => "Marca",
        COL_LINE => "Línea",
        COL_TYPE => "Tipo de vehículo",
        COL_DISPLACEMENT => "Cilindraje",
        COL_POWER => "Potencia",
        COL_TONNAGE => "Tonelaje",
        COL_BODY => "Carrocería",
        COL_FUEL => "Combustible",
        COL_TRANSMISSION => "Transmisión",
        COL_AXLES => "Ejes",
        COL_TRACTION => "Tracción",
        COL_DOORS => "Puertas",
        COL_PASSENGERS => "Pasajeros",
        COL_CODE => "Código",
        COL_VALUE => "Valor del vehículo",
        other => other,
    }
}

impl App {
    // ========================================================================
    // ONBOARDING
    // ========================================================================

    /// First launch only: open the onboarding modal shortly after startup
    pub fn update_intro_timer(&mut self, ctx: &egui::Context) {
        if self.settings.has_seen_intro || self.show_intro {
            return;
        }
        let now = ctx.input(|i| i.time);
        let due = *self.intro_due_at.get_or_insert(now + INTRO_DELAY_SECS);
        if now >= due {
            debug!("Showing onboarding");
            self.show_intro = true;
        } else {
            ctx.request_repaint_after(Duration::from_secs_f64(due - now));
        }
    }

    fn close_intro(&mut self) {
        self.show_intro = false;
        self.settings.has_seen_intro = true;
        self.settings.user_name = non_blank(&self.intro_name);
        self.settings.user_nit = non_blank(&self.intro_nit);
        info!(
            has_name = self.settings.user_name.is_some(),
            has_nit = self.settings.user_nit.is_some(),
            "Onboarding completed"
        );
        self.save_settings();
    }

    pub fn render_intro_modal(&mut self, ctx: &egui::Context) {
        if !self.show_intro {
            return;
        }
        let p = self.palette();
        let max_height = ctx.screen_rect().height() * 0.7;
        let mut close = false;

        let modal = egui::Modal::new(egui::Id::new("intro_modal"))
            .backdrop_color(backdrop())
            .frame(theme::modal_frame(p));
        let modal_response = modal.show(ctx, |ui| {
            ui.set_width(theme::MODAL_WIDTH);
            close |= modal_header(ui, p, "BIENVENIDO", Some("GUÍA RÁPIDA"));

            egui::ScrollArea::vertical()
                .max_height(max_height)
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        ui.label(
                            egui::RichText::new(
                                "Esta herramienta te permite consultar la tabla de valores imponibles del ",
                            )
                            .color(p.text_secondary),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "Impuesto Sobre Circulación de Vehículos (ISCV) para el año {}",
                                TAX_YEAR
                            ))
                            .strong()
                            .color(p.text_primary),
                        );
                        ui.label(egui::RichText::new(" de forma rápida y sencilla.").color(p.text_secondary));
                    });
                    ui.add_space(theme::SPACING_LG);

                    components::step(
                        ui,
                        p,
                        icons::MAGNIFYING_GLASS,
                        p.primary,
                        "1. Busca tu vehículo",
                        "Utiliza los filtros de Marca, Línea y Tipo para encontrar tu vehículo en la tabla oficial.",
                    );
                    ui.add_space(theme::SPACING_MD);
                    components::step(
                        ui,
                        p,
                        icons::CHECK_CIRCLE,
                        p.status_success,
                        "2. Verifica el impuesto",
                        "Selecciona un resultado para ver el impuesto a pagar según el año del modelo. ¡El descuento del 50% ya está calculado!",
                    );
                    ui.add_space(theme::SPACING_MD);
                    components::step(
                        ui,
                        p,
                        icons::FILE_TEXT,
                        p.secondary,
                        "3. Genera tu formulario",
                        "Consulta la guía del menú superior para generar tu boleta de pago SAT-4091 en Declaraguate.",
                    );
                    ui.add_space(theme::SPACING_LG);

                    theme::notice_frame(p.bg_surface, p.border_subtle).show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.horizontal_top(|ui| {
                            ui.label(egui::RichText::new(icons::INFO).color(p.text_muted));
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "Esta es una herramienta de consulta no oficial basada en la tabla publicada por la SAT. Para trámites oficiales, visita siempre los canales gubernamentales.",
                                    )
                                    .size(theme::FONT_SMALL + 1.0)
                                    .color(p.text_muted),
                                )
                                .wrap(),
                            );
                        });
                    });
                    ui.add_space(theme::SPACING_MD);

                    theme::notice_frame(p.warning_bg, p.status_warning).show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.horizontal_top(|ui| {
                            ui.label(egui::RichText::new(icons::WARNING).color(p.warning_text));
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "AVISO IMPORTANTE: algunos datos de la marca MAZDA son imprecisos, la tabla oficial incluye modelos y líneas inexistentes.",
                                    )
                                    .size(theme::FONT_SMALL + 1.0)
                                    .color(p.warning_text),
                                )
                                .wrap(),
                            );
                        });
                    });
                    ui.add_space(theme::SPACING_LG);

                    components::caption(ui, p, "TU NOMBRE (OPCIONAL)");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.intro_name)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(theme::SPACING_SM);
                    components::caption(ui, p, "NIT (OPCIONAL)");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.intro_nit)
                            .hint_text("1234567-8")
                            .desired_width(f32::INFINITY),
                    );
                });

            ui.add_space(theme::SPACING_LG);
            let start = ui.add_sized(
                [ui.available_width(), 40.0],
                theme::button_accent(p, "ENTENDIDO, INICIAR"),
            );
            if start.clicked() {
                close = true;
            }
        });

        if close || modal_response.should_close() {
            self.close_intro();
        }
    }

    // ========================================================================
    // PAYMENT TUTORIAL
    // ========================================================================

    pub fn open_tutorial(&mut self) {
        self.show_tutorial = true;
        if !self.settings.has_seen_tutorial {
            self.settings.has_seen_tutorial = true;
            self.save_settings();
        }
    }

    pub fn render_tutorial_modal(&mut self, ctx: &egui::Context) {
        if !self.show_tutorial {
            return;
        }
        let p = self.palette();
        let mut close = false;

        let modal = egui::Modal::new(egui::Id::new("tutorial_modal"))
            .backdrop_color(backdrop())
            .frame(theme::modal_frame(p));
        let modal_response = modal.show(ctx, |ui| {
            ui.set_width(theme::MODAL_WIDTH);
            close |= modal_header(ui, p, "GUÍA PARA PRESENTAR FORMULARIO 4091", None);

            let steps = [
                (
                    "1. Ingresa a Declaraguate",
                    "Inicia sesión en la Agencia Virtual de la SAT con tu usuario y abre Declaraguate.",
                ),
                (
                    "2. Selecciona el formulario SAT-4091",
                    "Busca el formulario del Impuesto Sobre Circulación de Vehículos.",
                ),
                (
                    "3. Completa los datos del vehículo",
                    "Ingresa la placa y confirma que el monto coincide con el de esta consulta.",
                ),
                (
                    "4. Genera la boleta y paga",
                    "Descarga la boleta y págala en un banco del sistema o en tu banca en línea.",
                ),
            ];
            for (title, body) in steps {
                components::step(ui, p, icons::ARROW_CIRCLE_RIGHT, p.primary, title, body);
                ui.add_space(theme::SPACING_MD);
            }

            if let Some(nit) = &self.settings.user_nit {
                theme::notice_frame(p.bg_surface, p.border_subtle).show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(
                        egui::RichText::new(format!("{}  Tu NIT: {}", icons::IDENTIFICATION_CARD, nit))
                            .monospace()
                            .color(p.text_secondary),
                    );
                });
                ui.add_space(theme::SPACING_MD);
            }

            ui.add(
                egui::Label::new(
                    egui::RichText::new(
                        "Sigue los pasos del video oficial de la SAT para realizar tu pago correctamente.",
                    )
                    .size(theme::FONT_SMALL + 1.0)
                    .color(p.text_muted),
                )
                .wrap(),
            );
            ui.add_space(theme::SPACING_LG);

            ui.horizontal(|ui| {
                let watch = ui.add(theme::button_accent(
                    p,
                    format!("{}  VER VIDEO", icons::PLAY_CIRCLE),
                ));
                if watch.clicked() {
                    debug!(url = TUTORIAL_VIDEO_URL, "Opening tutorial video");
                    if let Err(e) = open::that(TUTORIAL_VIDEO_URL) {
                        warn!(error = %e, "Failed to open tutorial video");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(theme::button(p, "CERRAR")).clicked() {
                        close = true;
                    }
                });
            });
        });

        if close || modal_response.should_close() {
            self.show_tutorial = false;
        }
    }

    // ========================================================================
    // RECORD DETAIL
    // ========================================================================

    pub fn render_detail_modal(&mut self, ctx: &egui::Context) {
        let Some(idx) = self.selected_record else {
            return;
        };
        let Some(records) = self.records().cloned() else {
            self.selected_record = None;
            return;
        };
        let Some(record) = records.get(idx) else {
            self.selected_record = None;
            return;
        };

        let p = self.palette();
        let max_height = ctx.screen_rect().height() * 0.6;
        let mut close = false;

        let modal = egui::Modal::new(egui::Id::new("detail_modal"))
            .backdrop_color(backdrop())
            .frame(theme::modal_frame(p));
        let modal_response = modal.show(ctx, |ui| {
            ui.set_width(theme::DETAIL_MODAL_WIDTH);
            let title = if record.line.is_empty() {
                record.brand.clone()
            } else {
                format!("{} {}", record.brand, record.line)
            };
            let subtitle = format!("CÓDIGO {}", record.code);
            close |= modal_header(ui, p, &title, Some(&subtitle));

            render_discount_card(ui, p, record);
            ui.add_space(theme::SPACING_LG);

            egui::ScrollArea::vertical()
                .max_height(max_height)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    components::caption(ui, p, "IMPUESTO POR AÑO DE MODELO");
                    render_tax_grid(ui, p, record);
                    ui.add_space(theme::SPACING_LG);

                    components::caption(ui, p, "DATOS DEL VEHÍCULO");
                    egui::Grid::new("detail_fields_grid")
                        .num_columns(2)
                        .striped(true)
                        .spacing([theme::SPACING_XL, 6.0])
                        .show(ui, |ui| {
                            for (column, value) in record.fields() {
                                components::field_row(ui, p, field_label(column), value);
                            }
                            for column in record.extra.iter().map(|(name, _)| name.as_str()) {
                                let value = record.get(column).unwrap_or_default();
                                components::field_row(ui, p, column, value);
                            }
                        });
                });

            ui.add_space(theme::SPACING_LG);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(theme::button(p, "CERRAR")).clicked() {
                    close = true;
                }
            });
        });

        if close || modal_response.should_close() {
            self.selected_record = None;
        }
    }
}

/// Headline amount for the current tax year after the discount
fn render_discount_card(ui: &mut egui::Ui, p: &Palette, record: &VehicleRecord) {
    let tax = record.current_tax().unwrap_or_default();
    let discounted = currency::discounted_display(tax);

    egui::Frame::new()
        .fill(p.secondary)
        .stroke(egui::Stroke::new(theme::STROKE_THICK, p.border_strong))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(14))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new(format!("IMPUESTO {} CON 50% DE DESCUENTO", TAX_YEAR))
                    .size(theme::FONT_SMALL)
                    .strong()
                    .color(p.on_secondary),
            );
            ui.label(
                egui::RichText::new(discounted.as_deref().unwrap_or("—"))
                    .size(theme::FONT_DISPLAY)
                    .strong()
                    .monospace()
                    .color(p.on_secondary),
            );
            if !tax.is_empty() {
                ui.label(
                    egui::RichText::new(format!("Sin descuento: {}", tax))
                        .size(theme::FONT_LABEL)
                        .color(p.on_secondary),
                );
            }
        });
}

fn render_tax_grid(ui: &mut egui::Ui, p: &Palette, record: &VehicleRecord) {
    if record.taxes.is_empty() {
        ui.label(egui::RichText::new("Sin datos de impuesto").color(p.text_muted));
        return;
    }

    egui::Grid::new("detail_tax_grid")
        .num_columns(4)
        .striped(true)
        .spacing([theme::SPACING_XL, 6.0])
        .show(ui, |ui| {
            for header in ["MODELO", "TASA", "IMPUESTO", "CON 50% DESC."] {
                ui.label(
                    egui::RichText::new(header)
                        .size(theme::FONT_SMALL)
                        .strong()
                        .color(p.text_dim),
                );
            }
            ui.end_row();

            for entry in &record.taxes {
                let current = entry.year == TAX_YEAR;
                let color = if current { p.primary } else { p.text_secondary };
                let cell = |text: String| {
                    let text = egui::RichText::new(text).monospace().color(color);
                    if current {
                        text.strong()
                    } else {
                        text
                    }
                };
                ui.label(cell(entry.year.to_string()));
                ui.label(cell(format!("{}%", entry.rate)));
                ui.label(cell(entry.amount.clone()));
                ui.label(cell(
                    currency::discounted_display(&entry.amount).unwrap_or_else(|| "—".to_string()),
                ));
                ui.end_row();
            }
        });
}
