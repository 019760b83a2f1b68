//! View rendering (header, filter panel, results table, pagination)

use super::App;
use crate::constants::*;
use crate::search::SearchMode;
use crate::theme::{self, Palette};
use crate::types::*;
use crate::ui::components;
use crate::utils;
use eframe::egui;
use egui_phosphor::regular as icons;
use num_format::{Locale, ToFormattedString};
use tracing::debug;

impl App {
    // ========================================================================
    // HEADER & FOOTER
    // ========================================================================

    pub fn render_header(&mut self, ctx: &egui::Context) {
        let p = self.palette();

        if self.logo_texture.is_none() {
            self.logo_texture = utils::rasterize_logo(theme::LOGO_SIZE as u32 * 2).map(|(pixels, w, h)| {
                ctx.load_texture(
                    "logo",
                    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
        }

        let mut toggle_theme = false;
        let mut open_tutorial = false;

        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(p.primary)
                    .stroke(egui::Stroke::new(theme::STROKE_THICK, p.border_strong))
                    .inner_margin(egui::Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if let Some(texture) = &self.logo_texture {
                        let size = egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE);
                        ui.image(egui::load::SizedTexture::new(texture.id(), size));
                        ui.add_space(theme::SPACING_LG);
                    }

                    ui.vertical(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("ISCV CIRCULACIÓN")
                                    .size(theme::FONT_DISPLAY)
                                    .strong()
                                    .color(p.on_primary),
                            )
                            .selectable(false),
                        );
                        ui.horizontal(|ui| {
                            egui::Frame::new()
                                .fill(p.secondary)
                                .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, p.border_strong))
                                .corner_radius(theme::RADIUS_DEFAULT)
                                .inner_margin(egui::Margin::symmetric(6, 2))
                                .show(ui, |ui| {
                                    ui.label(
                                        egui::RichText::new(format!("EDICIÓN {}", TAX_YEAR))
                                            .size(theme::FONT_SMALL)
                                            .strong()
                                            .color(p.on_secondary),
                                    );
                                });
                            if let Some(name) = &self.settings.user_name {
                                ui.add_space(theme::SPACING_MD);
                                ui.label(
                                    egui::RichText::new(format!("Hola, {}", name))
                                        .size(theme::FONT_LABEL)
                                        .color(p.on_primary),
                                );
                            }
                        });
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let toggle = ui
                            .add(
                                theme::button(p, self.theme_mode.toggle_icon())
                                    .min_size(egui::vec2(36.0, 36.0)),
                            )
                            .on_hover_text("Cambiar tema");
                        if toggle.clicked() {
                            toggle_theme = true;
                        }
                        ui.add_space(theme::SPACING_MD);

                        let label = format!("{}  GENERAR FORMULARIO SAT-4091", icons::YOUTUBE_LOGO);
                        // Highlighted until the tutorial has been opened once
                        let button = if self.settings.has_seen_tutorial {
                            theme::button(p, label)
                        } else {
                            egui::Button::new(
                                egui::RichText::new(label).strong().color(p.on_secondary),
                            )
                            .fill(p.secondary)
                            .stroke(egui::Stroke::new(theme::STROKE_THICK, p.border_strong))
                            .corner_radius(theme::RADIUS_DEFAULT)
                        };
                        if ui.add(button.min_size(egui::vec2(0.0, 36.0))).clicked() {
                            open_tutorial = true;
                        }
                    });
                });
            });

        if toggle_theme {
            self.toggle_theme(ctx);
        }
        if open_tutorial {
            self.open_tutorial();
        }
    }

    pub fn render_footer(&self, ctx: &egui::Context) {
        let p = self.palette();
        egui::TopBottomPanel::bottom("footer")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(p.bg_base)
                    .inner_margin(egui::Margin::symmetric(16, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(
                            "Consulta no oficial. Verifica siempre el monto en el portal de la SAT.",
                        )
                        .size(theme::FONT_SMALL)
                        .color(p.text_dim),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(theme::FONT_SMALL)
                                .color(p.text_dim),
                        );
                    });
                });
            });
    }

    // ========================================================================
    // FILTER PANEL
    // ========================================================================

    pub fn render_sidebar(&mut self, ctx: &egui::Context) {
        let p = self.palette();

        // Left sidebar - filters (must be added BEFORE CentralPanel)
        egui::SidePanel::left("filter_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(p.bg_base)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.render_filter_card(ui, p);
                        ui.add_space(theme::SPACING_XL);
                        self.render_source_card(ui, p);
                    });
            });
    }

    fn render_filter_card(&mut self, ui: &mut egui::Ui, p: &Palette) {
        let loaded = self.data.is_some();

        theme::card_frame(p).show(ui, |ui| {
            ui.set_min_width(ui.available_width() - 4.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(icons::FUNNEL)
                        .size(theme::FONT_TITLE)
                        .color(p.text_primary),
                );
                ui.label(
                    egui::RichText::new("FILTROS")
                        .size(theme::FONT_TITLE)
                        .strong()
                        .color(p.text_primary),
                );
            });
            ui.add_space(theme::SPACING_LG);

            components::caption(ui, p, "BUSCAR");
            let search = ui.add_enabled(
                loaded,
                egui::TextEdit::singleline(&mut self.view.filter.term)
                    .hint_text(format!("{} Código, marca, línea...", icons::MAGNIFYING_GLASS))
                    .desired_width(f32::INFINITY),
            );
            if self.focus_search {
                self.focus_search = false;
                search.request_focus();
            }
            if search.changed() {
                self.on_filters_changed();
            }
            ui.add_space(theme::SPACING_SM);

            let mut key_fields = self.view.mode == SearchMode::KeyFields;
            if theme::segmented_toggle(ui, p, "CLAVE", "TODOS", &mut key_fields) {
                self.set_search_mode(if key_fields {
                    SearchMode::KeyFields
                } else {
                    SearchMode::AllFields
                });
            }
            ui.add_space(theme::SPACING_LG);

            components::caption(ui, p, "MARCA");
            let mut brand = self.view.filter.brand.clone();
            if components::filter_combo(
                ui,
                "brand_filter",
                "Todas las marcas",
                &self.brand_options,
                &mut brand,
                loaded,
            ) {
                self.select_brand(brand);
            }
            ui.add_space(theme::SPACING_MD);

            components::caption(ui, p, "LÍNEA");
            let mut line = self.view.filter.line.clone();
            if components::filter_combo(
                ui,
                "line_filter",
                "Todas las líneas",
                &self.line_options,
                &mut line,
                loaded,
            ) {
                self.select_line(line);
            }
            ui.add_space(theme::SPACING_MD);

            components::caption(ui, p, "TIPO");
            let mut vehicle_type = self.view.filter.vehicle_type.clone();
            if components::filter_combo(
                ui,
                "type_filter",
                "Todos los tipos",
                &self.type_options,
                &mut vehicle_type,
                loaded,
            ) {
                self.select_type(vehicle_type);
            }
            ui.add_space(theme::SPACING_LG);

            let clear = ui.add_enabled(
                !self.view.filter.is_empty(),
                theme::button(p, format!("{}  LIMPIAR FILTROS", icons::X)),
            );
            if clear.clicked() {
                self.clear_filters();
            }

            if loaded {
                ui.add_space(theme::SPACING_LG);
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} RESULTADOS ENCONTRADOS",
                        self.view.count().to_formatted_string(&Locale::en)
                    ))
                    .size(theme::FONT_SMALL)
                    .strong()
                    .color(p.text_secondary),
                );
            }
        });
    }

    fn render_source_card(&mut self, ui: &mut egui::Ui, p: &Palette) {
        let ctx = ui.ctx().clone();
        let mut pick_file = false;
        let mut reset_source = false;

        theme::section_frame(p).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            components::caption(ui, p, "FUENTE DE DATOS");
            ui.add(
                egui::Label::new(
                    egui::RichText::new(self.data_source.to_string())
                        .size(theme::FONT_SMALL)
                        .monospace()
                        .color(p.text_muted),
                )
                .wrap(),
            );

            if let Some(data) = &self.data {
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(format!(
                        "{} registros · {}",
                        data.records.len().to_formatted_string(&Locale::en),
                        data.loaded_at.format("%d/%m/%Y %H:%M")
                    ))
                    .size(theme::FONT_SMALL)
                    .color(p.text_muted),
                );
                if data.stale {
                    ui.label(
                        egui::RichText::new(format!("{} Copia sin conexión", icons::WIFI_SLASH))
                            .size(theme::FONT_SMALL)
                            .color(p.status_warning),
                    );
                }
            }

            ui.add_space(theme::SPACING_MD);
            ui.horizontal_wrapped(|ui| {
                if ui
                    .add(theme::button(p, format!("{}  ABRIR CSV", icons::FOLDER_OPEN)))
                    .clicked()
                {
                    pick_file = true;
                }
                if self.settings.data_source.is_some()
                    && ui
                        .add(theme::button(p, "RESTABLECER"))
                        .on_hover_text("Volver a la tabla publicada")
                        .clicked()
                {
                    reset_source = true;
                }
            });
        });

        if pick_file {
            self.pick_source_file(&ctx);
        }
        if reset_source {
            self.change_source(&ctx, None);
        }
    }

    // ========================================================================
    // RESULTS
    // ========================================================================

    pub fn render_central(&mut self, ctx: &egui::Context) {
        let p = self.palette();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(p.bg_base)
                    .inner_margin(egui::Margin { left: 0, right: 20, top: 16, bottom: 16 }),
            )
            .show(ctx, |ui| {
                if self.data.is_none() {
                    match self.load_error.clone() {
                        Some(message) => {
                            if components::error_panel(ui, p, &message) {
                                self.retry_load(ctx);
                            }
                        }
                        None => components::loading_indicator(ui, p),
                    }
                    return;
                }

                self.render_stale_notice(ui, p);

                theme::card_frame(p).show(ui, |ui| {
                    ui.set_min_size(ui.available_size() - egui::vec2(4.0, 4.0));
                    let count = self.view.count();
                    if self.view.total_pages() > 1 {
                        egui::TopBottomPanel::bottom("pagination")
                            .exact_height(theme::PAGINATION_HEIGHT)
                            .show_separator_line(true)
                            .frame(egui::Frame::new())
                            .show_inside(ui, |ui| self.render_pagination(ui, p));
                    }
                    if count == 0 {
                        self.render_empty_state(ui, p);
                    } else {
                        self.render_table(ui, p);
                    }
                });
            });
    }

    fn render_stale_notice(&self, ui: &mut egui::Ui, p: &Palette) {
        let Some(data) = self.data.as_ref().filter(|d| d.stale) else {
            return;
        };
        theme::notice_frame(p.warning_bg, p.status_warning).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new(format!(
                    "{}  Sin conexión: mostrando la última copia descargada ({})",
                    icons::WARNING,
                    data.loaded_at.format("%d/%m/%Y %H:%M")
                ))
                .color(p.warning_text),
            );
        });
        ui.add_space(theme::SPACING_LG);
    }

    fn render_table(&mut self, ui: &mut egui::Ui, p: &Palette) {
        use egui_extras::{Column, TableBuilder};

        let Some(records) = self.records().cloned() else {
            return;
        };
        let page_rows: Vec<usize> = self.view.page_rows().to_vec();
        let sort_state = self.view.sort;

        let headers = [
            ("CÓDIGO".to_string(), SortColumn::Code),
            ("MARCA / LÍNEA".to_string(), SortColumn::Brand),
            ("TIPO".to_string(), SortColumn::Type),
            (format!("VALOR {}", TAX_YEAR), SortColumn::Value),
            (format!("IMPUESTO {}", TAX_YEAR), SortColumn::Tax),
        ];

        let mut sort_clicked: Option<SortColumn> = None;
        let mut row_clicked: Option<usize> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .sense(egui::Sense::click())
            .min_scrolled_height(0.0)
            .column(Column::exact(110.0))
            .column(Column::remainder().at_least(200.0).clip(true))
            .column(Column::exact(150.0).clip(true))
            .column(Column::exact(150.0))
            .column(Column::exact(150.0))
            .header(theme::TABLE_HEADER_HEIGHT, |mut header| {
                for (label, column) in &headers {
                    header.col(|ui| {
                        if sort_header(ui, p, label, *column, sort_state) {
                            sort_clicked = Some(*column);
                        }
                    });
                }
            })
            .body(|mut body| {
                for idx in page_rows {
                    let record = &records[idx];
                    body.row(theme::ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(&record.code)
                                    .monospace()
                                    .color(p.text_secondary),
                            );
                        });
                        row.col(|ui| {
                            ui.vertical(|ui| {
                                ui.add_space(theme::SPACING_SM);
                                ui.label(
                                    egui::RichText::new(&record.brand)
                                        .strong()
                                        .color(p.text_primary),
                                );
                                if !record.line.is_empty() {
                                    ui.label(
                                        egui::RichText::new(&record.line)
                                            .size(theme::FONT_SMALL)
                                            .color(p.text_muted),
                                    );
                                }
                            });
                        });
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(&record.vehicle_type)
                                    .size(theme::FONT_LABEL)
                                    .color(p.text_secondary),
                            );
                        });
                        row.col(|ui| {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new(&record.declared_value)
                                        .monospace()
                                        .color(p.text_secondary),
                                );
                            });
                        });
                        row.col(|ui| {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new(record.current_tax().unwrap_or("—"))
                                        .monospace()
                                        .strong()
                                        .color(p.text_primary),
                                );
                            });
                        });

                        if row.response().clicked() {
                            row_clicked = Some(idx);
                        }
                    });
                }
            });

        if let Some(column) = sort_clicked {
            self.toggle_sort(column);
        }
        if let Some(idx) = row_clicked {
            debug!(index = idx, code = %records[idx].code, "Opening record detail");
            self.selected_record = Some(idx);
        }
    }

    fn render_empty_state(&mut self, ui: &mut egui::Ui, p: &Palette) {
        let term = self.view.filter.term.trim();
        let message = if term.is_empty() {
            "No se encontraron resultados con los filtros seleccionados".to_string()
        } else {
            format!("No se encontraron resultados para \"{}\"", term)
        };

        let mut clear = false;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.label(
                egui::RichText::new(icons::MAGNIFYING_GLASS)
                    .size(40.0)
                    .color(p.text_dim),
            );
            ui.add_space(theme::SPACING_LG);
            ui.label(
                egui::RichText::new(message)
                    .size(theme::FONT_BODY)
                    .strong()
                    .color(p.text_secondary),
            );
            ui.add_space(theme::SPACING_LG);
            if ui.add(theme::button(p, "LIMPIAR FILTROS")).clicked() {
                clear = true;
            }
        });

        if clear {
            self.clear_filters();
        }
    }

    fn render_pagination(&mut self, ui: &mut egui::Ui, p: &Palette) {
        let count = self.view.count();
        let page = self.view.page();
        let total = self.view.total_pages();
        let has_prev = self.view.paginator.has_prev(count);
        let has_next = self.view.paginator.has_next(count);

        ui.horizontal_centered(|ui| {
            let prev = ui.add_enabled(
                has_prev,
                theme::button_nav(p, format!("{} ANTERIOR", icons::CARET_LEFT), has_prev),
            );
            if prev.clicked() {
                self.view.paginator.prev(count);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let next = ui.add_enabled(
                    has_next,
                    theme::button_nav(p, format!("SIGUIENTE {}", icons::CARET_RIGHT), has_next),
                );
                if next.clicked() {
                    self.view.paginator.next(count);
                }

                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("PÁGINA {} DE {}", page, total))
                            .size(theme::FONT_LABEL)
                            .strong()
                            .monospace()
                            .color(p.text_primary),
                    );
                });
            });
        });
    }
}

/// Clickable column header with a sort direction caret
fn sort_header(
    ui: &mut egui::Ui,
    p: &Palette,
    label: &str,
    column: SortColumn,
    sort: Option<(SortColumn, SortDirection)>,
) -> bool {
    let (icon, color) = match sort {
        Some((current, SortDirection::Ascending)) if current == column => {
            (icons::CARET_UP, p.text_primary)
        }
        Some((current, SortDirection::Descending)) if current == column => {
            (icons::CARET_DOWN, p.text_primary)
        }
        _ => (icons::CARET_UP_DOWN, p.text_muted),
    };

    let response = ui.add(
        egui::Label::new(
            egui::RichText::new(format!("{} {}", label, icon))
                .size(theme::FONT_LABEL)
                .strong()
                .color(color),
        )
        .selectable(false)
        .sense(egui::Sense::click()),
    );
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response.clicked()
}
