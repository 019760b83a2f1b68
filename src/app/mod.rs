//! App module - contains the main application state and logic

mod filters;
mod loading;
mod modals;
mod views;

use crate::loader::DataSource;
use crate::search::{ResultsView, SearchMode};
use crate::settings::Settings;
use crate::theme::{self, Palette, ThemeMode};
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Data loading
    pub(crate) load_slot: LoadSlot,
    pub(crate) load_started: bool,
    pub(crate) load_error: Option<String>,
    pub(crate) data: Option<LoadedData>,
    pub(crate) data_source: DataSource,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) client: reqwest::Client,
    pub(crate) cache_dir: PathBuf,
    // Filters, sort, paging and the derived index list
    pub(crate) view: ResultsView,
    pub(crate) brand_options: Vec<String>,
    pub(crate) line_options: Vec<String>,
    pub(crate) type_options: Vec<String>,
    pub(crate) focus_search: bool,
    // Modals
    pub(crate) selected_record: Option<usize>,
    pub(crate) show_intro: bool,
    pub(crate) intro_due_at: Option<f64>,
    pub(crate) intro_name: String,
    pub(crate) intro_nit: String,
    pub(crate) show_tutorial: bool,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) data_dir: PathBuf,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        settings: Settings,
        data_dir: PathBuf,
        cache_dir: PathBuf,
    ) -> Self {
        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx, settings.theme);

        let data_source = DataSource::resolve(settings.data_source.as_deref());
        let search_mode = if settings.search_all_fields {
            SearchMode::AllFields
        } else {
            SearchMode::KeyFields
        };

        Self {
            load_slot: LoadSlot::default(),
            load_started: false,
            load_error: None,
            data: None,
            data_source,
            runtime,
            client: reqwest::Client::new(),
            cache_dir,
            view: ResultsView::with_mode(search_mode),
            brand_options: Vec::new(),
            line_options: Vec::new(),
            type_options: Vec::new(),
            focus_search: false,
            selected_record: None,
            show_intro: false,
            intro_due_at: None,
            intro_name: settings.user_name.clone().unwrap_or_default(),
            intro_nit: settings.user_nit.clone().unwrap_or_default(),
            show_tutorial: false,
            theme_mode: settings.theme,
            settings,
            data_dir,
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        theme::palette(self.theme_mode)
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.theme = self.theme_mode;
        self.settings.search_all_fields = self.view.mode == SearchMode::AllFields;
        self.settings.save(&self.data_dir);
    }

    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme_mode = self.theme_mode.toggled();
        theme::apply_visuals(ctx, self.theme_mode);
        tracing::debug!(theme = ?self.theme_mode, "Theme changed");
        self.save_settings();
    }

    pub fn any_modal_open(&self) -> bool {
        self.show_intro || self.show_tutorial || self.selected_record.is_some()
    }

    /// Records of the active session, if loaded
    pub fn records(&self) -> Option<&Arc<[VehicleRecord]>> {
        self.data.as_ref().map(|d| &d.records)
    }
}
