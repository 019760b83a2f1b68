//! Background data loading

use super::App;
use crate::loader::{self, DataSource};
use crate::search::{self, ResultsView};
use crate::types::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::{debug, error, info};

impl App {
    pub fn start_load(&mut self, ctx: &egui::Context) {
        self.load_error = None;

        // A fresh slot per load; results of a superseded load are never read
        let state = self.load_slot.begin();
        let source = self.data_source.clone();
        let client = self.client.clone();
        let cache_dir = self.cache_dir.clone();
        let ctx = ctx.clone();

        info!(source = %source, "Starting data load");

        self.runtime.spawn(async move {
            std::fs::create_dir_all(&cache_dir).ok();

            let outcome = match loader::load(&source, &client, &cache_dir).await {
                Ok(data) => LoadState::Loaded(data),
                Err(e) => {
                    error!(error = %e, source = %source, "Data load failed");
                    LoadState::Failed(e.to_string())
                }
            };
            if let Ok(mut state) = state.lock() {
                *state = outcome;
            }
            ctx.request_repaint();
        });
    }

    /// Pick up the result of a finished load, if any
    pub fn poll_load(&mut self) {
        if self.data.is_some() {
            return;
        }
        match self.load_slot.take_finished() {
            Some(LoadState::Loaded(data)) => self.install_data(data),
            Some(LoadState::Failed(message)) => self.load_error = Some(message),
            _ => {}
        }
    }

    fn install_data(&mut self, data: LoadedData) {
        info!(
            count = data.records.len(),
            source = %data.source,
            stale = data.stale,
            "Records loaded"
        );
        self.brand_options = search::brand_options(&data.records);
        self.type_options = search::type_options(&data.records);
        self.data = Some(data);
        self.refresh_line_options();
        self.on_filters_changed();
    }

    pub fn retry_load(&mut self, ctx: &egui::Context) {
        debug!("Retrying data load");
        self.start_load(ctx);
    }

    /// Switch to a new data source and start a fresh session
    pub fn change_source(&mut self, ctx: &egui::Context, source: Option<DataSource>) {
        self.settings.data_source = source.as_ref().map(|s| s.to_string());
        self.data_source = DataSource::resolve(self.settings.data_source.as_deref());
        info!(source = %self.data_source, "Data source changed");
        self.save_settings();

        self.data = None;
        self.view = ResultsView::with_mode(self.view.mode);
        self.brand_options.clear();
        self.line_options.clear();
        self.type_options.clear();
        self.selected_record = None;
        self.start_load(ctx);
    }

    pub fn pick_source_file(&mut self, ctx: &egui::Context) {
        let picked: Option<PathBuf> = rfd::FileDialog::new()
            .set_title("Seleccionar tabla de valores")
            .add_filter("CSV", &["csv"])
            .pick_file();
        if let Some(path) = picked {
            self.change_source(ctx, Some(DataSource::File(path)));
        }
    }
}
