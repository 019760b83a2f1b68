//! Filtering and sorting logic

use super::App;
use crate::search::{self, ResultsView, SearchMode};
use crate::types::*;
use std::sync::Arc;
use tracing::debug;

impl App {
    /// Run `f` against the results view and the loaded records (empty before the first load)
    fn update_view<R>(&mut self, f: impl FnOnce(&mut ResultsView, &[VehicleRecord]) -> R) -> R {
        let records: Option<Arc<[VehicleRecord]>> = self.records().cloned();
        let result = f(&mut self.view, records.as_deref().unwrap_or(&[]));
        debug!(
            matches = self.view.count(),
            page = self.view.page(),
            mode = ?self.view.mode,
            "Results updated"
        );
        result
    }

    /// Recompute the filtered (and sorted) index list from the current inputs
    pub fn apply_filters(&mut self) {
        self.update_view(|view, records| view.refresh(records));
    }

    /// The search term was edited in place: back to the first page
    pub fn on_filters_changed(&mut self) {
        self.update_view(|view, records| view.filters_changed(records));
    }

    pub fn select_brand(&mut self, brand: Option<String>) {
        if self.update_view(|view, records| view.select_brand(records, brand)) {
            self.refresh_line_options();
        }
    }

    pub fn select_line(&mut self, line: Option<String>) {
        self.update_view(|view, records| view.select_line(records, line));
    }

    pub fn select_type(&mut self, vehicle_type: Option<String>) {
        self.update_view(|view, records| view.select_type(records, vehicle_type));
    }

    pub fn refresh_line_options(&mut self) {
        self.line_options = match self.records() {
            Some(records) => search::line_options(records, self.view.filter.brand.as_deref()),
            None => Vec::new(),
        };
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        if self.update_view(|view, records| view.set_mode(records, mode)) {
            self.save_settings();
        }
    }

    pub fn clear_filters(&mut self) {
        self.update_view(|view, records| view.clear(records));
        self.refresh_line_options();
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.update_view(|view, records| view.toggle_sort(records, column));
    }
}
