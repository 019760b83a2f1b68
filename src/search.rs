//! Filtering, option lists and sorting over the loaded records
//!
//! Everything here is a pure function of (records, filter state). The app
//! recomputes the derived view whenever an input changes.

use crate::currency::parse_currency;
use crate::pagination::Paginator;
use crate::types::*;
use std::collections::BTreeSet;

/// Which fields the free-text term is matched against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Brand, line, code and vehicle type
    #[default]
    KeyFields,
    AllFields,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub brand: Option<String>,
    pub line: Option<String>,
    pub vehicle_type: Option<String>,
    pub term: String,
}

impl FilterState {
    /// Changing the brand always drops the selected line.
    /// Returns true if the brand changed.
    pub fn set_brand(&mut self, brand: Option<String>) -> bool {
        if self.brand == brand {
            return false;
        }
        self.brand = brand;
        self.line = None;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.line.is_none()
            && self.vehicle_type.is_none()
            && self.term.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a single record passes every active filter
    pub fn matches(&self, record: &VehicleRecord, mode: SearchMode) -> bool {
        if let Some(brand) = &self.brand {
            if &record.brand != brand {
                return false;
            }
        }
        if let Some(line) = &self.line {
            if &record.line != line {
                return false;
            }
        }
        if let Some(vehicle_type) = &self.vehicle_type {
            if &record.vehicle_type != vehicle_type {
                return false;
            }
        }

        let term = self.term.trim();
        if term.is_empty() {
            return true;
        }
        let term_lower = term.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&term_lower);
        match mode {
            SearchMode::KeyFields => {
                contains(&record.brand)
                    || contains(&record.line)
                    || contains(&record.code)
                    || contains(&record.vehicle_type)
            }
            SearchMode::AllFields => record.values().any(contains),
        }
    }
}

/// Indices of the matching records, in source order
pub fn apply(records: &[VehicleRecord], filter: &FilterState, mode: SearchMode) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r, mode))
        .map(|(i, _)| i)
        .collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn brand_options(records: &[VehicleRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.brand.as_str()))
}

/// Lines observed for `brand`, or every line when no brand is selected
pub fn line_options(records: &[VehicleRecord], brand: Option<&str>) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|r| brand.map_or(true, |b| r.brand == b))
            .map(|r| r.line.as_str()),
    )
}

pub fn type_options(records: &[VehicleRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.vehicle_type.as_str()))
}

/// Stable sort of `indices` by the given column
pub fn sort_indices(
    records: &[VehicleRecord],
    indices: &mut [usize],
    column: SortColumn,
    direction: SortDirection,
) {
    indices.sort_by(|&a, &b| {
        let (ra, rb) = (&records[a], &records[b]);
        let cmp = match column {
            SortColumn::Code => ra.code.cmp(&rb.code),
            SortColumn::Brand => ra
                .brand
                .cmp(&rb.brand)
                .then_with(|| ra.line.cmp(&rb.line)),
            SortColumn::Type => ra.vehicle_type.cmp(&rb.vehicle_type),
            // Unparseable amounts sort as None, ahead of every number
            SortColumn::Value => {
                parse_currency(&ra.declared_value).cmp(&parse_currency(&rb.declared_value))
            }
            SortColumn::Tax => ra
                .current_tax()
                .and_then(parse_currency)
                .cmp(&rb.current_tax().and_then(parse_currency)),
        };
        if direction == SortDirection::Descending {
            cmp.reverse()
        } else {
            cmp
        }
    });
}

/// Filter inputs, sort and page cursor of the results table, plus the derived
/// index list. Any filter or mode change returns to the first page; a sort
/// change keeps the current page (clamped on access).
#[derive(Clone, Debug, Default)]
pub struct ResultsView {
    pub filter: FilterState,
    pub mode: SearchMode,
    pub sort: Option<(SortColumn, SortDirection)>,
    pub paginator: Paginator,
    pub indices: Vec<usize>,
}

impl ResultsView {
    pub fn with_mode(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Recompute the index list without touching the page
    pub fn refresh(&mut self, records: &[VehicleRecord]) {
        let mut indices = apply(records, &self.filter, self.mode);
        if let Some((column, direction)) = self.sort {
            sort_indices(records, &mut indices, column, direction);
        }
        self.indices = indices;
    }

    /// Call after editing `filter` directly (e.g. the search term)
    pub fn filters_changed(&mut self, records: &[VehicleRecord]) {
        self.paginator.reset();
        self.refresh(records);
    }

    /// Returns true if the brand changed, which also drops the line
    pub fn select_brand(&mut self, records: &[VehicleRecord], brand: Option<String>) -> bool {
        let changed = self.filter.set_brand(brand);
        self.filters_changed(records);
        changed
    }

    pub fn select_line(&mut self, records: &[VehicleRecord], line: Option<String>) {
        self.filter.line = line;
        self.filters_changed(records);
    }

    pub fn select_type(&mut self, records: &[VehicleRecord], vehicle_type: Option<String>) {
        self.filter.vehicle_type = vehicle_type;
        self.filters_changed(records);
    }

    /// Returns true if the mode changed
    pub fn set_mode(&mut self, records: &[VehicleRecord], mode: SearchMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.filters_changed(records);
        true
    }

    pub fn clear(&mut self, records: &[VehicleRecord]) {
        self.filter.clear();
        self.filters_changed(records);
    }

    /// Header click: ascending, then descending, then unsorted
    pub fn toggle_sort(&mut self, records: &[VehicleRecord], column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.refresh(records);
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn page(&self) -> usize {
        self.paginator.page(self.count())
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.count())
    }

    /// Record indices on the current page
    pub fn page_rows(&self) -> &[usize] {
        &self.indices[self.paginator.range(self.count())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(brand: &str, line: &str, kind: &str, code: &str, value: &str) -> VehicleRecord {
        VehicleRecord {
            brand: brand.into(),
            line: line.into(),
            vehicle_type: kind.into(),
            code: code.into(),
            declared_value: value.into(),
            fuel: "GASOLINA".into(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<VehicleRecord> {
        vec![
            record("TOYOTA", "HILUX", "PICK UP", "T001", "Q 150,000.00"),
            record("MAZDA", "CX-5", "CAMIONETA", "M001", "Q 200,000.00"),
            record("TOYOTA", "COROLLA", "AUTOMOVIL", "T002", "Q 95,000.00"),
            record("NISSAN", "FRONTIER", "PICK UP", "N001", "N/D"),
        ]
    }

    #[test]
    fn test_brand_filter_end_to_end() {
        let records = sample();
        let mut filter = FilterState::default();
        assert_eq!(apply(&records, &filter, SearchMode::KeyFields).len(), 4);

        filter.set_brand(Some("TOYOTA".into()));
        let hits = apply(&records, &filter, SearchMode::KeyFields);
        assert_eq!(hits, vec![0, 2]);
        assert!(hits.iter().all(|&i| records[i].brand == "TOYOTA"));

        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(apply(&records, &filter, SearchMode::KeyFields).len(), records.len());
    }

    #[test]
    fn test_filters_are_subset_and_idempotent() {
        let records = sample();
        let filters = [
            FilterState {
                vehicle_type: Some("PICK UP".into()),
                ..Default::default()
            },
            FilterState {
                term: "to".into(),
                ..Default::default()
            },
            FilterState {
                brand: Some("TOYOTA".into()),
                line: Some("HILUX".into()),
                term: "hil".into(),
                ..Default::default()
            },
            FilterState {
                brand: Some("KIA".into()),
                ..Default::default()
            },
        ];
        for filter in &filters {
            for mode in [SearchMode::KeyFields, SearchMode::AllFields] {
                let first = apply(&records, filter, mode);
                assert!(first.iter().all(|&i| i < records.len()));
                let again = apply(&records, filter, mode);
                assert_eq!(first, again);

                let subset: Vec<VehicleRecord> = first.iter().map(|&i| records[i].clone()).collect();
                let reapplied = apply(&subset, filter, mode);
                assert_eq!(reapplied.len(), subset.len());
            }
        }
    }

    #[test]
    fn test_set_brand_resets_line() {
        let mut filter = FilterState::default();
        filter.set_brand(Some("TOYOTA".into()));
        filter.line = Some("HILUX".into());

        assert!(!filter.set_brand(Some("TOYOTA".into())));
        assert_eq!(filter.line.as_deref(), Some("HILUX"));

        assert!(filter.set_brand(Some("MAZDA".into())));
        assert_eq!(filter.line, None);

        filter.line = Some("CX-5".into());
        assert!(filter.set_brand(None));
        assert_eq!(filter.line, None);
    }

    #[test]
    fn test_line_options_follow_brand() {
        let records = sample();
        assert_eq!(
            line_options(&records, Some("TOYOTA")),
            vec!["COROLLA".to_string(), "HILUX".to_string()]
        );
        assert_eq!(line_options(&records, Some("MAZDA")), vec!["CX-5".to_string()]);
        assert!(line_options(&records, Some("KIA")).is_empty());
        assert_eq!(line_options(&records, None).len(), 4);
        assert_eq!(brand_options(&records), vec!["MAZDA", "NISSAN", "TOYOTA"]);
        assert_eq!(type_options(&records), vec!["AUTOMOVIL", "CAMIONETA", "PICK UP"]);
    }

    #[test]
    fn test_search_modes() {
        let records = sample();
        let filter = FilterState {
            term: "  gasolina ".into(),
            ..Default::default()
        };
        assert!(apply(&records, &filter, SearchMode::KeyFields).is_empty());
        assert_eq!(apply(&records, &filter, SearchMode::AllFields).len(), 4);

        let filter = FilterState {
            term: "t00".into(),
            ..Default::default()
        };
        assert_eq!(apply(&records, &filter, SearchMode::KeyFields), vec![0, 2]);
    }

    #[test]
    fn test_sort_indices() {
        let records = sample();
        let mut indices: Vec<usize> = (0..records.len()).collect();

        sort_indices(&records, &mut indices, SortColumn::Value, SortDirection::Ascending);
        assert_eq!(indices, vec![3, 2, 0, 1]);

        sort_indices(&records, &mut indices, SortColumn::Value, SortDirection::Descending);
        assert_eq!(indices, vec![1, 0, 2, 3]);

        sort_indices(&records, &mut indices, SortColumn::Brand, SortDirection::Ascending);
        assert_eq!(indices, vec![1, 3, 2, 0]);

        sort_indices(&records, &mut indices, SortColumn::Code, SortDirection::Ascending);
        assert_eq!(indices, vec![1, 3, 0, 2]);
    }

    /// 45 records: TOYOTA has 30 (alternating HILUX/COROLLA), MAZDA 15
    fn many() -> Vec<VehicleRecord> {
        (0..45)
            .map(|i| {
                let (brand, line) = match i % 3 {
                    0 => ("MAZDA", "CX-5"),
                    1 => ("TOYOTA", "HILUX"),
                    _ => ("TOYOTA", "COROLLA"),
                };
                record(brand, line, "AUTOMOVIL", &format!("C{:03}", i), "Q 1.00")
            })
            .collect()
    }

    fn on_page_three(records: &[VehicleRecord]) -> ResultsView {
        let mut view = ResultsView::default();
        view.refresh(records);
        view.paginator.set_page(3, view.count());
        assert_eq!(view.page(), 3);
        view
    }

    #[test]
    fn test_view_filter_changes_return_to_first_page() {
        let records = many();

        let mut view = on_page_three(&records);
        view.select_brand(&records, Some("TOYOTA".into()));
        assert_eq!((view.page(), view.count()), (1, 30));

        let mut view = on_page_three(&records);
        view.select_line(&records, Some("HILUX".into()));
        assert_eq!((view.page(), view.count()), (1, 15));

        let mut view = on_page_three(&records);
        view.select_type(&records, Some("AUTOMOVIL".into()));
        assert_eq!((view.page(), view.count()), (1, 45));

        let mut view = on_page_three(&records);
        view.filter.term = "c0".into();
        view.filters_changed(&records);
        assert_eq!(view.page(), 1);

        let mut view = on_page_three(&records);
        assert!(view.set_mode(&records, SearchMode::AllFields));
        assert_eq!(view.page(), 1);

        let mut view = on_page_three(&records);
        view.clear(&records);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_view_unchanged_mode_keeps_page() {
        let records = many();
        let mut view = on_page_three(&records);
        assert!(!view.set_mode(&records, SearchMode::KeyFields));
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn test_view_sort_keeps_page_and_cycles() {
        let records = many();
        let mut view = on_page_three(&records);

        view.toggle_sort(&records, SortColumn::Code);
        assert_eq!(view.sort, Some((SortColumn::Code, SortDirection::Ascending)));
        assert_eq!(view.page(), 3);
        assert_eq!(view.page_rows(), &[40, 41, 42, 43, 44]);

        view.toggle_sort(&records, SortColumn::Code);
        assert_eq!(view.sort, Some((SortColumn::Code, SortDirection::Descending)));
        assert_eq!(view.page_rows(), &[4, 3, 2, 1, 0]);

        view.toggle_sort(&records, SortColumn::Code);
        assert_eq!(view.sort, None);

        view.toggle_sort(&records, SortColumn::Brand);
        view.toggle_sort(&records, SortColumn::Code);
        assert_eq!(view.sort, Some((SortColumn::Code, SortDirection::Ascending)));
    }

    #[test]
    fn test_view_page_clamped_when_results_shrink() {
        let records = many();
        let mut view = on_page_three(&records);
        view.filter.brand = Some("MAZDA".into());
        view.refresh(&records);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_rows().len(), 15);
    }

    #[test]
    fn test_brand_filter_from_parsed_table() {
        let text = "MARCA,LINEA,TIPO_VEHICULO,CODIGO\n\
                    TOYOTA,HILUX,PICK UP,T001\n\
                    MAZDA,CX-5,CAMIONETA,M001\n\
                    TOYOTA,COROLLA,AUTOMOVIL,T002\n";
        let records = crate::loader::parse_records(text).unwrap();
        assert_eq!(records.len(), 3);

        let mut view = ResultsView::default();
        view.refresh(&records);
        assert_eq!(view.count(), 3);

        view.select_brand(&records, Some("TOYOTA".into()));
        assert_eq!(view.count(), 2);
        assert!(view.indices.iter().all(|&i| records[i].brand == "TOYOTA"));

        view.clear(&records);
        assert_eq!(view.count(), 3);
    }
}
