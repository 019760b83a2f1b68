//! Common types and data structures

use crate::constants::TAX_YEAR;
use std::sync::{Arc, Mutex};

/// Known CSV columns, in the order the published table lists them
pub const COL_BRAND: &str = "MARCA";
pub const COL_LINE: &str = "LINEA";
pub const COL_TYPE: &str = "TIPO_VEHICULO";
pub const COL_DISPLACEMENT: &str = "CILINDRAJE";
pub const COL_POWER: &str = "POTENCIA";
pub const COL_TONNAGE: &str = "TONELAJE";
pub const COL_BODY: &str = "CARROCERIA";
pub const COL_FUEL: &str = "COMBUSTIBLE";
pub const COL_TRANSMISSION: &str = "TRANSMISION";
pub const COL_AXLES: &str = "EJES";
pub const COL_TRACTION: &str = "TRACCION";
pub const COL_DOORS: &str = "PUERTAS";
pub const COL_PASSENGERS: &str = "PASAJEROS";
pub const COL_CODE: &str = "CODIGO";
pub const COL_VALUE: &str = "VALOR_VEHICULO";

/// Per-year tax column parsed from a header like `ISCV_2026_2%`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxColumn {
    pub year: u16,
    pub rate: String,
}

impl TaxColumn {
    pub fn parse(header: &str) -> Option<Self> {
        let rest = header.trim().strip_prefix("ISCV_")?;
        let (year, rate) = rest.split_once('_')?;
        let year = year.parse().ok()?;
        let rate = rate.trim_end_matches('%');
        if rate.is_empty() {
            return None;
        }
        Some(Self {
            year,
            rate: rate.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxEntry {
    pub year: u16,
    pub rate: String,
    pub amount: String,
}

/// One row of the valuation table. Every value is kept as the raw string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleRecord {
    pub brand: String,
    pub line: String,
    pub vehicle_type: String,
    pub displacement: String,
    pub power: String,
    pub tonnage: String,
    pub body: String,
    pub fuel: String,
    pub transmission: String,
    pub axles: String,
    pub traction: String,
    pub doors: String,
    pub passengers: String,
    pub code: String,
    pub declared_value: String,
    pub taxes: Vec<TaxEntry>,
    /// Columns outside the known layout, as (header, value)
    pub extra: Vec<(String, String)>,
}

impl VehicleRecord {
    /// Labelled descriptive fields, in display order
    pub fn fields(&self) -> [(&'static str, &str); 15] {
        [
            (COL_BRAND, self.brand.as_str()),
            (COL_LINE, self.line.as_str()),
            (COL_TYPE, self.vehicle_type.as_str()),
            (COL_DISPLACEMENT, self.displacement.as_str()),
            (COL_POWER, self.power.as_str()),
            (COL_TONNAGE, self.tonnage.as_str()),
            (COL_BODY, self.body.as_str()),
            (COL_FUEL, self.fuel.as_str()),
            (COL_TRANSMISSION, self.transmission.as_str()),
            (COL_AXLES, self.axles.as_str()),
            (COL_TRACTION, self.traction.as_str()),
            (COL_DOORS, self.doors.as_str()),
            (COL_PASSENGERS, self.passengers.as_str()),
            (COL_CODE, self.code.as_str()),
            (COL_VALUE, self.declared_value.as_str()),
        ]
    }

    /// Look a value up by its CSV header: known columns, then `ISCV_*`, then extras
    pub fn get(&self, column: &str) -> Option<&str> {
        if let Some((_, value)) = self.fields().into_iter().find(|(name, _)| *name == column) {
            return Some(value);
        }
        if let Some(col) = TaxColumn::parse(column) {
            return self.tax_for_year(col.year);
        }
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Every value in the row, known fields first
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields()
            .into_iter()
            .map(|(_, v)| v)
            .chain(self.taxes.iter().map(|t| t.amount.as_str()))
            .chain(self.extra.iter().map(|(_, v)| v.as_str()))
    }

    pub fn tax_for_year(&self, year: u16) -> Option<&str> {
        self.taxes
            .iter()
            .find(|t| t.year == year)
            .map(|t| t.amount.as_str())
    }

    pub fn current_tax(&self) -> Option<&str> {
        self.tax_for_year(TAX_YEAR)
    }
}

/// Column to sort the results table by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Code,
    Brand,
    Type,
    Value,
    Tax,
}

/// Sort direction for the results table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Records produced by a completed load
#[derive(Clone, Debug)]
pub struct LoadedData {
    pub records: Arc<[VehicleRecord]>,
    pub source: String,
    pub loaded_at: chrono::DateTime<chrono::Local>,
    /// Served from the offline copy after the remote fetch failed
    pub stale: bool,
}

/// Shared between the background loader and the UI thread
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(LoadedData),
    Failed(String),
}

/// Outcome slot of the newest background load. Each load gets a fresh slot,
/// so a superseded task writes into one nobody reads.
#[derive(Default)]
pub struct LoadSlot {
    current: Arc<Mutex<LoadState>>,
}

impl LoadSlot {
    /// Start a new load; the returned handle is where its task reports
    pub fn begin(&mut self) -> Arc<Mutex<LoadState>> {
        self.current = Arc::new(Mutex::new(LoadState::Loading));
        self.current.clone()
    }

    /// Finished outcome of the newest load, handed out once
    pub fn take_finished(&self) -> Option<LoadState> {
        match self.current.lock() {
            Ok(mut state) if !matches!(*state, LoadState::Loading) => Some(std::mem::take(&mut *state)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_column_parse() {
        let col = TaxColumn::parse("ISCV_2026_2%").unwrap();
        assert_eq!(col.year, 2026);
        assert_eq!(col.rate, "2");

        let col = TaxColumn::parse("ISCV_2025_1.8%").unwrap();
        assert_eq!(col.year, 2025);
        assert_eq!(col.rate, "1.8");

        assert!(TaxColumn::parse("VALOR_VEHICULO").is_none());
        assert!(TaxColumn::parse("ISCV_XXXX_2%").is_none());
        assert!(TaxColumn::parse("ISCV_2026_").is_none());
    }

    #[test]
    fn test_record_accessors() {
        let record = VehicleRecord {
            brand: "TOYOTA".into(),
            line: "HILUX".into(),
            code: "T001".into(),
            taxes: vec![TaxEntry {
                year: 2026,
                rate: "2".into(),
                amount: "Q 1,000.00".into(),
            }],
            extra: vec![("NOTA".into(), "X".into())],
            ..Default::default()
        };
        assert_eq!(record.get("MARCA"), Some("TOYOTA"));
        assert_eq!(record.get("CODIGO"), Some("T001"));
        assert_eq!(record.get("ISCV_2026_2%"), Some("Q 1,000.00"));
        assert_eq!(record.get("ISCV_2017_0.5%"), None);
        assert_eq!(record.get("NOTA"), Some("X"));
        assert_eq!(record.get("OTRA"), None);
        let fields = record.fields();
        assert_eq!(fields[0], (COL_BRAND, "TOYOTA"));
        assert!(fields.contains(&(COL_CODE, "T001")));
        assert_eq!(record.current_tax(), Some("Q 1,000.00"));
        assert_eq!(record.tax_for_year(2017), None);
        assert!(record.values().any(|v| v == "Q 1,000.00"));
        assert!(record.values().any(|v| v == "X"));
    }

    fn loaded(count: usize) -> LoadState {
        LoadState::Loaded(LoadedData {
            records: vec![VehicleRecord::default(); count].into(),
            source: "test".into(),
            loaded_at: chrono::Local::now(),
            stale: false,
        })
    }

    #[test]
    fn test_load_slot_ignores_superseded_loads() {
        let mut slot = LoadSlot::default();
        let first = slot.begin();
        let second = slot.begin();

        // The older load finishes first: nothing is handed out
        *first.lock().unwrap() = loaded(1);
        assert!(slot.take_finished().is_none());

        *second.lock().unwrap() = loaded(2);
        match slot.take_finished() {
            Some(LoadState::Loaded(data)) => assert_eq!(data.records.len(), 2),
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(slot.take_finished().is_none());
    }

    #[test]
    fn test_load_slot_reports_failure_once() {
        let mut slot = LoadSlot::default();
        let handle = slot.begin();
        assert!(slot.take_finished().is_none());

        *handle.lock().unwrap() = LoadState::Failed("sin conexión".into());
        assert!(matches!(slot.take_finished(), Some(LoadState::Failed(ref m)) if m == "sin conexión"));
        assert!(slot.take_finished().is_none());
    }
}
