//! Valuation table loading: one fetch, one parse per session

use crate::constants::{DATA_SOURCE_ENV, DATA_URL};
use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Offline copy of the last successful remote fetch
const CACHE_FILE: &str = "data.csv";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No se pudo leer el archivo: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de red: {0}")]
    Http(#[from] reqwest::Error),

    #[error("El servidor respondió con estado {0}")]
    Status(u16),

    #[error("CSV inválido: {0}")]
    Csv(#[from] csv::Error),

    #[error("Falta la columna requerida {0}")]
    MissingColumn(String),

    #[error("El archivo de datos está vacío")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Environment override, then the configured source, then the published table
    pub fn resolve(configured: Option<&str>) -> Self {
        let from_env = std::env::var(DATA_SOURCE_ENV).ok();
        from_env
            .as_deref()
            .or(configured)
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse)
            .unwrap_or_else(|| Self::Url(DATA_URL.to_string()))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Copy a cell into the matching known field. Returns false for unknown headers.
fn assign_field(record: &mut VehicleRecord, header: &str, value: String) -> bool {
    let slot = match header {
        COL_BRAND => &mut record.brand,
        COL_LINE => &mut record.line,
        COL_TYPE => &mut record.vehicle_type,
        COL_DISPLACEMENT => &mut record.displacement,
        COL_POWER => &mut record.power,
        COL_TONNAGE => &mut record.tonnage,
        COL_BODY => &mut record.body,
        COL_FUEL => &mut record.fuel,
        COL_TRANSMISSION => &mut record.transmission,
        COL_AXLES => &mut record.axles,
        COL_TRACTION => &mut record.traction,
        COL_DOORS => &mut record.doors,
        COL_PASSENGERS => &mut record.passengers,
        COL_CODE => &mut record.code,
        COL_VALUE => &mut record.declared_value,
        _ => return false,
    };
    *slot = value;
    true
}

/// Parse the table text. The first row names the fields; blank rows are skipped.
pub fn parse_records(text: &str) -> Result<Vec<VehicleRecord>, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }
    if !headers.iter().any(|h| h == COL_BRAND) {
        return Err(LoadError::MissingColumn(COL_BRAND.to_string()));
    }
    let tax_columns: Vec<Option<TaxColumn>> = headers.iter().map(|h| TaxColumn::parse(h)).collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let row = result?;
        if row.iter().all(|field| field.is_empty()) {
            skipped += 1;
            continue;
        }

        let mut record = VehicleRecord::default();
        for (idx, header) in headers.iter().enumerate() {
            let value = row.get(idx).unwrap_or_default().to_string();
            if let Some(col) = &tax_columns[idx] {
                record.taxes.push(TaxEntry {
                    year: col.year,
                    rate: col.rate.clone(),
                    amount: value,
                });
            } else if !assign_field(&mut record, header, value.clone()) && !header.is_empty() {
                record.extra.push((header.clone(), value));
            }
        }
        records.push(record);
    }

    debug!(
        rows = records.len(),
        skipped = skipped,
        tax_columns = tax_columns.iter().flatten().count(),
        "Valuation table parsed"
    );
    Ok(records)
}

/// Read the raw table text from the source
pub async fn fetch_text(source: &DataSource, client: &reqwest::Client) -> Result<String, LoadError> {
    match source {
        DataSource::Url(url) => {
            debug!(url = %url, "Fetching valuation table");
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status(status.as_u16()));
            }
            Ok(response.text().await?)
        }
        DataSource::File(path) => {
            debug!(path = %path.display(), "Reading valuation table");
            Ok(tokio::fs::read_to_string(path).await?)
        }
    }
}

/// Fetch and parse the table. A remote table that fails to fetch or parse falls
/// back to the offline copy, which is only replaced by a table that parsed.
pub async fn load(
    source: &DataSource,
    client: &reqwest::Client,
    cache_dir: &Path,
) -> Result<LoadedData, LoadError> {
    let cache_path = cache_dir.join(CACHE_FILE);
    let remote = source.is_remote();

    let fetched = match fetch_text(source, client).await {
        Ok(text) => parse_records(&text).map(|records| (text, records)),
        Err(e) => Err(e),
    };

    let (records, stale) = match fetched {
        Ok((text, records)) => {
            if remote {
                if let Err(e) = tokio::fs::write(&cache_path, &text).await {
                    warn!(error = %e, path = %cache_path.display(), "Failed to write offline copy");
                }
            }
            (records, false)
        }
        Err(e) if remote && tokio::fs::try_exists(&cache_path).await.unwrap_or(false) => {
            warn!(error = %e, "Remote table unusable, using offline copy");
            let text = tokio::fs::read_to_string(&cache_path).await?;
            (parse_records(&text)?, true)
        }
        Err(e) => return Err(e),
    };

    info!(source = %source, count = records.len(), stale = stale, "Valuation table loaded");

    Ok(LoadedData {
        records: records.into(),
        source: source.to_string(),
        loaded_at: chrono::Local::now(),
        stale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MARCA,LINEA,TIPO_VEHICULO,CODIGO,VALOR_VEHICULO,ISCV_2026_2%,ISCV_2025_1.8%
TOYOTA,HILUX,PICK UP,T001,\"Q 150,000.00\",\"Q 3,000.00\",\"Q 2,700.00\"

MAZDA,CX-5,CAMIONETA,M001,\"Q 200,000.00\",\"Q 4,000.00\",\"Q 3,600.00\"
TOYOTA,COROLLA,AUTOMOVIL,T002,\"Q 120,000.00\",\"Q 2,400.00\",\"Q 2,160.00\"
";

    #[test]
    fn test_parse_records() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);

        let hilux = &records[0];
        assert_eq!(hilux.brand, "TOYOTA");
        assert_eq!(hilux.line, "HILUX");
        assert_eq!(hilux.vehicle_type, "PICK UP");
        assert_eq!(hilux.declared_value, "Q 150,000.00");
        assert_eq!(hilux.taxes.len(), 2);
        assert_eq!(hilux.taxes[0].year, 2026);
        assert_eq!(hilux.taxes[1].rate, "1.8");
        assert_eq!(hilux.current_tax(), Some("Q 3,000.00"));
        assert_eq!(hilux.fuel, "");
    }

    #[test]
    fn test_parse_skips_blank_rows() {
        let text = "MARCA,LINEA\nTOYOTA,HILUX\n,\n\nMAZDA,3\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line, "3");
    }

    #[test]
    fn test_parse_keeps_unknown_columns_and_short_rows() {
        let text = "\u{feff}MARCA,NOTA,ISCV_2026_2%\nTOYOTA,revisar\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].extra, vec![("NOTA".to_string(), "revisar".to_string())]);
        assert_eq!(records[0].current_tax(), Some(""));
    }

    #[test]
    fn test_parse_requires_brand_column() {
        let err = parse_records("LINEA,CODIGO\nHILUX,T001\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "MARCA"));

        assert!(matches!(parse_records("").unwrap_err(), LoadError::Empty));
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/data.csv"),
            DataSource::Url("https://example.com/data.csv".into())
        );
        assert_eq!(
            DataSource::parse(" /tmp/data.csv "),
            DataSource::File(PathBuf::from("/tmp/data.csv"))
        );
        assert!(!DataSource::parse("data.csv").is_remote());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabla.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let client = reqwest::Client::new();
        let data = load(&DataSource::File(path), &client, dir.path()).await.unwrap();
        assert_eq!(data.records.len(), 3);
        assert!(!data.stale);
        // Local sources never populate the offline copy
        assert!(!dir.path().join(CACHE_FILE).exists());
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let source = DataSource::File(dir.path().join("missing.csv"));
        let err = load(&source, &client, dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[tokio::test]
    async fn test_remote_failure_uses_offline_copy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), SAMPLE).unwrap();

        let client = reqwest::Client::new();
        let source = DataSource::Url("http://127.0.0.1:9/data.csv".into());
        let data = load(&source, &client, dir.path()).await.unwrap();
        assert!(data.stale);
        assert_eq!(data.records.len(), 3);
    }

    /// Serve one HTTP response on a local port and return its URL
    fn serve_once(body: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/data.csv", addr)
    }

    #[tokio::test]
    async fn test_unparseable_response_keeps_offline_copy() {
        let dir = tempfile::tempdir().unwrap();
        let cached = "MARCA,LINEA\nTOYOTA,HILUX\n";
        std::fs::write(dir.path().join(CACHE_FILE), cached).unwrap();

        let client = reqwest::Client::new();
        let source = DataSource::Url(serve_once("<html>captive portal</html>"));
        let data = load(&source, &client, dir.path()).await.unwrap();
        assert!(data.stale);
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].line, "HILUX");

        let on_disk = std::fs::read_to_string(dir.path().join(CACHE_FILE)).unwrap();
        assert_eq!(on_disk, cached);
    }

    #[tokio::test]
    async fn test_unparseable_response_without_offline_copy_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let source = DataSource::Url(serve_once("<html>captive portal</html>"));
        let err = load(&source, &client, dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
        assert!(!dir.path().join(CACHE_FILE).exists());
    }

    #[tokio::test]
    async fn test_remote_success_replaces_offline_copy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CACHE_FILE), "MARCA\nVIEJA\n").unwrap();

        let client = reqwest::Client::new();
        let source = DataSource::Url(serve_once(SAMPLE));
        let data = load(&source, &client, dir.path()).await.unwrap();
        assert!(!data.stale);
        assert_eq!(data.records.len(), 3);

        let on_disk = std::fs::read_to_string(dir.path().join(CACHE_FILE)).unwrap();
        assert_eq!(on_disk, SAMPLE);
    }
}
