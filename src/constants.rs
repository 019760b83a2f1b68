//! Application constants and configuration

pub const APP_NAME: &str = "ISCV Consulta";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default location of the published valuation table
pub const DATA_URL: &str =
    "https://raw.githubusercontent.com/webres-studio/iscv-2026/main/public/data.csv";

/// Walkthrough video for generating form SAT-4091 in Declaraguate
pub const TUTORIAL_VIDEO_URL: &str =
    "https://raw.githubusercontent.com/webres-studio/iscv-2026/main/public/formulario-declaraguate-4091.mp4";

/// Overrides the data source for a single run (path or URL)
pub const DATA_SOURCE_ENV: &str = "ISCV_DATA_SOURCE";

pub const TAX_YEAR: u16 = 2026;
pub const PAGE_SIZE: usize = 20;

/// Delay before the onboarding modal appears on first launch
pub const INTRO_DELAY_SECS: f64 = 1.0;
