// src/config/consts.rs

// Remote (Socrata API on data.cdc.gov)
pub const API_BASE: &str = "https://data.cdc.gov";
pub const UUID_PRELIMINARY: &str = "mpgq-jmmr";
pub const UUID_CONSOLIDATED: &str = "ua7e-t2fy";
pub const DEFAULT_ENTRY_LIMIT: u32 = 100_000;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
pub const USER_AGENT: &str = concat!("nhsn_archive/", env!("CARGO_PKG_VERSION"));

// Archive
pub const DEFAULT_DATASET_DIR: &str = "datasets/nhsn_weekly_jurisdiction";
pub const METADATA_FILENAME: &str = "metadata.yaml";
pub const SNAPSHOT_PREFIX: &str = "nhsn_";
pub const SNAPSHOT_EXT: &str = "csv";
pub const LATEST_FILENAME: &str = "nhsn_latest.csv";
pub const STORE_SEP: char = ',';

// Columns
pub const DATE_COLUMN: &str = "weekendingdate";
pub const JURISDICTION_COLUMN: &str = "jurisdiction";
pub const COUNT_COLUMN_FMT: &str = "totalconf{}newadm"; // {} = 3-letter disease code

// Time
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_FETCH_TRIGGER: &str = "manual";

// Report
pub const MINIMUM_AS_OF: (i32, u32, u32) = (2024, 12, 4);
pub const DEFAULT_JURISDICTION: &str = "USA";
pub const WINDOW_WEEKS: u32 = 15;
pub const TEMPLATES_DIR: &str = "templates";
pub const TEMPLATE_NAME: &str = "report.html";
pub const ASSETS: &[&str] = &["style.css", "script.js"];
pub const PAGES_DIR: &str = "pages";
pub const INDEX_FILENAME: &str = "index.html";

// Target data
pub const TARGET_RELEASE: &str = "preliminary";
pub const LOCATIONS_FILE: &str = "aux_data/us_locations.csv";
pub const TRUTH_FILE: &str = "hosp_data/truth_latest.csv";
pub const NHSN_FILE: &str = "hosp_data/NHSN/nhsn_hosp_latest.csv";
