use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Column names as they appear in the source CSV
// ---------------------------------------------------------------------------

pub const COL_CODE: &str = "Código";
pub const COL_NAME: &str = "Nome";
pub const COL_ADDRESS: &str = "Enderezo";
pub const COL_MUNICIPALITY: &str = "Concello";
pub const COL_PROVINCE: &str = "Provincia";
pub const COL_POSTAL_CODE: &str = "Cód. postal";
pub const COL_PHONE: &str = "Teléfono";
pub const COL_CENTER_TYPE: &str = "Tipo de centro";
pub const COL_OWNERSHIP: &str = "TITULARIDADE";
pub const COL_CONCERTED: &str = "ENSINO_CONCERTADO";
pub const COL_DEPENDENT: &str = "DEPENDENTE";
pub const COL_COORD_X: &str = "COORDENADA_X";
pub const COL_COORD_Y: &str = "COORDENADA_Y";
pub const COL_DISTANCE: &str = "Distancia_Santiago_km";
pub const COL_TIME: &str = "Tiempo_Santiago_min";

/// Canonical names the coordinate columns are renamed to after cleaning.
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

/// Every column the loader requires in the header row.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    COL_CODE,
    COL_NAME,
    COL_ADDRESS,
    COL_MUNICIPALITY,
    COL_PROVINCE,
    COL_POSTAL_CODE,
    COL_PHONE,
    COL_CENTER_TYPE,
    COL_COORD_X,
    COL_COORD_Y,
    COL_OWNERSHIP,
    COL_CONCERTED,
    COL_DEPENDENT,
    COL_DISTANCE,
    COL_TIME,
];

// ---------------------------------------------------------------------------
// CenterRecord – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A single educational center (one cleaned row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct CenterRecord {
    pub code: String,
    pub name: String,
    pub address: String,
    pub municipality: String,
    pub province: String,
    pub postal_code: String,
    pub phone: String,
    pub center_type: String,
    pub ownership: String,
    pub concerted: String,
    pub dependent: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Distance to Santiago de Compostela, kilometres.
    pub distance_km: f64,
    /// Travel time to Santiago de Compostela, minutes.
    pub time_min: f64,
    /// Source columns the viewer does not know about, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl CenterRecord {
    /// Text value of a column, addressed by its post-cleaning name.
    ///
    /// Numeric columns are rendered with the shortest representation that
    /// round-trips, so `60.0` shows as `60` and `0.5` as `0.5`.
    pub fn cell(&self, column: &str) -> Option<String> {
        let text = match column {
            COL_CODE => self.code.clone(),
            COL_NAME => self.name.clone(),
            COL_ADDRESS => self.address.clone(),
            COL_MUNICIPALITY => self.municipality.clone(),
            COL_PROVINCE => self.province.clone(),
            COL_POSTAL_CODE => self.postal_code.clone(),
            COL_PHONE => self.phone.clone(),
            COL_CENTER_TYPE => self.center_type.clone(),
            COL_OWNERSHIP => self.ownership.clone(),
            COL_CONCERTED => self.concerted.clone(),
            COL_DEPENDENT => self.dependent.clone(),
            COL_LATITUDE => self.latitude.to_string(),
            COL_LONGITUDE => self.longitude.to_string(),
            COL_DISTANCE => format!("{:.1}", self.distance_km),
            COL_TIME => self.time_min.to_string(),
            other => return self.extra.get(other).cloned(),
        };
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// CleanReport – what the cleaning pass changed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Rows in the raw input.
    pub original_rows: usize,
    /// Rows whose coordinate pair was swapped.
    pub swapped: usize,
    /// Rows removed because a numeric field was missing or implausible.
    pub dropped: usize,
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} swapped, {} dropped",
            self.original_rows, self.swapped, self.dropped
        )
    }
}

// ---------------------------------------------------------------------------
// CenterTable – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset: records in input order plus the column layout.
#[derive(Debug, Clone)]
pub struct CenterTable {
    pub records: Vec<CenterRecord>,
    /// Column names in source order, coordinates already renamed.
    pub columns: Vec<String>,
    pub report: CleanReport,
}

impl CenterTable {
    /// Number of centers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest distance in the table, if any.
    pub fn max_distance(&self) -> Option<f64> {
        self.records.iter().map(|r| r.distance_km).reduce(f64::max)
    }

    /// Largest travel time in the table, if any.
    pub fn max_time(&self) -> Option<f64> {
        self.records.iter().map(|r| r.time_min).reduce(f64::max)
    }
}
