use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use super::model::*;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),

    #[error("no valid centers remain after cleaning ({0})")]
    NoValidRows(CleanReport),
}

// ---------------------------------------------------------------------------
// Swap heuristic
// ---------------------------------------------------------------------------

/// How to decide that a row's `COORDENADA_X` / `COORDENADA_Y` pair was
/// entered the wrong way round.
///
/// Both rules assume data in Galicia: positive latitude, negative longitude.
/// Neither catches a swap where both values still look plausible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapRule {
    /// First value negative and second positive.
    #[default]
    SignPattern,
    /// First value outside ±90 while the second fits inside it.
    Magnitude,
}

impl SwapRule {
    pub fn looks_swapped(self, first: Option<f64>, second: Option<f64>) -> bool {
        let (Some(a), Some(b)) = (first, second) else {
            return false;
        };
        match self {
            SwapRule::SignPattern => a < 0.0 && b > 0.0,
            SwapRule::Magnitude => a.abs() > 90.0 && b.abs() <= 90.0,
        }
    }
}

impl FromStr for SwapRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sign" => Ok(SwapRule::SignPattern),
            "magnitude" => Ok(SwapRule::Magnitude),
            other => Err(format!("unknown swap rule '{other}' (expected 'sign' or 'magnitude')")),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean a comma-separated table with a header row.
///
/// Fails as a whole when the text is not valid CSV, a required column is
/// absent, or no row survives cleaning. Individual bad rows are dropped and
/// counted in the returned table's [`CleanReport`].
pub fn load_bytes(bytes: &[u8], rule: SwapRule) -> Result<CenterTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let index = ColumnIndex::new(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(index.coerce(&record));
    }

    let table = clean(&headers, &index, rows, rule)?;
    log::info!("Loaded {} centers ({})", table.len(), table.report);
    Ok(table)
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Positions of the required columns in the header row.
struct ColumnIndex {
    positions: BTreeMap<&'static str, usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnIndex {
    fn new(headers: &[String]) -> Result<Self, LoadError> {
        let mut positions = BTreeMap::new();
        for column in REQUIRED_COLUMNS {
            let pos = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn(column.to_string()))?;
            positions.insert(column, pos);
        }

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !positions.values().any(|p| p == i))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(Self { positions, extra })
    }

    fn text(&self, record: &csv::StringRecord, column: &str) -> String {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .to_string()
    }

    fn numeric(&self, record: &csv::StringRecord, column: &str) -> Option<f64> {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .and_then(coerce_numeric)
    }

    fn coerce(&self, record: &csv::StringRecord) -> CoercedRow {
        CoercedRow {
            distance: self.numeric(record, COL_DISTANCE),
            time: self.numeric(record, COL_TIME),
            x: self.numeric(record, COL_COORD_X),
            y: self.numeric(record, COL_COORD_Y),
            record: record.clone(),
        }
    }
}

/// A raw row whose numeric columns have been coerced; `None` marks a value
/// that did not parse.
struct CoercedRow {
    record: csv::StringRecord,
    distance: Option<f64>,
    time: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
}

/// Parse a cell as a finite number. Anything else (`ERROR`, blanks, `inf`)
/// counts as missing.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn plausible_latitude(v: f64) -> bool {
    (-90.0..=90.0).contains(&v)
}

fn plausible_longitude(v: f64) -> bool {
    (-180.0..=180.0).contains(&v)
}

// ---------------------------------------------------------------------------
// Cleaning pass
// ---------------------------------------------------------------------------

fn clean(
    headers: &[String],
    index: &ColumnIndex,
    mut rows: Vec<CoercedRow>,
    rule: SwapRule,
) -> Result<CenterTable, LoadError> {
    let mut report = CleanReport {
        original_rows: rows.len(),
        ..CleanReport::default()
    };

    for row in &mut rows {
        if rule.looks_swapped(row.x, row.y) {
            std::mem::swap(&mut row.x, &mut row.y);
            report.swapped += 1;
        }
    }
    if report.swapped > 0 {
        log::warn!("Corrected {} swapped coordinate pairs", report.swapped);
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(distance_km), Some(time_min), Some(latitude), Some(longitude)) =
            (row.distance, row.time, row.x, row.y)
        else {
            continue;
        };
        if !plausible_latitude(latitude) || !plausible_longitude(longitude) {
            continue;
        }

        let r = &row.record;
        records.push(CenterRecord {
            code: index.text(r, COL_CODE),
            name: index.text(r, COL_NAME),
            address: index.text(r, COL_ADDRESS),
            municipality: index.text(r, COL_MUNICIPALITY),
            province: index.text(r, COL_PROVINCE),
            postal_code: index.text(r, COL_POSTAL_CODE),
            phone: index.text(r, COL_PHONE),
            center_type: index.text(r, COL_CENTER_TYPE),
            ownership: index.text(r, COL_OWNERSHIP),
            concerted: index.text(r, COL_CONCERTED),
            dependent: index.text(r, COL_DEPENDENT),
            latitude,
            longitude,
            distance_km,
            time_min,
            extra: index
                .extra
                .iter()
                .map(|(i, name)| (name.clone(), r.get(*i).unwrap_or("").to_string()))
                .collect(),
        });
    }

    report.dropped = report.original_rows - records.len();
    if report.dropped > 0 {
        log::warn!(
            "Dropped {} rows with invalid distance, time or coordinates",
            report.dropped
        );
    }

    if records.is_empty() {
        return Err(LoadError::NoValidRows(report));
    }

    let columns = headers
        .iter()
        .map(|h| match h.as_str() {
            COL_COORD_X => COL_LATITUDE.to_string(),
            COL_COORD_Y => COL_LONGITUDE.to_string(),
            _ => h.clone(),
        })
        .collect();

    Ok(CenterTable {
        records,
        columns,
        report,
    })
}
