//! # Buoy Observation Extraction
//!
//! Reduces an NDBC buoy payload to a single [`BuoyObservation`].
//!
//! ## Supported Payloads
//!
//! ### Columnar text (`realtime2/<station>.txt`, `.spec`)
//! ```text
//! #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES ...
//! #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa ...
//! 2026 10 19 14 40  90  7.0  9.0    MM    MM    MM  MM 1015.3 ...
//! ```
//! The first `#` line names the columns and an optional second `#` line
//! declares their units. Rows are sorted newest first by their own timestamp
//! and the first row with a usable `WVHT` wins, skipping missing-data gaps.
//!
//! ### Station page (`station_page.php?station=<id>`)
//! The table whose header mentions `WVHT` is preferred over one that only
//! mentions it in body text. Header cells may carry a unit suffix
//! (`WVHT ft`, `SwH (m)`). The first data row is the reading.
//!
//! ## Column Resolution
//! Columns are always looked up by name in the parsed header. If the header or
//! the primary height column cannot be found, the whole reading is the
//! all-missing default. Individual fields degrade on their own: a bad period
//! cell never affects the height.
//!
//! | Field | Columns, in preference order |
//! |---|---|
//! | significant height | `WVHT` |
//! | swell height | `SwH`, else equal to significant height |
//! | swell period | `SwP`, `DPD` |
//! | swell direction | `SwD`, `MWD` (degrees or compass points) |

use crate::{BuoyObservation, HeightUnit, Measurement, SourceFormat};
use chrono::{DateTime, NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};
use std::cmp::Reverse;
use thiserror::Error;
use tracing::{debug, warn};

/// Tokens NDBC uses for "no observation".
const MISSING_TOKENS: &[&str] = &["MM", "-", "--", "N/A", "NA"];

/// Numeric "no observation" markers older NDBC formats use, per column kind.
const HEIGHT_PLACEHOLDERS: &[f32] = &[99.0];
const PERIOD_PLACEHOLDERS: &[f32] = &[99.0];
const DIRECTION_PLACEHOLDERS: &[f32] = &[999.0];

const SIGNIFICANT_HEIGHT: &[&str] = &["WVHT"];
const SWELL_HEIGHT: &[&str] = &["SwH"];
const SWELL_PERIOD: &[&str] = &["SwP", "DPD"];
const SWELL_DIRECTION: &[&str] = &["SwD", "MWD"];

/// NDBC documents wave heights in meters unless a unit says otherwise.
const DOCUMENTED_HEIGHT_UNIT: HeightUnit = HeightUnit::Meters;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Structural failures that abort a whole extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ObservationError {
    #[error("header row not found")]
    NoHeader,

    #[error("no table mentions the {0} column")]
    NoTable(&'static str),

    #[error("header has no {0} column")]
    MissingColumn(&'static str),

    #[error("no data rows under the header")]
    NoRows,

    #[error("no row has a usable {0} value")]
    NoValidRow(&'static str),
}

/// Per-field failures; the field becomes missing, its siblings are unaffected.
#[derive(Error, Debug, PartialEq)]
pub enum FieldError {
    #[error("column not in header")]
    NoColumn,

    #[error("row has no cell {0}")]
    NoCell(usize),

    #[error("missing-value token {0:?}")]
    Missing(String),

    #[error("not numeric: {0:?}")]
    NotNumeric(String),

    #[error("out of range: {0}")]
    OutOfRange(f32),
}

/// Extract the latest valid buoy reading.
///
/// Never fails: structural mismatches yield the all-missing
/// [`BuoyObservation::default`], field-level problems leave only that field
/// missing.
///
/// # Example
/// ```
/// use wave_card_lib::{observation, SourceFormat};
///
/// let feed = "#YY MM DD hh mm WVHT DPD MWD\n#yr mo dy hr mn m sec degT\n2026 10 19 14 10 1.5 9 85\n";
/// let reading = observation::extract(feed, SourceFormat::ColumnarText);
/// assert_eq!(reading.significant_height.unwrap().to_string(), "4.9 ft");
///
/// let nothing = observation::extract("<html></html>", SourceFormat::HtmlTable);
/// assert!(nothing.is_empty());
/// ```
pub fn extract(raw_payload: &str, format: SourceFormat) -> BuoyObservation {
    let result = match format {
        SourceFormat::ColumnarText => parse_columnar(raw_payload),
        SourceFormat::HtmlTable => parse_html_table(raw_payload),
    };
    result.unwrap_or_else(|e| {
        warn!(error = %e, ?format, "Buoy observation degraded to missing values");
        BuoyObservation::default()
    })
}

/// Parse a whitespace-delimited NDBC feed.
pub fn parse_columnar(text: &str) -> Result<BuoyObservation, ObservationError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let header_pos = lines
        .iter()
        .position(|l| l.starts_with('#'))
        .ok_or(ObservationError::NoHeader)?;

    let names: Vec<&str> = lines[header_pos]
        .trim_start_matches('#')
        .split_whitespace()
        .collect();
    let units: Vec<&str> = match lines.get(header_pos + 1) {
        Some(l) if l.starts_with('#') => l.trim_start_matches('#').split_whitespace().collect(),
        _ => Vec::new(),
    };
    let header = Header::from_columns(&names, &units);
    let primary = header
        .resolve(SIGNIFICANT_HEIGHT)
        .ok_or(ObservationError::MissingColumn("WVHT"))?;

    let rows: Vec<Vec<&str>> = lines[header_pos + 1..]
        .iter()
        .filter(|l| !l.starts_with('#'))
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .filter(|row| row.len() >= header.len())
        .collect();
    if rows.is_empty() {
        return Err(ObservationError::NoRows);
    }

    let time_columns = TimeColumns::locate(&header);
    let mut candidates: Vec<(Option<DateTime<Utc>>, Vec<&str>)> = rows
        .into_iter()
        .map(|row| {
            let observed_at = time_columns.as_ref().and_then(|t| t.timestamp(&row));
            (observed_at, row)
        })
        .collect();

    if candidates.iter().any(|(ts, _)| ts.is_some()) {
        let before = candidates.len();
        candidates.retain(|(ts, _)| ts.is_some());
        if candidates.len() < before {
            debug!(dropped = before - candidates.len(), "Rows with unparseable timestamps dropped");
        }
        // Stable sort keeps source order among equal timestamps
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
    }

    let (observed_at, row) = candidates
        .iter()
        .find(|(_, row)| height(row, Some(primary)).is_ok())
        .ok_or(ObservationError::NoValidRow("WVHT"))?;

    Ok(observation_from_row(&header, row, *observed_at))
}

/// Parse an NDBC station page and read its wave table.
pub fn parse_html_table(html: &str) -> Result<BuoyObservation, ObservationError> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("CSS selector should be valid");

    let table = doc
        .select(&table_sel)
        .filter_map(|table| {
            let score = table_score(table);
            (score > 0).then_some((score, table))
        })
        // min_by_key keeps the first table among equal scores
        .min_by_key(|(score, _)| Reverse(*score))
        .map(|(_, table)| table)
        .ok_or(ObservationError::NoTable("WVHT"))?;

    let rows = table_rows(table);
    let header_pos = rows
        .iter()
        .position(|r| r.is_header)
        .or_else(|| rows.iter().position(|r| !r.cells.is_empty()))
        .ok_or(ObservationError::NoHeader)?;

    let labels: Vec<&str> = rows[header_pos].cells.iter().map(String::as_str).collect();
    let header = Header::from_labels(&labels);
    if header.resolve(SIGNIFICANT_HEIGHT).is_none() {
        return Err(ObservationError::MissingColumn("WVHT"));
    }

    let data = rows[header_pos + 1..]
        .iter()
        .find(|r| !r.is_header && !r.cells.is_empty())
        .ok_or(ObservationError::NoRows)?;
    let row: Vec<&str> = data.cells.iter().map(String::as_str).collect();

    let observed_at = TimeColumns::locate(&header).and_then(|t| t.timestamp(&row));
    Ok(observation_from_row(&header, &row, observed_at))
}

/// 16-point compass name for a direction in degrees.
pub fn compass_point(degrees: f32) -> &'static str {
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

fn observation_from_row(
    header: &Header,
    row: &[&str],
    observed_at: Option<DateTime<Utc>>,
) -> BuoyObservation {
    let significant_height = field(
        "significant height",
        height(row, header.resolve(SIGNIFICANT_HEIGHT)),
    );
    // Feeds with one combined height column report it as the swell height too
    let swell_height = match header.resolve(SWELL_HEIGHT) {
        Some(column) => field("swell height", height(row, Some(column))),
        None => significant_height,
    };

    BuoyObservation {
        significant_height,
        swell_height,
        swell_period_s: field("swell period", period(row, header.resolve(SWELL_PERIOD))),
        swell_direction_deg: field(
            "swell direction",
            direction(row, header.resolve(SWELL_DIRECTION)),
        ),
        observed_at,
    }
}

fn field<T>(name: &'static str, result: Result<T, FieldError>) -> Option<T> {
    result
        .map_err(|e| debug!(field = name, error = %e, "Field degraded to missing"))
        .ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Column {
    index: usize,
    unit: Option<HeightUnit>,
}

#[derive(Debug)]
struct HeaderCell {
    /// Cell text as written, for case-sensitive lookups (`MM` vs `mm`)
    raw: String,
    /// Lowercased alphanumeric words of the cell
    words: Vec<String>,
    unit: Option<HeightUnit>,
}

#[derive(Debug)]
struct Header {
    cells: Vec<HeaderCell>,
}

impl Header {
    /// Columnar header: one name per column, units from the optional units row.
    fn from_columns(names: &[&str], units: &[&str]) -> Self {
        let cells = names
            .iter()
            .enumerate()
            .map(|(i, name)| HeaderCell {
                raw: name.to_string(),
                words: vec![name.to_ascii_lowercase()],
                unit: units.get(i).and_then(|u| unit_from_word(u)),
            })
            .collect();
        Self { cells }
    }

    /// Table header: free text cells such as "WVHT ft" or "Swell Height (SwH) m".
    fn from_labels(labels: &[&str]) -> Self {
        let cells = labels
            .iter()
            .map(|label| {
                let words: Vec<String> = label
                    .split(|c: char| !c.is_ascii_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .map(str::to_ascii_lowercase)
                    .collect();
                let unit = words.iter().find_map(|w| unit_from_word(w));
                HeaderCell {
                    raw: label.trim().to_string(),
                    words,
                    unit,
                }
            })
            .collect();
        Self { cells }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    /// First of `names` present in the header, matched case-insensitively.
    fn resolve(&self, names: &[&str]) -> Option<Column> {
        names.iter().find_map(|name| {
            let name = name.to_ascii_lowercase();
            self.cells
                .iter()
                .position(|cell| cell.words.iter().any(|w| *w == name))
                .map(|index| Column {
                    index,
                    unit: self.cells[index].unit,
                })
        })
    }

    fn position_exact(&self, names: &[&str]) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| names.contains(&cell.raw.as_str()))
    }
}

fn unit_from_word(word: &str) -> Option<HeightUnit> {
    match word.to_ascii_lowercase().as_str() {
        "ft" | "feet" => Some(HeightUnit::Feet),
        "m" | "meters" | "metres" => Some(HeightUnit::Meters),
        _ => None,
    }
}

/// Year/month/day/hour/minute column positions; minute defaults to 0.
#[derive(Debug)]
struct TimeColumns {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    minute: Option<usize>,
}

impl TimeColumns {
    fn locate(header: &Header) -> Option<Self> {
        Some(Self {
            year: header.position_exact(&["YY", "YYYY"])?,
            month: header.position_exact(&["MM"])?,
            day: header.position_exact(&["DD"])?,
            hour: header.position_exact(&["hh"])?,
            minute: header.position_exact(&["mm"]),
        })
    }

    fn timestamp(&self, row: &[&str]) -> Option<DateTime<Utc>> {
        let int = |i: usize| row.get(i).and_then(|t| t.parse::<u32>().ok());
        let mut year = int(self.year)? as i32;
        if year < 100 {
            year += 2000;
        }
        let minute = match self.minute {
            Some(i) => int(i)?,
            None => 0,
        };
        NaiveDate::from_ymd_opt(year, int(self.month)?, int(self.day)?)?
            .and_hms_opt(int(self.hour)?, minute, 0)
            .map(|naive| naive.and_utc())
    }
}

fn cell<'a>(row: &[&'a str], column: Option<Column>) -> Result<&'a str, FieldError> {
    let column = column.ok_or(FieldError::NoColumn)?;
    row.get(column.index)
        .copied()
        .ok_or(FieldError::NoCell(column.index))
}

/// Parse a cell, treating missing tokens and the column's `placeholders` as missing.
fn numeric(token: &str, placeholders: &[f32]) -> Result<f32, FieldError> {
    let token = token.trim();
    if token.is_empty() || MISSING_TOKENS.iter().any(|m| m.eq_ignore_ascii_case(token)) {
        return Err(FieldError::Missing(token.to_string()));
    }
    let value: f32 = token
        .parse()
        .map_err(|_| FieldError::NotNumeric(token.to_string()))?;
    if !value.is_finite() {
        return Err(FieldError::NotNumeric(token.to_string()));
    }
    if placeholders.contains(&value) {
        return Err(FieldError::Missing(token.to_string()));
    }
    Ok(value)
}

/// Height in feet; meters are converted only when the column is defined in meters.
fn height(row: &[&str], column: Option<Column>) -> Result<Measurement, FieldError> {
    let value = numeric(cell(row, column)?, HEIGHT_PLACEHOLDERS)?;
    if value < 0.0 {
        return Err(FieldError::OutOfRange(value));
    }
    let unit = column
        .and_then(|c| c.unit)
        .unwrap_or(DOCUMENTED_HEIGHT_UNIT);
    Ok(Measurement::new(value, unit).in_feet())
}

fn period(row: &[&str], column: Option<Column>) -> Result<f32, FieldError> {
    let value = numeric(cell(row, column)?, PERIOD_PLACEHOLDERS)?;
    if value <= 0.0 {
        return Err(FieldError::OutOfRange(value));
    }
    Ok(value)
}

fn direction(row: &[&str], column: Option<Column>) -> Result<f32, FieldError> {
    match numeric(cell(row, column)?, DIRECTION_PLACEHOLDERS) {
        Ok(value) if (0.0..=360.0).contains(&value) => Ok(value),
        Ok(value) => Err(FieldError::OutOfRange(value)),
        Err(FieldError::NotNumeric(token)) => COMPASS_POINTS
            .iter()
            .position(|p| p.eq_ignore_ascii_case(&token))
            .map(|i| i as f32 * 22.5)
            .ok_or(FieldError::NotNumeric(token)),
        Err(e) => Err(e),
    }
}

struct TableRow {
    cells: Vec<String>,
    /// Only `th` cells
    is_header: bool,
}

fn table_rows(table: ElementRef<'_>) -> Vec<TableRow> {
    let row_sel = Selector::parse("tr").expect("CSS selector should be valid");
    let cell_sel = Selector::parse("th, td").expect("CSS selector should be valid");

    table
        .select(&row_sel)
        .map(|tr| {
            let mut th = 0;
            let mut td = 0;
            let cells = tr
                .select(&cell_sel)
                .map(|c| {
                    if c.value().name() == "th" {
                        th += 1;
                    } else {
                        td += 1;
                    }
                    cell_text(c)
                })
                .collect();
            TableRow {
                cells,
                is_header: th > 0 && td == 0,
            }
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 2 = header row names the primary column, 1 = only body text does, 0 = neither.
fn table_score(table: ElementRef<'_>) -> u8 {
    let rows = table_rows(table);
    let header = rows
        .iter()
        .find(|r| r.is_header)
        .or_else(|| rows.first());
    if let Some(header) = header {
        let labels: Vec<&str> = header.cells.iter().map(String::as_str).collect();
        if Header::from_labels(&labels)
            .resolve(SIGNIFICANT_HEIGHT)
            .is_some()
        {
            return 2;
        }
    }
    let text = cell_text(table).to_ascii_uppercase();
    if SIGNIFICANT_HEIGHT.iter().any(|name| text.contains(name)) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const REALTIME: &str = "\
#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
2026 10 19 14 40  90  7.0  9.0    MM    MM    MM  MM 1015.3  26.6  27.0  21.3   MM   MM    MM
2026 10 19 14 10  90  7.0  9.0   1.5     9   6.2  85 1015.3  26.6  27.0  21.3   MM   MM    MM
2026 10 19 13 40 100  6.0  8.0   1.4     8   6.0  80 1015.1  26.4  27.0  21.2   MM   MM    MM
";

    const SPECTRAL: &str = "\
#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
2026 10 19 14 40  1.6  1.4  9.1  0.6  4.0 ESE   E    AVERAGE  6.1 103
";

    const STATION_PAGE: &str = r#"
<html><body>
<table><tr><td>Station 41043 - NE Puerto Rico</td></tr>
<tr><td>Recent WVHT observations are shown below</td></tr></table>
<table class="dataTable">
<tr><th>MM</th><th>DD</th><th>TIME (AST)</th><th>WVHT ft</th><th>SwH ft</th><th>SwP sec</th><th>SwD</th><th>WWH ft</th></tr>
<tr><td>10</td><td>19</td><td>10:40 am</td><td>5.2</td><td>4.6</td><td>9.1</td><td>ESE</td><td>2.0</td></tr>
<tr><td>10</td><td>19</td><td>9:40 am</td><td>5.0</td><td>4.3</td><td>9.1</td><td>E</td><td>2.0</td></tr>
</table></body></html>
"#;

    fn feet(m: Option<Measurement>) -> f32 {
        let m = m.expect("height should be present");
        assert_eq!(m.unit, HeightUnit::Feet);
        m.value
    }

    #[test]
    fn test_skips_missing_most_recent_row() {
        let obs = parse_columnar(REALTIME).unwrap();
        assert!((feet(obs.significant_height) - 4.9).abs() < 1e-4);
        assert_eq!(obs.swell_period_s, Some(9.0));
        assert_eq!(obs.swell_direction_deg, Some(85.0));
        assert_eq!(
            obs.observed_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 14, 10, 0).unwrap())
        );
    }

    #[test]
    fn test_single_height_column_is_swell_height() {
        let obs = parse_columnar(REALTIME).unwrap();
        assert_eq!(obs.swell_height, obs.significant_height);
    }

    #[test]
    fn test_feet_column_is_not_converted() {
        let feed = "#YY MM DD hh mm WVHT DPD\n#yr mo dy hr mn ft sec\n2026 10 19 14 10 1.5 9\n";
        let obs = parse_columnar(feed).unwrap();
        assert_eq!(obs.significant_height, Some(Measurement::new(1.5, HeightUnit::Feet)));
    }

    #[test]
    fn test_meters_assumed_without_units_row() {
        let feed = "#YY MM DD hh mm WVHT\n2026 10 19 14 10 1.5\n";
        let obs = parse_columnar(feed).unwrap();
        assert!((feet(obs.significant_height) - 4.9).abs() < 1e-4);
    }

    #[test]
    fn test_rows_sorted_by_timestamp_not_source_order() {
        let feed = "\
#YY MM DD hh mm WVHT DPD MWD
#yr mo dy hr mn m sec degT
2026 10 19 12 10 1.0 7 70
2026 10 19 14 10 2.0 9 90
2026 10 19 13 10 1.5 8 80
";
        let obs = parse_columnar(feed).unwrap();
        assert_eq!(obs.swell_period_s, Some(9.0));
        assert_eq!(
            obs.observed_at,
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 14, 10, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_timestamps_are_dropped() {
        let feed = "\
#YY MM DD hh mm WVHT
2026 10 xx 15 10 3.0
2026 10 19 14 10 1.0
";
        let obs = parse_columnar(feed).unwrap();
        assert!((feet(obs.significant_height) - 3.3).abs() < 1e-4);
    }

    #[test]
    fn test_source_order_without_time_columns() {
        let feed = "#WVHT DPD\n#m sec\nMM 10\n1.0 7\n2.0 9\n";
        let obs = parse_columnar(feed).unwrap();
        assert!((feet(obs.significant_height) - 3.3).abs() < 1e-4);
        assert_eq!(obs.observed_at, None);
    }

    #[test]
    fn test_short_rows_and_placeholders_skipped() {
        let feed = "\
#YY MM DD hh mm WVHT DPD MWD
2026 10 19 15 10 2.0
2026 10 19 14 40 99.00 99.00 999
2026 10 19 14 10 1.0 7 999
";
        let obs = parse_columnar(feed).unwrap();
        assert!((feet(obs.significant_height) - 3.3).abs() < 1e-4);
        assert_eq!(obs.swell_period_s, Some(7.0));
        // Placeholder direction is missing, siblings unaffected
        assert_eq!(obs.swell_direction_deg, None);
    }

    #[test]
    fn test_placeholders_are_per_column() {
        let feed = "#YY MM DD hh mm WVHT DPD MWD\n#yr mo dy hr mn m sec degT\n2026 10 19 14 10 1.5 9 99\n";
        let obs = parse_columnar(feed).unwrap();
        // 99 degrees is a real easterly direction; only 999 marks it missing
        assert_eq!(obs.swell_direction_deg, Some(99.0));

        let feed = "#YY MM DD hh mm WVHT DPD MWD\n2026 10 19 14 10 1.5 99 999\n";
        let obs = parse_columnar(feed).unwrap();
        assert_eq!(obs.swell_period_s, None);
        assert_eq!(obs.swell_direction_deg, None);
        assert!(obs.significant_height.is_some());
    }

    #[test]
    fn test_spectral_summary_columns() {
        let obs = parse_columnar(SPECTRAL).unwrap();
        assert!((feet(obs.significant_height) - 5.2).abs() < 1e-4);
        assert!((feet(obs.swell_height) - 4.6).abs() < 1e-4);
        assert_eq!(obs.swell_period_s, Some(9.1));
        // SwD is preferred over MWD and given as a compass point
        assert_eq!(obs.swell_direction_deg, Some(112.5));
    }

    #[test]
    fn test_structural_failures() {
        assert_eq!(parse_columnar(""), Err(ObservationError::NoHeader));
        assert_eq!(
            parse_columnar("#YY MM DD hh mm DPD\n2026 10 19 14 10 9\n"),
            Err(ObservationError::MissingColumn("WVHT"))
        );
        assert_eq!(
            parse_columnar("#YY MM DD hh mm WVHT\n2026 10\n"),
            Err(ObservationError::NoRows)
        );
        assert_eq!(
            parse_columnar("#YY MM DD hh mm WVHT\n2026 10 19 14 10 MM\n"),
            Err(ObservationError::NoValidRow("WVHT"))
        );
    }

    #[test]
    fn test_station_page_prefers_header_match() {
        let obs = parse_html_table(STATION_PAGE).unwrap();
        assert_eq!(obs.significant_height, Some(Measurement::new(5.2, HeightUnit::Feet)));
        assert_eq!(obs.swell_height, Some(Measurement::new(4.6, HeightUnit::Feet)));
        assert_eq!(obs.swell_period_s, Some(9.1));
        assert_eq!(obs.swell_direction_deg, Some(112.5));
        assert_eq!(obs.observed_at, None);
    }

    #[test]
    fn test_station_page_metric_header() {
        let html = "<table><tr><th>Wave Height (WVHT) m</th><th>DPD sec</th></tr>\
                    <tr><td>1.5</td><td>8</td></tr></table>";
        let obs = parse_html_table(html).unwrap();
        assert!((feet(obs.significant_height) - 4.9).abs() < 1e-4);
        assert_eq!(obs.swell_period_s, Some(8.0));
    }

    #[test]
    fn test_station_page_first_row_missing_values() {
        let html = "<table><tr><th>WVHT ft</th><th>SwP sec</th><th>SwD</th></tr>\
                    <tr><td>MM</td><td>10</td><td>-</td></tr>\
                    <tr><td>4.0</td><td>9</td><td>E</td></tr></table>";
        let obs = parse_html_table(html).unwrap();
        assert_eq!(obs.significant_height, None);
        assert_eq!(obs.swell_height, None);
        assert_eq!(obs.swell_period_s, Some(10.0));
        assert_eq!(obs.swell_direction_deg, None);
    }

    #[test]
    fn test_station_page_short_row() {
        let html = "<table><tr><th>WVHT ft</th><th>SwP sec</th><th>SwD</th></tr>\
                    <tr><td>4.0</td></tr></table>";
        let obs = parse_html_table(html).unwrap();
        assert_eq!(obs.significant_height, Some(Measurement::new(4.0, HeightUnit::Feet)));
        assert_eq!(obs.swell_period_s, None);
        assert_eq!(obs.swell_direction_deg, None);
    }

    #[test]
    fn test_station_page_without_expected_header() {
        let html = "<table><tr><th>Date</th><th>Notes</th></tr>\
                    <tr><td>10/19</td><td>WVHT sensor offline</td></tr></table>";
        assert_eq!(
            parse_html_table(html),
            Err(ObservationError::MissingColumn("WVHT"))
        );
        assert_eq!(
            parse_html_table("<p>no tables</p>"),
            Err(ObservationError::NoTable("WVHT"))
        );
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(numeric("MM", &[]), Err(FieldError::Missing("MM".to_string())));
        assert_eq!(numeric("", &[]), Err(FieldError::Missing(String::new())));
        assert_eq!(numeric("NaN", &[]), Err(FieldError::NotNumeric("NaN".to_string())));
        assert_eq!(numeric("inf", &[]), Err(FieldError::NotNumeric("inf".to_string())));
        assert_eq!(
            numeric("99.00", HEIGHT_PLACEHOLDERS),
            Err(FieldError::Missing("99.00".to_string()))
        );
        assert_eq!(numeric("99.00", DIRECTION_PLACEHOLDERS), Ok(99.0));
        assert_eq!(numeric(" 2.5 ", &[]), Ok(2.5));
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(112.5), "ESE");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(85.0), "E");
    }

    #[test]
    fn test_extract_is_total() {
        let inputs = [
            "",
            "#",
            "garbage\nmore garbage",
            "<table><tr><td>WVHT</td></tr></table>",
            "<table><tr><th>WVHT</th></tr></table>",
            "#YY MM DD hh mm WVHT\n9999 99 99 99 99 1.0\n",
        ];
        for input in inputs {
            for format in [SourceFormat::ColumnarText, SourceFormat::HtmlTable] {
                let obs = extract(input, format);
                for height in [obs.significant_height, obs.swell_height].into_iter().flatten() {
                    assert!(height.value.is_finite());
                }
            }
        }
    }
}
