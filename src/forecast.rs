//! # Marine Zone Forecast Extraction
//!
//! Turns an offshore/coastal waters bulletin into an ordered list of
//! [`ForecastPeriod`]s for one zone.
//!
//! ## Bulletin Shape
//!
//! ```text
//! AMZ726-191530-
//! Coastal Waters of Southern USVI, Vieques, and Culebra-
//! .TODAY...E winds 15 to 20 kt. Seas 4 to 6 feet.
//! Wave Detail: E 5 ft at 8 seconds.
//! .TONIGHT...E winds 15 kt. Seas 3 to 5 ft.
//! $$
//! AMZ733-191530-
//! ```
//!
//! ## Pipeline
//! 1. **Locate** the zone block: from the zone marker to the next zone code or `$$`
//! 2. **Normalize** "feet"/"foot" to "ft"
//! 3. **Segment** lines into periods on label lines (`TODAY`, `TONIGHT`, weekdays, ...)
//! 4. **Cap** the period count; later periods are dropped
//! 5. **Summarize** each period: wave detail → height range → point height with
//!    period → truncated excerpt. Periods with no wave content are omitted.
//!
//! A bare point height is widened to a ±1 ft range ("5 ft ... 8 sec" becomes
//! "4–6 ft @ 8s") because the bulletin's point value is itself approximate.

use crate::ForecastPeriod;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of forecast periods kept.
pub const DEFAULT_MAX_PERIODS: usize = 6;

/// Maximum length of the last-resort excerpt summary.
const EXCERPT_CHARS: usize = 60;

/// Label the "rest of tonight" remainder period is reported under.
const OVERNIGHT_LABEL: &str = "TONIGHT";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ForecastError {
    /// The bulletin does not mention the zone at all
    #[error("zone marker {0} not found in bulletin")]
    ZoneNotFound(String),

    /// The zone block exists but contains no period labels
    #[error("no forecast periods in block for zone {0}")]
    NoPeriods(String),
}

/// Next zone header, e.g. "AMZ733"
static ZONE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2}Z\d{3}\b").expect("static regex must compile"));

static FEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:feet|foot)\b").expect("static regex must compile"));

/// Period label at line start, optionally dot-prefixed, followed by a `...` or
/// `:` separator and inline text, or by nothing at all.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\.?\s*(",
        r"REST\s+OF\s+(?:TODAY|TONIGHT)",
        r"|THIS\s+(?:AFTERNOON|EVENING)",
        r"|TODAY|TONIGHT|TOMORROW(?:\s+NIGHT)?",
        r"|(?:MON(?:DAY)?|TUE(?:SDAY)?|WED(?:NESDAY)?|THU(?:RSDAY)?|FRI(?:DAY)?|SAT(?:URDAY)?|SUN(?:DAY)?)(?:\s+NIGHT)?",
        r")\s*(?:(?:\.\.\.|:)\s*(.*))?$"
    ))
    .expect("static regex must compile")
});

static WAVE_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wave\s+detail\s*:?\s*((?:\d\.\d|[^.])+)").expect("static regex must compile")
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(seas|waves|swells?)\s+)?(\d+)\s*(?:to|-|–)\s*(\d+)\s*ft\b(?:[^.]*?\b(\d+)\s*sec)?",
    )
    .expect("static regex must compile")
});

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*ft\b.*?\b(\d+)\s*sec").expect("static regex must compile")
});

static WAVE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:seas|waves?|swells?|ft)\b").expect("static regex must compile")
});

/// Extract forecast periods for `zone_marker` with the default period cap.
///
/// Never fails: structural problems are logged and yield an empty list, which
/// the report layer replaces with the fallback text.
///
/// # Example
/// ```
/// use wave_card_lib::forecast;
///
/// let bulletin = "AMZ726-191530-\nTODAY\nSeas 3 to 5 feet.\n$$";
/// let periods = forecast::extract(bulletin, "AMZ726");
/// assert_eq!(periods[0].to_line(), "TODAY: Seas 3–5 ft");
///
/// assert!(forecast::extract("", "AMZ726").is_empty());
/// ```
pub fn extract(raw_bulletin: &str, zone_marker: &str) -> Vec<ForecastPeriod> {
    extract_with_cap(raw_bulletin, zone_marker, DEFAULT_MAX_PERIODS)
}

/// Extract forecast periods keeping at most `max_periods` of them.
pub fn extract_with_cap(
    raw_bulletin: &str,
    zone_marker: &str,
    max_periods: usize,
) -> Vec<ForecastPeriod> {
    match try_extract(raw_bulletin, zone_marker, max_periods) {
        Ok(periods) => periods,
        Err(e) => {
            warn!(error = %e, "Forecast extraction degraded to fallback");
            Vec::new()
        }
    }
}

/// Fallible form of [`extract_with_cap`].
pub fn try_extract(
    raw_bulletin: &str,
    zone_marker: &str,
    max_periods: usize,
) -> Result<Vec<ForecastPeriod>, ForecastError> {
    let text = bulletin_text(raw_bulletin);
    let block = zone_block(&text, zone_marker)
        .ok_or_else(|| ForecastError::ZoneNotFound(zone_marker.to_string()))?;
    let block = normalize_units(block);

    let mut segments = segment(&block);
    if segments.is_empty() {
        return Err(ForecastError::NoPeriods(zone_marker.to_string()));
    }
    segments.truncate(max_periods);

    let periods = segments
        .into_iter()
        .filter_map(|(label, text)| match summarize(&text) {
            Some(summary) => Some(ForecastPeriod::new(label, summary)),
            None => {
                debug!(label = %label, "Period has no wave content, omitted");
                None
            }
        })
        .collect::<Vec<_>>();

    debug!(zone = zone_marker, count = periods.len(), "Extracted forecast periods");
    Ok(periods)
}

/// Plain bulletin text; markup payloads are reduced to their text nodes.
pub fn bulletin_text(raw: &str) -> String {
    if !looks_like_markup(raw) {
        return raw.to_string();
    }
    let doc = Html::parse_document(raw);
    doc.root_element().text().collect::<Vec<_>>().join("\n")
}

fn looks_like_markup(raw: &str) -> bool {
    let head = raw.trim_start();
    if head.starts_with('<') {
        return true;
    }
    let lower = raw.to_ascii_lowercase();
    ["<html", "<body", "<pre"].iter().any(|tag| lower.contains(tag))
}

/// Text from the zone marker up to the next zone code, `$$`, or end of text.
fn zone_block<'a>(text: &'a str, zone_marker: &str) -> Option<&'a str> {
    let zone_marker = zone_marker.trim();
    if zone_marker.is_empty() {
        return None;
    }
    let start = text.find(zone_marker)?;
    let body_start = start + zone_marker.len();
    let rest = &text[body_start..];

    let mut end = rest.len();
    if let Some(next_zone) = ZONE_CODE_RE.find(rest) {
        end = end.min(next_zone.start());
    }
    if let Some(terminator) = rest.find("$$") {
        end = end.min(terminator);
    }
    Some(&text[start..body_start + end])
}

fn normalize_units(text: &str) -> String {
    FEET_RE.replace_all(text, "ft").into_owned()
}

/// Split a zone block into `(label, joined text)` pairs in bulletin order.
///
/// Text before the first label is not a period and is dropped.
fn segment(block: &str) -> Vec<(String, String)> {
    let mut periods = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = LABEL_RE.captures(line) {
            if let Some((label, parts)) = current.take() {
                periods.push((label, parts.join(" ")));
            }
            let label = canonical_label(&caps[1]);
            let mut parts = Vec::new();
            if let Some(inline) = caps.get(2).map(|m| m.as_str().trim()) {
                if !inline.is_empty() {
                    parts.push(inline);
                }
            }
            current = Some((label, parts));
        } else if let Some((_, parts)) = current.as_mut() {
            parts.push(line);
        }
    }

    if let Some((label, parts)) = current {
        periods.push((label, parts.join(" ")));
    }
    periods
}

/// Uppercase, single-spaced label with the overnight remainder folded into
/// its parent period name.
fn canonical_label(raw: &str) -> String {
    let label = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    match label.as_str() {
        "REST OF TONIGHT" => OVERNIGHT_LABEL.to_string(),
        "REST OF TODAY" => "TODAY".to_string(),
        _ => label,
    }
}

/// First matching rule wins; `None` means the period has no wave content.
fn summarize(text: &str) -> Option<String> {
    wave_detail(text)
        .or_else(|| height_range(text))
        .or_else(|| point_height(text))
        .or_else(|| excerpt(text))
}

fn wave_detail(text: &str) -> Option<String> {
    let caps = WAVE_DETAIL_RE.captures(text)?;
    let detail = caps[1].trim().trim_end_matches([',', ';']).trim();
    (!detail.is_empty()).then(|| detail.to_string())
}

fn height_range(text: &str) -> Option<String> {
    let caps = RANGE_RE.captures(text)?;
    let low: u32 = caps[2].parse().ok()?;
    let high: u32 = caps[3].parse().ok()?;
    if low > high {
        return None;
    }

    let mut summary = match caps.get(1) {
        Some(noun) => format!("{} {low}–{high} ft", title_case(noun.as_str())),
        None => format!("{low}–{high} ft"),
    };
    if let Some(period) = caps.get(4) {
        summary.push_str(&format!(" @ {}s", period.as_str()));
    }
    Some(summary)
}

/// "N ft ... P sec" widened to "(N-1)–(N+1) ft @ Ps", floored at 0.
fn point_height(text: &str) -> Option<String> {
    let caps = POINT_RE.captures(text)?;
    let height: u32 = caps[1].parse().ok()?;
    let period: u32 = caps[2].parse().ok()?;
    let upper = height.checked_add(1)?;
    Some(format!("{}–{upper} ft @ {period}s", height.saturating_sub(1)))
}

fn excerpt(text: &str) -> Option<String> {
    if !WAVE_WORD_RE.is_match(text) {
        return None;
    }
    if text.chars().count() <= EXCERPT_CHARS {
        return Some(text.to_string());
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    Some(format!("{}...", cut.trim_end()))
}

fn title_case(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
