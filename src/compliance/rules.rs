//! Compliance rules as ordered pure predicates.
//!
//! Each rule inspects one new batch row against an indexed view of the
//! historical reference set and returns a violation or nothing. Rules are
//! evaluated in a fixed order and the first violation determines the cited
//! reason, so the rule list is independently testable without any external
//! inference call.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::{BatchRow, HistoricalRow};

/// Historical status that forces every future batch of a product into review.
pub const STATUS_RECALLED: &str = "Recalled";

/// Historical statuses that make a (product, location) pair a flagged
/// precedent for future batches.
pub const FLAGGED_PRECEDENT_STATUSES: &[&str] = &["Flagged-Temp", "Under Investigation"];

/// Which rule a violation cites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    BatchIdFormat,
    DateValidity,
    WeekendManufacture,
    RecalledProduct,
    LocationAnomaly,
    FlaggedPrecedent,
}

impl RuleId {
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::BatchIdFormat => "batch-id-format",
            RuleId::DateValidity => "date-validity",
            RuleId::WeekendManufacture => "weekend-manufacture",
            RuleId::RecalledProduct => "recalled-product",
            RuleId::LocationAnomaly => "location-anomaly",
            RuleId::FlaggedPrecedent => "flagged-precedent",
        }
    }
}

/// A single rule violation with its human-readable citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: RuleId,
    pub detail: String,
}

impl Violation {
    fn new(rule: RuleId, detail: impl Into<String>) -> Self {
        Self { rule, detail: detail.into() }
    }
}

/// Indexed view of the historical reference set, built once per evaluation.
pub struct History {
    /// Product name -> batch-id prefixes seen in history.
    prefixes: BTreeMap<String, BTreeSet<String>>,
    /// Product name -> locations seen in history.
    locations: BTreeMap<String, BTreeSet<String>>,
    /// Products with at least one recalled batch.
    recalled: HashSet<String>,
    /// (product, location) -> flagged precedent batches as (batch id, status).
    precedents: BTreeMap<(String, String), Vec<(String, String)>>,
}

impl History {
    pub fn index(rows: &[HistoricalRow]) -> Self {
        let mut prefixes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut locations: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut recalled = HashSet::new();
        let mut precedents: BTreeMap<(String, String), Vec<(String, String)>> = BTreeMap::new();

        for row in rows {
            prefixes
                .entry(row.product_name.clone())
                .or_default()
                .insert(batch_prefix(&row.batch_id).to_string());
            locations
                .entry(row.product_name.clone())
                .or_default()
                .insert(row.location.clone());
            if row.status == STATUS_RECALLED {
                recalled.insert(row.product_name.clone());
            }
            if FLAGGED_PRECEDENT_STATUSES.contains(&row.status.as_str()) {
                precedents
                    .entry((row.product_name.clone(), row.location.clone()))
                    .or_default()
                    .push((row.batch_id.clone(), row.status.clone()));
            }
        }

        Self { prefixes, locations, recalled, precedents }
    }
}

/// The prefix portion of a batch id: everything up to and including the
/// first dash, or the whole id when there is none.
pub fn batch_prefix(batch_id: &str) -> &str {
    match batch_id.find('-') {
        Some(pos) => &batch_id[..=pos],
        None => batch_id,
    }
}

type Rule = fn(&BatchRow, &History, NaiveDate) -> Option<Violation>;

/// The rule set in citation order. First violation wins.
pub const RULES: &[Rule] = &[
    batch_id_format,
    date_validity,
    weekend_manufacture,
    recalled_product,
    location_anomaly,
    flagged_precedent,
];

/// Evaluate one row; returns the first violation in rule order, if any.
pub fn evaluate_row(row: &BatchRow, history: &History, today: NaiveDate) -> Option<Violation> {
    RULES.iter().find_map(|rule| rule(row, history, today))
}

/// Batch-id prefix must match the prefix historically used for the product.
/// Products with no history impose no prefix constraint here; the location
/// rule catches fully unknown products.
fn batch_id_format(row: &BatchRow, history: &History, _today: NaiveDate) -> Option<Violation> {
    let expected = history.prefixes.get(&row.product_name)?;
    let actual = batch_prefix(&row.batch_id);
    if expected.contains(actual) {
        return None;
    }
    let known = expected.iter().cloned().collect::<Vec<_>>().join(", ");
    Some(Violation::new(
        RuleId::BatchIdFormat,
        format!(
            "batch id {} does not match the historical prefix ({known}) for {}",
            row.batch_id, row.product_name
        ),
    ))
}

/// Manufacturing date must parse as YYYY-MM-DD and must not be in the future.
fn date_validity(row: &BatchRow, _history: &History, today: NaiveDate) -> Option<Violation> {
    match NaiveDate::parse_from_str(&row.mfg_date, "%Y-%m-%d") {
        Err(_) => Some(Violation::new(
            RuleId::DateValidity,
            format!("manufacturing date {:?} is not a valid YYYY-MM-DD date", row.mfg_date),
        )),
        Ok(date) if date > today => Some(Violation::new(
            RuleId::DateValidity,
            format!("manufacturing date {date} is in the future (evaluation date {today})"),
        )),
        Ok(_) => None,
    }
}

/// Manufacturing is not allowed on Saturdays or Sundays.
fn weekend_manufacture(row: &BatchRow, _history: &History, _today: NaiveDate) -> Option<Violation> {
    let date = NaiveDate::parse_from_str(&row.mfg_date, "%Y-%m-%d").ok()?;
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => Some(Violation::new(
            RuleId::WeekendManufacture,
            format!("manufactured on a {} ({date}); weekend manufacturing is not allowed", date.weekday()),
        )),
        _ => None,
    }
}

/// Any historical recall of the product flags every new batch of it,
/// regardless of the other rules.
fn recalled_product(row: &BatchRow, history: &History, _today: NaiveDate) -> Option<Violation> {
    if !history.recalled.contains(&row.product_name) {
        return None;
    }
    Some(Violation::new(
        RuleId::RecalledProduct,
        format!(
            "{} has a recalled batch in its history; all new batches require manual review",
            row.product_name
        ),
    ))
}

/// A location never seen in history for the product is an anomaly. A product
/// with no history at all has no precedent for any location.
fn location_anomaly(row: &BatchRow, history: &History, _today: NaiveDate) -> Option<Violation> {
    if let Some(known) = history.locations.get(&row.product_name) {
        if known.contains(&row.location) {
            return None;
        }
    }
    Some(Violation::new(
        RuleId::LocationAnomaly,
        format!(
            "location {} has no historical precedent for {}",
            row.location, row.product_name
        ),
    ))
}

/// Sharing product name and location with a flagged historical batch flags
/// the new row, citing the precedent.
fn flagged_precedent(row: &BatchRow, history: &History, _today: NaiveDate) -> Option<Violation> {
    let key = (row.product_name.clone(), row.location.clone());
    let (batch, status) = history.precedents.get(&key)?.first()?;
    Some(Violation::new(
        RuleId::FlaggedPrecedent,
        format!(
            "shares product and location ({}) with historical batch {batch} marked {status:?}",
            row.location
        ),
    ))
}
