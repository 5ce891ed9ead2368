use crate::schema::{Column, Schema};
use crate::table::{Row, RowView, Table};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Why a record was removed from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// An essential column is null/missing
    MissingData,
    /// A timestamp cell exists but does not parse
    InvalidTimestamp,
    /// A numeric cell exists but does not parse
    InvalidNumber,
    /// A coordinate is outside the legal longitude/latitude range
    CoordinateOutOfRange,
    /// Attribute-wise identical to an earlier record
    Duplicate,
    /// Duration, distance or fare outside its accepted range
    ValueOutOfRange,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 6] = [
        RejectionReason::MissingData,
        RejectionReason::InvalidTimestamp,
        RejectionReason::InvalidNumber,
        RejectionReason::CoordinateOutOfRange,
        RejectionReason::Duplicate,
        RejectionReason::ValueOutOfRange,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RejectionReason::MissingData => "missing_data",
            RejectionReason::InvalidTimestamp => "invalid_timestamp",
            RejectionReason::InvalidNumber => "invalid_number",
            RejectionReason::CoordinateOutOfRange => "coordinate_out_of_range",
            RejectionReason::Duplicate => "duplicate",
            RejectionReason::ValueOutOfRange => "value_out_of_range",
        }
    }
}

/// One record's removal verdict: the reason plus the field that triggered it.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub reason: RejectionReason,
    pub field: Option<&'static str>,
    pub detail: String,
}

impl Rejection {
    fn new(reason: RejectionReason, field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            reason,
            field: Some(field),
            detail: detail.into(),
        }
    }
}

/// A row-admission filter: declares the columns it needs and, given a row,
/// either admits it (`None`) or names the reason it is removed.
trait RowFilter {
    fn name(&self) -> &'static str;
    fn required(&self) -> &[Column];
    fn check(&mut self, row: &Row, view: &RowView) -> Option<Rejection>;
}

/// Rejects rows with a null in any essential column the source carries.
struct CompletenessFilter {
    essential: Vec<Column>,
}

impl RowFilter for CompletenessFilter {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn required(&self) -> &[Column] {
        &[]
    }

    fn check(&mut self, _row: &Row, view: &RowView) -> Option<Rejection> {
        for column in &self.essential {
            if view.cell(*column).is_none() {
                return Some(Rejection::new(
                    RejectionReason::MissingData,
                    column.name(),
                    format!("essential column '{}' is missing", column.name()),
                ));
            }
        }
        None
    }
}

/// Rejects rows whose pickup or dropoff timestamp fails to parse. Distinct
/// from missing: the cell holds text that is not a timestamp.
struct TimestampParseFilter;

const TIMESTAMP_COLUMNS: [Column; 2] = [Column::PickupDatetime, Column::DropoffDatetime];

impl RowFilter for TimestampParseFilter {
    fn name(&self) -> &'static str {
        "timestamp_parse"
    }

    fn required(&self) -> &[Column] {
        &TIMESTAMP_COLUMNS
    }

    fn check(&mut self, _row: &Row, view: &RowView) -> Option<Rejection> {
        for column in TIMESTAMP_COLUMNS {
            if let Some(cell) = view.cell(column) {
                if parse_timestamp(cell).is_none() {
                    return Some(Rejection::new(
                        RejectionReason::InvalidTimestamp,
                        column.name(),
                        format!("'{}' is not a recognized timestamp", cell),
                    ));
                }
            }
        }
        None
    }
}

/// Rejects rows with coordinates outside [-180, 180] longitude or [-90, 90]
/// latitude.
struct CoordinateRangeFilter;

const COORDINATE_COLUMNS: [(Column, f64); 4] = [
    (Column::PickupLongitude, 180.0),
    (Column::PickupLatitude, 90.0),
    (Column::DropoffLongitude, 180.0),
    (Column::DropoffLatitude, 90.0),
];

impl RowFilter for CoordinateRangeFilter {
    fn name(&self) -> &'static str {
        "coordinate_range"
    }

    fn required(&self) -> &[Column] {
        const REQUIRED: [Column; 4] = [
            Column::PickupLongitude,
            Column::PickupLatitude,
            Column::DropoffLongitude,
            Column::DropoffLatitude,
        ];
        &REQUIRED
    }

    fn check(&mut self, _row: &Row, view: &RowView) -> Option<Rejection> {
        for (column, bound) in COORDINATE_COLUMNS {
            let Some(value) = view.float(column) else {
                return Some(Rejection::new(
                    RejectionReason::InvalidNumber,
                    column.name(),
                    format!("'{}' is not numeric", column.name()),
                ));
            };
            if !(-bound..=bound).contains(&value) {
                return Some(Rejection::new(
                    RejectionReason::CoordinateOutOfRange,
                    column.name(),
                    format!("{} outside [-{}, {}]", value, bound, bound),
                ));
            }
        }
        None
    }
}

/// Rejects rows attribute-wise identical to an earlier row that survived the
/// preceding filters; the first occurrence is retained.
struct DuplicateFilter {
    seen: HashSet<Row>,
}

impl RowFilter for DuplicateFilter {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn required(&self) -> &[Column] {
        &[]
    }

    fn check(&mut self, row: &Row, _view: &RowView) -> Option<Rejection> {
        if !self.seen.insert(row.clone()) {
            return Some(Rejection {
                reason: RejectionReason::Duplicate,
                field: None,
                detail: "identical to an earlier record".to_string(),
            });
        }
        None
    }
}

/// Rejects trips shorter than one minute or longer than two hours.
struct DurationRangeFilter;

const MIN_TRIP_SECONDS: f64 = 60.0;
const MAX_TRIP_SECONDS: f64 = 7200.0;

impl RowFilter for DurationRangeFilter {
    fn name(&self) -> &'static str {
        "duration_range"
    }

    fn required(&self) -> &[Column] {
        &TIMESTAMP_COLUMNS
    }

    fn check(&mut self, _row: &Row, view: &RowView) -> Option<Rejection> {
        let duration = trip_duration_seconds(view)?;
        if !(MIN_TRIP_SECONDS..=MAX_TRIP_SECONDS).contains(&duration) {
            return Some(Rejection::new(
                RejectionReason::ValueOutOfRange,
                "trip_duration",
                format!(
                    "duration {}s outside [{}, {}]",
                    duration, MIN_TRIP_SECONDS, MAX_TRIP_SECONDS
                ),
            ));
        }
        None
    }
}

/// Rejects rows whose numeric value falls outside an accepted closed range.
struct ValueRangeFilter {
    column: Column,
    min: f64,
    max: f64,
    required: [Column; 1],
}

impl ValueRangeFilter {
    fn new(column: Column, min: f64, max: f64) -> Self {
        Self {
            column,
            min,
            max,
            required: [column],
        }
    }
}

impl RowFilter for ValueRangeFilter {
    fn name(&self) -> &'static str {
        "value_range"
    }

    fn required(&self) -> &[Column] {
        &self.required
    }

    fn check(&mut self, _row: &Row, view: &RowView) -> Option<Rejection> {
        let Some(value) = view.float(self.column) else {
            return Some(Rejection::new(
                RejectionReason::InvalidNumber,
                self.column.name(),
                format!("'{}' is not numeric", self.column.name()),
            ));
        };
        if value < self.min || value > self.max {
            return Some(Rejection::new(
                RejectionReason::ValueOutOfRange,
                self.column.name(),
                format!("{} outside [{}, {}]", value, self.min, self.max),
            ));
        }
        None
    }
}

/// Result of the cleaning stage: the admitted table, the deduplicated audit
/// table of removed rows, and per-reason rejection tallies.
#[derive(Debug)]
pub struct CleanOutcome {
    pub kept: Table,
    pub rejected: Table,
    pub reason_counts: Vec<(RejectionReason, usize)>,
    /// Rejections before the audit table is deduplicated
    pub total_rejections: usize,
}

/// Build the ordered filter list, keeping only filters whose required columns
/// the source actually carries.
fn build_filters(schema: &Schema) -> Vec<Box<dyn RowFilter>> {
    let candidates: Vec<Box<dyn RowFilter>> = vec![
        Box::new(CompletenessFilter {
            essential: schema.essential_columns(),
        }),
        Box::new(TimestampParseFilter),
        Box::new(CoordinateRangeFilter),
        Box::new(DuplicateFilter {
            seen: HashSet::new(),
        }),
        Box::new(DurationRangeFilter),
        Box::new(ValueRangeFilter::new(Column::TripDistance, 0.0, 100.0)),
        Box::new(ValueRangeFilter::new(Column::FareAmount, 0.0, 500.0)),
    ];

    candidates
        .into_iter()
        .filter(|f| schema.has_all(f.required()))
        .collect()
}

/// Apply the row-admission filters in order, partitioning the input into kept
/// and rejected rows. A malformed field rejects only its own row; the run
/// always continues.
pub fn clean(table: &Table) -> CleanOutcome {
    info!("🔹 Cleaning dataset");
    println!("🔹 Cleaning dataset...");

    let schema = table.schema();
    let mut filters = build_filters(&schema);
    let has_duration = schema.has_all(&TIMESTAMP_COLUMNS);
    // Some sources already carry a trip_duration column; the computed value
    // replaces it rather than adding a second column of the same name.
    let existing_duration = table.columns.iter().position(|c| c == "trip_duration");

    let mut kept = Table::new(table.columns.clone());
    if has_duration && existing_duration.is_none() {
        // The admission check already parsed both timestamps; carry the
        // computed duration forward so later stages need not re-derive it.
        kept.columns.push("trip_duration".to_string());
    }

    let mut rejected_rows: Vec<Row> = Vec::new();
    let mut counts: HashMap<RejectionReason, usize> = HashMap::new();

    for row in &table.rows {
        let view = RowView::new(row, &schema);
        let rejection = filters
            .iter_mut()
            .find_map(|f| f.check(row, &view).map(|r| (f.name(), r)));

        match rejection {
            Some((filter, rejection)) => {
                debug!(
                    filter,
                    reason = rejection.reason.label(),
                    field = rejection.field.unwrap_or("-"),
                    "rejected record: {}",
                    rejection.detail
                );
                *counts.entry(rejection.reason).or_insert(0) += 1;
                rejected_rows.push(row.clone());
            }
            None => {
                let mut out = row.clone();
                if has_duration {
                    let duration = trip_duration_seconds(&view)
                        .map(format_number)
                        .unwrap_or_default();
                    match existing_duration {
                        Some(idx) => out[idx] = duration,
                        None => out.push(duration),
                    }
                }
                kept.rows.push(out);
            }
        }
    }

    let total_rejections = rejected_rows.len();

    // Audit table keeps original relative order, first occurrence only
    let mut rejected = Table::new(table.columns.clone());
    let mut seen: HashSet<Row> = HashSet::new();
    for row in rejected_rows {
        if seen.insert(row.clone()) {
            rejected.rows.push(row);
        }
    }

    let reason_counts: Vec<(RejectionReason, usize)> = RejectionReason::ALL
        .into_iter()
        .filter_map(|r| counts.get(&r).map(|n| (r, *n)))
        .collect();

    for (reason, count) in &reason_counts {
        info!("   removed {} rows: {}", count, reason.label());
        println!("   ✂️  {} rows removed ({})", count, reason.label());
    }
    info!("✅ Cleaned data has {} rows remaining", kept.len());
    println!("✅ Cleaned data has {} rows remaining.", kept.len());

    CleanOutcome {
        kept,
        rejected,
        reason_counts,
        total_rejections,
    }
}

/// Parse a timestamp cell in any of the layouts seen across source exports.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
}

/// Dropoff minus pickup, in seconds. `None` when either timestamp is missing
/// or unparsable.
pub fn trip_duration_seconds(view: &RowView) -> Option<f64> {
    let pickup = parse_timestamp(view.cell(Column::PickupDatetime)?)?;
    let dropoff = parse_timestamp(view.cell(Column::DropoffDatetime)?)?;
    Some((dropoff - pickup).num_seconds() as f64)
}

/// Render a float the way the output format expects: integral values without
/// a trailing fraction.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
