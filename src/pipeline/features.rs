use crate::geo::haversine_km;
use crate::pipeline::cleaning::{format_number, parse_timestamp};
use crate::schema::{Column, Schema};
use crate::table::{RowView, Table};
use chrono::Timelike;
use tracing::info;

/// Derived columns the pipeline can append. Each declares the source columns
/// it needs; a column the schema cannot satisfy is skipped for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DerivedColumn {
    DurationMin,
    DistanceKm,
    SpeedKmh,
    DistancePerPassenger,
    PickupHour,
    PickupDay,
    PickupMonth,
    DistanceCategory,
}

const COORDINATE_COLUMNS: [Column; 4] = [
    Column::PickupLatitude,
    Column::PickupLongitude,
    Column::DropoffLatitude,
    Column::DropoffLongitude,
];

/// Distance buckets: lower-exclusive, upper-inclusive (upper_bound, label)
/// pairs in ascending order. Values outside (0, 100] stay unlabeled.
const DISTANCE_BUCKETS: [(f64, &str); 5] = [
    (1.0, "very short"),
    (5.0, "short"),
    (10.0, "medium"),
    (20.0, "long"),
    (100.0, "very long"),
];

impl DerivedColumn {
    const ALL: [DerivedColumn; 8] = [
        DerivedColumn::DurationMin,
        DerivedColumn::DistanceKm,
        DerivedColumn::SpeedKmh,
        DerivedColumn::DistancePerPassenger,
        DerivedColumn::PickupHour,
        DerivedColumn::PickupDay,
        DerivedColumn::PickupMonth,
        DerivedColumn::DistanceCategory,
    ];

    fn name(&self) -> &'static str {
        match self {
            DerivedColumn::DurationMin => "trip_duration_min",
            DerivedColumn::DistanceKm => "trip_distance_km",
            DerivedColumn::SpeedKmh => "trip_speed_kmh",
            DerivedColumn::DistancePerPassenger => "distance_per_passenger",
            DerivedColumn::PickupHour => "pickup_hour",
            DerivedColumn::PickupDay => "pickup_day",
            DerivedColumn::PickupMonth => "pickup_month",
            DerivedColumn::DistanceCategory => "distance_category",
        }
    }

    /// Whether the source schema carries everything this column needs.
    /// `has_duration` reflects the `trip_duration` column appended during
    /// cleaning when both timestamps exist.
    fn available(&self, schema: &Schema, has_duration: bool) -> bool {
        match self {
            DerivedColumn::DurationMin => has_duration,
            DerivedColumn::DistanceKm => schema.has_all(&COORDINATE_COLUMNS),
            DerivedColumn::SpeedKmh => has_duration && schema.has_all(&COORDINATE_COLUMNS),
            DerivedColumn::DistancePerPassenger => {
                schema.has(Column::PassengerCount) && schema.has_all(&COORDINATE_COLUMNS)
            }
            DerivedColumn::PickupHour | DerivedColumn::PickupDay | DerivedColumn::PickupMonth => {
                schema.has(Column::PickupDatetime)
            }
            DerivedColumn::DistanceCategory => schema.has(Column::TripDistance),
        }
    }
}

/// Per-row intermediates shared between derived columns.
struct RowContext {
    duration_seconds: Option<f64>,
    distance_km: Option<f64>,
}

/// Bucket a trip distance into its labeled range; `None` outside (0, 100].
fn distance_category(distance: f64) -> Option<&'static str> {
    if distance <= 0.0 {
        return None;
    }
    DISTANCE_BUCKETS
        .iter()
        .find(|(upper, _)| distance <= *upper)
        .map(|(_, label)| *label)
}

fn compute(column: DerivedColumn, view: &RowView, ctx: &RowContext) -> Option<String> {
    match column {
        DerivedColumn::DurationMin => ctx.duration_seconds.map(|s| format_number(s / 60.0)),
        DerivedColumn::DistanceKm => ctx.distance_km.map(format_number),
        DerivedColumn::SpeedKmh => {
            let duration = ctx.duration_seconds.filter(|d| *d != 0.0)?;
            let km = ctx.distance_km?;
            Some(format_number(km / (duration / 3600.0)))
        }
        DerivedColumn::DistancePerPassenger => {
            let passengers = view.integer(Column::PassengerCount).filter(|p| *p > 0)?;
            let km = ctx.distance_km?;
            Some(format_number(km / passengers as f64))
        }
        DerivedColumn::PickupHour => {
            let pickup = parse_timestamp(view.cell(Column::PickupDatetime)?)?;
            Some(pickup.hour().to_string())
        }
        DerivedColumn::PickupDay => {
            let pickup = parse_timestamp(view.cell(Column::PickupDatetime)?)?;
            Some(pickup.format("%A").to_string())
        }
        DerivedColumn::PickupMonth => {
            let pickup = parse_timestamp(view.cell(Column::PickupDatetime)?)?;
            Some(pickup.format("%B").to_string())
        }
        DerivedColumn::DistanceCategory => {
            let distance = view.float(Column::TripDistance)?;
            distance_category(distance).map(|label| label.to_string())
        }
    }
}

/// Append derived columns to the cleaned table. Pure per-row computation: the
/// row count never changes, and every value depends only on its own record.
pub fn derive_features(table: &Table) -> Table {
    info!("🔹 Creating derived features");
    println!("🔹 Creating derived features...");

    let schema = table.schema();
    let duration_index = table.columns.iter().position(|c| c == "trip_duration");
    let active: Vec<DerivedColumn> = DerivedColumn::ALL
        .into_iter()
        .filter(|c| c.available(&schema, duration_index.is_some()))
        .collect();

    let mut out = Table::new(table.columns.clone());
    out.columns.extend(active.iter().map(|c| c.name().to_string()));

    for row in &table.rows {
        let view = RowView::new(row, &schema);
        let duration_seconds = duration_index
            .and_then(|i| row.get(i))
            .and_then(|cell| cell.parse::<f64>().ok());
        let distance_km = if schema.has_all(&COORDINATE_COLUMNS) {
            match (
                view.float(Column::PickupLatitude),
                view.float(Column::PickupLongitude),
                view.float(Column::DropoffLatitude),
                view.float(Column::DropoffLongitude),
            ) {
                (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => {
                    Some(haversine_km(lat1, lon1, lat2, lon2))
                }
                _ => None,
            }
        } else {
            None
        };

        let ctx = RowContext {
            duration_seconds,
            distance_km,
        };

        let mut out_row = row.clone();
        for column in &active {
            out_row.push(compute(*column, &view, &ctx).unwrap_or_default());
        }
        out.rows.push(out_row);
    }

    info!(
        "✅ Derived {} features for {} rows",
        active.len(),
        out.len()
    );
    println!("✅ Derived features created successfully.");
    out
}
