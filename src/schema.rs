use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Columns the pipeline knows how to validate and derive from. Anything else
/// in the source header passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    PickupDatetime,
    DropoffDatetime,
    PickupLongitude,
    PickupLatitude,
    DropoffLongitude,
    DropoffLatitude,
    PassengerCount,
    TripDistance,
    FareAmount,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::PickupDatetime,
        Column::DropoffDatetime,
        Column::PickupLongitude,
        Column::PickupLatitude,
        Column::DropoffLongitude,
        Column::DropoffLatitude,
        Column::PassengerCount,
        Column::TripDistance,
        Column::FareAmount,
    ];

    /// Header name of this column in the source file.
    pub fn name(&self) -> &'static str {
        match self {
            Column::PickupDatetime => "pickup_datetime",
            Column::DropoffDatetime => "dropoff_datetime",
            Column::PickupLongitude => "pickup_longitude",
            Column::PickupLatitude => "pickup_latitude",
            Column::DropoffLongitude => "dropoff_longitude",
            Column::DropoffLatitude => "dropoff_latitude",
            Column::PassengerCount => "passenger_count",
            Column::TripDistance => "trip_distance",
            Column::FareAmount => "fare_amount",
        }
    }

    /// Whether a record missing this column's value is disqualified outright.
    /// Passenger count is informational only; everything else is essential
    /// when present in the source.
    pub fn is_essential(&self) -> bool {
        !matches!(self, Column::PassengerCount)
    }
}

/// Capability descriptor computed once from the source header. Filters and
/// features declare required columns and are skipped when the schema lacks
/// them, rather than probing the header at each call site.
#[derive(Debug, Clone)]
pub struct Schema {
    indices: HashMap<Column, usize>,
}

impl Schema {
    /// Detect known columns from a header row.
    pub fn detect(columns: &[String]) -> Self {
        let mut indices = HashMap::new();
        for column in Column::ALL {
            if let Some(idx) = columns.iter().position(|c| c == column.name()) {
                indices.insert(column, idx);
            }
        }
        Self { indices }
    }

    pub fn has(&self, column: Column) -> bool {
        self.indices.contains_key(&column)
    }

    pub fn has_all(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.has(*c))
    }

    /// Index of a known column within a row, if the source carries it.
    pub fn index(&self, column: Column) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    /// The essential columns actually present in this source. Their absence
    /// from a row disqualifies it during the completeness pass.
    pub fn essential_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| c.is_essential() && self.has(*c))
            .collect()
    }

    /// Known columns present in this source, in declaration order.
    pub fn known_columns(&self) -> Vec<Column> {
        Column::ALL.into_iter().filter(|c| self.has(*c)).collect()
    }
}
