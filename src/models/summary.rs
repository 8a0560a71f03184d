use serde::{Deserialize, Serialize};

/// Round to one decimal place the way SQL `round(x, 1)` does: by the exact
/// decimal value of the double, with exact ties going away from zero.
pub fn round_to_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // Only odd multiples of 0.25 sit exactly halfway between two tenths
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }

    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Aggregates for one station over one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub station_id: String,
    pub year: i32,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub cumulative_precip: Option<f64>,
}

/// A row of `station_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummaryRow {
    pub id: i64,
    pub station_id: String,
    pub year: i32,
    pub avg_max_temp: Option<f64>,
    pub avg_min_temp: Option<f64>,
    pub cumulative_precip: Option<f64>,
}
