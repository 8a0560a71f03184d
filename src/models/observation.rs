use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::constants::MISSING_VALUE_SENTINEL;

/// Map the file sentinel for a missing measurement to `None`.
pub fn normalize_missing(value: f64) -> Option<f64> {
    if value == MISSING_VALUE_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// One station's measurements for one calendar date, as read from a station file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DailyObservation {
    #[validate(length(min = 1, max = 50))]
    pub station_id: String,

    pub date: NaiveDate,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub total_precip: Option<f64>,
}

impl DailyObservation {
    pub fn new(
        station_id: String,
        date: NaiveDate,
        max_temp: Option<f64>,
        min_temp: Option<f64>,
        total_precip: Option<f64>,
    ) -> Self {
        Self {
            station_id,
            date,
            max_temp,
            min_temp,
            total_precip,
        }
    }

    /// Build an observation from raw file values, applying sentinel normalization.
    pub fn from_raw(
        station_id: String,
        date: NaiveDate,
        max_temp: f64,
        min_temp: f64,
        total_precip: f64,
    ) -> Self {
        Self::new(
            station_id,
            date,
            normalize_missing(max_temp),
            normalize_missing(min_temp),
            normalize_missing(total_precip),
        )
    }
}

/// A row of `station_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDataRow {
    pub id: i64,
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub total_precip: Option<f64>,
}
