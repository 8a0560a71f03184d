use crate::utils::constants::{DEFAULT_QUERY_LIMIT, DEFAULT_QUERY_OFFSET};
use chrono::NaiveDate;
use rusqlite::ToSql;

/// Filtered, paginated listing over `station_data`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDataQuery {
    pub station_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for StationDataQuery {
    fn default() -> Self {
        Self {
            station_id: None,
            date: None,
            limit: DEFAULT_QUERY_LIMIT,
            offset: DEFAULT_QUERY_OFFSET,
        }
    }
}

impl StationDataQuery {
    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Filtered, paginated listing over `station_summary`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryQuery {
    pub station_id: Option<String>,
    pub year: Option<i32>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for SummaryQuery {
    fn default() -> Self {
        Self {
            station_id: None,
            year: None,
            limit: DEFAULT_QUERY_LIMIT,
            offset: DEFAULT_QUERY_OFFSET,
        }
    }
}

impl SummaryQuery {
    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Append `WHERE` conditions for the present filters plus `LIMIT ? OFFSET ?`.
/// User input only ever reaches the statement as bound parameters.
pub(crate) fn build_select<'a>(
    base: &str,
    filters: Vec<(&str, Option<&'a dyn ToSql>)>,
    page: [&'a dyn ToSql; 2],
) -> (String, Vec<&'a dyn ToSql>) {
    let mut sql = String::from(base);
    let mut params: Vec<&'a dyn ToSql> = Vec::new();
    let mut conditions = Vec::new();

    for (column, value) in filters {
        if let Some(value) = value {
            conditions.push(format!("{} = ?", column));
            params.push(value);
        }
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
    params.extend(page);

    (sql, params)
}
