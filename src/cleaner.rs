//! Conversion from raw CSV rows to typed delivery records.
//!
//! This is the only place strings become numbers and dates. Rows carrying the
//! dataset's missing-value marker in a required field are dropped before any
//! conversion is attempted; any other malformed value aborts the load.

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::types::{CleanRecord, RawRecord};
use crate::util::{parse_date, parse_trimmed, week_of_year};
use std::str::FromStr;
use tracing::{debug, info};

/// Missing-value marker used by the source data. The trailing space matters.
pub const SENTINEL: &str = "NaN ";

/// Prefix in front of the minutes value in `Time_taken(min)`.
pub const TIME_MARKER: &str = "(min) ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub total_rows: usize,
    pub sentinel_rows: usize,
    pub clean_rows: usize,
}

pub fn has_sentinel(row: &RawRecord) -> bool {
    [
        &row.delivery_person_age,
        &row.city,
        &row.road_traffic_density,
        &row.festival,
        &row.multiple_deliveries,
    ]
    .into_iter()
    .any(|v| v == SENTINEL)
}

/// Extract the minutes from values like `"(min) 24"`.
pub fn parse_time_taken(raw: &str, row: usize) -> Result<u32> {
    let rest = raw
        .split_once(TIME_MARKER)
        .map(|(_, rest)| rest)
        .ok_or_else(|| Error::MissingTimeMarker {
            row,
            value: raw.to_string(),
        })?;
    number(rest, row, "Time_taken(min)")
}

pub fn clean(raw: Vec<RawRecord>) -> Result<(Vec<CleanRecord>, CleanReport)> {
    let total_rows = raw.len();
    let mut out = Vec::with_capacity(total_rows);
    let mut sentinel_rows = 0usize;

    for (idx, row) in raw.into_iter().enumerate() {
        if has_sentinel(&row) {
            sentinel_rows += 1;
            continue;
        }
        out.push(clean_row(row, idx + 1)?);
    }

    let report = CleanReport {
        total_rows,
        sentinel_rows,
        clean_rows: out.len(),
    };
    info!(
        total = report.total_rows,
        dropped = report.sentinel_rows,
        kept = report.clean_rows,
        "Cleaned delivery records"
    );
    Ok((out, report))
}

/// Convert one row that already passed the sentinel check. `row` is the
/// 1-based data row number used in error messages.
pub fn clean_row(raw: RawRecord, row: usize) -> Result<CleanRecord> {
    let delivery_person_rating: f64 = number(&raw.delivery_person_ratings, row, "Delivery_person_Ratings")?;
    let delivery_person_age: u32 = number(&raw.delivery_person_age, row, "Delivery_person_Age")?;
    let multiple_deliveries: u32 = number(&raw.multiple_deliveries, row, "multiple_deliveries")?;
    let order_date = parse_date(&raw.order_date).ok_or_else(|| Error::InvalidDate {
        row,
        field: "Order_Date",
        value: raw.order_date.clone(),
    })?;
    let restaurant = GeoPoint::new(
        number(&raw.restaurant_latitude, row, "Restaurant_latitude")?,
        number(&raw.restaurant_longitude, row, "Restaurant_longitude")?,
    );
    let destination = GeoPoint::new(
        number(&raw.delivery_location_latitude, row, "Delivery_location_latitude")?,
        number(&raw.delivery_location_longitude, row, "Delivery_location_longitude")?,
    );
    let time_taken_min = parse_time_taken(&raw.time_taken, row)?;

    let record = CleanRecord {
        id: raw.id.trim().to_string(),
        delivery_person_id: raw.delivery_person_id.trim().to_string(),
        delivery_person_age,
        delivery_person_rating,
        restaurant,
        destination,
        order_date,
        week_of_year: week_of_year(order_date),
        road_traffic_density: raw.road_traffic_density.trim().to_string(),
        type_of_order: raw.type_of_order.trim().to_string(),
        type_of_vehicle: raw.type_of_vehicle.trim().to_string(),
        multiple_deliveries,
        festival: raw.festival.trim().to_string(),
        city: raw.city.trim().to_string(),
        time_taken_min,
    };
    debug!(row, id = %record.id, "Cleaned row");
    Ok(record)
}

fn number<T: FromStr>(value: &str, row: usize, field: &'static str) -> Result<T> {
    parse_trimmed(value).ok_or_else(|| Error::InvalidNumber {
        row,
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawRecord {
        RawRecord {
            id: "0x4607 ".to_string(),
            delivery_person_id: "INDORES13DEL02 ".to_string(),
            delivery_person_age: "37".to_string(),
            delivery_person_ratings: "4.9".to_string(),
            restaurant_latitude: "22.745049".to_string(),
            restaurant_longitude: "75.892471".to_string(),
            delivery_location_latitude: "22.765049".to_string(),
            delivery_location_longitude: "75.912471".to_string(),
            order_date: "19-03-2022".to_string(),
            road_traffic_density: "High ".to_string(),
            type_of_order: "Snack ".to_string(),
            type_of_vehicle: "motorcycle ".to_string(),
            multiple_deliveries: "0".to_string(),
            festival: "No ".to_string(),
            city: "Urban ".to_string(),
            time_taken: "(min) 24".to_string(),
        }
    }

    #[test]
    fn test_clean_row_types_and_trims() {
        let r = clean_row(raw_row(), 1).unwrap();
        assert_eq!(r.id, "0x4607");
        assert_eq!(r.delivery_person_id, "INDORES13DEL02");
        assert_eq!(r.delivery_person_age, 37);
        assert_eq!(r.delivery_person_rating, 4.9);
        assert_eq!(r.road_traffic_density, "High");
        assert_eq!(r.type_of_order, "Snack");
        assert_eq!(r.type_of_vehicle, "motorcycle");
        assert_eq!(r.city, "Urban");
        assert_eq!(r.festival, "No");
        assert_eq!(r.multiple_deliveries, 0);
        assert_eq!(r.time_taken_min, 24);
        assert_eq!(r.week_of_year, "11");
    }

    #[test]
    fn test_sentinel_in_each_field_drops_row() {
        let setters: [fn(&mut RawRecord); 5] = [
            |r| r.delivery_person_age = SENTINEL.to_string(),
            |r| r.city = SENTINEL.to_string(),
            |r| r.road_traffic_density = SENTINEL.to_string(),
            |r| r.festival = SENTINEL.to_string(),
            |r| r.multiple_deliveries = SENTINEL.to_string(),
        ];
        for set in setters {
            let mut bad = raw_row();
            set(&mut bad);
            let (out, report) = clean(vec![raw_row(), bad]).unwrap();
            assert_eq!(out.len(), 1);
            assert_eq!(report.sentinel_rows, 1);
            assert_eq!(report.total_rows, 2);
        }
    }

    #[test]
    fn test_sentinel_needs_exact_match() {
        let mut row = raw_row();
        row.city = "NaN".to_string();
        assert!(!has_sentinel(&row));
        // Not a sentinel, so it survives cleaning as an unknown city.
        let (out, _) = clean(vec![row]).unwrap();
        assert_eq!(out[0].city, "NaN");
    }

    #[test]
    fn test_parse_time_taken() {
        assert_eq!(parse_time_taken("(min) 25", 1).unwrap(), 25);
        assert_eq!(parse_time_taken("(min) 7 ", 1).unwrap(), 7);
        assert!(matches!(
            parse_time_taken("25", 3),
            Err(Error::MissingTimeMarker { row: 3, .. })
        ));
        assert!(matches!(
            parse_time_taken("(min) abc", 4),
            Err(Error::InvalidNumber { row: 4, .. })
        ));
    }

    #[test]
    fn test_bad_date_aborts_load() {
        let mut row = raw_row();
        row.order_date = "2022/03/19".to_string();
        let err = clean(vec![raw_row(), row]).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { row: 2, field: "Order_Date", .. }));
    }

    #[test]
    fn test_bad_rating_aborts_load() {
        let mut row = raw_row();
        row.delivery_person_ratings = "five".to_string();
        let err = clean(vec![row]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidNumber { field: "Delivery_person_Ratings", .. }
        ));
    }

    #[test]
    fn test_courier_id_trailing_space_is_one_courier() {
        let mut plain = raw_row();
        plain.delivery_person_id = "INDORES13DEL02".to_string();
        let (out, _) = clean(vec![raw_row(), plain]).unwrap();
        assert_eq!(out[0].delivery_person_id, out[1].delivery_person_id);
        assert_eq!(crate::reports::unique_delivery_persons(&out), 1);
    }

    #[test]
    fn test_trim_is_idempotent() {
        let once = clean_row(raw_row(), 1).unwrap();
        let mut trimmed = raw_row();
        trimmed.city = once.city.clone();
        trimmed.road_traffic_density = once.road_traffic_density.clone();
        trimmed.festival = once.festival.clone();
        let twice = clean_row(trimmed, 1).unwrap();
        assert_eq!(once, twice);
    }
}
