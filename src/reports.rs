use crate::types::{
    CityDistanceRow, CityOrderTypeRow, CityTimeRow, CityTrafficRow, CleanRecord, Overview,
    TimeStats,
};
use crate::util::{mean, round2, std_dev};
use std::collections::{BTreeMap, HashSet};

fn time_stats(times: &[f64]) -> TimeStats {
    TimeStats {
        avg_time: mean(times),
        std_time: std_dev(times),
    }
}

/// Collect delivery times per key. `BTreeMap` keeps groups sorted by key.
fn group_times<K, F>(data: &[CleanRecord], key: F) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    F: Fn(&CleanRecord) -> K,
{
    let mut map: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in data {
        map.entry(key(r)).or_default().push(r.time_taken_min as f64);
    }
    map
}

pub fn unique_delivery_persons(data: &[CleanRecord]) -> usize {
    data.iter()
        .map(|r| r.delivery_person_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean restaurant-to-customer distance in km, rounded to two decimals.
pub fn average_distance(data: &[CleanRecord]) -> f64 {
    let distances: Vec<f64> = data.iter().map(CleanRecord::distance_km).collect();
    round2(mean(&distances))
}

pub fn avg_time_by_city(data: &[CleanRecord]) -> Vec<CityTimeRow> {
    group_times(data, |r| r.city.clone())
        .into_iter()
        .map(|(city, times)| {
            let s = time_stats(&times);
            CityTimeRow {
                city,
                avg_time: s.avg_time,
                std_time: s.std_time,
            }
        })
        .collect()
}

pub fn distance_by_city(data: &[CleanRecord]) -> Vec<CityDistanceRow> {
    let mut map: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data {
        map.entry(r.city.clone()).or_default().push(r.distance_km());
    }
    map.into_iter()
        .map(|(city, d)| CityDistanceRow {
            city,
            avg_distance_km: mean(&d),
        })
        .collect()
}

pub fn avg_time_by_city_and_order_type(data: &[CleanRecord]) -> Vec<CityOrderTypeRow> {
    group_times(data, |r| (r.city.clone(), r.type_of_order.clone()))
        .into_iter()
        .map(|((city, type_of_order), times)| {
            let s = time_stats(&times);
            CityOrderTypeRow {
                city,
                type_of_order,
                avg_time: s.avg_time,
                std_time: s.std_time,
            }
        })
        .collect()
}

pub fn avg_time_by_city_and_traffic(data: &[CleanRecord]) -> Vec<CityTrafficRow> {
    group_times(data, |r| (r.city.clone(), r.road_traffic_density.clone()))
        .into_iter()
        .map(|((city, road_traffic_density), times)| {
            let s = time_stats(&times);
            CityTrafficRow {
                city,
                road_traffic_density,
                avg_time: s.avg_time,
                std_time: s.std_time,
            }
        })
        .collect()
}

/// Delivery time during festivals (`festival == true`) or outside them,
/// rounded to two decimals. NaN when no row falls in the requested bucket.
pub fn delivery_time_festival(data: &[CleanRecord], festival: bool) -> TimeStats {
    let wanted = if festival { "Yes" } else { "No" };
    let times: Vec<f64> = data
        .iter()
        .filter(|r| r.festival == wanted)
        .map(|r| r.time_taken_min as f64)
        .collect();
    let s = time_stats(&times);
    TimeStats {
        avg_time: round2(s.avg_time),
        std_time: round2(s.std_time),
    }
}

pub fn overview(data: &[CleanRecord]) -> Overview {
    Overview {
        unique_delivery_persons: unique_delivery_persons(data),
        avg_distance_km: average_distance(data),
        festival: delivery_time_festival(data, true),
        no_festival: delivery_time_festival(data, false),
    }
}
