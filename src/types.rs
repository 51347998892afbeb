use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::geo::{haversine_km, GeoPoint};

/// One CSV row exactly as it appears in the file. Every field stays a string
/// until the cleaner converts it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Delivery_person_ID")]
    pub delivery_person_id: String,
    #[serde(rename = "Delivery_person_Age")]
    pub delivery_person_age: String,
    #[serde(rename = "Delivery_person_Ratings")]
    pub delivery_person_ratings: String,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: String,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: String,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_location_latitude: String,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_location_longitude: String,
    #[serde(rename = "Order_Date")]
    pub order_date: String,
    #[serde(rename = "Road_traffic_density")]
    pub road_traffic_density: String,
    #[serde(rename = "Type_of_order")]
    pub type_of_order: String,
    #[serde(rename = "Type_of_vehicle")]
    pub type_of_vehicle: String,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: String,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub id: String,
    pub delivery_person_id: String,
    pub delivery_person_age: u32,
    pub delivery_person_rating: f64,
    pub restaurant: GeoPoint,
    pub destination: GeoPoint,
    pub order_date: NaiveDate,
    pub week_of_year: String,
    pub road_traffic_density: String,
    pub type_of_order: String,
    pub type_of_vehicle: String,
    pub multiple_deliveries: u32,
    pub festival: String,
    pub city: String,
    pub time_taken_min: u32,
}

impl CleanRecord {
    /// Great-circle distance between the restaurant and the drop-off point.
    pub fn distance_km(&self) -> f64 {
        haversine_km(self.restaurant, self.destination)
    }
}

/// Mean and sample standard deviation of delivery time for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeStats {
    pub avg_time: f64,
    pub std_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityTimeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "fmt2")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "fmt2")]
    pub std_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityDistanceRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "AvgDistanceKm")]
    #[tabled(rename = "AvgDistanceKm", display_with = "fmt2")]
    pub avg_distance_km: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityOrderTypeRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "TypeOfOrder")]
    #[tabled(rename = "TypeOfOrder")]
    pub type_of_order: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "fmt2")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "fmt2")]
    pub std_time: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityTrafficRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "RoadTrafficDensity")]
    #[tabled(rename = "RoadTrafficDensity")]
    pub road_traffic_density: String,
    #[serde(rename = "AvgTime")]
    #[tabled(rename = "AvgTime", display_with = "fmt2")]
    pub avg_time: f64,
    #[serde(rename = "StdTime")]
    #[tabled(rename = "StdTime", display_with = "fmt2")]
    pub std_time: f64,
}

/// The metric row at the top of the dashboard.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Overview {
    pub unique_delivery_persons: usize,
    pub avg_distance_km: f64,
    pub festival: TimeStats,
    pub no_festival: TimeStats,
}

fn fmt2(v: &f64) -> String {
    crate::util::format_number(*v, 2)
}
