use serde::Deserialize;

/// A waypoint of a route shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}

/// A row of a GTFS-like `shapes.txt` export. Extra columns are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct ShapeRow {
    pub shape_pt_sequence: u32,
    pub lat: f64,
    pub lon: f64,
}

impl From<&ShapeRow> for GeoPoint {
    fn from(value: &ShapeRow) -> Self {
        GeoPoint::new(value.lat, value.lon)
    }
}
