use serde::Deserialize;

use super::shape::GeoPoint;

/// A labelled stop drawn on top of the route
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedStop {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl NamedStop {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        NamedStop {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Stops between Hotel Golf and Klamovka, used when no stop file is given
pub fn default_stops() -> Vec<NamedStop> {
    vec![
        NamedStop::new("Hotel Golf", 50.068031, 14.346667),
        NamedStop::new("Poštovka", 50.06855, 14.3543),
        NamedStop::new("Kotlářka", 50.069565, 14.362923),
        NamedStop::new("Kavalírka", 50.070042, 14.37063),
        NamedStop::new("Klamovka", 50.070702, 14.380618),
    ]
}
