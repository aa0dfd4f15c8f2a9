use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, de};

/// Response of the `/v2/pid/departureboards` endpoint.
/// Only the fields the board needs are modelled, everything else is ignored.
#[derive(Debug, Deserialize, Serialize)]
pub struct GolemioDepartureBoard {
    pub departures: Vec<GolemioDeparture>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GolemioDeparture {
    pub route: GolemioRoute,
    pub trip: GolemioTrip,
    pub departure_timestamp: GolemioTimestamp,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GolemioRoute {
    /// Line number as shown on the vehicle, e.g. "9"
    pub short_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GolemioTrip {
    pub headsign: String,
    /// Missing and `null` are both treated as false
    #[serde(default, deserialize_with = "bool_or_null")]
    pub is_wheelchair_accessible: bool,
    /// Missing and `null` are both treated as false
    #[serde(default, deserialize_with = "bool_or_null")]
    pub is_air_conditioned: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GolemioTimestamp {
    /// ISO-8601 with offset, e.g. "2024-03-01T12:34:00+01:00".
    /// Kept as a string so a malformed value fails the request, not the whole body.
    pub predicted: String,
}

impl GolemioTimestamp {
    pub fn parse_predicted(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.predicted)
    }
}

fn bool_or_null<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Deserialize::deserialize(deserializer)?;

    match value {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(serde_json::Value::Bool(b)) => Ok(b),
        Some(other) => Err(de::Error::custom(format!("expected a bool, got {other}"))),
    }
}
