use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};

use super::golemio_api_model::GolemioDeparture;

/// A single upcoming departure from the board stop
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub route_short_name: String,
    pub headsign: String,
    pub predicted_departure: DateTime<FixedOffset>,
    pub is_wheelchair_accessible: bool,
    pub is_air_conditioned: bool,
}

impl TryFrom<GolemioDeparture> for Departure {
    type Error = anyhow::Error;

    fn try_from(value: GolemioDeparture) -> Result<Self, Self::Error> {
        let predicted_departure = value
            .departure_timestamp
            .parse_predicted()
            .with_context(|| {
                format!(
                    "invalid predicted departure \"{}\" of route {}",
                    value.departure_timestamp.predicted, value.route.short_name
                )
            })?;

        Ok(Departure {
            route_short_name: value.route.short_name,
            headsign: value.trip.headsign,
            predicted_departure,
            is_wheelchair_accessible: value.trip.is_wheelchair_accessible,
            is_air_conditioned: value.trip.is_air_conditioned,
        })
    }
}

/// Whole minutes from `now` until `departure`.
///
/// Uses the total signed difference floored to minutes. Departures that are already
/// due (predicted time slipped behind `now`) are reported as 0.
pub fn minutes_until(departure: DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    let seconds = (departure.with_timezone(&Utc) - now).num_seconds();

    seconds.div_euclid(60).max(0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureEntry {
    pub time_diff: i64,
    pub is_wheelchair_accessible: bool,
    pub is_air_conditioned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureGroup {
    #[serde(skip)]
    pub route_short_name: String,
    pub headsign: String,
    pub departures: Vec<DepartureEntry>,
}

/// Departures grouped by route, in the order routes were first seen.
/// Serializes as a JSON object keyed by route short name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartureBoard {
    groups: Vec<DepartureGroup>,
}

impl DepartureBoard {
    pub fn from_departures<I>(departures: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = Departure>,
    {
        let mut board = DepartureBoard::default();

        for departure in departures {
            board.push(departure, now);
        }

        board
    }

    /// Appends to the route's group, creating it with this departure's headsign if needed
    pub fn push(&mut self, departure: Departure, now: DateTime<Utc>) {
        let entry = DepartureEntry {
            time_diff: minutes_until(departure.predicted_departure, now),
            is_wheelchair_accessible: departure.is_wheelchair_accessible,
            is_air_conditioned: departure.is_air_conditioned,
        };

        match self
            .groups
            .iter_mut()
            .find(|g| g.route_short_name == departure.route_short_name)
        {
            Some(group) => group.departures.push(entry),
            None => self.groups.push(DepartureGroup {
                route_short_name: departure.route_short_name,
                headsign: departure.headsign,
                departures: vec![entry],
            }),
        }
    }

    #[cfg(test)]
    pub fn get(&self, route_short_name: &str) -> Option<&DepartureGroup> {
        self.groups
            .iter()
            .find(|g| g.route_short_name == route_short_name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

impl Serialize for DepartureBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.route_short_name, group)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn departure(route: &str, headsign: &str, predicted: &str) -> Departure {
        Departure {
            route_short_name: route.to_string(),
            headsign: headsign.to_string(),
            predicted_departure: DateTime::parse_from_rfc3339(predicted).unwrap(),
            is_wheelchair_accessible: false,
            is_air_conditioned: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap()
    }

    #[test]
    fn test_minutes_until_floors_whole_minutes() {
        let dep = DateTime::parse_from_rfc3339("2024-03-01T12:34:59+01:00").unwrap();

        assert_eq!(minutes_until(dep, now()), 4);
    }

    #[test]
    fn test_minutes_until_crosses_the_hour() {
        let dep = DateTime::parse_from_rfc3339("2024-03-01T13:45:00+01:00").unwrap();

        assert_eq!(minutes_until(dep, now()), 75);
    }

    #[test]
    fn test_minutes_until_past_due_is_zero() {
        let dep = DateTime::parse_from_rfc3339("2024-03-01T12:29:50+01:00").unwrap();

        assert_eq!(minutes_until(dep, now()), 0);
    }

    #[test]
    fn test_grouping_preserves_insertion_order() {
        let board = DepartureBoard::from_departures(
            vec![
                departure("9", "Spojovací", "2024-03-01T12:35:00+01:00"),
                departure("10", "Sídliště Ďáblice", "2024-03-01T12:33:00+01:00"),
                departure("9", "Spojovací", "2024-03-01T12:31:00+01:00"),
                departure("9", "Lehovec", "2024-03-01T12:45:00+01:00"),
            ],
            now(),
        );

        assert_eq!(board.len(), 2);
        let nine = board.get("9").unwrap();
        assert_eq!(nine.headsign, "Spojovací");
        let diffs: Vec<i64> = nine.departures.iter().map(|d| d.time_diff).collect();
        assert_eq!(diffs, vec![5, 1, 15]);
        assert_eq!(board.get("10").unwrap().departures.len(), 1);
    }

    #[test]
    fn test_board_serializes_routes_in_first_seen_order() -> Result<(), anyhow::Error> {
        let mut accessible = departure("9", "Spojovací", "2024-03-01T12:32:00+01:00");
        accessible.is_wheelchair_accessible = true;

        let board = DepartureBoard::from_departures(
            vec![
                departure("10", "Sídliště Ďáblice", "2024-03-01T12:33:00+01:00"),
                accessible,
            ],
            now(),
        );

        let json = serde_json::to_string(&board)?;

        assert_eq!(
            json,
            r#"{"10":{"headsign":"Sídliště Ďáblice","departures":[{"time_diff":3,"is_wheelchair_accessible":false,"is_air_conditioned":false}]},"9":{"headsign":"Spojovací","departures":[{"time_diff":2,"is_wheelchair_accessible":true,"is_air_conditioned":false}]}}"#
        );

        Ok(())
    }

    #[test]
    fn test_empty_board_serializes_to_empty_object() -> Result<(), anyhow::Error> {
        assert_eq!(serde_json::to_string(&DepartureBoard::default())?, "{}");

        Ok(())
    }
}
