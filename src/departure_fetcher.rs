//! Responsible for fetching the departure board and grouping it by route
use chrono::{DateTime, Utc};
use itertools::Itertools;
use reqwest::{Client, StatusCode};
use tracing::{Instrument, info, info_span};

use crate::{
    config::BoardConfig,
    model::{
        departure::{Departure, DepartureBoard},
        golemio_api_model::GolemioDepartureBoard,
    },
};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("error fetching the departures")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("departure board responded with {0}")]
    UpstreamStatus(StatusCode),

    #[error("error parsing the departures \n{} \n{}", source, body)]
    ParsingError {
        source: serde_json::Error,
        body: String,
    },

    #[error("invalid departure")]
    InvalidDeparture(#[source] anyhow::Error),
}

impl FetchError {
    /// Everything that went wrong on the way to or from the API, as opposed to
    /// a response we received fine but can't make sense of.
    pub fn is_upstream_failure(&self) -> bool {
        !matches!(self, FetchError::InvalidDeparture(_))
    }
}

pub struct DepartureFetcher {
    client: Client,
    config: BoardConfig,
}

impl DepartureFetcher {
    pub fn new(config: BoardConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(DepartureFetcher {
            client: builder.build()?,
            config,
        })
    }

    /// Fetches the departures of the configured stop and groups them by route.
    /// `now` is the reference point for the minutes until departure.
    #[tracing::instrument(err, skip(self), fields(stop_id = %self.config.stop_id))]
    pub async fn fetch_board(&self, now: DateTime<Utc>) -> Result<DepartureBoard, FetchError> {
        let upstream = self.fetch_departures().await?;

        let departures: Vec<Departure> = upstream
            .departures
            .into_iter()
            .map(Departure::try_from)
            .try_collect()
            .map_err(FetchError::InvalidDeparture)?;

        let board = DepartureBoard::from_departures(departures, now);

        info!("got departures of {} routes", board.len());

        Ok(board)
    }

    async fn fetch_departures(&self) -> Result<GolemioDepartureBoard, FetchError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .header("accept", "application/json")
            .header("X-Access-Token", &self.config.access_token)
            .query(&[
                ("ids", self.config.stop_id.clone()),
                ("minutesBefore", self.config.minutes_before.to_string()),
                ("minutesAfter", self.config.minutes_after.to_string()),
            ])
            .send()
            .instrument(info_span!("Fetching departures"))
            .await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::UpstreamStatus(response.status()));
        }

        let body = response
            .text()
            .instrument(info_span!("Reading body of response"))
            .await?;

        let board: GolemioDepartureBoard = serde_json::from_str(&body)
            .map_err(|source| FetchError::ParsingError { source, body })?;

        info!("got {} departures", board.departures.len());

        Ok(board)
    }
}
