//! Reading route shapes and stop tables from CSV
use std::{fs::File, io, path::Path};

use itertools::Itertools;
use tracing::{debug, info};

use crate::model::{
    named_stop::NamedStop,
    shape::{GeoPoint, ShapeRow},
};

use super::RenderError;

/// Reads `shape_pt_sequence,lat,lon` rows and returns the points in sequence order
#[tracing::instrument(err, skip_all, fields(path = %path.as_ref().display()))]
pub fn read_shape<P: AsRef<Path>>(path: P) -> Result<Vec<GeoPoint>, RenderError> {
    let file = open(path.as_ref())?;
    let points = read_shape_from(file)?;

    info!("read {} shape points", points.len());

    Ok(points)
}

pub fn read_shape_from<R: io::Read>(rdr: R) -> Result<Vec<GeoPoint>, RenderError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let rows: Vec<ShapeRow> = reader.deserialize::<ShapeRow>().try_collect()?;

    debug!("sorting {} rows by shape_pt_sequence", rows.len());

    Ok(rows
        .iter()
        .sorted_by_key(|r| r.shape_pt_sequence)
        .map(GeoPoint::from)
        .collect_vec())
}

/// Reads a `name,lat,lon` stop table
#[tracing::instrument(err, skip_all, fields(path = %path.as_ref().display()))]
pub fn read_stops<P: AsRef<Path>>(path: P) -> Result<Vec<NamedStop>, RenderError> {
    let file = open(path.as_ref())?;
    let stops = read_stops_from(file)?;

    info!("read {} stops", stops.len());

    Ok(stops)
}

pub fn read_stops_from<R: io::Read>(rdr: R) -> Result<Vec<NamedStop>, RenderError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let stops: Vec<NamedStop> = reader.deserialize::<NamedStop>().try_collect()?;

    Ok(stops)
}

fn open(path: &Path) -> Result<File, RenderError> {
    File::open(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
