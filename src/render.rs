//! Turns a route shape CSV into an SVG line drawing with labelled stops
pub mod geometry;
pub mod nearest;
pub mod shape_loader;
pub mod svg;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::model::named_stop::NamedStop;
use shape_loader::read_shape;
use svg::RouteDrawing;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_MARGIN: u32 = 50;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("error accessing {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error reading csv")]
    Csv(#[from] csv::Error),

    #[error("route shape has no points")]
    EmptyShape,

    #[error(
        "route shape has no extent to scale (lat range {lat_range}, lon range {lon_range})"
    )]
    DegenerateBoundingBox { lat_range: f64, lon_range: f64 },

    #[error("canvas of width {desired_width} with margin {margin} doesn't fit in u32 pixels")]
    CanvasTooLarge { desired_width: u32, margin: u32 },

    #[error("malformed path data \"{0}\"")]
    MalformedPath(String),
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub desired_width: u32,
    pub margin: u32,
    pub stops: Vec<NamedStop>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            desired_width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            stops: crate::model::named_stop::default_stops(),
        }
    }
}

/// Reads the shape at `input` and writes the annotated drawing to `output`
#[tracing::instrument(err, skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn render_route(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<RouteDrawing, RenderError> {
    let points = read_shape(input)?;

    let drawing = RouteDrawing::new(
        &points,
        &options.stops,
        options.desired_width,
        options.margin,
    )?;

    let io_err = |source: std::io::Error| RenderError::Io {
        path: output.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(output).map_err(io_err)?);
    drawing.write_svg_to(&mut writer).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    info!(
        "wrote {}x{} drawing with {} points and {} stops",
        drawing.canvas.width,
        drawing.canvas.height,
        drawing.path.len(),
        drawing.stops.len()
    );

    Ok(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tram_board_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_render_route_writes_svg() -> Result<(), anyhow::Error> {
        let input = temp_path("render_shape.csv");
        let output = temp_path("render_shape.svg");
        fs::write(
            &input,
            "shape_pt_sequence,lat,lon\n\
             3,50.070702,14.380618\n\
             1,50.068031,14.346667\n\
             2,50.069565,14.362923\n",
        )?;

        let drawing = render_route(&input, &output, &RenderOptions::default())?;
        let svg = fs::read_to_string(&output)?;

        assert_eq!(drawing.path.len(), 3);
        assert_eq!(drawing.path[0].x, DEFAULT_MARGIN as f64);
        assert_eq!(svg.matches("<path ").count(), 1);
        assert_eq!(svg.matches("<circle ").count(), 5);
        assert_eq!(svg, drawing.to_svg_string());

        fs::remove_file(input)?;
        fs::remove_file(output)?;

        Ok(())
    }

    #[test]
    fn test_render_route_rejects_single_meridian() -> Result<(), anyhow::Error> {
        let input = temp_path("meridian_shape.csv");
        let output = temp_path("meridian_shape.svg");
        fs::write(
            &input,
            "shape_pt_sequence,lat,lon\n1,50.06,14.35\n2,50.07,14.35\n",
        )?;

        let result = render_route(&input, &output, &RenderOptions::default());

        assert!(matches!(
            result,
            Err(RenderError::DegenerateBoundingBox { .. })
        ));
        assert!(!output.exists());

        fs::remove_file(input)?;

        Ok(())
    }

    #[test]
    fn test_render_route_missing_input() {
        let result = render_route(
            Path::new("/nonexistent/shape.csv"),
            &temp_path("never_written.svg"),
            &RenderOptions::default(),
        );

        assert!(matches!(result, Err(RenderError::Io { .. })));
    }
}
