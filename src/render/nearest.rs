//! Snapping an arbitrary pixel position onto an already rendered route
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use super::{RenderError, geometry::NormalizedPoint};

/// The `d` attribute of a `<path>` element, wherever it sits among the other attributes
static PATH_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<path\b[^>]*?\sd\s*=\s*"([^"]*)""#).expect("path data regex is valid")
});

/// Returns the coordinate of any `<path>` in `svg` closest to `(x, y)`.
///
/// Every number pair in a path's `d` attribute is a candidate, command letters are
/// skipped. `None` if the document has no path coordinates at all.
pub fn nearest_path_coordinate(
    svg: &str,
    x: f64,
    y: f64,
) -> Result<Option<NormalizedPoint>, RenderError> {
    let mut closest: Option<(f64, NormalizedPoint)> = None;

    for captures in PATH_DATA.captures_iter(svg) {
        let data = &captures[1];

        for point in path_coordinates(data)? {
            let distance = (point.x - x).hypot(point.y - y);
            if closest.is_none_or(|(best, _)| distance < best) {
                closest = Some((distance, point));
            }
        }
    }

    Ok(closest.map(|(_, point)| point))
}

fn path_coordinates(data: &str) -> Result<Vec<NormalizedPoint>, RenderError> {
    let numbers: Vec<f64> = data
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty() && !token.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| RenderError::MalformedPath(data.to_string()))
        })
        .try_collect()?;

    if numbers.len() % 2 != 0 {
        return Err(RenderError::MalformedPath(data.to_string()));
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|pair| NormalizedPoint {
            x: pair[0],
            y: pair[1],
        })
        .collect())
}
