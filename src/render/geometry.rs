use crate::model::shape::GeoPoint;

use super::RenderError;

/// Axis aligned lat/lon extent of a route shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[GeoPoint]) -> Result<Self, RenderError> {
        let first = points.first().ok_or(RenderError::EmptyShape)?;

        let init = BoundingBox {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };

        Ok(points.iter().fold(init, |bbox, p| BoundingBox {
            min_lat: bbox.min_lat.min(p.lat),
            max_lat: bbox.max_lat.max(p.lat),
            min_lon: bbox.min_lon.min(p.lon),
            max_lon: bbox.max_lon.max(p.lon),
        }))
    }

    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Pixel size of the drawing. `margin` is kept free on every side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Canvas {
    /// Sizes the canvas so the drawing is `desired_width` wide and keeps the aspect
    /// ratio of the bounding box.
    pub fn fit(bbox: &BoundingBox, desired_width: u32, margin: u32) -> Result<Self, RenderError> {
        let lat_range = bbox.lat_range();
        let lon_range = bbox.lon_range();

        // both ranges end up as divisors during normalization
        if lat_range <= 0.0 || lon_range <= 0.0 {
            return Err(RenderError::DegenerateBoundingBox {
                lat_range,
                lon_range,
            });
        }

        let too_large = || RenderError::CanvasTooLarge {
            desired_width,
            margin,
        };

        let aspect_ratio = lat_range / lon_range;
        let drawing_height = (desired_width as f64 * aspect_ratio).trunc();
        if !drawing_height.is_finite() || drawing_height > u32::MAX as f64 {
            return Err(too_large());
        }

        let margins = margin.checked_mul(2).ok_or_else(too_large)?;

        Ok(Canvas {
            width: desired_width.checked_add(margins).ok_or_else(too_large)?,
            height: (drawing_height as u32)
                .checked_add(margins)
                .ok_or_else(too_large)?,
            margin,
        })
    }
}

/// A point in SVG pixel space, y grows downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// Maps geographic coordinates onto one canvas.
/// Everything drawn in the same picture has to go through the same projection.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    bbox: BoundingBox,
    canvas: Canvas,
}

impl Projection {
    pub fn new(bbox: BoundingBox, desired_width: u32, margin: u32) -> Result<Self, RenderError> {
        let canvas = Canvas::fit(&bbox, desired_width, margin)?;

        Ok(Projection { bbox, canvas })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn project(&self, point: &GeoPoint) -> NormalizedPoint {
        let margin = self.canvas.margin as f64;
        let inner_width = self.canvas.width as f64 - 2.0 * margin;
        let inner_height = self.canvas.height as f64 - 2.0 * margin;

        let x_ratio = (point.lon - self.bbox.min_lon) / self.bbox.lon_range();
        let y_ratio = (point.lat - self.bbox.min_lat) / self.bbox.lat_range();

        NormalizedPoint {
            x: margin + x_ratio * inner_width,
            y: margin + (1.0 - y_ratio) * inner_height,
        }
    }

    /// Like [`Projection::project`] but pulls points lying outside the bounding box
    /// onto the nearest edge of the drawing area. Returns whether the point was moved.
    pub fn project_clamped(&self, point: &GeoPoint) -> (NormalizedPoint, bool) {
        let margin = self.canvas.margin as f64;
        let projected = self.project(point);

        let clamped = NormalizedPoint {
            x: projected.x.clamp(margin, self.canvas.width as f64 - margin),
            y: projected.y.clamp(margin, self.canvas.height as f64 - margin),
        };

        (clamped, clamped != projected)
    }

    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<NormalizedPoint> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::named_stop::default_stops;

    fn route() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(50.068031, 14.346667),
            GeoPoint::new(50.0684, 14.35),
            GeoPoint::new(50.06855, 14.3543),
            GeoPoint::new(50.069565, 14.362923),
            GeoPoint::new(50.070042, 14.37063),
            GeoPoint::new(50.0712, 14.3755),
            GeoPoint::new(50.070702, 14.380618),
        ]
    }

    #[test]
    fn test_bounding_box() -> Result<(), anyhow::Error> {
        let bbox = BoundingBox::from_points(&route())?;

        assert_eq!(bbox.min_lat, 50.068031);
        assert_eq!(bbox.max_lat, 50.0712);
        assert_eq!(bbox.min_lon, 14.346667);
        assert_eq!(bbox.max_lon, 14.380618);

        Ok(())
    }

    #[test]
    fn test_empty_shape_has_no_bounding_box() {
        assert!(matches!(
            BoundingBox::from_points(&[]),
            Err(RenderError::EmptyShape)
        ));
    }

    #[test]
    fn test_canvas_keeps_aspect_ratio() -> Result<(), anyhow::Error> {
        let bbox = BoundingBox {
            min_lat: 50.0,
            max_lat: 50.5,
            min_lon: 14.0,
            max_lon: 15.0,
        };

        let canvas = Canvas::fit(&bbox, 800, 50)?;

        assert_eq!(canvas.width, 900);
        assert_eq!(canvas.height, 500);

        Ok(())
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        let points = vec![GeoPoint::new(50.06, 14.35), GeoPoint::new(50.07, 14.38)];
        let bbox = BoundingBox::from_points(&points).unwrap();

        assert!(matches!(
            Projection::new(bbox, 800, u32::MAX / 2),
            Err(RenderError::CanvasTooLarge { .. })
        ));
        assert!(matches!(
            Projection::new(bbox, u32::MAX, 50),
            Err(RenderError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn test_extreme_aspect_ratio_is_an_error() {
        let points = vec![GeoPoint::new(-80.0, 14.0), GeoPoint::new(80.0, 14.0000001)];
        let bbox = BoundingBox::from_points(&points).unwrap();

        assert!(matches!(
            Projection::new(bbox, 800, 50),
            Err(RenderError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn test_same_longitude_is_degenerate() {
        let points = vec![GeoPoint::new(50.06, 14.35), GeoPoint::new(50.07, 14.35)];
        let bbox = BoundingBox::from_points(&points).unwrap();

        assert!(matches!(
            Projection::new(bbox, 800, 50),
            Err(RenderError::DegenerateBoundingBox { lon_range, .. }) if lon_range == 0.0
        ));
    }

    #[test]
    fn test_corners_map_to_margins() -> Result<(), anyhow::Error> {
        let bbox = BoundingBox::from_points(&route())?;
        let projection = Projection::new(bbox, 800, 50)?;
        let canvas = *projection.canvas();

        let min = projection.project(&GeoPoint::new(bbox.min_lat, bbox.min_lon));
        assert_eq!(min.x, 50.0);
        assert_eq!(min.y, canvas.height as f64 - 50.0);

        let max = projection.project(&GeoPoint::new(bbox.max_lat, bbox.max_lon));
        assert_eq!(max.x, canvas.width as f64 - 50.0);
        assert_eq!(max.y, 50.0);

        Ok(())
    }

    #[test]
    fn test_route_and_stops_stay_inside_margins() -> Result<(), anyhow::Error> {
        let points = route();
        let bbox = BoundingBox::from_points(&points)?;
        let projection = Projection::new(bbox, 640, 25)?;
        let canvas = *projection.canvas();

        let stops = default_stops();
        let projected = projection
            .project_all(&points)
            .into_iter()
            .chain(stops.iter().map(|s| projection.project(&s.point())));

        let margin = canvas.margin as f64;
        for p in projected {
            assert!(p.x >= margin && p.x <= canvas.width as f64 - margin, "{p:?}");
            assert!(p.y >= margin && p.y <= canvas.height as f64 - margin, "{p:?}");
        }

        Ok(())
    }

    #[test]
    fn test_clamped_projection_keeps_points_on_canvas() -> Result<(), anyhow::Error> {
        let bbox = BoundingBox::from_points(&route())?;
        let projection = Projection::new(bbox, 800, 50)?;
        let canvas = *projection.canvas();

        let (inside, moved) = projection.project_clamped(&GeoPoint::new(50.069565, 14.362923));
        assert!(!moved);
        assert_eq!(inside, projection.project(&GeoPoint::new(50.069565, 14.362923)));

        let (south_west, moved) = projection.project_clamped(&GeoPoint::new(50.0, 14.0));
        assert!(moved);
        assert_eq!(south_west.x, 50.0);
        assert_eq!(south_west.y, canvas.height as f64 - 50.0);

        Ok(())
    }

    #[test]
    fn test_north_is_up() -> Result<(), anyhow::Error> {
        let bbox = BoundingBox::from_points(&route())?;
        let projection = Projection::new(bbox, 800, 50)?;

        let south = projection.project(&GeoPoint::new(50.0685, 14.36));
        let north = projection.project(&GeoPoint::new(50.0705, 14.36));

        assert!(north.y < south.y);

        Ok(())
    }
}
