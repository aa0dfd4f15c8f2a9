use std::io;

use tracing::warn;

use crate::model::{named_stop::NamedStop, shape::GeoPoint};

use super::{
    RenderError,
    geometry::{BoundingBox, Canvas, NormalizedPoint, Projection},
};

const STOP_RADIUS: f64 = 5.;
const LABEL_OFFSET_X: f64 = 11.;
const LABEL_OFFSET_Y: f64 = 1.;
/// A bit steeper than 45° so long names don't overlap their neighbours
const LABEL_ROTATION: f64 = -55.;
const LABEL_FONT_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct StopMarker {
    pub name: String,
    pub center: NormalizedPoint,
}

/// A route shape and its stops projected onto one canvas
#[derive(Debug, Clone)]
pub struct RouteDrawing {
    pub canvas: Canvas,
    pub path: Vec<NormalizedPoint>,
    pub stops: Vec<StopMarker>,
}

impl RouteDrawing {
    pub fn new(
        points: &[GeoPoint],
        stops: &[NamedStop],
        desired_width: u32,
        margin: u32,
    ) -> Result<Self, RenderError> {
        let bbox = BoundingBox::from_points(points)?;
        let projection = Projection::new(bbox, desired_width, margin)?;

        let stops = stops
            .iter()
            .map(|stop| {
                let (center, moved) = projection.project_clamped(&stop.point());
                if moved {
                    warn!("stop {} lies outside the route, pinned to the edge", stop.name);
                }
                StopMarker {
                    name: stop.name.clone(),
                    center,
                }
            })
            .collect();

        Ok(RouteDrawing {
            canvas: *projection.canvas(),
            path: projection.project_all(points),
            stops,
        })
    }

    /// `M x0 y0 L x1 y1 L x2 y2 ...`
    pub fn path_data(&self) -> String {
        path_data(&self.path)
    }

    pub fn write_svg_to(&self, w: &mut dyn io::Write) -> io::Result<()> {
        writeln!(
            w,
            r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#,
            self.canvas.width, self.canvas.height
        )?;
        writeln!(
            w,
            r#"    <path d="{}" fill="none" stroke="black" />"#,
            self.path_data()
        )?;

        for stop in &self.stops {
            stop.write_svg_fragment_to(w)?;
        }

        writeln!(w, "</svg>")
    }

    pub fn to_svg_string(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec can't fail
        let _ = self.write_svg_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl StopMarker {
    fn write_svg_fragment_to(&self, w: &mut dyn io::Write) -> io::Result<()> {
        let NormalizedPoint { x: cx, y: cy } = self.center;

        writeln!(
            w,
            r#"    <circle cx="{cx}" cy="{cy}" r="{STOP_RADIUS}" fill="black" />"#
        )?;
        writeln!(
            w,
            r#"    <text x="{}" y="{}" font-size="{LABEL_FONT_SIZE}" transform="rotate({LABEL_ROTATION}, {cx}, {cy})">{}</text>"#,
            cx + LABEL_OFFSET_X,
            cy + LABEL_OFFSET_Y,
            escape_xml(&self.name)
        )
    }
}

pub fn path_data(points: &[NormalizedPoint]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{command} {} {}", p.x, p.y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
