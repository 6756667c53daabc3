use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> DashboardResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(DashboardError::InvalidData(format!(
                "color `{hex}` must be #rrggbb"
            )));
        }
        let channel = |range: std::ops::Range<usize>| -> DashboardResult<f64> {
            u8::from_str_radix(&digits[range], 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|e| DashboardError::InvalidData(format!("color `{hex}`: {e}")))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> DashboardResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DashboardError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

/// Annular sector around `(cx, cy)`; angles in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPrimitive {
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fill: Color,
}

/// Chord ribbon joining two angular spans on a circle of `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonPrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub source_angles: (f64, f64),
    pub target_angles: (f64, f64),
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
}

/// Closed filled outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonPrimitive {
    pub points: Vec<(f64, f64)>,
    pub fill: Color,
    pub stroke: Option<Color>,
}

/// Outline made of closed rings filled with the even-odd rule, so inner
/// rings cut holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub rings: Vec<Vec<(f64, f64)>>,
    pub fill: Color,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

/// Closed band between `lower` and `upper`, both sampled at the same x positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPrimitive {
    pub upper: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }
}

/// One drawable mark. Every keyed element of a chart is one primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
    Arc(ArcPrimitive),
    Ribbon(RibbonPrimitive),
    Polyline(PolylinePrimitive),
    Polygon(PolygonPrimitive),
    Path(PathPrimitive),
    Area(AreaPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    /// The collapsed state elements enter from and exit to.
    ///
    /// Circles shrink to a point, rects to zero height on their baseline,
    /// arcs to a zero-angle sector at their start, areas onto their lower
    /// edge; the remaining shapes fade out.
    #[must_use]
    pub fn neutral(&self) -> Self {
        match self {
            Self::Circle(circle) => Self::Circle(CirclePrimitive {
                radius: 0.0,
                ..*circle
            }),
            Self::Rect(rect) => Self::Rect(RectPrimitive {
                y: rect.y + rect.height,
                height: 0.0,
                ..*rect
            }),
            Self::Arc(arc) => Self::Arc(ArcPrimitive {
                end_angle: arc.start_angle,
                ..*arc
            }),
            Self::Ribbon(ribbon) => Self::Ribbon(RibbonPrimitive {
                fill: ribbon.fill.with_alpha(0.0),
                ..*ribbon
            }),
            Self::Polyline(line) => Self::Polyline(PolylinePrimitive {
                color: line.color.with_alpha(0.0),
                ..line.clone()
            }),
            Self::Polygon(polygon) => Self::Polygon(PolygonPrimitive {
                fill: polygon.fill.with_alpha(0.0),
                stroke: polygon.stroke.map(|stroke| stroke.with_alpha(0.0)),
                ..polygon.clone()
            }),
            Self::Path(path) => Self::Path(PathPrimitive {
                fill: path.fill.with_alpha(0.0),
                stroke: path.stroke.map(|stroke| stroke.with_alpha(0.0)),
                ..path.clone()
            }),
            Self::Area(area) => Self::Area(AreaPrimitive {
                upper: area.lower.clone(),
                ..area.clone()
            }),
            Self::Text(text) => Self::Text(TextPrimitive {
                color: text.color.with_alpha(0.0),
                ..text.clone()
            }),
        }
    }

    pub fn validate(&self) -> DashboardResult<()> {
        match self {
            Self::Circle(circle) => {
                require_finite("circle", &[circle.cx, circle.cy, circle.radius])?;
                require_non_negative("circle radius", circle.radius)?;
                circle.fill.validate()
            }
            Self::Rect(rect) => {
                require_finite("rect", &[rect.x, rect.y, rect.width, rect.height])?;
                require_non_negative("rect width", rect.width)?;
                require_non_negative("rect height", rect.height)?;
                rect.fill.validate()
            }
            Self::Arc(arc) => {
                require_finite(
                    "arc",
                    &[
                        arc.cx,
                        arc.cy,
                        arc.inner_radius,
                        arc.outer_radius,
                        arc.start_angle,
                        arc.end_angle,
                    ],
                )?;
                if arc.inner_radius < 0.0 || arc.outer_radius < arc.inner_radius {
                    return Err(DashboardError::InvalidData(
                        "arc radii must satisfy 0 <= inner <= outer".to_owned(),
                    ));
                }
                if arc.end_angle < arc.start_angle {
                    return Err(DashboardError::InvalidData(
                        "arc end angle must be >= start angle".to_owned(),
                    ));
                }
                arc.fill.validate()
            }
            Self::Ribbon(ribbon) => {
                require_finite(
                    "ribbon",
                    &[
                        ribbon.cx,
                        ribbon.cy,
                        ribbon.radius,
                        ribbon.source_angles.0,
                        ribbon.source_angles.1,
                        ribbon.target_angles.0,
                        ribbon.target_angles.1,
                    ],
                )?;
                require_non_negative("ribbon radius", ribbon.radius)?;
                ribbon.fill.validate()
            }
            Self::Polyline(line) => {
                for (x, y) in &line.points {
                    require_finite("polyline point", &[*x, *y])?;
                }
                if !line.stroke_width.is_finite() || line.stroke_width <= 0.0 {
                    return Err(DashboardError::InvalidData(
                        "polyline stroke width must be finite and > 0".to_owned(),
                    ));
                }
                line.color.validate()
            }
            Self::Polygon(polygon) => {
                if polygon.points.len() < 3 {
                    return Err(DashboardError::InvalidData(
                        "polygon needs at least three points".to_owned(),
                    ));
                }
                for (x, y) in &polygon.points {
                    require_finite("polygon point", &[*x, *y])?;
                }
                if let Some(stroke) = polygon.stroke {
                    stroke.validate()?;
                }
                polygon.fill.validate()
            }
            Self::Path(path) => {
                if path.rings.is_empty() || path.rings.iter().any(|ring| ring.len() < 3) {
                    return Err(DashboardError::InvalidData(
                        "path needs at least one ring of three points".to_owned(),
                    ));
                }
                for (x, y) in path.rings.iter().flatten() {
                    require_finite("path point", &[*x, *y])?;
                }
                if !path.stroke_width.is_finite() || path.stroke_width < 0.0 {
                    return Err(DashboardError::InvalidData(
                        "path stroke width must be finite and >= 0".to_owned(),
                    ));
                }
                if let Some(stroke) = path.stroke {
                    stroke.validate()?;
                }
                path.fill.validate()
            }
            Self::Area(area) => {
                if area.upper.len() != area.lower.len() {
                    return Err(DashboardError::InvalidData(
                        "area upper and lower edges must have equal length".to_owned(),
                    ));
                }
                for (x, y) in area.upper.iter().chain(&area.lower) {
                    require_finite("area point", &[*x, *y])?;
                }
                area.fill.validate()
            }
            Self::Text(text) => {
                if text.text.is_empty() {
                    return Err(DashboardError::InvalidData(
                        "text primitive must not be empty".to_owned(),
                    ));
                }
                require_finite("text", &[text.x, text.y])?;
                if !text.font_size_px.is_finite() || text.font_size_px <= 0.0 {
                    return Err(DashboardError::InvalidData(
                        "font size must be finite and > 0".to_owned(),
                    ));
                }
                text.color.validate()
            }
        }
    }
}

fn require_finite(what: &str, values: &[f64]) -> DashboardResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        return Ok(());
    }
    Err(DashboardError::InvalidData(format!(
        "{what} coordinates must be finite"
    )))
}

fn require_non_negative(what: &str, value: f64) -> DashboardResult<()> {
    if value < 0.0 {
        return Err(DashboardError::InvalidData(format!("{what} must be >= 0")));
    }
    Ok(())
}
