use serde::{Deserialize, Serialize};

use crate::core::Viewport;

/// Longitude/latitude to pixel projection supplied by the geometry layer.
pub trait GeoProjection {
    /// Returns `None` for positions the projection cannot place.
    fn project(&self, longitude: f64, latitude: f64) -> Option<(f64, f64)>;
}

/// Spherical Mercator centered on a geographic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjection {
    pub center_longitude: f64,
    pub center_latitude: f64,
    pub scale: f64,
    pub translate: (f64, f64),
}

impl MercatorProjection {
    /// Middle East framing used by the conflict map.
    #[must_use]
    pub fn middle_east(viewport: Viewport) -> Self {
        Self {
            center_longitude: 40.0,
            center_latitude: 28.0,
            scale: 850.0,
            translate: viewport.center(),
        }
    }

    fn raw(longitude: f64, latitude: f64) -> (f64, f64) {
        let lambda = longitude.to_radians();
        let phi = latitude.to_radians();
        (lambda, (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln())
    }
}

impl GeoProjection for MercatorProjection {
    fn project(&self, longitude: f64, latitude: f64) -> Option<(f64, f64)> {
        if !longitude.is_finite() || !latitude.is_finite() || latitude.abs() >= 90.0 {
            return None;
        }
        let (x, y) = Self::raw(longitude, latitude);
        let (center_x, center_y) = Self::raw(self.center_longitude, self.center_latitude);
        let px = self.translate.0 + (x - center_x) * self.scale;
        let py = self.translate.1 - (y - center_y) * self.scale;
        (px.is_finite() && py.is_finite()).then_some((px, py))
    }
}

/// Uniform scale `k` followed by a translation, applied to projected pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };
    pub const MIN_SCALE: f64 = 1.0;
    pub const MAX_SCALE: f64 = 8.0;

    /// Multiplies the scale by `factor` around `center`, clamped to
    /// `MIN_SCALE..=MAX_SCALE`. A non-positive or non-finite factor is ignored.
    #[must_use]
    pub fn zoomed_about(self, factor: f64, center: (f64, f64)) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let k = (self.k * factor).clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        Self {
            k,
            x: center.0 - k * center.0,
            y: center.1 - k * center.1,
        }
    }

    #[must_use]
    pub fn apply(self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

/// A projection followed by a zoom transform.
pub struct ZoomedProjection<'p> {
    pub projection: &'p dyn GeoProjection,
    pub zoom: ZoomTransform,
}

impl GeoProjection for ZoomedProjection<'_> {
    fn project(&self, longitude: f64, latitude: f64) -> Option<(f64, f64)> {
        self.projection
            .project(longitude, latitude)
            .map(|point| self.zoom.apply(point))
    }
}

/// Area-weighted centroid of planar rings. Rings wound against the outer
/// ring subtract, so holes pull the centroid away from themselves.
///
/// Degenerate outlines fall back to the mean of their vertices.
#[must_use]
pub fn planar_centroid(rings: &[Vec<(f64, f64)>]) -> Option<(f64, f64)> {
    let (mut double_area, mut moment_x, mut moment_y) = (0.0, 0.0, 0.0);
    for ring in rings {
        let next = ring.iter().cycle().skip(1);
        for (&(x0, y0), &(x1, y1)) in ring.iter().zip(next) {
            let cross = x0 * y1 - x1 * y0;
            double_area += cross;
            moment_x += (x0 + x1) * cross;
            moment_y += (y0 + y1) * cross;
        }
    }
    if double_area.abs() > f64::EPSILON {
        return Some((
            moment_x / (3.0 * double_area),
            moment_y / (3.0 * double_area),
        ));
    }
    let count = rings.iter().map(Vec::len).sum::<usize>();
    if count == 0 {
        return None;
    }
    let (sum_x, sum_y) = rings
        .iter()
        .flatten()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    Some((sum_x / count as f64, sum_y / count as f64))
}

#[cfg(test)]
mod tests {
    use super::{GeoProjection, MercatorProjection, ZoomTransform, ZoomedProjection, planar_centroid};
    use crate::core::Viewport;

    #[test]
    fn center_projects_to_translate_point() {
        let projection = MercatorProjection::middle_east(Viewport::new(825, 550));
        let (x, y) = projection.project(40.0, 28.0).expect("center");
        assert!((x - 412.5).abs() < 1e-9);
        assert!((y - 275.0).abs() < 1e-9);
    }

    #[test]
    fn north_and_east_move_up_and_right() {
        let projection = MercatorProjection::middle_east(Viewport::new(825, 550));
        let (x, y) = projection.project(45.0, 33.0).expect("point");
        assert!(x > 412.5);
        assert!(y < 275.0);
        assert!(projection.project(0.0, 90.0).is_none());
    }

    #[test]
    fn zoom_is_clamped_and_centred() {
        let center = (412.5, 275.0);
        let zoomed = ZoomTransform::IDENTITY.zoomed_about(1.5, center);
        assert!((zoomed.k - 1.5).abs() < 1e-12);
        let (x, y) = zoomed.apply(center);
        assert!((x - center.0).abs() < 1e-9);
        assert!((y - center.1).abs() < 1e-9);

        let mut deep = ZoomTransform::IDENTITY;
        for _ in 0..10 {
            deep = deep.zoomed_about(1.5, center);
        }
        assert_eq!(deep.k, ZoomTransform::MAX_SCALE);
        assert!(ZoomTransform::IDENTITY.zoomed_about(0.667, center).is_identity());
        assert_eq!(deep.zoomed_about(f64::NAN, center), deep);
    }

    #[test]
    fn zoomed_projection_scales_away_from_the_centre() {
        let base = MercatorProjection::middle_east(Viewport::new(825, 550));
        let zoomed = ZoomedProjection {
            projection: &base,
            zoom: ZoomTransform::IDENTITY.zoomed_about(2.0, (412.5, 275.0)),
        };
        let (bx, _) = base.project(45.0, 28.0).expect("base");
        let (zx, _) = zoomed.project(45.0, 28.0).expect("zoomed");
        assert!(((zx - 412.5) - 2.0 * (bx - 412.5)).abs() < 1e-9);
    }

    #[test]
    fn centroid_weights_by_area_and_subtracts_holes() {
        let square = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let (x, y) = planar_centroid(&[square.clone()]).expect("centroid");
        assert!((x - 2.0).abs() < 1e-12 && (y - 2.0).abs() < 1e-12);

        let hole = vec![(2.0, 0.0), (2.0, 4.0), (4.0, 4.0), (4.0, 0.0)];
        let (x, _) = planar_centroid(&[square, hole]).expect("with hole");
        assert!((x - 1.0).abs() < 1e-12);

        let line = vec![(0.0, 0.0), (2.0, 2.0), (4.0, 4.0)];
        assert_eq!(planar_centroid(&[line]), Some((2.0, 2.0)));
        assert_eq!(planar_centroid(&[]), None);
    }
}
