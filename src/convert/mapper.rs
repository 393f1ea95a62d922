use log::debug;

use super::tracks::TrackGeometry;
use crate::error::{ConvertError, Result};
use crate::layout::Axis;

/// Added before rounding so that exact `.5` ties round up and small
/// floating-point errors from the division are absorbed.
pub const ROUNDING_BIAS: f64 = 1e-9;

/// Maps physical coordinates along one axis onto grid-line indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AxisMap {
    pub origin: i64,
    pub step: i64,
    pub extent: i64,
}

impl AxisMap {
    /// The grid line nearest to `p`, clamped to `[0, extent]`.
    pub fn map(&self, p: i64) -> i64 {
        let idx = ((p - self.origin) as f64 / self.step as f64 + ROUNDING_BIAS).round() as i64;
        idx.clamp(0, self.extent)
    }
}

/// Coordinate mapping anchored on one reference layer per axis.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GridMapper {
    x: AxisMap,
    y: AxisMap,
    x_ref: usize,
    y_ref: usize,
}

impl GridMapper {
    pub fn new(geom: &TrackGeometry) -> Result<Self> {
        let (x_ref, x) = reference(geom, Axis::X)?;
        let (y_ref, y) = reference(geom, Axis::Y)?;
        debug!(
            "reference layers: x from layer {x_ref} ({}, {}), y from layer {y_ref} ({}, {})",
            x.origin, x.step, y.origin, y.step
        );
        Ok(Self { x, y, x_ref, y_ref })
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> &AxisMap {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// The layer whose tracks define the origin and step of `axis`.
    #[inline]
    pub fn reference_layer(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x_ref,
            Axis::Y => self.y_ref,
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x.extent
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y.extent
    }

    #[inline]
    pub fn map_x(&self, x: i64) -> i64 {
        self.x.map(x)
    }

    #[inline]
    pub fn map_y(&self, y: i64) -> i64 {
        self.y.map(y)
    }

    #[inline]
    pub fn map_point(&self, x: i64, y: i64) -> (i64, i64) {
        (self.map_x(x), self.map_y(y))
    }

    /// Whether a mapped point addresses an actual grid cell.
    #[inline]
    pub fn on_grid(&self, x: i64, y: i64) -> bool {
        0 <= x && x < self.width() && 0 <= y && y < self.height()
    }
}

/// Picks the lowest layer spaced along `axis` whose track count equals the
/// extent of that axis.
fn reference(geom: &TrackGeometry, axis: Axis) -> Result<(usize, AxisMap)> {
    let extent = geom.extent(axis);
    geom.layers
        .iter()
        .enumerate()
        .find(|(_, layer)| layer.dir.spacing_axis() == axis && layer.count == extent)
        .map(|(i, layer)| {
            (
                i,
                AxisMap {
                    origin: layer.start,
                    step: layer.spacing,
                    extent,
                },
            )
        })
        .ok_or(ConvertError::NoReferenceLayer { axis })
}
