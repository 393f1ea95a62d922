use crate::error::{ConvertError, Result};
use crate::layout::{Axis, Direction, Span, Track};

/// A layer's track definition together with the number of tracks that fit
/// on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LayerTracks {
    pub start: i64,
    pub spacing: i64,
    pub dir: Direction,
    pub count: i64,
}

impl LayerTracks {
    /// Physical coordinates of every track on this layer, along its spacing axis.
    pub fn positions(&self) -> impl Iterator<Item = i64> {
        let LayerTracks { start, spacing, .. } = *self;
        (0..self.count).map(move |i| start + i * spacing)
    }
}

/// Grid extents derived from the per-layer track definitions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TrackGeometry {
    /// Number of grid lines along x.
    pub width: i64,
    /// Number of grid lines along y.
    pub height: i64,
    pub layers: Vec<LayerTracks>,
}

impl TrackGeometry {
    pub fn analyze(tracks: &[Track], x: Span, y: Span) -> Result<Self> {
        let mut width = 0;
        let mut height = 0;
        let mut layers = Vec::with_capacity(tracks.len());

        for (layer, track) in tracks.iter().enumerate() {
            if track.spacing <= 0 {
                return Err(ConvertError::DegenerateTrack {
                    layer,
                    spacing: track.spacing,
                });
            }
            let far = match track.dir.spacing_axis() {
                Axis::X => x.stop(),
                Axis::Y => y.stop(),
            };
            let count = track_count(track.start, track.spacing, far);
            if count <= 0 {
                return Err(ConvertError::NoTracks { layer });
            }
            match track.dir {
                Direction::Horizontal => height = height.max(count),
                Direction::Vertical => width = width.max(count),
            }
            layers.push(LayerTracks {
                start: track.start,
                spacing: track.spacing,
                dir: track.dir,
                count,
            });
        }

        Ok(Self {
            width,
            height,
            layers,
        })
    }

    #[inline]
    pub fn extent(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layer(&self, layer: usize) -> Option<&LayerTracks> {
        self.layers.get(layer)
    }
}

/// Number of tracks starting at `start` and repeating every `spacing` that
/// fit strictly before `far`, leaving room for a unit-width wire.
pub(crate) fn track_count(start: i64, spacing: i64, far: i64) -> i64 {
    let mut count = (far - start).div_euclid(spacing);
    if start + spacing * count + 1 < far {
        count += 1;
    }
    count
}
