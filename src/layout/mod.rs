//! In-memory representation of a routing testcase.
//!
//! The same types describe both the physical-coordinate input and the
//! grid-coordinate output of a conversion.
use std::fmt::{Display, Formatter};

use crate::error::{ConvertError, Result};

pub use self::net::{Net, Pin};

pub mod net;

/// A half-open interval `[start, stop)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    #[inline]
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> i64 {
        self.stop
    }

    #[inline]
    pub fn len(&self) -> i64 {
        self.stop - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    #[inline]
    pub fn contains(&self, p: i64) -> bool {
        self.start <= p && p < self.stop
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn other(&self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Preferred routing direction of a layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Tracks run along x and are spaced along y.
    Horizontal,
    /// Tracks run along y and are spaced along x.
    Vertical,
}

impl Direction {
    /// The axis along which consecutive tracks of this direction are spaced.
    #[inline]
    pub fn spacing_axis(&self) -> Axis {
        match self {
            Direction::Horizontal => Axis::Y,
            Direction::Vertical => Axis::X,
        }
    }

    /// The integer code used by the testcase format.
    pub fn code(&self) -> i64 {
        match self {
            Direction::Horizontal => 0,
            Direction::Vertical => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Direction::Horizontal),
            1 => Some(Direction::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Track {
    pub start: i64,
    pub spacing: i64,
    pub dir: Direction,
}

impl Track {
    pub fn new(start: i64, spacing: i64, dir: Direction) -> Self {
        Self {
            start,
            spacing,
            dir,
        }
    }
}

/// A point on a single layer.
///
/// Used for pin access points and for vias, where `layer` is the lower of
/// the two layers the via joins.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LayerPoint {
    pub x: i64,
    pub y: i64,
    pub layer: usize,
}

impl LayerPoint {
    #[inline]
    pub fn new(x: i64, y: i64, layer: usize) -> Self {
        Self { x, y, layer }
    }

    /// Whether the point addresses a cell of a `width × height` grid.
    pub fn is_inside(&self, width: i64, height: i64) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl Display for LayerPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.layer)
    }
}

/// An axis-aligned box `[x1, x2) × [y1, y2)` on a single layer.
///
/// Obstacles and wire segments are both stored this way.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LayerRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    pub layer: usize,
}

impl LayerRect {
    #[inline]
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64, layer: usize) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            layer,
        }
    }

    pub fn from_spans(x: Span, y: Span, layer: usize) -> Self {
        Self::new(x.start(), y.start(), x.stop(), y.stop(), layer)
    }

    #[inline]
    pub fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::X => Span::new(self.x1, self.x2),
            Axis::Y => Span::new(self.y1, self.y2),
        }
    }

    /// Whether the box is non-empty and lies inside `[0, width) × [0, height)`.
    pub fn is_inside(&self, width: i64, height: i64) -> bool {
        0 <= self.x1
            && self.x1 < self.x2
            && self.x2 <= width
            && 0 <= self.y1
            && self.y1 < self.y2
            && self.y2 <= height
    }
}

impl Display for LayerRect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.x1, self.y1, self.layer, self.x2, self.y2, self.layer
        )
    }
}

/// Total wirelength and via count, as reported in a testcase header.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RouteStats {
    pub wirelength: i64,
    pub vias: usize,
}

impl RouteStats {
    pub fn of_nets(nets: &[Net]) -> Self {
        Self {
            wirelength: nets.iter().map(Net::wirelength).sum(),
            vias: nets.iter().map(|net| net.vias.len()).sum(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layout {
    /// The `[h_start, h_end)` extent of the board.
    pub x: Span,
    /// The `[v_start, v_end)` extent of the board.
    pub y: Span,
    /// One entry per layer, indexed by layer.
    pub tracks: Vec<Track>,
    pub obstacles: Vec<LayerRect>,
    pub nets: Vec<Net>,
    pub stats: RouteStats,
}

impl Layout {
    /// Creates a layout whose statistics are computed from `nets`.
    pub fn new(
        x: Span,
        y: Span,
        tracks: Vec<Track>,
        obstacles: Vec<LayerRect>,
        nets: Vec<Net>,
    ) -> Self {
        let stats = RouteStats::of_nets(&nets);
        Self {
            x,
            y,
            tracks,
            obstacles,
            nets,
            stats,
        }
    }

    #[inline]
    pub fn layers(&self) -> usize {
        self.tracks.len()
    }

    /// Checks the structural invariants shared by physical and grid layouts:
    /// every layer index refers to an existing track entry and net ids are
    /// `0..N-1` in sequence order.
    pub fn validate(&self) -> Result<()> {
        let layers = self.layers();
        let check = |what: &'static str, layer: usize| {
            if layer < layers {
                Ok(())
            } else {
                Err(ConvertError::LayerOutOfRange {
                    what,
                    layer,
                    layers,
                })
            }
        };

        for obs in &self.obstacles {
            check("obstacle", obs.layer)?;
        }
        for (position, net) in self.nets.iter().enumerate() {
            if net.id != position {
                return Err(ConvertError::NetIdMismatch {
                    position,
                    id: net.id,
                });
            }
            for ap in net.pins.iter().flatten() {
                check("access point", ap.layer)?;
            }
            for via in &net.vias {
                check("via", via.layer)?;
            }
            for seg in net.h_segs.iter().chain(&net.v_segs) {
                check("segment", seg.layer)?;
            }
        }
        Ok(())
    }

    /// Checks that every obstacle, via and segment lies inside the bounding box.
    ///
    /// Only meaningful for grid layouts, whose box starts at the origin.
    pub fn check_bounds(&self) -> Result<()> {
        let (width, height) = (self.x.stop(), self.y.stop());
        if let Some(obs) = self
            .obstacles
            .iter()
            .find(|obs| !obs.is_inside(width, height))
        {
            return Err(ConvertError::IllegalObstacle(*obs));
        }
        for net in &self.nets {
            if let Some(via) = net.vias.iter().find(|via| !via.is_inside(width, height)) {
                return Err(ConvertError::IllegalVia(*via));
            }
            if let Some(seg) = net
                .h_segs
                .iter()
                .chain(&net.v_segs)
                .find(|seg| !seg.is_inside(width, height))
            {
                return Err(ConvertError::IllegalSegment(*seg));
            }
        }
        Ok(())
    }
}
