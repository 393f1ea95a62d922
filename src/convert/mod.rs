//! Normalization of physical-coordinate layouts onto a uniform track grid.
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use log::{info, log_enabled, trace, warn, Level};

use crate::error::Result;
use crate::layout::{Layout, Span, Track};

use self::avail::TrackAvailability;
use self::mapper::GridMapper;
use self::nets::NetProjector;
use self::obstacles::ObstacleProjector;
use self::tracks::TrackGeometry;

pub mod avail;
pub mod mapper;
pub mod nets;
pub mod obstacles;
pub mod tracks;

/// Net pruning policy applied while converting.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Builder)]
#[builder(derive(Debug))]
pub struct ConvertOptions {
    /// Drop nets that have no pins.
    #[builder(default)]
    pub remove_empty_net: bool,
    /// Drop nets with a pin that has no access point on the bottom layer.
    #[builder(default)]
    pub remove_non_bottom_pins: bool,
}

impl ConvertOptions {
    #[inline]
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder::default()
    }
}

/// Diagnostic counters collected during a conversion.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ConvertReport {
    pub width: i64,
    pub height: i64,
    pub input_obstacles: usize,
    pub redundant_obstacles: usize,
    pub track_obstacles: usize,
    pub off_grid_tracks: usize,
    pub empty_nets: usize,
    pub unreachable_nets: usize,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    /// The grid-coordinate layout.
    pub layout: Layout,
    pub report: ConvertReport,
}

impl Display for ConvertReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "grid: {} x {}", self.width, self.height)?;
        writeln!(
            f,
            "redundant obstacles: {} / {}",
            self.redundant_obstacles, self.input_obstacles
        )?;
        writeln!(f, "track obstacles: {}", self.track_obstacles)?;
        writeln!(f, "off-grid tracks: {}", self.off_grid_tracks)?;
        write!(
            f,
            "dropped nets: {} empty, {} unreachable",
            self.empty_nets, self.unreachable_nets
        )
    }
}

/// Re-expresses `layout` on the uniform grid defined by its tracks.
///
/// The input is left untouched. Either the whole layout converts or an
/// error is returned.
pub fn convert(layout: &Layout, opts: &ConvertOptions) -> Result<Conversion> {
    layout.validate()?;

    let geom = TrackGeometry::analyze(&layout.tracks, layout.x, layout.y)?;
    let mapper = GridMapper::new(&geom)?;
    let avail = TrackAvailability::build(&geom, &mapper);
    if avail.off_grid() > 0 {
        warn!(
            "{} tracks fall past the last grid line and are ignored",
            avail.off_grid()
        );
    }
    if log_enabled!(Level::Trace) {
        for layer in 0..avail.num_layers() {
            trace!("layer {layer} availability:\n{}", avail.render(layer));
        }
    }

    let obstacles = ObstacleProjector::new(&geom, &mapper, &avail).run(&layout.obstacles)?;
    let nets = NetProjector::new(&mapper, opts).run(&layout.nets)?;

    let (width, height) = (mapper.width(), mapper.height());
    let tracks = layout
        .tracks
        .iter()
        .map(|track| Track::new(0, 1, track.dir))
        .collect();
    let converted = Layout::new(
        Span::new(0, width),
        Span::new(0, height),
        tracks,
        obstacles.obstacles,
        nets.nets,
    );
    converted.validate()?;
    converted.check_bounds()?;

    let report = ConvertReport {
        width,
        height,
        input_obstacles: layout.obstacles.len(),
        redundant_obstacles: obstacles.redundant,
        track_obstacles: obstacles.synthesized,
        off_grid_tracks: avail.off_grid(),
        empty_nets: nets.empty,
        unreachable_nets: nets.unreachable,
    };
    info!(
        "Converted layout to a {} x {} grid with {} nets.",
        width,
        height,
        converted.nets.len()
    );

    Ok(Conversion {
        layout: converted,
        report,
    })
}
