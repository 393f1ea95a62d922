use grid::Grid;
use log::debug;

use super::mapper::GridMapper;
use super::tracks::TrackGeometry;
use crate::layout::{Axis, Direction};

/// Which grid lines of each layer are backed by a physical track.
///
/// Each layer keeps a table indexed by grid line along its spacing axis that
/// records the physical coordinate of the track mapped onto that line.
/// Availability of a cell in the orthogonal direction is derived on demand,
/// so no `layers × width × height` volume is ever allocated.
#[derive(Debug, Clone)]
pub struct TrackAvailability {
    layers: Vec<LayerLines>,
    width: i64,
    height: i64,
    off_grid: usize,
}

#[derive(Debug, Clone)]
struct LayerLines {
    dir: Direction,
    coords: Vec<Option<i64>>,
}

impl TrackAvailability {
    pub fn build(geom: &TrackGeometry, mapper: &GridMapper) -> Self {
        let mut off_grid = 0;
        let layers = geom
            .layers
            .iter()
            .enumerate()
            .map(|(layer, tracks)| {
                let axis = tracks.dir.spacing_axis();
                let map = mapper.axis(axis);
                let mut coords = vec![None; map.extent as usize];
                for p in tracks.positions() {
                    let idx = map.map(p);
                    match coords.get_mut(idx as usize) {
                        Some(slot) => *slot = Some(p),
                        None => {
                            debug!("track at {axis} = {p} on layer {layer} falls past the last grid line");
                            off_grid += 1;
                        }
                    }
                }
                LayerLines {
                    dir: tracks.dir,
                    coords,
                }
            })
            .collect();

        Self {
            layers,
            width: mapper.width(),
            height: mapper.height(),
            off_grid,
        }
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// The physical position of the track recorded at grid line `idx` of `layer`.
    pub fn track_coord(&self, layer: usize, idx: i64) -> Option<i64> {
        if idx < 0 {
            return None;
        }
        self.layers
            .get(layer)
            .and_then(|l| l.coords.get(idx as usize).copied().flatten())
    }

    #[inline]
    pub fn is_line_available(&self, layer: usize, idx: i64) -> bool {
        self.track_coord(layer, idx).is_some()
    }

    /// Whether the grid cell `(x, y)` on `layer` lies on a physical track.
    pub fn is_available(&self, layer: usize, x: i64, y: i64) -> bool {
        if !(0 <= x && x < self.width && 0 <= y && y < self.height) {
            return false;
        }
        match self.layers.get(layer).map(|l| l.dir.spacing_axis()) {
            Some(Axis::X) => self.is_line_available(layer, x),
            Some(Axis::Y) => self.is_line_available(layer, y),
            None => false,
        }
    }

    /// Grid lines of `layer` with no physical track behind them.
    pub fn missing_lines(&self, layer: usize) -> impl Iterator<Item = i64> + '_ {
        self.layers
            .get(layer)
            .into_iter()
            .flat_map(|l| l.coords.iter().enumerate())
            .filter(|(_, coord)| coord.is_none())
            .map(|(idx, _)| idx as i64)
    }

    /// Number of physical tracks that map beyond the last grid line.
    #[inline]
    pub fn off_grid(&self) -> usize {
        self.off_grid
    }

    /// Materializes the availability of every cell of `layer`, indexed `[x][y]`.
    pub fn plane(&self, layer: usize) -> Grid<bool> {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut plane = Grid::init(width, height, false);
        for x in 0..width {
            for y in 0..height {
                if self.is_available(layer, x as i64, y as i64) {
                    if let Some(cell) = plane.get_mut(x, y) {
                        *cell = true;
                    }
                }
            }
        }
        plane
    }

    /// Text map of `layer` with the top row first: `.` for an available
    /// cell, `#` for a cell on a line without a track.
    pub fn render(&self, layer: usize) -> String {
        let plane = self.plane(layer);
        let (width, height) = plane.size();
        let mut out = String::with_capacity((width + 1) * height);
        for y in (0..height).rev() {
            out.extend((0..width).map(|x| match plane.get(x, y) {
                Some(true) => '.',
                _ => '#',
            }));
            out.push('\n');
        }
        out
    }
}
