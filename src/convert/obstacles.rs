use log::{debug, info};

use super::avail::TrackAvailability;
use super::mapper::GridMapper;
use super::tracks::TrackGeometry;
use crate::error::{ConvertError, Result};
use crate::layout::{Axis, Direction, LayerRect, Span};

/// Projects physical obstacles onto the grid and blocks grid lines that have
/// no physical track.
pub struct ObstacleProjector<'a> {
    geom: &'a TrackGeometry,
    mapper: &'a GridMapper,
    avail: &'a TrackAvailability,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProjectedObstacles {
    /// Projected real obstacles followed by synthesized track obstacles.
    pub obstacles: Vec<LayerRect>,
    /// Physical obstacles that did not block any track.
    pub redundant: usize,
    /// Obstacles added for grid lines without a physical track.
    pub synthesized: usize,
}

impl<'a> ObstacleProjector<'a> {
    pub fn new(
        geom: &'a TrackGeometry,
        mapper: &'a GridMapper,
        avail: &'a TrackAvailability,
    ) -> Self {
        Self {
            geom,
            mapper,
            avail,
        }
    }

    pub fn run(&self, obstacles: &[LayerRect]) -> Result<ProjectedObstacles> {
        let (width, height) = (self.mapper.width(), self.mapper.height());
        let mut out = Vec::with_capacity(obstacles.len());

        for obs in obstacles {
            match self.map_obstacle(obs) {
                Some(mapped) => {
                    if !mapped.is_inside(width, height) {
                        return Err(ConvertError::IllegalObstacle(mapped));
                    }
                    out.push(mapped);
                }
                None => debug!("obstacle {obs} blocks no track"),
            }
        }
        let redundant = obstacles.len() - out.len();
        info!(
            "Removed {} / {} redundant obstacles.",
            redundant,
            obstacles.len()
        );

        let track_obstacles = self.track_obstacles();
        if let Some(obs) = track_obstacles
            .iter()
            .find(|obs| !obs.is_inside(width, height))
        {
            return Err(ConvertError::IllegalObstacle(*obs));
        }
        let synthesized = track_obstacles.len();
        info!("Added {} track obstacles.", synthesized);
        out.extend(track_obstacles);

        Ok(ProjectedObstacles {
            obstacles: out,
            redundant,
            synthesized,
        })
    }

    /// The grid lines of `layer` whose physical track lies in `range`.
    ///
    /// `range` is measured along the spacing axis of `layer`. Returns `None`
    /// if the layer does not exist or no track of it falls in `range`.
    pub fn project(&self, range: Span, layer: usize) -> Option<IndexSpan> {
        let tracks = self.geom.layer(layer)?;
        let map = self.mapper.axis(tracks.dir.spacing_axis());
        let lo = (map.map(range.start()) - 1).max(0);
        let hi = (map.map(range.stop()) + 1).min(map.extent);

        (lo..hi)
            .filter(|&idx| {
                self.avail
                    .track_coord(layer, idx)
                    .map_or(false, |p| range.contains(p))
            })
            .fold(None, |acc: Option<IndexSpan>, idx| {
                let line = IndexSpan::line(idx);
                Some(acc.map_or(line, |span| span.hull(line)))
            })
    }

    /// Maps a physical obstacle into grid coordinates.
    ///
    /// The obstacle's extent along its own layer's spacing axis selects the
    /// blocked tracks. Its extent along the other axis is measured against the
    /// tracks of the adjacent layers running across it, since those are the
    /// lines on which a via could land inside the obstacle.
    pub fn map_obstacle(&self, obs: &LayerRect) -> Option<LayerRect> {
        let own_axis = self.geom.layer(obs.layer)?.dir.spacing_axis();
        let own = self.project(obs.span(own_axis), obs.layer)?;

        let cross_axis = own_axis.other();
        let cross_range = obs.span(cross_axis);
        let across = |layer: usize| {
            let tracks = self.geom.layer(layer)?;
            if tracks.dir.spacing_axis() != cross_axis {
                return None;
            }
            self.project(cross_range, layer)
        };
        let lower = obs.layer.checked_sub(1).and_then(across);
        let upper = across(obs.layer + 1);
        let cross = IndexSpan::union(lower, upper)?;

        Some(match own_axis {
            Axis::Y => LayerRect::from_spans(cross.into(), own.into(), obs.layer),
            Axis::X => LayerRect::from_spans(own.into(), cross.into(), obs.layer),
        })
    }

    /// Full-length strips over every grid line that has no physical track.
    pub fn track_obstacles(&self) -> Vec<LayerRect> {
        let (width, height) = (self.mapper.width(), self.mapper.height());
        self.geom
            .layers
            .iter()
            .enumerate()
            .flat_map(|(layer, tracks)| {
                let dir = tracks.dir;
                self.avail
                    .missing_lines(layer)
                    .map(move |idx| match dir {
                        Direction::Horizontal => LayerRect::new(0, idx, width, idx + 1, layer),
                        Direction::Vertical => LayerRect::new(idx, 0, idx + 1, height, layer),
                    })
            })
            .collect()
    }
}

/// A half-open range of grid-line indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexSpan {
    pub start: i64,
    pub stop: i64,
}

impl IndexSpan {
    #[inline]
    pub fn line(idx: i64) -> Self {
        Self {
            start: idx,
            stop: idx + 1,
        }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn hull(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            stop: self.stop.max(other.stop),
        }
    }

    pub fn union(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.hull(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

impl From<IndexSpan> for Span {
    fn from(value: IndexSpan) -> Self {
        Span::new(value.start, value.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Track;

    struct Fixture {
        geom: TrackGeometry,
        mapper: GridMapper,
        avail: TrackAvailability,
    }

    impl Fixture {
        fn new(tracks: &[Track], size: i64) -> Self {
            let geom =
                TrackGeometry::analyze(tracks, Span::new(0, size), Span::new(0, size)).unwrap();
            let mapper = GridMapper::new(&geom).unwrap();
            let avail = TrackAvailability::build(&geom, &mapper);
            Self {
                geom,
                mapper,
                avail,
            }
        }

        fn projector(&self) -> ObstacleProjector<'_> {
            ObstacleProjector::new(&self.geom, &self.mapper, &self.avail)
        }
    }

    /// H(0, 2), V(0, 2), H(0, 4), V(1, 4) on a 20 x 20 board.
    fn four_layers() -> Fixture {
        Fixture::new(
            &[
                Track::new(0, 2, Direction::Horizontal),
                Track::new(0, 2, Direction::Vertical),
                Track::new(0, 4, Direction::Horizontal),
                Track::new(1, 4, Direction::Vertical),
            ],
            20,
        )
    }

    #[test]
    fn test_index_span_union() {
        let a = IndexSpan { start: 2, stop: 4 };
        let b = IndexSpan { start: 3, stop: 7 };
        assert_eq!(IndexSpan::union(Some(a), Some(b)), Some(IndexSpan { start: 2, stop: 7 }));
        assert_eq!(IndexSpan::union(Some(a), None), Some(a));
        assert_eq!(IndexSpan::union(None, Some(b)), Some(b));
        assert_eq!(IndexSpan::union(None, None), None);
    }

    #[test]
    fn test_project() {
        let f = four_layers();
        let p = f.projector();
        // Tracks at y = 4 and y = 6.
        assert_eq!(
            p.project(Span::new(3, 7), 0),
            Some(IndexSpan { start: 2, stop: 4 })
        );
        assert_eq!(p.project(Span::new(5, 6), 0), None);
        // Only x = 5 lies in [3, 7) on layer 3.
        assert_eq!(
            p.project(Span::new(3, 7), 3),
            Some(IndexSpan { start: 3, stop: 4 })
        );
        assert_eq!(
            p.project(Span::new(0, 20), 2),
            Some(IndexSpan { start: 0, stop: 9 })
        );
        assert_eq!(p.project(Span::new(0, 20), 4), None);
    }

    #[test]
    fn test_obstacle_with_upper_neighbor() {
        let f = four_layers();
        let mapped = f.projector().map_obstacle(&LayerRect::new(3, 3, 7, 5, 0));
        assert_eq!(mapped, Some(LayerRect::new(2, 2, 4, 3, 0)));
    }

    #[test]
    fn test_obstacle_with_both_neighbors() {
        let f = four_layers();
        // Layer 1 blocks columns 2..4, layer 3 only column 3; the union wins.
        let mapped = f.projector().map_obstacle(&LayerRect::new(3, 7, 7, 9, 2));
        assert_eq!(mapped, Some(LayerRect::new(2, 4, 4, 5, 2)));
    }

    #[test]
    fn test_vertical_obstacle_with_lower_neighbor() {
        let f = four_layers();
        let mapped = f.projector().map_obstacle(&LayerRect::new(4, 0, 6, 3, 3));
        assert_eq!(mapped, Some(LayerRect::new(3, 0, 4, 1, 3)));
    }

    #[test]
    fn test_redundant_obstacles() {
        let f = four_layers();
        let p = f.projector();
        // Between the tracks at y = 4 and y = 6.
        assert_eq!(p.map_obstacle(&LayerRect::new(3, 5, 7, 6, 0)), None);
        // Blocks x = 5 on layer 3, but layer 2 has no track in [1, 3).
        assert_eq!(p.map_obstacle(&LayerRect::new(4, 1, 6, 3, 3)), None);
    }

    #[test]
    fn test_same_direction_neighbors_are_ignored() {
        let f = Fixture::new(
            &[
                Track::new(0, 2, Direction::Horizontal),
                Track::new(0, 2, Direction::Horizontal),
                Track::new(0, 2, Direction::Vertical),
            ],
            20,
        );
        let p = f.projector();
        // Layer 0 only neighbors another horizontal layer.
        assert_eq!(p.map_obstacle(&LayerRect::new(3, 3, 7, 5, 0)), None);
        assert_eq!(
            p.map_obstacle(&LayerRect::new(3, 3, 7, 5, 1)),
            Some(LayerRect::new(2, 2, 4, 3, 1))
        );
    }

    #[test]
    fn test_track_obstacles_cover_missing_lines() {
        let f = four_layers();
        let strips = f.projector().track_obstacles();
        assert_eq!(strips.len(), 10);
        assert!(strips.contains(&LayerRect::new(0, 1, 10, 2, 2)));
        assert!(strips.contains(&LayerRect::new(8, 0, 9, 10, 3)));
        for layer in 0..4 {
            for idx in 0..10 {
                let strip = strips.iter().any(|s| {
                    s.layer == layer
                        && match f.geom.layers[layer].dir {
                            Direction::Horizontal => s.y1 == idx,
                            Direction::Vertical => s.x1 == idx,
                        }
                });
                assert_ne!(strip, f.avail.is_line_available(layer, idx));
            }
        }
    }

    #[test]
    fn test_run_counts() {
        let f = four_layers();
        let projected = f
            .projector()
            .run(&[
                LayerRect::new(3, 3, 7, 5, 0),
                LayerRect::new(3, 5, 7, 6, 0),
                LayerRect::new(3, 7, 7, 9, 2),
            ])
            .unwrap();
        assert_eq!(projected.redundant, 1);
        assert_eq!(projected.synthesized, 10);
        assert_eq!(projected.obstacles.len(), 12);
        assert_eq!(projected.obstacles[0], LayerRect::new(2, 2, 4, 3, 0));
        assert_eq!(projected.obstacles[1], LayerRect::new(2, 4, 4, 5, 2));
    }
}
