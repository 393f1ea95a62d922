use thiserror::Error;

use crate::layout::{Axis, LayerPoint, LayerRect};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("layer {layer} has non-positive track spacing {spacing}")]
    DegenerateTrack { layer: usize, spacing: i64 },

    #[error("layer {layer} has no tracks inside the board")]
    NoTracks { layer: usize },

    #[error("no layer has as many tracks as the {axis} extent of the grid")]
    NoReferenceLayer { axis: Axis },

    #[error("{what} on layer {layer}, but the layout has {layers} layers")]
    LayerOutOfRange {
        what: &'static str,
        layer: usize,
        layers: usize,
    },

    #[error("net at position {position} has id {id}")]
    NetIdMismatch { position: usize, id: usize },

    #[error("found illegal mapped obstacle {0}")]
    IllegalObstacle(LayerRect),

    #[error("found illegal mapped segment {0}")]
    IllegalSegment(LayerRect),

    #[error("found illegal mapped via {0}")]
    IllegalVia(LayerPoint),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
