use itertools::Itertools;
use log::{debug, info};

use super::mapper::GridMapper;
use super::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::layout::{LayerPoint, LayerRect, Net, Pin};

/// Maps pins, vias and wire segments of every net onto the grid.
pub struct NetProjector<'a> {
    mapper: &'a GridMapper,
    opts: &'a ConvertOptions,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ProjectedNets {
    /// Surviving nets, renumbered from zero in input order.
    pub nets: Vec<Net>,
    /// Nets dropped because they had no pins.
    pub empty: usize,
    /// Nets dropped because a pin had no access point on the bottom layer.
    pub unreachable: usize,
}

impl<'a> NetProjector<'a> {
    pub fn new(mapper: &'a GridMapper, opts: &'a ConvertOptions) -> Self {
        Self { mapper, opts }
    }

    pub fn run(&self, nets: &[Net]) -> Result<ProjectedNets> {
        let mut out = ProjectedNets::default();

        for net in nets {
            if self.opts.remove_empty_net && net.pins.is_empty() {
                debug!("net {} has no pins", net.id);
                out.empty += 1;
                continue;
            }
            match self.project_net(net, out.nets.len())? {
                Some(mapped) => out.nets.push(mapped),
                None => {
                    debug!("net {} has a pin without bottom-layer access points", net.id);
                    out.unreachable += 1;
                }
            }
        }

        if out.empty + out.unreachable > 0 {
            info!(
                "Removed {} empty nets and {} nets with unreachable pins.",
                out.empty, out.unreachable
            );
        }
        Ok(out)
    }

    /// Maps `net` and assigns it `id`, or returns `None` if pruning policy
    /// excludes it.
    pub fn project_net(&self, net: &Net, id: usize) -> Result<Option<Net>> {
        let mut pins = Vec::with_capacity(net.pins.len());
        for pin in &net.pins {
            let pin = self.map_pin(pin);
            if pin.is_empty() && self.opts.remove_non_bottom_pins {
                return Ok(None);
            }
            pins.push(pin);
        }

        let vias = net
            .vias
            .iter()
            .map(|via| self.map_via(via))
            .collect::<Result<Vec<_>>>()?;
        let h_segs = net
            .h_segs
            .iter()
            .map(|seg| self.map_h_seg(seg))
            .collect::<Result<Vec<_>>>()?;
        let v_segs = net
            .v_segs
            .iter()
            .map(|seg| self.map_v_seg(seg))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Net {
            id,
            pins,
            vias,
            h_segs,
            v_segs,
        }))
    }

    /// Bottom-layer access points of `pin` that land on the grid, without
    /// duplicates.
    pub fn map_pin(&self, pin: &Pin) -> Pin {
        pin.iter()
            .filter(|ap| ap.layer == 0)
            .map(|ap| {
                let (x, y) = self.mapper.map_point(ap.x, ap.y);
                LayerPoint::new(x, y, ap.layer)
            })
            .filter(|ap| self.mapper.on_grid(ap.x, ap.y))
            .unique()
            .collect()
    }

    /// A via keeps its lower layer and must land on a grid cell.
    pub fn map_via(&self, via: &LayerPoint) -> Result<LayerPoint> {
        let (x, y) = self.mapper.map_point(via.x, via.y);
        let mapped = LayerPoint::new(x, y, via.layer);
        if self.mapper.on_grid(x, y) {
            Ok(mapped)
        } else {
            Err(ConvertError::IllegalVia(mapped))
        }
    }

    /// A horizontal segment keeps its far end open and is one grid line tall.
    pub fn map_h_seg(&self, seg: &LayerRect) -> Result<LayerRect> {
        let x1 = self.mapper.map_x(seg.x1);
        let y1 = self.mapper.map_y(seg.y1);
        let x2 = (self.mapper.map_x(seg.x2) + 1).min(self.mapper.width());
        self.check_seg(LayerRect::new(x1, y1, x2, y1 + 1, seg.layer))
    }

    /// A vertical segment keeps its far end open and is one grid line wide.
    pub fn map_v_seg(&self, seg: &LayerRect) -> Result<LayerRect> {
        let x1 = self.mapper.map_x(seg.x1);
        let y1 = self.mapper.map_y(seg.y1);
        let y2 = (self.mapper.map_y(seg.y2) + 1).min(self.mapper.height());
        self.check_seg(LayerRect::new(x1, y1, x1 + 1, y2, seg.layer))
    }

    fn check_seg(&self, seg: LayerRect) -> Result<LayerRect> {
        if seg.is_inside(self.mapper.width(), self.mapper.height()) {
            Ok(seg)
        } else {
            Err(ConvertError::IllegalSegment(seg))
        }
    }
}
