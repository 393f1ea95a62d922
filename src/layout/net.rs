use super::{LayerPoint, LayerRect};

/// The access points at which a pin may be connected.
pub type Pin = Vec<LayerPoint>;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Net {
    pub id: usize,
    pub pins: Vec<Pin>,
    /// Vias, each located on the lower of the two layers it joins.
    pub vias: Vec<LayerPoint>,
    pub h_segs: Vec<LayerRect>,
    pub v_segs: Vec<LayerRect>,
}

impl Net {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_pins(mut self, pins: Vec<Pin>) -> Self {
        self.pins = pins;
        self
    }

    /// Sum of the x-extents of horizontal segments and the y-extents of
    /// vertical segments.
    pub fn wirelength(&self) -> i64 {
        let h: i64 = self.h_segs.iter().map(|s| s.x2 - s.x1).sum();
        let v: i64 = self.v_segs.iter().map(|s| s.y2 - s.y1).sum();
        h + v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wirelength() {
        let mut net = Net::new(0);
        net.h_segs.push(LayerRect::new(2, 3, 6, 4, 0));
        net.h_segs.push(LayerRect::new(0, 0, 1, 1, 2));
        net.v_segs.push(LayerRect::new(5, 3, 6, 6, 1));
        assert_eq!(net.wirelength(), 4 + 1 + 3);
    }
}
