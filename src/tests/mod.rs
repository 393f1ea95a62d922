use crate::layout::{Direction, LayerPoint, LayerRect, Layout, Net, Pin, Span, Track};


pub(crate) fn pin(aps: &[(i64, i64, usize)]) -> Pin {
    aps.iter().map(|&(x, y, z)| LayerPoint::new(x, y, z)).collect()
}

/// A routed four-layer testcase on a 20 x 20 board.
///
/// Layers alternate H(0, 2), V(0, 2), H(0, 4), V(1, 4), so the grid is
/// 10 x 10 and the two upper layers only back every other line.
pub(crate) fn sample_layout() -> Layout {
    let tracks = vec![
        Track::new(0, 2, Direction::Horizontal),
        Track::new(0, 2, Direction::Vertical),
        Track::new(0, 4, Direction::Horizontal),
        Track::new(1, 4, Direction::Vertical),
    ];
    let obstacles = vec![
        LayerRect::new(3, 3, 7, 5, 0),
        LayerRect::new(3, 5, 7, 6, 0),
        LayerRect::new(3, 7, 7, 9, 2),
        LayerRect::new(4, 0, 6, 3, 3),
        LayerRect::new(4, 1, 6, 3, 3),
    ];

    let mut routed = Net::new(0).with_pins(vec![
        pin(&[(4, 6, 0), (3, 6, 0), (4, 6, 1)]),
        pin(&[(10, 10, 0)]),
    ]);
    routed.vias.push(LayerPoint::new(4, 6, 0));
    routed.h_segs.push(LayerRect::new(4, 6, 10, 7, 0));
    routed.v_segs.push(LayerRect::new(10, 6, 11, 10, 1));

    let nets = vec![
        routed,
        Net::new(1),
        Net::new(2).with_pins(vec![pin(&[(4, 4, 2)])]),
        Net::new(3).with_pins(vec![pin(&[(0, 0, 0)]), pin(&[(18, 18, 0)])]),
    ];

    Layout::new(Span::new(0, 20), Span::new(0, 20), tracks, obstacles, nets)
}
