use std::iter::Enumerate;
use std::str::Lines;

use log::warn;

use super::{FormatError, Result};
use crate::layout::{Direction, LayerPoint, LayerRect, Layout, Net, RouteStats, Span, Track};

/// Parses a testcase.
///
/// Via and segment sections are read only if the text contains them.
pub fn read_layout(contents: &str) -> Result<Layout> {
    let read_segments = contents.contains("_segment_num");
    let mut r = Reader::new(contents);

    let (_, [h_start, h_end]) = r.keyed::<2>("Width")?;
    let (_, [v_start, v_end]) = r.keyed::<2>("Height")?;
    let (_, [total_wl]) = r.keyed::<1>("total_WL")?;
    let (line, [total_via]) = r.keyed::<1>("total_via")?;
    let total_via = non_negative(line, "via count", total_via)?;

    let num_layers = r.count("Layer")?;
    let mut tracks = Vec::with_capacity(num_layers);
    for i in 0..num_layers {
        let (line, [start, spacing, dir]) = r.keyed::<3>(&format!("Track{i}"))?;
        let dir = Direction::from_code(dir)
            .ok_or(FormatError::UnknownDirection { line, value: dir })?;
        tracks.push(Track::new(start, spacing, dir));
    }

    let num_obstacles = r.count("Obstacle_num")?;
    let obstacles = (0..num_obstacles)
        .map(|_| r.shape("obstacle"))
        .collect::<Result<Vec<_>>>()?;

    let num_nets = r.count("Net_num")?;
    let mut nets = Vec::with_capacity(num_nets);
    for _ in 0..num_nets {
        let (line, [id]) = r.keyed::<1>("Net_id")?;
        let mut net = Net::new(non_negative(line, "net id", id)?);

        let num_pins = r.count("pin_num")?;
        for _ in 0..num_pins {
            r.keyed::<1>("pin_id")?;
            let num_aps = r.count("ap_num")?;
            let pin = (0..num_aps)
                .map(|_| r.point("access point"))
                .collect::<Result<Vec<_>>>()?;
            net.pins.push(pin);
        }

        if read_segments {
            let num_vias = r.count("Via_num")?;
            net.vias = (0..num_vias)
                .map(|_| r.point("via"))
                .collect::<Result<_>>()?;
            let num_h_segs = r.count("H_segment_num")?;
            net.h_segs = (0..num_h_segs)
                .map(|_| r.shape("horizontal segment"))
                .collect::<Result<_>>()?;
            let num_v_segs = r.count("V_segment_num")?;
            net.v_segs = (0..num_v_segs)
                .map(|_| r.shape("vertical segment"))
                .collect::<Result<_>>()?;
        }
        nets.push(net);
    }

    let mut layout = Layout::new(
        Span::new(h_start, h_end),
        Span::new(v_start, v_end),
        tracks,
        obstacles,
        nets,
    );
    let header = RouteStats {
        wirelength: total_wl,
        vias: total_via,
    };
    if header.wirelength != layout.stats.wirelength {
        warn!(
            "overwrite total_WL: {} to {}",
            layout.stats.wirelength, header.wirelength
        );
    }
    if header.vias != layout.stats.vias {
        warn!("overwrite total_via: {} to {}", layout.stats.vias, header.vias);
    }
    layout.stats = header;

    Ok(layout)
}

struct Reader<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Reader<'a> {
    fn new(contents: &'a str) -> Self {
        Self {
            lines: contents.lines().enumerate(),
        }
    }

    /// The next non-blank line, split on whitespace, with its 1-based number.
    fn fields(&mut self, expected: &str) -> Result<(usize, Vec<&'a str>)> {
        for (i, line) in self.lines.by_ref() {
            let fields: Vec<_> = line.split_whitespace().collect();
            if !fields.is_empty() {
                return Ok((i + 1, fields));
            }
        }
        Err(FormatError::UnexpectedEof {
            expected: expected.to_string(),
        })
    }

    /// A line of exactly `N` integers.
    fn ints<const N: usize>(&mut self, expected: &str) -> Result<(usize, [i64; N])> {
        let (line, fields) = self.fields(expected)?;
        Ok((line, parse_ints(line, &fields)?))
    }

    /// A line holding `key` followed by exactly `N` integers.
    ///
    /// Keys match regardless of ASCII case; raw testcases spell the track
    /// keys `track<i>`.
    fn keyed<const N: usize>(&mut self, key: &str) -> Result<(usize, [i64; N])> {
        let (line, fields) = self.fields(key)?;
        if !fields[0].eq_ignore_ascii_case(key) {
            return Err(FormatError::UnexpectedKey {
                line,
                expected: key.to_string(),
                found: fields[0].to_string(),
            });
        }
        Ok((line, parse_ints(line, &fields[1..])?))
    }

    fn count(&mut self, key: &'static str) -> Result<usize> {
        let (line, [n]) = self.keyed::<1>(key)?;
        non_negative(line, key, n)
    }

    fn point(&mut self, what: &'static str) -> Result<LayerPoint> {
        let (line, [x, y, z]) = self.ints::<3>(what)?;
        Ok(LayerPoint::new(x, y, non_negative(line, "layer", z)?))
    }

    fn shape(&mut self, what: &'static str) -> Result<LayerRect> {
        let (line, [x1, y1, z1, x2, y2, z2]) = self.ints::<6>(what)?;
        if z1 != z2 {
            return Err(FormatError::MultiLayerShape { line, z1, z2 });
        }
        Ok(LayerRect::new(x1, y1, x2, y2, non_negative(line, "layer", z1)?))
    }
}

fn parse_ints<const N: usize>(line: usize, fields: &[&str]) -> Result<[i64; N]> {
    if fields.len() != N {
        return Err(FormatError::FieldCount {
            line,
            expected: N,
            found: fields.len(),
        });
    }
    let mut out = [0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|source| FormatError::ParseInt {
            line,
            value: field.to_string(),
            source,
        })?;
    }
    Ok(out)
}

fn non_negative(line: usize, what: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| FormatError::Negative { line, what, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTED: &str = "\
Width 0 20
Height 0 20
total_WL 10
total_via 1
Layer 2
Track0 0 2 0
Track1 0 2 1
Obstacle_num 1
3 3 0 7 5 0
Net_num 2
Net_id 0
pin_num 2
pin_id 0
ap_num 2
4 6 0
3 6 0
pin_id 1
ap_num 1
10 10 0
Via_num 1
4 6 0
H_segment_num 1
4 6 0 10 7 0
V_segment_num 1
10 6 1 11 10 1
Net_id 1
pin_num 0
Via_num 0
H_segment_num 0
V_segment_num 0
";

    #[test]
    fn test_read_routed_testcase() {
        let layout = read_layout(ROUTED).unwrap();
        assert_eq!(layout.x, Span::new(0, 20));
        assert_eq!(layout.tracks[1], Track::new(0, 2, Direction::Vertical));
        assert_eq!(layout.obstacles, vec![LayerRect::new(3, 3, 7, 5, 0)]);
        assert_eq!(layout.nets.len(), 2);

        let net = &layout.nets[0];
        assert_eq!(net.pins.len(), 2);
        assert_eq!(net.pins[0][1], LayerPoint::new(3, 6, 0));
        assert_eq!(net.vias, vec![LayerPoint::new(4, 6, 0)]);
        assert_eq!(net.v_segs, vec![LayerRect::new(10, 6, 11, 10, 1)]);
        assert_eq!(layout.stats, RouteStats::of_nets(&layout.nets));
        assert!(layout.nets[1].pins.is_empty());
    }

    #[test]
    fn test_header_stats_are_kept() {
        let text = ROUTED.replace("total_WL 10", "total_WL 42");
        let layout = read_layout(&text).unwrap();
        assert_eq!(layout.stats.wirelength, 42);
        assert_eq!(layout.stats.vias, 1);
    }

    #[test]
    fn test_read_unrouted_testcase() {
        let text = "\
Width 0 10
Height 0 10

total_WL 0
total_via 0
Layer 1
Track0 0 2 0
Obstacle_num 0
Net_num 1
Net_id 0
pin_num 1
pin_id 0
ap_num 1
2 2 0
";
        let layout = read_layout(text).unwrap();
        assert_eq!(layout.nets[0].pins, vec![vec![LayerPoint::new(2, 2, 0)]]);
        assert!(layout.nets[0].h_segs.is_empty());
    }

    #[test]
    fn test_lowercase_track_keys() {
        let text = ROUTED
            .replace("Track0 0 2 0", "track0 0 2 0")
            .replace("Track1 0 2 1", "track1 0 2 1");
        let layout = read_layout(&text).unwrap();
        assert_eq!(
            layout.tracks,
            vec![
                Track::new(0, 2, Direction::Horizontal),
                Track::new(0, 2, Direction::Vertical),
            ]
        );

        // The index still has to match.
        let err = read_layout(&ROUTED.replace("Track1", "track0")).unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedKey { line: 7, .. }));
    }

    #[test]
    fn test_format_errors() {
        let err = read_layout(&ROUTED.replace("Track1", "Track7")).unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedKey { line: 7, .. }));

        let err = read_layout(&ROUTED.replace("3 3 0 7 5 0", "3 3 0 7 5 1")).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MultiLayerShape { line: 9, z1: 0, z2: 1 }
        ));

        let err = read_layout(&ROUTED.replace("Track1 0 2 1", "Track1 0 2 5")).unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnknownDirection { line: 7, value: 5 }
        ));

        let err = read_layout(&ROUTED.replace("Width 0 20", "Width 0 2x")).unwrap_err();
        assert!(matches!(err, FormatError::ParseInt { line: 1, .. }));

        let err = read_layout(&ROUTED.replace("4 6 0 10 7 0", "4 6 0 10 7")).unwrap_err();
        assert!(matches!(
            err,
            FormatError::FieldCount {
                expected: 6,
                found: 5,
                ..
            }
        ));

        let err = read_layout("Width 0 20\nHeight 0 20\n").unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedEof { .. }));
    }
}
