use std::io::{self, Write};

use crate::layout::{LayerPoint, LayerRect, Layout};

/// Writes `layout` in testcase format.
///
/// Via and segment sections are omitted unless `write_segments` is set.
pub fn write_layout<W: Write>(
    sink: &mut W,
    layout: &Layout,
    write_segments: bool,
) -> io::Result<()> {
    writeln!(sink, "Width {} {}", layout.x.start(), layout.x.stop())?;
    writeln!(sink, "Height {} {}", layout.y.start(), layout.y.stop())?;
    writeln!(sink, "total_WL {}", layout.stats.wirelength)?;
    writeln!(sink, "total_via {}", layout.stats.vias)?;
    writeln!(sink, "Layer {}", layout.layers())?;
    for (i, track) in layout.tracks.iter().enumerate() {
        writeln!(
            sink,
            "Track{} {} {} {}",
            i,
            track.start,
            track.spacing,
            track.dir.code()
        )?;
    }

    writeln!(sink, "Obstacle_num {}", layout.obstacles.len())?;
    for obs in &layout.obstacles {
        write_shape(sink, obs)?;
    }

    writeln!(sink, "Net_num {}", layout.nets.len())?;
    for net in &layout.nets {
        writeln!(sink, "Net_id {}", net.id)?;
        writeln!(sink, "pin_num {}", net.pins.len())?;
        for (j, pin) in net.pins.iter().enumerate() {
            writeln!(sink, "pin_id {j}")?;
            writeln!(sink, "ap_num {}", pin.len())?;
            for ap in pin {
                write_point(sink, ap)?;
            }
        }
        if write_segments {
            writeln!(sink, "Via_num {}", net.vias.len())?;
            for via in &net.vias {
                write_point(sink, via)?;
            }
            writeln!(sink, "H_segment_num {}", net.h_segs.len())?;
            for seg in &net.h_segs {
                write_shape(sink, seg)?;
            }
            writeln!(sink, "V_segment_num {}", net.v_segs.len())?;
            for seg in &net.v_segs {
                write_shape(sink, seg)?;
            }
        }
    }
    Ok(())
}

fn write_point<W: Write>(sink: &mut W, p: &LayerPoint) -> io::Result<()> {
    writeln!(sink, "{} {} {}", p.x, p.y, p.layer)
}

fn write_shape<W: Write>(sink: &mut W, r: &LayerRect) -> io::Result<()> {
    writeln!(sink, "{} {} {} {} {} {}", r.x1, r.y1, r.layer, r.x2, r.y2, r.layer)
}
