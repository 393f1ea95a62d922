//! Reader and writer for the line-oriented testcase format.
//!
//! ```text
//! Width <h_start> <h_end>
//! Height <v_start> <v_end>
//! total_WL <wirelength>
//! total_via <vias>
//! Layer <n>
//! Track<i> <start> <spacing> <direction>
//! Obstacle_num <k>
//! <x1> <y1> <z1> <x2> <y2> <z2>
//! Net_num <m>
//! Net_id <id>
//! pin_num <p>
//! pin_id <j>
//! ap_num <a>
//! <x> <y> <z>
//! Via_num <v>
//! <x> <y> <lower z>
//! H_segment_num <h>
//! <x1> <y1> <z1> <x2> <y2> <z2>
//! V_segment_num <w>
//! <x1> <y1> <z1> <x2> <y2> <z2>
//! ```
//!
//! The via and segment sections are optional as a whole.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::layout::Layout;

pub use self::read::read_layout;
pub use self::write::write_layout;

mod read;
mod write;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input, expected `{expected}`")]
    UnexpectedEof { expected: String },

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    UnexpectedKey {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid integer `{value}`")]
    ParseInt {
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("line {line}: unknown track direction {value}")]
    UnknownDirection { line: usize, value: i64 },

    #[error("line {line}: shape spans layers {z1} and {z2}")]
    MultiLayerShape { line: usize, z1: i64, z2: i64 },

    #[error("line {line}: negative {what} {value}")]
    Negative {
        line: usize,
        what: &'static str,
        value: i64,
    },
}

pub type Result<T> = std::result::Result<T, FormatError>;

pub fn read_layout_file(path: impl AsRef<Path>) -> Result<Layout> {
    let contents = std::fs::read_to_string(path)?;
    read_layout(&contents)
}

pub fn write_layout_file(
    path: impl AsRef<Path>,
    layout: &Layout,
    write_segments: bool,
) -> Result<()> {
    let mut sink = BufWriter::new(File::create(path)?);
    write_layout(&mut sink, layout, write_segments)?;
    sink.flush()?;
    Ok(())
}
