//! SVG path data optimization.
//!
//! The pipeline parses a `d` attribute into a command sequence, converts it
//! to relative coordinates with absolute position annotations, runs the
//! filter pass (arc detection, curve lowering, shorthands, rounding with
//! error compensation), picks the shorter of the absolute and relative form
//! per command, and serializes the result.

pub mod command;
pub mod format;
pub mod geometry;
pub mod parse;
pub mod relative;

mod arcs;
mod filter;
mod mixed;
mod writer;

pub use command::{Op, PathItem};
pub use parse::parse_path_data;

use crate::Options;
use crate::error::PathminError;
use crate::style::StyleInfo;
use format::NumFormat;

/// Optimize one `d` attribute value.
///
/// Fails only when the input does not parse as path data; every parsed
/// path produces some output, with individual rewrites declined silently
/// when geometry or length checks do not hold.
pub fn optimize_path_data(
    d: &str,
    opts: &Options,
    info: &StyleInfo,
) -> Result<String, PathminError> {
    let mut items = parse::parse_path_data(d)?;
    if items.is_empty() {
        return Ok(d.to_string());
    }

    let includes_vertices = items.iter().any(|item| item.op != Op::Move);
    relative::convert_to_relative(&mut items);

    let fmt = NumFormat::new(
        opts.float_precision,
        opts.leading_zero,
        opts.negative_extra_space,
        opts.no_space_after_flags,
    );

    let mut items = filter::filter(items, opts, &fmt, info);
    if opts.utilize_absolute {
        mixed::convert_to_mixed(&mut items, opts, &fmt);
    }

    // a path stripped down to its moveto still has to render its markers
    if info.has_marker && includes_vertices && items.iter().all(|item| item.op == Op::Move) {
        items.push(PathItem::new(Op::Close, true, Vec::new()));
    }

    Ok(writer::write_path(&items, &fmt))
}
