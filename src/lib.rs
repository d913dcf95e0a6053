//! pathmin - an SVG path data optimizer
//!
//! pathmin rewrites the `d` attribute of path elements into an equivalent,
//! shorter form while preserving the rendered geometry within a configured
//! tolerance: coordinates are made relative (or absolute, whichever is
//! shorter), curves collapse into arcs, lines and shorthands, and numbers
//! are rounded with the accumulated error compensated at every step.

mod ast;
mod error;
mod optimize;
mod parse;
mod path;
mod serialize;
mod style;

pub use ast::*;
pub use error::*;
pub use optimize::*;
pub use parse::*;
pub use path::{Op, PathItem, optimize_path_data, parse_path_data};
pub use serialize::*;
pub use style::{StyleInfo, StyleValue};

/// Optimize the path data of an SVG string with default settings.
pub fn optimize(svg: &str) -> Result<String, PathminError> {
    optimize_with_options(svg, &Options::default())
}

/// Optimize the path data of an SVG string with custom options.
pub fn optimize_with_options(svg: &str, options: &Options) -> Result<String, PathminError> {
    let mut doc = parse_svg(svg)?;
    optimize_paths(&mut doc, options);
    Ok(serialize(&doc))
}

/// Arc detection parameters.
#[derive(Debug, Clone)]
pub struct MakeArcs {
    /// Scale factor on the rounding error used as the fit tolerance floor.
    pub threshold: f64,
    /// Fit tolerance as a percentage of the arc radius.
    pub tolerance: f64,
}

impl Default for MakeArcs {
    fn default() -> Self {
        Self {
            threshold: 2.5,
            tolerance: 0.5,
        }
    }
}

/// Path optimization options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Detect circular arcs in runs of cubic curves (None disables)
    pub make_arcs: Option<MakeArcs>,
    /// Convert curves whose control points sit on the chord into lines
    pub straight_curves: bool,
    /// Lower degree-elevated cubics to quadratics
    pub convert_to_q: bool,
    /// Use h/v for axis-aligned lines
    pub line_shorthands: bool,
    /// Replace a trailing line back to the subpath start with z
    pub convert_to_z: bool,
    /// Use s/t for curves whose first control point mirrors the previous one
    pub curve_smooth_shorthands: bool,
    /// Coarsen arc radii while the sagitta stays within tolerance
    pub smart_arc_rounding: bool,
    /// Drop zero-length segments
    pub remove_useless: bool,
    /// Merge consecutive m/h/v commands
    pub collapse_repeated: bool,
    /// Emit each command in whichever coordinate form is shorter
    pub utilize_absolute: bool,
    /// Decimal places for coordinates; None disables rounding (default: 3)
    pub float_precision: Option<u8>,
    /// Write .5 instead of 0.5
    pub leading_zero: bool,
    /// Let a minus sign double as a separator
    pub negative_extra_space: bool,
    /// Pack arc flags against the following number
    pub no_space_after_flags: bool,
    /// Always emit absolute coordinates
    pub force_absolute_path: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            make_arcs: Some(MakeArcs::default()),
            straight_curves: true,
            convert_to_q: true,
            line_shorthands: true,
            convert_to_z: true,
            curve_smooth_shorthands: true,
            smart_arc_rounding: true,
            remove_useless: true,
            collapse_repeated: true,
            utilize_absolute: true,
            float_precision: Some(3),
            leading_zero: true,
            negative_extra_space: true,
            no_space_after_flags: false,
            force_absolute_path: false,
        }
    }
}
