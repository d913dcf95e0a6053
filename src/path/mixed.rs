//! Per-command choice between absolute and relative form.

use crate::Options;
use crate::path::command::{Op, PathItem};
use crate::path::format::NumFormat;

/// For every non-first, non-closepath item, serialize both coordinate forms
/// and keep the shorter one.
///
/// A one-character absolute win is discarded when it only exists because
/// the relative form's leading minus sign (or fraction-to-fraction `.`)
/// would have fused with the previous relative command's trailing number in
/// the concatenated output.
pub fn convert_to_mixed(path: &mut [PathItem], opts: &Options, fmt: &NumFormat) {
    let mut prev_idx: Option<usize> = None;

    for i in 0..path.len() {
        if i == 0 || path[i].op == Op::Close {
            prev_idx = Some(i);
            continue;
        }

        let item = &path[i];
        let mut abs_args = item.args.clone();
        match item.op {
            Op::Move | Op::Line | Op::SmoothQuad | Op::Quad | Op::SmoothCubic | Op::Cubic => {
                for (j, arg) in abs_args.iter_mut().enumerate() {
                    *arg += item.base[j % 2];
                }
            }
            Op::Horizontal => abs_args[0] += item.base[0],
            Op::Vertical => abs_args[0] += item.base[1],
            Op::Arc => {
                abs_args[5] += item.base[0];
                abs_args[6] += item.base[1];
            }
            Op::Close => unreachable!(),
        }

        let mut rel_args = item.args.clone();
        fmt.round_data(&mut abs_args);
        fmt.round_data(&mut rel_args);

        let is_arc = item.op == Op::Arc;
        let abs_str = fmt.minify_args(&abs_args, is_arc);
        let rel_str = fmt.minify_args(&rel_args, is_arc);

        let fused_tie = fmt.negative_extra_space
            && prev_idx.is_some_and(|p| {
                let prev = &path[p];
                prev.op == item.op
                    && prev.relative
                    && abs_str.len() + 1 == rel_str.len()
                    && (rel_args[0] < 0.0
                        || (fmt.format_number(rel_args[0]).starts_with('.')
                            && prev.args.last().is_some_and(|&a| a.fract() != 0.0)))
            });

        if opts.force_absolute_path || (abs_str.len() < rel_str.len() && !fused_tie) {
            path[i].relative = false;
            path[i].args = abs_args;
        } else {
            path[i].args = rel_args;
        }
        prev_idx = Some(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse::parse_path_data;
    use crate::path::relative::convert_to_relative;

    fn mixed(d: &str, opts: &Options) -> Vec<PathItem> {
        let mut items = parse_path_data(d).unwrap();
        convert_to_relative(&mut items);
        let fmt = NumFormat::new(
            opts.float_precision,
            opts.leading_zero,
            opts.negative_extra_space,
            opts.no_space_after_flags,
        );
        convert_to_mixed(&mut items, opts, &fmt);
        items
    }

    #[test]
    fn test_absolute_when_shorter() {
        // from (100, 100), l-80-80 vs L20 20: absolute wins
        let items = mixed("M100 100 L20 20", &Options::default());
        assert!(!items[1].relative);
        assert_eq!(items[1].args, vec![20.0, 20.0]);
    }

    #[test]
    fn test_relative_when_shorter() {
        let items = mixed("M10 10 L20 20", &Options::default());
        assert!(items[1].relative);
        assert_eq!(items[1].args, vec![10.0, 10.0]);
    }

    #[test]
    fn test_vertical_to_origin() {
        // v-20 -> V0
        let items = mixed("M10 20 V0", &Options::default());
        assert!(!items[1].relative);
        assert_eq!(items[1].args, vec![0.0]);
    }

    #[test]
    fn test_force_absolute() {
        let opts = Options {
            force_absolute_path: true,
            ..Options::default()
        };
        let items = mixed("M10 10 l1 1", &opts);
        assert!(!items[1].relative);
        assert_eq!(items[1].args, vec![11.0, 11.0]);
    }

    #[test]
    fn test_negative_fusion_tie_break() {
        // "l20 30-10-50" beats "l20 30L10-20": the absolute form saves one
        // character on its own but loses the fused minus separator
        let items = mixed("M0 0 l20 30 l-10 -50", &Options::default());
        assert!(items[2].relative);
    }

    #[test]
    fn test_first_command_untouched() {
        let items = mixed("M10 10 l5 5", &Options::default());
        assert!(!items[0].relative);
        assert_eq!(items[0].args, vec![10.0, 10.0]);
    }
}
