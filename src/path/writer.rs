//! Serialization of a command sequence back into a `d` string.

use crate::path::command::{Op, PathItem};
use crate::path::format::NumFormat;

/// Write the final path string.
///
/// A command letter is omitted when it repeats the previous one; a lineto
/// directly after a moveto of the same case is implicit. Separator rules
/// across the fused boundary are the same as within one argument list.
pub fn write_path(items: &[PathItem], fmt: &NumFormat) -> String {
    let mut out = String::new();
    let mut prev_letter: Option<char> = None;
    let mut prev_num: Option<f64> = None;

    for item in items {
        let letter = item.letter();
        let fused = match prev_letter {
            Some(p) => {
                p == letter
                    || (letter == 'L' && p == 'M')
                    || (letter == 'l' && p == 'm')
            }
            None => false,
        };

        if !fused || item.args.is_empty() {
            out.push(letter);
            prev_num = None;
        }

        for (i, &n) in item.args.iter().enumerate() {
            let s = fmt.format_number(n);
            let mut delimit = prev_num.is_some();
            if delimit && fmt.no_space_after_flags && item.op == Op::Arc && (i == 4 || i == 5) {
                delimit = false;
            }
            if delimit
                && fmt.negative_extra_space
                && (s.starts_with('-')
                    || (s.starts_with('.')
                        && prev_num.is_some_and(|p| p.fract() != 0.0)))
            {
                delimit = false;
            }
            if delimit {
                out.push(' ');
            }
            out.push_str(&s);
            prev_num = Some(n);
        }

        prev_letter = Some(letter);
    }

    out
}
