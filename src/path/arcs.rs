//! Detection of circular arcs hidden in runs of cubic curves.
//!
//! A convex cubic that hugs a circle becomes an `a` command; neighbouring
//! cubics on the same circle are absorbed into it, walking backwards into
//! the previous item and forwards over following curves, up to a full
//! circle (emitted as two half-arcs). The rewrite is only accepted when the
//! serialized arc form is strictly shorter than the curves it replaces.

use std::f64::consts::PI;

use crate::MakeArcs;
use crate::path::command::{Op, PathItem};
use crate::path::format::NumFormat;
use crate::path::geometry::{
    Circle, arc_angle, find_circle, is_arc, is_arc_prev, is_convex,
};

/// Result of an arc-detection attempt on the current item.
pub(super) enum Outcome {
    /// No rewrite; the item continues through the pipeline unchanged.
    Keep,
    /// The rewrite was accepted and the current item mutated in place.
    Rewrite {
        /// Items after the current one that were absorbed.
        consumed: usize,
        /// The current item merged entirely into the previous arc.
        drop_item: bool,
        /// Second half-circle arc to insert after the current item.
        extra: Option<PathItem>,
        /// The first unconsumed item is an `s` that must be expanded to
        /// longhand before the pipeline continues.
        expand_next_s: bool,
    },
}

/// Try to rewrite the current curve (and its neighbours) as arcs.
///
/// `sdata` is the cubic form of the current item; for an `s` it is the
/// synthesized longhand, for a `c` it is the item's own arguments.
#[allow(clippy::too_many_arguments)]
pub(super) fn try_convert(
    mut prev: Option<&mut PathItem>,
    item: &mut PathItem,
    lookahead: &[PathItem],
    sdata: &[f64],
    params: &MakeArcs,
    fmt: &NumFormat,
    rel_subpoint: &mut [f64; 2],
) -> Outcome {
    let error = fmt.error;
    if !is_convex(sdata) {
        return Outcome::Keep;
    }
    let Some(circle) = find_circle(sdata, error, params.threshold, params.tolerance) else {
        return Outcome::Keep;
    };

    let r = fmt.round(circle.radius);
    let mut angle = arc_angle(sdata, &circle);
    let sweep = if sdata[5] * sdata[0] - sdata[4] * sdata[1] > 0.0 {
        1.0
    } else {
        0.0
    };
    let mut arc = PathItem {
        op: Op::Arc,
        relative: true,
        args: vec![r, r, 0.0, 0.0, sweep, sdata[4], sdata[5]],
        base: item.base,
        coords: item.coords,
        sdata: None,
    };

    // circle center in the frame of the segment after the current one
    let mut rel_circle = Circle {
        center: [circle.center[0] - sdata[4], circle.center[1] - sdata[5]],
        radius: circle.radius,
    };

    // try to absorb the previous item into the arc
    let mut has_prev = false;
    if let Some(p) = prev.as_deref() {
        let absorbs = match p.op {
            Op::Cubic => {
                is_convex(&p.args)
                    && is_arc_prev(&p.args, &circle, error, params.threshold, params.tolerance)
            }
            Op::Arc => p.sdata.as_ref().is_some_and(|sd| {
                is_arc_prev(sd, &circle, error, params.threshold, params.tolerance)
            }),
            _ => false,
        };
        if absorbs {
            let prev_data = match p.op {
                Op::Arc => p.sdata.as_ref().unwrap().clone(),
                _ => p.args.clone(),
            };
            arc.base = p.base;
            arc.args[5] = arc.coords[0] - arc.base[0];
            arc.args[6] = arc.coords[1] - arc.base[1];
            let prev_circle = Circle {
                center: [
                    circle.center[0] + prev_data[4],
                    circle.center[1] + prev_data[5],
                ],
                radius: circle.radius,
            };
            angle += arc_angle(&prev_data, &prev_circle);
            if angle > PI {
                arc.args[3] = 1.0;
            }
            has_prev = true;
        }
    }

    // walk forward over curves that stay on the circle
    let mut consumed = 0usize;
    let mut suffix = String::new();
    let mut second: Option<PathItem> = None;
    for (k, next) in lookahead.iter().enumerate() {
        if !matches!(next.op, Op::Cubic | Op::SmoothCubic) {
            break;
        }
        let next_data: Vec<f64> = if next.op == Op::SmoothCubic {
            let prev_args: &[f64] = if k == 0 {
                &item.args
            } else {
                &lookahead[k - 1].args
            };
            let n = prev_args.len();
            let mut d = vec![
                prev_args[n - 2] - prev_args[n - 4],
                prev_args[n - 1] - prev_args[n - 3],
            ];
            d.extend_from_slice(&next.args);
            // extra length an expansion of this shorthand would add
            let mut head = [d[0], d[1]];
            fmt.round_data(&mut head);
            suffix = format!("c{}", fmt.minify_args(&head, false));
            d
        } else {
            next.args.clone()
        };

        if !is_convex(&next_data)
            || !is_arc(&next_data, &rel_circle, error, params.threshold, params.tolerance)
        {
            break;
        }
        angle += arc_angle(&next_data, &rel_circle);
        if angle - 2.0 * PI > 1e-3 {
            break;
        }
        if angle > PI {
            arc.args[3] = 1.0;
        }
        consumed += 1;
        if 2.0 * PI - angle > 1e-3 {
            arc.coords = next.coords;
            arc.args[5] = arc.coords[0] - arc.base[0];
            arc.args[6] = arc.coords[1] - arc.base[1];
        } else {
            // full circle: a single arc would collapse to a zero-length
            // chord, so cover it with two half-arcs
            arc.args[5] = 2.0 * (rel_circle.center[0] - next_data[4]);
            arc.args[6] = 2.0 * (rel_circle.center[1] - next_data[5]);
            arc.coords = [arc.base[0] + arc.args[5], arc.base[1] + arc.args[6]];
            second = Some(PathItem {
                op: Op::Arc,
                relative: true,
                args: vec![
                    r,
                    r,
                    0.0,
                    0.0,
                    sweep,
                    next.coords[0] - arc.coords[0],
                    next.coords[1] - arc.coords[1],
                ],
                base: arc.coords,
                coords: next.coords,
                sdata: None,
            });
            break;
        }
        rel_circle.center[0] -= next_data[4];
        rel_circle.center[1] -= next_data[5];
    }

    // the rewrite must pay for itself in serialized length
    let mut new_len = stringify(&arc, fmt).len() + suffix.len();
    if let Some(ref a2) = second {
        new_len += stringify(a2, fmt).len();
    }
    let mut old_len = stringify(item, fmt).len();
    if has_prev {
        old_len += stringify(prev.as_deref().unwrap(), fmt).len();
    }
    for next in &lookahead[..consumed] {
        old_len += stringify(next, fmt).len();
    }
    if new_len >= old_len {
        return Outcome::Keep;
    }

    let expand_next_s = lookahead
        .get(consumed)
        .is_some_and(|n| n.op == Op::SmoothCubic);
    let single_curve = !has_prev && consumed == 0;

    if has_prev {
        let p = prev.as_deref_mut().unwrap();
        fmt.round_data(&mut arc.args);
        let n = p.args.len();
        rel_subpoint[0] += arc.args[5] - p.args[n - 2];
        rel_subpoint[1] += arc.args[6] - p.args[n - 1];
        p.op = Op::Arc;
        p.relative = true;
        p.args = arc.args;
        p.coords = arc.coords;
        p.sdata = None;
        item.base = p.coords;
        match second {
            Some(a2) => {
                item.op = a2.op;
                item.relative = true;
                item.args = a2.args;
                item.coords = a2.coords;
                item.sdata = None;
                Outcome::Rewrite {
                    consumed,
                    drop_item: false,
                    extra: None,
                    expand_next_s,
                }
            }
            None => Outcome::Rewrite {
                consumed,
                drop_item: true,
                extra: None,
                expand_next_s,
            },
        }
    } else {
        item.op = Op::Arc;
        item.relative = true;
        item.sdata = single_curve.then(|| sdata.to_vec());
        item.args = arc.args;
        item.coords = arc.coords;
        Outcome::Rewrite {
            consumed,
            drop_item: false,
            extra: second,
            expand_next_s,
        }
    }
}

/// Serialized form of one item, used for length accounting.
fn stringify(item: &PathItem, fmt: &NumFormat) -> String {
    let mut args = item.args.clone();
    fmt.round_data(&mut args);
    let mut out = String::new();
    out.push(item.letter());
    out.push_str(&fmt.minify_args(&args, item.op == Op::Arc));
    out
}
