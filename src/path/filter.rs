//! The filter pipeline: a single forward pass that rewrites each command
//! against its predecessor.
//!
//! The pass keeps a running rounded cursor (`rel_subpoint`) distinct from
//! the exact `coords` annotations; biasing every argument by the gap
//! between the two before rounding keeps the sum of rounded deltas equal to
//! the rounded absolute position, so rounding error never accumulates
//! along the path.

use crate::Options;
use crate::path::arcs::{self, Outcome};
use crate::path::command::{Op, PathItem};
use crate::path::format::{NumFormat, to_fixed};
use crate::path::geometry::{is_straight_curve, reflect, sagitta};
use crate::style::StyleInfo;

pub fn filter(
    mut path: Vec<PathItem>,
    opts: &Options,
    fmt: &NumFormat,
    info: &StyleInfo,
) -> Vec<PathItem> {
    let total = path.len();
    let mut out: Vec<PathItem> = Vec::with_capacity(total);
    let mut rel_subpoint = [0.0f64; 2];
    let mut path_base = [0.0f64; 2];
    let mut prev_q_control: Option<[f64; 2]> = None;

    let mut i = 0;
    while i < path.len() {
        if path[i].op == Op::Close {
            let item = path[i].clone();
            i += 1;
            rel_subpoint = path_base;
            if matches!(out.last(), Some(p) if p.op == Op::Close) {
                continue;
            }
            if redundant_close(&item, opts, fmt, info) {
                continue;
            }
            prev_q_control = None;
            out.push(item);
            continue;
        }

        let mut item = path[i].clone();
        let orig_args = item.args.clone();

        // the cubic form of an `s`, synthesized from its predecessor
        let sdata: Option<Vec<f64>> = (item.op == Op::SmoothCubic).then(|| {
            let mut d = vec![0.0, 0.0];
            d.extend_from_slice(&item.args);
            if let Some(prev) = out.last()
                && matches!(prev.op, Op::Cubic | Op::SmoothCubic)
            {
                let pa = &prev.args;
                let n = pa.len();
                d[0] = pa[n - 2] - pa[n - 4];
                d[1] = pa[n - 1] - pa[n - 3];
            }
            d
        });

        // a) arc detection
        if let Some(params) = &opts.make_arcs
            && matches!(item.op, Op::Cubic | Op::SmoothCubic)
        {
            let cubic_form = sdata.clone().unwrap_or_else(|| item.args.clone());
            let outcome = arcs::try_convert(
                out.last_mut(),
                &mut item,
                &path[i + 1..],
                &cubic_form,
                params,
                fmt,
                &mut rel_subpoint,
            );
            if let Outcome::Rewrite {
                consumed,
                drop_item,
                extra,
                expand_next_s,
            } = outcome
            {
                if expand_next_s {
                    let donor: Vec<f64> = if consumed == 0 {
                        orig_args.clone()
                    } else {
                        path[i + consumed].args.clone()
                    };
                    make_longhand(&mut path[i + 1 + consumed], &donor);
                }
                path.drain(i + 1..i + 1 + consumed);
                if let Some(second) = extra {
                    path.insert(i + 1, second);
                }
                if drop_item {
                    i += 1;
                    continue;
                }
            }
        }

        // b) rounding with error compensation
        if fmt.precision.is_some() {
            if item.relative {
                match item.op {
                    Op::Move | Op::Line | Op::SmoothQuad | Op::Quad | Op::SmoothCubic
                    | Op::Cubic => {
                        for (j, arg) in item.args.iter_mut().enumerate() {
                            *arg += item.base[j % 2] - rel_subpoint[j % 2];
                        }
                    }
                    Op::Horizontal => item.args[0] += item.base[0] - rel_subpoint[0],
                    Op::Vertical => item.args[0] += item.base[1] - rel_subpoint[1],
                    Op::Arc => {
                        item.args[5] += item.base[0] - rel_subpoint[0];
                        item.args[6] += item.base[1] - rel_subpoint[1];
                    }
                    Op::Close => {}
                }
            }
            fmt.round_data(&mut item.args);
        }
        match item.op {
            Op::Horizontal => rel_subpoint[0] += item.args[0],
            Op::Vertical => rel_subpoint[1] += item.args[0],
            _ => {
                let n = item.args.len();
                rel_subpoint[0] += item.args[n - 2];
                rel_subpoint[1] += item.args[n - 1];
            }
        }
        fmt.round_data(&mut rel_subpoint);
        if item.op == Op::Move {
            path_base = rel_subpoint;
        }

        // c) smart arc radius rounding
        let sag = (item.op == Op::Arc)
            .then(|| sagitta(&item.args, fmt.error))
            .flatten();
        if opts.smart_arc_rounding
            && let (Some(s0), Some(p)) = (sag, fmt.precision)
            && p > 0
        {
            for pn in (0..=p as i32).rev() {
                let radius = to_fixed(item.args[0], pn);
                let mut candidate = item.args.clone();
                candidate[0] = radius;
                candidate[1] = radius;
                match sagitta(&candidate, fmt.error) {
                    Some(s) if (s0 - s).abs() < fmt.error => {
                        item.args[0] = radius;
                        item.args[1] = radius;
                    }
                    _ => break,
                }
            }
        }

        // d) straight curves become lines
        if opts.straight_curves {
            let cubic_straight = match item.op {
                Op::Cubic => is_straight_curve(&item.args, fmt.error),
                Op::SmoothCubic => sdata
                    .as_deref()
                    .is_some_and(|d| is_straight_curve(d, fmt.error)),
                _ => false,
            };
            if cubic_straight {
                expand_next(&mut path, i, Op::SmoothCubic, &item.args);
                to_line(&mut item);
            } else if item.op == Op::Quad && is_straight_curve(&item.args, fmt.error) {
                expand_next(&mut path, i, Op::SmoothQuad, &item.args);
                to_line(&mut item);
            } else if item.op == Op::SmoothQuad
                && !matches!(
                    out.last().map(|p| p.op),
                    Some(Op::Quad) | Some(Op::SmoothQuad)
                )
            {
                // implicit control point is the cursor itself
                item.op = Op::Line;
            } else if item.op == Op::Arc
                && (item.args[0] == 0.0
                    || item.args[1] == 0.0
                    || sag.is_some_and(|s| s < fmt.error))
            {
                to_line(&mut item);
            }
        }

        // e) lower cubics that are degree-elevated quadratics
        if opts.convert_to_q && item.op == Op::Cubic {
            let q1 = [1.5 * item.args[0], 1.5 * item.args[1]];
            let q2 = [
                1.5 * item.args[2] - 0.5 * item.args[4],
                1.5 * item.args[3] - 0.5 * item.args[5],
            ];
            if (q1[0] - q2[0]).abs() < fmt.error * 2.0
                && (q1[1] - q2[1]).abs() < fmt.error * 2.0
            {
                let mut q_args = vec![
                    (q1[0] + q2[0]) / 2.0,
                    (q1[1] + q2[1]) / 2.0,
                    item.args[4],
                    item.args[5],
                ];
                fmt.round_data(&mut q_args);
                if fmt.minify_args(&q_args, false).len()
                    < fmt.minify_args(&item.args, false).len()
                {
                    expand_next(&mut path, i, Op::SmoothCubic, &item.args);
                    item.op = Op::Quad;
                    item.args = q_args;
                }
            }
        }

        // f) line shorthands
        if opts.line_shorthands && item.op == Op::Line && item.relative {
            if item.args[1] == 0.0 {
                item.op = Op::Horizontal;
                item.args.truncate(1);
            } else if item.args[0] == 0.0 {
                item.op = Op::Vertical;
                item.args.remove(0);
            }
        }

        // g) collapse repeated moves and axis lines
        if opts.collapse_repeated
            && !info.has_marker_mid
            && matches!(item.op, Op::Move | Op::Horizontal | Op::Vertical)
            && item.relative
            && let Some(prev) = out.last_mut()
            && prev.op == item.op
            && (item.op == Op::Move || (prev.args[0] >= 0.0) == (item.args[0] >= 0.0))
        {
            for (j, a) in item.args.iter().enumerate() {
                prev.args[j] += a;
            }
            prev.coords = item.coords;
            i += 1;
            continue;
        }

        // h) smooth shorthands
        if opts.curve_smooth_shorthands && let Some(prev) = out.last() {
            if item.op == Op::Cubic {
                let implied = match prev.op {
                    Op::Cubic => Some([
                        prev.args[4] - prev.args[2],
                        prev.args[5] - prev.args[3],
                    ]),
                    Op::SmoothCubic => Some([
                        prev.args[2] - prev.args[0],
                        prev.args[3] - prev.args[1],
                    ]),
                    _ => Some([0.0, 0.0]),
                };
                if let Some(ctrl) = implied
                    && (item.args[0] - ctrl[0]).abs() < fmt.error
                    && (item.args[1] - ctrl[1]).abs() < fmt.error
                {
                    item.op = Op::SmoothCubic;
                    item.args.drain(0..2);
                }
            } else if item.op == Op::Quad {
                if prev.op == Op::Quad
                    && (item.args[0] - (prev.args[2] - prev.args[0])).abs() < fmt.error
                    && (item.args[1] - (prev.args[3] - prev.args[1])).abs() < fmt.error
                {
                    item.op = Op::SmoothQuad;
                    item.args.drain(0..2);
                } else if prev.op == Op::SmoothQuad
                    && let Some(qc) = prev_q_control
                {
                    let predicted = reflect(qc, item.base);
                    let real = [item.args[0] + item.base[0], item.args[1] + item.base[1]];
                    if (predicted[0] - real[0]).abs() < fmt.error
                        && (predicted[1] - real[1]).abs() < fmt.error
                    {
                        item.op = Op::SmoothQuad;
                        item.args.drain(0..2);
                    }
                }
            }
        }

        // i) zero-length segments
        if opts.remove_useless && !info.maybe_has_stroke_and_linecap {
            let zero = match item.op {
                Op::Line
                | Op::Horizontal
                | Op::Vertical
                | Op::Quad
                | Op::SmoothQuad
                | Op::Cubic
                | Op::SmoothCubic => item.args.iter().all(|&a| a == 0.0),
                Op::Arc => item.args[5] == 0.0 && item.args[6] == 0.0,
                _ => false,
            };
            if zero {
                i += 1;
                continue;
            }
        }

        // j) a trailing line back to the subpath start becomes a closepath
        let next_is_close = path.get(i + 1).is_some_and(|n| n.op == Op::Close);
        if opts.convert_to_z
            && (info.is_safe_to_use_z || next_is_close)
            && matches!(item.op, Op::Line | Op::Horizontal | Op::Vertical)
            && (path_base[0] - item.coords[0]).abs() < fmt.error
            && (path_base[1] - item.coords[1]).abs() < fmt.error
        {
            item.op = Op::Close;
            item.args.clear();
        }
        if item.op == Op::Close && redundant_close(&item, opts, fmt, info) {
            i += 1;
            continue;
        }

        // k) carry the implicit quadratic control point forward
        prev_q_control = match item.op {
            Op::Quad => Some([item.args[0] + item.base[0], item.args[1] + item.base[1]]),
            Op::SmoothQuad => Some(match prev_q_control {
                Some(qc) => reflect(qc, item.base),
                None => item.coords,
            }),
            _ => None,
        };

        out.push(item);
        i += 1;
    }

    if out.len() != total {
        log::debug!("path filter: {} items in, {} out", total, out.len());
    }
    out
}

/// A closepath of a subpath that already ended on its start point.
fn redundant_close(item: &PathItem, opts: &Options, fmt: &NumFormat, info: &StyleInfo) -> bool {
    opts.remove_useless
        && info.is_safe_to_use_z
        && (item.base[0] - item.coords[0]).abs() < fmt.error / 10.0
        && (item.base[1] - item.coords[1]).abs() < fmt.error / 10.0
}

/// Expand a following shorthand to its longhand form before the current
/// item stops being the curve it reflects.
fn expand_next(path: &mut [PathItem], i: usize, op: Op, donor: &[f64]) {
    if let Some(next) = path.get_mut(i + 1)
        && next.op == op
    {
        make_longhand(next, donor);
    }
}

/// Turn `s` into `c` (or `t` into `q`) by materializing the reflected
/// control point from the donor's trailing control pair.
pub(super) fn make_longhand(item: &mut PathItem, donor: &[f64]) {
    match item.op {
        Op::SmoothCubic => item.op = Op::Cubic,
        Op::SmoothQuad => item.op = Op::Quad,
        _ => return,
    }
    let n = donor.len();
    item.args.insert(0, donor[n - 1] - donor[n - 3]);
    item.args.insert(0, donor[n - 2] - donor[n - 4]);
}

/// Replace a curve with a line to its endpoint.
fn to_line(item: &mut PathItem) {
    let n = item.args.len();
    item.args = item.args.split_off(n - 2);
    item.op = Op::Line;
}
