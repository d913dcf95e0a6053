//! Numerical geometry for curve analysis.
//!
//! All curve arguments are in the relative frame of the segment: the
//! starting point is the origin and `[x1, y1, x2, y2, x, y]` are the two
//! control points and the endpoint of a cubic.

pub type Point = [f64; 2];

/// A circle candidate fitted to a curve, in the curve's relative frame.
#[derive(Debug, Clone)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// Reflect `point` across `base`.
pub fn reflect(point: Point, base: Point) -> Point {
    [2.0 * base[0] - point[0], 2.0 * base[1] - point[1]]
}

/// Intersection of the lines through (p0, p1) and (p2, p3), given as
/// `[x0, y0, x1, y1, x2, y2, x3, y3]`. Parallel lines and non-finite
/// solutions yield `None`.
pub fn line_intersection(coords: [f64; 8]) -> Option<Point> {
    let a1 = coords[1] - coords[3];
    let b1 = coords[2] - coords[0];
    let c1 = coords[0] * coords[3] - coords[2] * coords[1];
    let a2 = coords[5] - coords[7];
    let b2 = coords[6] - coords[4];
    let c2 = coords[4] * coords[7] - coords[6] * coords[5];
    let denom = a1 * b2 - a2 * b1;
    if denom == 0.0 {
        return None;
    }
    let cross = [(b1 * c2 - b2 * c1) / denom, (a1 * c2 - a2 * c1) / -denom];
    if cross[0].is_finite() && cross[1].is_finite() {
        Some(cross)
    } else {
        None
    }
}

/// Evaluate a cubic Bézier (with p0 at the origin) at parameter `t`.
pub fn cubic_point(curve: &[f64], t: f64) -> Point {
    let sqr_t = t * t;
    let cub_t = sqr_t * t;
    let mt = 1.0 - t;
    let sqr_mt = mt * mt;
    [
        3.0 * sqr_mt * t * curve[0] + 3.0 * mt * sqr_t * curve[2] + cub_t * curve[4],
        3.0 * sqr_mt * t * curve[1] + 3.0 * mt * sqr_t * curve[3] + cub_t * curve[5],
    ]
}

/// Whether the four control points form a convex quadrilateral, i.e. its
/// diagonals intersect strictly inside. Necessary for arc approximation.
pub fn is_convex(curve: &[f64]) -> bool {
    let center = line_intersection([
        0.0, 0.0, curve[2], curve[3], curve[0], curve[1], curve[4], curve[5],
    ]);
    match center {
        Some(c) => {
            (curve[2] < c[0]) == (c[0] < 0.0)
                && (curve[3] < c[1]) == (c[1] < 0.0)
                && (curve[4] < c[0]) == (c[0] < curve[0])
                && (curve[5] < c[1]) == (c[1] < curve[1])
        }
        None => false,
    }
}

/// Fit a circle through the curve's endpoints and midpoint, then verify the
/// fit by sampling at t=1/4 and t=3/4.
///
/// The verification tolerance is `min(threshold * error, tolerance * r / 100)`;
/// radii of 1e15 or more are rejected as numerically meaningless.
pub fn find_circle(curve: &[f64], error: f64, threshold: f64, tolerance: f64) -> Option<Circle> {
    let mid = cubic_point(curve, 0.5);
    let m1 = [mid[0] / 2.0, mid[1] / 2.0];
    let m2 = [(mid[0] + curve[4]) / 2.0, (mid[1] + curve[5]) / 2.0];
    // perpendicular bisectors of the two half-chords
    let center = line_intersection([
        m1[0],
        m1[1],
        m1[0] + m1[1],
        m1[1] - m1[0],
        m2[0],
        m2[1],
        m2[0] + m2[1] - mid[1],
        m2[1] - m2[0] + mid[0],
    ])?;
    let radius = distance([0.0, 0.0], center);
    if radius >= 1e15 {
        return None;
    }
    let tol = (threshold * error).min(tolerance * radius / 100.0);
    for t in [0.25, 0.75] {
        if (distance(cubic_point(curve, t), center) - radius).abs() > tol {
            return None;
        }
    }
    Some(Circle { center, radius })
}

/// Whether the curve stays on the circle at t in {0, 1/4, 1/2, 3/4, 1}.
pub fn is_arc(curve: &[f64], circle: &Circle, error: f64, threshold: f64, tolerance: f64) -> bool {
    let tol = (threshold * error).min(tolerance * circle.radius / 100.0);
    [0.0, 0.25, 0.5, 0.75, 1.0].iter().all(|&t| {
        (distance(cubic_point(curve, t), circle.center) - circle.radius).abs() <= tol
    })
}

/// [`is_arc`] against the circle shifted into the previous segment's frame.
pub fn is_arc_prev(
    curve: &[f64],
    circle: &Circle,
    error: f64,
    threshold: f64,
    tolerance: f64,
) -> bool {
    let shifted = Circle {
        center: [circle.center[0] + curve[4], circle.center[1] + curve[5]],
        radius: circle.radius,
    };
    is_arc(curve, &shifted, error, threshold, tolerance)
}

/// Angle subtended by the curve's chord as seen from the circle center.
pub fn arc_angle(curve: &[f64], circle: &Circle) -> f64 {
    let x1 = -circle.center[0];
    let y1 = -circle.center[1];
    let x2 = curve[4] - circle.center[0];
    let y2 = curve[5] - circle.center[1];
    ((x1 * x2 + y1 * y2) / ((x1 * x1 + y1 * y1) * (x2 * x2 + y2 * y2)).sqrt()).acos()
}

/// Whether both control points lie within `error` of the chord from the
/// origin to the endpoint. Degenerate curves with a zero-length chord are
/// rejected.
pub fn is_straight_curve(curve: &[f64], error: f64) -> bool {
    // line through the origin and the endpoint: a·x + b·y = 0
    let n = curve.len();
    let a = curve[n - 1];
    let b = -curve[n - 2];
    let d = 1.0 / (a * a + b * b);
    if !d.is_finite() {
        return false;
    }
    for pair in curve[..n - 2].chunks_exact(2) {
        if ((a * pair[0] + b * pair[1]).powi(2) * d).sqrt() > error {
            return false;
        }
    }
    true
}

/// Sagitta of an arc command's segment: the perpendicular distance from the
/// chord midpoint to the arc. Defined only for circular small arcs.
pub fn sagitta(args: &[f64], error: f64) -> Option<f64> {
    if args[3] == 1.0 {
        return None;
    }
    let [rx, ry] = [args[0], args[1]];
    if (rx - ry).abs() > error {
        return None;
    }
    let chord = args[5].hypot(args[6]);
    if chord > 2.0 * rx {
        return None;
    }
    Some(rx - (rx * rx - 0.25 * chord * chord).sqrt())
}
