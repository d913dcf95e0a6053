//! Number rounding and minimal argument serialization.

/// Rounding and formatting context, built once per element from [`Options`]
/// and threaded through every pipeline stage.
///
/// [`Options`]: crate::Options
#[derive(Debug, Clone)]
pub struct NumFormat {
    /// Decimal places; `None` disables rounding entirely.
    pub precision: Option<u8>,
    /// Tolerance under which two coordinates are considered equal.
    pub error: f64,
    pub leading_zero: bool,
    pub negative_extra_space: bool,
    pub no_space_after_flags: bool,
}

impl NumFormat {
    pub fn new(
        precision: Option<u8>,
        leading_zero: bool,
        negative_extra_space: bool,
        no_space_after_flags: bool,
    ) -> Self {
        let error = match precision {
            Some(p) => to_fixed(0.1f64.powi(p as i32), p as i32),
            None => 1e-2,
        };
        Self {
            precision,
            error,
            leading_zero,
            negative_extra_space,
            no_space_after_flags,
        }
    }

    /// Round a single value under the active strategy.
    ///
    /// Smart rounding prefers the value one digit shorter when the error it
    /// introduces, re-expressed at precision p+1, stays below the tolerance:
    /// 2.3491 rounds to 2.35 at p=2 rather than 2.349 at p=3.
    pub fn round(&self, value: f64) -> f64 {
        match self.precision {
            None => value,
            Some(p) if p == 0 || p >= 20 => value.round(),
            Some(p) => {
                let p = p as i32;
                let fixed = to_fixed(value, p);
                if fixed == value {
                    value
                } else {
                    let shorter = to_fixed(value, p - 1);
                    if to_fixed((shorter - value).abs(), p + 1) >= self.error {
                        fixed
                    } else {
                        shorter
                    }
                }
            }
        }
    }

    pub fn round_data(&self, data: &mut [f64]) {
        for v in data.iter_mut() {
            *v = self.round(*v);
        }
    }

    /// Format one already-rounded number, applying the leading-zero policy.
    pub fn format_number(&self, n: f64) -> String {
        if n == 0.0 {
            return "0".into();
        }
        let mut s = format!("{}", n);
        if self.leading_zero {
            if let Some(rest) = s.strip_prefix("0.") {
                s = format!(".{}", rest);
            } else if let Some(rest) = s.strip_prefix("-0.") {
                s = format!("-.{}", rest);
            }
        }
        s
    }

    /// Serialize an argument list with minimized delimiters.
    ///
    /// A single space separates two numbers; the separator is elided before
    /// a negative number and before a `.`-leading number following a number
    /// with a fractional part (when `negative_extra_space` is on), and after
    /// the two arc flags (when `no_space_after_flags` is on).
    pub fn minify_args(&self, data: &[f64], arc: bool) -> String {
        let mut out = String::new();
        let mut prev = 0.0f64;
        for (i, &n) in data.iter().enumerate() {
            let s = self.format_number(n);
            let mut delimit = i > 0;
            if delimit && self.no_space_after_flags && arc {
                let pos = i % 7;
                if pos == 4 || pos == 5 {
                    delimit = false;
                }
            }
            if delimit
                && self.negative_extra_space
                && (s.starts_with('-') || (s.starts_with('.') && prev.fract() != 0.0))
            {
                delimit = false;
            }
            if delimit {
                out.push(' ');
            }
            out.push_str(&s);
            prev = n;
        }
        out
    }
}

/// Round half away from zero at the given number of decimal places.
pub fn to_fixed(value: f64, precision: i32) -> f64 {
    let pow = 10f64.powi(precision);
    (value * pow).round() / pow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(p: Option<u8>) -> NumFormat {
        NumFormat::new(p, true, true, false)
    }

    #[test]
    fn test_error_constant() {
        assert_eq!(fmt(Some(3)).error, 0.001);
        assert_eq!(fmt(Some(1)).error, 0.1);
        assert_eq!(fmt(None).error, 0.01);
    }

    #[test]
    fn test_smart_round_prefers_shorter() {
        // one digit less only costs 0.0009, under the 0.001 tolerance at p=3
        assert_eq!(fmt(Some(3)).round(2.3491), 2.35);
        // here the shorter form is off by 0.0049: keep full precision
        assert_eq!(fmt(Some(3)).round(2.4449), 2.445);
        // already exact at p: untouched
        assert_eq!(fmt(Some(3)).round(2.35), 2.35);
    }

    #[test]
    fn test_round_modes() {
        assert_eq!(fmt(Some(0)).round(2.5), 3.0);
        assert_eq!(fmt(Some(0)).round(-2.5), -3.0);
        assert_eq!(fmt(None).round(2.3491), 2.3491);
    }

    #[test]
    fn test_format_number() {
        let f = fmt(Some(2));
        assert_eq!(f.format_number(0.0), "0");
        assert_eq!(f.format_number(-0.0), "0");
        assert_eq!(f.format_number(1.0), "1");
        assert_eq!(f.format_number(0.5), ".5");
        assert_eq!(f.format_number(-0.5), "-.5");
        let plain = NumFormat::new(Some(2), false, true, false);
        assert_eq!(plain.format_number(0.5), "0.5");
    }

    #[test]
    fn test_minify_args_separators() {
        let f = fmt(Some(2));
        assert_eq!(f.minify_args(&[10.0, 10.0], false), "10 10");
        assert_eq!(f.minify_args(&[10.0, -5.0], false), "10-5");
        assert_eq!(f.minify_args(&[1.5, 0.5], false), "1.5.5");
        assert_eq!(f.minify_args(&[1.0, 0.5], false), "1 .5");
        let no_fuse = NumFormat::new(Some(2), true, false, false);
        assert_eq!(no_fuse.minify_args(&[10.0, -5.0], false), "10 -5");
    }

    #[test]
    fn test_arc_flag_elision() {
        let f = NumFormat::new(Some(2), true, true, true);
        let args = [20.0, 60.0, 45.0, 0.0, 1.0, 30.0, 20.0];
        assert_eq!(f.minify_args(&args, true), "20 60 45 0130 20");
        let off = fmt(Some(2));
        assert_eq!(off.minify_args(&args, true), "20 60 45 0 1 30 20");
    }
}
