//! SVG path data parsing.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html

use crate::error::PathminError;
use crate::path::command::{Op, PathItem};

/// Parse path data into a command sequence.
///
/// Implicit repetition is expanded: coordinates following a complete
/// command repeat it, with `M`/`m` repeating as `L`/`l`.
pub fn parse_path_data(d: &str) -> Result<Vec<PathItem>, PathminError> {
    let mut parser = DataParser::new(d);
    parser.parse()
}

struct DataParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> DataParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Vec<PathItem>, PathminError> {
        let mut items = Vec::new();
        let mut last: Option<(Op, bool)> = None;

        self.skip_whitespace();

        while !self.is_eof() {
            let (op, relative) = if self.peek().map(|c| c.is_ascii_alphabetic()).unwrap_or(false) {
                let c = self.next().unwrap();
                let parsed = Op::from_letter(c).ok_or_else(|| {
                    PathminError::PathData(format!("Unknown command: {}", c))
                })?;
                last = Some(parsed);
                parsed
            } else {
                // implicit repetition of the previous command
                match last {
                    Some((Op::Move, relative)) => {
                        last = Some((Op::Line, relative));
                        (Op::Line, relative)
                    }
                    Some((Op::Close, _)) | None => {
                        return Err(PathminError::PathData(
                            "Expected command letter".into(),
                        ));
                    }
                    Some(cmd) => cmd,
                }
            };

            if items.is_empty() && op != Op::Move {
                return Err(PathminError::PathData(
                    "Path data must begin with a moveto".into(),
                ));
            }

            let args = self.parse_args(op)?;
            items.push(PathItem::new(op, relative, args));
            self.skip_whitespace_and_comma();
        }

        Ok(items)
    }

    fn parse_args(&mut self, op: Op) -> Result<Vec<f64>, PathminError> {
        let mut args = Vec::with_capacity(op.arity());
        for i in 0..op.arity() {
            // arc flags are single characters and may pack against the
            // following number, e.g. `a20 60 45 0130 20`
            let arg = if op == Op::Arc && (i == 3 || i == 4) {
                self.parse_flag()?
            } else {
                self.parse_number()?
            };
            args.push(arg);
        }
        Ok(args)
    }

    fn parse_number(&mut self) -> Result<f64, PathminError> {
        self.skip_whitespace_and_comma();

        let start = self.pos;

        if self.peek() == Some('-') || self.peek() == Some('+') {
            self.next();
        }
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.next();
        }
        if self.peek() == Some('.') {
            self.next();
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.next();
            }
        }
        if self.peek() == Some('e') || self.peek() == Some('E') {
            self.next();
            if self.peek() == Some('-') || self.peek() == Some('+') {
                self.next();
            }
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.next();
            }
        }

        let s = &self.input[start..self.pos];
        if s.is_empty() {
            return Err(PathminError::PathData("Expected number".into()));
        }

        s.parse()
            .map_err(|_| PathminError::PathData(format!("Invalid number: {}", s)))
    }

    fn parse_flag(&mut self) -> Result<f64, PathminError> {
        self.skip_whitespace_and_comma();
        match self.next() {
            Some('0') => Ok(0.0),
            Some('1') => Ok(1.0),
            Some(c) => Err(PathminError::PathData(format!(
                "Expected flag (0 or 1), got: {}",
                c
            ))),
            None => Err(PathminError::PathData("Expected flag".into())),
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .map(|c| c.is_ascii_whitespace())
            .unwrap_or(false)
        {
            self.next();
        }
    }

    fn skip_whitespace_and_comma(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.next();
        }
        self.skip_whitespace();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let items = parse_path_data("M10 20 L30 40").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].op, Op::Move);
        assert!(!items[0].relative);
        assert_eq!(items[0].args, vec![10.0, 20.0]);
        assert_eq!(items[1].op, Op::Line);
    }

    #[test]
    fn test_parse_relative_and_commas() {
        let items = parse_path_data("m10,20 l30,40").unwrap();
        assert!(items[0].relative);
        assert_eq!(items[1].args, vec![30.0, 40.0]);
    }

    #[test]
    fn test_implicit_lineto() {
        let items = parse_path_data("M10 20 30 40 50 60").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].op, Op::Line);
        assert!(!items[1].relative);
        assert_eq!(items[2].op, Op::Line);
    }

    #[test]
    fn test_implicit_repeat_keeps_case() {
        let items = parse_path_data("m10 20 30 40").unwrap();
        assert_eq!(items[1].op, Op::Line);
        assert!(items[1].relative);
    }

    #[test]
    fn test_parse_arc_packed_flags() {
        let items = parse_path_data("M0 0a20 60 45 0130 20").unwrap();
        assert_eq!(items[1].op, Op::Arc);
        assert_eq!(items[1].args, vec![20.0, 60.0, 45.0, 0.0, 1.0, 30.0, 20.0]);
    }

    #[test]
    fn test_parse_compact_decimals() {
        let items = parse_path_data("M.5.5-.5-.5").unwrap();
        assert_eq!(items[0].args, vec![0.5, 0.5]);
        assert_eq!(items[1].args, vec![-0.5, -0.5]);
    }

    #[test]
    fn test_reject_garbage() {
        assert!(parse_path_data("X10 10").is_err());
        assert!(parse_path_data("M10").is_err());
        assert!(parse_path_data("L10 10").is_err());
        assert!(parse_path_data("10 10").is_err());
    }

    #[test]
    fn test_close_then_implicit_fails() {
        assert!(parse_path_data("M0 0z5 5").is_err());
    }
}
