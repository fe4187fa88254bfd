// vecraster/svg/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A parser for the SVG `d` path mini-language, appending the parsed
//! commands to a [`vg_content::Path`]. Unsupported command letters are
//! skipped (per spec.md §4.B); numeric parse failures are fatal to the
//! current parse.

mod arc;

use vg_content::Path;
use vg_geometry::vector::Vector2F;

pub use arc::arc_to_cubics;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("expected a number at byte offset {0}")]
    ExpectedNumber(usize),
    #[error("command '{0}' requires an argument that was not supplied")]
    MissingOperand(char),
    #[error("empty path data")]
    Empty,
}

/// Parses an SVG `d` attribute value and appends the resulting commands to
/// a fresh [`Path`].
pub fn parse_path(d: &str) -> Result<Path, ParseError> {
    let mut path = Path::new();
    parse_path_into(d, &mut path)?;
    Ok(path)
}

/// Parses `d` and appends to an existing path, so callers can combine
/// multiple SVG subpaths into one scene path.
pub fn parse_path_into(d: &str, path: &mut Path) -> Result<(), ParseError> {
    let mut parser = Parser::new(d);
    parser.run(path)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum PrevCurve {
    None,
    Cubic,
    Quad,
}

impl<'a> Parser<'a> {
    fn new(d: &'a str) -> Parser<'a> {
        Parser { bytes: d.as_bytes(), pos: 0 }
    }

    fn run(&mut self, path: &mut Path) -> Result<(), ParseError> {
        let mut pen = Vector2F::zero();
        let mut subpath_start = Vector2F::zero();
        let mut last_control: Option<Vector2F> = None;
        let mut prev_curve = PrevCurve::None;
        let mut has_any = false;

        loop {
            self.skip_whitespace_and_commas();
            let cmd = match self.peek_command_letter() {
                Some(c) => c,
                None => break,
            };
            self.pos += 1;
            has_any = true;
            let relative = cmd.is_ascii_lowercase();
            let upper = cmd.to_ascii_uppercase();

            match upper {
                'M' => {
                    let mut first = true;
                    loop {
                        let (x, y) = self.read_pair()?;
                        let p = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                        // Implicit repeats of M become L (lowercase m -> l),
                        // per spec.md §4.B: only the first pair is a MoveTo.
                        if first {
                            path.move_to(p);
                            subpath_start = p;
                        } else {
                            path.line_to(p);
                        }
                        pen = p;
                        last_control = None;
                        prev_curve = PrevCurve::None;
                        first = false;
                        if !self.more_numbers_follow() {
                            break;
                        }
                    }
                }
                'L' => loop {
                    let (x, y) = self.read_pair()?;
                    let p = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                    path.line_to(p);
                    pen = p;
                    last_control = None;
                    prev_curve = PrevCurve::None;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'H' => loop {
                    let x = self.read_number()?;
                    let p = if relative { Vector2F::new(pen.x + x, pen.y) } else { Vector2F::new(x, pen.y) };
                    path.line_to(p);
                    pen = p;
                    last_control = None;
                    prev_curve = PrevCurve::None;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'V' => loop {
                    let y = self.read_number()?;
                    let p = if relative { Vector2F::new(pen.x, pen.y + y) } else { Vector2F::new(pen.x, y) };
                    path.line_to(p);
                    pen = p;
                    last_control = None;
                    prev_curve = PrevCurve::None;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'C' => loop {
                    let (x1, y1) = self.read_pair()?;
                    let (x2, y2) = self.read_pair()?;
                    let (x, y) = self.read_pair()?;
                    let (c1, c2, p) = if relative {
                        (pen + Vector2F::new(x1, y1), pen + Vector2F::new(x2, y2), pen + Vector2F::new(x, y))
                    } else {
                        (Vector2F::new(x1, y1), Vector2F::new(x2, y2), Vector2F::new(x, y))
                    };
                    path.cubic_to(c1, c2, p);
                    pen = p;
                    last_control = Some(c2);
                    prev_curve = PrevCurve::Cubic;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'S' => loop {
                    let (x2, y2) = self.read_pair()?;
                    let (x, y) = self.read_pair()?;
                    let c2_abs = if relative { pen + Vector2F::new(x2, y2) } else { Vector2F::new(x2, y2) };
                    let p = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                    let c1 = match (prev_curve, last_control) {
                        (PrevCurve::Cubic, Some(prev_c2)) => pen + (pen - prev_c2),
                        _ => pen,
                    };
                    path.cubic_to(c1, c2_abs, p);
                    pen = p;
                    last_control = Some(c2_abs);
                    prev_curve = PrevCurve::Cubic;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'Q' => loop {
                    let (x1, y1) = self.read_pair()?;
                    let (x, y) = self.read_pair()?;
                    let cp = if relative { pen + Vector2F::new(x1, y1) } else { Vector2F::new(x1, y1) };
                    let p = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                    path.quad_to(cp, p);
                    pen = p;
                    last_control = Some(cp);
                    prev_curve = PrevCurve::Quad;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'T' => loop {
                    let (x, y) = self.read_pair()?;
                    let p = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                    let cp = match (prev_curve, last_control) {
                        (PrevCurve::Quad, Some(prev_cp)) => pen + (pen - prev_cp),
                        _ => pen,
                    };
                    path.quad_to(cp, p);
                    pen = p;
                    last_control = Some(cp);
                    prev_curve = PrevCurve::Quad;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'A' => loop {
                    let rx = self.read_number()?.abs();
                    let ry = self.read_number()?.abs();
                    let rotation_deg = self.read_number()?;
                    let large_arc = self.read_flag()?;
                    let sweep = self.read_flag()?;
                    let (x, y) = self.read_pair()?;
                    let end = if relative { pen + Vector2F::new(x, y) } else { Vector2F::new(x, y) };
                    let cubics = arc_to_cubics(pen, rx, ry, rotation_deg.to_radians(), large_arc, sweep, end);
                    for (c1, c2, p) in cubics {
                        path.cubic_to(c1, c2, p);
                    }
                    pen = end;
                    last_control = None;
                    prev_curve = PrevCurve::None;
                    if !self.more_numbers_follow() {
                        break;
                    }
                },
                'Z' => {
                    path.close();
                    pen = subpath_start;
                    last_control = None;
                    prev_curve = PrevCurve::None;
                }
                _ => {
                    // Unknown command letter: skip until the next known one.
                    self.skip_until_next_command();
                }
            }
        }

        if !has_any {
            return Err(ParseError::Empty);
        }
        Ok(())
    }

    fn skip_whitespace_and_commas(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b',' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek_command_letter(&self) -> Option<char> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let c = self.bytes[self.pos] as char;
        if c.is_ascii_alphabetic() {
            Some(c)
        } else {
            None
        }
    }

    fn skip_until_next_command(&mut self) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos] as char;
            if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Whether more numeric operands follow before the next command letter
    /// — implements SVG's implicit command repetition.
    fn more_numbers_follow(&mut self) -> bool {
        let save = self.pos;
        self.skip_whitespace_and_commas();
        let more = self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'-' || self.bytes[self.pos] == b'+' || self.bytes[self.pos] == b'.');
        self.pos = save;
        more
    }

    fn read_pair(&mut self) -> Result<(f32, f32), ParseError> {
        let x = self.read_number()?;
        let y = self.read_number()?;
        Ok((x, y))
    }

    fn read_flag(&mut self) -> Result<bool, ParseError> {
        self.skip_whitespace_and_commas();
        if self.pos >= self.bytes.len() {
            return Err(ParseError::ExpectedNumber(self.pos));
        }
        let c = self.bytes[self.pos];
        match c {
            b'0' => {
                self.pos += 1;
                Ok(false)
            }
            b'1' => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(ParseError::ExpectedNumber(self.pos)),
        }
    }

    fn read_number(&mut self) -> Result<f32, ParseError> {
        self.skip_whitespace_and_commas();
        let start = self.pos;
        let mut end = self.pos;
        let bytes = self.bytes;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let mut saw_digit = false;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
                saw_digit = true;
            }
        }
        if !saw_digit {
            return Err(ParseError::ExpectedNumber(start));
        }
        if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut exp_end = end + 1;
            if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
                exp_end += 1;
            }
            let mut saw_exp_digit = false;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
                saw_exp_digit = true;
            }
            if saw_exp_digit {
                end = exp_end;
            }
        }
        let text = std::str::from_utf8(&bytes[start..end]).unwrap();
        let value: f32 = text.parse().map_err(|_| ParseError::ExpectedNumber(start))?;
        self.pos = end;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moveto_lineto_close_roundtrips() {
        let path = parse_path("M0 0 L10 0 L10 10 Z").unwrap();
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].len(), 4);
    }

    #[test]
    fn implicit_lineto_repeat_after_moveto() {
        let path = parse_path("M0,0 10,0 10,10").unwrap();
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths[0].len(), 3);
    }

    #[test]
    fn relative_commands_accumulate() {
        let path = parse_path("m10 10 l5 0 l0 5").unwrap();
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths[0][2], Vector2F::new(15.0, 15.0));
    }

    #[test]
    fn unknown_command_letter_is_skipped() {
        // 'B' is not a known command; it and its would-be args are skipped
        // until the next known command letter 'L'.
        let path = parse_path("M0 0 B 1 2 3 L10 10").unwrap();
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert!(subpaths[0].contains(&Vector2F::new(10.0, 10.0)));
    }

    #[test]
    fn missing_number_is_a_parse_error() {
        assert!(parse_path("M0").is_err());
    }

    #[test]
    fn smooth_cubic_reflects_previous_control_point() {
        let path = parse_path("M0 0 C10 10 20 10 30 0 S50 -10 60 0").unwrap();
        // Just confirm it parses into two cubics without error and lands
        // on the final point.
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        let last = *subpaths[0].last().unwrap();
        assert!((last.x - 60.0).abs() < 1e-3 && last.y.abs() < 1e-3);
    }
}
