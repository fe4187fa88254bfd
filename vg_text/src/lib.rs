// vecraster/text/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The glyph outliner (spec.md §4.D): a small capability interface over a
//! glyph provider, plus the text layout algorithm that walks a string and
//! appends glyph contours to a [`vg_content::Path`] as closed subpaths.
//!
//! Font file parsing is explicitly out of scope (spec.md §1); this crate
//! only consumes whatever contours a provider hands it. The default
//! provider ([`RectGlyphProvider`]) is a deterministic rectangular
//! substitute so layout can be exercised without a platform font.

use vg_content::Path;
use vg_geometry::vector::Vector2F;

/// One glyph's outline, in unit-em space: y-down, nominal range `0..1`.
#[derive(Clone, Debug)]
pub struct Glyph {
    pub contours: Vec<Vec<Vector2F>>,
    pub advance: f32,
}

/// The capability every typeface implementation (system font, embedded
/// bitmap font, test double) must provide.
pub trait GlyphProvider {
    /// Returns the glyph for `c`, or `None` if the provider has no glyph
    /// for that codepoint.
    fn get_glyph(&self, c: char) -> Option<Glyph>;
}

/// A deterministic rectangular-glyph substitute: every printable character
/// maps to the same unit-em box, ensuring layout tests never depend on a
/// platform font.
pub struct RectGlyphProvider {
    pub box_width: f32,
    pub box_height: f32,
    pub advance: f32,
}

impl Default for RectGlyphProvider {
    fn default() -> RectGlyphProvider {
        RectGlyphProvider { box_width: 0.6, box_height: 0.7, advance: 0.65 }
    }
}

impl GlyphProvider for RectGlyphProvider {
    fn get_glyph(&self, c: char) -> Option<Glyph> {
        if c.is_whitespace() {
            return Some(Glyph { contours: Vec::new(), advance: self.advance });
        }
        let contour = vec![
            Vector2F::new(0.0, 0.0),
            Vector2F::new(self.box_width, 0.0),
            Vector2F::new(self.box_width, -self.box_height),
            Vector2F::new(0.0, -self.box_height),
            Vector2F::new(0.0, 0.0),
        ];
        Some(Glyph { contours: vec![contour], advance: self.advance })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLayoutOptions {
    pub letter_spacing: f32,
    pub line_spacing: f32,
    pub baseline_offset: f32,
}

impl Default for TextLayoutOptions {
    fn default() -> TextLayoutOptions {
        TextLayoutOptions { letter_spacing: 0.0, line_spacing: 1.2, baseline_offset: 0.8 }
    }
}

/// Lays out `text` starting at `(origin_x, origin_y)` at `size` using
/// `provider`, appending each glyph's contours to a fresh [`Path`] as
/// closed subpaths. See spec.md §4.D.
pub fn layout_text(
    provider: &dyn GlyphProvider,
    text: &str,
    origin_x: f32,
    origin_y: f32,
    size: f32,
    options: &TextLayoutOptions,
) -> Path {
    let mut path = Path::new();
    let mut pen = Vector2F::new(origin_x, origin_y + options.baseline_offset * size);

    for c in text.chars() {
        if c == '\n' {
            pen = Vector2F::new(origin_x, pen.y + size * options.line_spacing);
            continue;
        }
        let glyph = provider
            .get_glyph(c)
            .or_else(|| provider.get_glyph('?'))
            .unwrap_or(Glyph { contours: Vec::new(), advance: 0.0 });

        for contour in &glyph.contours {
            let transformed: Vec<Vector2F> =
                contour.iter().map(|&p| Vector2F::new(pen.x + p.x * size, pen.y + p.y * size)).collect();
            path.poly(&transformed, true);
        }

        pen = Vector2F::new(pen.x + glyph.advance * size + options.letter_spacing, pen.y);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_resets_x_and_advances_y() {
        let provider = RectGlyphProvider::default();
        let path = layout_text(&provider, "a\nb", 0.0, 0.0, 10.0, &TextLayoutOptions::default());
        // Two non-whitespace glyphs -> two closed subpaths.
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths.len(), 2);
    }

    #[test]
    fn missing_glyph_falls_back_to_question_mark() {
        struct OnlyQ;
        impl GlyphProvider for OnlyQ {
            fn get_glyph(&self, c: char) -> Option<Glyph> {
                if c == '?' {
                    Some(Glyph {
                        contours: vec![vec![Vector2F::zero(), Vector2F::new(1.0, 0.0), Vector2F::zero()]],
                        advance: 1.0,
                    })
                } else {
                    None
                }
            }
        }
        let path = layout_text(&OnlyQ, "x", 0.0, 0.0, 10.0, &TextLayoutOptions::default());
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths.len(), 1);
    }

    #[test]
    fn whitespace_advances_without_contours() {
        let provider = RectGlyphProvider::default();
        let path = layout_text(&provider, "a b", 0.0, 0.0, 10.0, &TextLayoutOptions::default());
        let subpaths = path.flatten(vg_content::DEFAULT_FLATTEN_TOLERANCE);
        assert_eq!(subpaths.len(), 2);
    }
}
