//! Discrete color interpolation for gradients and rainbows.
//!
//! Gradients are rendered as equal solid slices, not a continuous blend:
//! `k` anchors over `n` codepoints become `k` slices of `round(n / k)`
//! codepoints each, the last slice absorbing any remainder. This exact rule
//! is relied on for round-trip parity and must not be "improved".

use crate::color::Color;

/// One color per codepoint across `len` codepoints of a gradient.
///
/// A single anchor degenerates to a solid color.
pub fn gradient_colors(len: usize, anchors: &[Color]) -> Vec<Color> {
    if len == 0 || anchors.is_empty() {
        return Vec::new();
    }
    if anchors.len() == 1 {
        return vec![anchors[0]; len];
    }
    let step = ((len as f64) / (anchors.len() as f64)).round().max(1.0) as usize;
    (0..len)
        .map(|i| anchors[(i / step).min(anchors.len() - 1)])
        .collect()
}

/// One color per codepoint of a hue-cycling rainbow.
///
/// `hue(i) = (phase + i * 360 / len) mod 360`, at full saturation and value;
/// phase 0 starts at hue 0.
pub fn rainbow_colors(len: usize, phase: i32) -> Vec<Color> {
    (0..len)
        .map(|i| Color::from_hue(f64::from(phase) + (i as f64) * 360.0 / (len as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::Rgb(255, 0, 0);
    const BLUE: Color = Color::Rgb(0, 0, 255);
    const GREEN: Color = Color::Rgb(0, 255, 0);

    #[test]
    fn empty_inputs() {
        assert!(gradient_colors(0, &[RED, BLUE]).is_empty());
        assert!(gradient_colors(5, &[]).is_empty());
    }

    #[test]
    fn single_anchor_is_solid() {
        assert_eq!(gradient_colors(3, &[RED]), vec![RED, RED, RED]);
    }

    #[test]
    fn two_anchors_split_at_rounded_half() {
        // Even length: exact halves.
        assert_eq!(gradient_colors(4, &[RED, BLUE]), vec![RED, RED, BLUE, BLUE]);
        // Odd length: first slice takes the rounded-up half.
        assert_eq!(
            gradient_colors(5, &[RED, BLUE]),
            vec![RED, RED, RED, BLUE, BLUE]
        );
        assert_eq!(gradient_colors(1, &[RED, BLUE]), vec![RED]);
    }

    #[test]
    fn last_slice_absorbs_remainder() {
        let colors = gradient_colors(7, &[RED, GREEN, BLUE]);
        assert_eq!(
            colors,
            vec![RED, RED, GREEN, GREEN, BLUE, BLUE, BLUE]
        );
    }

    #[test]
    fn more_anchors_than_codepoints() {
        let colors = gradient_colors(2, &[RED, GREEN, BLUE]);
        assert_eq!(colors, vec![RED, GREEN]);
    }

    #[test]
    fn rainbow_starts_at_phase_hue() {
        let colors = rainbow_colors(4, 0);
        assert_eq!(colors[0], Color::from_hue(0.0));
        assert_eq!(colors[1], Color::from_hue(90.0));
        assert_eq!(colors[2], Color::from_hue(180.0));
        assert_eq!(colors[3], Color::from_hue(270.0));

        let shifted = rainbow_colors(4, 90);
        assert_eq!(shifted[0], Color::from_hue(90.0));
    }

    #[test]
    fn rainbow_full_circle_visits_every_degree_once() {
        let colors = rainbow_colors(360, 0);
        let mut seen = std::collections::HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(*color, Color::from_hue(i as f64));
            seen.insert(*color);
        }
        assert_eq!(seen.len(), 360);
    }
}
