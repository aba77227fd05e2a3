//! Content stream operator generation

use crate::document::Color;
use crate::Align;

/// Context for rendering a text run
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Generate PDF operators for a text run
///
/// Emits BT/Tf/Td/Tj/ET with the fill color set, shifting the start
/// position left for center and right alignment.
///
/// # Arguments
/// * `encoded` - Encoded string operand (e.g., "(Total)" or "<0041>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    encoded: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };
    let final_x = x + x_offset;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{encoded} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Generate PDF operators for a straight line
///
/// The graphics state is saved and restored so the stroke settings do not
/// leak into later content.
///
/// # Arguments
/// * `x1`, `y1` - Start point (PDF coordinates)
/// * `x2`, `y2` - End point (PDF coordinates)
/// * `line_width` - Stroke width in points
/// * `color` - Stroke color
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    line_width: f64,
    color: Color,
) -> Vec<u8> {
    let mut ops = String::new();
    ops.push_str("q\n");
    ops.push_str(&format!("{} {} {} RG\n", color.r, color.g, color.b));
    ops.push_str(&format!("{line_width} w\n"));
    ops.push_str(&format!("{x1} {y1} m\n"));
    ops.push_str(&format!("{x2} {y2} l\n"));
    ops.push_str("S\nQ\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx(width: f64) -> TextRenderContext {
        TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: width,
            color: Color::black(),
        }
    }

    #[test]
    fn test_text_operators_left() {
        let ops = generate_text_operators("(Hello)", 100.0, 700.0, Align::Left, &ctx(100.0));
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("BT"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("(Hello) Tj"));
        assert!(ops_str.contains("ET"));
    }

    #[test]
    fn test_text_operators_center() {
        let ops = generate_text_operators("(Test)", 200.0, 600.0, Align::Center, &ctx(100.0));
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("150 600 Td"));
    }

    #[test]
    fn test_text_operators_right() {
        let ops = generate_text_operators("(Right)", 300.0, 500.0, Align::Right, &ctx(80.0));
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("220 500 Td"));
    }

    #[test]
    fn test_text_operators_color() {
        let ops = generate_text_operators(
            "(A)",
            0.0,
            0.0,
            Align::Left,
            &TextRenderContext {
                font_name: "F1".to_string(),
                font_size: 8.0,
                text_width: 0.0,
                color: Color::from_rgb(64, 64, 64),
            },
        );
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("rg"));
    }

    #[test]
    fn test_line_operators() {
        let ops = generate_line_operators(10.0, 100.0, 585.0, 100.0, 0.5, Color::black());
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.starts_with("q\n"));
        assert!(ops_str.contains("0.5 w"));
        assert!(ops_str.contains("10 100 m"));
        assert!(ops_str.contains("585 100 l"));
        assert!(ops_str.contains("S\nQ\n"));
    }
}
