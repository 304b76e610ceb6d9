//! Ring geometry and SVG rendering
//!
//! The ring is drawn with `stroke-dashoffset` semantics: an arc of length
//! `circumference - offset` is visible, starting at 12 o'clock.

use std::{f64::consts::PI, fmt::Write};

use serde::{Deserialize, Serialize};

use super::format::readout;
use crate::{
    error::{Error, Result},
    state::TimerState,
};

/// Fixed geometry of a ring of a given size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub size: f64,
    pub stroke_width: f64,
    pub center: f64,
    pub radius: f64,
    pub circumference: f64,
}

impl RingGeometry {
    /// Inscribe a ring of `stroke_width` inside a `size` x `size` box
    pub fn new(size: f64, stroke_width: f64) -> Result<Self> {
        let valid = size.is_finite()
            && stroke_width.is_finite()
            && size > 0.0
            && stroke_width > 0.0
            && stroke_width < size;
        if !valid {
            return Err(Error::InvalidGeometry { size, stroke_width });
        }

        let radius = (size - stroke_width) / 2.0;
        Ok(Self {
            size,
            stroke_width,
            center: size / 2.0,
            radius,
            circumference: 2.0 * PI * radius,
        })
    }

    /// Unfilled arc length for a fill fraction, clamped to the circumference
    pub fn offset_for(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.circumference * (1.0 - fraction)
    }
}

/// Colors and readout options of a ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingStyle {
    pub stroke_color: String,
    pub overtime_stroke_color: String,
    pub track_color: String,
    pub show_remaining_time: bool,
    /// Readout font size; a fifth of the ring size when unset
    pub font_size: Option<f64>,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#4caf50".to_string(),
            overtime_stroke_color: "#f44336".to_string(),
            track_color: "#e6e6e6".to_string(),
            show_remaining_time: true,
            font_size: None,
        }
    }
}

/// Stroke offsets of the arcs for one timer state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingFrame {
    pub progress_offset: f64,
    /// Present only in overtime
    pub overtime_offset: Option<f64>,
}

impl RingFrame {
    pub fn from_state(geometry: &RingGeometry, state: &TimerState) -> Self {
        match state.overtime_fraction() {
            Some(fraction) => Self {
                // The progress arc stays fully drawn once overtime begins
                progress_offset: 0.0,
                overtime_offset: Some(geometry.offset_for(fraction)),
            },
            None => Self {
                progress_offset: geometry.offset_for(state.progress_fraction()),
                overtime_offset: None,
            },
        }
    }
}

/// Render a standalone SVG document for the ring in its current state
pub fn render_svg(geometry: &RingGeometry, style: &RingStyle, state: &TimerState) -> String {
    let frame = RingFrame::from_state(geometry, state);
    let RingGeometry {
        size,
        stroke_width,
        center,
        radius,
        ..
    } = *geometry;

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <circle cx="{center}" cy="{center}" r="{radius}" fill="none" stroke="{}" stroke-width="{stroke_width}"/>"#,
        escape(&style.track_color)
    );
    write_arc(&mut svg, geometry, &style.stroke_color, frame.progress_offset);
    if let Some(offset) = frame.overtime_offset {
        write_arc(&mut svg, geometry, &style.overtime_stroke_color, offset);
    }

    if style.show_remaining_time {
        let font_size = style.font_size.unwrap_or(size / 5.0);
        let color = if state.is_overtime() {
            &style.overtime_stroke_color
        } else {
            &style.stroke_color
        };
        let _ = writeln!(
            svg,
            r#"  <text x="{center}" y="{center}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="{font_size}" fill="{}">{}</text>"#,
            escape(color),
            escape(&readout(state))
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_arc(svg: &mut String, geometry: &RingGeometry, color: &str, offset: f64) {
    let RingGeometry {
        center,
        radius,
        stroke_width,
        circumference,
        ..
    } = *geometry;
    let _ = writeln!(
        svg,
        r#"  <circle cx="{center}" cy="{center}" r="{radius}" fill="none" stroke="{}" stroke-width="{stroke_width}" stroke-linecap="round" stroke-dasharray="{circumference:.3}" stroke-dashoffset="{offset:.3}" transform="rotate(-90 {center} {center})"/>"#,
        escape(color)
    );
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerOptions;
    use test_case::test_case;

    #[test]
    fn geometry_inscribes_stroke() {
        let geometry = RingGeometry::new(300.0, 20.0).unwrap();
        assert_eq!(geometry.radius, 140.0);
        assert_eq!(geometry.center, 150.0);
        assert!((geometry.circumference - 879.645).abs() < 1e-3);
    }

    #[test_case(300.0, 300.0)]
    #[test_case(300.0, 400.0)]
    #[test_case(0.0, 10.0)]
    #[test_case(300.0, 0.0)]
    #[test_case(f64::NAN, 10.0)]
    fn rejects_non_positive_radius(size: f64, stroke_width: f64) {
        assert!(matches!(
            RingGeometry::new(size, stroke_width),
            Err(Error::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn offsets_grow_as_countdown_runs() {
        let geometry = RingGeometry::new(300.0, 20.0).unwrap();
        let mut state = TimerState::new(10, TimerOptions::default());
        assert_eq!(RingFrame::from_state(&geometry, &state).progress_offset, 0.0);

        state.start();
        let mut offsets = Vec::new();
        for _ in 0..10 {
            state.tick();
            offsets.push(RingFrame::from_state(&geometry, &state).progress_offset);
        }

        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((offsets[0] - geometry.circumference * 0.1).abs() < 1e-9);
        assert!((offsets[9] - geometry.circumference).abs() < 1e-9);
    }

    #[test]
    fn overtime_layers_second_arc() {
        let geometry = RingGeometry::new(100.0, 10.0).unwrap();
        let options = TimerOptions {
            supports_overtime: true,
            ..TimerOptions::default()
        };
        let mut state = TimerState::new(4, options);
        state.start();
        for _ in 0..6 {
            state.tick();
        }

        let frame = RingFrame::from_state(&geometry, &state);
        assert_eq!(frame.progress_offset, 0.0);
        let overtime_offset = frame.overtime_offset.unwrap();
        assert!((overtime_offset - geometry.circumference * 0.5).abs() < 1e-9);

        let svg = render_svg(&geometry, &RingStyle::default(), &state);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("+00:02"));
        assert!(svg.contains("#f44336"));
    }

    #[test]
    fn svg_hides_readout_and_escapes_colors() {
        let geometry = RingGeometry::new(300.0, 20.0).unwrap();
        let style = RingStyle {
            stroke_color: "url(#a)\"><script>".to_string(),
            show_remaining_time: false,
            ..RingStyle::default()
        };
        let state = TimerState::new(10, TimerOptions::default());

        let svg = render_svg(&geometry, &style, &state);
        assert!(!svg.contains("<text"));
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("rotate(-90 150 150)"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }
}
