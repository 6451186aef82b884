//! Parametric test-pattern generation.
//!
//! Everything here is pure: a set of parameters goes in, a coordinate
//! sequence and the canvas it belongs to come out. Rasterising lives in
//! [`crate::render`].

use std::f64::consts::TAU;

/// A point in canvas units. Origin is bottom-left, y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Size of the drawing surface in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

/// Which pattern a template holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Archimedean spiral.
    Spiral,
    /// Horizontal sine wave.
    Wave,
}

impl TemplateKind {
    /// Lowercase name, used for default file names.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Wave => "wave",
        }
    }
}

/// A generated curve and the canvas it was laid out on.
#[derive(Debug, Clone)]
pub struct Template {
    /// Pattern kind.
    pub kind: TemplateKind,
    /// Ordered polyline vertices.
    pub points: Vec<Point>,
    /// Canvas the points live in.
    pub canvas: Canvas,
}

/// Spiral parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Outer radius reached at the last sample.
    pub radius: f64,
    /// Empty margin between the spiral's extent and the canvas edge.
    pub padding: f64,
    /// Number of full turns.
    pub turns: f64,
    /// Number of samples along the curve.
    pub samples: usize,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self { radius: 200.0, padding: 70.0, turns: 3.0, samples: 10_000 }
    }
}

/// Sine wave parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Canvas width.
    pub width: f64,
    /// Canvas height. The wave is centred vertically in it.
    pub height: f64,
    /// Horizontal margin on both sides.
    pub padding: f64,
    /// Peak deviation from the centre line.
    pub amplitude: f64,
    /// Full periods between the left and right margins.
    pub cycles: f64,
    /// Number of samples along the curve.
    pub samples: usize,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            width: 3140.0,
            height: 940.0,
            padding: 70.0,
            amplitude: 400.0,
            cycles: 5.0,
            samples: 1000,
        }
    }
}

/// Parameters for any supported template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateSpec {
    /// See [`generate_spiral`].
    Spiral(SpiralParams),
    /// See [`generate_wave`].
    Wave(WaveParams),
}

/// Generate the template described by `spec`.
#[must_use]
pub fn generate(spec: TemplateSpec) -> Template {
    match spec {
        TemplateSpec::Spiral(p) => generate_spiral(&p),
        TemplateSpec::Wave(p) => generate_wave(&p),
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| start + step * i as f64)
}

/// Spiral whose radius grows linearly from 0 to `radius` over `turns` turns,
/// centred in a square canvas of side `2 * radius + 2 * padding`.
///
/// Negative parameters are not rejected; they produce a degenerate curve.
#[must_use]
pub fn generate_spiral(params: &SpiralParams) -> Template {
    let side = 2.0 * params.radius + 2.0 * params.padding;
    let center = side / 2.0;
    let n = params.samples;

    let points = linspace(0.0, params.turns * TAU, n)
        .zip(linspace(0.0, params.radius, n))
        .map(|(theta, r)| Point { x: center + r * theta.cos(), y: center + r * theta.sin() })
        .collect();

    Template {
        kind: TemplateKind::Spiral,
        points,
        canvas: Canvas { width: side, height: side },
    }
}

/// Sine wave spanning `[padding, width - padding]`, centred vertically on a
/// `width` x `height` canvas.
///
/// Returns an empty sequence when the margins leave no horizontal room.
#[must_use]
pub fn generate_wave(params: &WaveParams) -> Template {
    let canvas = Canvas { width: params.width, height: params.height };
    let span = params.width - 2.0 * params.padding;
    if span <= 0.0 {
        return Template { kind: TemplateKind::Wave, points: Vec::new(), canvas };
    }

    let center_y = params.height / 2.0;
    let points = linspace(params.padding, params.width - params.padding, params.samples)
        .map(|x| {
            let phase = TAU * params.cycles * (x - params.padding) / span;
            Point { x, y: center_y + params.amplitude * phase.sin() }
        })
        .collect();

    Template { kind: TemplateKind::Wave, points, canvas }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn within(v: f64, lo: f64, hi: f64) -> bool {
        v >= lo - EPS && v <= hi + EPS
    }

    #[test]
    fn spiral_stays_inside_canvas() {
        for (radius, padding) in [(200.0, 70.0), (1.0, 0.0), (50.0, 3.5), (1000.0, 0.0)] {
            let t = generate_spiral(&SpiralParams { radius, padding, ..SpiralParams::default() });
            let side = 2.0 * radius + 2.0 * padding;
            assert_eq!(t.canvas, Canvas { width: side, height: side });
            assert!(t.points.iter().all(|p| within(p.x, 0.0, side) && within(p.y, 0.0, side)));
        }
    }

    #[test]
    fn spiral_starts_at_center_and_ends_at_radius() {
        let params = SpiralParams::default();
        let t = generate_spiral(&params);
        assert_eq!(t.points.len(), params.samples);

        let center = params.radius + params.padding;
        let first = t.points[0];
        assert!((first.x - center).abs() < EPS && (first.y - center).abs() < EPS);

        // Three whole turns end back on the positive x axis.
        let last = t.points[t.points.len() - 1];
        assert!((last.x - (center + params.radius)).abs() < 1e-6);
        assert!((last.y - center).abs() < 1e-6);
    }

    #[test]
    fn spiral_with_no_samples_is_empty() {
        let t = generate_spiral(&SpiralParams { samples: 0, ..SpiralParams::default() });
        assert!(t.points.is_empty());
    }

    #[test]
    fn wave_x_within_margins() {
        for (width, padding) in [(3140.0, 70.0), (100.0, 0.0), (100.0, 49.0), (10.0, 2.5)] {
            let t = generate_wave(&WaveParams { width, padding, ..WaveParams::default() });
            assert!(!t.points.is_empty());
            assert!(t.points.iter().all(|p| within(p.x, padding, width - padding)));
            assert!((t.points[0].x - padding).abs() < EPS);
            assert!((t.points[t.points.len() - 1].x - (width - padding)).abs() < 1e-6);
        }
    }

    #[test]
    fn wave_canvas_uses_both_dimensions() {
        let t = generate_wave(&WaveParams { width: 800.0, height: 300.0, ..WaveParams::default() });
        assert_eq!(t.canvas, Canvas { width: 800.0, height: 300.0 });
    }

    #[test]
    fn wave_default_fits_vertically() {
        let params = WaveParams::default();
        let t = generate_wave(&params);
        assert!(t.points.iter().all(|p| within(p.y, 0.0, params.height)));
    }

    #[test]
    fn wave_without_room_is_empty() {
        let t = generate_wave(&WaveParams { width: 100.0, padding: 50.0, ..WaveParams::default() });
        assert!(t.points.is_empty());
    }

    #[test]
    fn generate_dispatches_on_kind() {
        let spiral = generate(TemplateSpec::Spiral(SpiralParams::default()));
        let wave = generate(TemplateSpec::Wave(WaveParams::default()));
        assert_eq!(spiral.kind, TemplateKind::Spiral);
        assert_eq!(wave.kind, TemplateKind::Wave);
    }
}
