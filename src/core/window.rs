use crate::core::trajectory::TrajectoryPoint;

/// x:y aspect of the plotted data window.
pub const DISTANCE_TO_HEIGHT_RATIO: f64 = 2.0;

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// Visible world extent, padded and widened to a fixed aspect ratio so the
/// parabola is never distorted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWindow {
    pub x_span: f64,
    pub y_span: f64,
}

impl AxisWindow {
    pub fn fit(raw_max_x: f64, raw_max_y: f64) -> Self {
        let x_pad = raw_max_x.max(1.0) * X_PADDING_RATIO;
        let y_pad = raw_max_y.max(1.0) * Y_PADDING_RATIO;

        let mut x_span = (raw_max_x + x_pad).max(1.0);
        let mut y_span = (raw_max_y + y_pad).max(1.0);

        if x_span / y_span < DISTANCE_TO_HEIGHT_RATIO {
            x_span = y_span * DISTANCE_TO_HEIGHT_RATIO;
        } else {
            y_span = x_span / DISTANCE_TO_HEIGHT_RATIO;
        }

        Self { x_span, y_span }
    }

    pub fn fit_trajectory(points: &[TrajectoryPoint]) -> Self {
        let (max_x, max_y) = points
            .iter()
            .fold((0.0f64, 0.0f64), |(mx, my), p| (mx.max(p.x), my.max(p.y)));
        Self::fit(max_x, max_y)
    }

    /// Spans for the `f32` world of the interactive renderer.
    pub fn as_f32(&self) -> (f32, f32) {
        (self.x_span as f32, self.y_span as f32)
    }
}
