use macroquad::prelude::*;
use parabolic_kinematics::TrajectoryPoint;
use parabolic_kinematics::core::window::AxisWindow;

use crate::constants::{
    BLOCK_COLOR, BLOCK_SIZE_PX, BOTTOM_MARGIN, LEFT_MARGIN, MAX_ARROW_PX, RAMP_COLOR,
    RIGHT_MARGIN, TOP_MARGIN, X_GRID_LINES, Y_GRID_LINES,
};
use crate::state::LabRuntime;

/// Screen rectangle the world is drawn into.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlotArea {
    pub(crate) left: f32,
    pub(crate) right: f32,
    pub(crate) top: f32,
    pub(crate) bottom: f32,
}

impl PlotArea {
    pub(crate) fn for_screen(screen_w: f32, screen_h: f32) -> Self {
        Self {
            left: LEFT_MARGIN,
            right: (screen_w - RIGHT_MARGIN).max(LEFT_MARGIN + 1.0),
            top: TOP_MARGIN,
            bottom: (screen_h - BOTTOM_MARGIN).max(TOP_MARGIN + 1.0),
        }
    }

    fn width(&self) -> f32 {
        (self.right - self.left).max(1.0)
    }

    fn height(&self) -> f32 {
        (self.bottom - self.top).max(1.0)
    }

    pub(crate) fn world_to_screen(&self, x: f64, y: f64, window: AxisWindow) -> Vec2 {
        let (world_max_x, world_max_y) = window.as_f32();
        vec2(
            self.left + (x as f32 / world_max_x.max(1.0)) * self.width(),
            self.bottom - (y as f32 / world_max_y.max(1.0)) * self.height(),
        )
    }
}

fn format_axis_value(value: f32, axis_max: f32) -> String {
    if axis_max >= 1000.0 {
        format!("{value:.0}")
    } else if axis_max >= 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn draw_ui_text(
    text: &str,
    x: f32,
    y: f32,
    font_size: u16,
    color: Color,
    font: Option<&Font>,
) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font,
            font_size,
            color,
            ..Default::default()
        },
    );
}

pub(crate) fn draw_grid(area: &PlotArea, color: Color) {
    for i in 0..=X_GRID_LINES {
        let x = area.left + (i as f32 / X_GRID_LINES as f32) * area.width();
        draw_line(x, area.top, x, area.bottom, 1.0, color);
    }
    for i in 0..=Y_GRID_LINES {
        let y = area.bottom - (i as f32 / Y_GRID_LINES as f32) * area.height();
        draw_line(area.left, y, area.right, y, 1.0, color);
    }
    draw_line(area.left, area.bottom, area.right, area.bottom, 2.0, DARKGRAY);
    draw_line(area.left, area.top, area.left, area.bottom, 2.0, DARKGRAY);
}

pub(crate) fn draw_axis_tick_labels(area: &PlotArea, window: AxisWindow, font: Option<&Font>) {
    let (world_max_x, world_max_y) = window.as_f32();
    let label_color = Color::from_rgba(105, 113, 124, 255);
    let tick_font_size: u16 = 16;

    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let label = format_axis_value(t * world_max_x, world_max_x);
        let size = measure_text(&label, font, tick_font_size, 1.0);
        draw_ui_text(
            &label,
            area.left + t * area.width() - size.width * 0.5,
            area.bottom + 22.0,
            tick_font_size,
            label_color,
            font,
        );
    }

    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let label = format_axis_value(t * world_max_y, world_max_y);
        let size = measure_text(&label, font, tick_font_size, 1.0);
        draw_ui_text(
            &label,
            area.left - 8.0 - size.width,
            area.bottom - t * area.height() + size.height * 0.35,
            tick_font_size,
            label_color,
            font,
        );
    }

    draw_ui_text(
        "Distance (m)",
        area.right - 130.0,
        area.bottom + 48.0,
        18,
        label_color,
        font,
    );
    draw_ui_text(
        "Height (m)",
        area.left + 10.0,
        area.top - 8.0,
        18,
        label_color,
        font,
    );
}

/// Window covering both the live preview and a trail from an older launch.
pub(crate) fn fit_window(preview: &[TrajectoryPoint], trail: &[TrajectoryPoint]) -> AxisWindow {
    let (max_x, max_y) = preview
        .iter()
        .chain(trail)
        .fold((0.0f64, 0.0f64), |(mx, my), p| (mx.max(p.x), my.max(p.y)));
    AxisWindow::fit(max_x, max_y)
}

pub(crate) fn draw_path(
    points: &[TrajectoryPoint],
    window: AxisWindow,
    area: &PlotArea,
    thickness: f32,
    color: Color,
) {
    let mut screen = points.iter().map(|p| area.world_to_screen(p.x, p.y, window));
    let Some(mut prev) = screen.next() else {
        return;
    };
    for cur in screen {
        draw_line(prev.x, prev.y, cur.x, cur.y, thickness, color);
        prev = cur;
    }
}

pub(crate) fn draw_projectile(point: TrajectoryPoint, window: AxisWindow, area: &PlotArea) {
    let p = area.world_to_screen(point.x, point.y, window);
    draw_circle(p.x, p.y, 7.0, RED);
    draw_circle_lines(p.x, p.y, 7.0, 2.0, MAROON);
}

pub(crate) fn draw_launch_marker(height_m: f64, window: AxisWindow, area: &PlotArea) {
    let p = area.world_to_screen(0.0, height_m, window);
    draw_circle(p.x, p.y, 8.0, Color::from_rgba(245, 89, 89, 255));
    draw_circle_lines(p.x, p.y, 8.0, 2.0, Color::from_rgba(121, 28, 28, 255));
}

fn draw_arrow(from: Vec2, vector: Vec2, thickness: f32, color: Color) {
    let length = vector.length();
    if length < 1.0 {
        return;
    }
    let tip = from + vector;
    let unit = vector / length;
    let head = (length * 0.35).min(12.0);
    let back = tip - unit * head;
    let side = vec2(-unit.y, unit.x) * head * 0.5;
    draw_line(from.x, from.y, back.x, back.y, thickness, color);
    draw_triangle(tip, back + side, back - side, color);
}

pub(crate) const APPLIED_COLOR: Color = Color::new(0.15, 0.39, 0.92, 1.0);
pub(crate) const WEIGHT_COLOR: Color = Color::new(0.45, 0.45, 0.5, 1.0);
pub(crate) const FRICTION_COLOR: Color = Color::new(0.85, 0.47, 0.02, 1.0);
pub(crate) const NET_COLOR: Color = Color::new(0.09, 0.64, 0.29, 1.0);

/// Ramp, block and the along-slope force arrows.
pub(crate) fn draw_incline_scene(state: &LabRuntime, area: &PlotArea) {
    let config = state.block.config();
    let bounds = state.block.bounds();
    let forces = state.block.forces();
    let theta = config.incline.angle_deg().to_radians() as f32;
    let (sin, cos) = theta.sin_cos();
    let length_m = bounds.length_m() as f32;

    let px_per_m = (area.width() / (length_m * cos).max(1e-3))
        .min(area.height() / (length_m * sin).max(1e-3));
    let base = vec2(area.left, area.bottom);
    let along = vec2(cos, -sin);
    let up = vec2(-sin, -cos);
    let top_end = base + along * length_m * px_per_m;

    draw_triangle(base, top_end, vec2(top_end.x, base.y), RAMP_COLOR);
    draw_line(base.x, base.y, top_end.x, top_end.y, 3.0, Color::from_rgba(242, 159, 5, 255));

    let s_px = (state.block.state().position_m - bounds.min_m) as f32 * px_per_m;
    let center = base + along * s_px + up * (BLOCK_SIZE_PX * 0.5);
    draw_rectangle_ex(
        center.x,
        center.y,
        BLOCK_SIZE_PX,
        BLOCK_SIZE_PX,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation: -theta,
            color: BLOCK_COLOR,
        },
    );

    let arrows = [
        (config.applied_force_n, APPLIED_COLOR),
        (-forces.weight_parallel_n, WEIGHT_COLOR),
        (forces.friction_n, FRICTION_COLOR),
        (forces.net_force_n, NET_COLOR),
    ];
    let largest = arrows
        .iter()
        .fold(1.0f64, |acc, (force, _)| acc.max(force.abs()));
    let px_per_n = MAX_ARROW_PX / largest as f32;
    for (row, (force, color)) in arrows.into_iter().enumerate() {
        let origin = center + up * (BLOCK_SIZE_PX * 0.75 + row as f32 * 12.0);
        draw_arrow(origin, along * (force as f32 * px_per_n), 3.0, color);
    }
}
