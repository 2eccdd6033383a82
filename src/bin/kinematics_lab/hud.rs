use macroquad::prelude::*;
use parabolic_kinematics::{MotionState, TrajectorySolution};

use crate::constants::{CONTROLS_Y, TITLE_Y};
use crate::render::{APPLIED_COLOR, FRICTION_COLOR, NET_COLOR, WEIGHT_COLOR, draw_ui_text};
use crate::state::{LabRuntime, Scene};

const HEADER_COLOR: Color = Color::new(0.118, 0.118, 0.137, 1.0);
const LINE_HEIGHT: f32 = 24.0;

pub(crate) fn draw_header(state: &LabRuntime, left: f32, font: Option<&Font>) {
    let scene = match state.scene {
        Scene::Projectile => "Projectile",
        Scene::Incline => "Incline",
    };
    draw_ui_text(
        &format!("Kinematics Lab - {scene} ({})", state.planet().name()),
        left,
        TITLE_Y,
        30,
        HEADER_COLOR,
        font,
    );
    draw_ui_text(
        "Controls: 1/2 scene | Space launch/pause | R reset | Enter calculate",
        left + 12.0,
        CONTROLS_Y,
        20,
        DARKGRAY,
        font,
    );
}

pub(crate) fn draw_status_line(state: &LabRuntime, left: f32, screen_h: f32, font: Option<&Font>) {
    draw_ui_text(
        &format!("Status: {}", state.status_line),
        left,
        screen_h - 28.0,
        22,
        HEADER_COLOR,
        font,
    );
}

fn draw_lines(lines: &[(String, Color)], right: f32, top: f32, font: Option<&Font>) {
    let width = lines
        .iter()
        .map(|(text, _)| measure_text(text, font, 20, 1.0).width)
        .fold(0.0f32, f32::max);
    for (row, (text, color)) in lines.iter().enumerate() {
        draw_ui_text(
            text,
            right - width,
            top + row as f32 * LINE_HEIGHT,
            20,
            *color,
            font,
        );
    }
}

pub(crate) fn draw_trajectory_readout(
    state: &LabRuntime,
    solution: Option<TrajectorySolution>,
    right: f32,
    top: f32,
    font: Option<&Font>,
) {
    let mut lines = Vec::new();
    if let Some(solution) = solution {
        lines.push((format!("Time of flight: {:.2} s", solution.time_of_flight_s), DARKGRAY));
        lines.push((format!("Max height: {:.2} m", solution.max_height_m), DARKGRAY));
        lines.push((format!("Range: {:.2} m", solution.range_m), DARKGRAY));
    }
    if let Some(flight) = state.flight {
        let point = flight.current();
        lines.push((
            format!("t = {:.2} s | x = {:.2} m | y = {:.2} m", point.time_s, point.x, point.y),
            HEADER_COLOR,
        ));
    }
    if let Some(alternate) = state.last_solution.and_then(|s| s.alternate) {
        lines.push((format!("Lofted alternative: {alternate:.1} deg"), DARKGRAY));
    }
    draw_lines(&lines, right, top, font);
}

pub(crate) fn draw_force_readout(state: &LabRuntime, right: f32, top: f32, font: Option<&Font>) {
    let forces = state.block.forces();
    let body = state.block.state();
    let motion = match forces.state {
        MotionState::Stationary => "Stationary",
        MotionState::Moving => "Moving",
    };
    let lines = [
        (format!("State: {motion}"), HEADER_COLOR),
        (
            format!("Applied: {:.2} N", state.block.config().applied_force_n),
            APPLIED_COLOR,
        ),
        (
            format!("Weight down-slope: {:.2} N", forces.weight_parallel_n),
            WEIGHT_COLOR,
        ),
        (
            format!(
                "Friction: {:.2} N (static limit {:.2} N)",
                forces.friction_n, forces.max_static_friction_n
            ),
            FRICTION_COLOR,
        ),
        (format!("Net: {:.2} N", forces.net_force_n), NET_COLOR),
        (format!("Normal: {:.2} N", forces.normal_n), DARKGRAY),
        (
            format!("Acceleration: {:.2} m/s^2", forces.acceleration_mps2),
            DARKGRAY,
        ),
        (
            format!(
                "Position: {:.2} m | Velocity: {:.2} m/s | t = {:.1} s",
                body.position_m,
                body.velocity_mps,
                state.block.elapsed_s()
            ),
            DARKGRAY,
        ),
    ];
    draw_lines(&lines, right, top, font);
}
