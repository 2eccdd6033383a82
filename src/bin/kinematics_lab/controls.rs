use macroquad::prelude::*;
use macroquad::ui::{Ui, hash, root_ui, widgets};
use parabolic_kinematics::{GravityPreset, SurfacePreset, critical_incline_deg};

use crate::constants::{PANEL_HEIGHT, PANEL_WIDTH, PANEL_X, PANEL_Y};
use crate::state::{GIVEN_LABELS, LabRuntime, SOLVE_FOR_LABELS, Scene};

#[derive(Default, Clone, Copy, Debug)]
pub(crate) struct FrameActions {
    pub(crate) launch_pause: bool,
    pub(crate) reset: bool,
    pub(crate) calculate: bool,
    pub(crate) switch_scene: Option<Scene>,
}

impl FrameActions {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            launch_pause: self.launch_pause || other.launch_pause,
            reset: self.reset || other.reset,
            calculate: self.calculate || other.calculate,
            switch_scene: other.switch_scene.or(self.switch_scene),
        }
    }
}

pub(crate) fn hotkey_actions() -> FrameActions {
    let switch_scene = if is_key_pressed(KeyCode::Key1) {
        Some(Scene::Projectile)
    } else if is_key_pressed(KeyCode::Key2) {
        Some(Scene::Incline)
    } else {
        None
    };
    FrameActions {
        launch_pause: is_key_pressed(KeyCode::Space),
        reset: is_key_pressed(KeyCode::R),
        calculate: is_key_pressed(KeyCode::Enter),
        switch_scene,
    }
}

pub(crate) fn draw_control_panel(state: &mut LabRuntime) -> FrameActions {
    let mut actions = FrameActions::default();
    let title = match state.scene {
        Scene::Projectile => "Projectile",
        Scene::Incline => "Incline",
    };

    widgets::Window::new(
        hash!(),
        vec2(PANEL_X, PANEL_Y),
        vec2(PANEL_WIDTH, PANEL_HEIGHT),
    )
    .label(title)
    .ui(&mut *root_ui(), |ui| {
        if ui.button(None, "Projectile (1)") {
            actions.switch_scene = Some(Scene::Projectile);
        }
        ui.same_line(0.0);
        if ui.button(None, "Incline (2)") {
            actions.switch_scene = Some(Scene::Incline);
        }
        ui.separator();

        let planets = GravityPreset::ALL.map(GravityPreset::name);
        ui.combo_box(hash!(), "Gravity", &planets, &mut state.planet_idx);
        ui.label(
            None,
            &format!("g = {:.2} m/s^2", state.planet().gravity_mps2()),
        );
        ui.slider(hash!(), "Simulation Speed", 0.25..4.0, &mut state.sim_speed);
        ui.separator();

        match state.scene {
            Scene::Projectile => draw_launch_controls(ui, state, &mut actions),
            Scene::Incline => draw_surface_controls(ui, state, &mut actions),
        }
    });

    actions
}

fn draw_launch_controls(ui: &mut Ui, state: &mut LabRuntime, actions: &mut FrameActions) {
    ui.checkbox(hash!(), "Horizontal launch", &mut state.launch.horizontal);
    if !state.launch.horizontal {
        ui.slider(
            hash!(),
            "Angle (deg)",
            -90.0..90.0,
            &mut state.launch.angle_deg,
        );
    }
    ui.slider(
        hash!(),
        "Velocity (m/s)",
        0.0..150.0,
        &mut state.launch.speed_mps,
    );
    ui.slider(
        hash!(),
        "Height (m)",
        0.0..200.0,
        &mut state.launch.height_m,
    );
    ui.separator();
    if ui.button(None, "Launch / Pause (Space)") {
        actions.launch_pause = true;
    }
    ui.same_line(0.0);
    if ui.button(None, "Reset (R)") {
        actions.reset = true;
    }

    ui.separator();
    ui.label(None, "Solve for a launch parameter");
    ui.combo_box(hash!(), "Given", &GIVEN_LABELS, &mut state.solver.given_idx);
    ui.combo_box(
        hash!(),
        "Solve for",
        &SOLVE_FOR_LABELS,
        &mut state.solver.solve_for_idx,
    );
    ui.input_text(hash!(), "Target", &mut state.solver.target_text);
    ui.input_text(
        hash!(),
        "Range to hit",
        &mut state.solver.constraint_range_text,
    );
    if ui.button(None, "Calculate (Enter)") {
        actions.calculate = true;
    }
}

fn draw_surface_controls(ui: &mut Ui, state: &mut LabRuntime, actions: &mut FrameActions) {
    let surfaces = SurfacePreset::ALL.map(SurfacePreset::name);
    ui.combo_box(
        hash!(),
        "Surface",
        &surfaces,
        &mut state.surface.surface_idx,
    );
    let (mu_static, mu_kinetic) = state.surface.preset().coefficients();
    ui.label(
        None,
        &format!(
            "mu_s = {mu_static:.2} | mu_k = {mu_kinetic:.2} | holds below {:.1} deg",
            critical_incline_deg(mu_static)
        ),
    );
    ui.checkbox(hash!(), "Friction", &mut state.surface.friction_enabled);
    ui.slider(hash!(), "Mass (kg)", 0.5..50.0, &mut state.surface.mass_kg);
    ui.slider(
        hash!(),
        "Applied force (N)",
        -200.0..200.0,
        &mut state.surface.applied_force_n,
    );
    ui.slider(
        hash!(),
        "Incline (deg)",
        0.0..80.0,
        &mut state.surface.incline_deg,
    );
    ui.separator();
    if ui.button(None, "Run / Pause (Space)") {
        actions.launch_pause = true;
    }
    ui.same_line(0.0);
    if ui.button(None, "Reset (R)") {
        actions.reset = true;
    }
}
