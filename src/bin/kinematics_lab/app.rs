use log::{error, warn};
use macroquad::prelude::*;
use parabolic_kinematics::{compute_trajectory, logging, sample_trajectory};

use crate::constants::{
    BACKGROUND, GRID_COLOR, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, MAX_FRAME_DT_S,
    MSAA_SAMPLES, PREVIEW_COLOR, TRAIL_COLOR, TRAJECTORY_SAMPLES, UI_FONT_PATH,
};
use crate::controls::{draw_control_panel, hotkey_actions};
use crate::hud::{draw_force_readout, draw_header, draw_status_line, draw_trajectory_readout};
use crate::render::{
    PlotArea, draw_axis_tick_labels, draw_grid, draw_incline_scene, draw_launch_marker,
    draw_path, draw_projectile, fit_window,
};
use crate::state::{LabRuntime, Scene};

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "Kinematics Lab".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

pub(crate) async fn run() {
    logging::init(false);

    let ui_font = match load_ttf_font(UI_FONT_PATH).await {
        Ok(font) => Some(font),
        Err(err) => {
            warn!("could not load '{UI_FONT_PATH}': {err}; falling back to default font");
            None
        }
    };

    let mut state = match LabRuntime::new() {
        Ok(state) => state,
        Err(err) => {
            error!("could not start the lab: {err}");
            return;
        }
    };

    loop {
        let frame_dt = get_frame_time();
        let dt = (frame_dt.min(MAX_FRAME_DT_S) * state.sim_speed) as f64;
        let screen_w = screen_width();
        let screen_h = screen_height();
        let area = PlotArea::for_screen(screen_w, screen_h);

        let actions = hotkey_actions().merge(draw_control_panel(&mut state));
        state.apply(actions);
        state.sync_surface();
        state.advance(dt);

        clear_background(BACKGROUND);
        draw_header(&state, area.left, ui_font.as_ref());

        match state.scene {
            Scene::Projectile => {
                let config = state.launch_config();
                let (preview, solution) =
                    match (sample_trajectory(config, TRAJECTORY_SAMPLES), compute_trajectory(config)) {
                        (Ok(points), Ok(solution)) => (points, Some(solution)),
                        _ => (Vec::new(), None),
                    };
                let window = fit_window(&preview, &state.trail);

                draw_grid(&area, GRID_COLOR);
                draw_axis_tick_labels(&area, window, ui_font.as_ref());
                draw_launch_marker(config.height_m.max(0.0), window, &area);
                if !state.flying() {
                    draw_path(&preview, window, &area, 2.0, PREVIEW_COLOR);
                }
                draw_path(&state.trail, window, &area, 3.0, TRAIL_COLOR);
                if let Some(flight) = state.flight {
                    draw_projectile(flight.current(), window, &area);
                }
                draw_trajectory_readout(&state, solution, area.right, area.top, ui_font.as_ref());
            }
            Scene::Incline => {
                draw_incline_scene(&state, &area);
                draw_force_readout(&state, area.right, area.top, ui_font.as_ref());
            }
        }

        draw_status_line(&state, area.left, screen_h, ui_font.as_ref());
        next_frame().await;
    }
}
