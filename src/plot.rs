use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use plotters::prelude::*;
use thiserror::Error;

use crate::core::error::KinematicsError;
use crate::core::trajectory::{
    LaunchConfig, LaunchMode, TrajectorySolution, compute_trajectory, sample_trajectory,
};
use crate::core::window::AxisWindow;

pub const PLOT_WIDTH_PX: u32 = 1200;
pub const PLOT_HEIGHT_PX: u32 = 600;
const PLOT_SAMPLES: usize = 320;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
    #[error("Could not render plot: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

/// `trajectory_YYYYmmdd_HHMMSS.png` in the working directory.
pub fn default_plot_path() -> PathBuf {
    PathBuf::from(format!(
        "trajectory_{}.png",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

pub fn plot_caption(config: LaunchConfig) -> String {
    let launch = match config.mode {
        LaunchMode::Angled => format!("{:.1} deg", config.angle_deg),
        LaunchMode::Horizontal => "horizontal".to_string(),
    };
    format!(
        "v = {:.1} m/s, {launch}, h = {:.1} m, g = {:.2} m/s^2",
        config.speed_mps, config.height_m, config.gravity_mps2
    )
}

/// Draws the trajectory with its peak and landing point to a PNG file.
pub fn render_trajectory_png(
    config: LaunchConfig,
    path: &Path,
) -> Result<TrajectorySolution, PlotError> {
    let solution = compute_trajectory(config)?;
    let points = sample_trajectory(config, PLOT_SAMPLES)?;
    let window = AxisWindow::fit_trajectory(&points);

    let root = BitMapBackend::new(path, (PLOT_WIDTH_PX, PLOT_HEIGHT_PX)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(plot_caption(config), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..window.x_span, 0.0..window.y_span)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Height (m)")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.x, p.y)),
            BLUE.stroke_width(2),
        ))
        .map_err(render_err)?;

    let peak_x = if solution.vy > 0.0 {
        solution.vx * solution.vy / config.gravity_mps2
    } else {
        0.0
    };
    chart
        .draw_series([
            Circle::new((peak_x, solution.max_height_m), 5, GREEN.filled()),
            Circle::new((solution.range_m, 0.0), 5, RED.filled()),
        ])
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    info!("wrote trajectory plot to {}", path.display());
    Ok(solution)
}
