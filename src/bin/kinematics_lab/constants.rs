use macroquad::prelude::Color;

pub const INITIAL_WINDOW_WIDTH: i32 = 1600;
pub const INITIAL_WINDOW_HEIGHT: i32 = 900;
pub const MSAA_SAMPLES: i32 = 4;
pub const UI_FONT_PATH: &str = "assets/fonts/Lato-Regular.ttf";

pub const PANEL_X: f32 = 18.0;
pub const PANEL_Y: f32 = 110.0;
pub const PANEL_WIDTH: f32 = 380.0;
pub const PANEL_HEIGHT: f32 = 560.0;

pub const LEFT_MARGIN: f32 = PANEL_X + PANEL_WIDTH + 90.0;
pub const RIGHT_MARGIN: f32 = 30.0;
pub const TOP_MARGIN: f32 = 140.0;
pub const BOTTOM_MARGIN: f32 = 130.0;

pub const TITLE_Y: f32 = 46.0;
pub const CONTROLS_Y: f32 = 80.0;
pub const TRAJECTORY_SAMPLES: usize = 240;
/// Longest frame the simulations will integrate in one go.
pub const MAX_FRAME_DT_S: f32 = 0.05;
pub const X_GRID_LINES: usize = 10;
pub const Y_GRID_LINES: usize = 8;

pub const BACKGROUND: Color = Color::new(0.98, 0.984, 0.992, 1.0);
pub const GRID_COLOR: Color = Color::new(0.89, 0.906, 0.925, 1.0);
pub const PREVIEW_COLOR: Color = Color::new(0.298, 0.553, 0.961, 0.55);
pub const TRAIL_COLOR: Color = Color::new(0.212, 0.482, 0.961, 1.0);
pub const RAMP_COLOR: Color = Color::new(0.949, 0.624, 0.02, 0.45);
pub const BLOCK_COLOR: Color = Color::new(0.86, 0.33, 0.33, 1.0);

pub const BLOCK_SIZE_PX: f32 = 44.0;
pub const MAX_ARROW_PX: f32 = 150.0;
