// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "trackball-controls")]
#[command(about = "Trackball camera demo with provenance history", long_about = None)]
pub struct Cli {
    /// Rotation speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub rotate_speed: f32,

    /// Zoom speed multiplier
    #[arg(long, default_value_t = 1.2)]
    pub zoom_speed: f32,

    /// Pan speed multiplier
    #[arg(long, default_value_t = 0.3)]
    pub pan_speed: f32,

    /// Damping factor for inertial movement
    #[arg(long, default_value_t = 0.2)]
    pub damping: f32,

    /// Disable inertial damping (gestures stop instantly)
    #[arg(long, default_value_t = false)]
    pub static_moving: bool,

    /// Minimum camera distance from the target
    #[arg(long, default_value_t = 0.0)]
    pub min_distance: f32,

    /// Maximum camera distance from the target
    #[arg(long, default_value_t = f32::INFINITY)]
    pub max_distance: f32,

    /// Initial window width
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}
