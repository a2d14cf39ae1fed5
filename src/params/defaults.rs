//! Named constants a run is built from.
//!
//! Lengths are millimetres at scale 1.0; [`SCALE`] is applied once when the
//! geometry is resolved. Edit these and rebuild to change a run.

use super::ProcessModeKind;

pub const SCALE: f64 = 3.0;
pub const PROCESS_MODE: ProcessModeKind = ProcessModeKind::CastingVertical;

// Horizontal induction line.
pub const BILLET_SECTION: f64 = 130.0;
pub const BILLET_LENGTH: f64 = 12_000.0;
pub const COIL_INNER_DIAMETER: f64 = 300.0;
pub const COIL_OUTER_DIAMETER: f64 = 420.0;
pub const COIL_HEIGHT: f64 = 280.0;
pub const COIL_COUNT: u32 = 8;
pub const COIL_SPACING: f64 = 1_500.0;
pub const COIL_START_OFFSET: f64 = 500.0;
pub const ROLLER_DIAMETER: f64 = 240.0;
pub const ROLLER_WIDTH: f64 = 520.0;
pub const ROLLER_COUNT: u32 = 18;
pub const ROLLER_SPACING: f64 = 800.0;
pub const ROLLER_CLEARANCE: f64 = 50.0;
pub const FRAME_HEIGHT: f64 = 2_000.0;
pub const COLUMN_DIAMETER: f64 = 160.0;
pub const COLUMN_OFFSET_X: f64 = 400.0;
pub const COLUMN_OFFSET_Y: f64 = 300.0;
pub const CREATE_SENSORS: bool = false;
pub const CREATE_PIPES: bool = false;
pub const COIL_INFLUENCE_RADIUS: f64 = 800.0;
pub const COIL_BOOST_PEAK: f64 = 220.0;
pub const FLASH_WIDTH: f64 = 120.0;
pub const FLASH_PEAK: f64 = 200.0;
pub const HEATING_MARGIN: f64 = 2_000.0;

// Vertical continuous casting.
pub const STRAND_SECTION: f64 = 150.0;
pub const STRAND_LENGTH: f64 = 12_000.0;
pub const MOLD_CLEARANCE: f64 = 60.0;
pub const MOLD_HEIGHT: f64 = 800.0;
pub const TUNDISH_WIDTH: f64 = 1_000.0;
pub const TUNDISH_DEPTH: f64 = 600.0;
pub const TUNDISH_HEIGHT: f64 = 400.0;
pub const TUNDISH_GAP: f64 = 600.0;
pub const SPRAY_ZONE_COUNT: u32 = 6;
pub const SPRAY_SPACING: f64 = 1_000.0;
pub const SPRAY_NOZZLE_RADIUS: f64 = 40.0;
pub const SPRAY_NOZZLE_LENGTH: f64 = 200.0;
pub const SPRAY_RING_GAP: f64 = 120.0;
pub const ROLLER_PAIR_COUNT: u32 = 16;
pub const ROLLER_PITCH_RATIO: f64 = 0.6;
pub const GUIDE_ROLLER_RADIUS: f64 = 120.0;
pub const GUIDE_ROLLER_LENGTH: f64 = 400.0;
pub const GUIDE_ROLLER_OFFSET: f64 = 200.0;
pub const GUIDE_ROLLER_CLEARANCE: f64 = 40.0;
pub const CREATE_PERIPHERALS: bool = true;
pub const SPRAY_WIDTH: f64 = 180.0;
pub const SPRAY_COOLING_PEAK: f64 = 250.0;
pub const COOLING_MARGIN: f64 = 1_200.0;

// Temperatures in °C.
pub const TEMP_MIN: f64 = 20.0;
pub const TEMP_MAX: f64 = 1_200.0;
pub const COOLING_TARGET: f64 = 300.0;
pub const COOLING_FLOOR: f64 = 80.0;

// Animation.
pub const FRAMES: u64 = 240;
pub const FPS: u32 = 24;
pub const IMG_W: u32 = 1920;
pub const IMG_H: u32 = 1080;
pub const REFIT_FRAMES: u64 = 3;

// Outputs.
pub const OUTPUT_DIR: &str = "render_output";
pub const DOCUMENT_NAME: &str = "billet_line";
pub const FRAME_PREFIX: &str = "frame_";
pub const ENCODER_ENV_VAR: &str = "FFMPEG_EXE";
pub const ENCODER_DEFAULT_PATH: &str = "ffmpeg/bin/ffmpeg";
pub const ENCODER_TIMEOUT_SECS: u64 = 300;
pub const FONT_ENV_VAR: &str = "BILLETLINE_FONT";
