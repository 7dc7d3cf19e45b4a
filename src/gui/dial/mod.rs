pub mod animation;
pub mod geometry;
pub mod model;
pub mod view;
pub mod widget;

pub use animation::{AnimationHandle, AnimationStep, ReturnAnimation, ease};
pub use geometry::{Layout, Point, Size};
pub use model::{DialState, DisplayText, HandleIcon, HostRequests, InteractionMode, Tilt};
pub use view::{DialStyle, draw, lit_tick_count};
pub use widget::TimerDial;

pub const TICK_COUNT: usize = 200;
pub const TICK_STEP_DEGREES: f64 = 360.0 / TICK_COUNT as f64; // 1.8
pub const PADDING_RATIO: f64 = 0.12;
pub const TICK_LENGTH_RATIO: f64 = 0.12;
pub const SEEK_RADIUS_RATIO: f64 = 0.85;
pub const MAX_PARALLAX_RATIO: f64 = 0.02;
pub const STROKE_RATIO: f64 = 0.012;
pub const MAX_TILT_DEGREES: f64 = 10.0;
pub const RETURN_DURATION_MS: f64 = 1000.0;
pub const DEFAULT_TIME_TEXT: &str = "00:00:00";
pub const DEFAULT_TEXT_SIZE: f64 = 50.0;
pub const DEFAULT_HANDLE_SIZE: f64 = 48.0;
