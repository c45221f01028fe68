//! Constants used throughout the application

/// Number of points in a refined face mesh
pub const NUM_FACE_MESH_LANDMARKS: usize = 478;

/// Right eye contour (p1..p6) used for the eye aspect ratio
pub const RIGHT_EYE_CONTOUR: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Left eye contour (p1..p6) used for the eye aspect ratio
pub const LEFT_EYE_CONTOUR: [usize; 6] = [362, 385, 387, 263, 373, 380];

/// Nose tip
pub const NOSE_TIP: usize = 1;
/// Chin
pub const CHIN: usize = 152;
/// Inner corner of the left eye (image left)
pub const LEFT_EYE_INNER: usize = 133;
/// Inner corner of the right eye
pub const RIGHT_EYE_INNER: usize = 362;
/// Outer corner of the left eye
pub const LEFT_EYE_OUTER: usize = 33;
/// Outer corner of the right eye
pub const RIGHT_EYE_OUTER: usize = 263;

/// Mouth landmarks used for the display overlay
pub const MOUTH_LEFT: usize = 61;
pub const MOUTH_RIGHT: usize = 291;
pub const MOUTH_TOP: usize = 13;
pub const MOUTH_BOTTOM: usize = 14;

/// Yaw reached when the nose sits one inter-eye distance off center
pub const YAW_SCALE_DEGREES: f64 = 60.0;

/// Pitch scale applied to the normalized nose offset
pub const PITCH_SCALE_DEGREES: f64 = 90.0;

/// Nose position on the eye-to-chin span when looking straight ahead
pub const PITCH_NEUTRAL_RATIO: f64 = 0.4;

/// Head pose angles are clamped to this magnitude
pub const MAX_POSE_ANGLE: f64 = 90.0;

/// Face-centering band (exclusive) on both normalized axes
pub const CENTER_BAND_MIN: f64 = 0.3;
pub const CENTER_BAND_MAX: f64 = 0.7;

/// Blink rate band (exclusive) considered physiologically normal
pub const NORMAL_BLINK_RATE_MIN: u32 = 10;
pub const NORMAL_BLINK_RATE_MAX: u32 = 30;

/// Engagement points
pub const ENGAGEMENT_CENTERED_POINTS: u8 = 40;
pub const ENGAGEMENT_LOOKING_POINTS: u8 = 40;
pub const ENGAGEMENT_BLINK_POINTS: u8 = 20;

/// Blink rate window
pub const BLINK_WINDOW_MS: i64 = 60_000;

/// EAR assumed before the first frame of a session
pub const INITIAL_PREVIOUS_EAR: f64 = 0.3;

/// Default bounded history capacity
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Upper bound on a single sample's weight in time-weighted metrics (seconds)
pub const MAX_FRAME_DURATION_SECS: f64 = 5.0;

/// Weight of the last sample, which has no successor (seconds)
pub const LAST_FRAME_DURATION_SECS: f64 = 1.0;

/// Engagement bucket boundaries
pub const PARTIAL_ENGAGEMENT_MIN: u8 = 40;
pub const FULL_ENGAGEMENT_ABOVE: u8 = 80;

/// Watchdog defaults
pub const DEFAULT_WATCHDOG_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_NO_DATA_TIMEOUT_MS: u64 = 2000;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
