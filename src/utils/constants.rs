/// Temperature constraints (°C)
pub const MIN_VALID_TEMP: f64 = -100.0;
pub const MAX_VALID_TEMP: f64 = 60.0;

/// Pressure constraints
pub const MIN_PRESSURE_INHG: f64 = 25.0;
pub const MAX_PRESSURE_INHG: f64 = 35.0;
pub const MIN_PRESSURE_HPA: f64 = 850.0;
pub const MAX_PRESSURE_HPA: f64 = 1085.0;

/// Standard atmosphere
pub const STANDARD_PRESSURE_HPA: f64 = 1013.25;
pub const STANDARD_PRESSURE_INHG: f64 = 29.92;
pub const STANDARD_TEMP_C: f64 = 15.0;

/// Unit conversion factors
pub const HPA_PER_INHG: f64 = 33.8639;
pub const METERS_PER_STATUTE_MILE: f64 = 1609.34;
pub const STATUTE_MILES_PER_KM: f64 = 0.621371;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const MPS_PER_KNOT: f64 = 0.514444;
pub const KMH_PER_KNOT: f64 = 1.852;
pub const MPH_PER_KNOT: f64 = 1.15078;

/// Magnus formula coefficients
pub const MAGNUS_A: f64 = 6.112;
pub const MAGNUS_B: f64 = 17.67;
pub const MAGNUS_C: f64 = 243.5;

/// Pressure thresholds (hPa)
pub const LOW_PRESSURE_HPA: f64 = 1000.0;
pub const HIGH_PRESSURE_HPA: f64 = 1020.0;
pub const EXTREMELY_LOW_PRESSURE_HPA: f64 = 950.0;
pub const EXTREMELY_HIGH_PRESSURE_HPA: f64 = 1040.0;
pub const RAPID_PRESSURE_CHANGE_HPA: f64 = 6.0;
pub const SIGNIFICANT_PRESSURE_CHANGE_HPA: f64 = 3.0;

/// Beaufort scale lower bounds in knots for forces 1 through 12
pub const BEAUFORT_KNOTS: [f64; 12] = [
    1.0, 4.0, 7.0, 11.0, 17.0, 22.0, 28.0, 34.0, 41.0, 48.0, 56.0, 64.0,
];

/// 16-point compass rose starting at north
pub const CARDINAL_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 8-point directions used in remark groups
pub const OCTANT_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Flight category limits
pub const VFR_MIN_VISIBILITY_SM: f64 = 3.0;
pub const LIFR_MAX_VISIBILITY_SM: f64 = 1.0;
pub const IMC_MAX_VISIBILITY_KM: f64 = 5.0;
pub const IMC_CEILING_FT: u32 = 1000;

/// Cloud heights (ft)
pub const MAX_CLOUD_HEIGHT_FT: u32 = 100_000;

/// TAF limits (hours)
pub const MAX_TEMPO_HOURS: i64 = 12;
pub const MIN_VALIDITY_HOURS: i64 = 1;
pub const MAX_VALIDITY_HOURS: i64 = 48;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CONFIG_FILE: &str = "avwx.toml";
pub const CONFIG_PATH_ENV: &str = "AVWX_CONFIG";
pub const CONFIG_ENV_PREFIX: &str = "AVWX";

/// Report keywords
pub const REMARKS_MARKER: &str = "RMK";
pub const MISSING_VALUE: &str = "N/A";
