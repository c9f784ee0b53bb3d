// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "telefilter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".telefilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "telefilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TELEFILTER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TELEFILTER_LOG";

// =============================================================================
// Environment Variables - Check
// =============================================================================

/// Environment variable for the telemetry document type
pub const ENV_TELEMETRY_TYPE: &str = "TELEFILTER_TYPE";

/// Environment variable for the JSON-lines input file
pub const ENV_INPUT: &str = "TELEFILTER_INPUT";

/// Environment variable for the malformed field value policy
pub const ENV_ON_MALFORMED: &str = "TELEFILTER_ON_MALFORMED";
