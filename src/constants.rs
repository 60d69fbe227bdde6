/// Environment variable overriding the profiles file location
pub const CS_CONFIG_ENV: &str = "CS_CONFIG";
/// Profiles file, relative to the user's config directory
pub const DEFAULT_CONFIG_FILE: &str = "cs/profiles.yaml";

/// `cs` exit status when an async job wait was cancelled
pub const EXIT_CANCELLED: i32 = 2;

/// `cs-check` exit statuses
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_DESCRIPTOR_NOT_FOUND: i32 = 2;
pub const EXIT_CATALOG_ENTRY_NOT_FOUND: i32 = 3;
pub const EXIT_BAD_INPUT: i32 = 4;
