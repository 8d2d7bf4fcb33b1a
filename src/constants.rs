/// Source and destination name constants to ensure consistency across the
/// codebase. Source names are the identifiers accepted by the Extractor and
/// used as keys in the `[sources]` section of the configuration file.

// Recognized extraction sources
pub const DATABASE_SOURCE: &str = "database";
pub const API_SOURCE: &str = "api";

// Default hand-off destination for merged records
pub const DEFAULT_DESTINATION: &str = "data_warehouse";

/// Get all recognized source names
pub fn supported_sources() -> Vec<&'static str> {
    vec![DATABASE_SOURCE, API_SOURCE]
}
