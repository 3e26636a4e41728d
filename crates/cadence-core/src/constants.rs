/// Minutes an occurrence is still treated as running after its scheduled end.
pub const DEFAULT_END_BUFFER_MINUTES: i64 = 40;

/// Occurrences returned by the sync projection when the caller does not ask for a count.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Upper bound on raw rule instants examined for a single pattern segment.
pub const DEFAULT_MAX_EXPANDED_PER_SEGMENT: usize = 100_000;

/// Log filter used when `logging.level` is unset or unparseable.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix for environment overrides, e.g. `CADENCE__OCCURRENCES__END_BUFFER_MINUTES`.
pub const ENV_PREFIX: &str = "CADENCE";
pub const ENV_SEPARATOR: &str = "__";

/// Optional settings file read from the working directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
