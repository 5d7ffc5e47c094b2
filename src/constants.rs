// src/constants.rs

/// The name of the directory containing baton configuration for a project.
pub const BATON_DIR: &str = ".baton";

/// The property-file context in which alias definitions live.
pub const ALIASES_CONTEXT: &str = "aliases";

/// The printable name of the default scope (its internal name is empty).
pub const DEFAULT_SCOPE_NAME: &str = "default";

/// Marker prefix for ad-hoc property override tokens (`-P[scope#]key=value`).
pub const AD_HOC_PROP_MARKER: &str = "-P";

/// Prefix used when installing ad-hoc properties as environment variables.
pub const ENV_PROP_PREFIX: &str = "BATON_";
