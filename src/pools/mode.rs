/// Mode used when the caller names no model, or the resolved mode has no pool.
pub const DEFAULT_MODE: &str = "general";

/// Provider tag the front-end prepends to its model identifiers.
const PROVIDER_PREFIX: &str = "groq:";

/// Derive the pool mode from the caller's `model` field.
///
/// Examples:
/// - `"groq:research"` -> `"research"`
/// - `"study"` -> `"study"`
/// - absent or empty -> `"general"`
///
/// The result is only a lookup key; whether a pool exists for it is decided
/// by the table (unknown modes fall back to the general pool there).
pub fn resolve_mode(model: Option<&str>) -> &str {
    let Some(model) = model else {
        return DEFAULT_MODE;
    };
    let mode = model.strip_prefix(PROVIDER_PREFIX).unwrap_or(model).trim();
    if mode.is_empty() { DEFAULT_MODE } else { mode }
}
