/// Errors surfaced at the edges of the engine (string parsing, config loading).
///
/// Scene composition itself is total and never fails; these only appear when
/// untyped input from the host page is turned into typed values.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A category string did not name any known bucket for its axis.
    #[error("unknown {axis} value: {value:?}")]
    UnknownCategory {
        /// Which axis was being parsed ("time of day", "weather", ...).
        axis: &'static str,
        /// The raw input.
        value: String,
    },

    /// A config document parsed but holds values the engine cannot use.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// Which value is wrong and why.
        reason: String,
    },

    /// A JSON document (config, progress payload) could not be read or written.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}
