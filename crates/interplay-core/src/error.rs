//! Error types for the `interplay-core` crate.
//!
//! Almost nothing in the interaction engine fails: an unavailable behaviour or
//! an input event with no matching interaction is expressed as "nothing
//! happens". The variants below cover the few hard failures: identity lookups
//! against a registry that never issued the identity, malformed behaviour
//! definitions and invalid configuration.

/// Errors that can occur in the interaction engine.
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    /// An identity was looked up in a registry that never issued it.
    #[error("{kind} identity {id} is not registered")]
    NotFound {
        /// The identity namespace (`"interactor"` or `"interactable"`).
        kind: &'static str,
        /// The raw identity value.
        id: u64,
    },

    /// A behaviour was declared with an empty action name.
    #[error("interaction action name must not be empty")]
    EmptyActionName,

    /// Configuration could not be parsed.
    #[error("failed to parse interaction config: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid interaction config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results produced by this crate.
pub type Result<T, E = InteractionError> = std::result::Result<T, E>;
