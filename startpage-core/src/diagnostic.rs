// startpage-core/src/diagnostic.rs

/// A non-fatal condition reported while registering widgets or building a layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("invalid layout configuration: node has no type")]
    MissingNodeType,
    #[error("unknown layout element type: {0}")]
    UnknownNodeType(String),
    #[error("component configuration missing required field `{field}`")]
    MissingComponentField { field: &'static str },
    #[error("malformed {kind} node: {reason}")]
    MalformedNode { kind: String, reason: String },
    #[error("component type '{component_type}' is not registered (instance '{instance_id}')")]
    RegistryMiss {
        component_type: String,
        instance_id: String,
    },
    #[error("component type '{0}' is already registered, overwriting")]
    DuplicateRegistration(String),
}

impl Diagnostic {
    /// Whether the condition caused a node to be dropped from the output
    pub fn drops_node(&self) -> bool {
        !matches!(
            self,
            Diagnostic::RegistryMiss { .. } | Diagnostic::DuplicateRegistration(_)
        )
    }

    /// Emit through `tracing` at the level matching the condition
    pub fn log(&self) {
        match self {
            Diagnostic::DuplicateRegistration(_) => tracing::warn!("{}", self),
            _ => tracing::error!("{}", self),
        }
    }
}
