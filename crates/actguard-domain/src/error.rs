use thiserror::Error;

/// Failure reported by a document, live-page, or stylesheet collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{provider} unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },
}

/// Failure raised while a single rule evaluates a candidate.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    Evaluation(String),

    #[error("rule run already finalized; reset it before executing again")]
    AlreadyFinalized,
}

/// Errors surfaced to callers of the engine.
///
/// A run either yields a complete report or one of these; there is no
/// degraded report.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error("rule {code} failed")]
    RuleExecution {
        code: String,
        #[source]
        source: RuleError,
    },

    #[error("collaborator failed while {context}")]
    Collaborator {
        context: String,
        #[source]
        source: ProviderError,
    },

    #[error("invalid rule catalog: {0}")]
    Catalog(String),
}

impl EngineError {
    /// Wrap a rule failure, surfacing collaborator errors under their own variant.
    pub(crate) fn from_rule(code: &str, err: RuleError) -> Self {
        match err {
            RuleError::Provider(source) => EngineError::Collaborator {
                context: format!("evaluating {code}"),
                source,
            },
            other => EngineError::RuleExecution {
                code: code.to_string(),
                source: other,
            },
        }
    }
}
