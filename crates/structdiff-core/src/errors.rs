use thiserror::Error;

/// Result type alias using CompareError
pub type Result<T> = std::result::Result<T, CompareError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output. Data-level discrepancies are never
/// errors; they are reported as differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Override configuration
    AmbiguousOverride,
    DuplicateOverride,
    UnknownMember,

    // Strategy misuse
    PreconditionViolation,

    // List reconciliation
    KeyNotFound,

    // Difference tree
    TreeBuilderNotImplemented,
    InvalidTree,

    // Configuration / IO
    InvalidConfig,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::AmbiguousOverride => "ERR_AMBIGUOUS_OVERRIDE",
            ExErrorKind::DuplicateOverride => "ERR_DUPLICATE_OVERRIDE",
            ExErrorKind::UnknownMember => "ERR_UNKNOWN_MEMBER",
            ExErrorKind::PreconditionViolation => "ERR_PRECONDITION_VIOLATION",
            ExErrorKind::KeyNotFound => "ERR_KEY_NOT_FOUND",
            ExErrorKind::TreeBuilderNotImplemented => "ERR_TREE_BUILDER_NOT_IMPLEMENTED",
            ExErrorKind::InvalidTree => "ERR_INVALID_TREE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification fields used by the logging facility and the
/// CLI, plus free-form context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    target: Option<String>,
    index: Option<usize>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            target: None,
            index: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the member, type or name the error is about
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add list index context
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the competing candidates (used for AmbiguousOverride)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the target context, if any
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Get the list index context, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the competing candidates, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(target) = &self.target {
            write!(f, " (target: {})", target)?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for comparison configuration and strategy misuse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    /// Two or more overrides of the same precedence stage qualify
    #[error("Ambiguous override for {target} at {stage} stage: {} candidates qualify", .candidates.len())]
    AmbiguousOverride {
        stage: &'static str,
        target: String,
        candidates: Vec<String>,
    },

    /// An override was already registered for this exact member
    #[error("Override already registered for member {member}")]
    DuplicateOverride { member: String },

    /// A member override names a member the type does not have
    #[error("Type {type_name} has no member named {member}")]
    UnknownMember { type_name: String, member: String },

    /// A container strategy was applied to values it cannot handle
    #[error("Strategy {strategy} cannot compare {type_name}: {reason}")]
    Precondition {
        strategy: &'static str,
        type_name: String,
        reason: String,
    },

    /// Key-mode list comparison found an element without a key
    #[error("No key found for list element at index {index}: {element}")]
    KeyNotFound { index: usize, element: String },

    /// A difference tree was requested from a comparer that cannot build one
    #[error("Comparer for {type_name} does not implement difference tree building")]
    TreeBuilderNotImplemented { type_name: String },

    /// A tree node ancestor may only be assigned once
    #[error("Difference tree node {node} already has an ancestor")]
    AncestorAlreadyAssigned { node: usize },

    /// Comparison profile could not be parsed or applied
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Reading an input failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<CompareError> for ExError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::AmbiguousOverride {
                stage,
                target,
                candidates,
            } => ExError::new(ExErrorKind::AmbiguousOverride)
                .with_target(target)
                .with_message(format!(
                    "{} overrides qualify at {} stage",
                    candidates.len(),
                    stage
                ))
                .with_candidates(candidates),

            CompareError::DuplicateOverride { member } => {
                ExError::new(ExErrorKind::DuplicateOverride)
                    .with_target(member)
                    .with_message("Member already has an override")
            }

            CompareError::UnknownMember { type_name, member } => {
                ExError::new(ExErrorKind::UnknownMember)
                    .with_target(member)
                    .with_message(format!("Type {} has no such member", type_name))
            }

            CompareError::Precondition {
                strategy,
                type_name,
                reason,
            } => ExError::new(ExErrorKind::PreconditionViolation)
                .with_op(strategy)
                .with_target(type_name)
                .with_message(reason),

            CompareError::KeyNotFound { index, element } => ExError::new(ExErrorKind::KeyNotFound)
                .with_index(index)
                .with_message(format!("List element has no key: {}", element)),

            CompareError::TreeBuilderNotImplemented { type_name } => {
                ExError::new(ExErrorKind::TreeBuilderNotImplemented)
                    .with_target(type_name)
                    .with_message("Comparer cannot build a difference tree")
            }

            CompareError::AncestorAlreadyAssigned { node } => {
                ExError::new(ExErrorKind::InvalidTree)
                    .with_index(node)
                    .with_message("Node ancestor can only be assigned once")
            }

            CompareError::InvalidConfig { message } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            CompareError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

/// Conversion from toml deserialization errors
impl From<toml::de::Error> for CompareError {
    fn from(err: toml::de::Error) -> Self {
        CompareError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CompareError {
    fn from(err: std::io::Error) -> Self {
        CompareError::Io {
            message: err.to_string(),
        }
    }
}
