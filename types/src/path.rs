use std::fmt;

/// Which branch a dispatch call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionPath {
    /// Ran synchronously on the calling thread.
    Inline,
    /// Submitted to the sync context's runtime.
    Offloaded,
    /// Never ran: the token was already cancelled.
    Cancelled,
}

impl ExecutionPath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionPath::Inline => "inline",
            ExecutionPath::Offloaded => "offloaded",
            ExecutionPath::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
