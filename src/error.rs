/// Errors that can occur while interpreting Brainfuck code.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// A `[` has no matching `]` anywhere after it.
    #[error("Malformed program: unmatched '[' at instruction {ip}")]
    MalformedProgram { ip: usize },

    /// `,` ran past the end of the supplied input.
    #[error("Input exhausted at instruction {ip} after {consumed} byte(s)")]
    InputExhausted { ip: usize, consumed: usize },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,

    /// Writing the debug trace failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = core::result::Result<T, InterpretError>;

impl InterpretError {
    /// Instruction index the error points at, when there is one.
    pub fn instruction(&self) -> Option<usize> {
        match self {
            InterpretError::MalformedProgram { ip }
            | InterpretError::InputExhausted { ip, .. }
            | InterpretError::Io { ip, .. } => Some(*ip),
            InterpretError::StepLimitExceeded { .. } | InterpretError::Canceled => None,
        }
    }
}
