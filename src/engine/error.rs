use thiserror::Error;

/// Errors raised while running or reading a quantum-chemistry engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine executable could not be started.
    #[error("quantum-chemistry engine '{executable}' is not available: {detail}")]
    EngineUnavailable {
        /// Program that was looked up.
        executable: String,
        /// Reason reported by the operating system.
        detail: String,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        /// Command line, for diagnostics.
        command: String,
        /// Exit status as reported by the operating system.
        status: String,
        /// Trailing lines of standard error.
        stderr: String,
    },

    /// Engine output did not contain an expected quantity.
    #[error("failed to parse {quantity} from engine output: {detail}")]
    Parse {
        /// Name of the quantity being read.
        quantity: &'static str,
        /// Description of the problem.
        detail: String,
    },

    /// Reactivity indices need a positive chemical hardness `IP − EA`.
    #[error("ionization potential {ip} eV must exceed electron affinity {ea} eV")]
    NonPositiveGap { ip: f64, ea: f64 },

    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write engine input: {0}")]
    Input(#[from] crate::io::Error),

    #[error(transparent)]
    Chem(#[from] crate::chem::Error),
}

impl Error {
    /// Creates a [`Parse`](Error::Parse) error.
    ///
    /// # Arguments
    ///
    /// * `quantity` — Name of the quantity that could not be read
    /// * `detail` — Description of the problem
    pub fn parse(quantity: &'static str, detail: impl Into<String>) -> Self {
        Self::Parse {
            quantity,
            detail: detail.into(),
        }
    }
}
