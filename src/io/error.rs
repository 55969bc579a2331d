use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("V2000 connection tables hold at most 999 atoms and bonds (got {atoms} atoms, {bonds} bonds)")]
    TooLarge { atoms: usize, bonds: usize },

    #[error("failed to convert data model: {0}")]
    Conversion(String),
}

impl Error {
    pub fn conversion(details: impl Into<String>) -> Self {
        Self::Conversion(details.into())
    }
}

impl From<crate::chem::Error> for Error {
    fn from(e: crate::chem::Error) -> Self {
        Error::Conversion(e.to_string())
    }
}
