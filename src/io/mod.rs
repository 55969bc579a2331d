//! Structure file output.
//!
//! Only writing is provided: molecules are constructed from line notations,
//! and files are produced for external programs such as `xtb`.
//!
//! - [`sdf`] — MDL V2000 structure-data files
//! - [`Error`] — failures while writing

pub mod error;

pub mod sdf {
    pub mod writer;

    pub use writer::{write, write_molecule};
}

pub use error::Error;
