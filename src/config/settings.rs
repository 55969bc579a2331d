use serde::Deserialize;

/// Conformer embedding settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Seed of the distance-geometry random number generator.
    pub seed: u64,
    /// Embedding attempts before giving up; each retry advances the seed.
    pub max_attempts: usize,
    /// Gradient steps of the bounds error-function refinement.
    pub refine_iterations: usize,
    /// Step size of the refinement.
    pub learning_rate: f64,
    /// L-BFGS steps of the force-field cleanup that follows the refinement.
    pub cleanup_iterations: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            max_attempts: 10,
            refine_iterations: 400,
            learning_rate: 0.05,
            cleanup_iterations: 2000,
        }
    }
}

/// Solvent accessible surface settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SasaSettings {
    /// Solvent sphere radius in Å.
    pub solvent_radius: f64,
    /// Test points per atom sphere.
    pub points: usize,
}

impl Default for SasaSettings {
    fn default() -> Self {
        Self {
            solvent_radius: 1.4,
            points: 480,
        }
    }
}

/// Settings for the `xtb` subprocess.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct XtbSettings {
    /// Executable name or path.
    pub executable: String,
    /// GFN Hamiltonian version passed as `--gfn`.
    pub gfn: u8,
    /// Extra command-line arguments appended to every call.
    pub extra_args: Vec<String>,
    /// Largest number of results kept by an engine's in-memory cache.
    pub cache_capacity: u64,
}

impl Default for XtbSettings {
    fn default() -> Self {
        Self {
            executable: "xtb".to_string(),
            gfn: 2,
            extra_args: Vec::new(),
            cache_capacity: 256,
        }
    }
}

/// Prompt rendering and padding settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Probability of replacing a template by one of its variants.
    pub variant_probability: f64,
    /// Width of per-atom feature rows.
    pub max_atoms: usize,
    /// Width of per-bond feature rows.
    pub max_bonds: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            variant_probability: 0.5,
            max_atoms: 30,
            max_bonds: 50,
        }
    }
}

/// Point group detection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SymmetrySettings {
    /// Distance tolerance in Å when matching atoms under a symmetry operation.
    pub tolerance: f64,
}

impl Default for SymmetrySettings {
    fn default() -> Self {
        Self { tolerance: 0.3 }
    }
}

/// All tunable settings of the crate.
///
/// Missing sections and keys fall back to their defaults, so an override
/// document only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use chemcaption::Settings;
///
/// let settings = Settings::from_toml_str("[text]\nmax_atoms = 64\n")?;
/// assert_eq!(settings.text.max_atoms, 64);
/// assert_eq!(settings.text.max_bonds, 50);
/// # Ok::<(), chemcaption::config::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub embedding: EmbeddingSettings,
    pub sasa: SasaSettings,
    pub xtb: XtbSettings,
    pub text: TextSettings,
    pub symmetry: SymmetrySettings,
}

impl Settings {
    /// Parses settings from a TOML document.
    ///
    /// # Arguments
    ///
    /// * `toml` — TOML text; absent keys take their default values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](super::Error::Parse) if the document is not
    /// valid TOML or a value has the wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self, super::Error> {
        Ok(toml::from_str(toml)?)
    }
}
