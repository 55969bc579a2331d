//! Crate settings and embedded resource tables.
//!
//! Defaults live in `resources/defaults.toml` and are parsed once on first
//! use. Callers that need different values build their own [`Settings`]
//! with [`Settings::from_toml_str`] and hand it to the components that take
//! one explicitly (for example [`XtbEngine::with_settings`](crate::engine::XtbEngine::with_settings)).
//!
//! - [`Settings`] — embedding, surface, `xtb`, text and symmetry sections
//! - [`template_variants`] — alternative phrasings of question templates
//! - [`fragment_presets`] — named SMARTS sets for fragment searches

mod resources;
mod settings;

pub use resources::{
    FragmentPreset, FragmentPresets, TemplateVariant, TemplateVariants, fragment_presets,
    template_variants,
};
pub use settings::{
    EmbeddingSettings, SasaSettings, Settings, SymmetrySettings, TextSettings, XtbSettings,
};

use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../resources/defaults.toml");

static DEFAULT_SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum Error {
    /// The TOML document could not be deserialized.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Returns the process-wide default settings.
pub fn settings() -> &'static Settings {
    DEFAULT_SETTINGS.get_or_init(|| {
        toml::from_str(DEFAULT_SETTINGS_TOML)
            .expect("Failed to parse embedded default settings. This is a library bug.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_struct_defaults() {
        assert_eq!(settings(), &Settings::default());
    }
}
