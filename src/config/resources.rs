use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const TEMPLATES_TOML: &str = include_str!("../../resources/templates.toml");
const FRAGMENTS_TOML: &str = include_str!("../../resources/fragments.toml");

static TEMPLATES: OnceLock<TemplateVariants> = OnceLock::new();
static FRAGMENTS: OnceLock<FragmentPresets> = OnceLock::new();

/// Alternative phrasings of one canonical template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateVariant {
    pub base: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateVariants {
    #[serde(default)]
    pub variants: Vec<TemplateVariant>,
}

impl TemplateVariants {
    /// Alternatives registered for `template`, empty when there are none.
    pub fn alternatives_for(&self, template: &str) -> &[String] {
        self.variants
            .iter()
            .find(|v| v.base == template)
            .map(|v| v.alternatives.as_slice())
            .unwrap_or(&[])
    }
}

/// A named list of SMARTS patterns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FragmentPreset {
    pub names: Vec<String>,
    pub smarts: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FragmentPresets {
    #[serde(default)]
    pub presets: BTreeMap<String, FragmentPreset>,
}

pub fn template_variants() -> &'static TemplateVariants {
    TEMPLATES.get_or_init(|| {
        toml::from_str(TEMPLATES_TOML)
            .expect("Failed to parse embedded template variants. This is a library bug.")
    })
}

pub fn fragment_presets() -> &'static FragmentPresets {
    FRAGMENTS.get_or_init(|| {
        toml::from_str(FRAGMENTS_TOML)
            .expect("Failed to parse embedded fragment presets. This is a library bug.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_parse() {
        let variants = template_variants();
        assert!(!variants.variants.is_empty());
        let canonical =
            "Question: What {VERB} the {PROPERTY_NAME} of the molecule with {REPR_SYSTEM} {REPR_STRING}?";
        assert!(!variants.alternatives_for(canonical).is_empty());
        assert!(variants.alternatives_for("no such template").is_empty());
    }

    #[test]
    fn embedded_fragment_presets_are_consistent() {
        let presets = fragment_presets();
        for key in ["organic", "rings", "heterocyclic"] {
            let preset = &presets.presets[key];
            assert_eq!(preset.names.len(), preset.smarts.len(), "preset {key}");
            assert!(!preset.names.is_empty());
        }
    }
}
