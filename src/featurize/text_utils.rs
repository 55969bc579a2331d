//! Template placeholders, the canonical question templates and variant selection.

use super::Error;
use crate::config::{self, TextSettings};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

pub const VERB: &str = "{VERB}";
pub const PROPERTY_NAME: &str = "{PROPERTY_NAME}";
pub const REPR_SYSTEM: &str = "{REPR_SYSTEM}";
pub const REPR_STRING: &str = "{REPR_STRING}";
pub const CONSTRAINT: &str = "{CONSTRAINT}";
pub const COMPLETION: &str = "{COMPLETION}";

/// Every placeholder a template may use.
pub const PLACEHOLDERS: [&str; 6] = [VERB, PROPERTY_NAME, REPR_SYSTEM, REPR_STRING, CONSTRAINT, COMPLETION];

pub const COMPLETION_TEMPLATE: &str = "Answer: {COMPLETION}";

/// The canonical single-molecule question.
pub fn generate_template() -> String {
    "Question: What {VERB} the {PROPERTY_NAME} of the molecule with {REPR_SYSTEM} {REPR_STRING}?"
        .to_string()
}

/// The canonical multi-molecule comparison question.
pub fn generate_comparison_template() -> String {
    "Question: Do the molecules with {REPR_SYSTEM} {REPR_STRING} have the same {PROPERTY_NAME}?"
        .to_string()
}

/// Returns a registered variant of `template` or the template itself.
///
/// A variant is chosen with the process-wide probability (0.5 by default)
/// when the template has alternatives; see [`inspect_template_with`] for
/// caller-provided settings. The outcome depends only on `rng`, so a seeded
/// generator reproduces it.
///
/// # Examples
///
/// ```
/// use chemcaption::featurize::text_utils::{generate_template, inspect_template};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let template = generate_template();
/// let a = inspect_template(&template, &mut StdRng::seed_from_u64(7));
/// let b = inspect_template(&template, &mut StdRng::seed_from_u64(7));
/// assert_eq!(a, b);
/// ```
pub fn inspect_template<R: Rng + ?Sized>(template: &str, rng: &mut R) -> String {
    inspect_template_with(template, &config::settings().text, rng)
}

/// [`inspect_template`] with the variant probability taken from `settings`.
///
/// # Examples
///
/// ```
/// use chemcaption::Settings;
/// use chemcaption::featurize::text_utils::{generate_template, inspect_template_with};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let settings = Settings::from_toml_str("[text]\nvariant_probability = 0.0\n")?;
/// let template = generate_template();
/// let mut rng = StdRng::seed_from_u64(3);
/// assert_eq!(inspect_template_with(&template, &settings.text, &mut rng), template);
/// # Ok::<(), chemcaption::config::Error>(())
/// ```
pub fn inspect_template_with<R: Rng + ?Sized>(template: &str, settings: &TextSettings, rng: &mut R) -> String {
    let probability = settings.variant_probability.clamp(0.0, 1.0);
    let alternatives = config::template_variants().alternatives_for(template);
    if alternatives.is_empty() || !rng.gen_bool(probability) {
        return template.to_string();
    }
    alternatives
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| template.to_string())
}

/// Default placeholder values for `single` or `multiple` molecules.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for any other cardinality.
pub fn generate_info(cardinality: &str) -> Result<BTreeMap<&'static str, String>, Error> {
    let (verb, property, repr) = match cardinality {
        "single" => ("is", "property", "molecule"),
        "multiple" => ("are", "properties", "molecules"),
        other => {
            return Err(Error::invalid_argument(format!(
                "cardinality must be 'single' or 'multiple', got '{other}'"
            )));
        }
    };
    Ok(BTreeMap::from([
        (VERB, verb.to_string()),
        (PROPERTY_NAME, property.to_string()),
        (REPR_SYSTEM, "SMILES".to_string()),
        (REPR_STRING, repr.to_string()),
        (CONSTRAINT, String::new()),
        (COMPLETION, String::new()),
    ]))
}
