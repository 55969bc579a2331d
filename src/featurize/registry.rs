//! Default-constructed featurizers and comparators by group.

use super::base::Featurizer;
use super::bonds::*;
use super::comparator::*;
use super::composition::*;
use super::electronicity::*;
use super::miscellaneous::SVGFeaturizer;
use super::reaction::*;
use super::rules::*;
use super::spatial::*;
use super::stereochemistry::ChiralCenterCountFeaturizer;
use super::substructure::*;
use super::symmetry::*;
use super::Error;
use std::fmt;
use std::str::FromStr;

/// Module a featurizer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    Bonds,
    Composition,
    Electronicity,
    Miscellaneous,
    Reaction,
    Rules,
    Spatial,
    Stereochemistry,
    Substructure,
    Symmetry,
}

impl Group {
    pub const ALL: [Group; 10] = [
        Group::Bonds,
        Group::Composition,
        Group::Electronicity,
        Group::Miscellaneous,
        Group::Reaction,
        Group::Rules,
        Group::Spatial,
        Group::Stereochemistry,
        Group::Substructure,
        Group::Symmetry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Group::Bonds => "bonds",
            Group::Composition => "composition",
            Group::Electronicity => "electronicity",
            Group::Miscellaneous => "miscellaneous",
            Group::Reaction => "reaction",
            Group::Rules => "rules",
            Group::Spatial => "spatial",
            Group::Stereochemistry => "stereochemistry",
            Group::Substructure => "substructure",
            Group::Symmetry => "symmetry",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = Group::ALL.iter().map(Group::name).collect();
                Error::invalid_argument(format!(
                    "unknown featurizer group '{s}'; available: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Every featurizer of `group` with default arguments.
///
/// Composites ([`MultipleFeaturizer`](super::MultipleFeaturizer)) and
/// [`ValueFeaturizer`](super::adaptor::ValueFeaturizer), which has no default closure, are not included.
pub fn init_all_featurizers(group: Group) -> Vec<Box<dyn Featurizer>> {
    match group {
        Group::Bonds => vec![
            Box::new(BondTypeCountFeaturizer::new()),
            Box::new(BondTypeProportionFeaturizer::new()),
            Box::new(RotableBondCountFeaturizer::new()),
            Box::new(RotableBondProportionFeaturizer::new()),
            Box::new(BondOrderFeaturizer::new()),
            Box::new(DipoleMomentsFeaturizer::new()),
        ],
        Group::Composition => vec![
            Box::new(MolecularFormulaFeaturizer::new()),
            Box::new(MolecularMassFeaturizer::new()),
            Box::new(MonoisotopicMolecularMassFeaturizer::new()),
            Box::new(ElementMassFeaturizer::new()),
            Box::new(ElementMassProportionFeaturizer::new()),
            Box::new(ElementCountFeaturizer::new()),
            Box::new(ElementCountProportionFeaturizer::new()),
            Box::new(AtomCountFeaturizer::new()),
            Box::new(DegreeOfUnsaturationFeaturizer::new()),
        ],
        Group::Electronicity => vec![
            Box::new(HydrogenAcceptorCountFeaturizer::new()),
            Box::new(HydrogenDonorCountFeaturizer::new()),
            Box::new(ValenceElectronCountFeaturizer::new()),
            Box::new(HOMOEnergyFeaturizer::new()),
            Box::new(LUMOEnergyFeaturizer::new()),
            Box::new(IonizationPotentialFeaturizer::new()),
            Box::new(ElectronAffinityFeaturizer::new()),
            Box::new(MoleculeElectrophilicityFeaturizer::new()),
            Box::new(MoleculeNucleophilicityFeaturizer::new()),
            Box::new(MoleculeElectrofugalityFeaturizer::new()),
            Box::new(MoleculeNucleofugalityFeaturizer::new()),
            Box::new(AtomChargeFeaturizer::new()),
            Box::new(AtomElectrophilicityFeaturizer::new()),
            Box::new(AtomNucleophilicityFeaturizer::new()),
        ],
        Group::Miscellaneous => vec![Box::new(SVGFeaturizer::new())],
        Group::Reaction => vec![
            Box::new(SolventAccessibleSurfaceAreaFeaturizer::new()),
            Box::new(SolventAccessibleVolumeFeaturizer::new()),
            Box::new(SolventAccessibleAtomAreaFeaturizer::new()),
        ],
        Group::Rules => vec![
            Box::new(LipinskiFilterFeaturizer::new()),
            Box::new(GhoseFilterFeaturizer::new()),
            Box::new(LeadLikenessFilterFeaturizer::new()),
        ],
        Group::Spatial => vec![
            Box::new(PMIFeaturizer::new()),
            Box::new(NPRFeaturizer::new()),
            Box::new(AsphericityFeaturizer::new()),
            Box::new(EccentricityFeaturizer::new()),
            Box::new(InertialShapeFactorFeaturizer::new()),
            Box::new(RadiusOfGyrationFeaturizer::new()),
            Box::new(SpherocityIndexFeaturizer::new()),
            Box::new(AtomVolumeFeaturizer::new()),
        ],
        Group::Stereochemistry => vec![Box::new(ChiralCenterCountFeaturizer::new())],
        Group::Substructure => vec![
            Box::new(
                FragmentSearchFeaturizer::new()
                    .expect("Failed to build fragment search from embedded presets. This is a library bug."),
            ),
            Box::new(TopologyCountFeaturizer::new()),
            Box::new(IsomorphismFeaturizer::new()),
        ],
        Group::Symmetry => vec![
            Box::new(PointGroupFeaturizer::new()),
            Box::new(RotationalSymmetryNumberFeaturizer::new()),
        ],
    }
}

/// Every built-in comparator with default arguments.
///
/// [`Comparator`] and [`MultipleComparator`] themselves are not included.
pub fn init_all_comparators() -> Vec<Box<dyn Comparison>> {
    vec![
        Box::new(AtomCountComparator::new()),
        Box::new(IsomerismComparator::new()),
        Box::new(IsoelectronicComparator::new()),
        Box::new(ValenceElectronCountComparator::new()),
        Box::new(LipinskiViolationCountComparator::new()),
        Box::new(PointGroupComparator::new()),
        Box::new(ChiralCenterCountComparator::new()),
        Box::new(RotableBondCountComparator::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_parse_by_name() {
        for group in Group::ALL {
            assert_eq!(group.name().parse::<Group>().unwrap(), group);
        }
        assert_eq!(" Spatial ".parse::<Group>().unwrap(), Group::Spatial);
        assert!(matches!("optics".parse::<Group>(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn every_group_is_populated() {
        for group in Group::ALL {
            assert!(!init_all_featurizers(group).is_empty(), "{group} is empty");
        }
        assert_eq!(init_all_featurizers(Group::Electronicity).len(), 14);
        assert_eq!(init_all_comparators().len(), 8);
    }

    #[test]
    fn labels_are_unique_within_a_group() {
        for group in Group::ALL {
            let mut labels: Vec<String> = init_all_featurizers(group)
                .iter()
                .flat_map(|f| f.feature_labels())
                .collect();
            let total = labels.len();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), total, "duplicate labels in {group}");
        }
    }
}
