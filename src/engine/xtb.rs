//! `xtb` subprocess engine.
//!
//! Each molecule is written as an SDF file into a fresh temporary directory
//! and `xtb` is run three times there: a single point (orbitals, dipole,
//! `charges` and `wbo` files), `--vipea` (vertical IP and EA) and
//! `--vfukui` (Fukui indices). Results are cached per structure in a
//! bounded in-memory cache of `cache_capacity` entries.

use super::{Error, QuantumEngine, QuantumResult};
use crate::chem::descriptors;
use crate::config::{self, XtbSettings};
use crate::io;
use crate::molecule::Molecule;
use moka::sync::Cache;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, instrument, warn};

const INPUT_FILE: &str = "molecule.sdf";
const AU_TO_DEBYE: f64 = 2.541_746;
const STDERR_TAIL_LINES: usize = 10;

/// Runs the `xtb` tight-binding program.
///
/// # Examples
///
/// ```no_run
/// use chemcaption::Molecule;
/// use chemcaption::engine::{QuantumEngine, XtbEngine};
///
/// let engine = XtbEngine::new();
/// let result = engine.calculate(&Molecule::from_smiles("O")?)?;
/// println!("HOMO {} eV", result.homo);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct XtbEngine {
    settings: XtbSettings,
    cache: Cache<String, QuantumResult>,
}

impl Default for XtbEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl XtbEngine {
    /// Engine configured from the process-wide settings.
    pub fn new() -> Self {
        Self::with_settings(config::settings().xtb.clone())
    }

    pub fn with_settings(settings: XtbSettings) -> Self {
        let cache = Cache::builder().max_capacity(settings.cache_capacity).build();
        Self { settings, cache }
    }

    pub fn settings(&self) -> &XtbSettings {
        &self.settings
    }

    /// Number of results currently held in the cache.
    pub fn cached_results(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    fn cache_key(molecule: &Molecule) -> Result<String, Error> {
        let mut key = molecule.to_smiles();
        for p in &molecule.conformer()?.positions {
            let _ = write!(key, "|{:.4},{:.4},{:.4}", p[0], p[1], p[2]);
        }
        Ok(key)
    }

    fn base_args(&self, molecule: &Molecule) -> Vec<String> {
        let graph = molecule.graph_with_hydrogens();
        let charge = descriptors::net_charge(graph);
        let electrons: i64 = graph
            .atoms
            .iter()
            .map(|a| i64::from(a.atomic_number()))
            .sum::<i64>()
            - i64::from(charge);
        let unpaired = electrons.rem_euclid(2);

        let mut args = vec![
            INPUT_FILE.to_string(),
            "--gfn".to_string(),
            self.settings.gfn.to_string(),
            "--chrg".to_string(),
            charge.to_string(),
            "--uhf".to_string(),
            unpaired.to_string(),
        ];
        args.extend(self.settings.extra_args.iter().cloned());
        args
    }

    fn run(&self, dir: &Path, args: &[String]) -> Result<String, Error> {
        let command = format!("{} {}", self.settings.executable, args.join(" "));
        debug!(%command, "running xtb");
        let output = Command::new(&self.settings.executable)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    Error::EngineUnavailable {
                        executable: self.settings.executable.clone(),
                        detail: e.to_string(),
                    }
                }
                _ => Error::Io(e),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail = stderr_tail(&stderr);
        if !output.status.success() {
            warn!(%command, status = %output.status, "xtb exited unsuccessfully");
            return Err(Error::Failed {
                command,
                status: output.status.to_string(),
                stderr: tail,
            });
        }
        if !tail.is_empty() {
            warn!(%command, stderr = %tail, "xtb wrote to stderr");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn compute(&self, molecule: &Molecule) -> Result<QuantumResult, Error> {
        let atom_count = molecule.graph_with_hydrogens().atom_count();
        let dir = tempfile::tempdir()?;
        let file = fs::File::create(dir.path().join(INPUT_FILE))?;
        io::sdf::write_molecule(std::io::BufWriter::new(file), molecule)?;

        let base = self.base_args(molecule);

        let single_point = self.run(dir.path(), &base)?;
        let (homo, lumo) = parse_frontier_orbitals(&single_point)?;
        let dipole = parse_dipole(&single_point)?;
        let charges = parse_charges(&fs::read_to_string(dir.path().join("charges"))?, atom_count)?;
        let wiberg_bond_orders = parse_wbo(&fs::read_to_string(dir.path().join("wbo"))?)?;

        let mut args = base.clone();
        args.push("--vipea".to_string());
        let (ionization_potential, electron_affinity) = parse_vipea(&self.run(dir.path(), &args)?)?;

        let mut args = base;
        args.push("--vfukui".to_string());
        let (fukui_plus, fukui_minus) = parse_fukui(&self.run(dir.path(), &args)?, atom_count)?;

        Ok(QuantumResult {
            homo,
            lumo,
            ionization_potential,
            electron_affinity,
            charges,
            fukui_plus,
            fukui_minus,
            dipole,
            wiberg_bond_orders,
        })
    }
}

impl QuantumEngine for XtbEngine {
    fn name(&self) -> &str {
        "xtb"
    }

    #[instrument(skip(self, molecule), fields(molecule = %molecule))]
    fn calculate(&self, molecule: &Molecule) -> Result<QuantumResult, Error> {
        let key = Self::cache_key(molecule)?;
        if let Some(hit) = self.cache.get(&key) {
            debug!("xtb cache hit");
            return Ok(hit);
        }
        let result = self.compute(molecule)?;
        self.cache.insert(key, result.clone());
        Ok(result)
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

fn parse_float(quantity: &'static str, token: &str) -> Result<f64, Error> {
    token
        .trim()
        .parse()
        .map_err(|_| Error::parse(quantity, format!("'{token}' is not a number")))
}

/// Reads the HOMO and LUMO energies in eV from the orbital table.
pub fn parse_frontier_orbitals(stdout: &str) -> Result<(f64, f64), Error> {
    let energy = |tag: &'static str| -> Result<f64, Error> {
        let line = stdout
            .lines()
            .rev()
            .find(|l| l.trim_end().ends_with(tag))
            .ok_or_else(|| Error::parse("frontier orbitals", format!("no line tagged {tag}")))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let ev = tokens
            .len()
            .checked_sub(2)
            .map(|i| tokens[i])
            .ok_or_else(|| Error::parse("frontier orbitals", format!("short line '{line}'")))?;
        parse_float("frontier orbitals", ev)
    };
    Ok((energy("(HOMO)")?, energy("(LUMO)")?))
}

/// Reads the full dipole vector and converts it from atomic units to Debye.
pub fn parse_dipole(stdout: &str) -> Result<[f64; 3], Error> {
    let block = stdout
        .rfind("molecular dipole:")
        .map(|at| &stdout[at..])
        .ok_or_else(|| Error::parse("dipole", "no molecular dipole block"))?;
    let line = block
        .lines()
        .find(|l| l.trim_start().starts_with("full:"))
        .ok_or_else(|| Error::parse("dipole", "no 'full:' line"))?;
    let values: Vec<&str> = line.split_whitespace().skip(1).collect();
    if values.len() < 3 {
        return Err(Error::parse("dipole", format!("short line '{line}'")));
    }
    let mut dipole = [0.0; 3];
    for (slot, token) in dipole.iter_mut().zip(&values) {
        *slot = parse_float("dipole", token)? * AU_TO_DEBYE;
    }
    Ok(dipole)
}

/// Reads vertical IP and EA in eV from `--vipea` output.
pub fn parse_vipea(stdout: &str) -> Result<(f64, f64), Error> {
    let value = |prefix: &'static str| -> Result<f64, Error> {
        let line = stdout
            .lines()
            .find(|l| l.trim_start().starts_with(prefix))
            .ok_or_else(|| Error::parse("vertical IP/EA", format!("no '{prefix}' line")))?;
        parse_float("vertical IP/EA", &line.trim_start()[prefix.len()..])
    };
    Ok((value("delta SCC IP (eV):")?, value("delta SCC EA (eV):")?))
}

/// Reads f⁺ and f⁻ per atom from the `--vfukui` table.
pub fn parse_fukui(stdout: &str, atom_count: usize) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let block = stdout
        .find("Fukui functions:")
        .map(|at| &stdout[at..])
        .ok_or_else(|| Error::parse("Fukui indices", "no Fukui table"))?;
    let mut plus = Vec::with_capacity(atom_count);
    let mut minus = Vec::with_capacity(atom_count);
    for line in block.lines().skip(2).take(atom_count) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(Error::parse("Fukui indices", format!("short row '{line}'")));
        }
        plus.push(parse_float("Fukui indices", tokens[1])?);
        minus.push(parse_float("Fukui indices", tokens[2])?);
    }
    if plus.len() != atom_count {
        return Err(Error::parse(
            "Fukui indices",
            format!("expected {atom_count} rows, found {}", plus.len()),
        ));
    }
    Ok((plus, minus))
}

/// Reads the `charges` file, one value per atom.
pub fn parse_charges(text: &str, atom_count: usize) -> Result<Vec<f64>, Error> {
    let charges = text
        .split_whitespace()
        .map(|t| parse_float("charges", t))
        .collect::<Result<Vec<_>, _>>()?;
    if charges.len() != atom_count {
        return Err(Error::parse(
            "charges",
            format!("expected {atom_count} values, found {}", charges.len()),
        ));
    }
    Ok(charges)
}

/// Reads the `wbo` file of one-based `i j order` rows.
pub fn parse_wbo(text: &str) -> Result<Vec<(usize, usize, f64)>, Error> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [i, j, order] = tokens[..] else {
                return Err(Error::parse("Wiberg bond orders", format!("bad row '{line}'")));
            };
            let index = |t: &str| {
                t.parse::<usize>()
                    .ok()
                    .and_then(|v| v.checked_sub(1))
                    .ok_or_else(|| Error::parse("Wiberg bond orders", format!("bad index '{t}'")))
            };
            Ok((index(i)?, index(j)?, parse_float("Wiberg bond orders", order)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_POINT: &str = "\
         #    Occupation            Energy/Eh            Energy/eV
      -------------------------------------------------------------
         1        2.0000           -0.6856143             -18.6565
         2        2.0000           -0.5425017             -14.7622
         3        2.0000           -0.4830165             -13.1436
         4        2.0000           -0.4436563             -12.0725 (HOMO)
         5                          0.0647035               1.7607 (LUMO)
         6                          0.2197315               5.9792
      -------------------------------------------------------------
                  HL-Gap            0.5083598 Eh           13.8332 eV

molecular dipole:
                 x           y           z       tot (Debye)
 q only:       -0.000       0.000      -0.623
   full:       -0.000       0.000      -0.865       2.199
";

    const VIPEA: &str = "\
 delta SCC IP (eV):   14.4533
 delta SCC EA (eV):   -6.7322
";

    const VFUKUI: &str = "\
Fukui functions:
     #        f(+)     f(-)     f(0)
     1O      -0.086   -0.598   -0.342
     2H      -0.457   -0.201   -0.329
     3H      -0.457   -0.201   -0.329
-------------------------------------------------
";

    #[test]
    fn frontier_orbitals_are_read_in_ev() {
        let (homo, lumo) = parse_frontier_orbitals(SINGLE_POINT).unwrap();
        assert_eq!(homo, -12.0725);
        assert_eq!(lumo, 1.7607);
    }

    #[test]
    fn dipole_is_converted_to_debye() {
        let dipole = parse_dipole(SINGLE_POINT).unwrap();
        assert!((dipole[2] + 0.865 * AU_TO_DEBYE).abs() < 1e-9);
        assert_eq!(dipole[1], 0.0);
    }

    #[test]
    fn vipea_values_are_read() {
        assert_eq!(parse_vipea(VIPEA).unwrap(), (14.4533, -6.7322));
        assert!(matches!(parse_vipea("nothing"), Err(Error::Parse { .. })));
    }

    #[test]
    fn fukui_table_is_read() {
        let (plus, minus) = parse_fukui(VFUKUI, 3).unwrap();
        assert_eq!(plus, vec![-0.086, -0.457, -0.457]);
        assert_eq!(minus, vec![-0.598, -0.201, -0.201]);
        assert!(parse_fukui(VFUKUI, 4).is_err());
    }

    #[test]
    fn charges_file_must_match_atom_count() {
        assert_eq!(parse_charges("-0.56\n0.28\n0.28\n", 3).unwrap(), vec![-0.56, 0.28, 0.28]);
        assert!(parse_charges("-0.56\n0.28\n", 3).is_err());
    }

    #[test]
    fn wbo_rows_become_zero_based() {
        let rows = parse_wbo("   1   2   0.92\n   1   3   0.92\n").unwrap();
        assert_eq!(rows, vec![(0, 1, 0.92), (0, 2, 0.92)]);
        assert!(parse_wbo("1 2").is_err());
        assert!(parse_wbo("0 2 1.0").is_err());
    }

    #[test]
    fn missing_executable_is_reported_as_unavailable() {
        let engine = XtbEngine::with_settings(XtbSettings {
            executable: "definitely-not-an-xtb-binary".to_string(),
            ..XtbSettings::default()
        });
        let mol = Molecule::from_smiles("O").unwrap();
        let err = engine.calculate(&mol).unwrap_err();
        assert!(matches!(err, Error::EngineUnavailable { .. }), "{err}");
    }

    #[test]
    fn result_cache_is_bounded() {
        let engine = XtbEngine::with_settings(XtbSettings {
            cache_capacity: 2,
            ..XtbSettings::default()
        });
        for k in 0..10 {
            let result = QuantumResult {
                ionization_potential: f64::from(k),
                ..Default::default()
            };
            engine.cache.insert(format!("structure-{k}"), result);
        }
        assert!(engine.cached_results() <= 2, "{} results cached", engine.cached_results());

        engine.clear_cache();
        assert!((0..10).all(|k| engine.cache.get(&format!("structure-{k}")).is_none()));
    }

    #[test]
    fn cached_results_are_returned_without_running_xtb() {
        let engine = XtbEngine::with_settings(XtbSettings {
            executable: "definitely-not-an-xtb-binary".to_string(),
            ..XtbSettings::default()
        });
        let mol = Molecule::from_smiles("O").unwrap();
        let stored = QuantumResult {
            homo: -12.0,
            ..Default::default()
        };
        engine.cache.insert(XtbEngine::cache_key(&mol).unwrap(), stored.clone());
        assert_eq!(engine.calculate(&mol).unwrap(), stored);
    }

    #[test]
    fn arguments_carry_charge_and_spin() {
        let engine = XtbEngine::new();
        let args = engine.base_args(&Molecule::from_smiles("[NH4+]").unwrap());
        assert_eq!(&args[..7], ["molecule.sdf", "--gfn", "2", "--chrg", "1", "--uhf", "0"]);
        let radical = engine.base_args(&Molecule::from_smiles("[CH3]").unwrap());
        assert_eq!(radical[6], "1");
    }
}
