use crate::io::error::Error;
use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use crate::model::types::BondOrder;
use crate::molecule::Molecule;
use std::io::Write;

const V2000_LIMIT: usize = 999;

fn bond_order_to_ctfile(order: BondOrder) -> u8 {
    match order {
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic | BondOrder::OneAndAHalf => 4,
        _ => 1,
    }
}

/// Writes one V2000 record for `graph` with coordinates from `conformer`.
///
/// Formal charges are written to `M  CHG` lines; the record ends with `$$$$`
/// and the writer is flushed, so buffered output errors surface here.
pub fn write<W: Write>(
    mut writer: W,
    graph: &MolGraph,
    conformer: &Conformer,
    title: &str,
) -> Result<(), Error> {
    let atom_count = graph.atom_count();
    let bond_count = graph.bond_count();
    if atom_count > V2000_LIMIT || bond_count > V2000_LIMIT {
        return Err(Error::TooLarge {
            atoms: atom_count,
            bonds: bond_count,
        });
    }
    if conformer.len() != atom_count {
        return Err(Error::conversion(format!(
            "conformer has {} positions for {atom_count} atoms",
            conformer.len()
        )));
    }

    writeln!(writer, "{title}")?;
    writeln!(writer, "chemcaption")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0  0999 V2000",
        atom_count, bond_count
    )?;

    for (atom, position) in graph.atoms.iter().zip(&conformer.positions) {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            position[0],
            position[1],
            position[2],
            atom.element.symbol()
        )?;
    }

    for bond in &graph.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            bond_order_to_ctfile(bond.order)
        )?;
    }

    let charged: Vec<(usize, i8)> = graph
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i + 1, a.formal_charge))
        .collect();
    for chunk in charged.chunks(8) {
        write!(writer, "M  CHG{:>3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(writer, " {idx:>3} {charge:>3}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    writer.flush()?;
    Ok(())
}

/// Writes `molecule` with explicit hydrogens and its conformer, titled with its SMILES.
///
/// # Errors
///
/// Embedding failures surface as [`Error::Conversion`].
pub fn write_molecule<W: Write>(writer: W, molecule: &Molecule) -> Result<(), Error> {
    let conformer = molecule.conformer()?;
    write(
        writer,
        molecule.graph_with_hydrogens(),
        conformer,
        &molecule.to_smiles(),
    )
}
