//! Hückel aromaticity over the smallest set of smallest rings.
//!
//! One aromatic system may be written with alternating single and double
//! bonds or with lowercase atoms. Perception rewrites both spellings into
//! aromatic atoms joined by aromatic bonds, so the two compare equal under
//! [`Atom::same_species`] and bond-order matching.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Mol;
use crate::rings::{ring_pairs, RingSet};

/// Marks the atoms and ring bonds of every aromatic ring. Rings that are
/// already written aromatic are kept as they are.
pub fn perceive_aromaticity(mol: &mut Mol<Atom, Bond>) {
    let rings = RingSet::sssr(mol);
    // decide on the parsed bonds before rewriting any of them
    let aromatic: Vec<&[NodeIndex]> = rings
        .rings()
        .iter()
        .map(Vec::as_slice)
        .filter(|ring| written_aromatic(mol, ring) || is_huckel_ring(mol, ring))
        .collect();

    for ring in aromatic {
        for &atom in ring {
            mol.atom_mut(atom).is_aromatic = true;
        }
        for (a, b) in ring_pairs(ring) {
            if let Some(bond) = mol.bond_between(a, b) {
                mol.bond_mut(bond).order = BondOrder::Aromatic;
            }
        }
    }
}

fn written_aromatic(mol: &Mol<Atom, Bond>, ring: &[NodeIndex]) -> bool {
    ring.iter().all(|&atom| mol.atom(atom).is_aromatic)
        && ring_pairs(ring).all(|(a, b)| ring_order(mol, a, b) == Some(BondOrder::Aromatic))
}

fn is_huckel_ring(mol: &Mol<Atom, Bond>, ring: &[NodeIndex]) -> bool {
    if ring_pairs(ring).any(|(a, b)| ring_order(mol, a, b) == Some(BondOrder::Triple)) {
        return false;
    }
    let pi: Option<u32> = (0..ring.len()).map(|pos| pi_electrons(mol, ring, pos)).sum();
    matches!(pi, Some(n) if n >= 2 && (n - 2) % 4 == 0)
}

/// Electrons the atom at `ring[pos]` gives to the ring's pi system, or
/// `None` when it cannot take part.
fn pi_electrons(mol: &Mol<Atom, Bond>, ring: &[NodeIndex], pos: usize) -> Option<u32> {
    let idx = ring[pos];
    let atom = mol.atom(idx);
    let double = mol
        .bonds_of(idx)
        .any(|bond| mol.bond(bond).order == BondOrder::Double);
    let prev = ring[(pos + ring.len() - 1) % ring.len()];
    let next = ring[(pos + 1) % ring.len()];
    let ring_double = [prev, next]
        .into_iter()
        .any(|other| ring_order(mol, idx, other) == Some(BondOrder::Double));
    // a trivalent pnictogen donates its lone pair
    let lone_pair = mol.degree(idx) + usize::from(atom.hydrogen_count) <= 3;

    match (atom.element, atom.formal_charge) {
        (Element::C, 0) => double.then_some(1),
        (Element::C, -1) => Some(2),
        (Element::C, 1) | (Element::B, _) => Some(u32::from(double)),
        (Element::N | Element::P | Element::As, 0) if double => Some(1),
        (Element::N | Element::P | Element::As, 0) => lone_pair.then_some(2),
        (Element::N, 1) => ring_double.then_some(1),
        (Element::O | Element::S | Element::Se | Element::Te, _) => Some(if ring_double { 1 } else { 2 }),
        _ => None,
    }
}

fn ring_order(mol: &Mol<Atom, Bond>, a: NodeIndex, b: NodeIndex) -> Option<BondOrder> {
    mol.bond_between(a, b).map(|bond| mol.bond(bond).order)
}
