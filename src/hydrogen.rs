use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Mol;
use crate::smiles::MappedMol;

/// Drops atom-map classes from hydrogen atoms. Reaction mappers do not
/// assign meaningful classes to hydrogens.
pub fn strip_hydrogen_classes(mapped: &mut MappedMol) {
    for idx in mapped.mol.atoms() {
        if mapped.mol.atom(idx).is_hydrogen() {
            if let Some(class) = mapped.classes.get_mut(idx.index()) {
                *class = None;
            }
        }
    }
}

/// Expands every hydrogen count into explicit hydrogen atoms.
///
/// Existing atoms keep their indices and classes; the new hydrogens are
/// appended after them, grouped by parent in atom order, and carry no class.
pub fn add_hs(mapped: &MappedMol) -> MappedMol {
    let mol = &mapped.mol;
    let mut result = Mol::new();

    for idx in mol.atoms() {
        result.add_atom(Atom {
            hydrogen_count: 0,
            ..mol.atom(idx).clone()
        });
    }

    for (a, b, bond) in mol.bond_triples() {
        result.add_bond(a, b, bond.clone());
    }

    let mut classes = mapped.classes.clone();
    classes.resize(mol.atom_count(), None);

    for parent in mol.atoms() {
        for _ in 0..mol.atom(parent).hydrogen_count {
            let h = result.add_atom(Atom::new(Element::H));
            result.add_bond(parent, h, Bond::new(BondOrder::Single));
            classes.push(None);
        }
    }

    MappedMol {
        mol: result,
        classes,
    }
}

/// Folds simple explicit hydrogens into their neighbour's hydrogen count.
///
/// A hydrogen is simple when it has no charge, no isotope label and exactly
/// one neighbour, which is not itself a hydrogen. Surviving atoms keep their
/// relative order and classes.
pub fn remove_hs(mapped: &MappedMol) -> MappedMol {
    let mol = &mapped.mol;
    let node_count = mol.atom_count();

    let mut removable = vec![false; node_count];
    let mut extra_h: Vec<u8> = vec![0; node_count];

    for idx in mol.atoms() {
        if let Some(parent) = simple_hydrogen_parent(mol, idx) {
            removable[idx.index()] = true;
            extra_h[parent.index()] = extra_h[parent.index()].saturating_add(1);
        }
    }

    let mut result = Mol::new();
    let mut classes = Vec::with_capacity(node_count);
    let mut index_map: Vec<Option<NodeIndex>> = vec![None; node_count];

    for idx in mol.atoms() {
        if removable[idx.index()] {
            continue;
        }
        let atom = mol.atom(idx);
        let new_idx = result.add_atom(Atom {
            hydrogen_count: atom.hydrogen_count.saturating_add(extra_h[idx.index()]),
            ..atom.clone()
        });
        index_map[idx.index()] = Some(new_idx);
        classes.push(mapped.class_of(idx));
    }

    for (a, b, bond) in mol.bond_triples() {
        if let (Some(new_a), Some(new_b)) = (index_map[a.index()], index_map[b.index()]) {
            result.add_bond(new_a, new_b, bond.clone());
        }
    }

    MappedMol {
        mol: result,
        classes,
    }
}

fn simple_hydrogen_parent(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> Option<NodeIndex> {
    let atom = mol.atom(idx);
    if !atom.is_hydrogen() || atom.isotope != 0 || atom.formal_charge != 0 {
        return None;
    }
    let mut neighbors = mol.neighbors(idx);
    let parent = neighbors.next()?;
    if neighbors.next().is_some() || mol.atom(parent).is_hydrogen() {
        return None;
    }
    Some(parent)
}
