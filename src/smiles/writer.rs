use std::fmt::Write;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;

/// Writes a SMILES string with every atom in brackets and its hydrogen count
/// spelled out, so the string re-parses to the same hydrogen counts without
/// relying on default valences. Traversal follows atom order; atom-map
/// classes are never written.
pub fn to_smiles(mol: &Mol<Atom, Bond>) -> String {
    let mut layout = Layout::new(mol);
    let mut fragments = Vec::new();
    for root in mol.atoms() {
        if !layout.seen[root.index()] {
            layout.walk(root);
            let mut text = String::new();
            layout.emit(root, &mut text);
            fragments.push(text);
        }
    }
    fragments.join(".")
}

struct RingBond {
    label: usize,
    order: BondOrder,
    partner: NodeIndex,
}

/// Depth-first spanning tree of one molecule; bonds outside the tree become
/// numbered ring closures on both endpoints.
struct Layout<'a> {
    mol: &'a Mol<Atom, Bond>,
    seen: Vec<bool>,
    bond_used: Vec<bool>,
    children: Vec<Vec<(NodeIndex, BondOrder)>>,
    rings: Vec<Vec<RingBond>>,
    next_label: usize,
}

impl<'a> Layout<'a> {
    fn new(mol: &'a Mol<Atom, Bond>) -> Self {
        let n = mol.atom_count();
        Self {
            mol,
            seen: vec![false; n],
            bond_used: vec![false; mol.bond_count()],
            children: (0..n).map(|_| Vec::new()).collect(),
            rings: (0..n).map(|_| Vec::new()).collect(),
            next_label: 1,
        }
    }

    fn walk(&mut self, node: NodeIndex) {
        self.seen[node.index()] = true;

        let mut bonds: Vec<_> = self
            .mol
            .graph()
            .edges(node)
            .map(|e| (e.target(), e.id(), e.weight().order))
            .collect();
        bonds.sort_by_key(|&(other, _, _)| other);

        for (other, bond, order) in bonds {
            if std::mem::replace(&mut self.bond_used[bond.index()], true) {
                continue;
            }
            if self.seen[other.index()] {
                let label = self.next_label;
                self.next_label += 1;
                self.rings[other.index()].push(RingBond { label, order, partner: node });
                self.rings[node.index()].push(RingBond { label, order, partner: other });
            } else {
                self.children[node.index()].push((other, order));
                self.walk(other);
            }
        }
    }

    fn emit(&self, node: NodeIndex, out: &mut String) {
        write_atom(self.mol.atom(node), out);
        for ring in &self.rings[node.index()] {
            self.write_bond(ring.order, node, ring.partner, out);
            write_label(ring.label, out);
        }

        let children = &self.children[node.index()];
        for (i, &(child, order)) in children.iter().enumerate() {
            let branch = i + 1 < children.len();
            if branch {
                out.push('(');
            }
            self.write_bond(order, node, child, out);
            self.emit(child, out);
            if branch {
                out.push(')');
            }
        }
    }

    fn write_bond(&self, order: BondOrder, a: NodeIndex, b: NodeIndex, out: &mut String) {
        let aromatic_pair = self.mol.atom(a).is_aromatic && self.mol.atom(b).is_aromatic;
        let symbol = match order {
            BondOrder::Single if aromatic_pair => Some('-'),
            BondOrder::Aromatic if !aromatic_pair => Some(':'),
            BondOrder::Single | BondOrder::Aromatic => None,
            BondOrder::Double => Some('='),
            BondOrder::Triple => Some('#'),
            BondOrder::Quadruple => Some('$'),
        };
        out.extend(symbol);
    }
}

fn write_label(label: usize, out: &mut String) {
    let _ = match label {
        0..=9 => write!(out, "{label}"),
        10..=99 => write!(out, "%{label}"),
        _ => write!(out, "%({label})"),
    };
}

fn write_atom(atom: &Atom, out: &mut String) {
    let symbol = atom.element.symbol();
    out.push('[');
    if atom.isotope != 0 {
        let _ = write!(out, "{}", atom.isotope);
    }
    if atom.is_aromatic {
        out.push_str(&symbol.to_ascii_lowercase());
    } else {
        out.push_str(symbol);
    }
    match atom.hydrogen_count {
        0 => {}
        1 => out.push('H'),
        n => {
            let _ = write!(out, "H{n}");
        }
    }
    match atom.formal_charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c => {
            let _ = write!(out, "{c:+}");
        }
    }
    out.push(']');
}
