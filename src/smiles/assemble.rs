use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};
use crate::smiles::MappedMol;

/// Turns a token stream into a molecule in one pass, then fills in the
/// implicit hydrogens of organic-subset atoms.
pub(super) fn assemble(tokens: &[Token]) -> Result<MappedMol, SmilesError> {
    let mut assembler = Assembler::default();
    for token in tokens {
        assembler.feed(token)?;
    }
    assembler.finish()
}

#[derive(Default)]
struct Assembler {
    mol: Mol<Atom, Bond>,
    classes: Vec<Option<u32>>,
    written_h: Vec<Option<u8>>,
    /// Branch points with the position of their `(`.
    branches: Vec<(NodeIndex, usize)>,
    current: Option<NodeIndex>,
    pending: Option<BondToken>,
    open_rings: BTreeMap<u16, (NodeIndex, Option<BondToken>)>,
}

impl Assembler {
    fn feed(&mut self, token: &Token) -> Result<(), SmilesError> {
        match token {
            Token::Atom(tok) => self.push_atom(tok),
            Token::Bond(bond) => self.pending = Some(*bond),
            Token::RingClosure { bond, digit, pos } => self.ring(*digit, *bond, *pos)?,
            Token::OpenParen(pos) => {
                let at = self.current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                self.branches.push((at, *pos));
            }
            Token::CloseParen(pos) => {
                let (at, _) = self
                    .branches
                    .pop()
                    .ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                self.current = Some(at);
                self.pending = None;
            }
            Token::Dot(_) => {
                self.current = None;
                self.pending = None;
            }
        }
        Ok(())
    }

    fn push_atom(&mut self, tok: &AtomToken) {
        let idx = self.mol.add_atom(Atom {
            element: tok.element,
            formal_charge: tok.charge,
            isotope: tok.isotope,
            hydrogen_count: 0,
            is_aromatic: tok.is_aromatic,
        });
        self.classes.push(tok.atom_class);
        self.written_h.push(tok.hcount);

        let bond = self.pending.take();
        if let Some(prev) = self.current {
            self.link(prev, idx, bond);
        }
        self.current = Some(idx);
    }

    fn ring(&mut self, digit: u16, bond: Option<BondToken>, pos: usize) -> Result<(), SmilesError> {
        let here = self
            .current
            .ok_or(SmilesError::InvalidRingBond { digit, pos })?;
        let written = bond.or(self.pending.take());

        let Some((there, first)) = self.open_rings.remove(&digit) else {
            self.open_rings.insert(digit, (here, written));
            return Ok(());
        };

        let bond = match (first, written) {
            (Some(a), Some(b)) if a != b => return Err(SmilesError::RingBondConflict { digit }),
            (a, b) => a.or(b),
        };
        if there == here {
            return Err(SmilesError::SelfBond { digit });
        }
        if self.mol.bond_between(there, here).is_some() {
            return Err(SmilesError::DuplicateBond {
                a: there.index(),
                b: here.index(),
            });
        }
        self.link(there, here, bond);
        Ok(())
    }

    fn link(&mut self, a: NodeIndex, b: NodeIndex, bond: Option<BondToken>) {
        let order = match bond {
            Some(BondToken::Single) => BondOrder::Single,
            Some(BondToken::Double) => BondOrder::Double,
            Some(BondToken::Triple) => BondOrder::Triple,
            Some(BondToken::Quadruple) => BondOrder::Quadruple,
            Some(BondToken::Aromatic) => BondOrder::Aromatic,
            // an unwritten bond between two aromatic atoms is aromatic
            None if self.mol.atom(a).is_aromatic && self.mol.atom(b).is_aromatic => {
                BondOrder::Aromatic
            }
            None => BondOrder::Single,
        };
        self.mol.add_bond(a, b, Bond::new(order));
    }

    fn finish(mut self) -> Result<MappedMol, SmilesError> {
        if let Some(&(_, pos)) = self.branches.last() {
            return Err(SmilesError::UnmatchedParen { pos });
        }
        if let Some(&digit) = self.open_rings.keys().next() {
            return Err(SmilesError::UnclosedRing { digit });
        }

        let counts: Vec<u8> = self
            .mol
            .atoms()
            .map(|idx| {
                self.written_h[idx.index()].unwrap_or_else(|| implicit_hydrogens(&self.mol, idx))
            })
            .collect();
        for (i, count) in counts.into_iter().enumerate() {
            self.mol.atom_mut(NodeIndex::new(i)).hydrogen_count = count;
        }

        Ok(MappedMol {
            mol: self.mol,
            classes: self.classes,
        })
    }
}

/// Lowest default valence that covers the bonds already drawn, minus those
/// bonds; aromatic atoms give one up to the pi system.
fn implicit_hydrogens(mol: &Mol<Atom, Bond>, idx: NodeIndex) -> u8 {
    let atom = mol.atom(idx);
    let used = mol
        .bonds_of(idx)
        .map(|e| mol.bond(e).order.valence_contribution())
        .fold(0u8, u8::saturating_add);
    let Some(valence) = atom
        .element
        .default_valences()
        .iter()
        .copied()
        .find(|&v| v >= used)
    else {
        return 0;
    };
    let free = valence - used;
    if atom.is_aromatic {
        free.saturating_sub(1)
    } else {
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::tokenizer::tokenize;

    fn run(s: &str) -> Result<MappedMol, SmilesError> {
        assemble(&tokenize(s).unwrap())
    }

    fn hydrogens(m: &MappedMol) -> Vec<u8> {
        m.mol.atoms().map(|i| m.mol.atom(i).hydrogen_count).collect()
    }

    #[test]
    fn chain_and_branch() {
        let m = run("CC(C)C").unwrap();
        assert_eq!(m.mol.bond_count(), 3);
        assert_eq!(m.mol.degree(NodeIndex::new(1)), 3);
        assert_eq!(hydrogens(&m), vec![3, 1, 3, 3]);
    }

    #[test]
    fn ring_bond_order_written_at_either_end() {
        for s in ["C=1CC1", "C1CC=1"] {
            let m = run(s).unwrap();
            let bond = m.mol.bond_between(NodeIndex::new(0), NodeIndex::new(2)).unwrap();
            assert_eq!(m.mol.bond(bond).order, BondOrder::Double, "{s}");
        }
    }

    #[test]
    fn implicit_hydrogens_follow_valence() {
        assert_eq!(hydrogens(&run("C=C").unwrap()), vec![2, 2]);
        // sulfur with four bond orders settles on valence 4
        assert_eq!(hydrogens(&run("CS(=O)C").unwrap())[1], 0);
        assert_eq!(hydrogens(&run("c1ccccc1").unwrap()), vec![1; 6]);
        assert_eq!(hydrogens(&run("*C").unwrap())[0], 0);
        assert_eq!(hydrogens(&run("[CH4].[C]").unwrap()), vec![4, 0]);
    }

    #[test]
    fn aromatic_neighbors_get_aromatic_bonds() {
        let m = run("c1ccccc1C").unwrap();
        let aromatic = m
            .mol
            .bond_triples()
            .filter(|(_, _, b)| b.order == BondOrder::Aromatic)
            .count();
        assert_eq!(aromatic, 6);
    }

    #[test]
    fn classes_follow_atom_order() {
        let m = run("[CH3:1][OH:2].[Na+]").unwrap();
        assert_eq!(m.classes, vec![Some(1), Some(2), None]);
        assert_eq!(m.mol.bond_count(), 1);
    }

    #[test]
    fn malformed_rings() {
        assert!(matches!(run("C=1CC#1"), Err(SmilesError::RingBondConflict { digit: 1 })));
        assert!(matches!(run("C1C1"), Err(SmilesError::DuplicateBond { a: 0, b: 1 })));
        assert!(matches!(run("C11"), Err(SmilesError::SelfBond { digit: 1 })));
        assert!(matches!(run("C1CC"), Err(SmilesError::UnclosedRing { digit: 1 })));
        assert!(matches!(run("1C"), Err(SmilesError::InvalidRingBond { digit: 1, pos: 0 })));
    }

    #[test]
    fn unbalanced_branches() {
        assert!(matches!(run("C(C"), Err(SmilesError::UnmatchedParen { pos: 1 })));
        assert!(matches!(run("C)C"), Err(SmilesError::UnmatchedParen { pos: 1 })));
        assert!(matches!(run("(C)"), Err(SmilesError::UnmatchedParen { pos: 0 })));
    }
}
