//! Graph symmetry of a compound.
//!
//! Automorphisms use the same atom predicate as repeat-compound matching
//! ([`Atom::same_species`]) and require equal bond orders. Each
//! automorphism is a permutation `p` with `p[i]` the image of atom `i`.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::error::SearchError;
use crate::mol::Mol;
use crate::substruct::find_all_monomorphisms;

/// How symmetry edges are derived from the automorphism group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymmetryMode {
    /// One star per orbit: the lowest-index member is linked to every other
    /// member.
    #[default]
    Orbit,
    /// Every `(i, p(i))` pair of every automorphism, deduplicated.
    Full,
}

/// All automorphisms of `mol`, the identity included.
#[instrument(skip_all, fields(atoms = mol.atom_count()))]
pub fn automorphisms(mol: &Mol<Atom, Bond>, step_limit: u64) -> Result<Vec<Vec<usize>>, SearchError> {
    let mappings = find_all_monomorphisms(
        mol,
        mol,
        |t: &Atom, q: &Atom| t.same_species(q),
        |t: &Bond, q: &Bond| t.order == q.order,
        step_limit,
    )?;

    // same atom and bond counts: every monomorphism is an automorphism
    let perms: Vec<Vec<usize>> = mappings
        .into_iter()
        .map(|mapping| {
            let mut perm = vec![0; mol.atom_count()];
            for (q, t) in mapping {
                perm[q.index()] = t.index();
            }
            perm
        })
        .collect();
    debug!(count = perms.len(), "automorphisms enumerated");
    Ok(perms)
}

/// Disjoint-set over atom indices, merged along automorphism images.
#[derive(Debug, Clone)]
pub struct OrbitSet {
    parent: Vec<usize>,
}

impl OrbitSet {
    pub fn new(n: usize) -> Self {
        OrbitSet {
            parent: (0..n).collect(),
        }
    }

    pub fn from_permutations(n: usize, perms: &[Vec<usize>]) -> Self {
        let mut set = OrbitSet::new(n);
        for perm in perms {
            for (i, &image) in perm.iter().enumerate() {
                set.union(i, image);
            }
        }
        set
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] == x {
            x
        } else {
            let p = self.parent[x];
            let r = self.find(p);
            self.parent[x] = r;
            r
        }
    }

    // the smaller root wins so every orbit is represented by its lowest index
    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx < ry {
            self.parent[ry] = rx;
        } else if ry < rx {
            self.parent[rx] = ry;
        }
    }

    pub fn same_orbit(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    pub fn representative(&mut self, x: usize) -> usize {
        self.find(x)
    }

    /// Orbits with more than one member, each sorted, ordered by their
    /// representative.
    pub fn nontrivial_orbits(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            let root = self.find(i);
            members[root].push(i);
        }
        members.retain(|m| m.len() > 1);
        members
    }
}

/// Atom pairs to connect with symmetry edges, each `(low, high)`.
pub fn symmetry_pairs(n: usize, perms: &[Vec<usize>], mode: SymmetryMode) -> Vec<(usize, usize)> {
    match mode {
        SymmetryMode::Orbit => OrbitSet::from_permutations(n, perms)
            .nontrivial_orbits()
            .into_iter()
            .flat_map(|orbit| {
                let rep = orbit[0];
                orbit.into_iter().skip(1).map(move |other| (rep, other))
            })
            .collect(),
        SymmetryMode::Full => {
            let mut pairs = Vec::new();
            let mut seen = std::collections::HashSet::new();
            for perm in perms {
                for (i, &image) in perm.iter().enumerate() {
                    if i == image {
                        continue;
                    }
                    let pair = (i.min(image), i.max(image));
                    if seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
            pairs
        }
    }
}
