//! Compound registry.
//!
//! The first occurrence of a compound name fixes its structure: the parsed
//! molecule is normalised, symmetry edges are derived from its
//! automorphisms and every atom becomes a network node. Later occurrences
//! of the same name are parsed independently and the registered structure
//! is embedded into them to find out which registered atom each atom-map
//! class refers to in the current reaction.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::aromaticity::perceive_aromaticity;
use crate::atom::Atom;
use crate::bond::Bond;
use crate::config::BuildConfig;
use crate::error::RegistryError;
use crate::hydrogen::{add_hs, remove_hs, strip_hydrogen_classes};
use crate::mol::Mol;
use crate::network::{AtnEdge, AtnNode, CompoundId, Network, NodeKey, Owner, TransitionType};
use crate::smiles::{parse_mapped, to_smiles, MappedMol};
use crate::substruct::find_monomorphism;
use crate::symmetry::{automorphisms, symmetry_pairs, SymmetryMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    pub map_hydrogens: bool,
    pub symmetry: SymmetryMode,
    pub step_limit: u64,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self::from(&BuildConfig::default())
    }
}

impl From<&BuildConfig> for RegistryOptions {
    fn from(config: &BuildConfig) -> Self {
        Self {
            map_hydrogens: config.map_hydrogens,
            symmetry: config.symmetry,
            step_limit: config.search_step_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compound {
    pub id: CompoundId,
    pub name: Arc<str>,
    /// Bracket SMILES of the registered structure, hydrogens as counts.
    pub smiles: String,
    /// Registered structure; carries explicit hydrogen atoms when hydrogen
    /// mapping is on.
    pub mol: Mol<Atom, Bond>,
    /// Network node of each atom of `mol`, by atom index.
    pub nodes: Vec<NodeIndex>,
}

impl Compound {
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id,
            name: Arc::clone(&self.name),
        }
    }

    /// Hydrogen atoms of the registered structure with their heavy
    /// neighbour, as network nodes.
    pub fn hydrogens(&self) -> impl Iterator<Item = (NodeIndex, Option<NodeIndex>)> + '_ {
        self.mol
            .atoms()
            .filter(|&idx| self.mol.atom(idx).is_hydrogen())
            .map(|idx| {
                let parent = self
                    .mol
                    .neighbors(idx)
                    .find(|&n| !self.mol.atom(n).is_hydrogen())
                    .map(|n| self.nodes[n.index()]);
                (self.nodes[idx.index()], parent)
            })
    }
}

/// Result of registering one reaction participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub compound: CompoundId,
    pub is_new: bool,
    /// Atom-map class to network node, for the mapped atoms of this
    /// occurrence.
    pub classes: HashMap<u32, NodeIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct CompoundRegistry {
    compounds: Vec<Compound>,
    by_name: HashMap<Arc<str>, CompoundId>,
}

impl CompoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    pub fn get(&self, id: CompoundId) -> Option<&Compound> {
        self.compounds.get(id.0)
    }

    pub fn lookup(&self, name: &str) -> Option<&Compound> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Compounds in id order.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> + '_ {
        self.compounds.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.compounds.iter().map(|c| c.nodes.len()).sum()
    }

    /// Registers `name` on first sight, or matches `smiles` against the
    /// registered structure otherwise.
    ///
    /// On error nothing is added to the registry or the network.
    pub fn register_or_reuse(
        &mut self,
        network: &mut Network,
        name: &str,
        smiles: &str,
        opts: &RegistryOptions,
    ) -> Result<Registration, RegistryError> {
        debug!(name, smiles, "parse participant");
        let fresh = normalize(name, smiles)?;

        match self.by_name.get(name).copied() {
            Some(id) => self.reuse(id, name, smiles, fresh, opts),
            None => self.register(network, name, fresh, opts),
        }
    }

    fn reuse(
        &self,
        id: CompoundId,
        name: &str,
        smiles: &str,
        fresh: MappedMol,
        opts: &RegistryOptions,
    ) -> Result<Registration, RegistryError> {
        debug!(name, compound = %id, "use existing compound");
        let Some(compound) = self.get(id) else {
            return Err(RegistryError::NamingInconsistency {
                name: name.to_string(),
                smiles: smiles.to_string(),
            });
        };

        let fresh = if opts.map_hydrogens {
            add_hs(&fresh)
        } else {
            fresh
        };

        let mapping = find_monomorphism(
            &fresh.mol,
            &compound.mol,
            |t: &Atom, q: &Atom| t.same_species(q),
            |t: &Bond, q: &Bond| t.order == q.order,
            opts.step_limit,
        )
        .map_err(|source| RegistryError::SearchExhausted {
            name: name.to_string(),
            source,
        })?
        .ok_or_else(|| RegistryError::NamingInconsistency {
            name: name.to_string(),
            smiles: smiles.to_string(),
        })?;

        let classes = mapping
            .into_iter()
            .filter_map(|(registered, occurrence)| {
                fresh
                    .class_of(occurrence)
                    .map(|class| (class, compound.nodes[registered.index()]))
            })
            .collect();

        Ok(Registration {
            compound: id,
            is_new: false,
            classes,
        })
    }

    fn register(
        &mut self,
        network: &mut Network,
        name: &str,
        folded: MappedMol,
        opts: &RegistryOptions,
    ) -> Result<Registration, RegistryError> {
        let perms = automorphisms(&folded.mol, opts.step_limit).map_err(|source| {
            RegistryError::SearchExhausted {
                name: name.to_string(),
                source,
            }
        })?;
        let pairs = symmetry_pairs(folded.mol.atom_count(), &perms, opts.symmetry);

        let id = CompoundId(self.compounds.len());
        let name: Arc<str> = Arc::from(name);
        let owner = Owner {
            id,
            name: Arc::clone(&name),
        };
        debug!(name = %name, compound = %id, symmetry_edges = pairs.len(), "add new compound");

        let smiles = to_smiles(&folded.mol);
        let structure = if opts.map_hydrogens {
            add_hs(&folded)
        } else {
            folded.clone()
        };

        let nodes: Vec<NodeIndex> = structure
            .mol
            .atoms()
            .map(|idx| {
                network.add_node(AtnNode::atom(
                    NodeKey::Atom {
                        compound: id,
                        index: idx.index(),
                    },
                    structure.mol.atom(idx).clone(),
                    owner.clone(),
                ))
            })
            .collect();

        for (a, b, bond) in structure.mol.bond_triples() {
            network.ensure_edge(nodes[a.index()], nodes[b.index()], TransitionType::ChemicalBond, || {
                AtnEdge::bond(bond.order, owner.clone())
            });
        }

        for (a, b) in pairs {
            network.ensure_edge(nodes[a], nodes[b], TransitionType::Symmetry, || {
                AtnEdge::symmetry(owner.clone())
            });
        }

        // heavy atoms keep their indices under hydrogen expansion
        let classes = folded
            .mapped_atoms()
            .map(|(idx, class)| (class, nodes[idx.index()]))
            .collect();

        self.by_name.insert(Arc::clone(&name), id);
        self.compounds.push(Compound {
            id,
            name,
            smiles,
            mol: structure.mol,
            nodes,
        });

        Ok(Registration {
            compound: id,
            is_new: true,
            classes,
        })
    }
}

fn normalize(name: &str, smiles: &str) -> Result<MappedMol, RegistryError> {
    let mut parsed = parse_mapped(smiles).map_err(|source| RegistryError::Smiles {
        name: name.to_string(),
        source,
    })?;
    strip_hydrogen_classes(&mut parsed);
    let mut folded = remove_hs(&parsed);
    perceive_aromaticity(&mut folded.mol);
    Ok(folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondOrder;
    use crate::error::SearchError;

    fn register(
        registry: &mut CompoundRegistry,
        network: &mut Network,
        name: &str,
        smiles: &str,
    ) -> Result<Registration, RegistryError> {
        registry.register_or_reuse(network, name, smiles, &RegistryOptions::default())
    }

    #[test]
    fn first_occurrence_creates_compound() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        let reg = register(&mut registry, &mut network, "etoh", "[CH3:1][CH2:2][OH:3]").unwrap();
        assert!(reg.is_new);
        assert_eq!(reg.compound, CompoundId(0));
        assert_eq!(reg.classes.len(), 3);
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.count_edges(TransitionType::ChemicalBond), 2);

        let compound = registry.lookup("etoh").unwrap();
        assert_eq!(compound.smiles, "[CH3][CH2][OH]");
        assert_eq!(
            network.node(reg.classes[&3]).key,
            NodeKey::Atom {
                compound: CompoundId(0),
                index: 2
            }
        );
    }

    #[test]
    fn repeat_occurrence_reuses_atoms() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        let first = register(&mut registry, &mut network, "etoh", "[CH3:1][CH2:2][OH:3]").unwrap();
        // same compound written from the other end with different classes
        let again = register(&mut registry, &mut network, "etoh", "[OH:7][CH2:8][CH3:9]").unwrap();
        assert!(!again.is_new);
        assert_eq!(again.compound, first.compound);
        assert_eq!(again.classes[&7], first.classes[&3]);
        assert_eq!(again.classes[&9], first.classes[&1]);
        assert_eq!(network.node_count(), 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn kekule_and_aromatic_spellings_agree() {
        let kekule = "[OH:1][C:2]1=[CH:3][CH:4]=[CH:5][CH:6]=[CH:7]1";
        let aromatic = "[OH:1][c:2]1[cH:3][cH:4][cH:5][cH:6][cH:7]1";
        for (first, second) in [(kekule, aromatic), (aromatic, kekule)] {
            let mut registry = CompoundRegistry::new();
            let mut network = Network::new();
            let reg = register(&mut registry, &mut network, "phenol", first).unwrap();
            let again = register(&mut registry, &mut network, "phenol", second).unwrap();
            assert!(!again.is_new);
            assert_eq!(again.classes.len(), 7);
            assert_eq!(again.classes[&1], reg.classes[&1]);
            assert_eq!(again.classes[&2], reg.classes[&2]);
            assert_eq!(network.node_count(), 7);

            let phenol = registry.lookup("phenol").unwrap();
            let ring_bonds = phenol
                .mol
                .bond_triples()
                .filter(|(_, _, b)| b.order == BondOrder::Aromatic)
                .count();
            assert_eq!(ring_bonds, 6);
        }
    }

    #[test]
    fn explicit_and_implicit_hydrogens_agree() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        register(&mut registry, &mut network, "meoh", "[CH3:1][OH:2]").unwrap();
        let again = register(
            &mut registry,
            &mut network,
            "meoh",
            "[H:5][C:1]([H])([H])[O:2][H]",
        )
        .unwrap();
        assert_eq!(again.classes.len(), 2);
    }

    #[test]
    fn mismatching_structure_is_naming_inconsistency() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        register(&mut registry, &mut network, "x", "CCO").unwrap();
        let err = register(&mut registry, &mut network, "x", "CCN").unwrap_err();
        assert!(matches!(err, RegistryError::NamingInconsistency { .. }));
        assert!(err.is_recoverable());
        assert_eq!(network.node_count(), 3);
    }

    #[test]
    fn bad_smiles_registers_nothing() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        let err = register(&mut registry, &mut network, "bad", "C1CC").unwrap_err();
        assert!(matches!(err, RegistryError::Smiles { .. }));
        assert!(registry.is_empty());
        assert_eq!(network.node_count(), 0);
    }

    #[test]
    fn symmetry_edges_within_new_compound() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        register(&mut registry, &mut network, "acetate", "CC([O-])[O-]").unwrap();
        assert_eq!(network.count_edges(TransitionType::Symmetry), 1);
    }

    #[test]
    fn compound_ids_are_dense() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        register(&mut registry, &mut network, "a", "C").unwrap();
        register(&mut registry, &mut network, "b", "O").unwrap();
        register(&mut registry, &mut network, "a", "C").unwrap();
        let ids: Vec<_> = registry.compounds().map(|c| c.id).collect();
        assert_eq!(ids, vec![CompoundId(0), CompoundId(1)]);
        assert_eq!(
            network.node(registry.lookup("b").unwrap().nodes[0]).key.to_string(),
            "1_0"
        );
    }

    #[test]
    fn hydrogen_expansion_adds_namespaced_atoms() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        let opts = RegistryOptions {
            map_hydrogens: true,
            ..RegistryOptions::default()
        };
        registry
            .register_or_reuse(&mut network, "meoh", "[CH3:1][OH:2]", &opts)
            .unwrap();
        let compound = registry.lookup("meoh").unwrap();
        assert_eq!(compound.nodes.len(), 6);
        assert_eq!(compound.hydrogens().count(), 4);
        assert_eq!(compound.smiles, "[CH3][OH]");
        assert_eq!(network.node(compound.nodes[5]).key.to_string(), "0_5");
        // symmetry is computed before the hydrogens are expanded
        assert_eq!(network.count_edges(TransitionType::Symmetry), 0);
        let carbon = compound.nodes[0];

        let again = registry
            .register_or_reuse(&mut network, "meoh", "[OH:4][CH3:3]", &opts)
            .unwrap();
        assert_eq!(again.classes[&3], carbon);
    }

    #[test]
    fn search_budget_exhaustion_is_reported() {
        let mut registry = CompoundRegistry::new();
        let mut network = Network::new();
        let opts = RegistryOptions {
            step_limit: 2,
            ..RegistryOptions::default()
        };
        let err = registry
            .register_or_reuse(&mut network, "benzene", "c1ccccc1", &opts)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::SearchExhausted {
                name: "benzene".into(),
                source: SearchError::BudgetExhausted { limit: 2 },
            }
        );
        assert!(registry.is_empty());
    }
}
