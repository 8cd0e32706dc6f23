//! Network construction.
//!
//! [`NetworkBuilder`] is the build context: it owns the compound registry
//! and the network and consumes reactions strictly in stream order. Each
//! reaction registers its participants, collects a class-to-node table per
//! side, runs the hydrogen mapper when enabled and links the classes shared
//! by both sides. [`NetworkBuilder::finish`] resolves edge directedness.

mod hydrogens;
mod linker;

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

use petgraph::graph::NodeIndex;
use tracing::{debug, error, info, instrument, warn};

pub use hydrogens::{collect_hydrogens, map_hydrogens, HydrogenClass, HydrogenLinks, HydrogenTable};
pub use linker::link_reaction;

use crate::config::{BuildConfig, InconsistencyPolicy};
use crate::error::{BuildError, RegistryError};
use crate::io::PoolSet;
use crate::network::{CompoundId, Network, ReactionId};
use crate::reaction::{parse_triplet, RawTriplet, Reaction, Side, TripletReader};
use crate::registry::{CompoundRegistry, RegistryOptions};

/// What happened to one reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// The reaction was linked; `edges` reaction edges were created or
    /// extended.
    Linked { edges: usize },
    /// Both sides name the same compounds.
    Transport,
    /// The triplet could not be parsed.
    Malformed,
    /// A participant could not be mapped and the policy dropped the
    /// reaction.
    Inconsistent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub reactions_read: usize,
    pub reactions_linked: usize,
    pub transport_skipped: usize,
    pub malformed_skipped: usize,
    pub inconsistent_skipped: usize,
    /// Participants that did not match their registered structure.
    pub naming_inconsistencies: usize,
    pub compounds: usize,
    pub atoms: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reactions read, {} linked, {} transport, {} malformed, {} dropped; \
             {} naming inconsistencies; {} compounds with {} atoms",
            self.reactions_read,
            self.reactions_linked,
            self.transport_skipped,
            self.malformed_skipped,
            self.inconsistent_skipped,
            self.naming_inconsistencies,
            self.compounds,
            self.atoms,
        )
    }
}

/// A finished build.
#[derive(Debug, Clone)]
pub struct BuiltNetwork {
    pub network: Network,
    pub registry: CompoundRegistry,
    pub report: BuildReport,
}

/// How a side continues after a participant failed to register.
enum Recovery {
    /// Keep the registered compound; none of its atoms are mapped.
    Unmapped(CompoundId),
    /// The compound was never registered; leave it out of the side.
    Omitted,
    DropReaction,
}

/// Class table and hydrogens of one reaction side.
#[derive(Debug, Default)]
struct SideMapping {
    classes: HashMap<u32, NodeIndex>,
    hydrogens: HydrogenTable,
}

pub struct NetworkBuilder {
    config: BuildConfig,
    pools: PoolSet,
    registry: CompoundRegistry,
    network: Network,
    report: BuildReport,
}

impl NetworkBuilder {
    pub fn new(config: BuildConfig, pools: PoolSet) -> Self {
        Self {
            config,
            pools,
            registry: CompoundRegistry::new(),
            network: Network::new(),
            report: BuildReport::default(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn registry(&self) -> &CompoundRegistry {
        &self.registry
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Parses and adds one triplet. Malformed triplets are logged and
    /// skipped.
    pub fn add_triplet(&mut self, triplet: &RawTriplet) -> Result<ReactionOutcome, BuildError> {
        match parse_triplet(triplet) {
            Ok(reaction) => self.add_reaction(&reaction),
            Err(err) => {
                warn!(reaction = triplet.ordinal, error = %err, "skipping malformed reaction");
                self.report.reactions_read += 1;
                self.report.malformed_skipped += 1;
                Ok(ReactionOutcome::Malformed)
            }
        }
    }

    #[instrument(skip_all, fields(reaction = reaction.id))]
    pub fn add_reaction(&mut self, reaction: &Reaction) -> Result<ReactionOutcome, BuildError> {
        self.report.reactions_read += 1;
        info!(equation = %reaction.equation, mapped = %reaction.mapped, "next reaction");

        if self.config.skip_transport && reaction.is_transport() {
            debug!("transport reaction skipped");
            self.report.transport_skipped += 1;
            return Ok(ReactionOutcome::Transport);
        }

        debug!("parse educts");
        let Some(educts) = self.register_side(reaction, Side::Educt)? else {
            return Ok(self.drop_reaction(reaction.id));
        };
        debug!("parse products");
        let Some(products) = self.register_side(reaction, Side::Product)? else {
            return Ok(self.drop_reaction(reaction.id));
        };

        let reversible = reaction.is_reversible();
        if self.config.map_hydrogens {
            debug!("map hydrogens");
            map_hydrogens(
                &mut self.network,
                reaction.id,
                reversible,
                &educts.hydrogens,
                &products.hydrogens,
            );
        }

        let edges = link_reaction(
            &mut self.network,
            reaction.id,
            reversible,
            &educts.classes,
            &products.classes,
            &self.config.pool_suffixes,
        );
        self.report.reactions_linked += 1;
        Ok(ReactionOutcome::Linked { edges })
    }

    fn register_side(&mut self, reaction: &Reaction, side: Side) -> Result<Option<SideMapping>, BuildError> {
        let opts = RegistryOptions::from(&self.config);
        let mut mapping = SideMapping::default();

        for participant in reaction.participants(side) {
            let name = self
                .pools
                .rename(&participant.name, side, &self.config.pool_suffixes);
            let compound = match self.registry.register_or_reuse(
                &mut self.network,
                &name,
                &participant.smiles,
                &opts,
            ) {
                Ok(registration) => {
                    mapping.classes.extend(registration.classes);
                    registration.compound
                }
                Err(err) => match self.recover(reaction.id, err)? {
                    Recovery::Unmapped(id) => id,
                    Recovery::Omitted => continue,
                    Recovery::DropReaction => return Ok(None),
                },
            };

            if self.config.map_hydrogens {
                if let Some(compound) = self.registry.get(compound) {
                    collect_hydrogens(compound, &mapping.classes, &mut mapping.hydrogens);
                }
            }
        }
        Ok(Some(mapping))
    }

    /// Applies the inconsistency policy to a failed registration.
    fn recover(&mut self, reaction: ReactionId, err: RegistryError) -> Result<Recovery, BuildError> {
        if !err.is_recoverable() {
            return Err(BuildError::Registry { reaction, source: err });
        }
        error!(compound = err.compound_name(), error = %err, "participant left unmapped");
        self.report.naming_inconsistencies += 1;

        match self.config.on_inconsistency {
            InconsistencyPolicy::Abort => Err(BuildError::Registry { reaction, source: err }),
            InconsistencyPolicy::SkipReaction => Ok(Recovery::DropReaction),
            InconsistencyPolicy::LinkSubset => Ok(match self.registry.lookup(err.compound_name()) {
                Some(compound) => Recovery::Unmapped(compound.id),
                // failed its first registration: no atoms to continue with
                None => Recovery::Omitted,
            }),
        }
    }

    fn drop_reaction(&mut self, reaction: ReactionId) -> ReactionOutcome {
        warn!(reaction, "reaction dropped");
        self.report.inconsistent_skipped += 1;
        ReactionOutcome::Inconsistent
    }

    /// Resolves edge directedness and hands out the network.
    pub fn finish(mut self) -> BuiltNetwork {
        self.network.resolve_directedness();
        self.report.compounds = self.registry.len();
        self.report.atoms = self.registry.atom_count();
        info!(report = %self.report, "network built");
        BuiltNetwork {
            network: self.network,
            registry: self.registry,
            report: self.report,
        }
    }
}

/// Builds the network of every triplet in `reader`.
pub fn build<R: BufRead>(reader: R, config: &BuildConfig, pools: &PoolSet) -> Result<BuiltNetwork, BuildError> {
    let mut builder = NetworkBuilder::new(config.clone(), pools.clone());
    for triplet in TripletReader::new(reader) {
        builder.add_triplet(&triplet?)?;
    }
    Ok(builder.finish())
}
