use std::fmt;
use std::str::FromStr;

use crate::bond::BondOrder;
use crate::network::node::{Owner, ReactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransitionType {
    ChemicalBond,
    Symmetry,
    Reaction,
    HydrogenGroup,
    HydrogenReaction,
    HydrogenFreedReaction,
}

impl TransitionType {
    pub const ALL: [TransitionType; 6] = [
        TransitionType::ChemicalBond,
        TransitionType::Symmetry,
        TransitionType::Reaction,
        TransitionType::HydrogenGroup,
        TransitionType::HydrogenReaction,
        TransitionType::HydrogenFreedReaction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionType::ChemicalBond => "ChemicalBond",
            TransitionType::Symmetry => "Symmetry",
            TransitionType::Reaction => "Reaction",
            TransitionType::HydrogenGroup => "HydrogenGroup",
            TransitionType::HydrogenReaction => "HydrogenReaction",
            TransitionType::HydrogenFreedReaction => "HydrogenFreedReaction",
        }
    }

    /// Edge types whose directedness follows the recorded reaction
    /// directions once all reactions are linked.
    pub fn resolves_from_contributions(self) -> bool {
        matches!(
            self,
            TransitionType::Reaction | TransitionType::HydrogenReaction
        )
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransitionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown transition type '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Directedness {
    #[default]
    Undirected,
    Bidirected,
    Directed,
}

/// Orientation relative to an edge's stored `(source, target)` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Reaction ids per traversal direction of one edge. A direction key exists
/// once at least one id has been recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contributions {
    forward: Vec<ReactionId>,
    backward: Vec<ReactionId>,
}

impl Contributions {
    pub fn add(&mut self, direction: Direction, reaction: ReactionId) {
        let ids = match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        };
        if !ids.contains(&reaction) {
            ids.push(reaction);
        }
    }

    pub fn get(&self, direction: Direction) -> &[ReactionId] {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    /// Directions that carry at least one reaction id.
    pub fn keys(&self) -> impl Iterator<Item = Direction> + '_ {
        [Direction::Forward, Direction::Backward]
            .into_iter()
            .filter(|d| !self.get(*d).is_empty())
    }

    pub fn key_count(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.key_count() == 0
    }

    /// Comma-joined ids for one direction, `None` if the key is absent.
    pub fn joined(&self, direction: Direction) -> Option<String> {
        let ids = self.get(direction);
        if ids.is_empty() {
            return None;
        }
        Some(
            ids.iter()
                .map(ReactionId::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtnEdge {
    pub transition: TransitionType,
    pub directedness: Directedness,
    /// Bond order, chemical bonds only.
    pub order: Option<BondOrder>,
    /// Owning compound for intra-compound edges.
    pub owner: Option<Owner>,
    /// Hydrogen surplus of the class that produced a freed-hydrogen edge.
    pub moving_atoms: Option<u32>,
    pub contributions: Contributions,
}

impl AtnEdge {
    pub fn new(transition: TransitionType) -> Self {
        Self {
            transition,
            directedness: Directedness::Undirected,
            order: None,
            owner: None,
            moving_atoms: None,
            contributions: Contributions::default(),
        }
    }

    pub fn bond(order: BondOrder, owner: Owner) -> Self {
        Self {
            order: Some(order),
            owner: Some(owner),
            ..Self::new(TransitionType::ChemicalBond)
        }
    }

    pub fn symmetry(owner: Owner) -> Self {
        Self {
            owner: Some(owner),
            ..Self::new(TransitionType::Symmetry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_names_round_trip() {
        for t in TransitionType::ALL {
            assert_eq!(t.as_str().parse::<TransitionType>(), Ok(t));
        }
        assert!("Bond".parse::<TransitionType>().is_err());
    }

    #[test]
    fn contributions_are_sets_per_direction() {
        let mut c = Contributions::default();
        assert!(c.is_empty());
        c.add(Direction::Forward, 3);
        c.add(Direction::Forward, 5);
        c.add(Direction::Forward, 3);
        assert_eq!(c.get(Direction::Forward), &[3, 5]);
        assert_eq!(c.key_count(), 1);
        assert_eq!(c.joined(Direction::Forward).as_deref(), Some("3,5"));
        assert_eq!(c.joined(Direction::Backward), None);

        c.add(Direction::Backward, 5);
        assert_eq!(c.key_count(), 2);
    }
}
