use crate::element::Element;

/// Atom of a parsed compound.
///
/// Stores what a mapped reaction SMILES says about one atom. Atom-map
/// classes are not part of the atom; the parser returns them alongside the
/// molecule (see [`MappedMol`](crate::smiles::MappedMol)) because they only
/// mean something for the reaction currently being linked.
///
/// # Examples
///
/// ```
/// use atomflow::{Atom, Element};
///
/// let methyl = Atom {
///     element: Element::C,
///     hydrogen_count: 3,
///     ..Atom::default()
/// };
/// assert!(methyl.same_species(&methyl.clone()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: Element,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Hydrogens carried as a count rather than as graph nodes.
    pub hydrogen_count: u8,
    pub is_aromatic: bool,
}

impl Default for Atom {
    fn default() -> Self {
        Self {
            element: Element::Wildcard,
            formal_charge: 0,
            isotope: 0,
            hydrogen_count: 0,
            is_aromatic: false,
        }
    }
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            ..Self::default()
        }
    }

    /// Node predicate shared by repeat-compound matching and automorphism
    /// search: element, isotope, hydrogen count and charge must agree.
    /// Aromaticity is not compared; aromatic bonds differ by bond order.
    pub fn same_species(&self, other: &Atom) -> bool {
        self.element == other.element
            && self.isotope == other.isotope
            && self.hydrogen_count == other.hydrogen_count
            && self.formal_charge == other.formal_charge
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }
}
