use tracing::warn;

use super::error::ReactionParseError;
use super::reader::RawTriplet;
use super::{Participant, Reaction, ReactionMeta, Side};
use crate::smiles::strip_stereo;

const REVERSIBILITY_FIELD: usize = 6;
const SOURCE_ID_FIELD: usize = 2;
const XREF_ID_FIELD: usize = 4;
const EC_TOKEN: &str = "ECs:";

pub fn parse_triplet(triplet: &RawTriplet) -> Result<Reaction, ReactionParseError> {
    let meta = parse_meta(&triplet.meta)?;
    let (educt_names, product_names) = split_equation(&triplet.equation)?;

    let mapped = strip_stereo(triplet.mapped.trim());
    let (left, right) = mapped
        .split_once(">>")
        .ok_or(ReactionParseError::MissingArrow)?;
    let educt_smiles = split_components(left, Side::Educt)?;
    let product_smiles = split_components(right, Side::Product)?;

    let educts = pair_up(triplet.ordinal, Side::Educt, &educt_names, &educt_smiles);
    let products = pair_up(triplet.ordinal, Side::Product, &product_names, &product_smiles);

    Ok(Reaction {
        id: triplet.ordinal,
        meta,
        equation: triplet.equation.trim().to_string(),
        mapped,
        educt_names,
        product_names,
        educts,
        products,
    })
}

pub(crate) fn parse_meta(line: &str) -> Result<ReactionMeta, ReactionParseError> {
    let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();

    let reversible = match fields.get(REVERSIBILITY_FIELD).map(String::as_str) {
        Some("True") => true,
        Some("False") => false,
        Some(token) => {
            return Err(ReactionParseError::InvalidReversibility {
                token: token.to_string(),
            })
        }
        None => {
            return Err(ReactionParseError::MissingReversibility {
                fields: fields.len(),
            })
        }
    };

    let identifier = |i: usize| {
        fields
            .get(i)
            .filter(|f| f.as_str() != "-")
            .cloned()
    };
    let source_id = identifier(SOURCE_ID_FIELD);
    let xref_id = identifier(XREF_ID_FIELD);

    let ec_codes = fields
        .iter()
        .position(|f| f == EC_TOKEN)
        .and_then(|i| fields.get(i + 1))
        .map(|codes| {
            codes
                .split(';')
                .map(str::trim)
                .filter(|c| !c.is_empty() && *c != "-")
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(ReactionMeta {
        fields,
        reversible,
        source_id,
        xref_id,
        ec_codes,
    })
}

/// Splits `A + B = C` at the standalone `=` into trimmed name lists.
pub(crate) fn split_equation(line: &str) -> Result<(Vec<String>, Vec<String>), ReactionParseError> {
    let padded = format!(" {} ", line.trim());
    let (left, right) = padded
        .split_once(" = ")
        .ok_or(ReactionParseError::MissingEquationSeparator)?;
    Ok((
        split_names(left, Side::Educt)?,
        split_names(right, Side::Product)?,
    ))
}

fn split_names(text: &str, side: Side) -> Result<Vec<String>, ReactionParseError> {
    let padded = format!(" {} ", text.trim());
    let names: Vec<String> = padded
        .split(" + ")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(ReactionParseError::EmptySide { side });
    }
    Ok(names)
}

fn split_components(text: &str, side: Side) -> Result<Vec<String>, ReactionParseError> {
    let components: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if components.is_empty() {
        return Err(ReactionParseError::EmptySide { side });
    }
    Ok(components)
}

fn pair_up(ordinal: usize, side: Side, names: &[String], smiles: &[String]) -> Vec<Participant> {
    if names.len() != smiles.len() {
        warn!(
            reaction = ordinal,
            %side,
            names = names.len(),
            smiles = smiles.len(),
            "name and SMILES counts differ, surplus entries ignored"
        );
    }
    names
        .iter()
        .zip(smiles)
        .map(|(name, smiles)| Participant {
            name: name.clone(),
            smiles: smiles.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triplet(meta: &str, equation: &str, mapped: &str) -> RawTriplet {
        RawTriplet {
            ordinal: 3,
            meta: meta.to_string(),
            equation: equation.to_string(),
            mapped: mapped.to_string(),
        }
    }

    #[test]
    fn metadata_fields() {
        let meta = parse_meta("Bigg ID: PGI MetaNetXId: MNXR1 Reversible: True ECs: 5.3.1.9;5.3.1.-").unwrap();
        assert!(meta.reversible);
        assert_eq!(meta.source_id.as_deref(), Some("PGI"));
        assert_eq!(meta.xref_id.as_deref(), Some("MNXR1"));
        assert_eq!(meta.ec_codes, vec!["5.3.1.9", "5.3.1.-"]);
    }

    #[test]
    fn metadata_placeholders() {
        let meta = parse_meta("Bigg ID: EX MetaNetXId: - Reversible: False ECs: -").unwrap();
        assert!(!meta.reversible);
        assert_eq!(meta.xref_id, None);
        assert!(meta.ec_codes.is_empty());
    }

    #[test]
    fn metadata_errors() {
        assert_eq!(
            parse_meta("Bigg ID: X"),
            Err(ReactionParseError::MissingReversibility { fields: 3 })
        );
        assert_eq!(
            parse_meta("a b c d e f yes"),
            Err(ReactionParseError::InvalidReversibility {
                token: "yes".to_string()
            })
        );
    }

    #[test]
    fn equation_split() {
        let (left, right) = split_equation("glc__D_c + atp_c = g6p_c + adp_c + h_c").unwrap();
        assert_eq!(left, vec!["glc__D_c", "atp_c"]);
        assert_eq!(right, vec!["g6p_c", "adp_c", "h_c"]);
    }

    #[test]
    fn equation_needs_standalone_separator() {
        assert_eq!(
            split_equation("A + B"),
            Err(ReactionParseError::MissingEquationSeparator)
        );
        // '=' inside a name is not a separator
        assert_eq!(
            split_equation("A=B"),
            Err(ReactionParseError::MissingEquationSeparator)
        );
        assert_eq!(
            split_equation("A = "),
            Err(ReactionParseError::EmptySide { side: Side::Product })
        );
        assert_eq!(
            split_equation("= B"),
            Err(ReactionParseError::EmptySide { side: Side::Educt })
        );
    }

    #[test]
    fn full_triplet() {
        let reaction = parse_triplet(&triplet(
            "Bigg ID: R MetaNetXId: M Reversible: False",
            "A + B = C",
            "[CH3:1][OH:2].[OH2:3]>>[C@@H3:1]/[OH:2].[OH2:3]",
        ))
        .unwrap();
        assert_eq!(reaction.id, 3);
        assert_eq!(reaction.educts.len(), 2);
        assert_eq!(reaction.educts[1].smiles, "[OH2:3]");
        // one name, two components: the second component is dropped
        assert_eq!(reaction.products.len(), 1);
        assert_eq!(reaction.products[0].smiles, "[CH3:1][OH:2]");
        assert_eq!(reaction.mapped, "[CH3:1][OH:2].[OH2:3]>>[CH3:1][OH:2].[OH2:3]");
    }

    #[test]
    fn missing_arrow() {
        assert_eq!(
            parse_triplet(&triplet("a b c d e f True", "A = B", "C.C")),
            Err(ReactionParseError::MissingArrow)
        );
    }
}
