//! Substance parameters encoded from SMILES strings.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CompTable, Encoding, all_unique};
use crate::error::{Error, Result};

/// How a [`SubstanceParameter`] is encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubstanceEncoding {
    /// Heavy-atom element counts, one column `{name}_{element}` per element
    /// occurring in any declared substance.
    #[default]
    Composition,
}

impl From<SubstanceEncoding> for Encoding {
    fn from(e: SubstanceEncoding) -> Self {
        match e {
            SubstanceEncoding::Composition => Self::Composition,
        }
    }
}

/// A parameter choosing one of several chemical substances.
///
/// Each substance has a label (its experimental value) and a SMILES string
/// from which the computational representation is derived.
///
/// # Example
///
/// ```
/// use searchspace::parameter::{Parameter, SubstanceParameter};
///
/// let solvent: Parameter =
///     SubstanceParameter::new("solvent", [("water", "O"), ("thf", "C1CCOC1")]).into();
/// assert_eq!(
///     solvent.comp_columns().unwrap(),
///     vec!["solvent_C".to_owned(), "solvent_O".to_owned()]
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubstanceParameter {
    name: String,
    data: Vec<(String, String)>,
    #[cfg_attr(feature = "serde", serde(default))]
    encoding: SubstanceEncoding,
}

impl SubstanceParameter {
    /// Creates a substance parameter from `(label, smiles)` pairs.
    #[must_use]
    pub fn new<L: Into<String>, S: Into<String>>(
        name: impl Into<String>,
        data: impl IntoIterator<Item = (L, S)>,
    ) -> Self {
        Self {
            name: name.into(),
            data: data
                .into_iter()
                .map(|(l, s)| (l.into(), s.into()))
                .collect(),
            encoding: SubstanceEncoding::Composition,
        }
    }

    /// Sets the encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: SubstanceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The substance labels, in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|(l, _)| l.as_str())
    }

    /// The SMILES string of the given label.
    #[must_use]
    pub fn smiles(&self, label: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, s)| s.as_str())
    }

    /// Number of substances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no substance is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The configured encoding.
    #[must_use]
    pub fn encoding_kind(&self) -> SubstanceEncoding {
        self.encoding
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValues`] without substances,
    /// [`Error::DuplicateValues`] for repeated labels and
    /// [`Error::InvalidDescriptors`] for a SMILES string that cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::EmptyValues {
                name: self.name.clone(),
            });
        }
        if !all_unique(self.labels()) {
            return Err(Error::DuplicateValues {
                name: self.name.clone(),
            });
        }
        self.comp_table().map(|_| ())
    }

    pub(super) fn comp_table(&self) -> Result<CompTable> {
        let counts = self
            .data
            .iter()
            .map(|(label, smiles)| {
                element_counts(smiles).map_err(|reason| Error::InvalidDescriptors {
                    name: self.name.clone(),
                    reason: format!("substance '{label}': {reason}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let elements: BTreeSet<&str> = counts
            .iter()
            .flat_map(|c| c.keys().map(String::as_str))
            .collect();
        let columns = elements
            .iter()
            .map(|e| format!("{}_{e}", self.name))
            .collect();
        let rows = counts
            .iter()
            .map(|c| {
                elements
                    .iter()
                    .map(|e| c.get(*e).copied().map_or(0.0, f64::from))
                    .collect()
            })
            .collect();
        Ok(CompTable { columns, rows })
    }
}

/// Symbols that may appear outside brackets.
const ORGANIC_SUBSET: &[&str] = &["Cl", "Br", "B", "C", "N", "O", "P", "S", "F", "I"];
/// Aromatic lower-case atoms allowed outside brackets.
const AROMATIC_SUBSET: &[char] = &['b', 'c', 'n', 'o', 'p', 's'];

/// Counts heavy atoms per element in a SMILES string.
///
/// Hydrogens (explicit or implicit) are not counted. Aromatic atoms are
/// counted under their upper-case element symbol.
fn element_counts(smiles: &str) -> core::result::Result<BTreeMap<String, u32>, String> {
    if smiles.trim().is_empty() {
        return Err("empty SMILES".to_owned());
    }
    let chars: Vec<char> = smiles.chars().collect();
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut depth = 0_i32;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or_else(|| format!("unclosed bracket at position {i}"))?;
                let atom: String = chars[i + 1..i + 1 + end].iter().collect();
                if let Some(symbol) = bracket_symbol(&atom)?
                    && symbol != "H"
                {
                    *counts.entry(symbol).or_default() += 1;
                }
                i += end + 2;
                continue;
            }
            ']' => return Err(format!("unopened bracket at position {i}")),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("unbalanced parenthesis at position {i}"));
                }
            }
            '%' => {
                // two-digit ring closure
                i += 3;
                continue;
            }
            _ if c.is_ascii_uppercase() => {
                let two: String = chars[i..chars.len().min(i + 2)].iter().collect();
                let symbol = ORGANIC_SUBSET
                    .iter()
                    .find(|s| two.starts_with(**s))
                    .ok_or_else(|| format!("atom '{c}' at position {i} must be bracketed"))?;
                *counts.entry((*symbol).to_owned()).or_default() += 1;
                i += symbol.len();
                continue;
            }
            _ if AROMATIC_SUBSET.contains(&c) => {
                *counts.entry(c.to_ascii_uppercase().to_string()).or_default() += 1;
            }
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' | '.' | '*' | '@' | '+' => {}
            _ if c.is_ascii_digit() => {}
            _ => return Err(format!("unexpected character '{c}' at position {i}")),
        }
        i += 1;
    }
    if depth != 0 {
        return Err("unbalanced parenthesis".to_owned());
    }
    Ok(counts)
}

/// Extracts the element symbol from the inside of a bracket atom such as
/// `13CH4`, `NH4+` or `nH`. Returns `None` for the wildcard `*`.
fn bracket_symbol(atom: &str) -> core::result::Result<Option<String>, String> {
    let rest = atom.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = rest.chars();
    match chars.next() {
        Some('*') => Ok(None),
        Some(first) if first.is_ascii_uppercase() => {
            let mut symbol = first.to_string();
            if let Some(second) = chars.next()
                && second.is_ascii_lowercase()
            {
                symbol.push(second);
            }
            Ok(Some(symbol))
        }
        Some(first) if first.is_ascii_lowercase() => {
            // aromatic bracket atoms: se, as, or single-letter aromatics
            if rest.starts_with("se") || rest.starts_with("as") {
                let mut symbol = rest[..2].to_owned();
                symbol[..1].make_ascii_uppercase();
                Ok(Some(symbol))
            } else if AROMATIC_SUBSET.contains(&first) {
                Ok(Some(first.to_ascii_uppercase().to_string()))
            } else {
                Err(format!("unknown aromatic atom in '[{atom}]'"))
            }
        }
        _ => Err(format!("missing element symbol in '[{atom}]'")),
    }
}
