//! Auxiliary resolution.
//!
//! Ledgers carry a mix of canonical auxiliary codes and legacy free-text
//! names in the same column. A reference resolves by exact code first, then
//! by normalized name; anything else is passed through as unresolved.

use std::collections::HashMap;

use super::normalize::normalize;
use super::types::Auxiliary;

/// Outcome of resolving a raw auxiliary reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The reference is an active auxiliary's code.
    ByCode(&'a Auxiliary),
    /// The reference matches an active auxiliary's normalized name.
    ByName(&'a Auxiliary),
    /// No active auxiliary matches.
    Unresolved,
}

impl<'a> Resolution<'a> {
    /// The matched auxiliary, if any.
    #[must_use]
    pub const fn auxiliary(self) -> Option<&'a Auxiliary> {
        match self {
            Self::ByCode(aux) | Self::ByName(aux) => Some(aux),
            Self::Unresolved => None,
        }
    }

    /// Returns true if the reference matched.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Lookup indexes over the active auxiliary master.
#[derive(Debug, Default)]
pub struct AuxiliaryResolver<'a> {
    by_code: HashMap<&'a str, &'a Auxiliary>,
    by_name: HashMap<String, &'a Auxiliary>,
}

impl<'a> AuxiliaryResolver<'a> {
    /// Builds both indexes. Inactive auxiliaries are skipped.
    ///
    /// On a normalized-name collision the first auxiliary wins.
    #[must_use]
    pub fn new(auxiliaries: &'a [Auxiliary]) -> Self {
        let mut by_code = HashMap::with_capacity(auxiliaries.len());
        let mut by_name = HashMap::with_capacity(auxiliaries.len());

        for aux in auxiliaries.iter().filter(|a| a.active) {
            by_code.entry(aux.code.as_str()).or_insert(aux);

            let key = normalize(&aux.name);
            if !key.is_empty() {
                by_name.entry(key).or_insert(aux);
            }
        }

        Self { by_code, by_name }
    }

    /// Resolves a raw reference taken from a voucher line.
    ///
    /// Callers exclude blank references beforehand; a blank input simply
    /// comes back unresolved.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Resolution<'a> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Resolution::Unresolved;
        }

        if let Some(&aux) = self.by_code.get(trimmed) {
            return Resolution::ByCode(aux);
        }

        match self.by_name.get(&normalize(trimmed)) {
            Some(&aux) => Resolution::ByName(aux),
            None => Resolution::Unresolved,
        }
    }

    /// Number of indexed codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Returns true if no active auxiliary was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
