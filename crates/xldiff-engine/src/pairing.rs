//! Row pairing between a left sheet and its right counterpart
//!
//! Data rows are paired by the value in the key column when a header was
//! found; the header row itself, rows above it, and every row of a sheet
//! without a header are paired by position. A missing right sheet pairs
//! nothing.

use std::cell::OnceCell;
use std::fmt;

use ahash::{AHashMap, AHashSet};
use log::warn;

use crate::detect::HeaderKey;
use crate::options::DuplicateKeyPolicy;
use xldiff_core::{ValueKey, Worksheet};

/// Which pairing strategy applies to a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PairingKind {
    /// Data rows by key, other rows by position
    Keyed,
    /// Every row by position
    Positional,
    /// No right sheet; every row is unmatched
    Unpaired,
}

impl fmt::Display for PairingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairingKind::Keyed => "keyed",
            PairingKind::Positional => "positional",
            PairingKind::Unpaired => "unpaired",
        };
        f.write_str(name)
    }
}

/// Key value to right row, built from the right sheet's data rows
#[derive(Debug, Default)]
pub struct KeyLookup {
    rows: AHashMap<ValueKey, u32>,
    duplicates: usize,
}

impl KeyLookup {
    /// Build the lookup from rows strictly after `header.header_row`
    ///
    /// Rows whose key cell is empty are left out.
    pub fn build(right: &Worksheet, header: HeaderKey, policy: DuplicateKeyPolicy) -> Self {
        let mut rows: AHashMap<ValueKey, u32> = AHashMap::new();
        let mut recurring: AHashSet<ValueKey> = AHashSet::new();

        for row in right.row_indices().filter(|&r| header.is_data_row(r)) {
            let Some(value) = right.value_at(row, header.key_column) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            let key = value.key();
            match rows.get(&key) {
                Some(_) => {
                    recurring.insert(key.clone());
                    if policy != DuplicateKeyPolicy::FirstWins {
                        rows.insert(key, row);
                    }
                }
                None => {
                    rows.insert(key, row);
                }
            }
        }

        if !recurring.is_empty() {
            warn!(
                "sheet '{}': {} key value(s) recur in column {} ({:?})",
                right.name(),
                recurring.len(),
                header.key_column,
                policy
            );
        }
        if policy == DuplicateKeyPolicy::Exclude {
            rows.retain(|key, _| !recurring.contains(key));
        }

        Self {
            rows,
            duplicates: recurring.len(),
        }
    }

    pub fn get(&self, key: &ValueKey) -> Option<u32> {
        self.rows.get(key).copied()
    }

    /// Number of distinct key values found on more than one row
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pairing strategy with the state it needs
enum PairingStrategy<'a> {
    Unpaired,
    Positional {
        right: &'a Worksheet,
    },
    Keyed {
        right: &'a Worksheet,
        header: HeaderKey,
        policy: DuplicateKeyPolicy,
        lookup: OnceCell<KeyLookup>,
    },
}

/// Pairs rows of a left sheet with rows of a right sheet
///
/// The keyed lookup table is built on first use, so a sheet whose rows all
/// sit at or above the header never scans the right sheet's key column.
pub struct RowPairing<'a> {
    strategy: PairingStrategy<'a>,
}

impl<'a> RowPairing<'a> {
    pub fn new(
        right: Option<&'a Worksheet>,
        header: Option<HeaderKey>,
        policy: DuplicateKeyPolicy,
    ) -> Self {
        let strategy = match (right, header) {
            (None, _) => PairingStrategy::Unpaired,
            (Some(right), None) => PairingStrategy::Positional { right },
            (Some(right), Some(header)) => PairingStrategy::Keyed {
                right,
                header,
                policy,
                lookup: OnceCell::new(),
            },
        };
        Self { strategy }
    }

    pub fn kind(&self) -> PairingKind {
        match self.strategy {
            PairingStrategy::Unpaired => PairingKind::Unpaired,
            PairingStrategy::Positional { .. } => PairingKind::Positional,
            PairingStrategy::Keyed { .. } => PairingKind::Keyed,
        }
    }

    /// The right sheet, when there is one
    pub fn right(&self) -> Option<&'a Worksheet> {
        match self.strategy {
            PairingStrategy::Unpaired => None,
            PairingStrategy::Positional { right } | PairingStrategy::Keyed { right, .. } => {
                Some(right)
            }
        }
    }

    /// Right row paired with `row` of `left`, if any
    pub fn matched_row(&self, left: &Worksheet, row: u32) -> Option<u32> {
        match &self.strategy {
            PairingStrategy::Unpaired => None,
            PairingStrategy::Positional { right } => positional(right, row),
            PairingStrategy::Keyed {
                right,
                header,
                policy,
                lookup,
            } => {
                if !header.is_data_row(row) {
                    return positional(right, row);
                }
                let value = left.value_at(row, header.key_column)?;
                if value.is_empty() {
                    return None;
                }
                lookup
                    .get_or_init(|| KeyLookup::build(right, *header, *policy))
                    .get(&value.key())
            }
        }
    }

    /// Distinct recurring right-sheet keys, once the lookup has been built
    pub fn duplicate_keys(&self) -> usize {
        match &self.strategy {
            PairingStrategy::Keyed { lookup, .. } => {
                lookup.get().map(KeyLookup::duplicates).unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl fmt::Debug for RowPairing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowPairing")
            .field("kind", &self.kind())
            .field("right", &self.right().map(Worksheet::name))
            .finish()
    }
}

/// Same row index, if the right sheet extends that far
fn positional(right: &Worksheet, row: u32) -> Option<u32> {
    (row >= 1 && row <= right.max_row()).then_some(row)
}
