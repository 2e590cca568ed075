use oligo_io::read::Sequence;

use crate::blosum::Blosum;
use crate::groups;
use crate::table::KmerTable;
use crate::windows::{location_tag, num_windows, windows, PLACEHOLDER};

/// Single-substitution neighborhood applied when decomposing a ymer into the
/// xmers it accounts for.
#[derive(Debug, Clone, Default)]
pub enum Neighborhood {
    #[default]
    None,
    FunctionalGroups,
    Blosum{matrix: Blosum, cutoff: i32},
}

impl Neighborhood {
    /// Single-substitution variants of `window` under this rule. The
    /// original window is not part of the result.
    pub fn variants(&self, window: &str) -> Vec<String> {
        match self {
            Self::None                    => Vec::new(),
            Self::FunctionalGroups        => groups::permute_functional_groups(window),
            Self::Blosum{matrix, cutoff}  => matrix.permute_window(window, *cutoff),
        }
    }
}

/// Index every window of every sequence into a table keyed by the window,
/// holding the insertion-ordered list of location tags where it occurs.
///
/// Windows containing the placeholder residue are excluded from tagging.
pub fn index_with_locations(sequences: &[Sequence], window_size: usize) -> KmerTable<Vec<String>> {
    let mut table: KmerTable<Vec<String>> = KmerTable::with_capacity(sequences.len());
    for sequence in sequences {
        index_sequence(&mut table, sequence, window_size);
    }
    table
}

/// Index one sequence's windows into an existing location table.
pub fn index_sequence(table: &mut KmerTable<Vec<String>>, sequence: &Sequence, window_size: usize) {
    for (start, window) in windows(&sequence.residues, window_size).enumerate() {
        if window.contains(PLACEHOLDER) {
            continue
        }
        let tag = location_tag(&sequence.name, start, start + window_size);
        match table.find_mut(window) {
            Some(tags) => tags.push(tag),
            None => {
                table.add(window, vec![tag]);
            }
        }
    }
}

/// The deduplicated xmer keys a ymer accounts for: its own windows plus, if a
/// neighborhood is configured, every single-substitution variant of them.
///
/// Lookup keys only; callers resolve them against the xmer location table.
pub fn component_xmers(ymer: &str, xmer_size: usize, neighborhood: &Neighborhood) -> Vec<String> {
    let mut seen: KmerTable<()> = KmerTable::with_capacity(num_windows(ymer.len(), xmer_size));
    for window in windows(ymer, xmer_size) {
        if window.contains(PLACEHOLDER) {
            continue
        }
        seen.add(window, ());
        for variant in neighborhood.variants(window) {
            seen.add(&variant, ());
        }
    }
    seen.keys().map(String::from).collect()
}
