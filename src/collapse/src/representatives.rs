use oligo_io::read::Sequence;
use rayon::prelude::*;

/// Result of the containment scan: which sequences survive, and which were
/// collapsed under which representative.
///
/// Sequences are scanned shortest first; a sequence is collapsed when its
/// residues occur verbatim inside a longer (or equal-length, later-sorted)
/// sequence, and the longest such container becomes its representative.
/// Containment chains resolve to a single surviving representative, so the
/// map never points at a collapsed record.
pub struct Representatives {
    sequences : Vec<Sequence>,
    /// For each index (sorted order): the index it collapsed into, if any.
    containers: Vec<Option<usize>>,
}

impl Representatives {
    /// Scan `sequences` for containment and resolve representatives.
    ///
    /// The per-sequence scans are independent and run on `pool`; each
    /// sequence only reads its peers, so the workers share nothing mutable.
    pub fn resolve(mut sequences: Vec<Sequence>, pool: &rayon::ThreadPool) -> Self {
        // Shortest first. Ties keep input order, so the outcome does not
        // depend on the scan schedule.
        sequences.sort_by_key(Sequence::len);

        let containers: Vec<Option<usize>> = pool.install(|| {
            (0..sequences.len())
                .into_par_iter()
                .map(|index| {
                    let needle = &sequences[index].residues;
                    // Scan longest first, so a record contained in several
                    // unrelated sequences lands under the longest one.
                    sequences[index + 1..]
                        .iter()
                        .rposition(|longer| longer.residues.contains(needle.as_str()))
                        .map(|offset| index + 1 + offset)
                })
                .collect()
        });

        Self { sequences, containers }
    }

    /// Index of the surviving representative of `index`.
    fn representative(&self, index: usize) -> usize {
        let mut current = index;
        while let Some(container) = self.containers[current] {
            current = container;
        }
        current
    }

    /// The surviving sequences, shortest first.
    pub fn kept(&self) -> Vec<&Sequence> {
        self.sequences
            .iter()
            .zip(&self.containers)
            .filter(|(_, container)| container.is_none())
            .map(|(sequence, _)| sequence)
            .collect()
    }

    /// One tab-separated line per representative that absorbed at least one
    /// record: `{representative}\t{collapsed}\t{collapsed}...`.
    pub fn map_lines(&self) -> Vec<String> {
        let mut absorbed: Vec<Vec<&str>> = vec![Vec::new(); self.sequences.len()];
        for index in 0..self.sequences.len() {
            if self.containers[index].is_some() {
                absorbed[self.representative(index)].push(&self.sequences[index].name);
            }
        }
        absorbed
            .iter()
            .enumerate()
            .filter(|(_, names)| !names.is_empty())
            .map(|(index, names)| {
                let mut line = self.sequences[index].name.clone();
                for name in names {
                    line.push('\t');
                    line.push_str(name);
                }
                line
            })
            .collect()
    }
}
