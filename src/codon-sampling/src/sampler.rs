use oligo_io::read::Sequence;
use rayon::prelude::*;
use xoroshiro::Xoroshiro128;

use crate::encoding::Encoding;
use crate::table::CodonTable;

/// Monte-Carlo back-translation sampler.
///
/// Trials are chunked across the worker pool; each chunk draws from its own
/// forked PRNG stream and accumulates into its own encodings, so the workers
/// share nothing mutable. Chunking is a pure function of `(trials, workers)`,
/// which keeps runs reproducible for a fixed master seed and thread count.
pub struct Sampler<'a> {
    pub table    : &'a CodonTable,
    pub trials   : usize,
    pub subsample: usize,
    pub gc_target: f64,
}

impl Sampler<'_> {
    /// Run every trial for one sequence and keep the `subsample` encodings
    /// closest to the GC target.
    ///
    /// The ranking is a stable sort on `gc_dist_abs`: equal deviations keep
    /// their trial order.
    pub fn sample(&self, sequence: &Sequence, rng: &mut Xoroshiro128, pool: &rayon::ThreadPool) -> Vec<Encoding> {
        let workers = pool.current_num_threads().max(1);
        let jobs: Vec<(Xoroshiro128, usize)> = chunk_sizes(self.trials, workers)
            .into_iter()
            .map(|count| (rng.fork(), count))
            .collect();

        let chunks: Vec<Vec<Encoding>> = pool.install(|| {
            jobs.into_par_iter()
                .map(|(mut stream, count)| {
                    (0..count).map(|_| self.run_trial(sequence, &mut stream)).collect()
                })
                .collect()
        });

        let mut encodings: Vec<Encoding> = chunks.into_iter().flatten().collect();
        encodings.sort_by(|a, b| {
            a.gc_dist_abs.partial_cmp(&b.gc_dist_abs).expect("GC deviations should be comparable")
        });
        encodings.truncate(self.subsample);
        encodings
    }

    /// One back-translation: inverse-CDF sample a codon per residue.
    ///
    /// # Panics
    /// If a residue has no codons in the table. The reader already rejected
    /// ambiguity codes, so an empty row means the probability table is
    /// incomplete.
    fn run_trial(&self, sequence: &Sequence, rng: &mut Xoroshiro128) -> Encoding {
        let mut encoding = Encoding::with_capacity(sequence.len());
        for residue in sequence.residues.chars() {
            let codons = self.table.codons(residue);
            assert!(!codons.is_empty(), "No codons defined for residue '{residue}'");

            let draw = rng.uniform();
            let mut cumulative = 0.0;
            // Floating-point loss can leave the cumulative weight a hair
            // under 1.0; the final codon absorbs those draws.
            let mut chosen = &codons[codons.len() - 1];
            for codon in codons {
                cumulative += codon.weight;
                if cumulative >= draw {
                    chosen = codon;
                    break
                }
            }
            encoding.push(chosen);
        }
        encoding.finalize(self.gc_target);
        encoding
    }
}

/// Spread `trials` over at most `workers` chunks, largest chunks first.
/// Empty chunks are dropped.
fn chunk_sizes(trials: usize, workers: usize) -> Vec<usize> {
    let base = trials / workers;
    let extra = trials % workers;
    (0..workers)
        .map(|index| base + usize::from(index < extra))
        .filter(|&count| count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;

    fn table_from(contents: &str) -> Result<CodonTable> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        CodonTable::from_path(file.path())
    }

    fn pool(threads: usize) -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build().expect("Pool should build")
    }

    #[test]
    fn chunking_preserves_the_trial_count() {
        for (trials, workers) in [(10, 3), (10_000, 8), (1, 4), (7, 7), (5, 16)] {
            let chunks = chunk_sizes(trials, workers);
            assert_eq!(chunks.iter().sum::<usize>(), trials);
            assert!(chunks.len() <= workers);
            assert!(chunks.iter().all(|&count| count > 0));
        }
    }

    #[test]
    fn single_codon_table_is_deterministic() -> Result<()> {
        let table = table_from("A,GAA,1.0,0\n")?;
        let sampler = Sampler { table: &table, trials: 50, subsample: 50, gc_target: 1.0 / 3.0 };
        let sequence = Sequence::new("s", "AAA");

        let mut rng = Xoroshiro128::with_seed(1);
        let encodings = sampler.sample(&sequence, &mut rng, &pool(1));

        assert_eq!(encodings.len(), 50);
        for encoding in &encodings {
            assert_eq!(encoding.nucleotides, "GAAGAAGAA");
            assert!((encoding.gc_ratio - 1.0 / 3.0).abs() < 1e-12);
            assert!(encoding.gc_dist_abs < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn encodings_have_three_bases_per_residue() -> Result<()> {
        let table = table_from("M,ATG,1.0,14\nK,AAA,0.4,0\nK,AAG,0.6,2\n")?;
        let sampler = Sampler { table: &table, trials: 20, subsample: 20, gc_target: 0.5 };
        let sequence = Sequence::new("s", "MKKM");

        let mut rng = Xoroshiro128::with_seed(9);
        for encoding in sampler.sample(&sequence, &mut rng, &pool(1)) {
            assert_eq!(encoding.nucleotides.len(), 3 * sequence.len());
            assert_eq!(encoding.total_nucleotides(), 12);
            assert_eq!(encoding.total_codons(), 4);
        }
        Ok(())
    }

    #[test]
    fn ranking_is_by_gc_deviation() -> Result<()> {
        let table = table_from("A,GCA,0.5,0\nA,AAA,0.5,1\n")?;
        let sampler = Sampler { table: &table, trials: 200, subsample: 50, gc_target: 0.5 };
        let sequence = Sequence::new("s", "AAAA");

        let mut rng = Xoroshiro128::with_seed(3);
        let encodings = sampler.sample(&sequence, &mut rng, &pool(1));

        assert_eq!(encodings.len(), 50);
        for pair in encodings.windows(2) {
            assert!(pair[0].gc_dist_abs <= pair[1].gc_dist_abs);
        }
        Ok(())
    }

    #[test]
    fn balanced_weights_converge_on_their_base_mix() -> Result<()> {
        // GCA carries one C, GCC two: an even split makes C one half of all
        // sampled bases in expectation.
        let table = table_from("A,GCA,0.5,0\nA,GCC,0.5,1\n")?;
        let trials = 10_000;
        let sampler = Sampler { table: &table, trials, subsample: trials, gc_target: 0.5 };
        let sequence = Sequence::new("s", "AA");

        let mut rng = Xoroshiro128::with_seed(7);
        let encodings = sampler.sample(&sequence, &mut rng, &pool(1));

        let c_total: u64 = encodings.iter().map(|e| e.nucleotide_counts[crate::table::C_INDEX]).sum();
        let base_total: u64 = encodings.iter().map(Encoding::total_nucleotides).sum();
        let c_fraction = c_total as f64 / base_total as f64;
        assert!((c_fraction - 0.5).abs() < 0.02, "C fraction diverged: {c_fraction}");
        Ok(())
    }

    #[test]
    fn fixed_seed_reproduces_the_sample() -> Result<()> {
        let table = table_from("A,GCA,0.3,0\nA,GCC,0.3,1\nA,GCG,0.4,2\n")?;
        let sampler = Sampler { table: &table, trials: 100, subsample: 10, gc_target: 0.6 };
        let sequence = Sequence::new("s", "AAAAA");

        let mut first_rng = Xoroshiro128::with_seed(1234);
        let mut second_rng = Xoroshiro128::with_seed(1234);
        let first = sampler.sample(&sequence, &mut first_rng, &pool(2));
        let second = sampler.sample(&sequence, &mut second_rng, &pool(2));
        assert_eq!(first, second);
        Ok(())
    }
}
