use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize)]
#[clap(name="oligo-design", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// oligo-design: peptide set-cover design and codon back-sampling
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use --quiet to disable them.
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Dump the parsed command line arguments as YAML, at debug level.
    ///
    /// # Errors
    /// If `serde_yaml` fails to represent `Self` as a string.
    pub fn serialize(&self) -> Result<()> {
        let serialized = serde_yaml::to_string(&self)
            .map_err(|err| anyhow::anyhow!("Failed to serialize command line arguments: [{err}]"))?;
        debug!("\n---- Command line args ----\n{serialized}\n---");
        Ok(())
    }
}

#[derive(Subcommand, Debug, Serialize)]
pub enum Commands {
    /// Select a minimal set of ymer peptides covering the xmers of the input proteome.
    SetCover {
        #[clap(flatten)]
        cover: SetCover,
    },
    /// Back-translate peptides into DNA encodings ranked by proximity to a target GC ratio.
    CodonSampling {
        #[clap(flatten)]
        sampling: CodonSampling,
    },
    /// Drop every input sequence that is fully contained within a longer one.
    Collapse {
        #[clap(flatten)]
        collapse: Collapse,
    },
}

/// Mode of single-substitution neighborhood expansion applied while indexing
/// xmers. Derived from `--permute` / `--blosum`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    None,
    FunctionalGroups,
    Blosum{name: String, cutoff: i32},
}

#[derive(Parser, Debug, Serialize)]
pub struct SetCover {
    /// Xmer window size.
    ///
    /// Length of the substrings whose coverage is being maximized. Every
    /// contiguous window of this length (step 1) within the input sequences
    /// counts as one coverage target per location.
    #[clap(short='x', long, default_value("100"))]
    pub xmer_window_size: usize,

    /// Ymer window size.
    ///
    /// Length of the candidate peptides. Must be strictly less than 256, and
    /// at least as large as --xmer-window-size.
    #[clap(short='y', long, default_value("100"))]
    pub ymer_window_size: usize,

    /// Redundancy tag.
    ///
    /// Appended to the output file name ('{output}_R_{redundancy}'). Does not
    /// participate in scoring.
    #[clap(short='r', long, default_value("1"))]
    pub redundancy: u32,

    /// Number of independent restart iterations.
    ///
    /// The greedy cover is randomized; each restart re-runs it from scratch
    /// and the smallest design across restarts (and across previous runs
    /// found on disk) is retained.
    #[clap(short='i', long, default_value("1"))]
    pub iterations: u32,

    /// Minimum fraction of xmers that must be covered before the loop stops.
    #[clap(short='c', long, default_value("1.0"))]
    pub min_xmer_coverage: f64,

    /// Input FASTA of protein sequences.
    #[clap(short='q', long, required(true))]
    pub query: PathBuf,

    /// Optional FASTA of pre-designed peptides.
    ///
    /// Xmers already present in these peptides are marked covered before the
    /// greedy loop begins.
    #[clap(short='e', long, required(false))]
    pub pre_designed: Option<PathBuf>,

    /// Output base name. The design is written to '{output}_R_{redundancy}'.
    #[clap(short='o', long, default_value("output.fasta"))]
    pub output: PathBuf,

    /// Number of worker threads for the coverage-update loop.
    #[clap(short='t', long, default_value("1"))]
    pub threads: usize,

    /// Expand each xmer with its single-residue functional-group permutations.
    #[clap(short='p', long)]
    pub permute: bool,

    /// Substitution matrix used for neighborhood expansion.
    ///
    /// Accepts the built-in 'blosum62' or 'blosum90', or a path to a
    /// BLOSUM-formatted file. Mutually exclusive with --permute.
    #[clap(short='b', long, required(false), conflicts_with("permute"))]
    pub blosum: Option<String>,

    /// Minimum substitution score for a matrix-driven permutation to be emitted.
    #[clap(short='n', long, default_value("0"))]
    pub blosum_cutoff: i32,

    /// Fixed master seed for the random tie-breaker.
    ///
    /// When omitted, the generator is seeded from the OS entropy source and
    /// runs are not reproducible.
    #[clap(long, required(false))]
    pub seed: Option<u64>,
}

impl SetCover {
    /// Ensure numeric arguments lie within their domain.
    ///
    /// # Errors
    /// On an out-of-range ymer window, inverted window sizes, an invalid
    /// coverage fraction, or a zero thread count.
    pub fn validate(&self) -> Result<(), ParserError> {
        if self.ymer_window_size >= 256 {
            return Err(ParserError::YmerWindowTooLarge{got: self.ymer_window_size})
        }
        if self.xmer_window_size > self.ymer_window_size {
            return Err(ParserError::WindowOrder{x: self.xmer_window_size, y: self.ymer_window_size})
        }
        if !(0.0..=1.0).contains(&self.min_xmer_coverage) {
            return Err(ParserError::CoverageOutOfRange{got: self.min_xmer_coverage})
        }
        if self.threads == 0 {
            return Err(ParserError::NoThreads)
        }
        Ok(())
    }

    /// Which neighborhood expansion was requested.
    pub fn expansion(&self) -> Expansion {
        match (&self.blosum, self.permute) {
            (Some(name), _) => Expansion::Blosum{name: name.clone(), cutoff: self.blosum_cutoff},
            (None, true)    => Expansion::FunctionalGroups,
            (None, false)   => Expansion::None,
        }
    }
}

#[derive(Parser, Debug, Serialize)]
pub struct CodonSampling {
    /// Input residues file. One '{name},{residues}' record per line.
    #[clap(short='i', long, required(true))]
    pub input: PathBuf,

    /// Encoded-sequences output file.
    #[clap(short='s', long, required(true))]
    pub seq_output: PathBuf,

    /// Per-encoding nucleotide/amino-acid/codon ratios output file.
    #[clap(short='r', long, required(true))]
    pub ratio_output: PathBuf,

    /// Codon probability file. One '{amino_acid},{codon},{weight},{codon_index}' record per line.
    ///
    /// Weights do not need to sum to 1: they are normalized per amino acid.
    /// Codon indices must range from 0 to 63.
    #[clap(short='p', long, required(true))]
    pub probabilities: PathBuf,

    /// Number of top encodings to keep per input sequence.
    ///
    /// The best encodings are measured by absolute difference from
    /// --gc-target-ratio.
    #[clap(short='n', long, default_value("10000"))]
    pub subsample: usize,

    /// GC to AT ratio to target for encodings.
    #[clap(short='g', long, default_value("0.55"))]
    pub gc_target_ratio: f64,

    /// Number of nucleotide sequences to generate for each input sequence.
    #[clap(short='t', long, default_value("10000"))]
    pub trials: usize,

    /// Number of worker threads across which trials are chunked.
    #[clap(short='c', long, default_value("1"))]
    pub threads: usize,

    /// Maximum number of characters allowed in an input line. Must not exceed 65,534.
    #[clap(short='l', long, default_value("127"))]
    pub max_line_length: usize,

    /// Fixed master seed for the Monte-Carlo trials.
    ///
    /// When omitted, the generator is seeded from the OS entropy source and
    /// runs are not reproducible.
    #[clap(long, required(false))]
    pub seed: Option<u64>,
}

impl CodonSampling {
    /// Ensure numeric arguments lie within their domain.
    ///
    /// # Errors
    /// On a zero or overlong line length, a subsample count exceeding the
    /// trial count, an out-of-range GC target, or zero trials/threads.
    pub fn validate(&self) -> Result<(), ParserError> {
        if self.max_line_length == 0 || self.max_line_length > 65_534 {
            return Err(ParserError::LineLengthOutOfRange{got: self.max_line_length})
        }
        if self.subsample > self.trials {
            return Err(ParserError::SubsampleExceedsTrials{subsample: self.subsample, trials: self.trials})
        }
        if !(0.0..=1.0).contains(&self.gc_target_ratio) {
            return Err(ParserError::GcTargetOutOfRange{got: self.gc_target_ratio})
        }
        if self.trials == 0 {
            return Err(ParserError::NoTrials)
        }
        if self.threads == 0 {
            return Err(ParserError::NoThreads)
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Serialize)]
pub struct Collapse {
    /// Input FASTA to parse and collapse.
    #[clap(short='f', long, required(true))]
    pub fasta: PathBuf,

    /// Output FASTA. Defaults to '{fasta}_out'.
    #[clap(short='o', long, required(false))]
    pub output: Option<PathBuf>,

    /// Number of worker threads for the containment scan.
    #[clap(short='n', long, default_value("4"))]
    pub threads: usize,

    /// Optional map output, recording which sequences were collapsed under
    /// which representative.
    #[clap(short='m', long, required(false))]
    pub map: Option<PathBuf>,
}

impl Collapse {
    /// The effective output path: `--output` when given, `{fasta}_out`
    /// otherwise.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let mut tagged = self.fasta.as_os_str().to_os_string();
                tagged.push("_out");
                PathBuf::from(tagged)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_set_cover(extra: &[&str]) -> SetCover {
        let mut argv = vec!["oligo-design", "set-cover", "-q", "input.fasta"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).commands {
            Commands::SetCover{cover} => cover,
            _ => panic!("Parsed the wrong subcommand"),
        }
    }

    fn parse_sampling(extra: &[&str]) -> CodonSampling {
        let mut argv = vec![
            "oligo-design", "codon-sampling",
            "-i", "in.csv", "-s", "seqs.csv", "-r", "ratios.csv", "-p", "probs.csv",
        ];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).commands {
            Commands::CodonSampling{sampling} => sampling,
            _ => panic!("Parsed the wrong subcommand"),
        }
    }

    #[test]
    fn set_cover_defaults() {
        let cover = parse_set_cover(&[]);
        assert_eq!(cover.xmer_window_size, 100);
        assert_eq!(cover.ymer_window_size, 100);
        assert_eq!(cover.iterations, 1);
        assert_eq!(cover.redundancy, 1);
        assert!(cover.validate().is_ok());
        assert_eq!(cover.expansion(), Expansion::None);
    }

    #[test]
    fn set_cover_rejects_large_ymer() {
        let cover = parse_set_cover(&["-y", "256", "-x", "100"]);
        assert_eq!(cover.validate(), Err(ParserError::YmerWindowTooLarge{got: 256}));
    }

    #[test]
    fn set_cover_rejects_inverted_windows() {
        let cover = parse_set_cover(&["-x", "12", "-y", "9"]);
        assert_eq!(cover.validate(), Err(ParserError::WindowOrder{x: 12, y: 9}));
    }

    #[test]
    fn set_cover_rejects_bad_coverage() {
        let cover = parse_set_cover(&["-c", "1.5"]);
        assert_eq!(cover.validate(), Err(ParserError::CoverageOutOfRange{got: 1.5}));
    }

    #[test]
    fn set_cover_expansion_modes() {
        assert_eq!(parse_set_cover(&["-p"]).expansion(), Expansion::FunctionalGroups);
        assert_eq!(
            parse_set_cover(&["-b", "blosum62", "-n", "2"]).expansion(),
            Expansion::Blosum{name: String::from("blosum62"), cutoff: 2}
        );
    }

    #[test]
    fn sampling_defaults() {
        let sampling = parse_sampling(&[]);
        assert_eq!(sampling.trials, 10_000);
        assert_eq!(sampling.subsample, 10_000);
        assert_eq!(sampling.max_line_length, 127);
        assert!(sampling.validate().is_ok());
    }

    #[test]
    fn sampling_rejects_overlong_line_limit() {
        let sampling = parse_sampling(&["-l", "65535"]);
        assert_eq!(sampling.validate(), Err(ParserError::LineLengthOutOfRange{got: 65_535}));
    }

    #[test]
    fn collapse_output_defaults_to_a_suffixed_input() {
        let argv = ["oligo-design", "collapse", "-f", "seqs.fasta"];
        let Commands::Collapse{collapse} = Cli::parse_from(argv).commands else {
            panic!("Parsed the wrong subcommand")
        };
        assert_eq!(collapse.output_path(), PathBuf::from("seqs.fasta_out"));
        assert_eq!(collapse.threads, 4);
        assert!(collapse.map.is_none());
    }

    #[test]
    fn sampling_rejects_subsample_above_trials() {
        let sampling = parse_sampling(&["-t", "10", "-n", "11"]);
        assert_eq!(sampling.validate(), Err(ParserError::SubsampleExceedsTrials{subsample: 11, trials: 10}));
    }
}
