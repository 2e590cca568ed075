use std::path::{Path, PathBuf};

use parser::{CodonSampling, SetCover};

/// Write `contents` to `name` under `dir` and return the full path.
pub fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Input fixture should be writable");
    path
}

/// A set-cover argument set with the test-friendly defaults: one iteration,
/// one thread, full coverage, fixed seed.
pub fn set_cover_args(query: PathBuf, output: PathBuf, xmer: usize, ymer: usize) -> SetCover {
    SetCover {
        xmer_window_size: xmer,
        ymer_window_size: ymer,
        redundancy      : 1,
        iterations      : 1,
        min_xmer_coverage: 1.0,
        query,
        pre_designed    : None,
        output,
        threads         : 1,
        permute         : false,
        blosum          : None,
        blosum_cutoff   : 0,
        seed            : Some(42),
    }
}

/// A codon-sampling argument set over explicit in/out paths, fixed seed.
pub fn codon_sampling_args(
    input     : PathBuf,
    seq_output: PathBuf,
    ratio_output: PathBuf,
    probabilities: PathBuf,
) -> CodonSampling {
    CodonSampling {
        input,
        seq_output,
        ratio_output,
        probabilities,
        subsample      : 10,
        gc_target_ratio: 0.5,
        trials         : 10,
        threads        : 1,
        max_line_length: 127,
        seed           : Some(42),
    }
}
