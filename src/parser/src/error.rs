use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParserError {
    #[error("--ymer-window-size must be strictly less than 256 (got {got})")]
    YmerWindowTooLarge{got: usize},

    #[error("--xmer-window-size ({x}) cannot exceed --ymer-window-size ({y})")]
    WindowOrder{x: usize, y: usize},

    #[error("--min-xmer-coverage must lie within [0, 1] (got {got})")]
    CoverageOutOfRange{got: f64},

    #[error("--gc-target-ratio must lie within [0, 1] (got {got})")]
    GcTargetOutOfRange{got: f64},

    #[error("--max-line-length must be non-zero and must not exceed 65,534 (got {got})")]
    LineLengthOutOfRange{got: usize},

    #[error("--subsample ({subsample}) cannot exceed --trials ({trials})")]
    SubsampleExceedsTrials{subsample: usize, trials: usize},

    #[error("--trials must be non-zero")]
    NoTrials,

    #[error("--threads must be non-zero")]
    NoThreads,
}
