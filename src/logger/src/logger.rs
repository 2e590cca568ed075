use std::io::Write;

use env_logger::{fmt::Color, Builder, Env};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use once_cell::sync::OnceCell;

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Process-wide logger. Owns the [`MultiProgress`] instance so that progress
/// bars and log lines interleave without clobbering one another.
#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Build and register the global logger.
    ///
    /// `verbosity` maps to a level filter; the `OLIGO_LOG` environment
    /// variable overrides it.
    pub fn init(verbosity: u8) {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default().filter("OLIGO_LOG");

        let logger = Builder::new()
            .filter_level(log_level)
            .format(|buf, record| {
                let traceback = if record.level() == LevelFilter::Error {
                    format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0))
                } else {
                    String::new()
                };

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan,
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    record.args()
                )
            })
            .parse_env(env)
            .build();

        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .expect("Failed to wrap logger with multiprogress");
        let _ = INSTANCE.set(Self { multi_pg });
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0           => LevelFilter::Error,
            1           => LevelFilter::Warn,
            2           => LevelFilter::Info,
            3           => LevelFilter::Debug,
            4..=u8::MAX => LevelFilter::Trace,
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Handle on the shared progress-bar drawer.
    pub fn multi() -> &'static MultiProgress {
        &INSTANCE.get().expect("Uninitialized logger").multi_pg
    }

    /// Attach a new progress bar to the shared drawer.
    ///
    /// Library callers without an initialized logger get a hidden bar, so
    /// progress reporting never becomes a hard requirement.
    pub fn progress_bar(len: u64) -> indicatif::ProgressBar {
        match INSTANCE.get() {
            Some(logger) => logger.multi_pg.add(indicatif::ProgressBar::new(len)),
            None         => indicatif::ProgressBar::hidden(),
        }
    }
}
