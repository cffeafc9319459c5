use std::path::Path;
use std::sync::Once;

use chrono::Utc;
use log::LevelFilter;

/// Set up console logging at `level`, plus a truncated trace-level log file
/// when `log_file` is given. Only the first call has any effect.
///
/// `RANGELAB_NO_LOGS` in the environment disables logging entirely.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) {
    if std::env::var_os("RANGELAB_NO_LOGS").is_some() {
        return;
    }

    static INIT_LOGGER: Once = Once::new();

    INIT_LOGGER.call_once(|| {
        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}][{}][{}] {}",
                    Utc::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(
                fern::Dispatch::new()
                    .level(level)
                    .chain(std::io::stderr()),
            );

        if let Some(path) = log_file {
            match std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                Ok(file) => {
                    dispatch = dispatch.chain(
                        fern::Dispatch::new()
                            .level(LevelFilter::Trace)
                            .chain(file),
                    );
                }
                Err(e) => eprintln!("unable to open log file {}: {e}", path.display()),
            }
        }

        // A logger installed elsewhere (e.g. by a test harness) wins.
        let _ = dispatch.apply();
    })
}
