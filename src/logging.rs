use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "private-secretary";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;

/// Starts a file logger under the panel's data directory. Hosts with their
/// own logging setup can skip this; it must be called at most once per
/// process either way.
///
/// Dependency logs stay at WARN by default; the panel itself is more verbose
/// in debug builds. Override with `SECRETARY_LOG` or `RUST_LOG`.
pub fn init_logging(data_dir: &Path) -> Result<(), flexi_logger::FlexiLoggerError> {
    use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, Naming, WriteMode};

    std::fs::create_dir_all(data_dir)?;

    let default_spec = if cfg!(debug_assertions) {
        "warn,private_secretary=debug"
    } else {
        "warn,private_secretary=info"
    };
    let spec = std::env::var("SECRETARY_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| default_spec.to_string());

    Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(data_dir)
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .start()?;

    log::info!(
        "logger initialized dir={} rotate_size_bytes={LOG_ROTATE_SIZE_BYTES} keep_files={LOG_ROTATE_KEEP_FILES}",
        data_dir.display()
    );
    Ok(())
}
