use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Rotate log file if it exceeds `max_size`.
/// Keeps only the most recent `keep_size` bytes, starting at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max_size: u64, keep_size: u64) -> std::io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let metadata = fs::metadata(log_path)?;
    if metadata.len() <= max_size {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    let start_pos = metadata.len().saturating_sub(keep_size);

    file.seek(SeekFrom::Start(start_pos))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;

    Ok(())
}

/// A writer factory that produces writers for the shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

impl LogWriterFactory {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

/// A writer that holds a reference to the shared file
struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    // A panic while holding the lock leaves the file usable
    fn lock(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("screensim={level},screensim_core=warn");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize logging.
///
/// Without a `log_file`, logs go to stderr so they never mix with the report
/// on stdout. With one, they are appended to that file with size-based
/// rotation: when the log exceeds 5MB, older entries are removed keeping
/// only the last 1MB. The level can be controlled via `level` or the
/// `RUST_LOG` environment variable.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> color_eyre::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    let Some(log_path) = log_file else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
        return Ok(());
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if let Err(e) = rotate_log_if_needed(log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    registry
        .with(
            fmt::layer()
                .with_writer(LogWriterFactory::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "screensim logging initialized");
    Ok(())
}
