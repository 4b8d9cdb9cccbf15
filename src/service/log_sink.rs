//! Self-bounding operator log file.
//!
//! Every entry is one `[YYYY-MM-DD HH:MM:SS UTC] message` line. The file is kept under
//! `MAX_BYTES` by truncating from the front and under `RETENTION_DAYS` by pruning old lines
//! every `PRUNE_EVERY` writes. No operation here ever returns an error to the caller; I/O
//! failures are reported through `tracing` and the entry is dropped.

use std::{
    io::{self, SeekFrom},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tokio::{
    fs::{self, OpenOptions},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::Mutex,
};

use crate::data::guild_store::{GuildStore, Scope, LOG_WRITES};

/// Size cap of the log file in bytes.
pub const MAX_BYTES: u64 = 1_000_000;
/// Lines older than this are removed by pruning.
pub const RETENTION_DAYS: i64 = 14;
/// Pruning runs on every Nth write.
pub const PRUNE_EVERY: u64 = 50;
/// The write counter is persisted on every Nth write.
pub const PERSIST_EVERY: u64 = 10;
/// Bytes read from the end of the file by `tail`.
const TAIL_WINDOW: u64 = 1_200_000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only log file shared by every log producer in the process.
pub struct LogSink {
    path: PathBuf,
    store: GuildStore,
    /// Write counter; the mutex also serializes append, prune and truncate.
    writes: Mutex<u64>,
}

impl LogSink {
    /// Opens the sink and restores the persisted write counter.
    ///
    /// A counter that cannot be read starts from zero.
    ///
    /// # Arguments
    /// - `path` - Log file location; created on first append
    /// - `store` - Store holding the persisted counter
    ///
    /// # Returns
    /// - `LogSink` - Ready to append
    pub async fn load(path: impl Into<PathBuf>, store: GuildStore) -> Self {
        let writes = match store.get::<u64>(Scope::Global, LOG_WRITES).await {
            Ok(writes) => writes,
            Err(e) => {
                tracing::warn!("Failed to load log write counter: {}", e);
                0
            }
        };

        Self {
            path: path.into(),
            store,
            writes: Mutex::new(writes),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory write counter.
    pub async fn writes(&self) -> u64 {
        *self.writes.lock().await
    }

    /// Appends a timestamped entry.
    ///
    /// Runs age pruning on every `PRUNE_EVERY`th write, persists the counter on every
    /// `PERSIST_EVERY`th write and truncates the file whenever it exceeds `MAX_BYTES`.
    pub async fn append(&self, message: &str) {
        let mut writes = self.writes.lock().await;
        let now = Utc::now();

        let line = format!("[{} UTC] {}\n", now.format(TIMESTAMP_FORMAT), message);
        if let Err(e) = append_line(&self.path, &line).await {
            tracing::warn!("Dropped log entry, failed to write {}: {}", self.path.display(), e);
            return;
        }

        *writes += 1;

        if *writes % PRUNE_EVERY == 0 {
            if let Err(e) = prune(&self.path, now - Duration::days(RETENTION_DAYS)).await {
                tracing::warn!("Failed to prune {}: {}", self.path.display(), e);
            }
        }

        if *writes % PERSIST_EVERY == 0 {
            if let Err(e) = self.store.set(Scope::Global, LOG_WRITES, &*writes).await {
                tracing::warn!("Failed to persist log write counter: {}", e);
            }
        }

        if let Err(e) = truncate_if_oversized(&self.path, MAX_BYTES).await {
            tracing::warn!("Failed to truncate {}: {}", self.path.display(), e);
        }
    }

    /// Returns up to the last `n` non-blank lines joined by newlines.
    ///
    /// Reads at most `TAIL_WINDOW` bytes from the end of the file and decodes them
    /// lossily, so a concurrent writer can never make this fail. A missing file or any
    /// I/O error yields an empty string.
    pub async fn tail(&self, n: usize) -> String {
        if n == 0 {
            return String::new();
        }

        let text = match read_from_end(&self.path, TAIL_WINDOW).await {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                }
                return String::new();
            }
        };

        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        lines[lines.len().saturating_sub(n)..].join("\n")
    }

    /// Deletes the log file; the next append recreates it.
    pub async fn clear(&self) {
        let _writes = self.writes.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to delete {}: {}", self.path.display(), e),
        }
    }
}

async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

/// Reads up to `window` trailing bytes and decodes them lossily.
async fn read_from_end(path: &Path, window: u64) -> io::Result<String> {
    let mut file = fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let start = len.saturating_sub(window);
    file.seek(SeekFrom::Start(start)).await?;

    let mut bytes = Vec::with_capacity((len - start) as usize);
    file.read_to_end(&mut bytes).await?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Keeps only the trailing `max_bytes` of the file, starting at a line boundary.
async fn truncate_if_oversized(path: &Path, max_bytes: u64) -> io::Result<()> {
    let len = match fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if len <= max_bytes {
        return Ok(());
    }

    let text = read_from_end(path, max_bytes).await?;
    let kept = drop_partial_first_line(&text, max_bytes as usize);
    fs::write(path, kept.as_bytes()).await
}

/// Trims `text` to at most `max_bytes`, discarding everything up to the first newline
/// of the cut so the result never starts inside a line.
fn drop_partial_first_line(text: &str, max_bytes: usize) -> &str {
    // Lossy decoding can grow the text, so re-apply the byte bound.
    let mut start = text.len().saturating_sub(max_bytes);
    while !text.is_char_boundary(start) {
        start += 1;
    }

    match text[start..].find('\n') {
        Some(idx) => &text[start + idx + 1..],
        None => "",
    }
}

/// Removes lines stamped before `cutoff`. Lines without a parseable stamp are kept.
async fn prune(path: &Path, cutoff: DateTime<Utc>) -> io::Result<()> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let text = String::from_utf8_lossy(&bytes);

    let mut kept = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match line_timestamp(line) {
            Some(stamp) if stamp < cutoff => {}
            _ => kept.push_str(line),
        }
    }

    if kept.len() != text.len() {
        fs::write(path, kept.as_bytes()).await?;
    }

    Ok(())
}

/// Parses the `[YYYY-MM-DD HH:MM:SS UTC]` prefix of a log line.
fn line_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let rest = line.strip_prefix('[')?;
    let (stamp, _) = rest.split_once(']')?;
    let stamp = stamp.strip_suffix(" UTC").unwrap_or(stamp);

    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
