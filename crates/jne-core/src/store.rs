use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::StoreError;

/// Holder of the canonical document text.
///
/// Sessions read through `load` and write through `commit`; a commit is only
/// issued with text that already parsed and serialized successfully.
pub trait DocumentStore {
    fn load(&self) -> Result<String, StoreError>;
    fn commit(&mut self, text: String) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    text: String,
    commits: usize,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), commits: 0 }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of successful commits since creation.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<String, StoreError> {
        Ok(self.text.clone())
    }

    fn commit(&mut self, text: String) -> Result<(), StoreError> {
        self.text = text;
        self.commits += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Zip the previous contents next to the file before each commit.
    pub backup_on_save: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { backup_on_save: true }
    }
}

/// A JSON document kept in a file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    opts: StoreOptions,
    last_backup: Option<PathBuf>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, opts: StoreOptions) -> Self {
        Self { path: path.into(), opts, last_backup: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_backup(&self) -> Option<&Path> {
        self.last_backup.as_deref()
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<String, StoreError> {
        fs::read_to_string(&self.path).map_err(|source| StoreError::Read { path: self.path.clone(), source })
    }

    fn commit(&mut self, text: String) -> Result<(), StoreError> {
        if self.opts.backup_on_save && self.path.is_file() {
            let dest = zip_backup_file(&self.path)
                .map_err(|source| StoreError::Backup { path: self.path.clone(), source })?;
            tracing::debug!(backup = %dest.display(), "backed up document");
            self.last_backup = Some(dest);
        }
        // Write beside the target and rename so readers never see a half-written file.
        let tmp = self.path.with_extension("jne-tmp");
        let write_err = |source| StoreError::Write { path: self.path.clone(), source };
        let written = fs::write(&tmp, text).and_then(|()| fs::rename(&tmp, &self.path));
        if written.is_err() {
            fs::remove_file(&tmp).ok();
        }
        written.map_err(write_err)
    }
}

// Zip backup of a single document (non-destructive)
pub fn zip_backup_file(file: &Path) -> io::Result<PathBuf> {
    if !file.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a file"));
    }
    let parent = file.parent().unwrap_or(Path::new("."));
    let entry_name = file.file_name().and_then(|s| s.to_str()).unwrap_or("document.json");
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let mut dest = parent.join(format!("{}_{}.zip", stem, ts));
    let mut n = 1;
    while dest.exists() {
        dest = parent.join(format!("{}_{}-{}.zip", stem, ts, n));
        n += 1;
    }

    let data = fs::read(file)?;
    let out = fs::File::create(&dest)?;
    let mut zip = zip::ZipWriter::new(out);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(entry_name, options)?;
    zip.write_all(&data)?;
    zip.finish()?;
    Ok(dest)
}
