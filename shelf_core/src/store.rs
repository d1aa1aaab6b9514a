//! File-backed stores for the catalog.
//!
//! A store is read once at startup and written once at shutdown. Two
//! backends share the `CatalogStore` trait: the `;`-separated row format
//! from [`crate::codec`] and a whole-catalog JSON document.

use crate::library::Library;
use crate::{codec, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

/// Backing store trait for importing and exporting the catalog
pub trait CatalogStore {
    /// Read the whole catalog
    ///
    /// `Error::DataImport` when the store is missing or unreadable,
    /// `Error::InvalidData` when it holds a malformed record.
    fn import(&self) -> Result<Library>;

    /// Replace the store's contents with `library`
    ///
    /// Any failure is reported as `Error::DataExport`.
    fn export(&self, library: &Library) -> Result<()>;

    /// Location of the backing file
    fn path(&self) -> &Path;
}

/// On-disk format of the backing store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Csv,
    Json,
}

impl FileFormat {
    /// File name used inside the data directory
    pub fn default_file_name(self) -> &'static str {
        match self {
            FileFormat::Csv => "library.csv",
            FileFormat::Json => "library.json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            other => Err(format!("unknown file format '{}' (expected csv or json)", other)),
        }
    }
}

/// Build the store for `format` at `path`
pub fn open_store(format: FileFormat, path: impl Into<PathBuf>) -> Box<dyn CatalogStore> {
    match format {
        FileFormat::Csv => Box::new(CsvFileStore::new(path)),
        FileFormat::Json => Box::new(JsonFileStore::new(path)),
    }
}

fn open_for_read(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(Error::DataImport(format!(
            "no data file at {}",
            path.display()
        )));
    }
    let file = File::open(path)
        .map_err(|e| Error::DataImport(format!("cannot open {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

/// Write through a temp file in the same directory, then rename over `path`
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn export_error(path: &Path, err: Error) -> Error {
    Error::DataExport(format!("cannot write {}: {}", path.display(), err))
}

// ============================================================================
// Row (CSV) store
// ============================================================================

/// Store using the `;`-separated row format
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogStore for CsvFileStore {
    fn import(&self) -> Result<Library> {
        let reader = open_for_read(&self.path)?;
        codec::read_library(reader)
    }

    fn export(&self, library: &Library) -> Result<()> {
        write_atomically(&self.path, |writer| codec::write_library(library, writer))
            .map_err(|e| export_error(&self.path, e))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// JSON store
// ============================================================================

/// Store holding the catalog as one JSON document
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogStore for JsonFileStore {
    fn import(&self) -> Result<Library> {
        let reader = open_for_read(&self.path)?;
        let parsed: Library = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::DataImport(e.to_string())
            } else {
                Error::InvalidData {
                    line: e.line(),
                    reason: e.to_string(),
                }
            }
        })?;

        // Re-add every record so a hand-edited file cannot smuggle in duplicates.
        let mut library = Library::new();
        for publication in parsed.publications() {
            library
                .add_publication(publication.clone())
                .map_err(|e| Error::InvalidData {
                    line: 0,
                    reason: e.to_string(),
                })?;
        }
        for user in parsed.users() {
            library.add_user(user.clone()).map_err(|e| Error::InvalidData {
                line: 0,
                reason: e.to_string(),
            })?;
        }
        Ok(library)
    }

    fn export(&self, library: &Library) -> Result<()> {
        write_atomically(&self.path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, library)?;
            writer.write_all(b"\n")?;
            Ok(())
        })
        .map_err(|e| export_error(&self.path, e))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
