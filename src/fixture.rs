//! Sample documents and the scoped gzip copies made from them.
//!
//! A [`GzipFixture`] owns a named temporary file; dropping it removes the
//! file, so each case gets a fresh copy and nothing outlives it.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, error};

use crate::error::SmokeError;

/// Fast compression is plenty for fixtures and keeps the suite quick.
pub const GZIP_LEVEL: u32 = 1;

/// Path of a named document inside the sample-docs directory.
pub fn resolve_document(sample_docs_dir: &Path, name: &str) -> PathBuf {
    sample_docs_dir.join(name)
}

/// Compresses `in_path` into `out_path` (created or truncated).
pub fn gzip_file(in_path: &Path, out_path: &Path) -> Result<(), SmokeError> {
    let out = File::create(out_path).map_err(|e| SmokeError::fixture(out_path, e))?;
    gzip_into(in_path, out).map_err(|e| SmokeError::fixture(in_path, e))
}

fn gzip_into<W: Write>(in_path: &Path, writer: W) -> io::Result<()> {
    let mut input = BufReader::new(File::open(in_path)?);
    let mut encoder = GzEncoder::new(writer, Compression::new(GZIP_LEVEL));
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()
}

/// Decompresses `in_path` into `out_path` (created or truncated).
pub fn gunzip_file(in_path: &Path, out_path: &Path) -> Result<(), SmokeError> {
    let input = File::open(in_path).map_err(|e| SmokeError::fixture(in_path, e))?;
    let mut decoder = GzDecoder::new(BufReader::new(input));
    let mut out = File::create(out_path).map_err(|e| SmokeError::fixture(out_path, e))?;
    io::copy(&mut decoder, &mut out).map_err(|e| SmokeError::fixture(in_path, e))?;
    Ok(())
}

/// Lowercase hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String, SmokeError> {
    let mut file = File::open(path).map_err(|e| SmokeError::fixture(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| SmokeError::fixture(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// `.pdf` for `paper.pdf`, empty when there is no extension.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Gzip copy of a sample document living in a temporary `<name><ext>.gz` file.
#[derive(Debug)]
pub struct GzipFixture {
    source: PathBuf,
    file: NamedTempFile,
}

impl GzipFixture {
    pub fn create(source: &Path) -> Result<Self, SmokeError> {
        let suffix = format!("{}.gz", dotted_extension(source));
        let file = tempfile::Builder::new()
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| {
                error!(error = ?e, "Failed to create temp file for gzip fixture");
                SmokeError::fixture(source, e)
            })?;
        gzip_into(source, file.as_file()).map_err(|e| {
            error!(error = ?e, source = %source.display(), "Failed to gzip fixture");
            SmokeError::fixture(source, e)
        })?;
        debug!(source = %source.display(), gz = %file.path().display(), "Created gzip fixture");
        Ok(GzipFixture {
            source: source.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Inflates the gzip copy into another temporary file that keeps the
    /// source extension, so the service can still detect the type by name.
    pub fn decompress(&self) -> Result<NamedTempFile, SmokeError> {
        let out = tempfile::Builder::new()
            .suffix(&dotted_extension(&self.source))
            .tempfile()
            .map_err(|e| SmokeError::fixture(&self.source, e))?;
        gunzip_file(self.path(), out.path())?;
        Ok(out)
    }
}
