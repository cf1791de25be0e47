//! Entry-by-entry ZIP writing.

use crate::PackError;
use crate::Result;
use crate::report::PackReport;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Size of each read when copying a source file into an entry.
pub const CHUNK_SIZE: usize = 4096;

/// Deflate level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Writes named entries into a ZIP container over any seekable sink.
///
/// # Examples
///
/// ```
/// use treezip_core::PackReport;
/// use treezip_core::writer::EntryWriter;
/// use std::io::Cursor;
///
/// let mut report = PackReport::default();
/// let mut writer = EntryWriter::new(Cursor::new(Vec::new()), None);
/// writer.add_directory("root", &mut report)?;
/// writer.add_bytes("root/hello.txt", b"hi", &mut report)?;
/// let bytes = writer.finish()?.into_inner();
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), treezip_core::PackError>(())
/// ```
pub struct EntryWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    buffer: Box<[u8; CHUNK_SIZE]>,
}

impl<W: Write + Seek> EntryWriter<W> {
    /// Creates a writer using `compression_level` (`Some(0)` stores entries).
    pub fn new(sink: W, compression_level: Option<u8>) -> Self {
        Self {
            zip: ZipWriter::new(sink),
            options: file_options(compression_level),
            buffer: Box::new([0u8; CHUNK_SIZE]),
        }
    }

    /// Adds a zero-length directory marker named `<name>/`.
    pub fn add_directory(&mut self, name: &str, report: &mut PackReport) -> Result<()> {
        self.zip.add_directory(format!("{name}/"), self.options)?;
        report.directories_added += 1;
        Ok(())
    }

    /// Adds a file entry and copies the content of `source` into it.
    ///
    /// The file handle is closed before returning.
    pub fn add_file(&mut self, name: &str, source: &Path, report: &mut PackReport) -> Result<()> {
        let mut file = File::open(source).map_err(|e| PackError::from_access(source, e))?;

        let options = {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mode = file
                    .metadata()
                    .map_err(|e| PackError::from_access(source, e))?
                    .permissions()
                    .mode();
                self.options.unix_permissions(mode)
            }
            #[cfg(not(unix))]
            {
                self.options
            }
        };

        self.zip.start_file(name, options)?;

        let mut bytes_read = 0u64;
        loop {
            let n = match file.read(&mut self.buffer[..]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(PackError::Read {
                        path: source.to_path_buf(),
                        source: e,
                    });
                }
            };
            self.zip.write_all(&self.buffer[..n])?;
            bytes_read += n as u64;
        }

        report.files_added += 1;
        report.bytes_read += bytes_read;
        Ok(())
    }

    /// Adds a file entry from an in-memory buffer.
    pub fn add_bytes(&mut self, name: &str, data: &[u8], report: &mut PackReport) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        report.files_added += 1;
        report.bytes_read += data.len() as u64;
        Ok(())
    }

    /// Writes the central directory and returns the sink.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

fn file_options(compression_level: Option<u8>) -> SimpleFileOptions {
    match compression_level {
        Some(0) => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        level => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(
                level.unwrap_or(DEFAULT_COMPRESSION_LEVEL),
            ))),
    }
}
