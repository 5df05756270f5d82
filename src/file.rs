//! Plaintext and gzip-compressed file input and output.
//!
//! Centromere tables are often shipped gzip-compressed next to the genome
//! assemblies they describe, and rendered pages can get large for genomes
//! with many scaffolds, so both directions handle gzip transparently.
//!
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    #[error("could not open '{0}': {1}")]
    OpenError(String, io::Error),
}

/// Check if a file is gzipped by looking for the magic numbers.
///
/// Files shorter than the two magic bytes are never gzipped.
fn is_gzipped_file(file_path: &str) -> io::Result<bool> {
    let file = File::open(file_path)?;
    let mut buffer = Vec::with_capacity(2);
    file.take(2).read_to_end(&mut buffer)?;
    Ok(buffer == [0x1f, 0x8b])
}

/// An input table, possibly gzip-compressed.
pub struct InputFile {
    pub filepath: String,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    pub fn new(filepath: &str) -> Self {
        Self {
            filepath: filepath.to_string(),
        }
    }

    /// Opens the file and returns a buffered reader.
    ///
    /// Compression is detected from the file contents, not the extension,
    /// so a gzipped table saved as `.tsv` still reads correctly.
    pub fn reader(&self) -> Result<BufReader<Box<dyn Read>>, FileError> {
        let file = File::open(&self.filepath)
            .map_err(|e| FileError::OpenError(self.filepath.clone(), e))?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

/// An output file, written gzip-compressed when its path ends in `.gz`.
pub struct OutputFile {
    pub filepath: String,
    pub header: Option<Vec<String>>,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - the path to write to. A `.gz` extension turns on compression.
    /// * `header` - optional lines written first, each prefixed with `#`.
    pub fn new(filepath: &str, header: Option<Vec<String>>) -> Self {
        Self {
            filepath: filepath.to_string(),
            header,
        }
    }

    pub fn is_gzipped(&self) -> bool {
        self.filepath.ends_with(".gz")
    }

    /// Creates the file and returns a buffered writer, with any header
    /// lines already written.
    pub fn writer(&self) -> Result<Box<dyn Write>, FileError> {
        let outfile = File::create(&self.filepath)
            .map_err(|e| FileError::OpenError(self.filepath.clone(), e))?;
        let mut writer: Box<dyn Write> = if self.is_gzipped() {
            Box::new(BufWriter::new(GzEncoder::new(
                outfile,
                Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(outfile))
        };
        if let Some(entries) = &self.header {
            for entry in entries {
                writeln!(writer, "#{}", entry)?;
            }
        }
        Ok(writer)
    }
}
