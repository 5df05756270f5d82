use csv::{ReaderBuilder, Trim};
use indexmap::map::{Entry, IndexMap};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{self, Read};
use thiserror::Error;

use super::file::{FileError, InputFile};

/// The integer type for genomic positions and chromosome lengths.
pub type Position = u64;

/// Column holding the species name.
pub const SPECIES_COLUMN: &str = "species";
/// Column holding the chromosome name, e.g. `1`, `X` or `XIV`.
pub const CHROMOSOME_COLUMN: &str = "chromosome";
/// Column holding the chromosome length in basepairs.
pub const LENGTH_COLUMN: &str = "chromosome length (bp)";
/// Column holding the first basepair of the centromeric region.
pub const CENTROMERE_START_COLUMN: &str = "centromeric region start";
/// Column holding the last basepair of the centromeric region.
pub const CENTROMERE_END_COLUMN: &str = "centromeric region end";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Table parsing error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    #[error("File reading error: {0}")]
    FileError(#[from] FileError),
    #[error("Required column '{0}' is missing from the table header")]
    MissingColumn(&'static str),
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

/// A single chromosome, with its centromeric region.
///
/// Records built by hand are not checked; [`ChromosomeRecord::validate`]
/// applies the same checks the table loader does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChromosomeRecord {
    pub id: String,
    /// Length in basepairs.
    pub length: Position,
    pub centromere_start: Position,
    pub centromere_end: Position,
}

impl ChromosomeRecord {
    pub fn new(
        id: &str,
        length: Position,
        centromere_start: Position,
        centromere_end: Position,
    ) -> Self {
        Self {
            id: id.to_string(),
            length,
            centromere_start,
            centromere_end,
        }
    }

    /// The centromere is placed at the midpoint of its region.
    pub fn centromere_position(&self) -> f64 {
        (self.centromere_start as f64 + self.centromere_end as f64) / 2.0
    }

    /// Checks the invariants a loaded record must satisfy, returning the
    /// reason for the first one violated.
    pub fn validate(&self) -> Result<(), String> {
        if self.length == 0 {
            return Err(format!("chromosome '{}' has zero length", self.id));
        }
        if self.centromere_start > self.centromere_end {
            return Err(format!(
                "centromeric region of chromosome '{}' starts after it ends ({} > {})",
                self.id, self.centromere_start, self.centromere_end
            ));
        }
        if self.centromere_position() > self.length as f64 {
            return Err(format!(
                "centromere of chromosome '{}' ({}) lies past its length ({})",
                self.id,
                self.centromere_position(),
                self.length
            ));
        }
        Ok(())
    }
}

/// The chromosomes of one species, keyed by chromosome name, in the order
/// they first appear in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpeciesChromosomes {
    chromosomes: IndexMap<String, ChromosomeRecord>,
}

impl SpeciesChromosomes {
    /// Insert a record, returning the record it replaced if this chromosome
    /// was already present. A replaced record keeps its original position.
    fn insert(&mut self, record: ChromosomeRecord) -> Option<ChromosomeRecord> {
        self.chromosomes.insert(record.id.clone(), record)
    }

    pub fn get(&self, id: &str) -> Option<&ChromosomeRecord> {
        self.chromosomes.get(id)
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Iterate over the chromosome records in table order.
    pub fn records(&self) -> impl Iterator<Item = &ChromosomeRecord> + Clone {
        self.chromosomes.values()
    }
}

/// All species and their chromosomes, as loaded from one table.
///
/// A `Dataset` cannot be modified once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    species: IndexMap<String, SpeciesChromosomes>,
}

/// Positions of the required columns in a table header.
struct Columns {
    species: usize,
    chromosome: usize,
    length: usize,
    centromere_start: usize,
    centromere_end: usize,
}

impl Columns {
    fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self, DatasetError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or(DatasetError::MissingColumn(name))
        };
        Ok(Columns {
            species: find(SPECIES_COLUMN)?,
            chromosome: find(CHROMOSOME_COLUMN)?,
            length: find(LENGTH_COLUMN)?,
            centromere_start: find(CENTROMERE_START_COLUMN)?,
            centromere_end: find(CENTROMERE_END_COLUMN)?,
        })
    }

    /// Parse one row into its species name and chromosome record.
    fn parse_row<S: AsRef<str>>(
        &self,
        fields: &[S],
        line: u64,
    ) -> Result<(String, ChromosomeRecord), DatasetError> {
        let species = text_field(fields, self.species, SPECIES_COLUMN, line)?.to_string();
        let record = ChromosomeRecord::new(
            text_field(fields, self.chromosome, CHROMOSOME_COLUMN, line)?,
            position_field(fields, self.length, LENGTH_COLUMN, line)?,
            position_field(fields, self.centromere_start, CENTROMERE_START_COLUMN, line)?,
            position_field(fields, self.centromere_end, CENTROMERE_END_COLUMN, line)?,
        );
        record
            .validate()
            .map_err(|reason| DatasetError::MalformedRow { line, reason })?;
        Ok((species, record))
    }
}

fn text_field<'a, S: AsRef<str>>(
    fields: &'a [S],
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'a str, DatasetError> {
    match fields.get(index).map(|f| f.as_ref().trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DatasetError::MalformedRow {
            line,
            reason: format!("missing value for '{}'", name),
        }),
    }
}

fn position_field<S: AsRef<str>>(
    fields: &[S],
    index: usize,
    name: &str,
    line: u64,
) -> Result<Position, DatasetError> {
    let value = text_field(fields, index, name, line)?;
    value.parse().map_err(|_| DatasetError::MalformedRow {
        line,
        reason: format!(
            "'{}' is not a valid non-negative integer for '{}'",
            value, name
        ),
    })
}

fn replaced_message(species: &str, id: &str, previous: Position, current: Position) -> String {
    format!(
        "species '{}' lists chromosome '{}' more than once; replacing length {} with {} from the later row",
        species, id, previous, current
    )
}

impl Dataset {
    /// Load a [`Dataset`] from a tab-separated centromere table.
    ///
    /// This method also supports reading directly from a gzip-compressed file.
    ///
    /// The table must have a header row naming at least these columns, in
    /// any order:
    ///
    /// ```text
    /// species         chromosome  chromosome length (bp)  centromeric region start  centromeric region end
    /// Homo sapiens    1           248956422               122026460                 125184587
    /// Homo sapiens    2           242193529               92188146                  94090557
    /// Mus musculus    1           195471971               110000                    3000000
    /// ```
    ///
    /// Other columns are ignored and lines starting with `#` are skipped.
    pub fn from_tsv(filepath: &str) -> Result<Dataset, DatasetError> {
        let input_file = InputFile::new(filepath);
        let dataset = Dataset::from_reader(input_file.reader()?)?;
        info!(
            "loaded {} chromosomes for {} species from '{}'",
            dataset.num_chromosomes(),
            dataset.len(),
            filepath
        );
        Ok(dataset)
    }

    /// Load a [`Dataset`] from any reader over a tab-separated table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let columns = Columns::from_header(header.as_slice())?;

        let mut dataset = Dataset::default();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let fields: Vec<&str> = record.iter().collect();
            let (species, chromosome) = columns.parse_row(fields.as_slice(), line)?;
            dataset.insert(species, chromosome);
        }
        Ok(dataset)
    }

    /// Build a [`Dataset`] from a header and already-split rows.
    ///
    /// Line numbers in errors count the header as line 1.
    pub fn from_rows<H, R, S>(header: &[H], rows: &[R]) -> Result<Dataset, DatasetError>
    where
        H: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let columns = Columns::from_header(header)?;
        let mut dataset = Dataset::default();
        for (i, row) in rows.iter().enumerate() {
            let (species, chromosome) = columns.parse_row(row.as_ref(), i as u64 + 2)?;
            dataset.insert(species, chromosome);
        }
        Ok(dataset)
    }

    /// Only used while loading; a loaded `Dataset` is never mutated.
    fn insert(&mut self, species: String, record: ChromosomeRecord) {
        let chromosomes = match self.species.entry(species.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("new species '{}'", entry.key());
                entry.insert(SpeciesChromosomes::default())
            }
        };
        let length = record.length;
        let id = record.id.clone();
        if let Some(previous) = chromosomes.insert(record) {
            warn!("{}", replaced_message(&species, &id, previous.length, length));
        }
    }

    /// Return the number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Return if no species were loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of chromosomes across all species.
    pub fn num_chromosomes(&self) -> usize {
        self.species.values().map(SpeciesChromosomes::len).sum()
    }

    pub fn get(&self, species: &str) -> Option<&SpeciesChromosomes> {
        self.species.get(species)
    }

    /// Iterate over species name and [`SpeciesChromosomes`] tuples, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpeciesChromosomes)> {
        self.species.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 5] = [
        "species",
        "chromosome",
        "chromosome length (bp)",
        "centromeric region start",
        "centromeric region end",
    ];

    fn human_chr1() -> [&'static str; 5] {
        ["Homo sapiens", "1", "248956422", "122026460", "125184587"]
    }

    #[test]
    fn test_centromere_is_region_midpoint() {
        let dataset = Dataset::from_rows(&HEADER, &[human_chr1()]).unwrap();
        let chr1 = dataset.get("Homo sapiens").unwrap().get("1").unwrap();
        assert_eq!(chr1.length, 248956422);
        assert_eq!(chr1.centromere_position(), 123605523.5);
    }

    #[test]
    fn test_read_fixture_table() {
        let dataset = Dataset::from_tsv("tests/data/centromeric-regions.tsv").unwrap();
        let species: Vec<&String> = dataset.iter().map(|(name, _)| name).collect();
        assert_eq!(
            species,
            vec!["Homo sapiens", "Mus musculus", "Saccharomyces cerevisiae"]
        );
        assert_eq!(dataset.get("Homo sapiens").unwrap().len(), 4);
        assert_eq!(dataset.get("Saccharomyces cerevisiae").unwrap().len(), 4);
        assert_eq!(dataset.num_chromosomes(), 11);

        let yeast_ids: Vec<&str> = dataset
            .get("Saccharomyces cerevisiae")
            .unwrap()
            .records()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(yeast_ids, vec!["I", "II", "III", "IV"]);

        for (_, chromosomes) in dataset.iter() {
            for record in chromosomes.records() {
                let c = record.centromere_position();
                assert!(c >= 0.0 && c <= record.length as f64);
            }
        }
    }

    #[test]
    fn test_loading_is_deterministic() {
        let first = Dataset::from_tsv("tests/data/centromeric-regions.tsv").unwrap();
        let second = Dataset::from_tsv("tests/data/centromeric-regions.tsv").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_chromosome_overwrites() {
        let rows = vec![
            vec!["Homo sapiens", "1", "100", "10", "20"],
            vec!["Homo sapiens", "2", "80", "30", "40"],
            vec!["Homo sapiens", "1", "200", "50", "70"],
        ];
        let dataset = Dataset::from_rows(&HEADER, &rows).unwrap();
        let human = dataset.get("Homo sapiens").unwrap();
        assert_eq!(human.len(), 2);
        let ids: Vec<&str> = human.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(human.get("1").unwrap(), &ChromosomeRecord::new("1", 200, 50, 70));
    }

    #[test]
    fn test_replaced_message_names_species() {
        let message = replaced_message("Mus musculus", "X", 100, 200);
        assert!(message.contains("'Mus musculus'"));
        assert!(message.contains("'X'"));
        assert!(message.contains("replacing length 100 with 200"));
    }

    #[test]
    fn test_validate_hand_built_records() {
        assert!(ChromosomeRecord::new("1", 248956422, 122026460, 125184587)
            .validate()
            .is_ok());
        assert!(ChromosomeRecord::new("dot", 0, 0, 0).validate().is_err());
        assert!(ChromosomeRecord::new("1", 100, 30, 20).validate().is_err());
        let reason = ChromosomeRecord::new("1", 100, 150, 170)
            .validate()
            .unwrap_err();
        assert!(reason.contains("past its length"));
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let header = [
            "centromeric region end",
            "notes",
            "chromosome",
            "species",
            "centromeric region start",
            "chromosome length (bp)",
        ];
        let rows = [["20", "acrocentric", "X", "Mus musculus", "10", "100"]];
        let dataset = Dataset::from_rows(&header, &rows).unwrap();
        let x = dataset.get("Mus musculus").unwrap().get("X").unwrap();
        assert_eq!(x, &ChromosomeRecord::new("X", 100, 10, 20));
    }

    #[test]
    fn test_missing_column() {
        let header = ["species", "chromosome", "chromosome length (bp)"];
        let rows: [[&str; 3]; 0] = [];
        let err = Dataset::from_rows(&header, &rows).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn(CENTROMERE_START_COLUMN)
        ));
    }

    #[test]
    fn test_non_numeric_field() {
        let rows = [
            human_chr1(),
            ["Homo sapiens", "2", "242193529", "unknown", "94090557"],
        ];
        match Dataset::from_rows(&HEADER, &rows).unwrap_err() {
            DatasetError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("unknown"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_short_and_empty_fields() {
        let short = [vec!["Homo sapiens", "1", "248956422"]];
        assert!(matches!(
            Dataset::from_rows(&HEADER, &short).unwrap_err(),
            DatasetError::MalformedRow { line: 2, .. }
        ));

        let empty = [["", "1", "100", "10", "20"]];
        assert!(matches!(
            Dataset::from_rows(&HEADER, &empty).unwrap_err(),
            DatasetError::MalformedRow { line: 2, .. }
        ));
    }

    #[test]
    fn test_invalid_centromeric_regions() {
        let reversed = [["Homo sapiens", "1", "100", "30", "20"]];
        assert!(Dataset::from_rows(&HEADER, &reversed).is_err());

        let past_end = [["Homo sapiens", "1", "100", "150", "170"]];
        assert!(Dataset::from_rows(&HEADER, &past_end).is_err());

        let zero_length = [["Homo sapiens", "1", "0", "0", "0"]];
        assert!(Dataset::from_rows(&HEADER, &zero_length).is_err());

        // a region running past the end is allowed while its midpoint is inside
        let overhang = [["Homo sapiens", "1", "100", "90", "105"]];
        assert!(Dataset::from_rows(&HEADER, &overhang).is_ok());
    }

    #[test]
    fn test_from_reader_comments_and_line_numbers() {
        let table = "\
species\tchromosome\tchromosome length (bp)\tcentromeric region start\tcentromeric region end
# assembled from several sources
Gallus gallus\t1\t196202544\t  76957355 \t77194521
";
        let dataset = Dataset::from_reader(table.as_bytes()).unwrap();
        let chr1 = dataset.get("Gallus gallus").unwrap().get("1").unwrap();
        assert_eq!(chr1.centromere_start, 76957355);

        let broken = "\
species\tchromosome\tchromosome length (bp)\tcentromeric region start\tcentromeric region end
Gallus gallus\t1\t196202544\t76957355\t77194521
Gallus gallus\tZ\tnot-a-number\t1\t2
";
        match Dataset::from_reader(broken.as_bytes()).unwrap_err() {
            DatasetError::MalformedRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {}", other),
        }
    }
}
