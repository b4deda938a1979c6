use crate::{
    error::{Error, MalformedInput, UnreadableFile},
    loops::Loops,
};
use csv::{ReaderBuilder, StringRecord};
use geo::Coord;
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

/// Text in the first field that starts a new loop.
pub const LOOP_MARKER: &str = "# Object:";

/// Positional column layout, independent of any header in the file.
pub const COLUMNS: [&str; 6] = ["X", "Y", "Z", "R", "G", "B"];

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,

    /// First line is a header and carries no data.
    pub has_header: bool,

    /// Last row is a footer and carries no data.
    pub skip_last_row: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            skip_last_row: true,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Row {
    Marker(String),
    Vertex(Coord<f64>),
}

impl Row {
    fn classify(record: &StringRecord, line: u64) -> Result<Self, MalformedInput> {
        let first = record.get(0).unwrap_or_default();

        if first.contains(LOOP_MARKER) {
            let id = first.rsplit('/').next().unwrap_or(first);

            return Ok(Self::Marker(id.to_string()));
        }

        if record.len() != COLUMNS.len() {
            return Err(MalformedInput::ColumnCount {
                line,
                found: record.len(),
            });
        }

        Ok(Self::Vertex(Coord {
            x: parse_coordinate(record, 0, line)?,
            y: parse_coordinate(record, 1, line)?,
        }))
    }
}

fn parse_coordinate(record: &StringRecord, index: usize, line: u64) -> Result<f64, MalformedInput> {
    let value = record.get(index).unwrap_or_default();

    value
        .trim()
        .parse()
        .map_err(|_| MalformedInput::InvalidCoordinate {
            line,
            column: COLUMNS[index],
            value: value.to_string(),
        })
}

#[derive(Default)]
struct Scan {
    loops: Loops,
    current: Option<usize>,
}

impl Scan {
    fn accept(mut self, row: Row, line: u64) -> Result<Self, MalformedInput> {
        match row {
            Row::Marker(id) => {
                self.current = Some(self.loops.start(id));
            }
            Row::Vertex(coord) => {
                let Some(current) = self.current else {
                    return Err(MalformedInput::VertexBeforeMarker { line });
                };

                self.loops.push_vertex(current, coord);
            }
        }

        Ok(self)
    }
}

pub fn read_loops(path: &Path, options: &CsvOptions) -> Result<Loops, Error> {
    let file = File::open(path).map_err(UnreadableFile::Io)?;

    parse_loops(file, options)
}

pub fn parse_loops<R: Read>(reader: R, options: &CsvOptions) -> Result<Loops, Error> {
    let records = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(UnreadableFile::Csv)?;

    let data_rows = if options.skip_last_row {
        records.len().saturating_sub(1)
    } else {
        records.len()
    };

    debug!("Scanning {data_rows} CSV rows");

    let scan = records[..data_rows]
        .iter()
        .try_fold(Scan::default(), |scan, record| {
            let line = record.position().map_or(0, csv::Position::line);

            scan.accept(Row::classify(record, line)?, line)
        })?;

    Ok(scan.loops)
}
