//! Solution dump formats.
//!
//! Binary format, one fixed-size record per stored position, no header:
//! - 25 big-endian i32 (100 bytes):
//!   - Board: 9 cells
//!   - Player A remaining pieces: 3 counts (size 1, 2, 3)
//!   - Player B remaining pieces: 3 counts
//!   - Value: -1, 0 or 1 (player A's point of view)
//!   - Best successor board: 9 cells
//!
//! JSON format: a list of `[depth, value, board, best]` arrays.
//!
//! Records are written in the order given; `Record::from_table` sorts them
//! by depth, board and inventories so equal solves produce identical files.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh64::{xxh64, Xxh64};

use matrioshka_core::board::CELLS;
use matrioshka_core::{Board, PieceSet, Record, Value};

const FIELDS: usize = 25;
pub const RECORD_SIZE: usize = FIELDS * 4;

/// Output format of a dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Fixed-size big-endian records
    Bin,
    /// List of [depth, value, board, best]
    Json,
}

impl Format {
    pub fn default_path(self) -> &'static str {
        match self {
            Format::Bin => "data/solution.dat",
            Format::Json => "data/solution.json",
        }
    }
}

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dump ends inside record {index} ({bytes} of {RECORD_SIZE} bytes)")]
    Truncated { index: usize, bytes: usize },

    #[error("record {index}: {field} holds {value}")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: i32,
    },
}

impl DumpError {
    fn io(operation: &'static str) -> impl FnOnce(io::Error) -> DumpError {
        move |source| DumpError::Io { operation, source }
    }
}

/// What a writer produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpSummary {
    pub records: usize,
    /// xxh64 of every byte written
    pub checksum: u64,
}

/// One JSON entry: `[depth, value, board, best]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRecord(pub u8, pub i32, pub [i8; CELLS], pub [i8; CELLS]);

impl From<&Record> for JsonRecord {
    fn from(record: &Record) -> Self {
        JsonRecord(record.depth(), record.value.to_i32(), record.board.0, record.best.0)
    }
}

fn encode(record: &Record) -> [u8; RECORD_SIZE] {
    let mut fields = [0i32; FIELDS];
    for (i, &cell) in record.board.cells().iter().enumerate() {
        fields[i] = cell as i32;
    }
    for size in 0..3 {
        fields[9 + size] = record.max_pieces.0[size] as i32;
        fields[12 + size] = record.min_pieces.0[size] as i32;
    }
    fields[15] = record.value.to_i32();
    for (i, &cell) in record.best.cells().iter().enumerate() {
        fields[16 + i] = cell as i32;
    }

    let mut bytes = [0u8; RECORD_SIZE];
    for (chunk, field) in bytes.chunks_exact_mut(4).zip(fields) {
        chunk.copy_from_slice(&field.to_be_bytes());
    }
    bytes
}

fn decode(index: usize, bytes: &[u8; RECORD_SIZE]) -> Result<Record, DumpError> {
    let mut fields = [0i32; FIELDS];
    for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(4)) {
        *field = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let cell = |field: &'static str, value: i32| -> Result<i8, DumpError> {
        if (-3..=3).contains(&value) {
            Ok(value as i8)
        } else {
            Err(DumpError::OutOfRange { index, field, value })
        }
    };
    let count = |field: &'static str, value: i32| -> Result<u8, DumpError> {
        if (0..=2).contains(&value) {
            Ok(value as u8)
        } else {
            Err(DumpError::OutOfRange { index, field, value })
        }
    };

    let mut board = [0i8; CELLS];
    let mut best = [0i8; CELLS];
    for i in 0..CELLS {
        board[i] = cell("board", fields[i])?;
        best[i] = cell("best", fields[16 + i])?;
    }
    let mut max_pieces = [0u8; 3];
    let mut min_pieces = [0u8; 3];
    for size in 0..3 {
        max_pieces[size] = count("player A pieces", fields[9 + size])?;
        min_pieces[size] = count("player B pieces", fields[12 + size])?;
    }
    let value = Value::from_i32(fields[15]).ok_or(DumpError::OutOfRange {
        index,
        field: "value",
        value: fields[15],
    })?;

    Ok(Record {
        board: Board(board),
        max_pieces: PieceSet(max_pieces),
        min_pieces: PieceSet(min_pieces),
        value,
        best: Board(best),
    })
}

/// Write binary records.
pub fn write_binary<W: Write>(mut writer: W, records: &[Record]) -> Result<DumpSummary, DumpError> {
    let mut hasher = Xxh64::new(0);
    for record in records {
        let bytes = encode(record);
        hasher.update(&bytes);
        writer.write_all(&bytes).map_err(DumpError::io("write record"))?;
    }
    writer.flush().map_err(DumpError::io("flush dump"))?;

    Ok(DumpSummary {
        records: records.len(),
        checksum: hasher.digest(),
    })
}

/// Read binary records until end of input.
pub fn read_binary<R: Read>(mut reader: R) -> Result<Vec<Record>, DumpError> {
    let mut records = Vec::new();
    let mut bytes = [0u8; RECORD_SIZE];
    loop {
        let filled = fill(&mut reader, &mut bytes)?;
        match filled {
            0 => return Ok(records),
            RECORD_SIZE => records.push(decode(records.len(), &bytes)?),
            partial => {
                return Err(DumpError::Truncated {
                    index: records.len(),
                    bytes: partial,
                })
            }
        }
    }
}

/// Read until `buf` is full or input ends; returns the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, DumpError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DumpError::io("read record")(e)),
        }
    }
    Ok(filled)
}

/// Write the JSON list form.
pub fn write_json<W: Write>(mut writer: W, records: &[Record]) -> Result<DumpSummary, DumpError> {
    let entries: Vec<JsonRecord> = records.iter().map(JsonRecord::from).collect();
    let bytes = serde_json::to_vec(&entries)?;
    writer.write_all(&bytes).map_err(DumpError::io("write json"))?;
    writer.flush().map_err(DumpError::io("flush dump"))?;

    Ok(DumpSummary {
        records: records.len(),
        checksum: xxh64(&bytes, 0),
    })
}

/// Read the JSON list form.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<JsonRecord>, DumpError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Save records to `path` in `format`, creating parent directories.
pub fn save(path: &Path, format: Format, records: &[Record]) -> Result<DumpSummary, DumpError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(DumpError::io("create dump directory"))?;
        }
    }
    let file = File::create(path).map_err(DumpError::io("create dump"))?;
    let writer = BufWriter::new(file);
    match format {
        Format::Bin => write_binary(writer, records),
        Format::Json => write_json(writer, records),
    }
}

/// Load a binary dump from `path`.
pub fn load_binary(path: &Path) -> Result<Vec<Record>, DumpError> {
    let file = File::open(path).map_err(DumpError::io("open dump"))?;
    read_binary(BufReader::new(file))
}

/// xxh64 of a file's contents, comparable with `DumpSummary::checksum`.
pub fn checksum_file(path: &Path) -> Result<u64, DumpError> {
    let mut file = BufReader::new(File::open(path).map_err(DumpError::io("open dump"))?);
    let mut hasher = Xxh64::new(0);
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = fill(&mut file, &mut buf)?;
        if n == 0 {
            return Ok(hasher.digest());
        }
        hasher.update(&buf[..n]);
    }
}
