//! Line-delimited inventory snapshots.
//!
//! One item per line, four comma-separated fields:
//!
//! ```text
//! title,course_code,price,seller
//! Algorithms,CS101,49.99,Alice
//! ```
//!
//! Lines are written in [`Inventory::list`] order and read back in file
//! order, so a save/load cycle reproduces the same listing. Lines that do
//! not decode (wrong field count, empty field, bad price) are skipped with
//! a warning rather than failing the whole load.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::Error;
use crate::market::Inventory;
use crate::types::{Item, Price};
use crate::Result;

/// Field separator
pub const SEPARATOR: char = ',';

const FIELDS: usize = 4;

/// Outcome of reading a snapshot
#[derive(Debug, Default)]
pub struct Restored {
    /// Rebuilt inventory
    pub inventory: Inventory,
    /// Lines turned into items
    pub loaded: usize,
    /// Non-blank lines that failed to decode
    pub skipped: usize,
}

/// Encode one item as a snapshot line (without the trailing newline)
///
/// # Errors
///
/// Returns [`Error::Unencodable`] if a text field contains the separator or
/// a line break.
pub fn encode_item(item: &Item) -> Result<String> {
    for (field, value) in [
        ("title", item.title()),
        ("course code", item.course_code()),
        ("seller", item.seller()),
    ] {
        if value.contains([SEPARATOR, '\n', '\r']) {
            return Err(Error::Unencodable { field });
        }
    }

    Ok(format!(
        "{title}{SEPARATOR}{course}{SEPARATOR}{price}{SEPARATOR}{seller}",
        title = item.title(),
        course = item.course_code(),
        price = item.price(),
        seller = item.seller(),
    ))
}

/// Decode one snapshot line
///
/// Fields are trimmed. The line number in errors is 0; [`read_inventory`]
/// reports real positions.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] for a wrong field count, an empty
/// field, or an unparsable price.
pub fn decode_line(line: &str) -> Result<Item> {
    decode_numbered(line, 0)
}

fn decode_numbered(line: &str, line_no: usize) -> Result<Item> {
    let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    let [title, course_code, price, seller] = fields[..] else {
        return Err(Error::malformed(
            line_no,
            format!("expected {FIELDS} fields, found {}", fields.len()),
        ));
    };

    if let Some(pos) = fields.iter().position(|f| f.is_empty()) {
        return Err(Error::malformed(line_no, format!("field {} is empty", pos + 1)));
    }

    let price = Price::from_str(price)
        .map_err(|e| Error::malformed(line_no, format!("bad price {price:?}: {e}")))?;

    Ok(Item::new(title, course_code, price, seller))
}

/// Write every item in list order
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns an I/O error from `out`, or [`Error::Unencodable`] for an item
/// that cannot be represented. Nothing is written past the failing item.
pub fn write_inventory<W: Write>(inventory: &Inventory, mut out: W) -> Result<usize> {
    let mut written = 0;
    for item in inventory.list() {
        writeln!(out, "{}", encode_item(item)?)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Rebuild an inventory from snapshot lines
///
/// Items are added in file order. Blank lines are ignored; malformed lines
/// are skipped and counted.
///
/// # Errors
///
/// Returns an I/O error from `input`. Malformed content is never an error.
pub fn read_inventory<R: BufRead>(input: R) -> Result<Restored> {
    let mut restored = Restored::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_numbered(&line, idx + 1) {
            Ok(item) => {
                restored.inventory.add_item(item);
                restored.loaded += 1;
            }
            Err(err) => {
                warn!(error = %err, "skipping snapshot line");
                restored.skipped += 1;
            }
        }
    }

    Ok(restored)
}

/// Save `inventory` to `path`
///
/// Writes a sibling `*.tmp` file first and renames it over `path`, so a
/// crash mid-write leaves the previous snapshot intact.
///
/// # Errors
///
/// Returns an I/O or encoding error. On error the original file is
/// untouched.
pub fn save(path: &Path, inventory: &Inventory) -> Result<usize> {
    let tmp = temp_path(path);
    let result = write_file(&tmp, inventory).and_then(|written| {
        fs::rename(&tmp, path)?;
        Ok(written)
    });

    match result {
        Ok(written) => {
            debug!(path = %path.display(), written, "snapshot saved");
            Ok(written)
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

fn write_file(path: &Path, inventory: &Inventory) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let written = write_inventory(inventory, &mut out)?;
    let file = out.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(written)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load a snapshot from `path`
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn load(path: &Path) -> Result<Restored> {
    let file = File::open(path)?;
    read_inventory(BufReader::new(file))
}
