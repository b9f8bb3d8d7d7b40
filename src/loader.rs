//! Dataset loading and normalization.
//!
//! Reads the raw CSV source once, canonicalizes the encoded columns, coerces
//! numeric fields, and drops rows without usable coordinates. The result is
//! memoized for the lifetime of the process, keyed by canonical path and
//! file modification time, so repeated interactions reuse one immutable
//! table.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
    time::SystemTime,
};

use anyhow::{Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use thiserror::Error;

use crate::data::{
    Availability, Dataset, PriceRange, Restaurant, parse_optional_f64, parse_optional_text,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Columns the source file must carry. Order is not significant and extra
/// columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "name",
    "latitude",
    "longitude",
    "averageRating",
    "priceRange",
    "asapPickupAvailable",
    "asapDeliveryAvailable",
    "asapDeliveryTimeMinutes",
    "asapPickupMinutes",
    "displayAddress",
];

/// Fatal loader failures. Row-level corruption is not represented here;
/// malformed rows are skipped with a warning and the load continues.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening dataset {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading header row of {path:?}")]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("decoding header row of {path:?} as {encoding}")]
    HeaderEncoding { path: PathBuf, encoding: &'static str },
    #[error("dataset {path:?} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Column positions resolved from the header row.
struct ColumnMap {
    name: usize,
    latitude: usize,
    longitude: usize,
    average_rating: usize,
    price_range: usize,
    pickup_available: usize,
    delivery_available: usize,
    delivery_minutes: usize,
    pickup_minutes: usize,
    display_address: usize,
}

impl ColumnMap {
    fn resolve(path: &Path, headers: &[String]) -> Result<Self, LoadError> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            name: position("name")?,
            latitude: position("latitude")?,
            longitude: position("longitude")?,
            average_rating: position("averageRating")?,
            price_range: position("priceRange")?,
            pickup_available: position("asapPickupAvailable")?,
            delivery_available: position("asapDeliveryAvailable")?,
            delivery_minutes: position("asapDeliveryTimeMinutes")?,
            pickup_minutes: position("asapPickupMinutes")?,
            display_address: position("displayAddress")?,
        })
    }
}

/// Parses and normalizes the source file into the in-memory table.
///
/// Structurally malformed rows and rows without usable coordinates are
/// skipped; field-level coercion failures null the field but keep the row.
/// Only an unopenable file or an unusable header row is fatal.
pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = open_csv_reader(BufReader::new(file), delimiter);

    let header_record = reader
        .byte_headers()
        .map_err(|source| LoadError::Header {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let headers =
        decode_record(&header_record, encoding).ok_or_else(|| LoadError::HeaderEncoding {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })?;
    let columns = ColumnMap::resolve(path, &headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping malformed row {}: {err}", row_idx + 2);
                skipped += 1;
                continue;
            }
        };
        let Some(decoded) = decode_record(&record, encoding) else {
            warn!(
                "Skipping row {} with undecodable {} bytes",
                row_idx + 2,
                encoding.name()
            );
            skipped += 1;
            continue;
        };
        match normalize_row(&columns, &decoded) {
            Some(restaurant) => rows.push(restaurant),
            None => {
                debug!("Dropping row {} without coordinates", row_idx + 2);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            "Normalized {} row(s) from {:?}; {} row(s) skipped",
            rows.len(),
            path,
            skipped
        );
    }
    Ok(Dataset::new(rows))
}

fn open_csv_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(reader)
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                None
            } else {
                Some(text.into_owned())
            }
        })
        .collect()
}

/// Normalizes a decoded row, or returns `None` when latitude or longitude is
/// unusable (geospatial rendering cannot tolerate missing coordinates).
fn normalize_row(columns: &ColumnMap, decoded: &[String]) -> Option<Restaurant> {
    let cell = |idx: usize| decoded.get(idx).map(String::as_str).unwrap_or("");
    let latitude = parse_optional_f64(cell(columns.latitude))?;
    let longitude = parse_optional_f64(cell(columns.longitude))?;
    Some(Restaurant {
        name: parse_optional_text(cell(columns.name)),
        latitude,
        longitude,
        average_rating: parse_optional_f64(cell(columns.average_rating)),
        price_range: PriceRange::from_tier_symbol(cell(columns.price_range)),
        pickup_available: Availability::from_bool_str(cell(columns.pickup_available)),
        delivery_available: Availability::from_bool_str(cell(columns.delivery_available)),
        delivery_minutes: parse_optional_f64(cell(columns.delivery_minutes)),
        pickup_minutes: parse_optional_f64(cell(columns.pickup_minutes)),
        display_address: parse_optional_text(cell(columns.display_address)),
    })
}

struct CacheEntry {
    modified: Option<SystemTime>,
    data: Arc<Dataset>,
}

static DATASET_CACHE: OnceLock<Mutex<HashMap<PathBuf, CacheEntry>>> = OnceLock::new();

/// Loads through the process-lifetime cache. A changed file modification
/// time invalidates the cached table; otherwise every caller shares one
/// immutable `Arc<Dataset>`.
pub fn load_cached(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Arc<Dataset>, LoadError> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let modified = std::fs::metadata(path)
        .ok()
        .and_then(|meta| meta.modified().ok());

    let cache = DATASET_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut entries = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = entries.get(&key)
        && entry.modified == modified
    {
        debug!("Dataset cache hit for {key:?}");
        return Ok(Arc::clone(&entry.data));
    }

    let data = Arc::new(load(path, delimiter, encoding)?);
    entries.insert(
        key,
        CacheEntry {
            modified,
            data: Arc::clone(&data),
        },
    );
    Ok(data)
}
