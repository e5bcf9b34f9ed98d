//! Loader: read local JSON artifacts (catalog, product layout, selection) and
//! return typed `combo_core` values. No network I/O.
//!
//! Catalog wire shape (one element per combination):
//!
//! ```json
//! [ { "Attributes": [ { "Id": 1, "ValueIds": [10] } ], "InStock": true } ]
//! ```
//!
//! Decoding is tolerant per combination: rows missing `Id` or `ValueIds` are
//! dropped, a missing `InStock` reads as out of stock and a missing
//! `Attributes` yields a combination with no rows. Only a non-array top level
//! is an error.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use combo_core::{
    AttributeId, AttributeRow, Catalog, Combination, ProductAttributes, Selection, ValueId,
    ValueSet,
};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::IoError;

/// Upper bound on any JSON input read from disk.
pub const MAX_JSON_BYTES: u64 = 16 * 1024 * 1024;

const K_ATTRIBUTES: &str = "Attributes";
const K_ID: &str = "Id";
const K_VALUE_IDS: &str = "ValueIds";
const K_IN_STOCK: &str = "InStock";

/// What the tolerant decoder had to skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub combinations: usize,
    pub dropped_rows: usize,
    pub dropped_values: usize,
    pub defaulted_stock: usize,
}

// ----------------------------- Raw reads -----------------------------

/// Read a file into a JSON value, refusing inputs above [`MAX_JSON_BYTES`].
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = File::open(path)?;
    let len = f.metadata()?.len();
    if len > MAX_JSON_BYTES {
        return Err(IoError::Limit(format!(
            "{} is {len} bytes (max {MAX_JSON_BYTES})",
            path.display()
        )));
    }
    let mut buf = Vec::with_capacity(len as usize);
    f.take(MAX_JSON_BYTES + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > MAX_JSON_BYTES {
        return Err(IoError::Limit(format!("{} grew past {MAX_JSON_BYTES} bytes", path.display())));
    }
    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })
}

// ----------------------------- Catalog codec -----------------------------

/// Decode the catalog wire array.
pub fn decode_catalog(v: &Value) -> Result<(Catalog, DecodeStats), IoError> {
    let items = v.as_array().ok_or_else(|| IoError::Json {
        pointer: "/".into(),
        msg: "catalog must be a JSON array of combinations".into(),
    })?;

    let mut stats = DecodeStats { combinations: items.len(), ..DecodeStats::default() };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        out.push(decode_combination(i, item, &mut stats));
    }

    if stats.dropped_rows > 0 || stats.dropped_values > 0 {
        warn!(
            dropped_rows = stats.dropped_rows,
            dropped_values = stats.dropped_values,
            "catalog contained malformed rows"
        );
    }
    debug!(combinations = stats.combinations, "catalog decoded");
    Ok((Catalog::new(out), stats))
}

fn decode_combination(index: usize, item: &Value, stats: &mut DecodeStats) -> Combination {
    let in_stock = match item.get(K_IN_STOCK).and_then(Value::as_bool) {
        Some(b) => b,
        None => {
            stats.defaulted_stock += 1;
            false
        }
    };

    let raw_rows = item.get(K_ATTRIBUTES).and_then(Value::as_array);
    let mut rows = Vec::with_capacity(raw_rows.map_or(0, Vec::len));
    for (j, raw) in raw_rows.into_iter().flatten().enumerate() {
        match decode_row(raw, stats) {
            Some(row) => rows.push(row),
            None => {
                stats.dropped_rows += 1;
                debug!(combination = index, row = j, "dropped catalog row without Id/ValueIds");
            }
        }
    }
    Combination::new(rows, in_stock)
}

fn decode_row(raw: &Value, stats: &mut DecodeStats) -> Option<AttributeRow> {
    let id = raw.get(K_ID).and_then(as_u32)?;
    let values = raw.get(K_VALUE_IDS).and_then(Value::as_array)?;
    let mut set = ValueSet::new();
    for v in values {
        match as_u32(v) {
            Some(n) => {
                set.insert(ValueId::new(n));
            }
            None => stats.dropped_values += 1,
        }
    }
    Some(AttributeRow { attribute_id: AttributeId::new(id), value_ids: set })
}

fn as_u32(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Encode a catalog back to its wire array (value ids ascending, rows in catalog order).
pub fn encode_catalog(catalog: &Catalog) -> Value {
    let items = catalog
        .iter()
        .map(|c| {
            let rows: Vec<Value> = c
                .rows()
                .iter()
                .map(|r| {
                    let ids: Vec<u32> = r.value_ids.iter().map(|v| v.get()).collect();
                    let mut m = Map::new();
                    m.insert(K_ID.into(), json!(r.attribute_id.get()));
                    m.insert(K_VALUE_IDS.into(), json!(ids));
                    Value::Object(m)
                })
                .collect();
            let mut m = Map::new();
            m.insert(K_ATTRIBUTES.into(), Value::Array(rows));
            m.insert(K_IN_STOCK.into(), Value::Bool(c.in_stock()));
            Value::Object(m)
        })
        .collect();
    Value::Array(items)
}

// ----------------------------- Targeted loaders -----------------------------

pub fn load_catalog(path: &Path) -> Result<Catalog, IoError> {
    let v = read_json_value_with_limits(path)?;
    let (catalog, _stats) = decode_catalog(&v)?;
    Ok(catalog)
}

/// `{"attributes":[{"id":1,"values":[10,11]}, ...]}`
pub fn load_product(path: &Path) -> Result<ProductAttributes, IoError> {
    let v = read_json_value_with_limits(path)?;
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/attributes".into(), msg: e.to_string() })
}

/// `[{"attribute_id":1,"values":[10]}, ...]`, in processing order.
pub fn load_selection(path: &Path) -> Result<Selection, IoError> {
    let v = read_json_value_with_limits(path)?;
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })
}
