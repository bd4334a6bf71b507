//! Data writing utilities for converting label values to DuckDB vectors.

use duckdb::core::FlatVector;
use duckdb::core::Inserter;

/// Writes a BIGINT value directly to a vector using pointer arithmetic.
pub(super) fn write_bigint(vector: &mut FlatVector, row: usize, value: usize) {
    write_primitive(vector, row, value as i64);
}

/// Writes a VARCHAR value, or NULL when the value is absent.
pub(super) fn write_varchar(vector: &mut FlatVector, row: usize, value: Option<&str>) {
    match value {
        Some(value) => vector.insert(row, value),
        None => vector.set_null(row),
    }
}

fn write_primitive<T>(vector: &mut FlatVector, index: usize, value: T) {
    unsafe {
        let pointer: *mut T = vector.as_mut_ptr();
        std::ptr::write(pointer.add(index), value);
    }
}
