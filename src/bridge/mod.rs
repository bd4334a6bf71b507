use duckdb::vtab::Value;
use libduckdb_sys::duckdb_free;
use libduckdb_sys::duckdb_get_bool;
use libduckdb_sys::duckdb_get_map_key;
use libduckdb_sys::duckdb_get_map_size;
use libduckdb_sys::duckdb_get_map_value;
use libduckdb_sys::duckdb_get_varchar;
use libduckdb_sys::duckdb_is_null_value;
use libduckdb_sys::duckdb_value;
use std::ffi::CStr;
use std::os::raw::c_void;

/// Read access to DuckDB parameter values that `duckdb::vtab::Value` does not expose.
pub(crate) trait ValueBridge {
    /// Gets the raw pointer to the underlying DuckDB value
    ///
    /// # Safety
    /// This method is unsafe as it accesses raw pointers and makes assumptions
    /// about the internal memory layout of DuckDB values
    fn get_value_ptr(&self) -> duckdb_value;

    /// Returns true for a SQL NULL
    fn is_null(&self) -> bool {
        unsafe { duckdb_is_null_value(self.get_value_ptr()) }
    }

    /// Converts the value to a boolean
    fn to_bool(&self) -> bool {
        unsafe { duckdb_get_bool(self.get_value_ptr()) }
    }

    /// Converts the value to a UTF-8 string
    ///
    /// The returned string is owned and memory is properly managed
    fn to_varchar(&self) -> String {
        unsafe {
            let varchar = duckdb_get_varchar(self.get_value_ptr());
            let c_str = CStr::from_ptr(varchar);
            let string = c_str.to_string_lossy().into_owned();
            duckdb_free(varchar as *mut c_void);
            string
        }
    }

    /// Converts the value to a vector of key-value pairs (map type)
    fn to_map_entries(&self) -> Vec<(Value, Value)> {
        unsafe {
            let size = duckdb_get_map_size(self.get_value_ptr());
            (0..size)
                .map(|index| {
                    (
                        Value::from(duckdb_get_map_key(self.get_value_ptr(), index)),
                        Value::from(duckdb_get_map_value(self.get_value_ptr(), index)),
                    )
                })
                .collect()
        }
    }
}

impl ValueBridge for Value {
    /// # DANGER: Highly unstable memory layout hack
    ///
    /// This implementation assumes that `Value` is a simple wrapper around a single
    /// `duckdb_value` field with no additional data or padding.
    ///
    /// **DO NOT USE DIRECTLY**
    fn get_value_ptr(&self) -> duckdb_value {
        // Reinterpret the Value reference as the duckdb_value it wraps
        unsafe { *(self as *const Value as *const duckdb_value) }
    }
}
