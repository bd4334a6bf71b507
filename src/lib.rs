//! # DuckDB Label Extension
//!
//! A DuckDB extension turning dashboard summary data into printable shipping and
//! shelf labels directly from SQL queries.
//!
//! ## Features
//!
//! - **Summary input**: Read the `{columns, data}` summary exported by the dashboard host,
//!   as single files, worksheet bundles or glob patterns over many files
//! - **Row expansion**: Duplicate each row by its package count so every parcel gets a label
//! - **Label numbering**: Number labels after expansion for "parcel N of M" printing
//! - **Built-in layouts**: Templates for the supported retail partners and carriers,
//!   selected by the model field of each row
//! - **Custom layouts**: Placeholder templates registered per query
//! - **Printable page**: One HTML document with a print button
//!
//! ## Table Functions
//!
//! This extension registers three table functions:
//!
//! - `read_labels`: Expanded label rows with their fields
//! - `render_labels`: One rendered markup fragment per label
//! - `print_labels`: The printable document
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

mod bridge;
mod error;
mod extension;
mod helpers;
mod label;
mod summary;

use crate::extension::print_labels_table_function::PrintLabelsTableFunction;
use crate::extension::read_labels_table_function::ReadLabelsTableFunction;
use crate::extension::render_labels_table_function::RenderLabelsTableFunction;
use anyhow::{Context, Result};
use duckdb::Connection;
use duckdb_loadable_macros::duckdb_entrypoint_c_api;
use libduckdb_sys as ffi;

/// Extension entry point for DuckDB.
///
/// Registers `read_labels`, `render_labels` and `print_labels` on the connection.
///
/// # Errors
///
/// Returns an error if any table function fails to register with DuckDB.
#[duckdb_entrypoint_c_api()]
pub unsafe fn extension_entrypoint(connection: Connection) -> Result<()> {
    connection
        .register_table_function::<ReadLabelsTableFunction>("read_labels")
        .context("Failed to register read_labels table function")?;
    connection
        .register_table_function::<RenderLabelsTableFunction>("render_labels")
        .context("Failed to register render_labels table function")?;
    connection
        .register_table_function::<PrintLabelsTableFunction>("print_labels")
        .context("Failed to register print_labels table function")?;
    Ok(())
}
