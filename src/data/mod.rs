//! Data parsing and handling module
//!
//! Readers for delimited text and JSON, the [`DataProcessor`] that validates
//! and reshapes datasets for charts, and the [`DataOptimizer`] that shrinks
//! them before rendering.
//!
//! ## Performance
//!
//! Delimited files above the eager size or row cap are loaded through polars
//! (`load_csv_frame`), then converted into the same `TabularDataset` shape.
//!
//! ## Error Handling
//!
//! Loading returns `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `NotFound`: the input path does not exist
//! - `Csv`/`Json`/`Parse`: malformed or non-tabular input
//! - `Io`: File system errors
//!
//! Column-selection failures during transformation are `TransformError`s.

mod csv_parser;
mod error;
mod infer;
mod json_parser;
mod lazy_source;
mod optimizer;
mod processor;

pub use csv_parser::*;
pub use error::*;
pub use infer::*;
pub use json_parser::*;
pub use lazy_source::*;
pub use optimizer::*;
pub use processor::*;
