//! Turbine records: the canonical shape, validation and file I/O.

mod batch;
mod dates;
mod io;
mod types;

pub use batch::RecordBatch;
pub use io::{read_records, records_json, write_records, RecordIoError};
pub use types::{MatchMethod, TurbineRecord};
