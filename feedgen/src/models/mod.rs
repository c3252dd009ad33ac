//! Input data models

pub mod raw_record;

pub use raw_record::{decode_records, CreatedAt, FetchedRecords, RawRecord};
