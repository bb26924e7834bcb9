//! Record tools: fetch by id and OData filter queries.

pub mod get_record;
pub mod query_records;

pub use get_record::{GetRecordParams, GetRecordTool};
pub use query_records::{DEFAULT_MAX_RECORDS, QueryRecordsParams, QueryRecordsTool};
