pub mod convert;
#[allow(clippy::module_inception)]
pub mod dynamo;
pub mod error;
pub mod fake;
pub mod table;


pub use dynamo::DynamoTable;
pub use error::TableError;
pub use fake::FakeTable;
pub use table::Table;
