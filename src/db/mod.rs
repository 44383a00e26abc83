pub mod file;
pub mod pool;
pub mod schema;

pub use file::DataFile;
pub use pool::{StoreError, StorePool};
pub use schema::{StoreDocument, STORE_VERSION};
