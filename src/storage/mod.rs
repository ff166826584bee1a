pub mod origin_store;

pub use origin_store::{OriginStorage, StorageUsage};
