pub mod config_service;
pub mod json_record_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::json_record_store::JsonRecordStore;
