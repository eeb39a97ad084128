//! Data module - CSV loading and normalization

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError, SickLeaveData};
pub use processor::{AGE, GENDER, WORK_DAYS};
