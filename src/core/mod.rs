pub mod dedup;
pub mod format;
pub mod mapper;
pub mod parser;
pub mod runner;

pub use crate::domain::model::{CanonicalCustomer, Customer, RawRecord, RunSummary};
pub use crate::domain::ports::{ConfigProvider, CustomerRepository, Storage};
pub use crate::utils::error::Result;
