pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

pub use entities::Invoice;
pub use errors::{InvoiceError, RepositoryError};
pub use ports::{InvoiceRepository, StoredRow};
pub use value_objects::{FEE_RATE, InvoiceStatus, TAX_RATE, ValueObjectError};
