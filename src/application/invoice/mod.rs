pub mod create_invoice;
pub mod list_invoices;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase};
pub use list_invoices::{ListInvoicesCommand, ListInvoicesUseCase};
