//! Request payloads sent to the backend, each with its field rules.

pub mod accounting;
pub mod contacts;
pub mod inventory;
pub mod lines;
pub mod purchases;
pub mod sales;
pub mod tax;

pub use accounting::{AccountType, CreateAccountDto, CreateJournalEntryDto, JournalLineDto, UpdateAccountDto};
pub use contacts::{ContactKind, CreateContactDto, UpdateContactDto};
pub use inventory::{AdjustmentReason, CreateItemDto, StockAdjustmentDto, UpdateItemDto};
pub use lines::LineItemDto;
pub use purchases::{CreateBillDto, UpdateBillDto};
pub use sales::{CreateInvoiceDto, UpdateInvoiceDto};
pub use tax::{SubmitEInvoiceDto, UpdateTaxSettingsDto, SST_RATES};
