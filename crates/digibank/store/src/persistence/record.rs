//! Flat JSON records and their conversions to and from domain types.

mod account;
mod client;
mod tx;

pub use self::{account::AccountRecord, client::ClientRecord, tx::TransactionRecord};
