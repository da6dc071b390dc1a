#![forbid(unsafe_code)]

mod engine;
mod error;
mod ledger;
mod record;

pub use engine::*;
pub use error::*;
pub use ledger::*;
pub use record::*;
