//! Data models for sheets, statements and configuration.

pub mod config;
pub mod sheet;
pub mod statement;

pub use config::{PayloadMode, StmtConfig};
pub use sheet::{Cell, Row, Sheet};
pub use statement::{Block, FieldValue, Header, Record, ACCOUNT_KEY, ID_KEY};
