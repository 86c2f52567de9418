//! The driver contract shared by every gridlink table source.
//!
//! A driver opens a [Conn] from a connection string, the connection then
//! exposes schema introspection and whole-table row reads and writes.
//! Drivers are looked up by name through an explicit [DriverRegistry].

mod conn;
mod error;
mod registry;
mod row;
mod schema;

pub use self::conn::{Conn, Driver};
pub use self::error::DriverError;
pub use self::registry::DriverRegistry;
pub use self::row::{ColumnValue, GroupByKey, Row};
pub use self::schema::{Column, ColumnType, PrimaryKey, Schema};
