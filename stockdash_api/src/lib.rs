//! Transport layer for the stock dashboard API: single-attempt HTTP calls,
//! wire types, and explicit response-shape decoders.

mod client;
mod errors;
pub mod hooks;
pub mod schema;
mod stock_code;
pub mod types;
pub use self::client::{Client, TransportConfig};
pub use self::errors::{Error, Method};
pub use self::schema::{decode, decode_list, DecodeError, FieldKind, Schema};
pub use self::stock_code::{StockCode, StockCodeError};
