//! matchmaking-protocol
//!
//! Wire-level encoding/decoding for the matchmaking queue.
//!
//! This crate turns logical engine messages
//! (`matchmaking_core::Request` / `Response`) into lines of text and
//! back again. Both protocols are newline delimited.
//!
//! - [`json_codec`] : JSON lines (programmatic clients)
//! - [`csv_codec`]  : CSV lines (netcat / scripts / replay)

pub mod csv_codec;
pub mod json_codec;
pub mod wire_types;

pub use json_codec::{
    decode_request, decode_response, encode_request, encode_response, ProtocolError,
};
pub use wire_types::{WireMatch, WireOp, WireRequest, WireResponse, WireStatus};

/// Line protocol spoken on a connection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Protocol {
    Csv,
    Json,
}

impl Protocol {
    /// Guess the protocol from the first byte a client sends.
    ///
    /// JSON requests always open with `{`; anything else is treated as CSV.
    pub fn detect(first_byte: u8) -> Self {
        if first_byte == b'{' {
            Protocol::Json
        } else {
            Protocol::Csv
        }
    }
}
