//! ReQL query envelope
//!
//! This crate provides:
//! - Query envelopes (START, CONTINUE, STOP, NOREPLY_WAIT, SERVER_INFO)
//! - Global query options, loadable from config
//! - Token + length framing for a connection to write
//!
//! Connections and response handling live elsewhere.

pub mod options;
pub mod protocol;

pub use options::{Durability, GlobalOptions, ReadMode};
pub use protocol::{HEADER_LEN, ProtocolError, Query, QueryType, decode_frame, encode_frame};

pub use reql::{Term, r};
