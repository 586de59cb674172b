//! Query envelope and frame codec
//!
//! A query is `[query_type, term, {global optargs}]` for START and
//! `[query_type]` otherwise, sent in a frame tagged with the query token.

use reql::{Term, TermType, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::GlobalOptions;

/// Frame header: 8-byte token + 4-byte payload length
pub const HEADER_LEN: usize = 12;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Message too short: need at least {0} bytes")]
    TooShort(usize),
    #[error("Payload too large: {0} bytes")]
    TooLarge(usize),
    #[error("Invalid payload JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Query error: {0}")]
    Reql(#[from] reql::ReqlError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] reql::SerializeError),
}

/// What the client asks the server to do with a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Run a new query
    Start,
    /// Fetch the next batch of a partial result
    Continue,
    /// Close a cursor or changefeed
    Stop,
    /// Wait for outstanding noreply writes
    NoreplyWait,
    ServerInfo,
}

impl QueryType {
    pub fn code(self) -> u32 {
        match self {
            QueryType::Start => 1,
            QueryType::Continue => 2,
            QueryType::Stop => 3,
            QueryType::NoreplyWait => 4,
            QueryType::ServerInfo => 5,
        }
    }
}

/// One query envelope. Only START carries a term and options.
#[derive(Debug, Clone)]
pub struct Query {
    token: u64,
    query_type: QueryType,
    term: Option<Term>,
    options: GlobalOptions,
}

impl Query {
    pub fn start(token: u64, term: Term, options: GlobalOptions) -> Self {
        Self {
            token,
            query_type: QueryType::Start,
            term: Some(term),
            options,
        }
    }

    pub fn resume(token: u64) -> Self {
        Self::control(token, QueryType::Continue)
    }

    pub fn stop(token: u64) -> Self {
        Self::control(token, QueryType::Stop)
    }

    pub fn noreply_wait(token: u64) -> Self {
        Self::control(token, QueryType::NoreplyWait)
    }

    pub fn server_info(token: u64) -> Self {
        Self::control(token, QueryType::ServerInfo)
    }

    fn control(token: u64, query_type: QueryType) -> Self {
        Self {
            token,
            query_type,
            term: None,
            options: GlobalOptions::default(),
        }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// The query term, for START
    pub fn term(&self) -> Option<&Term> {
        self.term.as_ref()
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    /// The envelope as JSON
    ///
    /// The term and options sit one array deep, and that level counts
    /// against the nesting limit.
    pub fn to_json(&self) -> Result<serde_json::Value, ProtocolError> {
        let code = serde_json::Value::from(self.query_type.code());
        match &self.term {
            Some(term) => Ok(serde_json::Value::Array(vec![
                code,
                term.to_json_within(1)?,
                encode_global_optargs(&self.options)?,
            ])),
            None => Ok(serde_json::Value::Array(vec![code])),
        }
    }

    /// The envelope wrapped in a frame, ready to write to a connection
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let payload = serde_json::to_vec(&self.to_json()?)?;
        log::debug!(
            "encoded {:?} query, token {} ({} bytes)",
            self.query_type,
            self.token,
            payload.len()
        );
        encode_frame(self.token, &payload)
    }
}

/// Global optargs are terms too: `db` becomes a `DB` term, the rest are datums.
fn encode_global_optargs(options: &GlobalOptions) -> Result<serde_json::Value, ProtocolError> {
    let entries = options.to_optargs()?;
    let object = Term::construct(TermType::MakeObj, Vec::<Value>::new(), entries, None)?;
    Ok(object.to_json_within(1)?)
}

/// Frame a payload.
///
/// Format: [8-byte token (little-endian u64)][4-byte length (little-endian u32)][JSON payload]
pub fn encode_frame(token: u64, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::TooLarge(payload.len()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&token.to_le_bytes());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Decode a frame into its token and JSON payload.
pub fn decode_frame(data: &[u8]) -> Result<(u64, serde_json::Value), ProtocolError> {
    if data.len() < HEADER_LEN {
        return Err(ProtocolError::TooShort(HEADER_LEN));
    }

    let mut token = [0u8; 8];
    token.copy_from_slice(&data[..8]);
    let mut len = [0u8; 4];
    len.copy_from_slice(&data[8..HEADER_LEN]);

    let token = u64::from_le_bytes(token);
    let payload_end = HEADER_LEN + u32::from_le_bytes(len) as usize;

    if data.len() < payload_end {
        return Err(ProtocolError::TooShort(payload_end));
    }

    let payload = serde_json::from_slice(&data[HEADER_LEN..payload_end])?;
    Ok((token, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn control_queries_are_bare() {
        assert_eq!(Query::resume(7).to_json().unwrap(), json!([2]));
        assert_eq!(Query::stop(7).to_json().unwrap(), json!([3]));
        assert_eq!(Query::noreply_wait(7).to_json().unwrap(), json!([4]));
        assert_eq!(Query::server_info(7).to_json().unwrap(), json!([5]));
    }

    #[test]
    fn only_start_carries_a_term() {
        let start = Query::start(1, reql::r::now().unwrap(), GlobalOptions::new().with_db("test"));
        assert_eq!(start.token(), 1);
        assert_eq!(start.query_type(), QueryType::Start);
        assert!(start.term().is_some());
        assert_eq!(start.options().db.as_deref(), Some("test"));

        let stop = Query::stop(1);
        assert_eq!(stop.query_type(), QueryType::Stop);
        assert!(stop.term().is_none());
        assert_eq!(stop.options(), &GlobalOptions::default());
    }

    #[test]
    fn frame_header_layout() {
        let frame = encode_frame(0x0102, b"[2]").unwrap();
        assert_eq!(&frame[..8], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&frame[8..12], &[3, 0, 0, 0]);
        assert_eq!(&frame[12..], b"[2]");
    }

    #[test]
    fn truncated_frames_are_rejected() {
        assert!(matches!(decode_frame(&[0; 4]), Err(ProtocolError::TooShort(12))));

        let mut frame = encode_frame(1, b"[2]").unwrap();
        frame.pop();
        assert!(matches!(decode_frame(&frame), Err(ProtocolError::TooShort(15))));
    }

    #[test]
    fn bad_json_is_reported() {
        let frame = encode_frame(1, b"[2").unwrap();
        assert!(matches!(decode_frame(&frame), Err(ProtocolError::InvalidJson(_))));
    }
}
