//! Storage-safe text encoding for sample payloads.
//!
//! Payloads are cached locally as `data:<mime>;base64,<body>` URLs so a
//! single string carries both the bytes and their media type. Bare base64
//! (no header) is accepted on decode for entries written without a hint.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Media type assumed when neither the sample nor the payload carries one.
pub const DEFAULT_MEDIA_TYPE: &str = "audio/wav";

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Malformed encoded payload.
///
/// Only the length of the offending fragment is kept so that binary garbage
/// never ends up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed encoded payload ({fragment_len} bytes)")]
pub struct DecodeError {
    /// Length in bytes of the fragment that failed to decode.
    pub fragment_len: usize,
}

/// Bytes recovered from an encoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Raw audio bytes.
    pub bytes: Vec<u8>,
    /// Media type embedded in the encoded text, if any.
    pub media_type_hint: Option<String>,
}

/// Identity metadata derived from a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDescription {
    pub size: u64,
    pub media_type: String,
}

/// Encode `bytes` as a data URL tagged with `media_type`.
pub fn encode(bytes: &[u8], media_type: &str) -> String {
    let media_type = normalise_media_type(media_type);
    format!(
        "{DATA_SCHEME}{media_type}{BASE64_MARKER},{}",
        STANDARD.encode(bytes)
    )
}

/// Encode `bytes` as bare base64 without a media-type header.
pub fn encode_bare(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode text produced by [`encode`] or [`encode_bare`].
///
/// # Errors
///
/// Returns [`DecodeError`] if the data URL header is malformed or the body
/// is not valid base64.
pub fn decode(text: &str) -> Result<DecodedPayload, DecodeError> {
    let Some(rest) = text.strip_prefix(DATA_SCHEME) else {
        let bytes = decode_body(text)?;
        return Ok(DecodedPayload {
            bytes,
            media_type_hint: None,
        });
    };

    let (header, body) = rest.split_once(',').ok_or(DecodeError {
        fragment_len: rest.len(),
    })?;
    let mime = header.strip_suffix(BASE64_MARKER).ok_or(DecodeError {
        fragment_len: header.len(),
    })?;
    // Parameters such as `;codecs=opus` stay part of the hint.
    let hint = (!mime.trim().is_empty()).then(|| mime.trim().to_owned());

    Ok(DecodedPayload {
        bytes: decode_body(body)?,
        media_type_hint: hint,
    })
}

/// Derive size and media type for a payload. Pure.
pub fn describe(bytes: &[u8], media_type: &str) -> SampleDescription {
    SampleDescription {
        size: bytes.len() as u64,
        media_type: normalise_media_type(media_type).to_owned(),
    }
}

fn decode_body(body: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(body).map_err(|_| DecodeError {
        fragment_len: body.len(),
    })
}

fn normalise_media_type(media_type: &str) -> &str {
    let trimmed = media_type.trim();
    if trimmed.is_empty() {
        DEFAULT_MEDIA_TYPE
    } else {
        trimmed
    }
}
