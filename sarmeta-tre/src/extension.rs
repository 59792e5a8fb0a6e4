//! Tagged record extension envelope.
//!
//! Each extension in an image or file header extension area is framed as:
//!
//! ```text
//! +0:  CETAG (6 bytes, tag, space padded)
//! +6:  CEL   (5 bytes, decimal data length, zero padded)
//! +11: data  (CEL bytes)
//! ```

use crate::error::TreError;
use bytes::{BufMut, Bytes, BytesMut};
use sarmeta_core::{FixedWidthReader, FixedWidthWriter, Justify};

/// One framed extension: tag plus raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreExtension {
    /// Extension tag, without padding.
    pub tag: String,
    /// Extension data.
    pub data: Bytes,
}

impl TreExtension {
    /// Width of the tag field in bytes.
    pub const TAG_LENGTH: usize = 6;
    /// Width of the length field in bytes.
    pub const LENGTH_DIGITS: usize = 5;
    /// Envelope length preceding the data.
    pub const ENVELOPE_LENGTH: usize = Self::TAG_LENGTH + Self::LENGTH_DIGITS;
    /// Largest data length the envelope can frame.
    pub const MAX_DATA_LENGTH: usize = 99_999;

    /// Creates an extension.
    pub fn new(tag: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            tag: tag.into(),
            data: data.into(),
        }
    }

    /// Total framed size (envelope + data).
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        Self::ENVELOPE_LENGTH + self.data.len()
    }

    /// Frames the extension.
    ///
    /// # Errors
    /// Returns `TreError::ExtensionTooLong` if the data length needs more
    /// than five digits, or `TreError::StringTooLong` if the tag is longer
    /// than six bytes.
    pub fn to_bytes(&self) -> Result<Bytes, TreError> {
        if self.data.len() > Self::MAX_DATA_LENGTH {
            return Err(TreError::ExtensionTooLong {
                tag: self.tag.clone(),
                length: self.data.len(),
            });
        }
        if self.tag.len() > Self::TAG_LENGTH {
            return Err(TreError::StringTooLong {
                field: "CETAG".to_string(),
                length: self.tag.len(),
                width: Self::TAG_LENGTH,
            });
        }

        let mut envelope = FixedWidthWriter::with_capacity(Self::ENVELOPE_LENGTH);
        envelope.put_justified(self.tag.as_bytes(), Self::TAG_LENGTH, Justify::Left, b' ');
        envelope.put_justified(
            self.data.len().to_string().as_bytes(),
            Self::LENGTH_DIGITS,
            Justify::Right,
            b'0',
        );

        let mut out = BytesMut::with_capacity(self.encoded_length());
        out.put(envelope.freeze());
        out.put_slice(&self.data);
        Ok(out.freeze())
    }
}

/// Splits an extension area into its framed extensions.
///
/// # Arguments
/// * `bytes` - Concatenated extensions
///
/// # Errors
/// Returns `TreError::TruncatedRecord` if an envelope or its data runs past
/// the end of `bytes`, and `TreError::InvalidLength` if a length field is
/// not decimal.
pub fn parse_extensions(bytes: &[u8]) -> Result<Vec<TreExtension>, TreError> {
    let mut extensions = Vec::new();
    let mut reader = FixedWidthReader::new(bytes);

    while reader.remaining() > 0 {
        let start = reader.position();
        let envelope_error =
            || TreError::truncated("CETAG", start + TreExtension::ENVELOPE_LENGTH, bytes.len());
        let tag_bytes = reader
            .take(TreExtension::TAG_LENGTH)
            .map_err(|_| envelope_error())?;
        let tag = String::from_utf8_lossy(tag_bytes)
            .trim_end_matches(' ')
            .to_string();
        let text = reader
            .take(TreExtension::LENGTH_DIGITS)
            .map(String::from_utf8_lossy)
            .map_err(|_| envelope_error())?;
        let length: usize = text.parse().map_err(|_| TreError::InvalidLength {
            tag: tag.clone(),
            text: text.to_string(),
        })?;
        let data = reader.take(length).map_err(|_| {
            TreError::truncated(
                tag.as_str(),
                start + TreExtension::ENVELOPE_LENGTH + length,
                bytes.len(),
            )
        })?;
        tracing::debug!("Found extension {} with {} data bytes", tag, length);
        extensions.push(TreExtension::new(tag, Bytes::copy_from_slice(data)));
    }

    Ok(extensions)
}
