//! Bitstream framing (component A): the 14-byte header and the 8-byte end
//! marker. Grounded on the inline header pack/unpack logic in the teacher's
//! `encode.rs`/`decode.rs`, factored into its own module per spec.md §4.1.

use crate::{Channels, ColorSpace, DecodeError, Header};

pub(crate) const QOI_MAGIC: &[u8; 4] = b"qoif";
pub(crate) const QOI_HEADER_SIZE: usize = 14;
pub(crate) const QOI_END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub(crate) const QOI_PIXELS_MAX: u64 = 400_000_000;

/// Minimum byte length of any valid stream: header plus end marker, with
/// no room for a single opcode. Shorter input cannot possibly be a QOI
/// stream, per spec.md §4.1.
const QOI_MIN_STREAM_LEN: usize = QOI_HEADER_SIZE + QOI_END_MARKER.len();

impl Header {
    #[inline]
    pub(crate) fn write_into(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(QOI_MAGIC);
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels as u8;
        out[13] = self.colorspace as u8;
    }

    /// Parses and validates the 14-byte header at the start of `bytes`,
    /// checking the checks in the order spec.md §4.1 lists them: overall
    /// length, magic, dimensions, channels, colorspace, then the pixel
    /// count bound.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < QOI_MIN_STREAM_LEN {
            return Err(DecodeError::TruncatedStream);
        }

        if &bytes[0..4] != QOI_MAGIC {
            return Err(DecodeError::BadMagic);
        }

        let width = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let height = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions);
        }

        let channels = Channels::from_u8(bytes[12]).ok_or(DecodeError::InvalidChannels)?;
        let colorspace = ColorSpace::from_u8(bytes[13]).ok_or(DecodeError::InvalidColorspace)?;

        if height as u64 >= QOI_PIXELS_MAX / width as u64 {
            return Err(DecodeError::InvalidDimensions);
        }

        Ok(Header { width, height, channels, colorspace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(width: u32, height: u32, channels: u8, colorspace: u8) -> [u8; 22] {
        let mut buf = [0u8; 22];
        buf[0..4].copy_from_slice(QOI_MAGIC);
        buf[4..8].copy_from_slice(&width.to_be_bytes());
        buf[8..12].copy_from_slice(&height.to_be_bytes());
        buf[12] = channels;
        buf[13] = colorspace;
        buf[14..22].copy_from_slice(&QOI_END_MARKER);
        buf
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(Header::parse(&[0u8; 21]), Err(DecodeError::TruncatedStream));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = header_bytes(1, 1, 4, 0);
        buf[0] = b'x';
        assert_eq!(Header::parse(&buf), Err(DecodeError::BadMagic));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(Header::parse(&header_bytes(0, 1, 4, 0)), Err(DecodeError::InvalidDimensions));
        assert_eq!(Header::parse(&header_bytes(1, 0, 4, 0)), Err(DecodeError::InvalidDimensions));
    }

    #[test]
    fn rejects_bad_channels_and_colorspace() {
        assert_eq!(Header::parse(&header_bytes(1, 1, 5, 0)), Err(DecodeError::InvalidChannels));
        assert_eq!(Header::parse(&header_bytes(1, 1, 4, 2)), Err(DecodeError::InvalidColorspace));
    }

    #[test]
    fn rejects_pixel_count_over_max() {
        // height >= QOI_PIXELS_MAX / width
        let width = 1u32;
        let height = (QOI_PIXELS_MAX as u32).wrapping_add(1);
        let buf = header_bytes(width, height, 4, 0);
        assert_eq!(Header::parse(&buf), Err(DecodeError::InvalidDimensions));
    }

    #[test]
    fn accepts_valid_header() {
        let header = Header::parse(&header_bytes(1, 1, 4, 0)).unwrap();
        assert_eq!(header.width, 1);
        assert_eq!(header.height, 1);
        assert_eq!(header.channels, Channels::Rgba);
        assert_eq!(header.colorspace, ColorSpace::Srgb);
    }
}
