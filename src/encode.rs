//! Encoder engine (component C): per-pixel opcode selection, run
//! aggregation, and emission, in the strict priority order spec.md §4.3
//! requires (run > index > diff > luma > rgb/rgba).

use crate::header::{QOI_END_MARKER, QOI_HEADER_SIZE, QOI_PIXELS_MAX};
use crate::pixel::{Pixel, Rgba};
use crate::state::Predictor;
use crate::{cold, Channels, ColorSpace, EncodeError, Header};
use crate::{QOI_OP_INDEX, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Encodes a row-major, channel-interleaved pixel buffer into a QOI byte
/// stream. `channels` and `colorspace` are the raw header values (3 or 4;
/// 0 or 1) rather than the typed [`Channels`]/[`ColorSpace`] so that callers
/// driving this from untyped input (a CLI, an FFI boundary) get the same
/// [`EncodeError::InvalidChannels`]/[`EncodeError::InvalidColorspace`]
/// reporting spec.md §7 names instead of a panic.
#[cfg(feature = "alloc")]
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
) -> Result<Vec<u8>, EncodeError> {
    let channels = Channels::from_u8(channels).ok_or(EncodeError::InvalidChannels)?;
    let colorspace = ColorSpace::from_u8(colorspace).ok_or(EncodeError::InvalidColorspace)?;

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions);
    }
    if height as u64 >= QOI_PIXELS_MAX / width as u64 {
        return Err(EncodeError::InvalidDimensions);
    }

    let expected_len = width as usize * height as usize * channels.count();
    if pixels.len() != expected_len {
        return Err(EncodeError::BufferSizeMismatch);
    }

    let header = Header { width, height, channels, colorspace };

    let capacity = header.width as usize * header.height as usize * 5 + QOI_HEADER_SIZE + QOI_END_MARKER.len();
    let mut out = Vec::with_capacity(capacity);
    out.resize(QOI_HEADER_SIZE, 0);
    header.write_into(&mut out[..QOI_HEADER_SIZE]);

    encode_body(pixels, channels, &mut out);

    out.extend_from_slice(&QOI_END_MARKER);
    Ok(out)
}

/// Walks every pixel exactly once, applying the priority order from
/// spec.md §4.3 step by step. The predictor always tracks full `Rgba`
/// state, regardless of `channels` — for 3-channel input, alpha is pinned
/// to 255 when each pixel is read from the buffer, mirroring decode.rs's
/// channel-agnostic dispatch. This keeps the cache's zero sentinel
/// `(0,0,0,0)` distinguishable from a genuine incoming `(0,0,0)` pixel,
/// which a 3-channel pixel type with alpha hardcoded to a constant could
/// never represent.
#[cfg(feature = "alloc")]
fn encode_body(pixels: &[u8], channels: Channels, out: &mut Vec<u8>) {
    let mut predictor = Predictor::<Rgba>::new();
    let stride = channels.count();
    let total = pixels.len() / stride;
    let mut chunks = pixels.chunks_exact(stride);
    let mut seen = 0usize;

    while let Some(chunk) = chunks.next() {
        seen += 1;
        let px = match channels {
            Channels::Rgb => Rgba::from_bytes(&[chunk[0], chunk[1], chunk[2], 255]),
            Channels::Rgba => Rgba::from_bytes(chunk),
        };
        let is_last = seen == total;

        // Step 1: absorb a pixel equal to the previous one into the run.
        if px == predictor.prev() {
            let run = predictor.bump_run();
            if run == 62 || is_last {
                out.push(QOI_OP_RUN | (predictor.take_run() - 1));
            }
            continue;
        }

        // Step 2: the run ended on a pixel that differs; flush it first.
        if predictor.run() > 0 {
            out.push(QOI_OP_RUN | (predictor.take_run() - 1));
        }

        // Step 3: cache hit.
        let hash = px.hash();
        if predictor.probe(hash) == px {
            out.push(QOI_OP_INDEX | hash);
            predictor.set_prev(px);
            continue;
        }

        // Step 4: cache miss — try DIFF, then LUMA, then fall back to RGB.
        predictor.store(px);
        if px.a() == predictor.prev().a() {
            let v = px.var(&predictor.prev());
            if let Some(byte) = v.diff() {
                out.push(byte);
            } else if let Some([b1, b2]) = v.luma() {
                out.push(b1);
                out.push(b2);
            } else {
                out.push(QOI_OP_RGB);
                out.push(px.r());
                out.push(px.g());
                out.push(px.b());
            }
        } else {
            // Alpha changes are rare in practice (only possible for RGBA
            // input) and always cost 5 bytes; the teacher's branch-hint
            // style flags that here.
            cold();
            out.push(QOI_OP_RGBA);
            out.push(px.r());
            out.push(px.g());
            out.push(px.b());
            out.push(px.a());
        }

        predictor.set_prev(px);
    }
}
