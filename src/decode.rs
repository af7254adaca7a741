//! Decoder engine (component D): opcode dispatch, predictor-state
//! mutation, and pixel emission — the exact inverse of the encoder's
//! opcode selection (spec.md §4.4).

use crate::header::{QOI_END_MARKER, QOI_HEADER_SIZE};
use crate::pixel::{Pixel, Rgba};
use crate::state::Predictor;
use crate::{likely, Channels, DecodeError, Header};
use crate::{QOI_OP_RGB, QOI_OP_RGBA};

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// Decodes a QOI byte stream back into a row-major, channel-interleaved
/// pixel buffer. `force_channels` overrides the output stride: `0` honors
/// the header's channel count, `3`/`4` force RGB/RGBA output regardless of
/// what the stream was encoded with (spec.md §4.4).
///
/// Returns the decoded pixels along with width, height, the header's own
/// channel count, and colorspace — all four are needed by callers that
/// want to know what the stream *said* it was, independent of
/// `force_channels`.
#[cfg(feature = "alloc")]
pub fn decode(bytes: &[u8], force_channels: u8) -> Result<(Vec<u8>, u32, u32, u8, u8), DecodeError> {
    let force_channels = match force_channels {
        0 => None,
        3 => Some(Channels::Rgb),
        4 => Some(Channels::Rgba),
        _ => return Err(DecodeError::InvalidChannels),
    };

    let header = Header::parse(bytes)?;
    let body = &bytes[QOI_HEADER_SIZE..bytes.len() - QOI_END_MARKER.len()];

    let out_channels = force_channels.unwrap_or(header.channels);
    let pixel_count = header.width as usize * header.height as usize;
    let mut out = vec![0u8; pixel_count * out_channels.count()];

    decode_body(body, pixel_count, out_channels, &mut out)?;

    Ok((out, header.width, header.height, header.channels as u8, header.colorspace as u8))
}

/// Produces exactly `pixel_count` pixels into `out`, internally always
/// tracking full RGBA state (alpha is simply pinned at 255 for streams
/// that never touch it) — the same channel-count-agnostic dispatch the
/// reference decoder uses, since every opcode other than `QOI_OP_RGBA`
/// leaves alpha untouched regardless of the header's channel count.
#[cfg(feature = "alloc")]
fn decode_body(
    body: &[u8],
    pixel_count: usize,
    out_channels: Channels,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    let mut predictor = Predictor::<Rgba>::new();
    let stride = out_channels.count();
    let mut cursor = 0usize;

    for i in 0..pixel_count {
        if likely(predictor.run() == 0) {
            let b1 = *body.get(cursor).ok_or(DecodeError::TruncatedStream)?;
            cursor += 1;

            match b1 {
                QOI_OP_RGB => {
                    let bytes = body.get(cursor..cursor + 3).ok_or(DecodeError::TruncatedStream)?;
                    let mut p = predictor.prev();
                    p.set_r(bytes[0]);
                    p.set_g(bytes[1]);
                    p.set_b(bytes[2]);
                    cursor += 3;
                    predictor.set_prev(p);
                    predictor.store(p);
                }
                QOI_OP_RGBA => {
                    let bytes = body.get(cursor..cursor + 4).ok_or(DecodeError::TruncatedStream)?;
                    let mut p = predictor.prev();
                    p.set_r(bytes[0]);
                    p.set_g(bytes[1]);
                    p.set_b(bytes[2]);
                    p.set_a(bytes[3]);
                    cursor += 4;
                    predictor.set_prev(p);
                    predictor.store(p);
                }
                _ => match b1 & 0xC0 {
                    0x00 => {
                        // QOI_OP_INDEX
                        let p = predictor.probe(b1 & 0x3F);
                        predictor.set_prev(p);
                        predictor.store(p);
                    }
                    0x40 => {
                        // QOI_OP_DIFF
                        let mut p = predictor.prev();
                        let dr = ((b1 >> 4) & 0x03).wrapping_sub(2);
                        let dg = ((b1 >> 2) & 0x03).wrapping_sub(2);
                        let db = (b1 & 0x03).wrapping_sub(2);
                        p.set_r(p.r().wrapping_add(dr));
                        p.set_g(p.g().wrapping_add(dg));
                        p.set_b(p.b().wrapping_add(db));
                        predictor.set_prev(p);
                        predictor.store(p);
                    }
                    0x80 => {
                        // QOI_OP_LUMA
                        let b2 = *body.get(cursor).ok_or(DecodeError::TruncatedStream)?;
                        cursor += 1;
                        let dg = (b1 & 0x3F).wrapping_sub(32);
                        let dr = dg.wrapping_add((b2 >> 4) & 0x0F).wrapping_sub(8);
                        let db = dg.wrapping_add(b2 & 0x0F).wrapping_sub(8);
                        let mut p = predictor.prev();
                        p.set_r(p.r().wrapping_add(dr));
                        p.set_g(p.g().wrapping_add(dg));
                        p.set_b(p.b().wrapping_add(db));
                        predictor.set_prev(p);
                        predictor.store(p);
                    }
                    _ => {
                        // QOI_OP_RUN: length is biased by -1; this iteration
                        // emits the current pixel unchanged and does not
                        // touch the cache, matching the encoder's own
                        // "absorbed into a run" pixels.
                        predictor.set_run(b1 & 0x3F);
                    }
                },
            }
        } else {
            predictor.dec_run();
        }

        let p = predictor.prev();
        let dst = &mut out[i * stride..(i + 1) * stride];
        dst[0] = p.r();
        dst[1] = p.g();
        dst[2] = p.b();
        if out_channels == Channels::Rgba {
            dst[3] = p.a();
        }
    }

    Ok(())
}
