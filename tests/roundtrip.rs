//! End-to-end encode/decode tests against synthetic pixel buffers. No PNG
//! fixtures live in this workspace, so these generate their own inputs
//! rather than reading files off disk.

fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
        }
    }
    pixels
}

fn gradient_rgb(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8]);
        }
    }
    pixels
}

#[test]
fn roundtrip_rgba_gradient() {
    let (w, h) = (64, 37);
    let pixels = gradient_rgba(w, h);

    let encoded = qoi_codec::encode(&pixels, w, h, 4, 0).unwrap();
    let (decoded, dw, dh, channels, colorspace) = qoi_codec::decode(&encoded, 0).unwrap();

    assert_eq!((dw, dh, channels, colorspace), (w, h, 4, 0));
    assert_eq!(decoded, pixels);
}

#[test]
fn roundtrip_rgb_gradient_force_channels() {
    let (w, h) = (33, 17);
    let pixels = gradient_rgb(w, h);

    let encoded = qoi_codec::encode(&pixels, w, h, 3, 1).unwrap();
    let (decoded, _, _, channels, colorspace) = qoi_codec::decode(&encoded, 0).unwrap();
    assert_eq!(channels, 3);
    assert_eq!(colorspace, 1);
    assert_eq!(decoded, pixels);

    let (decoded_rgba, _, _, _, _) = qoi_codec::decode(&encoded, 4).unwrap();
    for (i, chunk) in decoded_rgba.chunks_exact(4).enumerate() {
        assert_eq!(chunk[0..3], pixels[i * 3..i * 3 + 3]);
        assert_eq!(chunk[3], 255);
    }
}

#[test]
fn roundtrip_solid_color_image_is_mostly_run_opcodes() {
    let (w, h) = (200, 150);
    let pixel_count = (w * h) as usize;
    let mut pixels = Vec::with_capacity(pixel_count * 4);
    for _ in 0..pixel_count {
        pixels.extend_from_slice(&[12, 34, 56, 255]);
    }

    let encoded = qoi_codec::encode(&pixels, w, h, 4, 0).unwrap();
    // A single-color image compresses to a handful of run opcodes, nowhere
    // near one byte per pixel.
    assert!(encoded.len() < pixel_count / 4);

    let (decoded, _, _, _, _) = qoi_codec::decode(&encoded, 0).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn encoding_is_deterministic() {
    let (w, h) = (48, 48);
    let pixels = gradient_rgba(w, h);

    let first = qoi_codec::encode(&pixels, w, h, 4, 0).unwrap();
    let second = qoi_codec::encode(&pixels, w, h, 4, 0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_pixel_images_of_every_channel_and_colorspace_combination_roundtrip() {
    for &channels in &[3u8, 4u8] {
        for &colorspace in &[0u8, 1u8] {
            let pixel_len = channels as usize;
            let pixels: Vec<u8> = (0..pixel_len as u8).collect();

            let encoded = qoi_codec::encode(&pixels, 1, 1, channels, colorspace).unwrap();
            let (decoded, w, h, ch, cs) = qoi_codec::decode(&encoded, 0).unwrap();

            assert_eq!((w, h, ch, cs), (1, 1, channels, colorspace));
            assert_eq!(decoded, pixels);
        }
    }
}

#[test]
fn decode_rejects_stream_with_wrong_magic() {
    let pixels = gradient_rgba(4, 4);
    let mut encoded = qoi_codec::encode(&pixels, 4, 4, 4, 0).unwrap();
    encoded[0] = b'Q';
    assert!(qoi_codec::decode(&encoded, 0).is_err());
}

#[test]
fn encode_rejects_buffer_length_mismatch() {
    let pixels = vec![0u8; 10];
    assert!(qoi_codec::encode(&pixels, 4, 4, 4, 0).is_err());
}
