use std::path::PathBuf;

use image::DynamicImage;

enum Direction {
    EncodeToQoi,
    DecodeFromQoi,
}

fn main() -> Result<(), ()> {
    env_logger::init();

    let mut args = std::env::args();

    if args.len() < 2 {
        log::error!("usage: qoiconv <input-path> [<output-path>]");
        return Err(());
    }

    args.next();

    let input = PathBuf::from(args.next().unwrap());

    let direction = match input.extension().and_then(|ext| ext.to_str()) {
        Some("qoi") => Direction::DecodeFromQoi,
        Some("png") | Some("jpg") | Some("jpeg") => Direction::EncodeToQoi,
        _ => {
            log::error!("unsupported input extension for '{}'; expected .png, .jpg, .jpeg or .qoi", input.display());
            return Err(());
        }
    };

    let output = args.next().map(PathBuf::from).unwrap_or_else(|| match direction {
        Direction::EncodeToQoi => input.with_extension("qoi"),
        Direction::DecodeFromQoi => input.with_extension("png"),
    });

    if output.exists() {
        log::error!("output path '{}' already exists", output.display());
        return Err(());
    }

    match direction {
        Direction::EncodeToQoi => encode_file(&input, &output),
        Direction::DecodeFromQoi => decode_file(&input, &output),
    }
}

fn encode_file(input: &std::path::Path, output: &std::path::Path) -> Result<(), ()> {
    let dynamic_image = image::open(input).map_err(|err| {
        log::error!("failed to open input image '{}': {err}", input.display());
    })?;

    let (pixels, width, height, channels) = match &dynamic_image {
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) | DynamicImage::ImageRgba16(_) => {
            let rgba = dynamic_image.to_rgba8();
            (rgba.as_raw().clone(), rgba.width(), rgba.height(), 4u8)
        }
        _ => {
            let rgb = dynamic_image.to_rgb8();
            (rgb.as_raw().clone(), rgb.width(), rgb.height(), 3u8)
        }
    };

    let bytes = qoi_codec::encode(&pixels, width, height, channels, 0).map_err(|err| {
        log::error!("failed to encode '{}': {err}", input.display());
    })?;

    std::fs::write(output, &bytes).map_err(|err| {
        log::error!("failed to write '{}': {err}", output.display());
    })?;

    log::info!("encoded '{}' -> '{}' ({} bytes)", input.display(), output.display(), bytes.len());
    Ok(())
}

fn decode_file(input: &std::path::Path, output: &std::path::Path) -> Result<(), ()> {
    let bytes = std::fs::read(input).map_err(|err| {
        log::error!("failed to read '{}': {err}", input.display());
    })?;

    let (pixels, width, height, channels, _colorspace) = qoi_codec::decode(&bytes, 0).map_err(|err| {
        log::error!("failed to decode '{}': {err}", input.display());
    })?;

    let save_result = if channels == 4 {
        image::RgbaImage::from_raw(width, height, pixels)
            .ok_or(())
            .and_then(|img| image::DynamicImage::ImageRgba8(img).save(output).map_err(|_| ()))
    } else {
        image::RgbImage::from_raw(width, height, pixels)
            .ok_or(())
            .and_then(|img| image::DynamicImage::ImageRgb8(img).save(output).map_err(|_| ()))
    };

    save_result.map_err(|_| {
        log::error!("failed to save decoded image to '{}'", output.display());
    })?;

    log::info!("decoded '{}' -> '{}'", input.display(), output.display());
    Ok(())
}
