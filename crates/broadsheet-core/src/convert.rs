//! TIFF to JPEG conversion of archival scans.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use tracing::{info, warn};

use crate::error::Result;

/// Outcome of a folder conversion.
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// Written JPEG files.
    pub converted: Vec<PathBuf>,
    /// Inputs that could not be converted, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Convert one TIFF (any color type) to an RGB JPEG.
pub fn convert_tiff_to_jpeg(input: &Path, output: &Path, quality: u8) -> Result<()> {
    let rgb = image::open(input)?.to_rgb8();
    let writer = BufWriter::new(File::create(output)?);
    JpegEncoder::new_with_quality(writer, quality).encode_image(&rgb)?;
    Ok(())
}

/// JPEG name for a TIFF file name, `None` for anything else.
///
/// Spaces become underscores: `Page 1.TIF` becomes `Page_1.jpeg`.
pub fn jpeg_file_name(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let stem_len = if lower.ends_with(".tiff") {
        name.len() - ".tiff".len()
    } else if lower.ends_with(".tif") {
        name.len() - ".tif".len()
    } else {
        return None;
    };

    Some(format!("{}.jpeg", name[..stem_len].replace(' ', "_")))
}

/// Convert every TIFF directly inside `source` into `destination`.
///
/// The destination is created if needed. A file that fails to convert is
/// logged and reported; the remaining files are still converted.
pub fn batch_convert(source: &Path, destination: &Path, quality: u8) -> Result<ConvertReport> {
    fs::create_dir_all(destination)?;

    let mut entries: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut report = ConvertReport::default();
    for input in entries {
        let Some(name) = input.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(output_name) = jpeg_file_name(name) else {
            continue;
        };

        let output = destination.join(output_name);
        match convert_tiff_to_jpeg(&input, &output, quality) {
            Ok(()) => {
                info!("Converted {} to {}", input.display(), output.display());
                report.converted.push(output);
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", input.display(), e);
                report.failed.push((input, e.to_string()));
            }
        }
    }

    Ok(report)
}
