//! Core watermarking engine.

use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, info, warn};

use crate::blending;
use crate::error::{Error, Result};
use crate::opacity::Opacity;

/// File extensions accepted as input, compared case-insensitively.
const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Suffix appended to the input stem to form the output filename.
const OUTPUT_SUFFIX: &str = "_watermarked";

/// Outcome of handling one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The watermark was applied and the output written.
    Processed,
    /// The entry is not an eligible image and was left alone.
    Skipped,
    /// Loading, blending or saving failed.
    Failed,
}

/// Result of handling a single directory entry.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input entry.
    pub path: PathBuf,
    /// Path the output was (or would have been) written to.
    pub output: Option<PathBuf>,
    /// What happened to the entry.
    pub status: Status,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    /// The entry's file name, falling back to the full path.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |f| f.to_string_lossy().to_string(),
        )
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Files watermarked successfully.
    pub processed: u32,
    /// Entries skipped because they are not eligible images.
    pub skipped: u32,
    /// Eligible files that failed to process.
    pub errors: u32,
}

impl BatchStats {
    /// Count one result.
    pub fn record(&mut self, result: &ProcessResult) {
        match result.status {
            Status::Processed => self.processed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Failed => self.errors += 1,
        }
    }

    /// Number of entries seen.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.processed + self.skipped + self.errors
    }

    /// Whether no entries were seen at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A decoded watermark together with the opacity it is applied at.
///
/// Create once with [`Watermarker::open()`] and reuse for every image in a
/// batch; the watermark is decoded a single time.
pub struct Watermarker {
    watermark: RgbaImage,
    opacity: Opacity,
}

impl Watermarker {
    /// Wrap an already-decoded watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if the watermark has a zero dimension.
    pub fn new(watermark: RgbaImage, opacity: Opacity) -> Result<Self> {
        let (width, height) = watermark.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        Ok(Self { watermark, opacity })
    }

    /// Decode the watermark at `path`, converting it to RGBA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the file cannot be read or decoded, or
    /// [`Error::EmptyImage`] if it has no pixels.
    pub fn open(path: &Path, opacity: Opacity) -> Result<Self> {
        let watermark = image::open(path)?.to_rgba8();
        debug!(
            path = %path.display(),
            width = watermark.width(),
            height = watermark.height(),
            "watermark loaded"
        );
        Self::new(watermark, opacity)
    }

    /// Opacity the watermark is applied at.
    #[must_use]
    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Original watermark dimensions.
    #[must_use]
    pub fn watermark_dimensions(&self) -> (u32, u32) {
        self.watermark.dimensions()
    }

    /// Build the transparent watermark layer for a base of `width` x `height`.
    ///
    /// The watermark is resampled (Lanczos3) to the full height, centered
    /// horizontally and faded by the opacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if the base has a zero dimension.
    pub fn watermark_layer(&self, width: u32, height: u32) -> Result<RgbaImage> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }

        let (wm_w, wm_h) = self.watermark.dimensions();
        let (new_w, new_h) = blending::fit_to_height(wm_w, wm_h, height)?;
        debug!(
            base_width = width,
            base_height = height,
            new_w,
            new_h,
            x = blending::center_offset(width, new_w),
            "watermark layout"
        );

        let resized = imageops::resize(
            &self.watermark,
            new_w,
            new_h,
            imageops::FilterType::Lanczos3,
        );
        Ok(blending::build_layer(&resized, width, height, self.opacity))
    }

    /// Apply the watermark to a decoded image and return the composited
    /// RGBA result, the same size as `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if `base` has a zero dimension.
    pub fn apply(&self, base: &DynamicImage) -> Result<RgbaImage> {
        let mut out = base.to_rgba8();
        let layer = self.watermark_layer(out.width(), out.height())?;
        blending::composite_over(&mut out, &layer);
        Ok(out)
    }

    /// Load `input`, apply the watermark and write a PNG to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, blending or writing fails.
    pub fn apply_file(&self, input: &Path, output: &Path) -> Result<()> {
        let base = image::open(input)?;
        let out = self.apply(&base)?;
        save_png(&out, output)
    }

    /// Process a single image file: load, blend, save.
    ///
    /// Never fails; errors are captured in the returned [`ProcessResult`].
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: Some(output.to_path_buf()),
            status: Status::Failed,
            message: String::new(),
        };

        match self.apply_file(input, output) {
            Ok(()) => {
                info!(input = %input.display(), output = %output.display(), "watermark applied");
                result.status = Status::Processed;
                result.message = "Watermark applied".to_string();
            }
            Err(e) => {
                warn!(input = %input.display(), error = %e, "failed to process image");
                result.message = e.to_string();
            }
        }

        result
    }

    /// Process every entry of `input_dir` (non-recursive), writing results to
    /// `output_dir`.
    ///
    /// `on_result` is called once per entry, in enumeration order, as soon as
    /// that entry is handled. Entries that are not files or lack a supported
    /// extension are skipped; a failing file never stops the batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input directory cannot be listed or the
    /// output directory cannot be created.
    pub fn process_directory<F>(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        on_result: F,
    ) -> Result<BatchStats>
    where
        F: FnMut(&ProcessResult),
    {
        scan_directory(input_dir, output_dir, on_result, |input, output| {
            self.process_file(input, output)
        })
    }
}

/// Watermark every eligible image in `input_dir` with the image at
/// `watermark`, writing results to `output_dir`.
///
/// The watermark is decoded once. If that fails, the batch still runs and
/// every eligible file is reported as [`Status::Failed`] with the decode
/// error; ineligible entries are still skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] if the input directory cannot be listed or the
/// output directory cannot be created.
pub fn process_directory<F>(
    input_dir: &Path,
    watermark: &Path,
    output_dir: &Path,
    opacity: Opacity,
    on_result: F,
) -> Result<BatchStats>
where
    F: FnMut(&ProcessResult),
{
    match Watermarker::open(watermark, opacity) {
        Ok(marker) => marker.process_directory(input_dir, output_dir, on_result),
        Err(e) => {
            warn!(watermark = %watermark.display(), error = %e, "failed to load watermark");
            let message = e.to_string();
            scan_directory(input_dir, output_dir, on_result, |input, output| {
                ProcessResult {
                    path: input.to_path_buf(),
                    output: Some(output.to_path_buf()),
                    status: Status::Failed,
                    message: message.clone(),
                }
            })
        }
    }
}

/// List `input_dir`, create `output_dir`, then classify each entry and hand
/// eligible files to `handle` along with their output path.
fn scan_directory<F, H>(
    input_dir: &Path,
    output_dir: &Path,
    mut on_result: F,
    mut handle: H,
) -> Result<BatchStats>
where
    F: FnMut(&ProcessResult),
    H: FnMut(&Path, &Path) -> ProcessResult,
{
    let entries: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .collect();

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }

    let mut stats = BatchStats::default();
    if entries.is_empty() {
        warn!(dir = %input_dir.display(), "input directory is empty");
        return Ok(stats);
    }

    for path in entries {
        let result = if !path.is_file() {
            skipped(path, "Not a regular file")
        } else if !is_supported_image(&path) {
            skipped(path, "Unsupported file type")
        } else {
            let output = output_path_for(&path, output_dir);
            handle(&path, &output)
        };

        stats.record(&result);
        on_result(&result);
    }

    debug!(
        processed = stats.processed,
        skipped = stats.skipped,
        errors = stats.errors,
        "batch finished"
    );
    Ok(stats)
}

fn skipped(path: PathBuf, message: &str) -> ProcessResult {
    debug!(path = %path.display(), reason = message, "skipping entry");
    ProcessResult {
        path,
        output: None,
        status: Status::Skipped,
        message: message.to_string(),
    }
}

/// Apply `watermark` to `input` at `opacity` and write a PNG to `output`.
///
/// Decodes the watermark on every call; use [`Watermarker`] when processing
/// more than one image.
///
/// # Errors
///
/// Returns an error if either image cannot be decoded or the output cannot be
/// written.
pub fn add_watermark(input: &Path, watermark: &Path, output: &Path, opacity: Opacity) -> Result<()> {
    Watermarker::open(watermark, opacity)?.apply_file(input, output)
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Output path for `input` inside `output_dir`.
///
/// Example: `"photo.jpg"` becomes `"<output_dir>/photo_watermarked.png"`.
#[must_use]
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.png"))
}

/// Encode `img` as PNG and write it to `path`, whatever the path's extension.
///
/// # Errors
///
/// Returns [`Error::Image`] if encoding or writing fails.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
