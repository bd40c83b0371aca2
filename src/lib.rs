//! Stamp a semi-transparent watermark onto a folder of images.
//!
//! The watermark is stretched to the full height of each image (keeping its
//! aspect ratio), centered horizontally, faded by an opacity factor and
//! alpha-composited over the image. Results are always written as PNG.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use batch_watermark::{Opacity, Watermarker};
//!
//! let opacity = Opacity::new(0.3).expect("valid opacity");
//! let marker = Watermarker::open(Path::new("logo.png"), opacity).expect("failed to load watermark");
//! let img = image::open("photo.jpg").unwrap();
//! let out = marker.apply(&img).unwrap();
//! out.save("photo_watermarked.png").unwrap();
//! ```
//!
//! # Batch processing
//!
//! ```no_run
//! use std::path::Path;
//! use batch_watermark::{process_directory, Opacity};
//!
//! let stats = process_directory(
//!     Path::new("photos"),
//!     Path::new("logo.png"),
//!     Path::new("out"),
//!     Opacity::default(),
//!     |r| println!("{}: {:?}", r.file_name(), r.status),
//! )
//! .unwrap();
//! println!("processed {}, skipped {}, errors {}", stats.processed, stats.skipped, stats.errors);
//! ```

#![deny(missing_docs)]

pub mod blending;
mod engine;
pub mod error;
mod opacity;

pub use engine::{
    add_watermark, is_supported_image, output_path_for, process_directory, save_png, BatchStats,
    ProcessResult, Status, Watermarker,
};
pub use error::{Error, Result};
pub use opacity::Opacity;
