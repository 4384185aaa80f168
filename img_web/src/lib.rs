//! img-web: batch image conversion for web publishing
//!
//! Reads every JPEG/PNG/WebP/BMP in a folder, bounds the width, re-encodes to
//! WebP, JPEG or PNG and writes `{base}1.ext`, `{base}2.ext`, ... into the
//! folder's `listas_para_web/` subdirectory.
//!
//! ```no_run
//! use img_web::{BatchJobConfig, BatchPipeline, OutputFormat, StandardCodec};
//!
//! let config = BatchJobConfig::new("/photos/trip", "trip").with_format(OutputFormat::Jpeg);
//! let pipeline = BatchPipeline::new(StandardCodec::new());
//! let summary = pipeline.run(&config)?.drain_into(|event| println!("{:?}", event));
//! println!("{} of {} converted", summary.success_count, summary.total_files);
//! # Ok::<(), img_web::BatchError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod resize;
pub mod worker;

pub use codec::{ColorMode, ImageCodec, StandardCodec};
pub use config::{
    BatchJobConfig, FileOrder, OutputFormat, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY, INPUT_EXTENSIONS,
    OUTPUT_DIR_NAME,
};
pub use error::{BatchError, CodecError};
pub use events::{BatchEvent, BatchSummary, FileOutcome, FileStatus};
pub use pipeline::{list_inputs, BatchPipeline, BatchRun, PreparedBatch};
pub use resize::target_dimensions;
pub use worker::BatchTask;
