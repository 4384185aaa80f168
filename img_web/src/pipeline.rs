//! Batch Image Pipeline
//!
//! Converts every eligible image of one folder into `listas_para_web/`, one
//! file at a time, numbering the outputs `{base}1`, `{base}2`, ... in the
//! order the files are attempted. Only successful writes take a number.
//!
//! The run is a lazy iterator of [`BatchEvent`]s: `Started`, one `File` per
//! matched image, then `Finished`. Per-file errors become failed outcomes and
//! never stop the batch; everything that does stop it is reported by
//! [`BatchPipeline::prepare`] before any file is touched.

use crate::codec::ImageCodec;
use crate::config::{BatchJobConfig, FileOrder, INPUT_EXTENSIONS};
use crate::error::{BatchError, CodecError, Result};
use crate::events::{BatchEvent, BatchSummary, FileOutcome};
use crate::resize::target_dimensions;
use shared_utils::{collect_files_sorted, file_name_lossy};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Validated job with its file list resolved, ready to execute.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    config: BatchJobConfig,
    output_dir: PathBuf,
    files: Vec<PathBuf>,
}

impl PreparedBatch {
    pub fn config(&self) -> &BatchJobConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Input files in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

pub struct BatchPipeline<C> {
    codec: C,
    cancel: Arc<AtomicBool>,
}

impl<C: ImageCodec> BatchPipeline<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares an externally owned flag (e.g. set from a Ctrl-C handler).
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Checks the job, creates the output folder and lists the inputs.
    ///
    /// The output folder is created before listing, so it exists even when
    /// the result is [`BatchError::NoInput`].
    pub fn prepare(&self, config: &BatchJobConfig) -> Result<PreparedBatch> {
        config.validate()?;

        let output_dir = config.output_dir();
        fs::create_dir_all(&output_dir).map_err(|source| BatchError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let files = list_inputs(config.source_dir(), config.order);
        if files.is_empty() {
            return Err(BatchError::NoInput {
                dir: config.source_dir().to_path_buf(),
            });
        }

        debug!(
            "📂 {} eligible file(s) in {}",
            files.len(),
            config.source_dir().display()
        );

        Ok(PreparedBatch {
            config: config.clone(),
            output_dir,
            files,
        })
    }

    pub fn execute(&self, batch: PreparedBatch) -> BatchRun<'_, C> {
        BatchRun {
            pipeline: self,
            batch,
            stage: Stage::NotStarted,
            position: 0,
            next_number: 1,
            success_count: 0,
        }
    }

    /// `prepare` followed by `execute`. Every call re-scans the folder.
    pub fn run(&self, config: &BatchJobConfig) -> Result<BatchRun<'_, C>> {
        let batch = self.prepare(config)?;
        Ok(self.execute(batch))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    NotStarted,
    Processing,
    Done,
}

/// One pass over a [`PreparedBatch`]. Not restartable.
pub struct BatchRun<'a, C> {
    pipeline: &'a BatchPipeline<C>,
    batch: PreparedBatch,
    stage: Stage,
    position: usize,
    next_number: u32,
    success_count: usize,
}

impl<C: ImageCodec> BatchRun<'_, C> {
    pub fn total_files(&self) -> usize {
        self.batch.total_files()
    }

    pub fn output_dir(&self) -> &Path {
        self.batch.output_dir()
    }

    pub fn files(&self) -> &[PathBuf] {
        self.batch.files()
    }

    /// Feeds every remaining event to `observer` and returns the summary.
    pub fn drain_into<F>(mut self, mut observer: F) -> BatchSummary
    where
        F: FnMut(&BatchEvent),
    {
        while let Some(event) = self.next() {
            observer(&event);
            if let BatchEvent::Finished(summary) = event {
                return summary;
            }
        }
        self.summary(false)
    }

    fn summary(&self, cancelled: bool) -> BatchSummary {
        BatchSummary {
            total_files: self.batch.total_files(),
            success_count: self.success_count,
            output_directory: self.batch.output_dir.clone(),
            cancelled,
        }
    }

    fn finish(&mut self, cancelled: bool) -> BatchEvent {
        self.stage = Stage::Done;
        let summary = self.summary(cancelled);
        info!(
            "🏁 {}/{} converted into {}{}",
            summary.success_count,
            summary.total_files,
            summary.output_directory.display(),
            if cancelled { " (cancelled)" } else { "" }
        );
        BatchEvent::Finished(summary)
    }

    fn process_file(&mut self, input: &Path) -> FileOutcome {
        let input_name = file_name_lossy(input);
        let span = info_span!("file", name = %input_name);
        let _guard = span.enter();

        let input_size = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        let config = &self.batch.config;
        let output_name = config.output_file_name(self.next_number);
        let output_path = self.batch.output_dir.join(&output_name);

        match convert_one(&self.pipeline.codec, input, &output_path, config) {
            Ok(dimensions) => {
                let output_size = fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
                self.next_number += 1;
                self.success_count += 1;
                debug!("wrote {} ({}x{})", output_name, dimensions.0, dimensions.1);
                FileOutcome::success(input_name, output_name, input_size, output_size, dimensions)
            }
            Err(err) => {
                warn!("❌ {}: {}", input_name, err);
                FileOutcome::failure(input_name, err.to_string(), input_size)
            }
        }
    }
}

impl<C: ImageCodec> Iterator for BatchRun<'_, C> {
    type Item = BatchEvent;

    fn next(&mut self) -> Option<BatchEvent> {
        match self.stage {
            Stage::NotStarted => {
                self.stage = Stage::Processing;
                info!(
                    "🚀 Converting {} file(s) → {}",
                    self.batch.total_files(),
                    self.batch.output_dir.display()
                );
                Some(BatchEvent::Started {
                    total_files: self.batch.total_files(),
                })
            }
            Stage::Processing => {
                if self.position >= self.batch.files.len() {
                    return Some(self.finish(false));
                }
                if self.pipeline.is_cancelled() {
                    warn!(
                        "⚠️  Cancelled with {} file(s) not attempted",
                        self.batch.files.len() - self.position
                    );
                    return Some(self.finish(true));
                }

                let input = self.batch.files[self.position].clone();
                self.position += 1;
                let outcome = self.process_file(&input);
                Some(BatchEvent::File {
                    index: self.position,
                    outcome,
                })
            }
            Stage::Done => None,
        }
    }
}

/// Eligible images directly inside `dir`, in the order a run would attempt them.
pub fn list_inputs(dir: &Path, order: FileOrder) -> Vec<PathBuf> {
    collect_files_sorted(dir, INPUT_EXTENSIONS, false, order.into())
}

/// Decode, bound the width, normalise colour and encode one file.
/// Returns the dimensions that were written.
fn convert_one<C: ImageCodec>(
    codec: &C,
    input: &Path,
    output: &Path,
    config: &BatchJobConfig,
) -> std::result::Result<(u32, u32), CodecError> {
    let mut image = codec.decode(input)?;
    let (width, height) = codec.dimensions(&image);
    debug!("decoded {}x{}", width, height);

    if let Some((new_width, new_height)) = target_dimensions(width, height, config.max_width) {
        debug!("resizing to {}x{}", new_width, new_height);
        image = codec.resize(image, new_width, new_height)?;
    }

    let mode = codec.color_mode(&image);
    if mode.needs_rgb_for(config.output_format) {
        debug!("converting {:?} to RGB for {}", mode, config.output_format);
        image = codec.to_rgb(image);
    }

    codec.encode(&image, output, config.output_format, config.quality)?;
    Ok(codec.dimensions(&image))
}
