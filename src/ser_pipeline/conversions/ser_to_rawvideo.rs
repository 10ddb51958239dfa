use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::iter::StepBy;
use std::ops::RangeInclusive;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::ser_pipeline::{
    common::error::{Result, SerError},
    container::{BitDepth, SerReader},
    conversions::types::{FrameRange, OverlayMode, PipelineConfig},
    debayer::{ColorReconstructor, RgbFrame},
    overlay::{blend, OverlayBuffer, OverlayRequest, TimestampRenderer},
    rawvideo::{PixelFormat, RawVideoSpec, RawVideoWriter},
};

/// Turns frames of an open SER container into raw video buffers.
pub struct SerToRawVideoPipeline<R> {
    reader: SerReader<R>,
    reconstructor: ColorReconstructor,
    renderer: Option<Box<dyn TimestampRenderer>>,
    config: PipelineConfig,
}

impl SerToRawVideoPipeline<BufReader<File>> {
    /// Opens a SER file for a pipeline without timestamp overlays.
    pub fn open<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<Self> {
        Self::new(SerReader::open(path)?, config)
    }
}

impl<R: Read + Seek> SerToRawVideoPipeline<R> {
    pub fn new(reader: SerReader<R>, config: PipelineConfig) -> Result<Self> {
        Self::build(reader, None, config)
    }

    pub fn with_renderer(
        reader: SerReader<R>,
        renderer: Box<dyn TimestampRenderer>,
        config: PipelineConfig,
    ) -> Result<Self> {
        Self::build(reader, Some(renderer), config)
    }

    fn build(
        reader: SerReader<R>,
        renderer: Option<Box<dyn TimestampRenderer>>,
        config: PipelineConfig,
    ) -> Result<Self> {
        if config.overlay.needs_renderer() && renderer.is_none() {
            return Err(SerError::InvalidConfig(format!(
                "overlay mode {:?} requires a timestamp renderer",
                config.overlay
            )));
        }
        if renderer.is_some() && !config.overlay.needs_renderer() {
            warn!("Timestamp renderer supplied but overlays are disabled");
        }

        let pipeline = Self {
            reader,
            reconstructor: ColorReconstructor::new(),
            renderer,
            config,
        };
        pipeline.validate_dimensions()?;
        Ok(pipeline)
    }

    fn validate_dimensions(&self) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        let header = self.reader.header();
        if header.color_id.is_bayer() && (header.width < 2 || header.height < 2) {
            return Err(SerError::InvalidDimensions(header.width, header.height));
        }

        Ok(())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reader(&self) -> &SerReader<R> {
        &self.reader
    }

    /// Pixel format of every buffer this pipeline emits.
    pub fn pixel_format(&self) -> PixelFormat {
        match (self.config.overlay, self.reader.header().bit_depth) {
            (OverlayMode::OverlayOnly, _) => PixelFormat::Rgba,
            (_, BitDepth::Eight) => PixelFormat::Rgb24,
            (_, BitDepth::Sixteen) => PixelFormat::Rgb48,
        }
    }

    /// Stream description for the raw video consumer.
    pub fn raw_video_spec(&self, framerate: impl Into<String>) -> RawVideoSpec {
        let header = self.reader.header();
        RawVideoSpec {
            pixel_format: self.pixel_format(),
            width: header.width,
            height: header.height,
            framerate: framerate.into(),
        }
    }

    /// Produces the output buffer of a single 1-based frame.
    pub fn frame_bytes(&mut self, index: usize) -> Result<Vec<u8>> {
        match self.config.overlay {
            OverlayMode::Disabled => {
                let rgb = self.reconstruct(index)?;
                Ok(rgb.to_bytes())
            }
            OverlayMode::Blended => {
                let rgb = self.reconstruct(index)?;
                let overlay = self.render_overlay(index)?;
                let _span = tracing::info_span!("composite", index).entered();
                Ok(blend(&overlay, &rgb)?.to_bytes())
            }
            OverlayMode::OverlayOnly => Ok(self.render_overlay(index)?.data),
        }
    }

    fn reconstruct(&mut self, index: usize) -> Result<RgbFrame> {
        let raw = {
            let _span = tracing::info_span!("read_frame", index).entered();
            self.reader.frame(index)?
        };
        let _span = tracing::info_span!("reconstruct", index).entered();
        self.reconstructor.reconstruct(&raw, self.reader.header().color_id)
    }

    fn render_overlay(&self, index: usize) -> Result<OverlayBuffer> {
        let _span = tracing::info_span!("render_overlay", index).entered();
        let renderer = self.renderer.as_ref().ok_or_else(|| {
            SerError::InvalidConfig("no timestamp renderer configured".to_string())
        })?;

        let header = self.reader.header();
        let instant = self.reader.timestamp(index)?;
        let text = self.config.style.zone.format(&instant);
        let request = OverlayRequest::new(header.width, header.height, instant, &text, &self.config.style);

        let overlay = renderer.render(&request)?;
        overlay.check_size(header.width, header.height)?;
        Ok(overlay)
    }

    /// Lazily produces the buffers of `range` in increasing frame order.
    ///
    /// The range is validated before any frame is read. The returned iterator
    /// owns the pipeline and drops it, closing the source, as soon as a frame
    /// fails; nothing is yielded after an error.
    #[instrument(skip(self), fields(frames = self.reader.frame_count()))]
    pub fn into_frames(self, range: FrameRange) -> Result<FrameIter<R>> {
        range.validate(self.reader.frame_count())?;
        info!(
            start = range.start,
            end = range.end,
            step = range.step,
            format = %self.pixel_format(),
            "Producing frames"
        );
        Ok(FrameIter {
            pipeline: Some(self),
            indices: range.indices(),
        })
    }

    /// Drives `range` into `writer`, returning how many frames were delivered.
    ///
    /// Stops at the first read, reconstruction or write failure. The source
    /// is closed on every return path.
    pub fn run<W: RawVideoWriter + ?Sized>(self, range: FrameRange, writer: &mut W) -> Result<usize> {
        let frames = self.into_frames(range)?;
        let mut delivered = 0;
        for (index, buffer) in range.indices().zip(frames) {
            writer.write_frame(index, &buffer?)?;
            delivered += 1;
        }
        writer.finish()?;
        info!(delivered, "Raw video conversion complete");
        Ok(delivered)
    }
}

/// Forward-only iterator over frame buffers, see [`SerToRawVideoPipeline::into_frames`].
pub struct FrameIter<R> {
    pipeline: Option<SerToRawVideoPipeline<R>>,
    indices: StepBy<RangeInclusive<usize>>,
}

impl<R: Read + Seek> Iterator for FrameIter<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let pipeline = self.pipeline.as_mut()?;
        let Some(index) = self.indices.next() else {
            self.pipeline = None;
            return None;
        };

        match pipeline.frame_bytes(index) {
            Ok(buffer) => Some(Ok(buffer)),
            Err(e) => {
                debug!(index, error = %e, "Frame failed, closing source");
                self.pipeline = None;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> std::iter::FusedIterator for FrameIter<R> {}
