use std::io::Write;

use crate::frame::Frame;
use crate::renderer::{DebugTextRenderer, Renderer};

/// Errors from a render surface.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render surface initialization failed: {0}")]
    Init(String),
    #[error("failed to present frame: {0}")]
    Present(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where composed frames go. A graphics backend implements this; creation of
/// its window and context happens in `init`, on the render thread.
pub trait RenderSurface: Send {
    fn init(&mut self) -> Result<(), RenderError>;

    fn present(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Surface that draws nothing; keeps the render context's pacing and camera
/// coupling running without a display.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    frames: u64,
    last_body_count: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSurface for HeadlessSurface {
    fn init(&mut self) -> Result<(), RenderError> {
        tracing::info!("headless render surface ready");
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.frames += 1;
        if frame.bodies.len() != self.last_body_count {
            tracing::debug!(
                frame = self.frames,
                bodies = frame.bodies.len(),
                "body count changed"
            );
            self.last_body_count = frame.bodies.len();
        }
        Ok(())
    }
}

/// Writes every `every`-th frame through [`DebugTextRenderer`].
pub struct TextSurface<W> {
    out: W,
    every: u64,
    frames: u64,
    renderer: DebugTextRenderer,
}

impl<W: Write + Send> TextSurface<W> {
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            frames: 0,
            renderer: DebugTextRenderer::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSurface for TextSurface<W> {
    fn init(&mut self) -> Result<(), RenderError> {
        writeln!(self.out, "text surface: one frame in {}", self.every)?;
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if self.frames % self.every == 0 {
            self.out.write_all(self.renderer.render(frame).as_bytes())?;
            self.out.flush()?;
        }
        self.frames += 1;
        Ok(())
    }
}
