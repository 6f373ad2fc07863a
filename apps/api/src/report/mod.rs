// Printable itinerary report: canvas capability, PDF backend, section builders, assembler.
// Assembly is synchronous; async callers run it inside tokio::task::spawn_blocking.

pub mod assembler;
pub mod canvas;
pub mod font_metrics;
pub mod pdf_canvas;
#[cfg(test)]
pub mod recording;
pub mod sections;

pub use assembler::{RenderError, ReportAssembler};
