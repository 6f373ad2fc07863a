//! Document Assembly Pipeline: turns an itinerary into a paginated report.
//!
//! # Page order
//! 1. Title (opens the document)
//! 2. Trip overview
//! 3. One page per day, in stored order
//! 4. Hotels
//! 5. Flights
//! 6. Transfers (only when there is at least one)
//! 7. Payment plan
//! 8. Inclusions / exclusions
//!
//! Exactly one explicit page break precedes every section after the title. Overflow
//! inside a section is left to the canvas.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::itinerary::Itinerary;
use crate::report::canvas::{Canvas, CanvasError};
use crate::report::pdf_canvas::PdfCanvas;
use crate::report::sections;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save PDF to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: CanvasError,
    },
}

/// Builds `itinerary_<id>_<token>.pdf`.
///
/// The token is the render instant at microsecond resolution followed by eight hex
/// characters of a fresh v4 UUID, so concurrent renders of one itinerary never share
/// a filename.
pub fn report_filename(itinerary_id: &Uuid) -> String {
    let instant = Utc::now().format("%Y%m%d_%H%M%S_%6f");
    let nonce = Uuid::new_v4().simple().to_string();
    format!("itinerary_{}_{}_{}.pdf", itinerary_id, instant, &nonce[..8])
}

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    output_dir: PathBuf,
}

impl ReportAssembler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders `itinerary` onto a fresh PDF canvas and writes it under the output directory.
    pub fn render_pdf(&self, itinerary: &Itinerary) -> Result<PathBuf, RenderError> {
        let mut canvas = PdfCanvas::new();
        self.assemble(itinerary, &mut canvas)
    }

    /// Emits every section onto `canvas` and persists it. Returns the artifact path.
    pub fn assemble<C: Canvas + ?Sized>(
        &self,
        itinerary: &Itinerary,
        canvas: &mut C,
    ) -> Result<PathBuf, RenderError> {
        write_sections(itinerary, canvas);

        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(report_filename(&itinerary.id));
        canvas
            .persist(&path)
            .map_err(|source| RenderError::Persist {
                path: path.clone(),
                source,
            })?;

        info!(
            "Rendered itinerary {} ({} pages) to {}",
            itinerary.id,
            canvas.page_count(),
            path.display()
        );
        Ok(path)
    }
}

fn write_sections<C: Canvas + ?Sized>(itinerary: &Itinerary, canvas: &mut C) {
    canvas.new_page();
    sections::title_section(canvas, itinerary);

    canvas.new_page();
    sections::overview_section(canvas, itinerary);

    for day in &itinerary.days {
        canvas.new_page();
        sections::day_section(canvas, day);
    }

    canvas.new_page();
    sections::hotels_section(canvas, &itinerary.hotels);

    canvas.new_page();
    sections::flights_section(canvas, &itinerary.flights);

    if itinerary.transfers.is_empty() {
        debug!("Itinerary {} has no transfers, skipping section", itinerary.id);
    } else {
        canvas.new_page();
        sections::transfers_section(canvas, &itinerary.transfers);
    }

    canvas.new_page();
    sections::payment_section(canvas, &itinerary.payment_plan);

    canvas.new_page();
    sections::inclusions_exclusions_section(canvas, &itinerary.inclusions, &itinerary.exclusions);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{activity, sample_itinerary, transfer};
    use crate::report::recording::RecordingCanvas;

    fn page_headings(canvas: &RecordingCanvas) -> Vec<String> {
        canvas
            .pages()
            .into_iter()
            .map(|page| page.first().cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_pages_follow_fixed_section_order() {
        let itinerary = sample_itinerary(2);
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = RecordingCanvas::new();
        ReportAssembler::new(dir.path())
            .assemble(&itinerary, &mut canvas)
            .unwrap();

        assert_eq!(
            page_headings(&canvas),
            vec![
                "Winter in Prague",
                "Trip Overview",
                "Day 1 - Day 1 plans",
                "Day 2 - Day 2 plans",
                "Accommodation Details",
                "Flight Details",
                "Payment Plan",
                "Inclusions",
            ]
        );
    }

    #[test]
    fn test_one_page_per_day_regardless_of_activity_count() {
        let mut itinerary = sample_itinerary(3);
        itinerary.days[0].activities.morning = (0..40)
            .map(|i| activity(&format!("Stop {i}"), Some("15 minutes")))
            .collect();
        itinerary.days[1].activities.morning.clear();
        itinerary.days[1].activities.evening.clear();

        let dir = tempfile::tempdir().unwrap();
        let mut canvas = RecordingCanvas::new();
        ReportAssembler::new(dir.path())
            .assemble(&itinerary, &mut canvas)
            .unwrap();

        // title + overview + 3 days + hotels + flights + payment + inclusions
        assert_eq!(canvas.page_count(), 9);
    }

    #[test]
    fn test_transfers_page_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = ReportAssembler::new(dir.path());

        let mut without = sample_itinerary(2);
        without.transfers.clear();
        let mut canvas = RecordingCanvas::new();
        assembler.assemble(&without, &mut canvas).unwrap();
        assert_eq!(canvas.page_count(), 8);
        assert!(!page_headings(&canvas).contains(&"Transfer Details".to_string()));

        let mut with = sample_itinerary(2);
        with.transfers = vec![transfer()];
        let mut canvas = RecordingCanvas::new();
        assembler.assemble(&with, &mut canvas).unwrap();
        assert_eq!(canvas.page_count(), 9);
        assert_eq!(page_headings(&canvas)[6], "Transfer Details");
    }

    #[test]
    fn test_days_rendered_in_stored_order() {
        let mut itinerary = sample_itinerary(3);
        itinerary.days.reverse();

        let dir = tempfile::tempdir().unwrap();
        let mut canvas = RecordingCanvas::new();
        ReportAssembler::new(dir.path())
            .assemble(&itinerary, &mut canvas)
            .unwrap();

        let headings = page_headings(&canvas);
        assert_eq!(&headings[2..5], &[
            "Day 3 - Day 3 plans".to_string(),
            "Day 2 - Day 2 plans".to_string(),
            "Day 1 - Day 1 plans".to_string(),
        ]);
    }

    #[test]
    fn test_filename_policy_and_output_dir_creation() {
        let itinerary = sample_itinerary(2);
        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("reports").join("2024");
        let mut canvas = RecordingCanvas::new();

        let path = ReportAssembler::new(&output_dir)
            .assemble(&itinerary, &mut canvas)
            .unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(path.parent().unwrap(), output_dir.as_path());
        assert_eq!(canvas.persisted, vec![path.clone()]);

        let name = path.file_name().unwrap().to_str().unwrap();
        let prefix = format!("itinerary_{}_", itinerary.id);
        assert!(name.starts_with(&prefix), "unexpected filename {name}");
        assert!(name.ends_with(".pdf"));
        let token = &name[prefix.len()..name.len() - 4];
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() || c == '_'));
    }

    #[test]
    fn test_sequential_renders_use_distinct_filenames() {
        let itinerary = sample_itinerary(2);
        let dir = tempfile::tempdir().unwrap();
        let assembler = ReportAssembler::new(dir.path());

        let first = assembler
            .assemble(&itinerary, &mut RecordingCanvas::new())
            .unwrap();
        let second = assembler
            .assemble(&itinerary, &mut RecordingCanvas::new())
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let itinerary = sample_itinerary(3);
        let dir = tempfile::tempdir().unwrap();
        let assembler = ReportAssembler::new(dir.path());

        let mut first = RecordingCanvas::new();
        let mut second = RecordingCanvas::new();
        assembler.assemble(&itinerary, &mut first).unwrap();
        assembler.assemble(&itinerary, &mut second).unwrap();
        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn test_persist_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = RecordingCanvas::failing();
        let err = ReportAssembler::new(dir.path())
            .assemble(&sample_itinerary(2), &mut canvas)
            .unwrap_err();
        assert!(matches!(err, RenderError::Persist { .. }));
        assert!(err.to_string().contains("failed to save PDF"));
    }

    #[test]
    fn test_output_dir_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let mut canvas = RecordingCanvas::new();
        let err = ReportAssembler::new(blocker.join("reports"))
            .assemble(&sample_itinerary(2), &mut canvas)
            .unwrap_err();
        assert!(matches!(err, RenderError::OutputDir { .. }));
        assert!(canvas.persisted.is_empty());
    }

    #[test]
    fn test_render_pdf_writes_expected_page_count() {
        let mut itinerary = sample_itinerary(3);
        itinerary.transfers = vec![transfer()];
        let dir = tempfile::tempdir().unwrap();

        let path = ReportAssembler::new(dir.path())
            .render_pdf(&itinerary)
            .unwrap();

        let document = lopdf::Document::load(&path).unwrap();
        // title + overview + 3 days + hotels + flights + transfers + payment + inclusions
        assert_eq!(document.get_pages().len(), 10);
    }
}
