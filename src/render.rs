use log::info;
use std::io::Write;
use thiserror::Error;

use crate::canvas::{Canvas, SvgCanvas};
use crate::file::{FileError, OutputFile};
use crate::plot::{ChromosomeRow, PageLayout, PlotStyle};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("File writing error: {0}")]
    FileError(#[from] FileError),
}

/// Draw one chromosome: a bar split at a filled circle on its centromere.
///
/// The canvas origin is left where it was found.
fn draw_chromosome<C: Canvas>(canvas: &mut C, row: &ChromosomeRow, style: &PlotStyle) {
    canvas.translate_origin(row.anchor.0, row.anchor.1);
    canvas.draw_segment(
        -row.geometry.left,
        row.geometry.right,
        style.chromosome_width,
        style.arm_color,
    );
    canvas.draw_circle(style.centromere_diameter / 2.0, style.centromere_color);
    canvas.translate_origin(-row.anchor.0, -row.anchor.1);
}

/// Issue the drawing calls for a planned page.
pub fn render<C: Canvas>(page: &PageLayout, style: &PlotStyle, canvas: &mut C) {
    let title_style = style.title_style();
    let label_style = style.label_style();
    for block in &page.species {
        let (x, y) = block.title_position;
        canvas.draw_text(&block.name, x, y, &title_style);
        for row in &block.rows {
            let (x, y) = row.label_position;
            canvas.draw_text(&row.record.id, x, y, &label_style);
            draw_chromosome(canvas, row, style);
        }
    }
}

/// Render a page as an SVG document.
pub fn render_svg(page: &PageLayout, style: &PlotStyle) -> String {
    let mut canvas = SvgCanvas::new(page.width, page.height, style.background);
    render(page, style, &mut canvas);
    canvas.finish()
}

/// Render a page and write it as SVG to `filepath`.
///
/// If the filepath has a `.gz` extension the output is gzip compressed.
pub fn write_svg(page: &PageLayout, style: &PlotStyle, filepath: &str) -> Result<(), RenderError> {
    let svg = render_svg(page, style);
    let mut writer = OutputFile::new(filepath, None).writer()?;
    writer.write_all(svg.as_bytes())?;
    writer.flush()?;
    info!(
        "wrote {} species ({} bytes) to '{}'",
        page.species.len(),
        svg.len(),
        filepath
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, HorizontalAlign, TextStyle};
    use crate::dataset::Dataset;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq)]
    enum Call {
        Translate(f64, f64),
        Reset,
        Segment(f64, f64),
        Circle(f64),
        Text(String, f64, f64, HorizontalAlign),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<Call>,
    }

    impl Canvas for RecordingCanvas {
        fn translate_origin(&mut self, dx: f64, dy: f64) {
            self.calls.push(Call::Translate(dx, dy));
        }
        fn reset_origin(&mut self) {
            self.calls.push(Call::Reset);
        }
        fn draw_segment(&mut self, x0: f64, x1: f64, _stroke_width: f64, _color: Color) {
            self.calls.push(Call::Segment(x0, x1));
        }
        fn draw_circle(&mut self, radius: f64, _fill: Color) {
            self.calls.push(Call::Circle(radius));
        }
        fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
            self.calls
                .push(Call::Text(text.to_string(), x, y, style.align));
        }
    }

    fn plan_fixture() -> (PageLayout, PlotStyle) {
        let dataset = Dataset::from_tsv("tests/data/centromeric-regions.tsv").unwrap();
        let style = PlotStyle::default();
        (PageLayout::plan(&dataset, &style), style)
    }

    #[test]
    fn test_render_call_sequence() {
        let (page, style) = plan_fixture();
        let mut canvas = RecordingCanvas::default();
        render(&page, &style, &mut canvas);

        // one heading per species, then label + 4 calls per chromosome
        assert_eq!(canvas.calls.len(), 3 + 11 * 5);

        let row = &page.species[0].rows[0];
        assert_eq!(
            &canvas.calls[..7],
            &[
                Call::Text("Homo sapiens".to_string(), 600.0, 50.0, HorizontalAlign::Center),
                Call::Text("1".to_string(), 20.0, 60.0, HorizontalAlign::Left),
                Call::Translate(600.0, 60.0),
                Call::Segment(-row.geometry.left, row.geometry.right),
                Call::Circle(9.0),
                Call::Translate(-600.0, -60.0),
                Call::Text("2".to_string(), 20.0, 90.0, HorizontalAlign::Left),
            ]
        );
    }

    #[test]
    fn test_render_keeps_caller_origin() {
        let (page, style) = plan_fixture();
        let mut canvas = SvgCanvas::new(page.width, page.height + 1000.0, style.background);
        canvas.translate_origin(0.0, 1000.0);
        render(&page, &style, &mut canvas);
        let svg = canvas.finish();

        assert!(svg.contains(r#"<text x="600" y="1050""#));
        assert!(svg.contains(r#"<text x="20" y="1060""#));
        assert!(svg.contains(r#"<text x="20" y="1090""#));
        assert!(svg.contains(r#"<circle cx="600" cy="1090""#));
        // last yeast chromosome
        assert!(svg.contains(r#"<circle cx="600" cy="1480""#));
        assert!(!svg.contains(r#"y="90""#));
    }

    #[test]
    fn test_write_svg() {
        let (page, style) = plan_fixture();
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("chromosomes.svg");
        write_svg(&page, &style, output_path.to_str().unwrap()).unwrap();

        let svg = std::fs::read_to_string(&output_path).unwrap();
        assert!(svg.contains(r#"width="1200" height="530""#));
        assert_eq!(svg.matches("<circle").count(), 11);
        assert_eq!(svg.matches("<text").count(), 14);
        assert!(svg.contains(">Saccharomyces cerevisiae</text>"));
        dir.close().unwrap();
    }
}
