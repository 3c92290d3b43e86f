//! Renderers: the display step at the end of the pipeline.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ReportConfig;
use crate::diagram::SankeyDiagram;
use crate::error::Result;
use crate::figure::Figure;
use crate::generator::{ReportGenerator, ReportMeta};

/// Something that can display a finished diagram.
///
/// `show` blocks until the diagram has been handed off (written, printed or
/// drawn).
pub trait Renderer {
    fn show(&mut self, diagram: &SankeyDiagram) -> Result<()>;
}

/// Writes a standalone HTML page to a file.
pub struct HtmlRenderer {
    generator: ReportGenerator,
    meta: ReportMeta,
    output: PathBuf,
}

impl HtmlRenderer {
    pub fn new(config: ReportConfig, output: impl Into<PathBuf>) -> Self {
        HtmlRenderer {
            generator: ReportGenerator::new(config),
            meta: ReportMeta::default(),
            output: output.into(),
        }
    }

    /// Attach provenance for the page footer.
    pub fn with_meta(mut self, meta: ReportMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Renderer for HtmlRenderer {
    fn show(&mut self, diagram: &SankeyDiagram) -> Result<()> {
        let html = self.generator.generate(diagram, &self.meta)?;
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.output, html)?;
        info!(path = %self.output.display(), "Wrote sankey page");
        Ok(())
    }
}

/// Writes the plotly figure JSON to any writer.
pub struct FigureJsonRenderer<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> FigureJsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        FigureJsonRenderer {
            writer,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for FigureJsonRenderer<W> {
    fn show(&mut self, diagram: &SankeyDiagram) -> Result<()> {
        let figure = Figure::from(diagram);
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &figure)?;
        } else {
            serde_json::to_writer(&mut self.writer, &figure)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
