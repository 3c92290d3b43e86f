//! Sankey diagram builder and renderers for path-flow.
//!
//! Turns a transition-count aggregate into a Sankey diagram (nodes with
//! labels and fixed coordinates, weighted links, time annotations, layout)
//! and hands it to a [`Renderer`].
//!
//! # Renderers
//!
//! - [`HtmlRenderer`]: standalone HTML page drawing the diagram with plotly.js
//!   from a pinned CDN
//! - [`FigureJsonRenderer`]: the plotly figure as JSON, for piping elsewhere
//!
//! # Example
//!
//! ```no_run
//! use pf_common::{FlowCounts, TransitionKey};
//! use pf_report::{DiagramLayout, FigureJsonRenderer, Renderer, SankeyDiagram};
//!
//! let mut flows = FlowCounts::new();
//! flows.increment(TransitionKey::new(0, 0, 1, 1));
//! let diagram = SankeyDiagram::build(&flows, &[0.0, 1.0], &[100.0, 200.0], DiagramLayout::default()).unwrap();
//! FigureJsonRenderer::new(std::io::stdout()).show(&diagram).unwrap();
//! ```

pub mod config;
pub mod diagram;
pub mod error;
pub mod figure;
pub mod generator;
pub mod render;

pub use config::{CdnConfig, CdnLibrary, ReportConfig, ReportTheme};
pub use diagram::{bin_label, Annotation, DiagramLayout, Link, Node, SankeyDiagram};
pub use error::{ReportError, Result};
pub use figure::Figure;
pub use generator::{ReportGenerator, ReportMeta};
pub use render::{FigureJsonRenderer, HtmlRenderer, Renderer};
