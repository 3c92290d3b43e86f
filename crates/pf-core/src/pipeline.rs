//! End-to-end entry point: aggregate, build, render.

use pf_report::{DiagramLayout, ReportError, Renderer, SankeyDiagram};
use thiserror::Error;
use tracing::info;

use crate::flow::{generate_flows, FlowError};
use crate::logging::{event_names, Stage};
use crate::model::PathModel;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("aggregation failed: {0}")]
    Flow(#[from] FlowError),

    #[error("diagram failed: {0}")]
    Report(#[from] ReportError),
}

/// Aggregate flows for `asset`, build the Sankey diagram and hand it to
/// `renderer`. Returns the diagram that was shown.
///
/// Each stage logs one event tagged with its [`Stage`]; run and host ids come
/// from the caller's span.
pub fn plot_sankey<M, R>(
    model: &mut M,
    asset: &str,
    times: &[f64],
    bins: &[f64],
    layout: DiagramLayout,
    renderer: &mut R,
) -> Result<SankeyDiagram, PipelineError>
where
    M: PathModel + ?Sized,
    R: Renderer + ?Sized,
{
    let flows = generate_flows(model, asset, times, bins)?;
    info!(
        target: event_names::FLOWS_AGGREGATED,
        stage = %Stage::Aggregate,
        asset,
        links = flows.len(),
        total = flows.total(),
        "Counted transitions"
    );

    let diagram = SankeyDiagram::build(&flows, times, bins, layout)?;
    info!(
        target: event_names::DIAGRAM_BUILT,
        stage = %Stage::Build,
        nodes = diagram.nodes.len(),
        links = diagram.links.len(),
        "Built sankey diagram"
    );

    renderer.show(&diagram)?;
    info!(
        target: event_names::DIAGRAM_RENDERED,
        stage = %Stage::Render,
        asset,
        "Rendered sankey diagram"
    );
    Ok(diagram)
}
