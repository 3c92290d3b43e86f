//! End-to-end pipeline tests over the replay model (no test doubles).

use pf_core::{plot_sankey, PipelineError, ReplayModel, ReplaySnapshot};
use pf_report::figure::Figure;
use pf_report::{DiagramLayout, FigureJsonRenderer, HtmlRenderer, ReportConfig};
use tempfile::TempDir;

fn snapshots() -> Vec<ReplaySnapshot> {
    vec![
        ReplaySnapshot::new(0.0)
            .with_asset("SPX", vec![3100.0, 3100.0, 3600.0, 4200.0])
            .with_asset("NDX", vec![1.0, 2.0, 3.0, 4.0]),
        ReplaySnapshot::new(0.5)
            .with_asset("SPX", vec![3400.0, 2900.0, 3600.0, 3900.0])
            .with_asset("NDX", vec![1.0, 2.0, 3.0, 4.0]),
        ReplaySnapshot::new(1.0)
            .with_asset("SPX", vec![3550.0, 2800.0, 4100.0, 3950.0])
            .with_asset("NDX", vec![1.0, 2.0, 3.0, 4.0]),
    ]
}

#[test]
fn replay_to_html_page() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("sankey.html");
    let mut model = ReplayModel::from_snapshots(snapshots()).unwrap();
    let mut renderer = HtmlRenderer::new(ReportConfig::default().with_minify(false), &out);

    let diagram = plot_sankey(
        &mut model,
        "SPX",
        &[0.0, 0.5, 1.0],
        &[3000.0, 3500.0, 4000.0],
        DiagramLayout::default(),
        &mut renderer,
    )
    .unwrap();

    // t=0: bins 1,1,2,3   t=0.5: bins 1,0,2,2   t=1.0: bins 2,0,3,2
    assert_eq!(diagram.total_flow(), 8);
    assert_eq!(diagram.links.len(), 8);
    assert_eq!(
        diagram.labels(),
        vec![
            "3000-3500", "3500-4000", "S>4000",
            "S<3000", "3000-3500", "3500-4000",
            "S<3000", "3500-4000", "S>4000",
        ]
    );

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<title>SPX Price Transitions</title>"));
    assert!(html.contains("t=0.5"));
}

#[test]
fn sample_times_between_snapshots_hold_last_value() {
    let mut model = ReplayModel::from_snapshots(snapshots()).unwrap();
    let mut renderer = FigureJsonRenderer::new(Vec::new());

    let diagram = plot_sankey(
        &mut model,
        "SPX",
        &[0.0, 0.25, 0.7],
        &[3500.0],
        DiagramLayout::default(),
        &mut renderer,
    )
    .unwrap();

    // 0.25 still sees the t=0 snapshot, so its bins repeat the first column.
    let figure: Figure =
        serde_json::from_str(String::from_utf8(renderer.into_inner()).unwrap().trim()).unwrap();
    assert_eq!(figure, Figure::from(&diagram));
    assert_eq!(diagram.nodes[0].x, 0.0);
    assert!(diagram.nodes.iter().any(|n| n.x == 0.25));
    assert_eq!(diagram.annotations[2].text, "t=0.7");
}

#[test]
fn time_before_first_snapshot_is_an_error() {
    let mut model = ReplayModel::from_snapshots(snapshots()).unwrap();
    let mut renderer = FigureJsonRenderer::new(Vec::new());
    let err = plot_sankey(
        &mut model,
        "SPX",
        &[-1.0, 0.0],
        &[3500.0],
        DiagramLayout::default(),
        &mut renderer,
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Flow(_)));
    assert!(renderer.into_inner().is_empty());
}

#[test]
fn rerun_after_reset_is_identical() {
    let mut model = ReplayModel::from_snapshots(snapshots()).unwrap();
    let run = |model: &mut ReplayModel| {
        let mut renderer = FigureJsonRenderer::new(Vec::new());
        plot_sankey(
            model,
            "SPX",
            &[0.0, 0.5, 1.0],
            &[3000.0, 3500.0, 4000.0],
            DiagramLayout::default(),
            &mut renderer,
        )
        .unwrap()
    };
    let first = run(&mut model);
    let second = run(&mut model);
    assert_eq!(first, second);
}
