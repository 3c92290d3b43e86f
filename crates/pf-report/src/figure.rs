//! plotly.js figure model.
//!
//! Mirrors the subset of the plotly figure schema the Sankey view uses: one
//! `sankey` trace with explicit node positions, plus a layout carrying the
//! title, font size, canvas size and time annotations.

use serde::{Deserialize, Serialize};

use crate::diagram::SankeyDiagram;

/// A complete plotly figure: `Plotly.newPlot(el, figure.data, figure.layout)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<SankeyTrace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyTrace {
    #[serde(rename = "type")]
    pub trace_type: String,
    pub node: NodeAttributes,
    pub link: LinkAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub label: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAttributes {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureLayout {
    pub title: TitleAttributes,
    pub font: FontAttributes,
    pub width: u32,
    pub height: u32,
    pub annotations: Vec<AnnotationAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleAttributes {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAttributes {
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationAttributes {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub showarrow: bool,
}

impl From<&SankeyDiagram> for Figure {
    fn from(diagram: &SankeyDiagram) -> Self {
        let node = NodeAttributes {
            label: diagram.nodes.iter().map(|n| n.label.clone()).collect(),
            x: diagram.nodes.iter().map(|n| n.x).collect(),
            y: diagram.nodes.iter().map(|n| n.y).collect(),
        };
        let link = LinkAttributes {
            source: diagram.links.iter().map(|l| l.source).collect(),
            target: diagram.links.iter().map(|l| l.target).collect(),
            value: diagram.links.iter().map(|l| l.value).collect(),
        };
        let layout = FigureLayout {
            title: TitleAttributes {
                text: diagram.layout.title.clone(),
            },
            font: FontAttributes {
                size: diagram.layout.font_size,
            },
            width: diagram.layout.width,
            height: diagram.layout.height,
            annotations: diagram
                .annotations
                .iter()
                .map(|a| AnnotationAttributes {
                    x: a.x,
                    y: a.y,
                    text: a.text.clone(),
                    showarrow: a.show_arrow,
                })
                .collect(),
        };

        Figure {
            data: vec![SankeyTrace {
                trace_type: "sankey".to_string(),
                node,
                link,
            }],
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramLayout;
    use pf_common::{FlowCounts, TransitionKey};

    #[test]
    fn figure_json_shape() {
        let mut flows = FlowCounts::new();
        flows.increment(TransitionKey::new(0, 0, 1, 1));
        flows.increment(TransitionKey::new(0, 0, 1, 1));
        let diagram =
            SankeyDiagram::build(&flows, &[0.0, 1.0], &[100.0], DiagramLayout::default()).unwrap();

        let value = serde_json::to_value(Figure::from(&diagram)).unwrap();
        let trace = &value["data"][0];
        assert_eq!(trace["type"], "sankey");
        assert_eq!(trace["node"]["label"], serde_json::json!(["S<100", "S>100"]));
        assert_eq!(trace["node"]["x"], serde_json::json!([0.0, 1.0]));
        assert_eq!(trace["link"]["source"], serde_json::json!([0]));
        assert_eq!(trace["link"]["target"], serde_json::json!([1]));
        assert_eq!(trace["link"]["value"], serde_json::json!([2]));

        let layout = &value["layout"];
        assert_eq!(layout["title"]["text"], "SPX Price Transitions");
        assert_eq!(layout["font"]["size"], 10.0);
        assert_eq!(layout["width"], 800);
        assert_eq!(layout["height"], 400);
        assert_eq!(layout["annotations"][1]["text"], "t=1.0");
        assert_eq!(layout["annotations"][1]["showarrow"], true);
    }
}
