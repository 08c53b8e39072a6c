use contracts::dashboards::d410_superstore::{
    AnimationOptions, Axis, BarTrace, ChartData, ChoroplethTrace, ColorBar, Frame, FrameTiming,
    Geo, GeoProjection, Layout, Marker, MarkerLine, MenuButton, PieTrace, ScatterTrace, Slider,
    SliderCurrentValue, SliderStep, Trace, TransitionTiming, UpdateMenu,
};

// ---------------------------------------------------------------------------
// Static chart configuration
// ---------------------------------------------------------------------------

/// Six-stop purple scale used by the state heatmap
pub const PURPLE_SCALE: [(f64, &str); 6] = [
    (0.0, "rgb(242,240,247)"),
    (0.2, "rgb(218,218,235)"),
    (0.4, "rgb(188,189,220)"),
    (0.6, "rgb(158,154,200)"),
    (0.8, "rgb(117,107,177)"),
    (1.0, "rgb(84,39,143)"),
];

/// Per-step frame and transition duration of the year animation
pub const TRANSITION_MS: u64 = 1000;

const WHITE: &str = "rgb(255,255,255)";
const SCATTER_MARKER_SIZE: f64 = 15.0;
const SCATTER_OPACITY: f64 = 0.7;

/// Charts of the superstore dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    TotalSales,
    Choropleth,
    Scatter,
    ScatterAnimated,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::TotalSales,
        ChartKind::Choropleth,
        ChartKind::Scatter,
        ChartKind::ScatterAnimated,
        ChartKind::Pie,
    ];

    /// URL segment used by the chart endpoint
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::TotalSales => "total-sales",
            ChartKind::Choropleth => "choropleth",
            ChartKind::Scatter => "scatter",
            ChartKind::ScatterAnimated => "scatter-animated",
            ChartKind::Pie => "pie",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::TotalSales => "Total Sales by Category",
            ChartKind::Choropleth => "State Heatmap by Total Sales (Hover for Profit)",
            ChartKind::Scatter | ChartKind::ScatterAnimated => "Sales vs Profit by Sub-Category",
            ChartKind::Pie => "Share of Sales by Category",
        }
    }
}

// ---------------------------------------------------------------------------
// Projection output
// ---------------------------------------------------------------------------

/// Unstyled data of one trace, as produced by a projection
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Choropleth {
        locations: Vec<String>,
        values: Vec<f64>,
        text: Vec<String>,
    },
    Markers {
        name: String,
        x: Vec<f64>,
        y: Vec<f64>,
        text: Vec<String>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

/// Series of one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSeries {
    pub name: String,
    pub series: Vec<Series>,
}

/// Per-call layout parts that cannot be static
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOverrides {
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub frames: Vec<FrameSeries>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Combine projection output with the static layout of `kind`
pub fn assemble(kind: ChartKind, series: Vec<Series>, overrides: LayoutOverrides) -> ChartData {
    let mut layout = base_layout(kind);

    if let (Some(range), Some(axis)) = (overrides.x_range, layout.xaxis.as_mut()) {
        axis.range = Some(range);
    }
    if let (Some(range), Some(axis)) = (overrides.y_range, layout.yaxis.as_mut()) {
        axis.range = Some(range);
    }

    let frames: Vec<Frame> = overrides
        .frames
        .into_iter()
        .map(|f| Frame {
            name: f.name,
            data: f.series.into_iter().map(to_trace).collect(),
        })
        .collect();

    if !frames.is_empty() {
        layout.sliders = vec![year_slider(&frames)];
        layout.updatemenus = vec![play_pause_menu()];
    }

    ChartData {
        data: series.into_iter().map(to_trace).collect(),
        layout,
        frames,
    }
}

/// Chart with layout only, returned when a projection fails
pub fn empty_chart(kind: ChartKind) -> ChartData {
    assemble(kind, Vec::new(), LayoutOverrides::default())
}

fn axis(title: &str) -> Option<Axis> {
    Some(Axis {
        title: title.to_string(),
        range: None,
    })
}

fn base_layout(kind: ChartKind) -> Layout {
    let title = Some(kind.title().to_string());
    match kind {
        ChartKind::TotalSales => Layout {
            title,
            xaxis: axis("Category"),
            yaxis: axis("Sales"),
            ..Layout::default()
        },
        ChartKind::Choropleth => Layout {
            title,
            geo: Some(Geo {
                scope: "usa".to_string(),
                projection: GeoProjection {
                    kind: "albers usa".to_string(),
                },
                showlakes: true,
                lakecolor: WHITE.to_string(),
            }),
            ..Layout::default()
        },
        ChartKind::Scatter | ChartKind::ScatterAnimated => Layout {
            title,
            xaxis: axis("Sales"),
            yaxis: axis("Profit"),
            hovermode: Some("closest".to_string()),
            ..Layout::default()
        },
        ChartKind::Pie => Layout {
            title,
            ..Layout::default()
        },
    }
}

fn to_trace(series: Series) -> Trace {
    match series {
        Series::Bar { labels, values } => Trace::Bar(BarTrace {
            x: labels,
            y: values,
        }),
        Series::Choropleth {
            locations,
            values,
            text,
        } => Trace::Choropleth(ChoroplethTrace {
            locations,
            z: values,
            text,
            colorscale: PURPLE_SCALE
                .iter()
                .map(|(stop, color)| (*stop, color.to_string()))
                .collect(),
            autocolorscale: false,
            locationmode: "USA-states".to_string(),
            hoverinfo: "text".to_string(),
            marker: Marker {
                size: None,
                line: MarkerLine {
                    color: WHITE.to_string(),
                    width: 2.0,
                },
            },
            colorbar: ColorBar {
                title: "Total Sales".to_string(),
            },
        }),
        Series::Markers { name, x, y, text } => Trace::Scatter(ScatterTrace {
            name,
            x,
            y,
            text,
            mode: "markers".to_string(),
            opacity: SCATTER_OPACITY,
            marker: Marker {
                size: Some(SCATTER_MARKER_SIZE),
                line: MarkerLine {
                    color: "white".to_string(),
                    width: 0.5,
                },
            },
        }),
        Series::Pie { labels, values } => Trace::Pie(PieTrace { labels, values }),
    }
}

fn animation(duration: u64, mode: Option<&str>, fromcurrent: Option<bool>) -> AnimationOptions {
    AnimationOptions {
        frame: FrameTiming {
            duration,
            redraw: false,
        },
        mode: mode.map(str::to_string),
        fromcurrent,
        transition: TransitionTiming { duration },
    }
}

fn year_slider(frames: &[Frame]) -> Slider {
    let steps = frames
        .iter()
        .map(|f| SliderStep {
            label: f.name.clone(),
            method: "animate".to_string(),
            args: (
                vec![f.name.clone()],
                animation(TRANSITION_MS, Some("immediate"), None),
            ),
        })
        .collect();

    Slider {
        active: 0,
        currentvalue: SliderCurrentValue {
            prefix: "Year: ".to_string(),
        },
        steps,
    }
}

fn play_pause_menu() -> UpdateMenu {
    UpdateMenu {
        kind: "buttons".to_string(),
        showactive: false,
        buttons: vec![
            MenuButton {
                label: "Play".to_string(),
                method: "animate".to_string(),
                args: (None, animation(TRANSITION_MS, None, Some(true))),
            },
            MenuButton {
                label: "Pause".to_string(),
                method: "animate".to_string(),
                args: (Some(vec![None]), animation(0, Some("immediate"), None)),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> Series {
        Series::Bar {
            labels: vec!["Tech".to_string()],
            values: vec![150.0],
        }
    }

    #[test]
    fn test_slugs_round_trip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ChartKind::from_slug("histogram"), None);
    }

    #[test]
    fn test_static_layout_is_merged() {
        let chart = assemble(ChartKind::TotalSales, vec![bar()], LayoutOverrides::default());
        assert_eq!(chart.layout.title.as_deref(), Some("Total Sales by Category"));
        assert_eq!(chart.layout.xaxis.as_ref().unwrap().range, None);
        assert!(chart.frames.is_empty());
        assert!(chart.layout.sliders.is_empty());
        assert_eq!(
            chart.data,
            vec![Trace::Bar(BarTrace {
                x: vec!["Tech".to_string()],
                y: vec![150.0],
            })]
        );
    }

    #[test]
    fn test_choropleth_gets_purple_scale() {
        let series = Series::Choropleth {
            locations: vec!["CA".to_string()],
            values: vec![10.0],
            text: vec!["CA".to_string()],
        };
        let chart = assemble(ChartKind::Choropleth, vec![series], LayoutOverrides::default());
        let Trace::Choropleth(trace) = &chart.data[0] else {
            panic!("expected choropleth trace");
        };
        assert_eq!(trace.colorscale.len(), 6);
        assert_eq!(trace.colorscale[5], (1.0, "rgb(84,39,143)".to_string()));
        assert_eq!(trace.locationmode, "USA-states");
        assert_eq!(chart.layout.geo.as_ref().unwrap().scope, "usa");
    }

    #[test]
    fn test_frames_produce_slider_and_buttons() {
        let frames = ["2019", "2020"]
            .iter()
            .map(|y| FrameSeries {
                name: y.to_string(),
                series: vec![],
            })
            .collect();
        let chart = assemble(
            ChartKind::ScatterAnimated,
            vec![],
            LayoutOverrides {
                x_range: Some([0.0, 10.0]),
                y_range: Some([-1.0, 1.0]),
                frames,
            },
        );

        assert_eq!(chart.frames.len(), 2);
        let steps = &chart.layout.sliders[0].steps;
        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2019", "2020"]);
        assert!(steps
            .iter()
            .all(|s| s.args.1.transition.duration == TRANSITION_MS));
        assert_eq!(chart.layout.updatemenus[0].buttons.len(), 2);
        assert_eq!(chart.layout.xaxis.as_ref().unwrap().range, Some([0.0, 10.0]));
        assert_eq!(chart.layout.yaxis.as_ref().unwrap().range, Some([-1.0, 1.0]));
    }

    #[test]
    fn test_serializes_in_plotly_shape() {
        let chart = assemble(ChartKind::Pie, vec![], LayoutOverrides::default());
        let json = serde_json::to_value(&chart).unwrap();
        assert!(json.get("frames").is_none());
        assert_eq!(json["layout"]["title"], "Share of Sales by Category");

        let json = serde_json::to_value(&to_trace(bar())).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["x"][0], "Tech");

        let button = serde_json::to_value(&play_pause_menu()).unwrap();
        assert_eq!(button["type"], "buttons");
        assert!(button["buttons"][0]["args"][0].is_null());
        assert_eq!(button["buttons"][1]["args"][0], serde_json::json!([null]));
    }
}
