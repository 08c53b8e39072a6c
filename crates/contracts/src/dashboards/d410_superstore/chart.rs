use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// Chart-ready figure in the shape the plotly renderer expects:
/// `{ data: [...], layout: {...}, frames: [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub data: Vec<Trace>,
    pub layout: Layout,
    /// Animation frames keyed by year label, ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

/// One time slice of an animated chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Choropleth(ChoroplethTrace),
    Scatter(ScatterTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    /// Two-letter region codes
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    /// Hover text per location
    pub text: Vec<String>,
    pub colorscale: Vec<(f64, String)>,
    pub autocolorscale: bool,
    pub locationmode: String,
    pub hoverinfo: String,
    pub marker: Marker,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub mode: String,
    pub opacity: f64,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    pub line: MarkerLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLine {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBar {
    pub title: String,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sliders: Vec<Slider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updatemenus: Vec<UpdateMenu>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    /// Fixed `[min, max]`; `None` lets the renderer autoscale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub scope: String,
    pub projection: GeoProjection,
    pub showlakes: bool,
    pub lakecolor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoProjection {
    #[serde(rename = "type")]
    pub kind: String,
}

// ---------------------------------------------------------------------------
// Animation controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub active: usize,
    pub currentvalue: SliderCurrentValue,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderCurrentValue {
    pub prefix: String,
}

/// Slider step; `args` serializes as `[[frame_name], options]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    pub args: (Vec<String>, AnimationOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: String,
    pub showactive: bool,
    pub buttons: Vec<MenuButton>,
}

/// Play/pause button. `args.0` is `null` to play all frames,
/// `[null]` to stop on the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub method: String,
    pub args: (Option<Vec<Option<String>>>, AnimationOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    pub frame: FrameTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fromcurrent: Option<bool>,
    pub transition: TransitionTiming,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTiming {
    pub duration: u64,
    pub redraw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    pub duration: u64,
}
