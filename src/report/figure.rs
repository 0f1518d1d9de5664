// src/report/figure.rs
//! Plotly figure model. Only the attributes the report sets are modelled;
//! the structs serialize straight to the JSON `Plotly.newPlot` expects.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    /// As-of calendar date.
    pub name: String,
    pub x: Vec<NaiveDate>,
    /// `None` serializes as `null`, which Plotly draws as a gap.
    pub y: Vec<Option<f64>>,
    pub visible: bool,
    pub zorder: i32,
    /// Owning jurisdiction; shown in the hover label.
    #[serde(rename = "meta")]
    pub jurisdiction: String,
    pub hovertemplate: &'static str,
}

impl Trace {
    pub fn scatter(jurisdiction: &str, as_of: NaiveDate, points: &[(NaiveDate, Option<f64>)]) -> Self {
        Self {
            kind: "scatter",
            mode: "lines+markers",
            name: as_of.format("%Y-%m-%d").to_string(),
            x: points.iter().map(|(d, _)| *d).collect(),
            y: points.iter().map(|(_, v)| *v).collect(),
            visible: false,
            zorder: 0,
            jurisdiction: s!(jurisdiction),
            hovertemplate: "%{meta}, week ending %{x}: %{y}<extra>as of %{fullData.name}</extra>",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub title: Text,
    pub showlegend: bool,
    pub legend: Legend,
    pub margin: Margin,
    pub autosize: bool,
    pub width: u32,
    pub paper_bgcolor: &'static str,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub updatemenus: Vec<UpdateMenu>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[NaiveDate; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    pub automargin: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateMenu {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub active: usize,
    pub showactive: bool,
    pub buttons: Vec<Button>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    pub method: &'static str,
    pub args: (Restyle,),
}

impl Button {
    pub fn visible(&self) -> &[bool] { &self.args.0.visible }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Restyle {
    pub visible: Vec<bool>,
}

impl Layout {
    pub fn new(title: String) -> Self {
        Self {
            title: Text { text: title },
            showlegend: true,
            legend: Legend { orientation: "h", y: 1.2 },
            margin: Margin { l: 0, r: 0, t: 90, b: 40 },
            autosize: false,
            width: 800,
            paper_bgcolor: "rgba(0,0,0,0)",
            xaxis: Axis { automargin: true, ..Axis::default() },
            yaxis: Axis { automargin: true, ..Axis::default() },
            updatemenus: Vec::new(),
        }
    }
}

impl Figure {
    /// `<div>` plus the script that draws into it. plotly.js itself is
    /// expected to be loaded by the page.
    pub fn to_html_snippet(&self, div_id: &str) -> Result<String> {
        let render = |e: serde_json::Error| Error::Render { id: s!(div_id), reason: e.to_string() };
        let data = serde_json::to_string(&self.data).map_err(render)?;
        let layout = serde_json::to_string(&self.layout).map_err(render)?;
        let id = serde_json::to_string(div_id).map_err(render)?;
        // a literal "</script>" in any label would end the script element early
        let data = data.replace("</", "<\\/");
        let layout = layout.replace("</", "<\\/");

        Ok(format!(
            "<div id={id} class=\"plotly-graph-div\"></div>\n\
             <script type=\"text/javascript\">\n\
             window.PLOTLYENV = window.PLOTLYENV || {{}};\n\
             Plotly.newPlot({id}, {data}, {layout}, {{\"responsive\": true}});\n\
             </script>\n"
        ))
    }
}
