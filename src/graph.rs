//! Graph viewport
//!
//! Decides what the graph area shows and hands the rest to a
//! [`GraphRenderer`]. The viewport owns no layout state: it measures its
//! container once per result, and passes the measured size, the graph
//! payload (unmodified) and the presentation hints to the renderer.

use crate::types::{AnalysisResult, GraphLink, GraphNode};
use ratatui::{buffer::Buffer, layout::Rect};
use serde::{Deserialize, Serialize};

/// Size of the graph container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(600, 500)
    }
}

impl From<Rect> for ViewportSize {
    fn from(area: Rect) -> Self {
        Self::new(area.width as u32, area.height as u32)
    }
}

/// Which node field labels a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelField {
    Id,
    Group,
}

impl LabelField {
    pub fn label_of(&self, node: &GraphNode) -> String {
        match self {
            LabelField::Id => node.id.clone(),
            LabelField::Group => node.group.to_string(),
        }
    }
}

/// Presentation hints passed through to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphHints {
    /// Assign node colors per group
    #[serde(default = "default_true")]
    pub color_by_group: bool,

    #[serde(default = "default_label")]
    pub label: LabelField,

    /// Particles travelling along each link
    #[serde(default = "default_particles")]
    pub particles: u8,

    /// Fraction of a link a particle advances per frame
    #[serde(default = "default_particle_speed")]
    pub particle_speed: f64,

    /// `#rrggbb`
    #[serde(default = "default_background")]
    pub background: String,

    /// Relative node size
    #[serde(default = "default_node_size")]
    pub node_size: u8,

    /// `#rrggbb`
    #[serde(default = "default_link_color")]
    pub link_color: String,
}

impl Default for GraphHints {
    fn default() -> Self {
        Self {
            color_by_group: true,
            label: default_label(),
            particles: default_particles(),
            particle_speed: default_particle_speed(),
            background: default_background(),
            node_size: default_node_size(),
            link_color: default_link_color(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_label() -> LabelField {
    LabelField::Id
}

fn default_particles() -> u8 {
    2
}

fn default_particle_speed() -> f64 {
    0.005
}

fn default_background() -> String {
    "#0f172a".to_string()
}

fn default_node_size() -> u8 {
    6
}

fn default_link_color() -> String {
    "#475569".to_string()
}

/// Parse `#rrggbb` into its components
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Shown instead of a graph when there is nothing to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub icon: &'static str,
    pub headline: &'static str,
    pub guidance: &'static str,
}

pub const WAITING_PLACEHOLDER: Placeholder = Placeholder {
    icon: "◔",
    headline: "Waiting for analysis...",
    guidance: "Submit text to generate the knowledge graph",
};

/// Everything the renderer receives
#[derive(Debug, Clone, Copy)]
pub struct GraphScene<'a> {
    pub width: u32,
    pub height: u32,
    pub nodes: &'a [GraphNode],
    pub links: &'a [GraphLink],
    pub hints: &'a GraphHints,
}

/// What the graph area shows
#[derive(Debug, Clone, Copy)]
pub enum ViewportContent<'a> {
    Placeholder(Placeholder),
    Graph(GraphScene<'a>),
}

/// External force-directed graph renderer
///
/// Implementations own their layout and animation state.
pub trait GraphRenderer {
    fn render(&mut self, scene: &GraphScene<'_>, area: Rect, buf: &mut Buffer);
}

/// Measured container plus the result revision it was measured for
#[derive(Debug, Clone, Default)]
pub struct GraphViewport {
    size: ViewportSize,
    measured_revision: Option<u64>,
}

impl GraphViewport {
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn needs_measure(&self, revision: u64) -> bool {
        self.measured_revision != Some(revision)
    }

    pub fn record_measurement(&mut self, size: ViewportSize, revision: u64) {
        self.size = size;
        self.measured_revision = Some(revision);
    }

    /// Decide between placeholder and graph for the current result
    pub fn content<'a>(
        &self,
        result: Option<&'a AnalysisResult>,
        hints: &'a GraphHints,
    ) -> ViewportContent<'a> {
        match result.and_then(|r| r.graph_data.as_ref()) {
            Some(graph) => ViewportContent::Graph(GraphScene {
                width: self.size.width,
                height: self.size.height,
                nodes: &graph.nodes,
                links: &graph.links,
                hints,
            }),
            None => ViewportContent::Placeholder(WAITING_PLACEHOLDER),
        }
    }
}
