//! Canvas graph renderer
//!
//! Draws the knowledge graph with braille markers. Nodes sit on rings,
//! clustered by group in first-seen order; there is no physics. Particles
//! travel along each link, advancing every frame.

use crate::graph::{parse_hex_color, GraphRenderer, GraphScene};
use crate::types::GraphNode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        Widget,
    },
};
use std::collections::HashMap;

/// Colors handed out to groups in first-seen order
const GROUP_PALETTE: [Color; 8] = [
    Color::LightBlue,
    Color::LightGreen,
    Color::Rgb(251, 146, 60),
    Color::LightMagenta,
    Color::LightCyan,
    Color::LightYellow,
    Color::LightRed,
    Color::Rgb(167, 139, 250),
];

/// Above this many nodes the layout switches to two rings
const SINGLE_RING_MAX: usize = 16;
/// Above this many nodes labels are omitted
const LABEL_MAX: usize = 40;

/// Group → color, in first-seen order
pub fn group_colors(nodes: &[GraphNode]) -> Vec<(String, Color)> {
    let mut colors: Vec<(String, Color)> = Vec::new();
    for node in nodes {
        let group = node.group.to_string();
        if !colors.iter().any(|(g, _)| *g == group) {
            let color = GROUP_PALETTE[colors.len() % GROUP_PALETTE.len()];
            colors.push((group, color));
        }
    }
    colors
}

fn rgb(value: &str, fallback: Color) -> Color {
    parse_hex_color(value)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(fallback)
}

/// Ratatui canvas implementation of the graph renderer
#[derive(Debug, Default)]
pub struct CanvasGraphRenderer {
    frame: u64,
}

impl CanvasGraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node positions in scene coordinates, keyed by id
    pub fn layout<'a>(scene: &GraphScene<'a>) -> HashMap<&'a str, (f64, f64)> {
        let width = scene.width.max(1) as f64;
        let height = scene.height.max(1) as f64;
        let (cx, cy) = (width / 2.0, height / 2.0);

        let mut order: Vec<(usize, &GraphNode)> = scene.nodes.iter().enumerate().collect();
        let groups = group_colors(scene.nodes);
        let rank = |node: &GraphNode| {
            let group = node.group.to_string();
            groups.iter().position(|(g, _)| *g == group).unwrap_or(0)
        };
        order.sort_by_key(|(i, node)| (rank(node), *i));

        let count = order.len();
        let mut positions = HashMap::with_capacity(count);
        for (slot, (_, node)) in order.into_iter().enumerate() {
            let angle = std::f64::consts::TAU * slot as f64 / count as f64;
            let ring = if count > SINGLE_RING_MAX && slot % 2 == 1 {
                0.24
            } else {
                0.40
            };
            let x = cx + ring * width * angle.cos();
            let y = cy + ring * height * angle.sin();
            // Duplicate ids keep the first position
            positions.entry(node.id.as_str()).or_insert((x, y));
        }
        positions
    }
}

impl GraphRenderer for CanvasGraphRenderer {
    fn render(&mut self, scene: &GraphScene<'_>, area: Rect, buf: &mut Buffer) {
        let hints = scene.hints;
        let width = scene.width.max(1) as f64;
        let height = scene.height.max(1) as f64;
        let positions = Self::layout(scene);

        let colors: HashMap<String, Color> = group_colors(scene.nodes).into_iter().collect();
        let node_color = |node: &GraphNode| {
            if hints.color_by_group {
                colors
                    .get(&node.group.to_string())
                    .copied()
                    .unwrap_or(Color::White)
            } else {
                GROUP_PALETTE[0]
            }
        };

        // Links to unknown nodes are skipped
        let segments: Vec<((f64, f64), (f64, f64))> = scene
            .links
            .iter()
            .filter_map(|link| {
                Some((
                    *positions.get(link.source.as_str())?,
                    *positions.get(link.target.as_str())?,
                ))
            })
            .collect();

        let frame = self.frame as f64;
        let particles: Vec<(f64, f64)> = if hints.particles == 0 {
            Vec::new()
        } else {
            let per_link = hints.particles as usize;
            segments
                .iter()
                .flat_map(|&((x1, y1), (x2, y2))| {
                    (0..per_link).map(move |p| (x1, y1, x2, y2, p))
                })
                .map(|(x1, y1, x2, y2, p)| {
                    let t = (frame * hints.particle_speed + p as f64 / per_link as f64).fract();
                    (x1 + (x2 - x1) * t, y1 + (y2 - y1) * t)
                })
                .collect()
        };

        let radius = hints.node_size as f64 * width.min(height) / 100.0;
        let link_color = rgb(&hints.link_color, Color::DarkGray);
        let show_labels = scene.nodes.len() <= LABEL_MAX;

        Canvas::default()
            .background_color(rgb(&hints.background, Color::Reset))
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for &((x1, y1), (x2, y2)) in &segments {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: link_color,
                    });
                }
                ctx.layer();

                ctx.draw(&Points {
                    coords: &particles,
                    color: Color::White,
                });
                ctx.layer();

                for node in scene.nodes {
                    if let Some(&(x, y)) = positions.get(node.id.as_str()) {
                        let color = node_color(node);
                        ctx.draw(&Circle {
                            x,
                            y,
                            radius,
                            color,
                        });
                        if show_labels {
                            ctx.print(
                                x + radius,
                                y,
                                Span::styled(hints.label.label_of(node), Style::default().fg(color)),
                            );
                        }
                    }
                }
            })
            .render(area, buf);

        self.frame = self.frame.wrapping_add(1);
    }
}
