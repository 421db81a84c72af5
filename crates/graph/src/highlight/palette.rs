//! Visual roles and the colors they map to

use super::focus::FocusSource;
use citemap_common::config::PaletteConfig;
use citemap_common::errors::{AppError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Highlight role of a node in the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// No focus this frame
    #[default]
    Default,
    /// Unrelated to the focused paper
    Dimmed,
    /// Transitively cited by the focused paper
    Downstream,
    /// Transitively cites the focused paper
    Upstream,
    Focus,
}

/// Highlight role of an edge in the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EdgeRole {
    #[default]
    Default,
    Dimmed,
    /// Leaves a downstream node
    Downstream,
    /// Leaves the focused paper itself
    Active,
    /// Enters an upstream node
    Upstream,
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = AppError;

    /// Parse `#rrggbb` or `#rrggbbaa`; six digits mean fully opaque
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AppError::Configuration {
            message: format!("Invalid color '{}': expected #rrggbb or #rrggbbaa", s),
        };

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { byte(6)? } else { 0xff };

        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parsed highlight palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub idle_edge: Rgba,
    pub dimmed_edge_clicked: Rgba,
    pub dimmed_edge_hovered: Rgba,
    pub base_node: Rgba,
    pub label: Rgba,
    pub downstream: Rgba,
    pub active_edge: Rgba,
    pub upstream: Rgba,
    pub clicked_focus: Rgba,
    pub clicked_focus_label: Rgba,
    pub hovered_focus: Rgba,
}

impl Palette {
    /// Parse every configured color, failing on the first malformed one
    pub fn from_config(config: &PaletteConfig) -> Result<Self> {
        Ok(Self {
            idle_edge: config.idle_edge.parse()?,
            dimmed_edge_clicked: config.dimmed_edge_clicked.parse()?,
            dimmed_edge_hovered: config.dimmed_edge_hovered.parse()?,
            base_node: config.base_node.parse()?,
            label: config.label.parse()?,
            downstream: config.downstream.parse()?,
            active_edge: config.active_edge.parse()?,
            upstream: config.upstream.parse()?,
            clicked_focus: config.clicked_focus.parse()?,
            clicked_focus_label: config.clicked_focus_label.parse()?,
            hovered_focus: config.hovered_focus.parse()?,
        })
    }

    pub fn node_color(&self, role: NodeRole, source: Option<FocusSource>) -> Rgba {
        match role {
            NodeRole::Default | NodeRole::Dimmed => self.base_node,
            NodeRole::Downstream => self.downstream,
            NodeRole::Upstream => self.upstream,
            NodeRole::Focus => match source {
                Some(FocusSource::Click) => self.clicked_focus,
                _ => self.hovered_focus,
            },
        }
    }

    pub fn label_color(&self, role: NodeRole, source: Option<FocusSource>) -> Rgba {
        match (role, source) {
            (NodeRole::Focus, Some(FocusSource::Click)) => self.clicked_focus_label,
            _ => self.label,
        }
    }

    pub fn edge_color(&self, role: EdgeRole, source: Option<FocusSource>) -> Rgba {
        match role {
            EdgeRole::Default => self.idle_edge,
            EdgeRole::Dimmed => match source {
                Some(FocusSource::Click) => self.dimmed_edge_clicked,
                _ => self.dimmed_edge_hovered,
            },
            EdgeRole::Downstream => self.downstream,
            EdgeRole::Active => self.active_edge,
            EdgeRole::Upstream => self.upstream,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle_edge: Rgba::new(0x12, 0x12, 0x12, 0xff),
            dimmed_edge_clicked: Rgba::new(0x21, 0x21, 0x21, 0xff),
            dimmed_edge_hovered: Rgba::new(0x00, 0x00, 0x00, 0x2a),
            base_node: Rgba::new(0x00, 0x77, 0xcc, 0x32),
            label: Rgba::new(0xff, 0xff, 0xff, 0xff),
            downstream: Rgba::new(0xff, 0xb6, 0x2d, 0xff),
            active_edge: Rgba::new(0xff, 0xa5, 0x00, 0xff),
            upstream: Rgba::new(0xe3, 0x2c, 0xff, 0xff),
            clicked_focus: Rgba::new(0xf2, 0xff, 0x00, 0xff),
            clicked_focus_label: Rgba::new(0x00, 0x00, 0x00, 0xff),
            hovered_focus: Rgba::new(0x84, 0xf1, 0xff, 0xff),
        }
    }
}
