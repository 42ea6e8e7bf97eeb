use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::graph::EdgeKind;

/// Node radius of the concept canvas; doubles as the boundary inset.
pub const NODE_RADIUS: f32 = 28.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringConfig {
    pub rest_length: f32,
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringsByKind {
    pub prerequisite: SpringConfig,
    pub related: SpringConfig,
    pub subconcept: SpringConfig,
}

impl Default for SpringsByKind {
    fn default() -> Self {
        Self {
            prerequisite: SpringConfig {
                rest_length: NODE_RADIUS * 4.0,
                strength: 0.5,
            },
            related: SpringConfig {
                rest_length: NODE_RADIUS * 5.0,
                strength: 0.3,
            },
            subconcept: SpringConfig {
                rest_length: NODE_RADIUS * 3.0,
                strength: 0.6,
            },
        }
    }
}

impl SpringsByKind {
    pub fn for_kind(&self, kind: EdgeKind) -> SpringConfig {
        match kind {
            EdgeKind::Prerequisite => self.prerequisite,
            EdgeKind::Related => self.related,
            EdgeKind::Subconcept => self.subconcept,
        }
    }
}

/// Where the focused node is placed when a neighborhood opens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusAnchor {
    #[default]
    ViewportCenter,
    LastPosition,
}

/// Tuning for the force model, solver, focus rings and keep-alive timer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_radius: f32,
    pub repulsion_strength: f32,
    pub distance_min: f32,
    /// `None` means the viewport diagonal.
    pub distance_max: Option<f32>,
    pub springs: SpringsByKind,
    pub centering_strength: f32,
    pub radial_strength: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub iterations: usize,
    pub focus_iterations: usize,
    pub focus_alpha: f32,
    pub drag_alpha_target: f32,
    pub focus_anchor: FocusAnchor,
    pub ring_radius: f32,
    pub inner_ring_factor: f32,
    pub outer_ring_factor: f32,
    pub continuous_interval_ms: u64,
    pub continuous_alpha: f32,
    pub initial_spread: f32,
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: NODE_RADIUS,
            repulsion_strength: 500.0,
            distance_min: NODE_RADIUS * 2.0,
            distance_max: None,
            springs: SpringsByKind::default(),
            centering_strength: 0.05,
            radial_strength: 0.3,
            collision_radius: NODE_RADIUS * 1.5,
            collision_strength: 0.7,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            velocity_decay: 0.3,
            iterations: 300,
            focus_iterations: 30,
            focus_alpha: 0.1,
            drag_alpha_target: 0.3,
            focus_anchor: FocusAnchor::ViewportCenter,
            ring_radius: 180.0,
            inner_ring_factor: 0.5,
            outer_ring_factor: 1.5,
            continuous_interval_ms: 15_000,
            continuous_alpha: 0.1,
            initial_spread: 100.0,
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("invalid layout config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout config {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn continuous_interval(&self) -> Duration {
        Duration::from_millis(self.continuous_interval_ms)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        non_negative("nodeRadius", self.node_radius)?;
        non_negative("repulsionStrength", self.repulsion_strength)?;
        non_negative("distanceMin", self.distance_min)?;
        if let Some(distance_max) = self.distance_max {
            non_negative("distanceMax", distance_max)?;
        }
        for (field, spring) in [
            ("springs.prerequisite", self.springs.prerequisite),
            ("springs.related", self.springs.related),
            ("springs.subconcept", self.springs.subconcept),
        ] {
            non_negative(field, spring.rest_length)?;
            non_negative(field, spring.strength)?;
        }
        non_negative("centeringStrength", self.centering_strength)?;
        non_negative("radialStrength", self.radial_strength)?;
        non_negative("collisionRadius", self.collision_radius)?;
        non_negative("collisionStrength", self.collision_strength)?;
        unit_interval("alphaDecay", self.alpha_decay)?;
        unit_interval("alphaMin", self.alpha_min)?;
        unit_interval("velocityDecay", self.velocity_decay)?;
        unit_interval("focusAlpha", self.focus_alpha)?;
        unit_interval("dragAlphaTarget", self.drag_alpha_target)?;
        unit_interval("continuousAlpha", self.continuous_alpha)?;
        non_negative("ringRadius", self.ring_radius)?;
        non_negative("innerRingFactor", self.inner_ring_factor)?;
        non_negative("outerRingFactor", self.outer_ring_factor)?;
        non_negative("initialSpread", self.initial_spread)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            field,
            reason: format!("expected a finite non-negative number, got {value}"),
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), LayoutError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LayoutError::InvalidConfig {
            field,
            reason: format!("expected a value in [0, 1], got {value}"),
        })
    }
}
