// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Force-directed placement for node-link diagrams.
//!
//! A damped velocity simulation with three forces: springs along links, pairwise repulsion
//! between all nodes, and a centering shift. Initial positions follow a phyllotaxis spiral, so
//! the result is a pure function of the inputs.
//!
//! Nodes may pin either coordinate. Pinned coordinates never move, and an axis with any pinned
//! node is not recentered.

use core::f64::consts::PI;

use kurbo::{Point, Vec2};

/// Simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceLayout {
    /// Rest length of every link.
    pub link_distance: f64,
    /// Pairwise charge; negative values repel.
    pub charge: f64,
    /// Where the free nodes' centroid is kept.
    pub center: Point,
    /// Number of ticks until the simulation has cooled.
    pub iterations: usize,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            link_distance: 30.0,
            charge: -30.0,
            center: Point::ORIGIN,
            iterations: 300,
            velocity_decay: 0.4,
        }
    }
}

/// Coordinates a node is held at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pin {
    /// Fixed x.
    pub x: Option<f64>,
    /// Fixed y.
    pub y: Option<f64>,
}

const ALPHA_MIN: f64 = 0.001;
const DISTANCE_MIN2: f64 = 1.0;
const INITIAL_RADIUS: f64 = 10.0;

impl ForceLayout {
    /// Centers the layout on `center`.
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    /// Places `pins.len()` nodes joined by `links` of node indices.
    ///
    /// Links naming a node out of range are ignored.
    pub fn run(&self, pins: &[Pin], links: &[(usize, usize)]) -> Vec<Point> {
        let n = pins.len();
        let links: Vec<(usize, usize)> = links
            .iter()
            .copied()
            .filter(|(s, t)| *s < n && *t < n && s != t)
            .collect();
        let mut degree = vec![0_usize; n];
        for (s, t) in &links {
            degree[*s] += 1;
            degree[*t] += 1;
        }

        let golden = PI * (3.0 - 5.0_f64.sqrt());
        let mut pos: Vec<Point> = pins
            .iter()
            .enumerate()
            .map(|(i, pin)| {
                #[allow(clippy::cast_precision_loss, reason = "node counts are small")]
                let i = i as f64;
                let r = INITIAL_RADIUS * (0.5 + i).sqrt();
                let a = i * golden;
                Point::new(
                    pin.x.unwrap_or(self.center.x + r * a.cos()),
                    pin.y.unwrap_or(self.center.y + r * a.sin()),
                )
            })
            .collect();
        let mut vel = vec![Vec2::ZERO; n];

        #[allow(clippy::cast_precision_loss, reason = "iteration counts are small")]
        let decay = 1.0 - ALPHA_MIN.powf(1.0 / self.iterations.max(1) as f64);
        let mut alpha = 1.0_f64;
        for tick in 0..self.iterations {
            alpha += -alpha * decay;

            for (s, t) in &links {
                let (s, t) = (*s, *t);
                let mut d = (pos[t] + vel[t]) - (pos[s] + vel[s]);
                if d.hypot2() == 0.0 {
                    d = jiggle(tick, s, t);
                }
                let l = d.hypot();
                #[allow(clippy::cast_precision_loss, reason = "degrees are small")]
                let (strength, bias) = (
                    1.0 / degree[s].min(degree[t]) as f64,
                    degree[s] as f64 / (degree[s] + degree[t]) as f64,
                );
                let d = d * ((l - self.link_distance) / l * alpha * strength);
                vel[t] -= d * bias;
                vel[s] += d * (1.0 - bias);
            }

            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let mut d = pos[j] - pos[i];
                    if d.hypot2() == 0.0 {
                        d = jiggle(tick, i, j);
                    }
                    let mut l = d.hypot2();
                    if l < DISTANCE_MIN2 {
                        l = (DISTANCE_MIN2 * l).sqrt();
                    }
                    vel[i] += d * (self.charge * alpha / l);
                }
            }

            for (i, pin) in pins.iter().enumerate() {
                let v = &mut vel[i];
                *v *= 1.0 - self.velocity_decay;
                match pin.x {
                    Some(x) => {
                        pos[i].x = x;
                        v.x = 0.0;
                    }
                    None => pos[i].x += v.x,
                }
                match pin.y {
                    Some(y) => {
                        pos[i].y = y;
                        v.y = 0.0;
                    }
                    None => pos[i].y += v.y,
                }
            }

            self.recenter(pins, &mut pos);
        }
        tracing::trace!(nodes = n, links = links.len(), "force layout settled");
        pos
    }

    fn recenter(&self, pins: &[Pin], pos: &mut [Point]) {
        if pos.is_empty() {
            return;
        }
        #[allow(clippy::cast_precision_loss, reason = "node counts are small")]
        let n = pos.len() as f64;
        let mean = pos.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2()) / n;
        // An axis with pinned nodes is already anchored.
        let shift = Vec2::new(
            if pins.iter().all(|p| p.x.is_none()) { self.center.x - mean.x } else { 0.0 },
            if pins.iter().all(|p| p.y.is_none()) { self.center.y - mean.y } else { 0.0 },
        );
        for p in pos.iter_mut() {
            *p += shift;
        }
    }
}

/// A tiny deterministic nudge for coincident nodes.
fn jiggle(tick: usize, a: usize, b: usize) -> Vec2 {
    #[allow(clippy::cast_precision_loss, reason = "only the low bits matter")]
    let seed = ((tick * 31 + a * 17 + b * 7) % 97) as f64;
    Vec2::new((seed / 97.0 - 0.5) * 1e-6, (0.5 - seed / 97.0) * 1e-6 + 1e-7)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(n: usize) -> Vec<Pin> {
        vec![Pin::default(); n]
    }

    #[test]
    fn layout_is_deterministic() {
        let layout = ForceLayout::default();
        let links = [(0, 1), (1, 2), (2, 0), (2, 3)];
        assert_eq!(layout.run(&free(4), &links), layout.run(&free(4), &links));
    }

    #[test]
    fn free_nodes_are_centered() {
        let center = Point::new(300.0, 200.0);
        let pos = ForceLayout::default().with_center(center).run(&free(5), &[(0, 1), (3, 4)]);
        let mean = pos.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2()) / 5.0;
        assert!((mean.x - center.x).abs() < 1e-6);
        assert!((mean.y - center.y).abs() < 1e-6);
    }

    #[test]
    fn linked_nodes_end_closer_than_unlinked() {
        let pos = ForceLayout::default().run(&free(3), &[(0, 1)]);
        assert!(pos[0].distance(pos[1]) < pos[0].distance(pos[2]));
    }

    #[test]
    fn pinned_coordinates_stay_put() {
        let pins = [
            Pin {
                x: Some(10.0),
                y: Some(20.0),
            },
            Pin {
                x: Some(50.0),
                y: None,
            },
            Pin::default(),
        ];
        let pos = ForceLayout::default().run(&pins, &[(0, 1), (1, 2)]);
        assert_eq!(pos[0], Point::new(10.0, 20.0));
        assert_eq!(pos[1].x, 50.0);
        assert!(pos.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn dangling_links_are_ignored() {
        let pos = ForceLayout::default().run(&free(2), &[(0, 5), (1, 1)]);
        assert_eq!(pos.len(), 2);
        assert!(pos.iter().all(|p| p.x.is_finite()));
    }
}
