//! Field of view: a fan of rays cast from an origin around a facing
//! direction, each cut short by the first wall it hits.
//!
//! The fan has a fixed number of rays chosen at construction. Every call to
//! [`FieldOfView::update`] recomputes all of them in place.

use crate::arena::Obstacle;
use crate::config::{FieldOfViewConfig, MAX_RAYS};
use crate::error::{GeometryError, SightError};
use crate::geometry::{
    Point, Segment, rotate, segments_intersect, segments_intersect_exact, segments_intersection,
    try_normalize, vector,
};

/// How the nearest wall hit of a ray is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitPolicy {
    /// Line-test intersection (collinear counts as a hit) and axis-based
    /// closeness: hits are ordered by their x distance from the origin, or by
    /// y distance when the hit shares the origin's x.
    #[default]
    Reference,
    /// Proper segment overlap and smallest distance along the ray.
    Exact,
}

#[derive(Debug, Clone)]
pub struct FieldOfView {
    origin: Point,
    target_dir: Point, // Central direction; only its direction matters
    angle: f64,        // Total field angle in radians
    spacing: f64,      // Radians between two consecutive rays
    sentinel_length: f64,
    policy: HitPolicy,
    rays: Vec<Segment>,
}

impl FieldOfView {
    pub fn new(config: FieldOfViewConfig) -> Result<Self, SightError> {
        if !(config.spacing > 0.0) {
            return Err(SightError::InvalidSpacing(config.spacing));
        }
        if !(config.angle >= 0.0) {
            return Err(SightError::InvalidAngle(config.angle));
        }
        if !(config.sentinel_length > 0.0) {
            return Err(SightError::InvalidSentinel(config.sentinel_length));
        }

        // The epsilon keeps ratios like 0.3 / 0.1 from truncating one ray short
        let ratio = (config.angle / config.spacing + 1e-9).floor();
        if !ratio.is_finite() || ratio >= MAX_RAYS as f64 {
            return Err(SightError::InvalidAngle(config.angle));
        }
        let ray_count = ratio as usize + 1;

        Ok(FieldOfView {
            origin: Point::ZERO,
            target_dir: Point::new(1.0, 1.0),
            angle: config.angle,
            spacing: config.spacing,
            sentinel_length: config.sentinel_length,
            policy: HitPolicy::default(),
            rays: vec![Segment::default(); ray_count],
        })
    }

    pub fn with_policy(mut self, policy: HitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> HitPolicy {
        self.policy
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_target_direction(&mut self, target_dir: Point) {
        self.target_dir = target_dir;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn ray_count(&self) -> usize {
        self.rays.len()
    }

    /// Visible extent of every ray, leftmost first
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// Recasts every ray from the current origin and direction.
    /// Fails on a zero target direction, leaving the previous fan as it was.
    pub fn update(&mut self, obstacles: &[Obstacle]) -> Result<(), GeometryError> {
        // Leftmost ray, stretched to "infinity"
        let mut current = try_normalize(rotate(self.target_dir, -self.angle / 2.0))?
            * self.sentinel_length;

        let origin = self.origin;
        let mut blocked = 0;
        for i in 0..self.rays.len() {
            let far_end = origin + current;
            let end = self.find_intersection_end(obstacles, origin, far_end);
            if end != far_end {
                blocked += 1;
            }
            self.rays[i] = Segment::new(origin, end);
            current = rotate(current, self.spacing);
        }

        log::trace!(
            target: "sight",
            "Fan from ({:.1}, {:.1}): {} of {} rays blocked",
            origin.x,
            origin.y,
            blocked,
            self.rays.len()
        );
        Ok(())
    }

    /// First point on the ray from `origin` toward `far_end` that touches a
    /// wall, or `far_end` itself when nothing is in the way.
    pub fn find_intersection_end(&self, obstacles: &[Obstacle], origin: Point, far_end: Point) -> Point {
        match self.policy {
            HitPolicy::Reference => nearest_hit_reference(obstacles, origin, far_end),
            HitPolicy::Exact => nearest_hit_exact(obstacles, origin, far_end),
        }
    }
}

fn nearest_hit_reference(obstacles: &[Obstacle], origin: Point, far_end: Point) -> Point {
    let mut best = far_end;

    for (a, b) in obstacles.iter().flat_map(|o| o.edges()) {
        if !segments_intersect(a, b, origin, far_end) {
            continue;
        }
        // Parallel edges have no single crossing point
        let Some(hit) = segments_intersection(a, b, origin, far_end) else {
            continue;
        };
        if is_closer_by_axis(origin, hit, best) {
            best = hit;
        }
    }

    best
}

/// Axis-based ordering of two hits relative to the origin
pub fn is_closer_by_axis(origin: Point, candidate: Point, best: Point) -> bool {
    (candidate.x == origin.x && (candidate.y - origin.y).abs() < (best.y - origin.y).abs())
        || (candidate.x - origin.x).abs() < (best.x - origin.x).abs()
}

fn nearest_hit_exact(obstacles: &[Obstacle], origin: Point, far_end: Point) -> Point {
    let ray = vector(origin, far_end);
    let ray_len_sq = ray.length_squared();
    // Position along the ray, 0 at the origin and 1 at the far end
    let param = |p: Point| vector(origin, p).dot(ray) / ray_len_sq;

    let mut best_t = 1.0;
    let mut best = far_end;
    for (a, b) in obstacles.iter().flat_map(|o| o.edges()) {
        if !segments_intersect_exact(a, b, origin, far_end) {
            continue;
        }
        let (t, hit) = match segments_intersection(a, b, origin, far_end) {
            Some(hit) => (param(hit), hit),
            // Edge lying along the ray: the overlap starts at the origin when
            // the origin is on the edge, else at the nearer edge endpoint
            None => {
                let (ta, tb) = (param(a), param(b));
                if ta.min(tb) <= 0.0 && ta.max(tb) >= 0.0 {
                    (0.0, origin)
                } else if ta < tb {
                    (ta, a)
                } else {
                    (tb, b)
                }
            }
        };
        if (0.0..best_t).contains(&t) {
            best_t = t;
            best = hit;
        }
    }

    best
}
