use crate::config::{SCATTER_MAX_ATTEMPTS, SCATTER_WALL_SIZE};
use crate::error::{ArenaError, ObstacleError};
use crate::geometry::{Orientation, Point, orientation, rotate, vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::FRAC_PI_2;

// A static convex wall blocking both movement and sight
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    vertices: Vec<Point>, // Absolute coordinates, closed implicitly (last -> first)
}

impl Obstacle {
    /// Builds a wall from an ordered vertex list.
    /// The polygon must have at least 3 vertices and be convex (either winding).
    pub fn new(vertices: Vec<Point>) -> Result<Self, ObstacleError> {
        if vertices.len() < 3 {
            return Err(ObstacleError::TooFewVertices(vertices.len()));
        }

        // Every turn along the boundary must go the same way. Straight
        // (collinear) corners are tolerated, a fully degenerate polygon is not.
        let n = vertices.len();
        let mut winding: Option<Orientation> = None;
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            match orientation(vector(a, b), vector(b, c)) {
                Orientation::Collinear => continue,
                turn => match winding {
                    None => winding = Some(turn),
                    Some(w) if w != turn => return Err(ObstacleError::NotConvex),
                    Some(_) => {}
                },
            }
        }
        if winding.is_none() {
            return Err(ObstacleError::NotConvex);
        }

        Ok(Obstacle { vertices })
    }

    /// Axis-aligned rectangle with its top-left corner at (x, y)
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self, ObstacleError> {
        Obstacle::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Square of the given side centered on `center`, rotated by `angle` radians
    pub fn square(center: Point, side: f64, angle: f64) -> Result<Self, ObstacleError> {
        let half = side / 2.0;
        let corner = rotate(Point::new(half, half), angle);
        let vertices = (0..4)
            .map(|i| center + rotate(corner, i as f64 * FRAC_PI_2))
            .collect();
        Obstacle::new(vertices)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Edges as vertex pairs, including the closing edge back to the first vertex
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn centroid(&self) -> Point {
        let sum = self
            .vertices
            .iter()
            .fold(Point::ZERO, |acc, &v| acc + v);
        sum / self.vertices.len() as f64
    }

    /// Whether `point` lies inside the wall or on its boundary
    pub fn contains_point(&self, point: Point) -> bool {
        let mut side: Option<Orientation> = None;
        for (a, b) in self.edges() {
            match orientation(vector(a, b), vector(a, point)) {
                Orientation::Collinear => continue,
                turn => match side {
                    None => side = Some(turn),
                    Some(s) if s != turn => return false,
                    Some(_) => {}
                },
            }
        }
        true
    }

    /// Radius of the smallest circle around the centroid holding every vertex
    pub fn bounding_radius(&self) -> f64 {
        let c = self.centroid();
        self.vertices
            .iter()
            .map(|v| v.distance(&c))
            .fold(0.0, f64::max)
    }
}

/// Wall outlines in coordinates relative to the arena size (0.0..=1.0 on both axes)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WallLayout {
    pub walls: Vec<Vec<Point>>,
}

impl WallLayout {
    pub fn new(walls: Vec<Vec<Point>>) -> Self {
        WallLayout { walls }
    }

    // The layout the viewer opens with: a few crates and two long walls
    pub fn classic() -> Self {
        let quad = |x0: f64, y0: f64, x1: f64, y1: f64| {
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ]
        };
        WallLayout::new(vec![
            quad(0.25, 0.15, 0.30, 0.40),
            quad(0.25, 0.60, 0.30, 0.85),
            quad(0.45, 0.42, 0.55, 0.58),
            quad(0.70, 0.15, 0.75, 0.40),
            quad(0.70, 0.60, 0.75, 0.85),
            // Slanted wall
            vec![
                Point::new(0.40, 0.08),
                Point::new(0.60, 0.12),
                Point::new(0.59, 0.16),
                Point::new(0.39, 0.12),
            ],
        ])
    }

    /// Absolute walls for an arena of the given size
    pub fn scaled(&self, width: f64, height: f64) -> Result<Vec<Obstacle>, ObstacleError> {
        self.walls
            .iter()
            .map(|wall| {
                let vertices = wall
                    .iter()
                    .map(|v| Point::new(v.x * width, v.y * height))
                    .collect();
                Obstacle::new(vertices)
            })
            .collect()
    }
}

// Represents the arena: bounds plus the static walls
#[derive(Debug, Clone)]
pub struct Arena {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
    layout: Option<WallLayout>, // Kept so resize can regenerate walls
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Result<Self, ArenaError> {
        check_dimensions(width, height)?;
        Ok(Arena {
            width,
            height,
            obstacles: Vec::new(),
            layout: None,
        })
    }

    pub fn with_layout(width: f64, height: f64, layout: WallLayout) -> Result<Self, ArenaError> {
        check_dimensions(width, height)?;
        let obstacles = layout.scaled(width, height)?;
        log::info!(
            "Arena {}x{} generated {} walls from layout",
            width,
            height,
            obstacles.len()
        );
        Ok(Arena {
            width,
            height,
            obstacles,
            layout: Some(layout),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Every wall edge of every obstacle
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.obstacles.iter().flat_map(|o| o.edges())
    }

    // Adds a wall during setup
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        crate::debug_arena!(
            "Adding wall with {} vertices around ({:.1}, {:.1})",
            obstacle.vertices().len(),
            obstacle.centroid().x,
            obstacle.centroid().y
        );
        self.obstacles.push(obstacle);
    }

    /// Whether a circle of `radius` centered on `position` fits inside the arena
    pub fn contains_circle(&self, position: Point, radius: f64) -> bool {
        position.x + radius < self.width
            && position.x - radius >= 0.0
            && position.y + radius < self.height
            && position.y - radius >= 0.0
    }

    /// Whether a point lies inside the arena bounds
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }

    /// Whether `point` is inside any wall
    pub fn inside_wall(&self, point: Point) -> bool {
        self.obstacles.iter().any(|o| o.contains_point(point))
    }

    /// Changes the arena size. Layout walls are regenerated for the new size,
    /// other walls are stretched with the arena.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), ArenaError> {
        check_dimensions(width, height)?;

        self.obstacles = match &self.layout {
            Some(layout) => layout.scaled(width, height)?,
            None if self.width > 0.0 && self.height > 0.0 => {
                let (sx, sy) = (width / self.width, height / self.height);
                self.obstacles
                    .iter()
                    .map(|o| {
                        let vertices = o
                            .vertices()
                            .iter()
                            .map(|v| Point::new(v.x * sx, v.y * sy))
                            .collect();
                        Obstacle::new(vertices)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => std::mem::take(&mut self.obstacles),
        };

        log::info!(
            "Arena resized from {}x{} to {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Places up to `count` rotated square walls at random, reproducibly for a given seed.
    /// Walls stay inside the arena, apart from each other and at least
    /// `clearance` away from every point in `keep_clear`.
    /// Returns how many walls were placed.
    pub fn scatter_obstacles(
        &mut self,
        count: usize,
        seed: u64,
        keep_clear: &[Point],
        clearance: f64,
    ) -> usize {
        let mut rng = StdRng::seed_from_u64(seed);
        let (min_side, max_side) = SCATTER_WALL_SIZE;
        let mut placed = 0;

        log::info!("Scattering {} walls (seed {})...", count, seed);

        for _ in 0..count {
            let mut found = None;
            for _ in 0..SCATTER_MAX_ATTEMPTS {
                let side = rng.gen_range(min_side..max_side);
                let angle = rng.gen_range(0.0..FRAC_PI_2);
                // Circumradius of the square, so the wall is fully inside whatever the angle
                let reach = side * std::f64::consts::SQRT_2 / 2.0;
                if self.width <= 2.0 * reach || self.height <= 2.0 * reach {
                    break;
                }
                let center = Point::new(
                    rng.gen_range(reach..self.width - reach),
                    rng.gen_range(reach..self.height - reach),
                );

                let near_spawn = keep_clear
                    .iter()
                    .any(|p| p.distance(&center) < reach + clearance);
                let overlaps = self
                    .obstacles
                    .iter()
                    .any(|o| o.centroid().distance(&center) < reach + o.bounding_radius());
                if near_spawn || overlaps {
                    continue;
                }

                if let Ok(wall) = Obstacle::square(center, side, angle) {
                    found = Some(wall);
                    break;
                }
            }

            match found {
                Some(wall) => {
                    self.add_obstacle(wall);
                    placed += 1;
                }
                None => {
                    log::warn!("No free spot left for wall {} of {}", placed + 1, count);
                    break;
                }
            }
        }

        log::info!("Walls placed: {}.", placed);
        placed
    }
}

fn check_dimensions(width: f64, height: f64) -> Result<(), ArenaError> {
    // NaN fails the comparisons below as well
    if !(width >= 0.0 && height >= 0.0) {
        return Err(ArenaError::NegativeDimension { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_obstacle_validation() {
        assert_eq!(
            Obstacle::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            Err(ObstacleError::TooFewVertices(2))
        );

        // Arrow head: concave
        let concave = Obstacle::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 5.0),
        ]);
        assert_eq!(concave, Err(ObstacleError::NotConvex));

        // All points on a line
        let flat = Obstacle::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]);
        assert_eq!(flat, Err(ObstacleError::NotConvex));

        // Either winding is accepted
        assert!(Obstacle::rectangle(0.0, 0.0, 5.0, 5.0).is_ok());
        assert!(
            Obstacle::new(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 5.0),
                Point::new(5.0, 5.0),
                Point::new(5.0, 0.0),
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_edges_include_closing_edge() {
        let wall = Obstacle::rectangle(350.0, 250.0, 100.0, 100.0).unwrap();
        let edges: Vec<_> = wall.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(350.0, 350.0), Point::new(350.0, 250.0)));
        assert_eq!(wall.centroid(), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_contains_point() {
        let wall = Obstacle::rectangle(100.0, 100.0, 50.0, 20.0).unwrap();
        assert!(wall.contains_point(Point::new(120.0, 110.0)));
        // Boundary and corners count as inside
        assert!(wall.contains_point(Point::new(100.0, 105.0)));
        assert!(wall.contains_point(Point::new(150.0, 120.0)));
        assert!(!wall.contains_point(Point::new(99.9, 110.0)));
        // On the line of an edge but past its end
        assert!(!wall.contains_point(Point::new(160.0, 100.0)));

        // Clockwise triangle behaves the same
        let triangle = Obstacle::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(triangle.contains_point(Point::new(2.0, 2.0)));
        assert!(!triangle.contains_point(Point::new(6.0, 6.0)));

        let mut arena = Arena::new(800.0, 600.0).unwrap();
        arena.add_obstacle(wall);
        arena.add_obstacle(triangle);
        assert!(arena.inside_wall(Point::new(1.0, 1.0)));
        assert!(arena.inside_wall(Point::new(125.0, 115.0)));
        assert!(!arena.inside_wall(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_square_is_rotated_around_center() {
        let wall = Obstacle::square(Point::new(100.0, 100.0), 20.0, 0.3).unwrap();
        let c = wall.centroid();
        assert_approx_eq!(c.x, 100.0);
        assert_approx_eq!(c.y, 100.0);
        assert_approx_eq!(wall.bounding_radius(), 200.0_f64.sqrt());
    }

    #[test]
    fn test_negative_dimensions_are_rejected() {
        assert!(matches!(
            Arena::new(-1.0, 600.0),
            Err(ArenaError::NegativeDimension { .. })
        ));
        assert!(Arena::new(800.0, f64::NAN).is_err());
        let mut arena = Arena::new(0.0, 0.0).unwrap();
        assert!(arena.resize(800.0, -5.0).is_err());
        assert_eq!(arena.width(), 0.0);
    }

    #[test]
    fn test_contains_circle() {
        let arena = Arena::new(800.0, 600.0).unwrap();
        assert!(arena.contains_circle(Point::new(10.0, 10.0), 10.0));
        assert!(!arena.contains_circle(Point::new(9.9, 300.0), 10.0));
        // Upper bounds are exclusive
        assert!(!arena.contains_circle(Point::new(790.0, 300.0), 10.0));
        assert!(arena.contains_circle(Point::new(789.9, 589.9), 10.0));
        assert!(arena.contains_point(Point::new(0.0, 0.0)));
        assert!(!arena.contains_point(Point::new(800.0, 10.0)));
    }

    #[test]
    fn test_layout_scales_and_resizes() {
        let layout = WallLayout::new(vec![vec![
            Point::new(0.5, 0.5),
            Point::new(0.6, 0.5),
            Point::new(0.6, 0.6),
        ]]);
        let mut arena = Arena::with_layout(800.0, 600.0, layout).unwrap();
        assert_eq!(arena.obstacles().len(), 1);
        assert_eq!(arena.obstacles()[0].vertices()[0], Point::new(400.0, 300.0));

        arena.resize(400.0, 300.0).unwrap();
        assert_eq!(arena.size(), Point::new(400.0, 300.0));
        assert_eq!(arena.obstacles()[0].vertices()[0], Point::new(200.0, 150.0));
        assert_approx_eq!(arena.obstacles()[0].vertices()[2].y, 180.0);
    }

    #[test]
    fn test_resize_stretches_free_walls() {
        let mut arena = Arena::new(100.0, 100.0).unwrap();
        arena.add_obstacle(Obstacle::rectangle(10.0, 10.0, 10.0, 10.0).unwrap());
        arena.resize(200.0, 50.0).unwrap();
        let v = arena.obstacles()[0].vertices();
        assert_eq!(v[0], Point::new(20.0, 5.0));
        assert_eq!(v[2], Point::new(40.0, 10.0));
    }

    #[test]
    fn test_classic_layout_is_valid() {
        let arena = Arena::with_layout(1024.0, 768.0, WallLayout::classic()).unwrap();
        assert_eq!(arena.obstacles().len(), 6);
        assert_eq!(arena.edges().count(), 24);
    }

    #[test]
    fn test_scatter_is_reproducible_and_keeps_spawns_clear() {
        let spawns = [Point::new(80.0, 300.0), Point::new(720.0, 300.0)];

        let mut a = Arena::new(800.0, 600.0).unwrap();
        let mut b = Arena::new(800.0, 600.0).unwrap();
        let placed_a = a.scatter_obstacles(8, 42, &spawns, 60.0);
        let placed_b = b.scatter_obstacles(8, 42, &spawns, 60.0);

        assert_eq!(placed_a, placed_b);
        assert!(placed_a > 0);
        assert_eq!(a.obstacles(), b.obstacles());

        for wall in a.obstacles() {
            for spawn in &spawns {
                assert!(wall.centroid().distance(spawn) >= wall.bounding_radius() + 60.0 - 1e-9);
            }
            for v in wall.vertices() {
                assert!(a.contains_point(*v));
            }
        }
    }

    #[test]
    fn test_scatter_in_tiny_arena_places_nothing() {
        let mut arena = Arena::new(20.0, 20.0).unwrap();
        assert_eq!(arena.scatter_obstacles(3, 7, &[], 0.0), 0);
        assert!(arena.obstacles().is_empty());
    }
}
