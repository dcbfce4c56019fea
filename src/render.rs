use crate::arena::Arena;
use crate::bullet::Bullet;
use crate::geometry::Point;
use crate::person::{Person, Role};
use crate::sight::FieldOfView;
use crate::world::World;
use macroquad::prelude::*;

const WALL_COLOR: Color = Color::new(0.35, 0.35, 0.4, 1.0);
const FAN_COLOR: Color = Color::new(1.0, 0.95, 0.6, 0.18);
const RAY_COLOR: Color = Color::new(1.0, 0.95, 0.6, 0.08);
const HUD_FONT_SIZE: u16 = 18;

// Arena coordinates are screen pixels
fn to_vec2(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

// Lightens every channel, alpha untouched
fn brighten_color(color: Color, amount: f32) -> Color {
    Color::new(
        (color.r + amount).min(1.0),
        (color.g + amount).min(1.0),
        (color.b + amount).min(1.0),
        color.a,
    )
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Player => Color::from_rgba(40, 80, 140, 255),
        Role::Chaser => Color::from_rgba(140, 40, 40, 255),
    }
}

// Draws the world state using macroquad
pub struct Renderer {
    show_rays: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { show_rays: false }
    }

    /// Toggles drawing of the individual rays on top of the lit area
    pub fn toggle_rays(&mut self) {
        self.show_rays = !self.show_rays;
        log::info!("Ray lines {}", if self.show_rays { "shown" } else { "hidden" });
    }

    pub fn draw_frame(&self, world: &World) {
        clear_background(BLACK);

        // Lit area first so walls and people are drawn over it
        for person in world.persons() {
            if let Some(sight) = &person.sight {
                self.draw_fan(sight);
            }
        }
        Self::draw_arena_boundaries(&world.arena);
        Self::draw_walls(&world.arena);
        for person in world.persons() {
            Self::draw_person(person);
        }
        Self::draw_bullets(&world.bullets);

        Self::draw_hud(world);
    }

    fn draw_arena_boundaries(arena: &Arena) {
        draw_rectangle_lines(
            1.0,
            1.0,
            arena.width() as f32 - 2.0,
            arena.height() as f32 - 2.0,
            2.0,
            GRAY,
        );
    }

    // Walls are convex, so a fan from the first vertex covers them
    fn draw_walls(arena: &Arena) {
        let outline = brighten_color(WALL_COLOR, 0.2);
        for wall in arena.obstacles() {
            let vertices = wall.vertices();
            let first = to_vec2(vertices[0]);
            for pair in vertices[1..].windows(2) {
                draw_triangle(first, to_vec2(pair[0]), to_vec2(pair[1]), WALL_COLOR);
            }
            for (a, b) in wall.edges() {
                draw_line(a.x as f32, a.y as f32, b.x as f32, b.y as f32, 1.0, outline);
            }
        }
    }

    fn draw_fan(&self, sight: &FieldOfView) {
        let origin = to_vec2(sight.origin());
        for pair in sight.rays().windows(2) {
            draw_triangle(origin, to_vec2(pair[0].end), to_vec2(pair[1].end), FAN_COLOR);
        }
        if self.show_rays {
            for ray in sight.rays() {
                let end = to_vec2(ray.end);
                draw_line(origin.x, origin.y, end.x, end.y, 1.0, RAY_COLOR);
            }
        }
    }

    fn draw_person(person: &Person) {
        let center = to_vec2(person.position());
        let radius = person.radius() as f32;
        let body_color = role_color(person.role);

        // Gun: a short barrel from the grip toward the target
        let grip = to_vec2(person.gun.position());
        let rotation = person.gun.rotation() as f32;
        let muzzle = grip + Vec2::new(rotation.cos(), rotation.sin()) * radius;
        draw_line(grip.x, grip.y, muzzle.x, muzzle.y, 3.0, LIGHTGRAY);
        draw_circle(grip.x, grip.y, 2.5, LIGHTGRAY);

        draw_circle(center.x, center.y, radius, body_color);
        draw_circle_lines(center.x, center.y, radius, 1.0, brighten_color(body_color, 0.5));

        // Facing indicator
        let facing = person.facing as f32;
        let tip = center + Vec2::new(facing.cos(), facing.sin()) * radius;
        draw_line(center.x, center.y, tip.x, tip.y, 2.0, WHITE);
    }

    fn draw_bullets(bullets: &[Bullet]) {
        for bullet in bullets {
            let pos = to_vec2(bullet.position);
            draw_circle(pos.x, pos.y, 2.0, WHITE);
        }
    }

    fn draw_hud(world: &World) {
        let params = TextParams {
            font_size: HUD_FONT_SIZE,
            color: WHITE,
            ..Default::default()
        };
        let mut lines = vec![
            format!("FPS: {}", get_fps()),
            format!("TICK: {}", world.tick_count()),
            format!("BULLETS: {}", world.bullets.len()),
        ];
        if let Some(sight) = &world.player.sight {
            lines.push(format!("SIGHT: {:?}", sight.policy()));
        }
        for (i, line) in lines.iter().enumerate() {
            draw_text_ex(line, 10.0, 20.0 + i as f32 * 20.0, params.clone());
        }

        let hint = "WASD/arrows move, mouse aims, click shoots, R rays, ESC quits";
        let hint_params = TextParams {
            color: LIGHTGRAY,
            font_size: 14,
            ..params
        };
        draw_text_ex(hint, 10.0, screen_height() - 10.0, hint_params);
    }

    pub fn window_should_close() -> bool {
        is_key_down(KeyCode::Escape) || is_quit_requested()
    }
}
