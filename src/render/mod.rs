//! Rendering contract
//!
//! The simulation never draws. After a tick commits, a host hands a
//! read-only state snapshot to [`draw_frame`], which issues an ordered
//! sequence of calls against an abstract [`Surface2D`]: background layers
//! back-to-front, ground strip, billboards, obstacles, player, HUD.
//! Everything is sized from declared theme metadata; pixel dimensions of
//! whatever the asset layer actually loaded never enter the picture.

pub mod record;

use serde::{Deserialize, Serialize};

use crate::ImageId;
use crate::consts::*;
use crate::sim::{GameState, Obstacle, ObstacleKind, PanelPayload};
use crate::theme::Theme;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

const fn opaque() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Source crop into an image, in declared source pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Abstract 2D draw target
///
/// Implementations own asset resolution for [`ImageId`]; the engine only
/// passes handles and geometry through, in draw order.
pub trait Surface2D {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn draw_image(&mut self, image: &ImageId, src: Option<CropRect>, x: f32, y: f32, w: f32, h: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

/// Draw one frame from a committed state snapshot
pub fn draw_frame(
    surface: &mut dyn Surface2D,
    state: &GameState,
    theme: &Theme,
    hi_score: u64,
    debug: bool,
) {
    surface.clear(theme.palette.sky);
    draw_background(surface, state.camera.x, theme);
    draw_ground(surface, state.camera.x, theme);
    for billboard in &state.billboards {
        draw_billboard(surface, billboard, state.camera.x, theme);
    }
    for obstacle in &state.obstacles {
        draw_obstacle(surface, obstacle, state.camera.x, state.time_ticks, theme);
    }
    draw_player(surface, state, theme, debug);
    draw_hud(surface, state, hi_score, theme);
}

fn draw_background(surface: &mut dyn Surface2D, cam_x: f32, theme: &Theme) {
    // back-to-front: slower layers sit farther away
    let mut layers: Vec<_> = theme.background_layers.iter().collect();
    layers.sort_by(|a, b| a.speed.total_cmp(&b.speed));

    for layer in &layers {
        let src_h = layer.src_h;
        let draw_h = layer.height.or(src_h).unwrap_or(VIEW_HEIGHT);
        let y = layer.top_y.unwrap_or(GROUND_Y - draw_h - 40.0);
        let tile_w = layer.tile_w;
        let crop = src_h.map(|h| CropRect {
            x: 0.0,
            y: layer.src_y.unwrap_or(0.0),
            w: tile_w,
            h,
        });

        let par_x = -cam_x * layer.speed;
        let mut x = (par_x % tile_w) - tile_w;
        while x < VIEW_WIDTH + tile_w {
            surface.draw_image(&layer.image, crop, x, y, tile_w, draw_h);
            x += tile_w;
        }
    }

    if layers.is_empty() {
        // silhouette strip so an assetless theme still reads as terrain
        let base_y = GROUND_Y - 80.0;
        for i in -1..8 {
            let mx = (-cam_x * 0.2 + i as f32 * 240.0) % (VIEW_WIDTH + 240.0);
            surface.fill_rect(mx, base_y - 40.0, 160.0, 40.0, theme.palette.mountain);
        }
    }
}

fn draw_ground(surface: &mut dyn Surface2D, cam_x: f32, theme: &Theme) {
    if let Some(ground) = &theme.ground {
        let tile_w = ground.tile_w;
        let crop = ground.src_h.map(|h| CropRect {
            x: 0.0,
            y: ground.src_y.unwrap_or(0.0),
            w: tile_w,
            h,
        });
        let y = ground.top_y.unwrap_or(GROUND_Y);
        let h = ground.height.unwrap_or(VIEW_HEIGHT - GROUND_Y);

        let mut x = -((cam_x % tile_w) + tile_w);
        while x < VIEW_WIDTH + tile_w {
            surface.draw_image(&ground.image, crop, x, y, tile_w, h);
            x += tile_w;
        }
    } else {
        surface.fill_rect(
            0.0,
            GROUND_Y,
            VIEW_WIDTH,
            VIEW_HEIGHT - GROUND_Y,
            theme.palette.ground_top,
        );
        // dashed lane stripe scrolling slightly faster than the world
        let offset = (cam_x * 1.2) % 20.0;
        let mut x = -offset;
        while x < VIEW_WIDTH {
            surface.fill_rect(x, GROUND_Y + 18.0, 10.0, 2.0, theme.palette.ground_stripe);
            x += 20.0;
        }
    }
}

fn draw_billboard(
    surface: &mut dyn Surface2D,
    billboard: &crate::sim::Billboard,
    cam_x: f32,
    theme: &Theme,
) {
    let sx = (billboard.pos.x - cam_x).round();
    let (w, h) = (billboard.size.x, billboard.size.y);
    if sx + w < -50.0 || sx > VIEW_WIDTH + 50.0 {
        return;
    }
    let y = billboard.pos.y;

    if let Some(frame) = &theme.billboard_frame {
        surface.draw_image(&frame.image, None, sx, y, w, h);
    } else {
        surface.fill_rect(sx, y, w, h, theme.palette.panel);
        surface.stroke_rect(sx, y, w, h, theme.palette.hud);
    }

    match &billboard.payload {
        PanelPayload::Text(text) => {
            surface.draw_text(text, sx + 16.0, y + h * 0.55, 14.0, theme.palette.panel_text);
        }
        PanelPayload::Image(image) => {
            surface.draw_image(image, None, sx + 8.0, y + 8.0, w - 16.0, h - 16.0);
        }
    }
}

fn draw_obstacle(
    surface: &mut dyn Surface2D,
    obstacle: &Obstacle,
    cam_x: f32,
    ticks: u64,
    theme: &Theme,
) {
    let sx = (obstacle.pos.x - cam_x).round();
    let (ow, oh) = (obstacle.size.x, obstacle.size.y);
    if sx + ow < -50.0 || sx > VIEW_WIDTH + 50.0 {
        return;
    }
    let y = obstacle.pos.y;

    match obstacle.kind {
        ObstacleKind::Ground => {
            if let Some(sprite) = &theme.ground_obstacle {
                let w = sprite.w.unwrap_or(ow);
                let h = sprite.h.unwrap_or(oh);
                surface.draw_image(&sprite.image, None, sx, y + (oh - h), w, h);
            } else {
                surface.fill_rect(sx, y, ow, oh, theme.palette.obstacle);
                // stubby arms
                surface.fill_rect(
                    sx - 8.0,
                    y + 10.0,
                    6.0,
                    (oh - 28.0).max(12.0),
                    theme.palette.obstacle,
                );
                surface.fill_rect(
                    sx + ow + 2.0,
                    y + 18.0,
                    6.0,
                    (oh - 36.0).max(10.0),
                    theme.palette.obstacle,
                );
            }
        }
        ObstacleKind::Flying => {
            if let Some(sprite) = &theme.flyer {
                let w = sprite.w.unwrap_or(ow);
                let h = sprite.h.unwrap_or(oh);
                surface.draw_image(&sprite.image, None, sx, y, w, h);
            } else {
                surface.fill_rect(sx, y, ow, oh, theme.palette.flyer);
                let flap = if (ticks / 10).wrapping_add(obstacle.id as u64) % 2 == 0 {
                    8.0
                } else {
                    -8.0
                };
                surface.fill_rect(sx - 10.0, y + 8.0 + flap, 18.0, 4.0, theme.palette.flyer);
                surface.fill_rect(sx + ow - 8.0, y + 8.0 - flap, 18.0, 4.0, theme.palette.flyer);
            }
        }
    }
}

fn draw_player(surface: &mut dyn Surface2D, state: &GameState, theme: &Theme, debug: bool) {
    let p = &state.player;
    let ph = p.height();
    let sx = (p.pos.x - state.camera.x).round();
    let sy = p.pos.y.round();

    surface.fill_rect(
        sx + 4.0,
        GROUND_Y + 4.0,
        PLAYER_W - 8.0,
        4.0,
        theme.palette.shadow,
    );

    if let Some(sprite) = &theme.player {
        let frames = sprite.frames.max(1);
        let frame = (p.anim_clock * sprite.fps) as u32 % frames;
        let row = if p.ducking {
            sprite.row_map.duck
        } else if !p.grounded {
            sprite.row_map.jump
        } else if p.vel.x.abs() > 1.0 {
            sprite.row_map.run
        } else {
            sprite.row_map.idle
        };
        let crop = CropRect {
            x: frame as f32 * sprite.frame_w(),
            y: row as f32 * sprite.frame_h(),
            w: sprite.frame_w(),
            h: sprite.frame_h(),
        };
        let dw = sprite.w;
        let dh = if p.ducking {
            sprite.h * sprite.duck_scale
        } else {
            sprite.h
        };
        surface.draw_image(&sprite.image, Some(crop), sx, p.pos.y + ph - dh, dw, dh);
    } else {
        let body = theme.palette.body;
        surface.fill_rect(sx + 6.0, sy, PLAYER_W - 12.0, ph - 6.0, body);
        surface.fill_rect(sx + 12.0, sy - 16.0, 22.0, 16.0, body);
        surface.fill_rect(sx + 30.0, sy - 10.0, 2.0, 2.0, theme.palette.sky);
        let step = (p.anim_clock * 10.0).sin();
        let stride = if p.grounded { step * 2.0 } else { 0.0 };
        surface.fill_rect(sx + 10.0, sy + ph - 8.0 + stride, 10.0, 8.0, body);
        surface.fill_rect(sx + 24.0, sy + ph - 8.0 - stride, 10.0, 8.0, body);
    }

    if debug {
        surface.stroke_rect(sx, sy, PLAYER_W, ph, Color::rgb(255, 0, 0));
    }
}

fn draw_hud(surface: &mut dyn Surface2D, state: &GameState, hi_score: u64, theme: &Theme) {
    let score = state.score as u64;
    let text = format!("HI {:05}   {:05}", hi_score, score);
    surface.draw_text(&text, VIEW_WIDTH - 220.0, 30.0, 16.0, theme.palette.hud);

    if state.paused && !state.game_over {
        surface.draw_text("PAUSED (P)", 20.0, 30.0, 16.0, theme.palette.hud);
    }
    if state.game_over {
        surface.draw_text(
            "GAME OVER - PRESS ENTER",
            VIEW_WIDTH / 2.0 - 150.0,
            100.0,
            20.0,
            theme.palette.hud,
        );
    }
}
