//! Data-driven visual metadata
//!
//! A theme describes how a run should look: palette for the flat-color
//! fallback renderer, plus optional image metadata for every drawable.
//! Image fields are declared geometry only; the engine sizes and crops by
//! what the theme says, never by decoded pixel dimensions. Optional fields
//! fall back to the documented defaults, and `validate` runs once when a
//! theme is loaded rather than being re-checked at draw time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ImageId;
use crate::consts::*;
use crate::render::Color;

/// Palette for the flat-color fallback renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub sky: Color,
    pub mountain: Color,
    pub ground_top: Color,
    pub ground_stripe: Color,
    pub body: Color,
    pub shadow: Color,
    pub obstacle: Color,
    pub flyer: Color,
    pub hud: Color,
    pub panel: Color,
    pub panel_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::rgb(11, 14, 26),
            mountain: Color::rgb(18, 22, 43),
            ground_top: Color::rgb(43, 47, 69),
            ground_stripe: Color::rgb(58, 63, 92),
            body: Color::rgb(229, 231, 235),
            shadow: Color::rgba(0, 0, 0, 51),
            obstacle: Color::rgb(167, 243, 208),
            flyer: Color::rgb(234, 179, 8),
            hud: Color::rgb(229, 231, 235),
            panel: Color::rgba(18, 22, 43, 230),
            panel_text: Color::rgb(229, 231, 235),
        }
    }
}

fn default_speed() -> f32 {
    0.5
}

fn default_tile_w() -> f32 {
    512.0
}

/// One parallax background layer. Slower layers sit farther back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgLayer {
    pub image: ImageId,
    /// Parallax factor in [0, 1]; 0.5 when omitted
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Declared tile width in world units; 512 when omitted
    #[serde(default = "default_tile_w")]
    pub tile_w: f32,
    /// Top edge on screen; sits above the ground line when omitted
    #[serde(default)]
    pub top_y: Option<f32>,
    /// Destination height; the crop height (or full view) when omitted
    #[serde(default)]
    pub height: Option<f32>,
    /// Source crop start; 0 when omitted
    #[serde(default)]
    pub src_y: Option<f32>,
    /// Source crop height; uncropped when omitted
    #[serde(default)]
    pub src_h: Option<f32>,
}

impl BgLayer {
    pub fn new(image: impl Into<ImageId>) -> Self {
        Self {
            image: image.into(),
            speed: default_speed(),
            tile_w: default_tile_w(),
            top_y: None,
            height: None,
            src_y: None,
            src_h: None,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// Tiled ground strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundImage {
    pub image: ImageId,
    /// Declared tile width in world units; 512 when omitted
    #[serde(default = "default_tile_w")]
    pub tile_w: f32,
    /// Top edge on screen; the ground line when omitted
    #[serde(default)]
    pub top_y: Option<f32>,
    /// Destination height; fills to the view bottom when omitted
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub src_y: Option<f32>,
    #[serde(default)]
    pub src_h: Option<f32>,
}

impl GroundImage {
    pub fn new(image: impl Into<ImageId>) -> Self {
        Self {
            image: image.into(),
            tile_w: default_tile_w(),
            top_y: None,
            height: None,
            src_y: None,
            src_h: None,
        }
    }
}

/// A simple sprite with an optional declared size
///
/// When `w`/`h` are omitted the entity's own collision box is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteImage {
    pub image: ImageId,
    #[serde(default)]
    pub w: Option<f32>,
    #[serde(default)]
    pub h: Option<f32>,
}

impl SpriteImage {
    pub fn new(image: impl Into<ImageId>) -> Self {
        Self {
            image: image.into(),
            w: None,
            h: None,
        }
    }
}

/// Which sprite-sheet row plays for each player pose; all default to row 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowMap {
    #[serde(default)]
    pub idle: u32,
    #[serde(default)]
    pub run: u32,
    #[serde(default)]
    pub duck: u32,
    #[serde(default)]
    pub jump: u32,
}

fn default_frames() -> u32 {
    1
}

fn default_fps() -> f32 {
    10.0
}

fn default_rows() -> u32 {
    1
}

fn default_player_w() -> f32 {
    PLAYER_W
}

fn default_player_h() -> f32 {
    PLAYER_H
}

fn default_duck_scale() -> f32 {
    DUCK_SCALE
}

/// Player sprite sheet: frames laid out in columns, poses in rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSprite {
    pub image: ImageId,
    /// Destination size; the player box when omitted
    #[serde(default = "default_player_w")]
    pub w: f32,
    #[serde(default = "default_player_h")]
    pub h: f32,
    /// Frames per row; 1 when omitted
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Animation rate; 10 when omitted
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Declared per-frame source size; destination size when omitted
    #[serde(default)]
    pub frame_w: Option<f32>,
    #[serde(default)]
    pub frame_h: Option<f32>,
    /// Rows in the sheet; 1 when omitted
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default)]
    pub row_map: RowMap,
    /// Destination height factor while ducking
    #[serde(default = "default_duck_scale")]
    pub duck_scale: f32,
}

impl PlayerSprite {
    pub fn new(image: impl Into<ImageId>) -> Self {
        Self {
            image: image.into(),
            w: PLAYER_W,
            h: PLAYER_H,
            frames: 1,
            fps: 10.0,
            frame_w: None,
            frame_h: None,
            rows: 1,
            row_map: RowMap::default(),
            duck_scale: DUCK_SCALE,
        }
    }

    pub fn frame_w(&self) -> f32 {
        self.frame_w.unwrap_or(self.w)
    }

    pub fn frame_h(&self) -> f32 {
        self.frame_h.unwrap_or(self.h)
    }
}

fn default_billboard_w() -> f32 {
    BILLBOARD_W
}

fn default_billboard_h() -> f32 {
    BILLBOARD_H
}

/// Frame drawn behind every story panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillboardFrame {
    pub image: ImageId,
    #[serde(default = "default_billboard_w")]
    pub w: f32,
    #[serde(default = "default_billboard_h")]
    pub h: f32,
}

impl BillboardFrame {
    pub fn new(image: impl Into<ImageId>) -> Self {
        Self {
            image: image.into(),
            w: BILLBOARD_W,
            h: BILLBOARD_H,
        }
    }
}

/// Complete visual description of a run
///
/// `Theme::default()` has no images at all and renders everything with
/// flat-color primitives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub background_layers: Vec<BgLayer>,
    #[serde(default)]
    pub ground: Option<GroundImage>,
    #[serde(default)]
    pub ground_obstacle: Option<SpriteImage>,
    #[serde(default)]
    pub flyer: Option<SpriteImage>,
    #[serde(default)]
    pub player: Option<PlayerSprite>,
    #[serde(default)]
    pub billboard_frame: Option<BillboardFrame>,
}

impl Theme {
    /// Parse and validate a theme from JSON
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: Theme = serde_json::from_str(json)?;
        theme.validate()?;
        log::debug!(
            "theme validated ({} background layers)",
            theme.background_layers.len()
        );
        Ok(theme)
    }

    /// Check every declared value once, up front
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (i, layer) in self.background_layers.iter().enumerate() {
            if !(0.0..=1.0).contains(&layer.speed) {
                return Err(ThemeError::invalid(format!(
                    "background layer {i}: speed {} outside [0, 1]",
                    layer.speed
                )));
            }
            if layer.tile_w <= 0.0 {
                return Err(ThemeError::invalid(format!(
                    "background layer {i}: non-positive tile width"
                )));
            }
            for (name, value) in [("height", layer.height), ("src_h", layer.src_h)] {
                if let Some(v) = value
                    && v <= 0.0
                {
                    return Err(ThemeError::invalid(format!(
                        "background layer {i}: non-positive {name}"
                    )));
                }
            }
        }

        if let Some(ground) = &self.ground {
            if ground.tile_w <= 0.0 {
                return Err(ThemeError::invalid("ground: non-positive tile width"));
            }
            for (name, value) in [("height", ground.height), ("src_h", ground.src_h)] {
                if let Some(v) = value
                    && v <= 0.0
                {
                    return Err(ThemeError::invalid(format!("ground: non-positive {name}")));
                }
            }
        }

        for (name, sprite) in [
            ("ground_obstacle", &self.ground_obstacle),
            ("flyer", &self.flyer),
        ] {
            if let Some(s) = sprite {
                for (dim, value) in [("w", s.w), ("h", s.h)] {
                    if let Some(v) = value
                        && v <= 0.0
                    {
                        return Err(ThemeError::invalid(format!(
                            "{name}: non-positive {dim}"
                        )));
                    }
                }
            }
        }

        if let Some(player) = &self.player {
            if player.frames == 0 {
                return Err(ThemeError::invalid("player sprite: zero frames"));
            }
            if player.rows == 0 {
                return Err(ThemeError::invalid("player sprite: zero rows"));
            }
            if player.fps <= 0.0 {
                return Err(ThemeError::invalid("player sprite: non-positive fps"));
            }
            if player.w <= 0.0 || player.h <= 0.0 || player.frame_w() <= 0.0 || player.frame_h() <= 0.0
            {
                return Err(ThemeError::invalid("player sprite: non-positive size"));
            }
            if !(0.0..=1.0).contains(&player.duck_scale) || player.duck_scale == 0.0 {
                return Err(ThemeError::invalid(
                    "player sprite: duck_scale outside (0, 1]",
                ));
            }
            let rows = player.rows;
            let map = player.row_map;
            for (pose, row) in [
                ("idle", map.idle),
                ("run", map.run),
                ("duck", map.duck),
                ("jump", map.jump),
            ] {
                if row >= rows {
                    return Err(ThemeError::invalid(format!(
                        "player sprite: row for {pose} is {row} but the sheet has {rows} rows"
                    )));
                }
            }
        }

        if let Some(frame) = &self.billboard_frame
            && (frame.w <= 0.0 || frame.h <= 0.0)
        {
            return Err(ThemeError::invalid("billboard frame: non-positive size"));
        }

        Ok(())
    }
}

/// Why a theme was rejected at load time
#[derive(Debug)]
pub enum ThemeError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl ThemeError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Parse(err) => write!(f, "theme parse error: {err}"),
            ThemeError::Invalid(message) => write!(f, "invalid theme: {message}"),
        }
    }
}

impl std::error::Error for ThemeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ThemeError::Parse(err) => Some(err),
            ThemeError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
