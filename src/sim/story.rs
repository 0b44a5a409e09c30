//! The fixed story script behind billboard spawning.
//!
//! Panels are placed in script order as the camera reaches each scheduled
//! position. The script never reorders or repeats within a run.

use serde::{Deserialize, Serialize};

use crate::ImageId;
use crate::consts::{BILLBOARD_H, BILLBOARD_W};

/// Content shown on one story panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelPayload {
    Text(String),
    Image(ImageId),
}

/// One scheduled story panel: payload plus declared world size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPanel {
    pub payload: PanelPayload,
    pub w: f32,
    pub h: f32,
}

impl StoryPanel {
    /// Text panel at the default size
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: PanelPayload::Text(text.into()),
            w: BILLBOARD_W,
            h: BILLBOARD_H,
        }
    }

    /// Image panel at the default size
    pub fn image(image: impl Into<ImageId>) -> Self {
        Self {
            payload: PanelPayload::Image(image.into()),
            w: BILLBOARD_W,
            h: BILLBOARD_H,
        }
    }
}

/// An ordered run of story panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryScript {
    panels: Vec<StoryPanel>,
}

impl StoryScript {
    pub fn new(panels: Vec<StoryPanel>) -> Self {
        Self { panels }
    }

    /// A script with nothing to tell (useful in tests)
    pub fn empty() -> Self {
        Self { panels: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StoryPanel> {
        self.panels.get(index)
    }

    pub fn panels(&self) -> &[StoryPanel] {
        &self.panels
    }
}

impl Default for StoryScript {
    /// The built-in chapters, in telling order
    fn default() -> Self {
        Self::new(vec![
            StoryPanel::text("CHAPTER 1: LEAVING HOME"),
            StoryPanel::image("panels/hometown"),
            StoryPanel::text("FIRST WINTER ON THE ROAD"),
            StoryPanel::image("panels/mountain_pass"),
            StoryPanel::text("THE CITY OF LANTERNS"),
            StoryPanel::image("panels/lanterns"),
            StoryPanel::text("STORM SEASON"),
            StoryPanel::text("THE LONG ROAD NORTH"),
            StoryPanel::image("panels/aurora"),
            StoryPanel::text("JOURNEY'S END?"),
        ])
    }
}
