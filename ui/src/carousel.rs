//! Carousel viewer state: lazy window, fullscreen and background matting.

use iced::keyboard::{key, Key};
use iced::Color;

/// Number of slides on each side of the current one that hold real images.
pub const LAZY_RANGE: usize = 3;

/// Indices within [`LAZY_RANGE`] of `index`, wrapping around both ends,
/// from leftmost to rightmost. Empty for an empty list.
pub fn lazy_window(index: usize, len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let range = LAZY_RANGE as isize;
    let mut window = Vec::with_capacity(2 * LAZY_RANGE + 1);
    for offset in -range..=range {
        let i = (index as isize + offset).rem_euclid(len as isize) as usize;
        if !window.contains(&i) {
            window.push(i);
        }
    }
    window
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Black,
    Gray,
    White,
}

impl Background {
    pub const ALL: [Background; 3] = [Background::Black, Background::Gray, Background::White];

    pub fn label(self) -> &'static str {
        match self {
            Background::Black => "Black",
            Background::Gray => "Gray",
            Background::White => "White",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Background::Black => Background::Gray,
            Background::Gray => Background::White,
            Background::White => Background::Black,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Background::Black => Color::BLACK,
            Background::Gray => Color::from_rgb8(0x80, 0x80, 0x80),
            Background::White => Color::WHITE,
        }
    }

    pub fn text_color(self) -> Color {
        match self {
            Background::White => Color::BLACK,
            _ => Color::WHITE,
        }
    }
}

/// What a key press means while the carousel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Previous,
    EnterFullscreen,
    ExitFullscreen,
    Close,
    CycleBackground,
}

pub fn command_for_key(key: &Key, fullscreen: bool) -> Option<CarouselCommand> {
    match key {
        Key::Named(key::Named::ArrowRight) => Some(CarouselCommand::Next),
        Key::Named(key::Named::ArrowLeft) => Some(CarouselCommand::Previous),
        Key::Named(key::Named::Escape) => Some(if fullscreen {
            CarouselCommand::ExitFullscreen
        } else {
            CarouselCommand::Close
        }),
        Key::Character(c) if c.eq_ignore_ascii_case("f") => Some(if fullscreen {
            CarouselCommand::ExitFullscreen
        } else {
            CarouselCommand::EnterFullscreen
        }),
        Key::Character(c) if c.eq_ignore_ascii_case("c") => Some(CarouselCommand::CycleBackground),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarouselState {
    pub fullscreen: bool,
    pub background: Background,
    /// Right-click menu over the slide.
    pub menu_open: bool,
}

impl CarouselState {
    /// Adopt the mode the window actually reports. Returns whether it changed.
    pub fn reconcile_fullscreen(&mut self, actual: bool) -> bool {
        let changed = self.fullscreen != actual;
        self.fullscreen = actual;
        changed
    }
}

/// Horizontal offset that centers thumbnail `index` in a strip `viewport`
/// pixels wide.
pub fn thumbnail_offset(index: usize, thumb_width: f32, spacing: f32, viewport: f32) -> f32 {
    let pitch = thumb_width + spacing;
    (index as f32 * pitch + thumb_width / 2.0 - viewport / 2.0).max(0.0)
}
