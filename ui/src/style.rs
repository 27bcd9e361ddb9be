//! Colors, spacing and widget styles shared by all views.

use iced::theme;
use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme, Vector};

pub struct Palette;

impl Palette {
    pub const PRIMARY: Color = Color { r: 0.05, g: 0.45, b: 0.55, a: 1.0 }; // Cyan 700
    pub const ON_PRIMARY: Color = Color::WHITE;
    pub const SURFACE: Color = Color { r: 0.98, g: 0.98, b: 0.98, a: 1.0 };
    pub const SURFACE_VARIANT: Color = Color { r: 0.92, g: 0.92, b: 0.93, a: 1.0 };
    pub const ON_SURFACE: Color = Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 };
    pub const MUTED: Color = Color { r: 0.45, g: 0.45, b: 0.48, a: 1.0 };
    pub const ERROR: Color = Color { r: 0.80, g: 0.0, b: 0.0, a: 1.0 };

    pub const SPACING: u16 = 16;
    pub const SIDEBAR_WIDTH: f32 = 260.0;
}

pub struct PrimaryButton;

impl button::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Palette::PRIMARY)),
            text_color: Palette::ON_PRIMARY,
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            shadow: Shadow {
                color: Color { a: 0.3, ..Color::BLACK },
                offset: Vector::new(0.0, 1.0),
                blur_radius: 3.0,
            },
            ..active
        }
    }
}

/// Flat button used for tree rows, tags and toolbar toggles.
pub struct FlatButton {
    pub selected: bool,
}

impl button::StyleSheet for FlatButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: self
                .selected
                .then_some(Background::Color(Palette::SURFACE_VARIANT)),
            text_color: if self.selected {
                Palette::PRIMARY
            } else {
                Palette::ON_SURFACE
            },
            border: Border {
                color: Palette::PRIMARY,
                width: if self.selected { 1.0 } else { 0.0 },
                radius: 4.0.into(),
            },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Palette::SURFACE_VARIANT)),
            ..self.active(style)
        }
    }
}

/// Image cell without chrome; outlined when it is the current photo.
pub struct ThumbnailButton {
    pub selected: bool,
}

impl button::StyleSheet for ThumbnailButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: None,
            border: Border {
                color: Palette::PRIMARY,
                width: if self.selected { 2.0 } else { 0.0 },
                radius: 2.0.into(),
            },
            ..Default::default()
        }
    }
}

pub fn primary_button() -> theme::Button {
    theme::Button::Custom(Box::new(PrimaryButton))
}

pub fn flat_button(selected: bool) -> theme::Button {
    theme::Button::Custom(Box::new(FlatButton { selected }))
}

pub fn thumbnail_button(selected: bool) -> theme::Button {
    theme::Button::Custom(Box::new(ThumbnailButton { selected }))
}

pub fn card() -> theme::Container {
    theme::Container::Custom(Box::new(|_theme: &Theme| container::Appearance {
        background: Some(Palette::SURFACE.into()),
        text_color: Some(Palette::ON_SURFACE),
        border: Border {
            color: Palette::SURFACE_VARIANT,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow {
            color: Color { a: 0.2, ..Color::BLACK },
            offset: Vector::new(0.0, 2.0),
            blur_radius: 6.0,
        },
    }))
}

pub fn sidebar() -> theme::Container {
    theme::Container::Custom(Box::new(|_theme: &Theme| container::Appearance {
        background: Some(Palette::SURFACE_VARIANT.into()),
        text_color: Some(Palette::ON_SURFACE),
        border: Border::default(),
        shadow: Default::default(),
    }))
}

/// Placeholder shown while a preview has not loaded.
pub fn skeleton() -> theme::Container {
    theme::Container::Custom(Box::new(|_theme: &Theme| container::Appearance {
        background: Some(Palette::SURFACE_VARIANT.into()),
        text_color: Some(Palette::MUTED),
        border: Border {
            radius: 2.0.into(),
            ..Default::default()
        },
        shadow: Default::default(),
    }))
}

pub fn error_banner() -> theme::Container {
    theme::Container::Custom(Box::new(|_theme: &Theme| container::Appearance {
        text_color: Some(Palette::ON_PRIMARY),
        background: Some(Palette::ERROR.into()),
        border: Border {
            color: Palette::ERROR,
            width: 1.0,
            radius: 2.0.into(),
        },
        shadow: Default::default(),
    }))
}

/// Full-bleed matte behind carousel slides.
pub fn matte(background: Color, text: Color) -> theme::Container {
    theme::Container::Custom(Box::new(move |_theme: &Theme| container::Appearance {
        background: Some(background.into()),
        text_color: Some(text),
        border: Border::default(),
        shadow: Default::default(),
    }))
}

pub fn badge() -> theme::Container {
    theme::Container::Custom(Box::new(|_theme: &Theme| container::Appearance {
        background: Some(Palette::PRIMARY.into()),
        text_color: Some(Palette::ON_PRIMARY),
        border: Border {
            radius: 8.0.into(),
            ..Default::default()
        },
        shadow: Default::default(),
    }))
}
