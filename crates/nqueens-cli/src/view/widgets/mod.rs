use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{board_display::*, status_display::*};

mod board_display;
mod status_display;

mod color {
    use ratatui::style::Color;

    pub const LIGHT_SQUARE: Color = Color::Rgb(205, 190, 160);
    pub const DARK_SQUARE: Color = Color::Rgb(150, 115, 85);
    pub const ATTACKED: Color = Color::Rgb(200, 90, 80);
    pub const CURSOR: Color = Color::Rgb(255, 255, 0);
    pub const SELECTED: Color = Color::Rgb(0, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);
    pub const BORDER_PLAYING: Style = fg_bg(color::WHITE, color::BLACK);
    pub const BORDER_WAITING: Style = fg_bg(color::GRAY, color::BLACK);
    pub const BORDER_WON: Style = fg_bg(color::GREEN, color::BLACK);
    pub const BORDER_LOST: Style = fg_bg(color::RED, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
