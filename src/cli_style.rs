use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let accent = Some(Color::Ansi(AnsiColor::Magenta));
    let good = Some(Color::Ansi(AnsiColor::Green));
    let bad = Some(Color::Ansi(AnsiColor::Red));
    clap::builder::Styles::styled()
        .usage(Style::new().bold().underline().fg_color(accent))
        .header(Style::new().bold().underline().fg_color(accent))
        .literal(Style::new().bold().fg_color(good))
        .invalid(Style::new().bold().fg_color(bad))
        .error(Style::new().bold().fg_color(bad))
        .valid(Style::new().bold().fg_color(good))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const MAGENTA: Color = Color::Rgb {
        r: 255,
        g: 0,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

mod glyphs {
    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";
    pub const HORIZONTAL: &str = "─";
    pub const BULLET: &str = "●";
    pub const ARROW_RIGHT: &str = "▶";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
}

const SECTION_WIDTH: usize = 60;

// ═══════════════════════════════════════════════════════════════════════════════
// Status lines
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        glyphs::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        glyphs::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;
    let trailing = SECTION_WIDTH.saturating_sub(title_len + 4 + padding);

    println!();
    println!(
        "{}{} {} {}{}",
        glyphs::ROUND_TOP_LEFT.with(colors::MAGENTA),
        glyphs::HORIZONTAL.repeat(padding).with(colors::MAGENTA),
        title.with(colors::MAGENTA).bold().attribute(Attribute::Italic),
        glyphs::HORIZONTAL.repeat(trailing).with(colors::MAGENTA),
        glyphs::ROUND_TOP_RIGHT.with(colors::MAGENTA)
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        glyphs::ROUND_BOTTOM_LEFT.with(colors::MAGENTA),
        glyphs::HORIZONTAL.repeat(SECTION_WIDTH).with(colors::MAGENTA),
        glyphs::ROUND_BOTTOM_RIGHT.with(colors::MAGENTA)
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        glyphs::BULLET.with(colors::MAGENTA),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

#[allow(dead_code)]
pub fn print_list_item(item: &str, indent: usize) {
    println!(
        "{}{}  {}",
        "  ".repeat(indent),
        glyphs::ARROW_RIGHT.with(colors::MAGENTA),
        item.with(colors::WHITE)
    );
}
