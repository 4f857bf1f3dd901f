//! Panel rendering
//!
//! Draws the three regions with `embedded-graphics` and commits them to the
//! panel. Text that runs past the panel edge is clipped by the draw target.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::Layout;
use crate::keyboard::keys;
use crate::log::TerminalLog;
use crate::refresh::{Refresh, Region};
use crate::traits::EpaperPanel;

/// Cursor drawn after the composed text
pub const CURSOR: &str = "_";

const INK: BinaryColor = BinaryColor::On;
const PAPER: BinaryColor = BinaryColor::Off;

/// Everything the renderer needs to know about the terminal
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Panel geometry
    pub layout: &'a Layout,
    /// Received and echoed lines
    pub log: &'a TerminalLog,
    /// Line under composition
    pub input: &'a str,
    /// Prefix shown before the composed line
    pub marker: &'a str,
}

/// Perform one refresh
///
/// A full refresh clears the panel, draws every region and commits once.
/// A partial refresh clears and redraws each flagged region and commits
/// just that region.
pub fn render<P: EpaperPanel>(panel: &mut P, view: &View<'_>, refresh: Refresh) -> Result<(), P::Error> {
    match refresh {
        Refresh::Full => {
            panel.clear(PAPER)?;
            draw_log(panel, view)?;
            draw_input_bar(panel, view)?;
            draw_keyboard(panel, view.layout)?;
            panel.commit_full()
        }
        Refresh::Partial { .. } => {
            for region in [Region::Log, Region::InputBar] {
                if !refresh.includes(region) {
                    continue;
                }

                let area = view.layout.region(region);
                panel.fill_solid(&area, PAPER)?;
                match region {
                    Region::Log => draw_log(panel, view)?,
                    _ => draw_input_bar(panel, view)?,
                }
                panel.commit_partial(area)?;
            }
            Ok(())
        }
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_10X20, INK)
}

fn char_width() -> u32 {
    FONT_10X20.character_size.width + FONT_10X20.character_spacing
}

fn draw_log<P: EpaperPanel>(panel: &mut P, view: &View<'_>) -> Result<(), P::Error> {
    let style = text_style();
    for (index, line) in view.log.lines().enumerate() {
        Text::with_baseline(line, view.layout.line_origin(index), style, Baseline::Top)
            .draw(panel)?;
    }
    Ok(())
}

fn draw_input_bar<P: EpaperPanel>(panel: &mut P, view: &View<'_>) -> Result<(), P::Error> {
    let layout = view.layout;
    let area = layout.region(Region::InputBar);
    let inset = u32::from(layout.margin / 2);

    let outline = Rectangle::new(
        area.top_left + Point::new(inset as i32, inset as i32),
        Size::new(
            area.size.width.saturating_sub(2 * inset),
            area.size.height.saturating_sub(2 * inset),
        ),
    );
    outline
        .into_styled(PrimitiveStyle::with_stroke(INK, 2))
        .draw(panel)?;

    // Keep the end of a long line in view, leaving room for the cursor
    let columns = area.size.width.saturating_sub(2 * u32::from(layout.margin)) / char_width();
    let room = (columns as usize)
        .saturating_sub(view.marker.chars().count())
        .saturating_sub(CURSOR.len());

    let style = text_style();
    let origin = Point::new(i32::from(layout.margin), area.center().y);
    let next = Text::with_baseline(view.marker, origin, style, Baseline::Middle).draw(panel)?;
    let next = Text::with_baseline(tail(view.input, room), next, style, Baseline::Middle)
        .draw(panel)?;
    Text::with_baseline(CURSOR, next, style, Baseline::Middle).draw(panel)?;

    Ok(())
}

fn draw_keyboard<P: EpaperPanel>(panel: &mut P, layout: &Layout) -> Result<(), P::Error> {
    let style = text_style();
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let mut buf = [0u8; 4];

    for key in keys(layout) {
        key.bounds
            .into_styled(PrimitiveStyle::with_stroke(INK, 1))
            .draw(panel)?;
        let label = key.action.label(&mut buf);
        Text::with_text_style(label, key.bounds.center(), style, centered).draw(panel)?;
    }
    Ok(())
}

/// Last `max_chars` characters of `text`
fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((start, _)) => &text[start..],
        None => "",
    }
}
