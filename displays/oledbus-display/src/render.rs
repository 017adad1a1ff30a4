//! Text and sprite rendering into the framebuffer
//!
//! Nothing here touches the bus. A draw that does not fit is refused as a
//! whole, leaving the framebuffer and the draw position as they were.

use embedded_graphics_core::pixelcolor::BinaryColor;

use crate::assets::{Font, Sprite};
use crate::controller::{DisplayController, LastSprite};
use crate::error::{RenderError, TextError};
use crate::framebuffer::FrameBuffer;

impl<'a, B, const W: usize, const PAGES: usize> DisplayController<'a, B, W, PAGES> {
    /// Draw one character at the cursor and advance by the glyph width
    ///
    /// With `wrap` set, a glyph that would cross the right edge moves to the
    /// next line of the current run instead of failing. The height check is
    /// made at the position the glyph would actually be drawn.
    pub fn write_char(
        &mut self,
        ch: char,
        font: &Font<'_>,
        color: BinaryColor,
        wrap: bool,
    ) -> Result<char, RenderError> {
        let rows = font.glyph(ch).ok_or(RenderError::MissingGlyph)?;
        let width = u32::from(font.width);
        let height = u32::from(font.height);
        let panel_width = u32::from(FrameBuffer::<W, PAGES>::WIDTH);

        let mut next = self.cursor;
        let mut y = u32::from(next.y);
        if u32::from(next.x) + width > panel_width {
            if !wrap {
                return Err(RenderError::InsufficientSpace);
            }
            (next, y) = next.wrapped(u16::from(font.height), self.config.line_advance);
            if u32::from(next.x) + width > panel_width {
                return Err(RenderError::InsufficientSpace);
            }
        }
        if y + height > u32::from(FrameBuffer::<W, PAGES>::HEIGHT) {
            return Err(RenderError::InsufficientSpace);
        }

        self.frame.blit(next.x, next.y, u16::from(font.width), rows, color);
        next.x += u16::from(font.width);
        self.cursor = next;
        Ok(ch)
    }

    /// Draw a string as a new run starting at the cursor
    ///
    /// Stops at the first character that cannot be drawn; characters before
    /// it stay drawn.
    pub fn write_str(
        &mut self,
        s: &str,
        font: &Font<'_>,
        color: BinaryColor,
        wrap: bool,
    ) -> Result<(), TextError> {
        self.cursor.begin_run();
        for ch in s.chars() {
            self.write_char(ch, font, color, wrap)
                .map_err(|error| TextError { ch, error })?;
        }
        Ok(())
    }

    /// Draw every section of `sprite` side by side at the cursor
    ///
    /// The run origin and the sprite are recorded before the bounds check,
    /// so a refused draw still moves `x_init`/`y_init` to the cursor and an
    /// animation step that runs off the panel keeps its new origin. Only the
    /// first section is bounds-checked; later sections clip at the panel
    /// edge.
    pub fn write_img(&mut self, sprite: Sprite<'a>, color: BinaryColor) -> Result<(), RenderError> {
        self.cursor.mark_origin();
        self.last_sprite = Some(LastSprite { sprite, color });

        let fits_x = u32::from(self.cursor.x) + u32::from(sprite.width)
            <= u32::from(FrameBuffer::<W, PAGES>::WIDTH);
        let fits_y = u32::from(self.cursor.y) + u32::from(sprite.height)
            <= u32::from(FrameBuffer::<W, PAGES>::HEIGHT);
        if !fits_x || !fits_y {
            return Err(RenderError::InsufficientSpace);
        }
        if !sprite.is_complete() {
            return Err(RenderError::MalformedSprite);
        }

        let width = u16::from(sprite.width);
        for index in 0..sprite.sections {
            let Some(rows) = sprite.section(index) else {
                break;
            };
            self.frame.blit(self.cursor.x, self.cursor.y, width, rows, color);
            self.cursor.x = self.cursor.x.saturating_add(width);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayConfig, LineAdvance};
    use crate::cursor::Cursor;
    use crate::mock::RecordingBus;
    use proptest::prelude::*;

    type Display<'a> = DisplayController<'a, RecordingBus>;

    // Solid 6x8 glyphs for ' ' through '~'
    const BLOCKS: [u16; 95 * 8] = [0xFC00; 95 * 8];
    const FONT: Font<'static> = Font::new(6, 8, &BLOCKS);

    // Two 4x2 sections: a left bar then a right bar
    static BARS: [u16; 4] = [0x8000, 0x8000, 0x1000, 0x1000];

    fn display<'a>() -> Display<'a> {
        DisplayController::new(RecordingBus::new(), DisplayConfig::default()).unwrap()
    }

    fn with_advance<'a>(line_advance: LineAdvance) -> Display<'a> {
        let config = DisplayConfig {
            line_advance,
            ..Default::default()
        };
        DisplayController::new(RecordingBus::new(), config).unwrap()
    }

    #[test]
    fn test_write_char_advances() {
        let mut display = display();
        display.set_cursor(10, 3);
        assert_eq!(display.write_char('A', &FONT, BinaryColor::On, false), Ok('A'));
        assert_eq!(display.cursor().x, 16);
        assert_eq!(display.cursor().y, 3);
        assert_eq!(display.frame().pixel(10, 3), Some(BinaryColor::On));
        assert_eq!(display.frame().pixel(15, 10), Some(BinaryColor::On));
        assert_eq!(display.frame().pixel(16, 3), Some(BinaryColor::Off));
        // Drawing never goes to the bus
        assert_eq!(display.bus().transactions, 0);
    }

    #[test]
    fn test_background_color_inverts_glyph() {
        let rows = [0x8000u16; 8];
        let font = Font::new(2, 8, &rows);
        let mut display = display();
        display.fill(BinaryColor::On);
        display.write_char(' ', &font, BinaryColor::Off, false).unwrap();
        assert_eq!(display.frame().pixel(0, 0), Some(BinaryColor::Off));
        assert_eq!(display.frame().pixel(1, 0), Some(BinaryColor::On));
    }

    #[test]
    fn test_overflow_without_wrap_is_refused() {
        let mut display = display();
        display.set_cursor(123, 0);
        let before = display.frame().clone();
        let cursor = *display.cursor();

        assert_eq!(
            display.write_char('A', &FONT, BinaryColor::On, false),
            Err(RenderError::InsufficientSpace)
        );
        assert!(*display.frame() == before);
        assert_eq!(*display.cursor(), cursor);

        // Exactly at the edge still fits
        display.set_cursor(122, 0);
        assert_eq!(display.write_char('A', &FONT, BinaryColor::On, false), Ok('A'));
        assert_eq!(display.cursor().x, 128);
    }

    #[test]
    fn test_overflow_bottom_is_refused() {
        let mut display = display();
        display.set_cursor(0, 57);
        assert_eq!(
            display.write_char('A', &FONT, BinaryColor::On, true),
            Err(RenderError::InsufficientSpace)
        );
        assert!(display.frame().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_missing_glyph() {
        let mut display = display();
        assert_eq!(
            display.write_char('\n', &FONT, BinaryColor::On, true),
            Err(RenderError::MissingGlyph)
        );
        assert_eq!(display.cursor().x, 0);
    }

    #[test]
    fn test_wrap_moves_to_next_line() {
        let mut display = display();
        // 21 glyphs fill 126 columns; the 22nd wraps
        let line = "ABCDEFGHIJKLMNOPQRSTUV";
        display.write_str(line, &FONT, BinaryColor::On, true).unwrap();

        let cursor = display.cursor();
        assert_eq!((cursor.x, cursor.y), (6, 8));
        assert_eq!(cursor.wrap_counter, 2);
        assert_eq!(display.frame().pixel(0, 8), Some(BinaryColor::On));
    }

    #[test]
    fn test_wrap_past_bottom_reports_char() {
        let mut display = display();
        display.set_cursor(0, 56);
        let line = "ABCDEFGHIJKLMNOPQRSTUV";

        assert_eq!(
            display.write_str(line, &FONT, BinaryColor::On, true),
            Err(TextError {
                ch: 'V',
                error: RenderError::InsufficientSpace,
            })
        );
        assert_eq!(display.cursor().x, 126);
        assert_eq!(display.cursor().y, 56);
        assert_eq!(display.cursor().wrap_counter, 1);
    }

    #[test]
    fn test_write_str_without_wrap_stops() {
        let mut display = display();
        display.set_cursor(110, 0);
        assert_eq!(
            display.write_str("abcd", &FONT, BinaryColor::On, false),
            Err(TextError {
                ch: 'd',
                error: RenderError::InsufficientSpace,
            })
        );
        assert_eq!(display.cursor().x, 128);
    }

    // Multiplicative advance drifts from the run's line grid when the run
    // does not start at y = 0
    #[test]
    fn test_multiplicative_line_advance() {
        let mut display = with_advance(LineAdvance::Multiplicative);
        display.set_cursor(0, 4);
        let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQ";
        display.write_str(text, &FONT, BinaryColor::On, true).unwrap();
        assert_eq!(display.cursor().wrap_counter, 3);
        assert_eq!(display.cursor().y, 24);
    }

    #[test]
    fn test_additive_line_advance() {
        let mut display = with_advance(LineAdvance::Additive);
        display.set_cursor(0, 4);
        let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQ";
        display.write_str(text, &FONT, BinaryColor::On, true).unwrap();
        assert_eq!(display.cursor().wrap_counter, 3);
        assert_eq!(display.cursor().y, 20);
    }

    #[test]
    fn test_write_str_starts_new_run() {
        let mut display = display();
        display.set_cursor(0, 0);
        display.write_str("AB", &FONT, BinaryColor::On, true).unwrap();
        display.set_cursor(60, 16);
        display.write_str("C", &FONT, BinaryColor::On, true).unwrap();
        assert_eq!(display.cursor().x_init, 60);
        assert_eq!(display.cursor().y_init, 16);
    }

    #[test]
    fn test_write_img_tiles_sections() {
        let mut display = display();
        display.set_cursor(20, 30);
        let sprite = Sprite::new(4, 2, 2, &BARS);
        display.write_img(sprite, BinaryColor::On).unwrap();

        assert_eq!(display.cursor().x, 28);
        assert_eq!(display.cursor().x_init, 20);
        assert_eq!(display.frame().pixel(20, 30), Some(BinaryColor::On));
        assert_eq!(display.frame().pixel(21, 31), Some(BinaryColor::Off));
        assert_eq!(display.frame().pixel(27, 31), Some(BinaryColor::On));
        assert_eq!(
            display.last_sprite(),
            Some(&LastSprite {
                sprite,
                color: BinaryColor::On,
            })
        );
    }

    #[test]
    fn test_write_img_refused_off_panel() {
        let mut display = display();
        display.set_cursor(125, 0);
        let sprite = Sprite::new(4, 2, 2, &BARS);

        assert_eq!(
            display.write_img(sprite, BinaryColor::On),
            Err(RenderError::InsufficientSpace)
        );
        assert_eq!(display.cursor().x, 125);
        assert!(display.frame().as_bytes().iter().all(|&b| b == 0));
        // Still remembered for animation
        assert!(display.last_sprite().is_some());
    }

    #[test]
    fn test_refused_sprite_records_origin_only() {
        let mut display = display();
        display
            .write_str("ABCDEFGHIJKLMNOPQRST", &FONT, BinaryColor::On, false)
            .unwrap();
        let before = *display.cursor();
        assert_eq!((before.x, before.x_init), (120, 0));

        assert_eq!(
            display.write_img(Sprite::new(16, 2, 1, &BARS), BinaryColor::On),
            Err(RenderError::InsufficientSpace)
        );
        assert_eq!(
            *display.cursor(),
            Cursor {
                x_init: 120,
                y_init: 0,
                ..before
            }
        );
    }

    #[test]
    fn test_write_img_rejects_short_table() {
        let mut display = display();
        let sprite = Sprite::new(4, 2, 3, &BARS);
        assert_eq!(
            display.write_img(sprite, BinaryColor::On),
            Err(RenderError::MalformedSprite)
        );
        assert_eq!(display.cursor().x, 0);
        assert!(display.frame().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trailing_sections_clip() {
        let mut display = display();
        display.set_cursor(124, 0);
        display
            .write_img(Sprite::new(4, 2, 2, &BARS), BinaryColor::On)
            .unwrap();
        assert_eq!(display.cursor().x, 132);
        assert_eq!(display.frame().pixel(124, 0), Some(BinaryColor::On));
    }

    proptest! {
        #[test]
        fn write_char_advances_or_leaves_state(
            x_init in 0u16..140,
            x in 0u16..140,
            y in 0u16..80,
            wrap in any::<bool>(),
        ) {
            let mut display = display();
            display.set_cursor(x_init, y);
            display.cursor.x = x;
            let frame = display.frame().clone();
            let before = *display.cursor();

            match display.write_char('#', &FONT, BinaryColor::On, wrap) {
                Ok(_) => {
                    let after = *display.cursor();
                    if u32::from(before.x) + 6 <= 128 {
                        prop_assert_eq!(after.x, before.x + 6);
                        prop_assert_eq!(after.y, before.y);
                        prop_assert_eq!(after.wrap_counter, before.wrap_counter);
                    } else {
                        prop_assert!(wrap);
                        prop_assert_eq!(after.x, before.x_init + 6);
                        prop_assert_eq!(after.wrap_counter, before.wrap_counter + 1);
                    }
                    prop_assert!(u32::from(after.y) + 8 <= 64);
                }
                Err(_) => {
                    prop_assert!(*display.frame() == frame);
                    prop_assert_eq!(*display.cursor(), before);
                }
            }
        }
    }
}
