//! SSD1306 OLED display wrapper.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use teacounter::screen::{Renderer, ScreenState};
use teacounter::ui::layout;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Baseline of the first text row and the spacing between rows (px).
const FIRST_ROW: i32 = 8;
const ROW_HEIGHT: i32 = 10;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style() -> embedded_graphics::mono_font::MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// The device screen: draws whatever `ScreenState` the main loop hands it.
pub struct OledScreen<I2C> {
    display: Display<I2C>,
    user: &'static str,
}

impl<I2C> OledScreen<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C, user: &'static str) -> Self {
        Self {
            display: init(i2c),
            user,
        }
    }

    fn row(&mut self, row: usize, line: &str) {
        let y = FIRST_ROW + row as i32 * ROW_HEIGHT;
        let _ = Text::new(line, Point::new(0, y), text_style()).draw(&mut self.display);
    }

    fn draw_home(&mut self, teas: u32, coffees: u32) {
        let title = layout::home_title(self.user);
        self.row(0, &title);
        let [tea_line, coffee_line] = layout::count_lines(teas, coffees);
        self.row(1, &tea_line);
        self.row(2, &coffee_line);
        for (i, hint) in layout::HOME_HINTS.iter().enumerate() {
            self.row(3 + i, hint);
        }
    }

    /// Heading on the first row, wrapped text below it.
    fn draw_message(&mut self, heading: &str, body: &str) {
        self.row(0, heading);
        for (i, line) in layout::wrap_body(body).iter().enumerate() {
            self.row(2 + i, line);
        }
    }
}

impl<I2C> Renderer for OledScreen<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn render(&mut self, state: &ScreenState) {
        self.display.clear_buffer();

        let heading = layout::heading(state);
        match state {
            ScreenState::Welcome => {
                let name = layout::welcome_name(self.user);
                self.row(1, heading);
                self.row(3, &name);
            }
            ScreenState::Home { teas, coffees } => self.draw_home(*teas, *coffees),
            ScreenState::Sending { request } => {
                let label = layout::sending_label(*request);
                self.row(0, heading);
                self.row(2, &label);
            }
            ScreenState::Result { text, .. }
            | ScreenState::Info { text }
            | ScreenState::Celebration { text }
            | ScreenState::ErrorMsg { text } => self.draw_message(heading, text),
        }

        let _ = self.display.flush();
    }
}
