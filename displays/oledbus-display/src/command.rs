//! SSD1306 command set
//!
//! Only the commands the controller issues are listed. Every command and
//! parameter byte is sent in its own transaction behind a command-mode
//! control byte.

/// SSD1306 commands
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_FOLLOW_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
}

/// Memory addressing mode parameter for page addressing
pub const PAGE_ADDRESSING: u8 = 0x10;

/// COM pins configuration: L/R remap disabled, alternative COM pin layout
#[allow(clippy::identity_op)]
pub const COM_PINS_CONFIG: u8 = (0 << 5) | (1 << 4) | 0x02;

/// Clock divide ratio 1, oscillator frequency at maximum
pub const CLOCK_DIV: u8 = 0xF0;

/// Pre-charge: 2 DCLK for both phases
pub const PRECHARGE: u8 = 0x22;

/// VCOMH deselect level (~0.77 x Vcc)
pub const VCOM_DESELECT: u8 = 0x20;

/// Internal charge pump enabled
pub const CHARGE_PUMP_ON: u8 = 0x14;

/// Number of bytes in the bring-up sequence
pub const INIT_SEQUENCE_LEN: usize = 28;

/// Bring-up sequence for a panel `height` rows tall
///
/// The order matters to the panel; only the multiplex ratio and contrast
/// vary.
pub const fn init_sequence(height: u8, contrast: u8) -> [u8; INIT_SEQUENCE_LEN] {
    [
        cmd::DISPLAY_OFF,
        cmd::SET_MEMORY_MODE,
        PAGE_ADDRESSING,
        cmd::SET_PAGE_ADDR,
        cmd::SET_LOW_COLUMN,
        cmd::SET_HIGH_COLUMN,
        cmd::SET_COM_SCAN_DEC,
        cmd::SET_START_LINE,
        cmd::SET_CONTRAST,
        contrast,
        cmd::SET_SEG_REMAP,
        cmd::SET_NORMAL,
        cmd::SET_MUX_RATIO,
        height.saturating_sub(1),
        cmd::DISPLAY_FOLLOW_RAM,
        cmd::SET_DISPLAY_OFFSET,
        0x00,
        cmd::SET_CLOCK_DIV,
        CLOCK_DIV,
        cmd::SET_PRECHARGE,
        PRECHARGE,
        cmd::SET_COM_PINS,
        COM_PINS_CONFIG,
        cmd::SET_VCOM_DETECT,
        VCOM_DESELECT,
        cmd::SET_CHARGE_PUMP,
        CHARGE_PUMP_ON,
        cmd::DISPLAY_ON,
    ]
}

/// Page start command for `page`
///
/// The panel has pages 0..=7; higher bits are dropped.
pub const fn page_start(page: u8) -> u8 {
    cmd::SET_PAGE_ADDR | (page & 0x07)
}
