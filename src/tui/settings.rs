//! Centralized UI settings for the terminal interface.
//!
//! Prompt strings, glyphs, colors, indentation, and spinner behavior live
//! here and nowhere else.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";
pub const BLOCK_FALLBACK_COLUMNS: usize = 100;
pub const BLOCK_RIGHT_MARGIN: usize = 2;
/// Reasoning blocks longer than this are clipped with a "more lines" row.
pub const REASONING_PREVIEW_LINES: usize = 12;

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_CONNECTED: &str = "you> ";
pub const PROMPT_DISCONNECTED: &str = "(offline) you> ";

// ---------------------------------------------------------------------------
// Sections / labels
// ---------------------------------------------------------------------------

pub const LABEL_APP: &str = "tunnelchat";
pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_THINKING: &str = "thinking";

pub const GLYPH_SECTION_BULLET: &str = "•";

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

// ---------------------------------------------------------------------------
// Spinner / progress
// ---------------------------------------------------------------------------

pub const PROGRESS_CLEAR_LINE: &str = "\r\x1b[2K";
pub const PROGRESS_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
pub const PROGRESS_TICK_MS: u64 = 100;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_PROMPT_CONNECTED: Color = Color::Green;
pub const COLOR_PROMPT_DISCONNECTED: Color = Color::DarkGrey;

pub const COLOR_APP_LABEL: Color = Color::Green;
pub const COLOR_MODEL_NAME: Color = Color::DarkGrey;

pub const COLOR_REASONING_LABEL: Color = Color::Magenta;
pub const COLOR_ACTIVITY_TEXT: Color = Color::DarkGrey;

pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::Cyan;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::White;

pub const COLOR_PROGRESS_FRAME: Color = Color::Cyan;
pub const COLOR_PROGRESS_LABEL: Color = Color::DarkGrey;
pub const COLOR_PROGRESS_ELAPSED: Color = Color::DarkGrey;

pub const COLOR_SNIPPET_REASONING_BG: Color = Color::Rgb {
    r: 30,
    g: 50,
    b: 39,
};
pub const COLOR_SNIPPET_REASONING_TEXT: Color = Color::Rgb {
    r: 184,
    g: 191,
    b: 186,
};
pub const COLOR_SNIPPET_ASSISTANT_BG: Color = Color::Rgb {
    r: 34,
    g: 56,
    b: 44,
};
pub const COLOR_SNIPPET_ASSISTANT_TEXT: Color = Color::White;
pub const COLOR_SNIPPET_TRUNCATED: Color = Color::Grey;

pub const RGB_SNIPPET_ASSISTANT_TEXT: (u8, u8, u8) = (242, 248, 244);
pub const RGB_SNIPPET_ASSISTANT_MD_HEADING: (u8, u8, u8) = (210, 236, 190);
pub const RGB_SNIPPET_ASSISTANT_MD_MARKER: (u8, u8, u8) = (166, 206, 172);
pub const RGB_SNIPPET_ASSISTANT_MD_CODE: (u8, u8, u8) = (238, 224, 188);

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

pub fn prompt_text(connected: bool) -> &'static str {
    if connected {
        PROMPT_CONNECTED
    } else {
        PROMPT_DISCONNECTED
    }
}
