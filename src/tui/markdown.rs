//! Markdown layout for assistant replies via `termimad`.

use termimad::MadSkin;

/// Lay out markdown as unstyled terminal text wrapped to `width` columns.
///
/// Colors are applied afterwards by the block renderer.
pub fn render_markdown_for_terminal(input: &str, width: Option<usize>) -> String {
    let skin = MadSkin::no_style();
    skin.text(input, width)
        .to_string()
        .trim_end_matches('\n')
        .to_string()
}
