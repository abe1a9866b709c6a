//! Terminal output renderer for status lines and chat replies.

use crate::tui::markdown::render_markdown_for_terminal;
use crate::tui::progress::{set_progress_enabled, start_progress, ProgressHandle};
use crate::tui::settings;
use crate::tui::text::{clip_to_width, preview, split_reasoning, visible_width, wrap_line};
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal;
use crossterm::QueueableCommand;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockTone {
    /// Final answer text, written to stdout.
    Assistant,
    /// `<think>` sections, written to stderr.
    Reasoning,
}

impl BlockTone {
    fn bg(self) -> Color {
        match self {
            Self::Assistant => settings::COLOR_SNIPPET_ASSISTANT_BG,
            Self::Reasoning => settings::COLOR_SNIPPET_REASONING_BG,
        }
    }

    fn fg(self) -> Color {
        match self {
            Self::Assistant => settings::COLOR_SNIPPET_ASSISTANT_TEXT,
            Self::Reasoning => settings::COLOR_SNIPPET_REASONING_TEXT,
        }
    }
}

/// One styled span inside a rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    text: String,
    rgb: (u8, u8, u8),
    bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Plain(String),
    Styled(Vec<Span>),
    Muted(String),
}

impl Row {
    fn plain_text(&self) -> String {
        match self {
            Self::Plain(text) | Self::Muted(text) => text.clone(),
            Self::Styled(spans) => spans.iter().map(|span| span.text.as_str()).collect(),
        }
    }
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Globally enable/disable live progress spinners.
    pub fn set_progress_enabled(enabled: bool) {
        set_progress_enabled(enabled);
    }

    /// Print the input prompt (to stderr).
    pub fn prompt(&self, connected: bool) {
        let text = settings::prompt_text(connected);
        if self.color {
            let color = if connected {
                settings::COLOR_PROMPT_CONNECTED
            } else {
                settings::COLOR_PROMPT_DISCONNECTED
            };
            eprint!("{}", text.with(color).bold());
        } else {
            eprint!("{text}");
        }
        let _ = io::stderr().flush();
    }

    /// Print an assistant reply: reasoning block on stderr, answer on stdout.
    pub fn assistant_message(&self, content: &str) {
        let (reasoning, answer) = split_reasoning(content);
        if let Some(reasoning) = reasoning.filter(|text| !text.is_empty()) {
            self.label_line(settings::LABEL_THINKING, settings::COLOR_REASONING_LABEL);
            self.render_block(reasoning, BlockTone::Reasoning);
        }
        let width = block_content_width();
        let rendered = render_markdown_for_terminal(answer, Some(width));
        self.render_block(&rendered, BlockTone::Assistant);
    }

    /// Start a spinner with a status label on stderr.
    pub fn progress(&self, label: &str) -> ProgressHandle {
        start_progress(label, self.color)
    }

    /// Print the app/model banner.
    pub fn header(&self, model: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::LABEL_APP.with(settings::COLOR_APP_LABEL).bold(),
                model.with(settings::COLOR_MODEL_NAME),
            );
        } else {
            eprintln!("{} ({model})", settings::LABEL_APP);
        }
    }

    pub fn warn(&self, msg: &str) {
        self.label_message(settings::LABEL_WARNING, settings::COLOR_WARNING, msg);
    }

    pub fn error(&self, msg: &str) {
        self.label_message(settings::LABEL_ERROR, settings::COLOR_ERROR, msg);
    }

    /// Print a small section header in status-style output.
    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                title.with(settings::COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    /// Print an activity line for tunnel/request lifecycle updates.
    pub fn activity(&self, text: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                text.with(settings::COLOR_ACTIVITY_TEXT).bold()
            );
        } else {
            eprintln!("{text}");
        }
    }

    /// Print a key/value line under a status section.
    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{}{} {}",
                settings::INDENT_1,
                format!("{key}:").with(settings::COLOR_FIELD_KEY),
                value.with(settings::COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("{}{key}: {value}", settings::INDENT_1);
        }
    }

    /// Print a simple indented detail line.
    pub fn detail(&self, text: &str) {
        if self.color {
            eprintln!(
                "{}{}",
                settings::INDENT_1,
                text.with(settings::COLOR_FIELD_VALUE)
            );
        } else {
            eprintln!("{}{text}", settings::INDENT_1);
        }
    }

    fn label_message(&self, label: &str, color: Color, msg: &str) {
        if self.color {
            eprintln!("{} {msg}", label.with(color).bold());
        } else {
            eprintln!("{label} {msg}");
        }
    }

    fn label_line(&self, label: &str, color: Color) {
        if self.color {
            eprintln!("{}{}", settings::INDENT_1, label.with(color).bold());
        } else {
            eprintln!("{}{label}", settings::INDENT_1);
        }
    }

    fn render_block(&self, text: &str, tone: BlockTone) {
        let max_lines = match tone {
            BlockTone::Assistant => None,
            BlockTone::Reasoning => Some(settings::REASONING_PREVIEW_LINES),
        };
        let width = block_content_width();
        let rows = block_rows(text, width, tone, max_lines);
        if rows.is_empty() {
            return;
        }

        let result = match tone {
            BlockTone::Assistant => self.write_rows(&mut io::stdout(), &rows, width, tone),
            BlockTone::Reasoning => self.write_rows(&mut io::stderr(), &rows, width, tone),
        };
        if result.is_err() {
            // Queue failures fall back to plain prints so content is not lost.
            for row in &rows {
                match tone {
                    BlockTone::Assistant => println!("{}{}", settings::INDENT_1, row.plain_text()),
                    BlockTone::Reasoning => {
                        eprintln!("{}{}", settings::INDENT_1, row.plain_text())
                    }
                }
            }
        }
    }

    fn write_rows<W: Write + QueueableCommand>(
        &self,
        out: &mut W,
        rows: &[Row],
        width: usize,
        tone: BlockTone,
    ) -> io::Result<()> {
        let bg = tone.bg();
        out.queue(Print("\r\n"))?;
        for row in rows {
            out.queue(Print(settings::INDENT_1))?;
            if !self.color {
                out.queue(Print(row.plain_text()))?;
                out.queue(Print("\r\n"))?;
                continue;
            }
            let used = match row {
                Row::Plain(text) => {
                    out.queue(PrintStyledContent(text.clone().with(tone.fg()).on(bg)))?;
                    visible_width(text)
                }
                Row::Muted(text) => {
                    out.queue(PrintStyledContent(
                        text.clone().with(settings::COLOR_SNIPPET_TRUNCATED).on(bg),
                    ))?;
                    visible_width(text)
                }
                Row::Styled(spans) => {
                    let mut used = 0;
                    for span in spans {
                        let (r, g, b) = span.rgb;
                        let mut styled = span.text.clone().with(Color::Rgb { r, g, b }).on(bg);
                        if span.bold {
                            styled = styled.bold();
                        }
                        out.queue(PrintStyledContent(styled))?;
                        used += visible_width(&span.text);
                    }
                    used
                }
            };
            let pad = width.saturating_sub(used);
            if pad > 0 {
                out.queue(PrintStyledContent(" ".repeat(pad).on(bg)))?;
            }
            out.queue(Print("\r\n"))?;
        }
        out.queue(Print("\r\n"))?;
        out.flush()
    }
}

fn block_content_width() -> usize {
    let cols = terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(settings::BLOCK_FALLBACK_COLUMNS);
    let indent = settings::INDENT_1.chars().count();
    cols.saturating_sub(indent + settings::BLOCK_RIGHT_MARGIN)
        .max(1)
}

/// Lay out `text` into rows no wider than `width`.
fn block_rows(text: &str, width: usize, tone: BlockTone, max_lines: Option<usize>) -> Vec<Row> {
    let shown = preview(text, max_lines);
    let mut rows = Vec::new();
    for line in &shown.lines {
        if tone == BlockTone::Assistant {
            if let Some(spans) = style_markdown_line(line) {
                rows.extend(split_spans(&spans, width));
                continue;
            }
        }
        rows.extend(wrap_line(line, width).into_iter().map(Row::Plain));
    }
    if shown.hidden > 0 {
        rows.push(Row::Muted(format!("...{} more lines...", shown.hidden)));
    }
    rows
}

/// Accent headings, list markers, and inline code in one answer line.
fn style_markdown_line(line: &str) -> Option<Vec<Span>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let indent = &line[..line.len() - trimmed.len()];
    let mut spans = Vec::new();
    if !indent.is_empty() {
        spans.push(span(indent, settings::RGB_SNIPPET_ASSISTANT_TEXT, false));
    }

    if is_heading(trimmed) {
        spans.push(span(trimmed, settings::RGB_SNIPPET_ASSISTANT_MD_HEADING, true));
        return Some(spans);
    }
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("• "))
    {
        let marker = &trimmed[..trimmed.len() - rest.len()];
        spans.push(span(marker, settings::RGB_SNIPPET_ASSISTANT_MD_MARKER, true));
        spans.extend(inline_code_spans(rest));
        return Some(spans);
    }
    if trimmed.contains('`') {
        spans.extend(inline_code_spans(trimmed));
        return Some(spans);
    }
    None
}

fn is_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|ch| *ch == '#').count();
    hashes > 0 && line[hashes..].starts_with(' ')
}

fn inline_code_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for (idx, part) in line.split('`').enumerate() {
        if idx > 0 {
            spans.push(span("`", settings::RGB_SNIPPET_ASSISTANT_MD_CODE, false));
        }
        if part.is_empty() {
            continue;
        }
        let rgb = if idx % 2 == 1 {
            settings::RGB_SNIPPET_ASSISTANT_MD_CODE
        } else {
            settings::RGB_SNIPPET_ASSISTANT_TEXT
        };
        spans.push(span(part, rgb, false));
    }
    spans
}

fn span(text: &str, rgb: (u8, u8, u8), bold: bool) -> Span {
    Span {
        text: text.to_string(),
        rgb,
        bold,
    }
}

/// Break styled spans into rows of at most `width` characters.
fn split_spans(spans: &[Span], width: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut used = 0usize;
    for source in spans {
        let mut rest = source.text.as_str();
        while !rest.is_empty() {
            if used == width {
                rows.push(Row::Styled(std::mem::take(&mut current)));
                used = 0;
            }
            let piece = clip_to_width(rest, width - used);
            rest = &rest[piece.len()..];
            used += visible_width(&piece);
            current.push(Span {
                text: piece,
                ..source.clone()
            });
        }
    }
    rows.push(Row::Styled(current));
    rows
}
