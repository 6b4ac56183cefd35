use std::io::{self, Write};

use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, queue, terminal};
use unicode_segmentation::UnicodeSegmentation;

use crate::core::frontend::Frame;
use crate::core::utf8::{char_width, visual_width};

/// Screen layout: buffer text, one mode line, one echo line.
pub struct Display {
    pub terminal_size: (u16, u16),
    /// First buffer line shown
    pub top_line: usize,
    pub tab_width: usize,
}

impl Display {
    pub fn new(width: u16, height: u16, tab_width: usize) -> Self {
        Self {
            terminal_size: (width, height),
            top_line: 0,
            tab_width: tab_width.max(1),
        }
    }

    /// Sized to the current terminal
    pub fn new_terminal(tab_width: usize) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::new(width, height, tab_width))
    }

    pub fn update_size(&mut self, cols: u16, rows: u16) {
        self.terminal_size = (cols, rows);
    }

    /// Rows available for buffer text
    pub fn text_rows(&self) -> usize {
        (self.terminal_size.1 as usize).saturating_sub(2)
    }

    /// Scroll so `line` is visible.
    pub fn scroll_to(&mut self, line: usize) {
        let rows = self.text_rows().max(1);
        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + rows {
            self.top_line = line + 1 - rows;
        }
    }

    pub fn render(&mut self, frame: &Frame<'_>, out: &mut impl Write) -> io::Result<()> {
        let (width, height) = self.terminal_size;
        if height == 0 || width == 0 {
            return Ok(());
        }
        let width = width as usize;
        let (point_line, point_column) = frame.buffer.point_line_column();
        self.scroll_to(point_line);

        queue!(out, cursor::Hide)?;
        for row in 0..self.text_rows() {
            let text = frame
                .buffer
                .line(self.top_line + row)
                .map(|line| fit_to_width(&line, width, self.tab_width))
                .unwrap_or_default();
            queue!(
                out,
                cursor::MoveTo(0, row as u16),
                Print(text),
                terminal::Clear(terminal::ClearType::UntilNewLine)
            )?;
        }

        let mode_row = height.saturating_sub(2);
        if height >= 2 {
            let mode = pad_to_width(&mode_line(frame), width, '-');
            queue!(
                out,
                cursor::MoveTo(0, mode_row),
                SetAttribute(Attribute::Reverse),
                Print(mode),
                SetAttribute(Attribute::Reset)
            )?;
        }

        let echo = fit_to_width(frame.echo.unwrap_or(""), width, self.tab_width);
        queue!(
            out,
            cursor::MoveTo(0, height - 1),
            Print(echo),
            terminal::Clear(terminal::ClearType::UntilNewLine)
        )?;

        let line_text = frame.buffer.line(point_line).unwrap_or_default();
        let before_point: String = line_text.chars().take(point_column).collect();
        let column = visual_width(&before_point, self.tab_width).min(width.saturating_sub(1));
        let row = point_line.saturating_sub(self.top_line);
        queue!(out, cursor::MoveTo(column as u16, row as u16), cursor::Show)?;
        out.flush()
    }
}

/// Mode line text, e.g. `-**- notes.txt  [(Fundamental Def)]  L3 `.
/// One bracket pair per recursive-edit level.
pub fn mode_line(frame: &Frame<'_>) -> String {
    let modified = if frame.buffer.modified { "**" } else { "--" };
    let level = frame.recursive_edit_level;
    let recording = if frame.recording_macro { " Def" } else { "" };
    let (line, _) = frame.buffer.point_line_column();
    format!(
        "-{}- {}  {}(Fundamental{}){}  L{} ",
        modified,
        frame.buffer.name,
        "[".repeat(level),
        recording,
        "]".repeat(level),
        line + 1
    )
}

/// Expand tabs and cut `text` to at most `width` columns.
pub fn fit_to_width(text: &str, width: usize, tab_width: usize) -> String {
    let mut out = String::new();
    let mut visual_x = 0;
    for grapheme in text.graphemes(true) {
        if grapheme == "\t" {
            let next = (visual_x / tab_width + 1) * tab_width;
            let next = next.min(width);
            out.extend(std::iter::repeat_n(' ', next - visual_x));
            visual_x = next;
        } else {
            let w: usize = grapheme.chars().map(char_width).sum();
            if visual_x + w > width {
                break;
            }
            out.push_str(grapheme);
            visual_x += w;
        }
        if visual_x >= width {
            break;
        }
    }
    out
}

fn pad_to_width(text: &str, width: usize, fill: char) -> String {
    let mut out = fit_to_width(text, width, 1);
    let used = visual_width(&out, 1);
    out.extend(std::iter::repeat_n(fill, width.saturating_sub(used)));
    out
}
