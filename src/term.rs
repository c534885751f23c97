use crate::{TermInt, Coords};
use crate::ui::Rect;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, read, poll};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Drains every event already waiting, without blocking for new ones.
    pub fn read_events_queue(&self) -> Result<Vec<Event>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            events.push(read()?);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords) -> Result<()> {
        let (width, height) = size;
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x0 + x, y0), ch)?;
            self.print_at((x0 + x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((x0, y0 + y), '|')?;
            self.print_at((end_x, y0 + y), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                let ch = self.buffered((x, y));
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        self.print_colored_at(pos, ch, Color::Reset)
    }

    pub fn print_colored_at(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(color),
            style::Print(ch),
            style::ResetColor
        )?;

        if let Some(idx) = self.index(pos) {
            self.screen[idx] = ch;
        }

        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str, color: Color) -> Result<()> {
        // Clipped at the right edge
        let room = self.width.saturating_sub(pos.0) as usize;
        for (i, ch) in text.chars().take(room).enumerate() {
            self.print_colored_at((pos.0 + i as TermInt, pos.1), ch, color)?;
        }

        Ok(())
    }

    /// Prints `text` centered on column `x`, clearing `clear_width` columns
    /// around it first so shorter text leaves nothing stale behind.
    pub fn print_centered(&mut self, x: TermInt, y: TermInt, text: &str, clear_width: TermInt, color: Color) -> Result<()> {
        let blank = " ".repeat(clear_width as usize);
        self.print_str_at((x.saturating_sub(clear_width / 2), y), &blank, Color::Reset)?;

        let len = char_width(text);
        self.print_str_at((x.saturating_sub(len / 2), y), text, color)
    }

    pub fn draw_box(&mut self, rect: &Rect, color: Color) -> Result<()> {
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;

        for x in rect.x..=right {
            let ch = if x == rect.x || x == right {'+'} else {'-'};
            self.print_colored_at((x, rect.y), ch, color)?;
            self.print_colored_at((x, bottom), ch, color)?;
        }

        for y in rect.y + 1..bottom {
            self.print_colored_at((rect.x, y), '|', color)?;
            self.print_colored_at((right, y), '|', color)?;
        }

        Ok(())
    }

    /// Paints `rect` with a solid background and centers `label` in it.
    pub fn fill_rect(&mut self, rect: &Rect, background: Color, label: &str) -> Result<()> {
        let row = " ".repeat(rect.width as usize);
        for y in rect.y..rect.y + rect.height {
            queue!(
                self.stdout,
                cursor::MoveTo(rect.x, y),
                style::SetBackgroundColor(background),
                style::Print(&row)
            )?;
        }

        let (cx, cy) = rect.center();
        let len = char_width(label);
        queue!(
            self.stdout,
            cursor::MoveTo(cx.saturating_sub(len / 2), cy),
            style::SetForegroundColor(Color::White),
            style::Print(label),
            style::ResetColor
        )
    }

    pub fn clear(&mut self) -> Result<()> {
        self.current_msg = None;
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn buffered(&self, pos: Coords) -> char {
        self.index(pos).map_or(' ', |idx| self.screen[idx])
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}

fn char_width(text: &str) -> TermInt {
    text.chars().count().min(TermInt::MAX as usize) as TermInt
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_width_saturates_on_huge_text() {
        assert_eq!(char_width("ab"), 2);
        assert_eq!(char_width(&"é".repeat(3)), 3);
        assert_eq!(char_width(&"n".repeat(TermInt::MAX as usize + 10)), TermInt::MAX);
    }
}
