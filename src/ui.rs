use crate::{Coords, TermInt};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::style::Color;

pub const MAX_NAME_LEN: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: TermInt,
    pub y: TermInt,
    pub width: TermInt,
    pub height: TermInt,
}

impl Rect {
    pub fn new(x: TermInt, y: TermInt, width: TermInt, height: TermInt) -> Self {
        Rect { x, y, width, height }
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 >= self.x && pos.0 < self.x + self.width &&
        pos.1 >= self.y && pos.1 < self.y + self.height
    }

    pub fn center(&self) -> Coords {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width && other.x < self.x + self.width &&
        self.y < other.y + other.height && other.y < self.y + self.height
    }
}

/// Last known mouse state, fed from terminal events and hit-tested every frame.
#[derive(Debug, Default)]
pub struct Pointer {
    position: Option<Coords>,
    pressed: bool,
}

impl Pointer {
    pub fn update(&mut self, ev: &MouseEvent) {
        self.position = Some((ev.column, ev.row));

        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pressed = true,
            MouseEventKind::Up(MouseButton::Left) => self.pressed = false,
            _ => {}
        }
    }

    pub fn is_over(&self, rect: &Rect) -> bool {
        self.position.map_or(false, |pos| rect.contains(pos))
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Restart,
    Exit,
}

pub struct Button {
    pub label: &'static str,
    pub rect: Rect,
    pub action: ButtonAction,
    pub hover_color: Color,
    pub idle_color: Color,
}

impl Button {
    pub fn color(&self, pointer: &Pointer) -> Color {
        if pointer.is_over(&self.rect) { self.hover_color } else { self.idle_color }
    }

    /// The button fires while it is hovered with the left button held.
    pub fn poll(&self, pointer: &Pointer) -> Option<ButtonAction> {
        if pointer.is_over(&self.rect) && pointer.is_pressed() {
            Some(self.action)
        } else {
            None
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum NameAction {
    Editing,
    Commit(String),
    Skip,
}

/// The player-name text box of the game-over screen. It starts focused so
/// terminals without mouse reporting can still type a name; Tab toggles
/// focus and clicks set it.
#[derive(Debug)]
pub struct NameEntry {
    text: String,
    focused: bool,
}

impl Default for NameEntry {
    fn default() -> Self {
        NameEntry { text: String::new(), focused: true }
    }
}

impl NameEntry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> NameAction {
        if key.code == KeyCode::Tab {
            self.focused = !self.focused;
            return NameAction::Editing;
        }

        if !self.focused {
            return NameAction::Editing;
        }

        match key.code {
            KeyCode::Enter => return NameAction::Commit(std::mem::take(&mut self.text)),
            KeyCode::Esc => return NameAction::Skip,
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                    && !ch.is_control()
                    && self.text.chars().count() < MAX_NAME_LEN =>
            {
                self.text.push(ch);
            }
            _ => {}
        }

        NameAction::Editing
    }
}

/// Fixed positions of everything on the game-over screen for a terminal of
/// the given size.
pub struct GameOverLayout {
    pub title_y: TermInt,
    pub textbox: Rect,
    pub table_y: TermInt,
    pub restart: Button,
    pub exit: Button,
}

impl GameOverLayout {
    pub fn new(size: Coords) -> Self {
        let (width, height) = size;
        let center_x = width / 2;

        let textbox_width = (width / 2).max(MAX_NAME_LEN as TermInt + 4);
        let textbox = Rect::new(center_x.saturating_sub(textbox_width / 2), height / 5, textbox_width, 3);

        let button_width = 12;
        let button_y = height.saturating_sub(5);

        let restart = Button {
            label: "Restart",
            rect: Rect::new(center_x.saturating_sub(button_width + 2), button_y, button_width, 3),
            action: ButtonAction::Restart,
            hover_color: Color::Green,
            idle_color: Color::DarkGreen,
        };

        let exit = Button {
            label: "Exit",
            rect: Rect::new(center_x + 2, button_y, button_width, 3),
            action: ButtonAction::Exit,
            hover_color: Color::Red,
            idle_color: Color::DarkRed,
        };

        GameOverLayout {
            title_y: 1,
            textbox,
            table_y: textbox.y + textbox.height + 1,
            restart,
            exit,
        }
    }

    pub fn buttons(&self) -> [&Button; 2] {
        [&self.restart, &self.exit]
    }

    /// First action among the buttons the pointer currently triggers.
    pub fn poll(&self, pointer: &Pointer) -> Option<ButtonAction> {
        self.buttons().iter().find_map(|b| b.poll(pointer))
    }

    pub fn fits(&self, size: Coords) -> bool {
        let inside = |r: &Rect| r.x + r.width <= size.0 && r.y + r.height <= size.1;
        let table_bottom = self.table_y + crate::scores::MAX_ENTRIES as TermInt;

        // Two title lines sit above the text box
        self.title_y + 2 <= self.textbox.y
            && inside(&self.textbox) && inside(&self.restart.rect) && inside(&self.exit.rect)
            && !self.restart.rect.overlaps(&self.exit.rect)
            && table_bottom <= self.restart.rect.y
    }
}
