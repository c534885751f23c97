use std::{thread::sleep, time::{Duration, Instant}};

use crate::{Coords, TermInt};
use crate::config::Config;
use crate::difficulty::{Difficulty, DifficultyMenu};
use crate::food::Food;
use crate::scores::HighScoreTable;
use crate::term::TermManager;
use crate::snake::{Snake, Field, Direction::{*, self}, MoveResult::*};
use crate::ui::{ButtonAction, GameOverLayout, NameAction, NameEntry, Pointer};

use anyhow::{bail, Context};
use crossterm::event::{Event, KeyEvent, KeyModifiers, KeyCode};
use crossterm::style::Color;
use rand::Rng;
use rand::rngs::ThreadRng;

const UI_FRAME_RATE: u32 = 30;
const DEATH_PAUSE_MS: u64 = 600;

// Every grid cell is two terminal columns wide so it looks square
const SNAKE_BODY_CELL: &str = "██";
const APPLE_CELL: &str = "()";
const DEAD_SNAKE_CELL: &str = "XX";
const EMPTY_CELL: &str = "  ";

/// Sleeps out whatever is left of the current tick.
pub struct FrameClock {
    period: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        FrameClock { period: Duration::from_secs(1) / ticks_per_sec.max(1), last: Instant::now() }
    }

    pub fn tick(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

pub struct SnakeGame {
    config: Config,
    field: Field,
    term: TermManager,
    scores: HighScoreTable,
    rng: ThreadRng,
}

impl SnakeGame {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let term = TermManager::new().context("reading terminal size")?;
        let field = Field::new(config.cols, config.rows);

        let (w, h) = term.get_terminal_size();
        let (need_w, need_h) = board_size(&field);
        if w < need_w || h < need_h {
            bail!(
                "terminal is {}x{} but a {}x{} field needs at least {}x{}",
                w, h, field.cols, field.rows, need_w, need_h
            );
        }
        if !GameOverLayout::new((w, h)).fits((w, h)) {
            bail!("terminal is {}x{}, too small for the score screen", w, h);
        }

        let scores = HighScoreTable::load(&config.scores_file);

        Ok(SnakeGame { config, field, term, scores, rng: rand::thread_rng() })
    }

    pub fn initialize(&mut self) -> anyhow::Result<()> {
        self.term.setup().context("preparing terminal")
    }

    pub fn shutdown(&mut self) -> crossterm::Result<()> {
        self.term.restore()
    }

    /// Rounds of intro, play and game over until the player leaves.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let difficulty = match self.choose_difficulty()? {
                Some(d) => d,
                None => return Ok(()),
            };

            let snake = match self.play(difficulty)? {
                Some(snake) => snake,
                None => return Ok(()),
            };

            match self.game_over(&snake, difficulty)? {
                ButtonAction::Restart => log::info!("Restarting"),
                ButtonAction::Exit => return Ok(()),
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Intro screen. `None` means the player asked to quit.
    fn choose_difficulty(&mut self) -> anyhow::Result<Option<Difficulty>> {
        let mut menu = DifficultyMenu::default();
        self.term.clear()?;

        loop {
            let lines = menu.lines();
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            self.term.show_message(&lines)?;

            let key = self.term.read_key_blocking()?;
            match key.code {
                _ if is_ctrl_c(&key) => return Ok(None),
                KeyCode::Up | KeyCode::Char('w') => menu.select_previous(),
                KeyCode::Down | KeyCode::Char('s') => menu.select_next(),
                KeyCode::Enter => {
                    let difficulty = menu.selected();
                    log::info!("Difficulty {} ({} moves/s)", difficulty, difficulty.speed());
                    self.term.hide_message()?;
                    return Ok(Some(difficulty));
                }
                _ => {}
            }
        }
    }

    /// One round. Returns the dead snake, or `None` if the player quit mid-game.
    fn play(&mut self, difficulty: Difficulty) -> anyhow::Result<Option<Snake>> {
        self.term.clear()?;
        let (w, h) = board_size(&self.field);
        self.term.draw_borders((0, 1), (w, h - 1))?;

        let mut snake = Snake::new(self.field.center(), Direction::random(&mut self.rng), difficulty.speed());
        let mut food = Food::new(&self.field, &mut self.rng);
        let mut clock = FrameClock::new(snake.speed());

        self.print_cell(snake.head(), &snake.head_char().to_string().repeat(2), Color::Yellow)?;
        self.print_cell(food.position(), APPLE_CELL, Color::Red)?;
        self.print_score(&snake, difficulty)?;
        self.term.flush()?;

        loop {
            for ev in self.term.read_events_queue()? {
                if let Event::Key(key_ev) = ev {
                    if is_ctrl_c(&key_ev) {
                        return Ok(None);
                    }
                    if let Some(dir) = key_direction(key_ev.code) {
                        snake.turn(dir);
                    }
                }
            }

            match snake.move_step(&self.field) {
                Crashed => {
                    log::info!("Crashed at {:?} heading {:?}, score {} on {}", snake.head(), snake.direction(), snake.score(), difficulty);
                    for &pos in snake.body() {
                        self.print_cell(pos, DEAD_SNAKE_CELL, Color::DarkRed)?;
                    }
                    self.term.flush()?;
                    sleep(Duration::from_millis(DEATH_PAUSE_MS));
                    return Ok(Some(snake));
                },
                Moved { new_head, old_head, old_tail } => {
                    if eat_if_on_food(&mut snake, &mut food, &self.field, &mut self.rng) {
                        log::debug!("Ate food at {:?}, length now {}", new_head, snake.length());
                        self.print_score(&snake, difficulty)?;
                    }

                    // Tail first: the head may have moved into the cell it left
                    if let Some(old_tail) = old_tail {
                        self.print_cell(old_tail, EMPTY_CELL, Color::Reset)?;
                    }
                    if snake.body().len() > 1 {
                        self.print_cell(old_head, SNAKE_BODY_CELL, Color::Green)?;
                    }
                    self.print_cell(new_head, &snake.head_char().to_string().repeat(2), Color::Yellow)?;
                    self.print_cell(food.position(), APPLE_CELL, Color::Red)?;
                    self.term.flush()?;
                },
            }

            clock.tick();
        }
    }

    /// Score screen with name entry and the restart/exit buttons.
    fn game_over(&mut self, snake: &Snake, difficulty: Difficulty) -> anyhow::Result<ButtonAction> {
        // Keys pressed while the snake was dying are not meant for the text box
        self.term.read_events_queue()?;
        self.term.clear()?;

        let size = self.term.get_terminal_size();
        let layout = GameOverLayout::new(size);
        let mut entry = NameEntry::default();
        let mut pointer = Pointer::default();
        let mut clock = FrameClock::new(UI_FRAME_RATE);

        self.draw_game_over_static(&layout, snake, difficulty)?;

        loop {
            for ev in self.term.read_events_queue()? {
                match ev {
                    Event::Key(key_ev) if is_ctrl_c(&key_ev) => return Ok(ButtonAction::Exit),
                    Event::Key(key_ev) => match entry.handle_key(&key_ev) {
                        NameAction::Commit(name) => {
                            let rank = self.scores.insert(difficulty.label(), &name, snake.score());
                            log::info!("Saving score {} for {:?} on {} (rank {:?})", snake.score(), name, difficulty, rank);
                            self.scores.save(&self.config.scores_file).with_context(|| {
                                format!("saving scores to {}", self.config.scores_file.display())
                            })?;
                            return Ok(ButtonAction::Exit);
                        }
                        NameAction::Skip => return Ok(ButtonAction::Exit),
                        NameAction::Editing => {}
                    },
                    Event::Mouse(mouse_ev) => {
                        pointer.update(&mouse_ev);
                        if let crossterm::event::MouseEventKind::Down(_) = mouse_ev.kind {
                            entry.set_focus(layout.textbox.contains((mouse_ev.column, mouse_ev.row)));
                        }
                    }
                    _ => {}
                }
            }

            if let Some(action) = layout.poll(&pointer) {
                log::info!("{:?} pressed", action);
                return Ok(action);
            }

            self.draw_game_over_dynamic(&layout, &entry, &pointer)?;
            clock.tick();
        }
    }

    fn draw_game_over_static(&mut self, layout: &GameOverLayout, snake: &Snake, difficulty: Difficulty) -> anyhow::Result<()> {
        let (w, _) = self.term.get_terminal_size();
        let center_x = w / 2;

        self.term.print_centered(center_x, layout.title_y,
            &format!("Game over! Your snake reached length {}", snake.score()), w, Color::White)?;
        self.term.print_centered(center_x, layout.title_y + 1,
            &format!("Enter your name for {}:", difficulty), w, Color::White)?;

        let entries = self.scores.entries(difficulty.label()).to_vec();
        if entries.is_empty() {
            self.term.print_centered(center_x, layout.table_y, "No scores yet", w, Color::DarkGrey)?;
        }
        for (i, e) in entries.iter().enumerate() {
            self.term.print_centered(center_x, layout.table_y + i as TermInt,
                &format!("{}. {} - {}", i + 1, e.name, e.score), w, Color::White)?;
        }

        Ok(())
    }

    fn draw_game_over_dynamic(&mut self, layout: &GameOverLayout, entry: &NameEntry, pointer: &Pointer) -> anyhow::Result<()> {
        let box_color = if entry.is_focused() { Color::Blue } else { Color::Cyan };
        self.term.draw_box(&layout.textbox, box_color)?;

        let (cx, cy) = layout.textbox.center();
        self.term.print_centered(cx, cy, entry.text(), layout.textbox.width - 2, Color::White)?;

        for button in layout.buttons().iter() {
            self.term.fill_rect(&button.rect, button.color(pointer), button.label)?;
        }

        self.term.flush()?;
        Ok(())
    }

    fn print_cell(&mut self, cell: Coords, glyph: &str, color: Color) -> anyhow::Result<()> {
        self.term.print_str_at(cell_to_screen(cell), glyph, color)?;
        Ok(())
    }

    fn print_score(&mut self, snake: &Snake, difficulty: Difficulty) -> anyhow::Result<()> {
        let (w, _) = board_size(&self.field);
        let text = format!("Length: {}   {}", snake.score(), difficulty);
        self.term.print_centered(w / 2, 0, &text, w, Color::White)?;
        Ok(())
    }
}

/// Grows the snake and moves the food when the head is on it.
fn eat_if_on_food<R: Rng + ?Sized>(snake: &mut Snake, food: &mut Food, field: &Field, rng: &mut R) -> bool {
    if snake.head() != food.position() {
        return false;
    }

    snake.grow();
    food.randomize_position(field, rng);
    true
}

/// Terminal columns and rows the score line plus the bordered field take up.
fn board_size(field: &Field) -> Coords {
    (field.cols * 2 + 2, field.rows + 3)
}

/// Screen position of a field cell: one row below the score line and
/// inside the border.
fn cell_to_screen(cell: Coords) -> Coords {
    (1 + cell.0 * 2, 2 + cell.1)
}

fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
