use crate::{Coords, TermInt};
use Direction::*;
use MoveResult::*;

use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// The play field, measured in grid cells. Movement wraps around its edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub cols: TermInt,
    pub rows: TermInt,
}

impl Field {
    pub fn new(cols: TermInt, rows: TermInt) -> Self {
        Field { cols, rows }
    }

    pub fn center(&self) -> Coords {
        (self.cols / 2, self.rows / 2)
    }

    /// The cell one step from `pos` towards `dir`, re-entering at the opposite edge.
    pub fn step(&self, pos: Coords, dir: Direction) -> Coords {
        let (dx, dy) = dir.delta();
        let x = (pos.0 as i32 + dx).rem_euclid(self.cols as i32);
        let y = (pos.1 as i32 + dy).rem_euclid(self.rows as i32);
        (x as TermInt, y as TermInt)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_head: Coords, old_tail: Option<Coords> },
    Crashed
}

pub struct Snake {
    // Head first
    body: Vec<Coords>,
    direction: Direction,
    // Direction of the last step actually taken
    moved: Direction,
    length: usize,
    score: u32,
    speed: u32,
}

impl Snake {
    pub fn new(pos: Coords, direction: Direction, speed: u32) -> Self {
        Snake { body: vec![pos], direction, moved: direction, length: 1, score: 1, speed }
    }

    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks per second.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn move_step(&mut self, field: &Field) -> MoveResult {
        let old_head = self.head();
        let new_head = field.step(old_head, self.direction);

        // The tail cell is free to enter when it is vacated on this very move
        let drops_tail = self.body.len() >= self.length;
        let occupied = if drops_tail {
            &self.body[..self.body.len() - 1]
        } else {
            &self.body[..]
        };

        if occupied.contains(&new_head) {
            return Crashed;
        }

        self.body.insert(0, new_head);
        self.moved = self.direction;

        let old_tail = if self.body.len() > self.length {
            self.body.pop()
        } else {
            None
        };

        Moved { new_head, old_head, old_tail }
    }

    /// Several turns can land between two moves; none of them may send the
    /// head back into the neck.
    pub fn turn(&mut self, new_direction: Direction) {
        let reverses = new_direction == self.direction.opposite() || new_direction == self.moved.opposite();
        if self.length > 1 && reverses {
            return;
        }

        self.direction = new_direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self) {
        self.length += 1;
        self.score += 1;
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Field {
        Field::new(10, 8)
    }

    /// Builds a snake whose body runs from `head` backwards against `direction`.
    fn snake_of(head: Coords, direction: Direction, len: usize) -> Snake {
        let mut snake = Snake::new(head, direction, 10);
        let back = direction.opposite();
        for _ in 1..len {
            let tail = *snake.body.last().unwrap();
            snake.body.push(field().step(tail, back));
            snake.grow();
        }
        snake
    }

    #[test]
    fn starts_with_one_segment_and_score_one() {
        let snake = Snake::new((5, 4), Right, 20);
        assert_eq!(snake.body(), &[(5, 4)]);
        assert_eq!(snake.length(), 1);
        assert_eq!(snake.score(), 1);
        assert_eq!(snake.speed(), 20);
    }

    #[test]
    fn non_reverse_turns_apply_immediately() {
        for &from in Direction::ALL.iter() {
            for &to in Direction::ALL.iter().filter(|d| **d != from.opposite()) {
                let mut snake = snake_of((5, 4), from, 3);
                snake.turn(to);
                assert_eq!(snake.direction(), to);
            }
        }
    }

    #[test]
    fn reverse_turn_ignored_once_longer_than_one() {
        for &dir in Direction::ALL.iter() {
            let mut snake = snake_of((5, 4), dir, 2);
            snake.turn(dir.opposite());
            assert_eq!(snake.direction(), dir);
        }
    }

    #[test]
    fn two_quick_turns_cannot_reverse_before_moving() {
        let f = field();
        let mut snake = snake_of((5, 4), Right, 3);
        snake.turn(Up);
        snake.turn(Left);
        assert_eq!(snake.direction(), Up);

        assert_eq!(
            snake.move_step(&f),
            Moved { new_head: (5, 3), old_head: (5, 4), old_tail: Some((3, 4)) }
        );
        snake.turn(Left);
        assert_eq!(snake.direction(), Left);
    }

    #[test]
    fn reverse_turn_allowed_at_length_one() {
        let mut snake = Snake::new((5, 4), Left, 10);
        snake.turn(Right);
        assert_eq!(snake.direction(), Right);
    }

    #[test]
    fn wraps_on_every_edge() {
        let f = field();
        assert_eq!(f.step((9, 3), Right), (0, 3));
        assert_eq!(f.step((0, 3), Left), (9, 3));
        assert_eq!(f.step((4, 0), Up), (4, 7));
        assert_eq!(f.step((4, 7), Down), (4, 0));

        let mut snake = Snake::new((0, 0), Up, 10);
        assert_eq!(
            snake.move_step(&f),
            Moved { new_head: (0, 7), old_head: (0, 0), old_tail: Some((0, 0)) }
        );
        assert_eq!(snake.head(), (0, 7));
    }

    #[test]
    fn move_keeps_length_invariant() {
        let f = field();
        let mut snake = snake_of((5, 4), Right, 3);
        assert_eq!(snake.body(), &[(5, 4), (4, 4), (3, 4)]);

        let res = snake.move_step(&f);
        assert_eq!(res, Moved { new_head: (6, 4), old_head: (5, 4), old_tail: Some((3, 4)) });
        assert_eq!(snake.body(), &[(6, 4), (5, 4), (4, 4)]);
        assert!(snake.body().len() <= snake.length());
    }

    #[test]
    fn growth_adds_one_segment_over_next_move() {
        let f = field();
        let mut snake = Snake::new((5, 4), Right, 10);
        snake.grow();
        assert_eq!(snake.length(), 2);
        assert_eq!(snake.score(), 2);

        let res = snake.move_step(&f);
        assert_eq!(res, Moved { new_head: (6, 4), old_head: (5, 4), old_tail: None });
        assert_eq!(snake.body(), &[(6, 4), (5, 4)]);

        snake.move_step(&f);
        assert_eq!(snake.body(), &[(7, 4), (6, 4)]);
    }

    #[test]
    fn detects_running_into_own_body() {
        let f = field();
        // Hook shape: head at (5,4) heading up, body curls below and to the right
        let mut snake = Snake::new((5, 4), Up, 10);
        snake.body = vec![(5, 4), (5, 5), (6, 5), (6, 4), (6, 3)];
        snake.length = 5;

        snake.turn(Right);
        assert_eq!(snake.move_step(&f), Crashed);
        assert_eq!(snake.body().len(), 5);
        assert_eq!(snake.head(), (5, 4));
    }

    #[test]
    fn chasing_own_tail_is_not_a_collision() {
        let f = field();
        // 2x2 loop: the next head lands exactly where the tail leaves
        let mut snake = Snake::new((5, 4), Down, 10);
        snake.body = vec![(5, 4), (6, 4), (6, 5), (5, 5)];
        snake.length = 4;

        let res = snake.move_step(&f);
        assert_eq!(res, Moved { new_head: (5, 5), old_head: (5, 4), old_tail: Some((5, 5)) });
        assert_eq!(snake.body(), &[(5, 5), (5, 4), (6, 4), (6, 5)]);
    }

    #[test]
    fn tail_blocks_while_growing() {
        let f = field();
        let mut snake = Snake::new((5, 4), Down, 10);
        snake.body = vec![(5, 4), (6, 4), (6, 5), (5, 5)];
        snake.length = 5;

        assert_eq!(snake.move_step(&f), Crashed);
    }

    #[test]
    fn head_char_follows_direction() {
        let mut snake = Snake::new((1, 1), Up, 10);
        assert_eq!(snake.head_char(), '^');
        snake.turn(Left);
        assert_eq!(snake.head_char(), '<');
    }
}
