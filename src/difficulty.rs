use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Snake moves per second.
    pub fn speed(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }

    /// Key of this tier in the high-score table.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Selection state of the intro screen.
#[derive(Debug, Default)]
pub struct DifficultyMenu {
    selected: usize,
}

impl DifficultyMenu {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Difficulty::ALL.len();
    }

    pub fn select_previous(&mut self) {
        let n = Difficulty::ALL.len();
        self.selected = (self.selected + n - 1) % n;
    }

    pub fn selected(&self) -> Difficulty {
        Difficulty::ALL[self.selected]
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Choose difficulty:".to_string(), String::new()];

        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let marker = if i == self.selected { '>' } else { ' ' };
            lines.push(format!("{} {}. {:<6}", marker, i + 1, difficulty));
        }

        lines.push(String::new());
        lines.push("Up/Down to choose, Enter to start".to_string());
        lines.push("CTRL+C to quit".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_per_tier() {
        let speeds: Vec<u32> = Difficulty::ALL.iter().map(|d| d.speed()).collect();
        assert_eq!(speeds, vec![10, 20, 30]);
    }

    #[test]
    fn starts_on_easy() {
        assert_eq!(DifficultyMenu::default().selected(), Difficulty::Easy);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut menu = DifficultyMenu::default();
        menu.select_previous();
        assert_eq!(menu.selected(), Difficulty::Hard);
        menu.select_next();
        assert_eq!(menu.selected(), Difficulty::Easy);
        menu.select_next();
        menu.select_next();
        assert_eq!(menu.selected(), Difficulty::Hard);
        menu.select_next();
        assert_eq!(menu.selected(), Difficulty::Easy);
    }

    #[test]
    fn marks_selected_line() {
        let mut menu = DifficultyMenu::default();
        menu.select_next();
        let lines = menu.lines();
        assert!(lines.contains(&"> 2. Medium".to_string()));
        assert!(lines.contains(&"  1. Easy  ".to_string()));
    }
}
