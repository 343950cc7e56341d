//! Terminal input commands.

/// A line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Raise,
    Lower,
    Who,
    Help,
    Quit,
}

impl Command {
    /// Parse a trimmed input line; case-insensitive, with one-letter aliases.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "raise" | "r" => Some(Self::Raise),
            "lower" | "l" => Some(Self::Lower),
            "who" | "w" => Some(Self::Who),
            "help" | "h" | "?" => Some(Self::Help),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_and_aliases() {
        // テスト項目: コマンド名と 1 文字の別名が解釈される
        assert_eq!(Command::parse("raise"), Some(Command::Raise));
        assert_eq!(Command::parse("r"), Some(Command::Raise));
        assert_eq!(Command::parse("lower"), Some(Command::Lower));
        assert_eq!(Command::parse("l"), Some(Command::Lower));
        assert_eq!(Command::parse("who"), Some(Command::Who));
        assert_eq!(Command::parse("h"), Some(Command::Help));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        // テスト項目: 大文字小文字と前後の空白は無視される
        assert_eq!(Command::parse("  RAISE \n"), Some(Command::Raise));
    }

    #[test]
    fn test_parse_unknown() {
        // テスト項目: 未知の入力は None
        assert_eq!(Command::parse("wave"), None);
        assert_eq!(Command::parse(""), None);
    }
}
