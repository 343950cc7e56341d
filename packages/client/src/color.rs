//! Per-user display colour.

use std::fmt;

/// 24-bit colour derived from a username
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Deterministic colour for `username`; equal names always get equal colours.
    pub fn from_username(username: &str) -> Self {
        let hash = username.chars().fold(0i32, |hash, c| {
            (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
        });
        let [b, g, r, _] = hash.to_le_bytes();
        Self { r, g, b }
    }

    /// Wrap `text` in an ANSI 24-bit foreground colour sequence
    pub fn paint(&self, text: &str) -> String {
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", self.r, self.g, self.b, text)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_color() {
        // テスト項目: 同じ名前からは常に同じ色が得られる
        assert_eq!(Rgb::from_username("alice"), Rgb::from_username("alice"));
    }

    #[test]
    fn test_different_names_differ() {
        // テスト項目: 異なる名前は（この例では）異なる色になる
        assert_ne!(Rgb::from_username("alice"), Rgb::from_username("bob"));
    }

    #[test]
    fn test_empty_name_is_black() {
        // テスト項目: 空の名前は黒になる
        assert_eq!(Rgb::from_username(""), Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(Rgb::from_username("").to_string(), "#000000");
    }

    #[test]
    fn test_single_char_color() {
        // テスト項目: 1 文字の名前はその文字コードが青成分になる
        // given (前提条件): 'a' = 97
        // when (操作):
        let color = Rgb::from_username("a");

        // then (期待する結果):
        assert_eq!(color, Rgb { r: 0, g: 0, b: 97 });
    }

    #[test]
    fn test_paint_wraps_in_ansi_sequence() {
        // テスト項目: ANSI のトゥルーカラー指定で囲まれる
        // given (前提条件):
        let color = Rgb { r: 1, g: 2, b: 3 };

        // when (操作):
        let painted = color.paint("bob");

        // then (期待する結果):
        assert_eq!(painted, "\x1b[38;2;1;2;3mbob\x1b[0m");
    }
}
