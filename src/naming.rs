//! Output file names: `<seq><sep><title>.pdf`.

use clap::ValueEnum;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Reserved on Windows, plus ASCII control characters.
static PORTABLE_ILLEGAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/:*?"<>|\x00-\x1F\x7F]"#).expect("static regex is valid")
});

/// Makes an index title safe to use as a file name stem.
pub trait FilenameSanitizer {
    fn sanitize<'a>(&self, title: &'a str) -> Cow<'a, str>;
}

/// Replaces characters rejected by any mainstream filesystem with `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable;

impl FilenameSanitizer for Portable {
    fn sanitize<'a>(&self, title: &'a str) -> Cow<'a, str> {
        PORTABLE_ILLEGAL.replace_all(title, "_")
    }
}

/// Replaces only the path separator and NUL.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unix;

impl FilenameSanitizer for Unix {
    fn sanitize<'a>(&self, title: &'a str) -> Cow<'a, str> {
        if title.contains(['/', '\0']) {
            Cow::Owned(title.replace(['/', '\0'], "_"))
        } else {
            Cow::Borrowed(title)
        }
    }
}

/// Leaves titles untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl FilenameSanitizer for Passthrough {
    fn sanitize<'a>(&self, title: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(title)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SanitizeMode {
    /// Replace \ / : * ? " < > | and control characters
    #[default]
    Portable,
    /// Replace only / and NUL
    Unix,
    /// Use titles verbatim
    None,
}

impl SanitizeMode {
    pub fn sanitizer(self) -> Box<dyn FilenameSanitizer + Send + Sync> {
        match self {
            SanitizeMode::Portable => Box::new(Portable),
            SanitizeMode::Unix => Box::new(Unix),
            SanitizeMode::None => Box::new(Passthrough),
        }
    }
}

/// Width of the zero-padded sequence number.
pub fn sequence_width(entry_count: usize, min_width: usize) -> usize {
    let digits = entry_count.max(1).to_string().len();
    digits.max(min_width)
}

pub fn file_name(
    sequence: usize,
    width: usize,
    separator: &str,
    title: &str,
    sanitizer: &dyn FilenameSanitizer,
) -> String {
    format!(
        "{:0width$}{}{}.pdf",
        sequence,
        separator,
        sanitizer.sanitize(title),
        width = width
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_width() {
        assert_eq!(sequence_width(1, 2), 2);
        assert_eq!(sequence_width(99, 2), 2);
        assert_eq!(sequence_width(100, 2), 3);
        assert_eq!(sequence_width(12345, 2), 5);
        assert_eq!(sequence_width(5, 4), 4);
        assert_eq!(sequence_width(0, 2), 2);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(1, 2, " ", "Prefácio", &Portable), "01 Prefácio.pdf");
        assert_eq!(file_name(7, 3, " - ", "Intro", &Portable), "007 - Intro.pdf");
        assert_eq!(file_name(123, 2, "_", "Big", &Portable), "123_Big.pdf");
    }

    #[test]
    fn test_portable_sanitizer() {
        assert_eq!(
            Portable.sanitize(r#"Part 1/2: "Why?" <a|b> \ *"#),
            "Part 1_2_ _Why__ _a_b_ _ _"
        );
        assert_eq!(Portable.sanitize("tab\there"), "tab_here");
        assert!(matches!(Portable.sanitize("Clean"), Cow::Borrowed("Clean")));
    }

    #[test]
    fn test_unix_sanitizer() {
        assert_eq!(Unix.sanitize("A/B: C?"), "A_B: C?");
        assert!(matches!(Unix.sanitize("A: B"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_passthrough_sanitizer() {
        assert_eq!(Passthrough.sanitize("a/b"), "a/b");
    }

    #[test]
    fn test_mode_selects_strategy() {
        assert_eq!(SanitizeMode::default(), SanitizeMode::Portable);
        assert_eq!(SanitizeMode::Unix.sanitizer().sanitize("x/y:z"), "x_y:z");
        assert_eq!(SanitizeMode::None.sanitizer().sanitize("x/y"), "x/y");
    }
}
