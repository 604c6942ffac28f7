//! Sliding-window ngram generation

use crate::{text, Token};
use clap::ValueEnum;
use serde::Serialize;
use std::{num::NonZeroUsize, slice::Windows};

/// What ngrams are made of
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Whitespace-separated words from the raw file text
    Words,

    /// Word character runs from the text with comments stripped
    Tokens,
}
//
impl Mode {
    /// Window size that is used when none is specified
    pub fn default_window(self) -> NonZeroUsize {
        match self {
            Self::Words => DEFAULT_WORD_WINDOW,
            Self::Tokens => DEFAULT_TOKEN_WINDOW,
        }
    }

    /// Split the raw text of a source file into ngram building blocks
    pub fn units(self, text: &str) -> Vec<Token> {
        match self {
            Self::Words => text::words(text),
            Self::Tokens => text::tokenize(&text::normalize(text)),
        }
    }
}

/// Default window size for the quick word-based scan
const DEFAULT_WORD_WINDOW: NonZeroUsize = match NonZeroUsize::new(6) {
    Some(window) => window,
    None => panic!("window sizes must be nonzero"),
};

/// Default window size for the token-based model
const DEFAULT_TOKEN_WINDOW: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(window) => window,
    None => panic!("window sizes must be nonzero"),
};

/// Enumerate the overlapping windows of `window` consecutive units
///
/// A sequence of length L yields L - window + 1 windows starting at offsets 0,
/// 1, 2..., or no window at all if it is shorter than the window.
pub fn windows<T>(units: &[T], window: NonZeroUsize) -> Windows<'_, T> {
    units.windows(window.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn window_count_is_length_minus_size_plus_one() {
        let units = (0..10).collect::<Vec<u32>>();
        for size in 1..=units.len() {
            let windows = windows(&units, nz(size)).collect::<Vec<_>>();
            assert_eq!(windows.len(), units.len() - size + 1);
            assert!(windows.iter().all(|window| window.len() == size));
            let firsts = windows.iter().map(|window| window[0]).collect::<Vec<_>>();
            assert_eq!(firsts, &units[..units.len() - size + 1]);
        }
    }

    #[test]
    fn short_sequences_have_no_windows() {
        assert_eq!(windows(&[1, 2], nz(3)).count(), 0);
        assert_eq!(windows::<u8>(&[], nz(1)).count(), 0);
    }

    #[test]
    fn windows_overlap() {
        let units = text::words("a b c a b c");
        let windows = windows(&units, nz(3))
            .map(|window| window.join(" "))
            .collect::<Vec<_>>();
        assert_eq!(windows, ["a b c", "b c a", "c a b", "a b c"]);
    }

    #[test]
    fn modes_split_text_differently() {
        let text = "x = f(y); // note";
        assert_eq!(Mode::Words.units(text).len(), 5);
        assert_eq!(
            &*Mode::Tokens.units(text),
            ["x", "f", "y"].map(Token::from)
        );
    }

    #[test]
    fn default_windows_match_reference_runs() {
        assert_eq!(Mode::Words.default_window().get(), 6);
        assert_eq!(Mode::Tokens.default_window().get(), 3);
    }
}
