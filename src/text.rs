//! Turning source text into words and tokens

use crate::Token;
use regex::Regex;
use std::sync::OnceLock;

static COMMENT: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static WORD_CHARS: OnceLock<Regex> = OnceLock::new();

/// Line comments, or block comments up to the nearest end marker
fn comment_pattern() -> &'static Regex {
    COMMENT.get_or_init(|| {
        Regex::new(r"//.*|/\*[\s\S]*?\*/").expect("comment pattern should be a valid regex")
    })
}

fn whitespace_pattern() -> &'static Regex {
    WHITESPACE.get_or_init(|| {
        Regex::new(r"\s+").expect("whitespace pattern should be a valid regex")
    })
}

fn word_chars_pattern() -> &'static Regex {
    WORD_CHARS.get_or_init(|| {
        Regex::new(r"\w+").expect("word character pattern should be a valid regex")
    })
}

/// Strip comments from source text and collapse whitespace
///
/// `//` comments run until the end of the line and `/* */` comments until the
/// first following end marker. Comment markers are recognized everywhere,
/// including inside of string literals, so `"http://x"` loses everything after
/// the `//`. Every run of whitespace then becomes a single space, and leading
/// and trailing whitespace is removed.
pub fn normalize(text: &str) -> String {
    let uncommented = comment_pattern().replace_all(text, "");
    whitespace_pattern()
        .replace_all(&uncommented, " ")
        .trim()
        .to_owned()
}

/// Split text into maximal runs of word characters (letters, digits and
/// underscores), in order of appearance
///
/// Everything else acts as a separator and is dropped. Case is preserved.
pub fn tokenize(text: &str) -> Vec<Token> {
    word_chars_pattern()
        .find_iter(text)
        .map(|token| token.as_str().into())
        .collect()
}

/// Split text into whitespace-separated words
pub fn words(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comments_are_stripped() {
        assert_eq!(normalize("foo(); // comment\n  bar();"), "foo(); bar();");
    }

    #[test]
    fn block_comments_are_stripped_lazily() {
        let text = "/** Javadoc\n * spanning lines\n */\nint a; /* one */ int b; /* two */\n";
        assert_eq!(normalize(text), "int a; int b;");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize("\t if (x)\r\n\n   {  y(); }  \n"), "if (x) { y(); }");
        assert_eq!(normalize("  \n // nothing but a comment\n"), "");
    }

    #[test]
    fn comment_markers_in_strings_are_not_special() {
        let text = "String url = \"http://example.com\";\nint next;";
        assert_eq!(normalize(text), "String url = \"http: int next;");
    }

    #[test]
    fn tokens_are_word_character_runs() {
        assert_eq!(
            &*tokenize("int x = 5; // set x"),
            ["int", "x", "5", "set", "x"].map(Token::from)
        );
        assert_eq!(
            &*tokenize(&normalize("int x = 5; // set x")),
            ["int", "x", "5"].map(Token::from)
        );
    }

    #[test]
    fn tokens_keep_case_and_underscores() {
        assert_eq!(
            &*tokenize("MAX_VALUE=getMax(a.b,c_1);"),
            ["MAX_VALUE", "getMax", "a", "b", "c_1"].map(Token::from)
        );
        assert!(tokenize("{}();").is_empty());
    }

    #[test]
    fn words_split_on_any_whitespace() {
        assert_eq!(
            &*words(" public  static\tvoid\nmain(String[] args) "),
            ["public", "static", "void", "main(String[]", "args)"].map(Token::from)
        );
    }
}
