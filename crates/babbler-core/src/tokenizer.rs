//! Whitespace tokenizer for plain-text command lines.

use babbler_types::config::DEFAULT_MAX_TOKENS;

/// Split `input` on runs of whitespace into at most `max_tokens` slices.
///
/// The input is borrowed, not modified. Tokens past the cap are dropped.
/// An empty or blank line yields no tokens, which callers treat as "no
/// command given".
pub fn tokenize(input: &str, max_tokens: usize) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(max_tokens.min(DEFAULT_MAX_TOKENS));
    for word in input.split_whitespace() {
        if tokens.len() == max_tokens {
            log::debug!(
                "token limit {max_tokens} reached, dropping '{word}' and the rest of the line"
            );
            break;
        }
        tokens.push(word);
    }
    tokens
}

/// [`tokenize`] with the default cap of 20 tokens.
pub fn tokenize_default(input: &str) -> Vec<&str> {
    tokenize(input, DEFAULT_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple() {
        assert_eq!(tokenize_default("led on 5"), vec!["led", "on", "5"]);
    }

    #[test]
    fn tokenize_empty() {
        assert!(tokenize_default("").is_empty());
    }

    #[test]
    fn tokenize_only_spaces() {
        assert!(tokenize_default("   \t  ").is_empty());
    }

    #[test]
    fn multiple_spaces_between_args() {
        assert_eq!(tokenize_default("echo   hello    world"), vec![
            "echo", "hello", "world"
        ]);
    }

    #[test]
    fn leading_trailing_whitespace() {
        assert_eq!(tokenize_default("  ping  "), vec!["ping"]);
    }

    #[test]
    fn tab_and_newline_separated() {
        assert_eq!(tokenize_default("a\tb\r\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn cap_drops_excess() {
        assert_eq!(tokenize("a b c d e", 3), vec!["a", "b", "c"]);
    }

    #[test]
    fn cap_of_zero_yields_nothing() {
        assert!(tokenize("a b", 0).is_empty());
    }

    #[test]
    fn default_cap_is_twenty() {
        let line = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let tokens = tokenize_default(&line);
        assert_eq!(tokens.len(), 20);
        assert_eq!(tokens[19], "19");
    }

    #[test]
    fn unicode_tokens() {
        assert_eq!(tokenize_default("имя  значение"), vec!["имя", "значение"]);
    }

    #[test]
    fn quotes_are_not_special() {
        assert_eq!(tokenize_default("say \"hi there\""), vec![
            "say", "\"hi", "there\""
        ]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_exceeds_cap(line in "[a-z \t]{0,80}", cap in 0usize..8) {
                prop_assert!(tokenize(&line, cap).len() <= cap);
            }

            #[test]
            fn tokens_have_no_whitespace(line in "[a-z \t\n]{0,80}") {
                for tok in tokenize_default(&line) {
                    prop_assert!(!tok.is_empty());
                    prop_assert!(!tok.chars().any(char::is_whitespace));
                }
            }

            #[test]
            fn rejoining_matches_split(words in proptest::collection::vec("[a-z]{1,6}", 0..10)) {
                let line = words.join("  ");
                let tokens = tokenize_default(&line);
                prop_assert_eq!(tokens, words.iter().map(String::as_str).collect::<Vec<_>>());
            }
        }
    }
}
