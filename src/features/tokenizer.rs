// Word tokenizer: lowercase, replace filter characters with the separator,
// split, drop empties.
//
// The output feeds the hashing trick, so any change here changes the feature
// space and forces a retrain.

/// Punctuation, tab and newline. Every one of these becomes a separator.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Default word separator.
pub const DEFAULT_SPLIT: char = ' ';

/// How raw text is cut into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Characters replaced by `split` before splitting.
    pub filters: String,
    /// Fold to lowercase first.
    pub lower: bool,
    pub split: char,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            filters: DEFAULT_FILTERS.to_string(),
            lower: true,
            split: DEFAULT_SPLIT,
        }
    }
}

/// Split `text` into non-empty tokens, in left-to-right order.
///
/// Lowercasing uses Unicode's locale-independent mapping. The filter
/// translation is a single pass over the (possibly lowercased) text, so a
/// filter character produced by lowercasing is still translated, but the
/// translated output is never scanned again.
pub fn tokenize(text: &str, options: &TokenizerOptions) -> Vec<String> {
    let lowered;
    let source = if options.lower {
        lowered = text.to_lowercase();
        lowered.as_str()
    } else {
        text
    };

    let translated: String = source
        .chars()
        .map(|c| {
            if options.filters.contains(c) {
                options.split
            } else {
                c
            }
        })
        .collect();

    translated
        .split(options.split)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize with the default filters, lowercasing and a space separator.
pub fn text_to_word_sequence(text: &str) -> Vec<String> {
    tokenize(text, &TokenizerOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world() {
        assert_eq!(text_to_word_sequence("Hello, World!!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(text_to_word_sequence("").is_empty());
    }

    #[test]
    fn test_only_filtered_characters() {
        assert!(text_to_word_sequence("!!! ... \t\n ???").is_empty());
    }

    #[test]
    fn test_tabs_and_newlines_split() {
        assert_eq!(
            text_to_word_sequence("win\ta\nprize"),
            vec!["win", "a", "prize"]
        );
    }

    #[test]
    fn test_apostrophe_is_kept() {
        // ' is not in the default filter set
        assert_eq!(text_to_word_sequence("Don't stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn test_no_lowercasing() {
        let options = TokenizerOptions {
            lower: false,
            ..TokenizerOptions::default()
        };
        assert_eq!(tokenize("Free ENTRY", &options), vec!["Free", "ENTRY"]);
    }

    #[test]
    fn test_custom_separator() {
        let options = TokenizerOptions {
            filters: ",".to_string(),
            lower: true,
            split: '|',
        };
        assert_eq!(tokenize("A,b|C d", &options), vec!["a", "b", "c d"]);
    }

    #[test]
    fn test_unicode_lowercase() {
        assert_eq!(text_to_word_sequence("ÜBER Straße"), vec!["über", "straße"]);
    }

    #[test]
    fn test_tokenizing_joined_tokens_is_fixed_point() {
        let first = text_to_word_sequence("URGENT! You've WON a £1000 prize... call 09061701461.");
        let second = text_to_word_sequence(&first.join(" "));
        assert_eq!(first, second);
    }
}
