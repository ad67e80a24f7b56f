//! Prefix completion of the identifier being typed.
//!
//! The suggester never touches the runtime. It looks at the trailing
//! identifier of the buffer, finds the first table entry it is a proper
//! case-insensitive prefix of, and adapts that entry to the casing the user
//! is typing in.

mod table;

use serde::Serialize;

pub use table::PYTHON_SYMBOLS;

/// Characters that separate identifiers.
const DELIMITERS: &[char] = &[
    '(', ')', '{', '}', '[', ']', '.', ',', ':', ';', '=', '+', '-', '*', '/',
];

/// What kind of symbol a completion is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A language keyword.
    Keyword,
    /// A builtin function.
    Function,
    /// A builtin class or exception.
    Class,
    /// A builtin constant.
    Constant,
    /// An importable module.
    Module,
}

/// One entry of the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionEntry {
    /// The symbol as written in source.
    pub symbol: &'static str,
    /// What kind of symbol it is.
    pub category: Category,
}

/// A proposed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The full, case-adapted symbol.
    pub text: String,
    /// The category of the matched entry.
    pub category: Category,
    typed_chars: usize,
}

impl Suggestion {
    /// The part of the suggestion beyond what has been typed, shown inline
    /// as ghost text.
    ///
    /// Measured in characters, since case adaptation can change the byte
    /// length of the typed prefix.
    #[must_use]
    pub fn ghost(&self) -> &str {
        self.text
            .char_indices()
            .nth(self.typed_chars)
            .map_or("", |(start, _)| &self.text[start..])
    }
}

/// Proposes completions from a static symbol table.
#[derive(Debug, Clone, Copy)]
pub struct Suggester {
    table: &'static [CompletionEntry],
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(PYTHON_SYMBOLS)
    }
}

impl Suggester {
    /// Create a suggester over `table`, matched in order.
    #[must_use]
    pub const fn new(table: &'static [CompletionEntry]) -> Self {
        Self { table }
    }

    /// The full suggestion for `buffer`, or an empty string.
    #[must_use]
    pub fn suggest(&self, buffer: &str) -> String {
        self.suggest_entry(buffer)
            .map(|suggestion| suggestion.text)
            .unwrap_or_default()
    }

    /// The suggestion for `buffer` with its category and ghost text.
    #[must_use]
    pub fn suggest_entry(&self, buffer: &str) -> Option<Suggestion> {
        let word = active_identifier(buffer)?;
        let lowered = word.to_lowercase();

        let entry = self.table.iter().find(|entry| {
            let symbol = entry.symbol.to_lowercase();
            symbol.starts_with(&lowered) && symbol != lowered
        })?;

        Some(Suggestion {
            text: match_case(word, entry.symbol),
            category: entry.category,
            typed_chars: word.chars().count(),
        })
    }
}

/// The identifier being typed at the end of `buffer`, if one is in progress.
fn active_identifier(buffer: &str) -> Option<&str> {
    if buffer.is_empty() || buffer.ends_with(char::is_whitespace) {
        return None;
    }
    buffer
        .rsplit(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
        .next()
        .filter(|word| !word.is_empty())
}

/// Adapt `symbol` to the casing pattern of `typed`.
fn match_case(typed: &str, symbol: &str) -> String {
    if typed.to_uppercase() == typed {
        return symbol.to_uppercase();
    }
    if typed.to_lowercase() == typed {
        return symbol.to_lowercase();
    }

    let mut typed_chars = typed.chars();
    let capitalized = typed_chars.next().is_some_and(char::is_uppercase)
        && typed_chars.as_str().to_lowercase() == typed_chars.as_str();
    if capitalized {
        let mut symbol_chars = symbol.chars();
        if let Some(first) = symbol_chars.next() {
            return first
                .to_uppercase()
                .chain(symbol_chars.as_str().to_lowercase().chars())
                .collect();
        }
    }

    symbol.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_adaptation() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest("pri"), "print");
        assert_eq!(suggester.suggest("PRI"), "PRINT");
        assert_eq!(suggester.suggest("Pri"), "Print");
        assert_eq!(suggester.suggest("pRi"), "print");
    }

    #[test]
    fn test_mixed_case_returns_symbol_unmodified() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest("zeroD"), "ZeroDivisionError");
        assert_eq!(suggester.suggest("vaLue"), "ValueError");
    }

    #[test]
    fn test_exact_match_excluded() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest("print"), "");
        assert_eq!(suggester.suggest("PRINT"), "");
        assert_eq!(suggester.suggest("x = print"), "");
    }

    #[test]
    fn test_exact_match_skips_to_longer_symbol() {
        // "in" is a keyword, so the next entry it prefixes wins.
        assert_eq!(Suggester::default().suggest("in"), "input");
    }

    #[test]
    fn test_requires_identifier_in_progress() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest(""), "");
        assert_eq!(suggester.suggest("pri "), "");
        assert_eq!(suggester.suggest("pri\n"), "");
        assert_eq!(suggester.suggest("print("), "");
        assert_eq!(suggester.suggest("qqq"), "");
    }

    #[test]
    fn test_trailing_token_after_delimiters() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest("x = le"), "len");
        assert_eq!(suggester.suggest("foo(ran"), "range");
        assert_eq!(suggester.suggest("np.arr+nu"), "numpy");
        assert_eq!(suggester.suggest("for i in enum"), "enumerate");
    }

    #[test]
    fn test_table_order_decides() {
        let suggester = Suggester::default();
        let suggestion = suggester.suggest_entry("pr").unwrap();
        assert_eq!(suggestion.text, "print");
        assert_eq!(suggestion.category, Category::Function);
    }

    #[test]
    fn test_ghost_text() {
        let suggester = Suggester::default();
        assert_eq!(suggester.suggest_entry("x = Pri").unwrap().ghost(), "nt");
        assert_eq!(suggester.suggest_entry("imp").unwrap().ghost(), "ort");
    }

    #[test]
    fn test_ghost_counts_characters_not_bytes() {
        static TABLE: &[CompletionEntry] = &[CompletionEntry {
            symbol: "KeyError",
            category: Category::Class,
        }];
        let suggester = Suggester::new(TABLE);

        // The Kelvin sign lower-cases to an ASCII `k` but takes three bytes.
        let suggestion = suggester.suggest_entry("\u{212A}ey").unwrap();
        assert_eq!(suggestion.text, "Keyerror");
        assert_eq!(suggestion.ghost(), "error");
    }

    #[test]
    fn test_custom_table() {
        static TABLE: &[CompletionEntry] = &[CompletionEntry {
            symbol: "plot",
            category: Category::Function,
        }];
        let suggester = Suggester::new(TABLE);
        assert_eq!(suggester.suggest("pl"), "plot");
        assert_eq!(suggester.suggest("pri"), "");
    }
}
