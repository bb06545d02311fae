//! Keyword table shared by the lexer and the code generator
//!
//! Maps every Tenglish surface form (one or more words) to its keyword role
//! and to the Python text that role renders as. The lexer recognizes surface
//! forms through [`KeywordTable::candidates`], the generator substitutes
//! through [`KeywordTable::render`], so a keyword change touches only
//! [`TENGLISH_KEYWORDS`].

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// The role a keyword plays in the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Conditionals
    If,
    Then,
    ElseIf,
    Else,

    // Functions
    Def,
    Return,

    // Loops
    ForIn,
    ForVar,
    While,
    Break,
    Continue,

    // Logical operators
    And,
    Or,
    Not,

    // Boolean literals
    True,
    False,

    // Output
    Print,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::ElseIf => "else-if",
            Keyword::Else => "else",
            Keyword::Def => "def",
            Keyword::Return => "return",
            Keyword::ForIn => "for-in",
            Keyword::ForVar => "for-var",
            Keyword::While => "while",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Print => "print",
        };
        write!(f, "{}", s)
    }
}

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Surface words, matched in order on one line
    pub words: &'static [&'static str],
    pub keyword: Keyword,
    /// What the keyword becomes in the generated Python
    pub rendering: &'static str,
}

impl KeywordEntry {
    pub const fn new(
        words: &'static [&'static str],
        keyword: Keyword,
        rendering: &'static str,
    ) -> Self {
        Self {
            words,
            keyword,
            rendering,
        }
    }
}

/// The Tenglish keyword set.
///
/// `ki` closes a loop header, so it carries the target's loop keyword; `aite`
/// closes a conditional header and renders as the header terminator.
pub const TENGLISH_KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry::new(&["okavela"], Keyword::If, "if"),
    KeywordEntry::new(&["aite"], Keyword::Then, ":"),
    KeywordEntry::new(&["lekapothe", "okavela"], Keyword::ElseIf, "elif"),
    KeywordEntry::new(&["lekapothe"], Keyword::Else, "else"),
    KeywordEntry::new(&["vidhanam"], Keyword::Def, "def"),
    KeywordEntry::new(&["ivvu"], Keyword::Return, "return"),
    KeywordEntry::new(&["lo"], Keyword::ForIn, "in"),
    KeywordEntry::new(&["ki"], Keyword::ForVar, "for"),
    KeywordEntry::new(&["unnanta", "varaku"], Keyword::While, "while"),
    KeywordEntry::new(&["aagipo"], Keyword::Break, "break"),
    KeywordEntry::new(&["munduku", "vellu"], Keyword::Continue, "continue"),
    KeywordEntry::new(&["mariyu"], Keyword::And, "and"),
    KeywordEntry::new(&["leda"], Keyword::Or, "or"),
    KeywordEntry::new(&["avvakapote"], Keyword::Not, "not"),
    KeywordEntry::new(&["Nijam"], Keyword::True, "True"),
    KeywordEntry::new(&["Abaddam"], Keyword::False, "False"),
    KeywordEntry::new(&["cheppu"], Keyword::Print, "print"),
];

static GLOBAL: LazyLock<KeywordTable> = LazyLock::new(|| KeywordTable::new(TENGLISH_KEYWORDS));

/// Immutable lookup structure built from a slice of [`KeywordEntry`]
#[derive(Debug)]
pub struct KeywordTable {
    entries: &'static [KeywordEntry],
    /// First word -> entries starting with it, longest phrase first
    by_first_word: HashMap<&'static str, Vec<&'static KeywordEntry>>,
    by_keyword: HashMap<Keyword, &'static KeywordEntry>,
}

impl KeywordTable {
    /// Build a table. Each keyword role and each surface form may appear once.
    pub fn new(entries: &'static [KeywordEntry]) -> Self {
        let mut by_first_word: HashMap<&'static str, Vec<&'static KeywordEntry>> = HashMap::new();
        let mut by_keyword = HashMap::new();

        for entry in entries {
            debug_assert!(!entry.words.is_empty(), "keyword entry without words");
            debug_assert!(
                !entries
                    .iter()
                    .any(|other| !std::ptr::eq(other, entry) && other.words == entry.words),
                "duplicate surface form {:?}",
                entry.words
            );

            if let Some(&first) = entry.words.first() {
                by_first_word.entry(first).or_default().push(entry);
            }
            let previous = by_keyword.insert(entry.keyword, entry);
            debug_assert!(previous.is_none(), "keyword {} listed twice", entry.keyword);
        }

        for candidates in by_first_word.values_mut() {
            candidates.sort_by(|a, b| b.words.len().cmp(&a.words.len()));
        }

        Self {
            entries,
            by_first_word,
            by_keyword,
        }
    }

    /// The process-wide Tenglish table, built on first use
    pub fn global() -> &'static KeywordTable {
        &GLOBAL
    }

    pub fn entries(&self) -> &'static [KeywordEntry] {
        self.entries
    }

    /// Entries whose first word is `word`, longest phrase first
    pub fn candidates(&self, word: &str) -> &[&'static KeywordEntry] {
        self.by_first_word
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Python rendering of a keyword role
    pub fn render(&self, keyword: Keyword) -> &'static str {
        self.by_keyword
            .get(&keyword)
            .map(|entry| entry.rendering)
            .unwrap_or("")
    }

    /// Surface form of a keyword role, words joined by a single space
    pub fn surface(&self, keyword: Keyword) -> String {
        self.by_keyword
            .get(&keyword)
            .map(|entry| entry.words.join(" "))
            .unwrap_or_else(|| keyword.to_string())
    }
}
