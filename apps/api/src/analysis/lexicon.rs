//! Lexicon: the linguistic model behind keyword matching.
//!
//! Tokenizer, stop-word table and a deterministic rule-based lemmatizer.
//! Built once at startup, then shared read-only (`Arc<Lexicon>` in `AppState`).
//!
//! Lemmatization order for a lowercase token:
//! 1. irregular table (`led` → `lead`, `analyses` → `analysis`)
//! 2. invariant words and non-alphabetic tokens (`c++`, `node.js`, `2024`) pass through
//! 3. suffix rules: `-ing`, `-ed`, `-s` with consonant undoubling, `i → y`
//!    and silent-`e` restoration (`managed` → `manage`, `planned` → `plan`)

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::analysis::stop_words::STOP_WORDS;
use crate::models::report::KeywordSet;

/// Letters/digits, optionally joined by inner `'` or `.`, with trailing `+`/`#`
/// so `c++`, `c#` and `node.js` stay whole. Hyphens split words.
const TOKEN_PATTERN: &str = r"[\p{L}\p{N}]+(?:['.][\p{L}\p{N}]+)*[+#]*";

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    // verbs
    ("led", "lead"),
    ("built", "build"),
    ("rebuilt", "rebuild"),
    ("wrote", "write"),
    ("written", "write"),
    ("writing", "write"),
    ("ran", "run"),
    ("began", "begin"),
    ("begun", "begin"),
    ("taught", "teach"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("sought", "seek"),
    ("thought", "think"),
    ("won", "win"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("held", "hold"),
    ("met", "meet"),
    ("kept", "keep"),
    ("left", "leave"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("took", "take"),
    ("taken", "take"),
    ("knew", "know"),
    ("known", "know"),
    ("saw", "see"),
    ("seen", "see"),
    ("went", "go"),
    ("gone", "go"),
    ("going", "go"),
    ("goes", "go"),
    ("said", "say"),
    ("told", "tell"),
    ("sold", "sell"),
    ("sent", "send"),
    ("spent", "spend"),
    ("felt", "feel"),
    ("paid", "pay"),
    ("understood", "understand"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("undertook", "undertake"),
    ("uses", "use"),
    ("created", "create"),
    ("creating", "create"),
    ("added", "add"),
    ("adding", "add"),
    ("controlled", "control"),
    ("controlling", "control"),
    ("modelled", "model"),
    ("modelling", "model"),
    ("travelled", "travel"),
    ("labelled", "label"),
    ("cancelled", "cancel"),
    ("excelled", "excel"),
    ("promoted", "promote"),
    ("promoting", "promote"),
    ("agreed", "agree"),
    ("guaranteed", "guarantee"),
    ("freed", "free"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    // nouns
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("analyses", "analysis"),
    ("criteria", "criterion"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("caches", "cache"),
];

/// Words whose surface form already is the lemma although a suffix rule would fire.
const INVARIANT_WORDS: &[&str] = &[
    "kubernetes", "series", "species", "news", "alias", "canvas", "atlas", "bias", "lens",
    "chaos", "jenkins", "pandas", "windows", "macos", "physics", "mathematics", "economics",
    "ethics", "aws", "engineering", "marketing", "accounting", "banking", "consulting",
    "manufacturing", "morning", "evening", "wedding", "embed", "speed", "bed", "red", "shed",
    "data",
];

/// Vowel–consonant stem endings that lost a silent `e` before `-ed`/`-ing`
/// (`comput|ed`, `defin|ed`, `shar|ed`). Only applied after a consonant.
const SILENT_E_ENDINGS: &[&str] = &[
    "ut", "ud", "od", "id", "ib", "in", "im", "um", "am", "om", "ok", "ak", "ik", "ap", "al",
    "il", "ul", "ar", "ur", "ir", "os", "is", "as",
];

/// Extensions read from `LEXICON_PATH`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LexiconOverrides {
    pub stop_words: Vec<String>,
    pub lemmas: HashMap<String, String>,
    pub invariant: Vec<String>,
}

pub struct Lexicon {
    stop_words: HashSet<String>,
    lemmas: HashMap<String, String>,
    invariant: HashSet<String>,
    token_pattern: Regex,
}

impl Lexicon {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            lemmas: IRREGULAR_LEMMAS
                .iter()
                .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
                .collect(),
            invariant: INVARIANT_WORDS.iter().map(|w| w.to_string()).collect(),
            token_pattern: Regex::new(TOKEN_PATTERN).context("Invalid token pattern")?,
        })
    }

    /// Built-in tables, extended by the JSON file at `path` when one is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let lexicon = Self::builtin()?;
        let Some(path) = path else {
            info!(
                stop_words = lexicon.stop_words.len(),
                lemmas = lexicon.lemmas.len(),
                "Loaded built-in lexicon"
            );
            return Ok(lexicon);
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file '{}'", path.display()))?;
        let overrides: LexiconOverrides = serde_json::from_str(&raw)
            .with_context(|| format!("Lexicon file '{}' is not valid JSON", path.display()))?;
        let lexicon = lexicon.with_overrides(overrides);

        info!(
            path = %path.display(),
            stop_words = lexicon.stop_words.len(),
            lemmas = lexicon.lemmas.len(),
            "Loaded lexicon with overrides"
        );
        Ok(lexicon)
    }

    pub fn with_overrides(mut self, overrides: LexiconOverrides) -> Self {
        self.stop_words
            .extend(overrides.stop_words.iter().map(|w| w.trim().to_lowercase()));
        self.lemmas.extend(
            overrides
                .lemmas
                .iter()
                .map(|(form, lemma)| (form.trim().to_lowercase(), lemma.trim().to_lowercase())),
        );
        self.invariant
            .extend(overrides.invariant.iter().map(|w| w.trim().to_lowercase()));
        self
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Lowercased tokens in source order. Curly apostrophes are folded and a
    /// possessive `'s` is dropped; punctuation never yields a token.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let folded = text.replace('\u{2019}', "'");
        self.token_pattern
            .find_iter(&folded)
            .map(|m| {
                let token = m.as_str().to_lowercase();
                match token.strip_suffix("'s") {
                    Some(base) if !base.is_empty() => base.to_string(),
                    _ => token,
                }
            })
            .collect()
    }

    /// `{ lemma(token) : token not a stop word }`.
    pub fn keywords(&self, text: &str) -> KeywordSet {
        self.tokens(text)
            .into_iter()
            .filter(|token| !self.is_stop_word(token))
            .map(|token| self.lemma(&token))
            .collect()
    }

    /// Base form of a lowercase token.
    pub fn lemma(&self, token: &str) -> String {
        if let Some(lemma) = self.lemmas.get(token) {
            return lemma.clone();
        }
        if self.invariant.contains(token) || !token.bytes().all(|b| b.is_ascii_lowercase()) {
            return token.to_string();
        }

        if let Some(stem) = token.strip_suffix("ing") {
            if stem.len() >= 2 && has_vowel(stem) {
                return restore_verb_stem(stem);
            }
            return token.to_string();
        }

        if token.ends_with("eed") {
            return token.to_string();
        }
        if let Some(stem) = token.strip_suffix("ied") {
            if token.len() > 4 {
                return format!("{stem}y");
            }
            return token.to_string();
        }
        if let Some(stem) = token.strip_suffix("ed") {
            if stem.len() >= 3 && has_vowel(stem) {
                return restore_verb_stem(stem);
            }
            return token.to_string();
        }

        if token.ends_with('s') && token.len() >= 4 {
            return singularize(token);
        }

        token.to_string()
    }
}

fn singularize(token: &str) -> String {
    if token.ends_with("ss") || token.ends_with("us") || (token.ends_with("is") && token.len() >= 5)
    {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if token.len() > 4 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    token[..token.len() - 1].to_string()
}

/// Undoes the spelling changes English makes before `-ed`/`-ing`.
fn restore_verb_stem(stem: &str) -> String {
    let b = stem.as_bytes();
    let n = b.len();
    if n >= 2
        && b[n - 1] == b[n - 2]
        && !is_vowel_at(b, n - 1)
        && !matches!(b[n - 1], b'l' | b's' | b'f' | b'z')
    {
        return stem[..n - 1].to_string();
    }
    if needs_silent_e(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn needs_silent_e(stem: &str) -> bool {
    let b = stem.as_bytes();
    let n = b.len();
    if n < 2 {
        return false;
    }

    match b[n - 1] {
        b'v' | b'c' | b'z' | b'u' => return true,
        // manag|ed, merg|ed, judg|ed, chang|ed; but belong|ed
        b'g' => {
            return b[n - 2] != b'n' || (n >= 3 && matches!(b[n - 3], b'a' | b'e'));
        }
        _ => {}
    }

    if ["eas", "aus", "ns", "rs", "ps"]
        .iter()
        .any(|ending| stem.ends_with(ending))
    {
        return true;
    }

    if n >= 3 && !is_vowel_at(b, n - 1) && is_vowel_at(b, n - 2) {
        let pair = &stem[n - 2..];
        let consonant_before = !is_vowel_at(b, n - 3);
        if pair == "at" {
            // automat|ed, negotiat|ed, evaluat|ed; but treat|ed
            return consonant_before || matches!(b[n - 3], b'i' | b'u');
        }
        return consonant_before && SILENT_E_ENDINGS.contains(&pair);
    }

    false
}

/// `u` after `q` acts as a consonant (`requir|ed`).
fn is_vowel_at(b: &[u8], i: usize) -> bool {
    match b[i] {
        b'u' => !(i > 0 && b[i - 1] == b'q'),
        b'a' | b'e' | b'i' | b'o' => true,
        _ => false,
    }
}

fn has_vowel(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y'))
}
