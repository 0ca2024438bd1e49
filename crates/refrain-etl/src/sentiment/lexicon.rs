//! Lexicon sentiment analyzer.
//!
//! A rule-based compound score in the style of VADER: each token found in
//! the lexicon contributes its valence, adjusted by nearby boosters and
//! dampeners, negations, ALL-CAPS emphasis, a "but" contrast and trailing
//! `!`/`?` emphasis. The sum is squashed into `[-1.0, 1.0]`.
//!
//! The lexicon file format is VADER's: one `token<TAB>mean<TAB>...` entry
//! per line; only the first two fields are read.

use std::collections::HashMap;
use std::path::Path;

use refrain_core::model::SentimentScore;

use crate::error::{EnrichError, EnrichResult};
use crate::sentiment::ScoreLyrics;

/// Lexicon shipped with the crate.
const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.txt");

/// Empirically derived increments for booster and dampener words.
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;

/// Increment for an ALL-CAPS term in otherwise mixed-case text.
const C_INCR: f64 = 0.733;

/// Valence multiplier for a negated term.
const N_SCALAR: f64 = -0.74;

/// Normalisation constant approximating the maximum expected sum.
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("awfully", B_INCR),
    ("completely", B_INCR),
    ("considerably", B_INCR),
    ("decidedly", B_INCR),
    ("deeply", B_INCR),
    ("effing", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptionally", B_INCR),
    ("extremely", B_INCR),
    ("fabulously", B_INCR),
    ("flipping", B_INCR),
    ("flippin", B_INCR),
    ("fricking", B_INCR),
    ("frickin", B_INCR),
    ("frigging", B_INCR),
    ("friggin", B_INCR),
    ("fully", B_INCR),
    ("fucking", B_INCR),
    ("greatly", B_INCR),
    ("hella", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("majorly", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("totally", B_INCR),
    ("tremendously", B_INCR),
    ("uber", B_INCR),
    ("unbelievably", B_INCR),
    ("unusually", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("kinda", B_DECR),
    ("kindof", B_DECR),
    ("less", B_DECR),
    ("little", B_DECR),
    ("marginally", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarcely", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
    ("sorta", B_DECR),
    ("sortof", B_DECR),
];

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|&(_, value)| value)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Python-style `isupper`: has cased characters and none are lowercase.
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Strip surrounding punctuation unless that would leave two characters
/// or fewer (which keeps emoticons such as `:)` intact).
fn strip_punctuation(token: &str) -> &str {
    let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
    if stripped.chars().count() <= 2 {
        token
    } else {
        stripped
    }
}

/// Largest valence magnitude a lexicon entry may carry.
const MAX_VALENCE: f64 = 4.0;

/// Parse a VADER-format lexicon, skipping lines that do not carry a
/// finite mean within `[-4.0, 4.0]`.
pub fn parse_lexicon(text: &str) -> HashMap<String, f64> {
    let mut lexicon = HashMap::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let token = fields.next().unwrap_or_default();
        match fields.next().map(str::trim).map(str::parse::<f64>) {
            Some(Ok(mean))
                if !token.is_empty() && mean.is_finite() && mean.abs() <= MAX_VALENCE =>
            {
                lexicon.insert(token.to_string(), mean);
            }
            _ => log::warn!("Skipping malformed lexicon line {}: {:?}", number + 1, line),
        }
    }
    lexicon
}

/// Token view of a text, shared by the scoring rules.
struct Tokens<'a> {
    words: Vec<&'a str>,
    lower: Vec<String>,
    cap_differential: bool,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(strip_punctuation)
            .filter(|word| word.chars().count() > 1)
            .collect();
        let lower = words.iter().map(|word| word.to_lowercase()).collect();
        let caps = words.iter().filter(|word| is_all_caps(word)).count();
        Self {
            cap_differential: caps > 0 && caps < words.len(),
            words,
            lower,
        }
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn emphasised(&self, i: usize) -> bool {
        self.cap_differential && is_all_caps(self.words[i])
    }
}

/// Lexicon-based analyzer producing compound scores.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnalyzer {
    /// Analyzer over the built-in lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(parse_lexicon(BUILTIN_LEXICON))
    }

    pub fn with_lexicon(lexicon: HashMap<String, f64>) -> Self {
        Self { lexicon }
    }

    /// Analyzer over a VADER-format lexicon file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or holds no entries.
    pub fn from_file(path: &Path) -> EnrichResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EnrichError::artifact(path, e))?;
        let lexicon = parse_lexicon(&text);
        if lexicon.is_empty() {
            return Err(EnrichError::artifact(path, "lexicon has no entries"));
        }
        log::info!("Loaded {} lexicon entries from {}", lexicon.len(), path.display());
        Ok(Self::with_lexicon(lexicon))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn valence_of(&self, word: &str) -> Option<f64> {
        self.lexicon.get(word).copied()
    }

    /// Compound score of `text`, in `[-1.0, 1.0]` and rounded to 4 places.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = Tokens::new(text);
        let mut sentiments = Vec::with_capacity(tokens.len());

        for i in 0..tokens.len() {
            let word = tokens.lower[i].as_str();
            if booster(word).is_some()
                || (word == "kind" && tokens.lower.get(i + 1).is_some_and(|next| next == "of"))
            {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence(&tokens, i));
        }

        but_check(&tokens, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence(&self, tokens: &Tokens<'_>, i: usize) -> f64 {
        let lower = &tokens.lower;
        let Some(base) = self.valence_of(&lower[i]) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before another sentiment word acts as a negation
        // rather than carrying its own valence.
        if lower[i] == "no"
            && lower
                .get(i + 1)
                .is_some_and(|next| self.valence_of(next).is_some())
        {
            valence = 0.0;
        }
        if (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if tokens.emphasised(i) {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = i - (start + 1);
            if self.valence_of(&lower[prev]).is_some() {
                continue;
            }
            let mut scalar = scalar_inc_dec(tokens, prev, valence);
            if start == 1 {
                scalar *= 0.95;
            } else if start == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, lower, start, i);
        }

        self.least_check(valence, lower, i)
    }

    /// "least" before a term flips it, except in "at least" / "very least".
    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        if i == 0 || lower[i - 1] != "least" || self.valence_of(&lower[i - 1]).is_some() {
            return valence;
        }
        if i > 1 && matches!(lower[i - 2].as_str(), "at" | "very") {
            valence
        } else {
            valence * N_SCALAR
        }
    }
}

impl ScoreLyrics for LexiconAnalyzer {
    fn score(&self, lyrics: &str) -> SentimentScore {
        SentimentScore::Compound(self.compound(lyrics))
    }
}

/// Booster or dampener contribution of the word at `prev`, signed to
/// follow the valence it modifies.
fn scalar_inc_dec(tokens: &Tokens<'_>, prev: usize, valence: f64) -> f64 {
    let Some(mut scalar) = booster(&tokens.lower[prev]) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if tokens.emphasised(prev) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn negation_check(valence: f64, lower: &[String], start: usize, i: usize) -> f64 {
    let so_or_this = |word: &str| matches!(word, "so" | "this");
    match start {
        0 if is_negation(&lower[i - 1]) => valence * N_SCALAR,
        1 if lower[i - 2] == "never" && so_or_this(&lower[i - 1]) => valence * 1.25,
        1 if lower[i - 2] == "without" && lower[i - 1] == "doubt" => valence,
        1 if is_negation(&lower[i - 2]) => valence * N_SCALAR,
        2 if lower[i - 3] == "never"
            && (so_or_this(&lower[i - 2]) || so_or_this(&lower[i - 1])) =>
        {
            valence * 1.25
        }
        2 if lower[i - 3] == "without" && (lower[i - 2] == "doubt" || lower[i - 1] == "doubt") => {
            valence
        }
        2 if is_negation(&lower[i - 3]) => valence * N_SCALAR,
        _ => valence,
    }
}

/// Sentiment before the first "but" is halved, after it boosted by half.
fn but_check(tokens: &Tokens<'_>, sentiments: &mut [f64]) {
    let Some(but) = tokens.lower.iter().position(|word| word == "but") else {
        return;
    };
    for (index, sentiment) in sentiments.iter_mut().enumerate() {
        if index < but {
            *sentiment *= 0.5;
        } else if index > but {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations as f64 * 0.292 + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> f64 {
    if sentiments.is_empty() {
        return 0.0;
    }
    let mut sum: f64 = sentiments.iter().sum();
    let emphasis = punctuation_emphasis(text);
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    (normalize(sum) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> LexiconAnalyzer {
        LexiconAnalyzer::new()
    }

    #[test]
    fn test_builtin_lexicon_loads() {
        let analyzer = analyzer();
        assert!(analyzer.len() > 100);
        assert!(analyzer.valence_of("love").unwrap() > 0.0);
        assert!(analyzer.valence_of("hate").unwrap() < 0.0);
    }

    #[test]
    fn test_positive_and_negative() {
        let analyzer = analyzer();
        assert!(analyzer.compound("I love this song") > 0.5);
        assert!(analyzer.compound("I hate this, it hurts") < -0.5);
    }

    #[test]
    fn test_empty_and_neutral_text() {
        let analyzer = analyzer();
        assert_eq!(analyzer.compound(""), 0.0);
        assert_eq!(analyzer.compound("   \n\t "), 0.0);
        assert_eq!(analyzer.compound("the car is on the road"), 0.0);
        assert_eq!(analyzer.score(""), SentimentScore::Compound(0.0));
    }

    #[test]
    fn test_negation_flips_sign() {
        let analyzer = analyzer();
        assert!(analyzer.compound("I am happy") > 0.0);
        assert!(analyzer.compound("I am not happy") < 0.0);
        assert!(analyzer.compound("I don't love you") < 0.0);
    }

    #[test]
    fn test_booster_intensifies() {
        let analyzer = analyzer();
        let plain = analyzer.compound("this is good");
        let boosted = analyzer.compound("this is very good");
        let dampened = analyzer.compound("this is barely good");
        assert!(boosted > plain);
        assert!(dampened < plain);
    }

    #[test]
    fn test_caps_emphasis() {
        let analyzer = analyzer();
        assert!(analyzer.compound("this is GOOD today") > analyzer.compound("this is good today"));
        // All-caps text carries no differential.
        assert_eq!(analyzer.compound("GOOD"), analyzer.compound("good"));
    }

    #[test]
    fn test_exclamation_emphasis() {
        let analyzer = analyzer();
        assert!(analyzer.compound("good!!!") > analyzer.compound("good"));
        assert!(analyzer.compound("bad!!!") < analyzer.compound("bad"));
        // Capped at four.
        assert_eq!(analyzer.compound("good!!!!"), analyzer.compound("good!!!!!!!!"));
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        let analyzer = analyzer();
        assert!(analyzer.compound("the verse is good but the chorus is terrible") < 0.0);
        assert!(analyzer.compound("the verse is terrible but the chorus is good") > 0.0);
    }

    #[test]
    fn test_least_check() {
        let analyzer = analyzer();
        assert!(analyzer.compound("the least happy day") < 0.0);
        assert!(analyzer.compound("at least happy") > 0.0);
    }

    #[test]
    fn test_kind_of_is_neutral() {
        let analyzer = analyzer();
        assert_eq!(analyzer.compound("kind of"), 0.0);
    }

    #[test]
    fn test_emoticons_survive_punctuation_stripping() {
        let analyzer = analyzer();
        assert!(analyzer.compound(":)") > 0.0);
        assert!(analyzer.compound(":(") < 0.0);
    }

    #[test]
    fn test_compound_is_bounded() {
        let analyzer = analyzer();
        let samples = [
            "LOVE LOVE LOVE love love love wonderful amazing best happy joy!!!!",
            "hate kill die dead pain hurt cry lonely HATE worst!!!! ????",
            "a",
            "no no no no",
            "never so happy, never this sad",
            "?!?!?!?!",
            "Ünïcödé wörds ñot in lexicon",
        ];
        for text in samples {
            let score = analyzer.compound(text);
            assert!((-1.0..=1.0).contains(&score), "{text:?} scored {score}");
        }
    }

    #[test]
    fn test_rounded_to_four_places() {
        let score = analyzer().compound("I love this song");
        assert_eq!((score * 10_000.0).round() / 10_000.0, score);
    }

    #[test]
    fn test_parse_lexicon_skips_malformed_lines() {
        let lexicon =
            parse_lexicon("good\t1.9\t0.9\t[2, 2]\n# comment\nbroken\n\nbad\t-2.5\t0.6\n");
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon["bad"], -2.5);
    }

    #[test]
    fn test_parse_lexicon_rejects_out_of_range_means() {
        let lexicon = parse_lexicon(
            "huge\t1e200\nwild\tinf\nvoid\tNaN\nlow\t-4.5\nfine\t3.9\nedge\t-4.0\n",
        );
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains_key("fine"));
        assert!(lexicon.contains_key("edge"));

        let analyzer = LexiconAnalyzer::with_lexicon(lexicon);
        for text in ["huge stuff", "wild stuff", "void stuff", "fine fine fine!!!!", "edge"] {
            let score = analyzer.compound(text);
            assert!((-1.0..=1.0).contains(&score), "{text:?} scored {score}");
        }
        assert!(analyzer.compound("fine stuff") > 0.0);
    }

    #[test]
    fn test_from_file_with_only_invalid_means_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.txt");
        std::fs::write(&path, "huge\t1e200\nwild\tinf\n").unwrap();
        assert!(LexiconAnalyzer::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lexicon.txt");
        std::fs::write(&path, "groovy\t2.4\t0.5\n").unwrap();
        let analyzer = LexiconAnalyzer::from_file(&path).unwrap();
        assert_eq!(analyzer.len(), 1);
        assert!(analyzer.compound("so groovy") > 0.0);
    }

    #[test]
    fn test_from_file_empty_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "\n").unwrap();
        assert!(LexiconAnalyzer::from_file(&path).is_err());
    }
}
