//! Porter suffix-stripping stemmer, with the widely used extensions
//! (irregular-form pool, short `ies`/`ied` words, `alli`/`fulli`/`logi` rules).
//!
//! Operates on whatever string it is given. Every non-vowel character, spaces included,
//! counts as a consonant, so a multi-word string is only reduced at its tail.

/// Words whose stem cannot be derived by the suffix rules.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("fulli", "ful"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Reduces `word` to its stem. Input is lowercased first; inputs of two characters or
/// fewer come back unchanged apart from case.
pub fn stem(word: &str) -> String {
    let lowered = word.to_lowercase();
    if let Some((_, irregular)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == lowered) {
        return (*irregular).to_string();
    }

    let mut w: Vec<char> = lowered.chars().collect();
    if w.len() <= 2 {
        return lowered;
    }

    w = step1a(w);
    w = step1b(w);
    w = step1c(w);
    w = step2(w);
    w = step3(w);
    w = step4(w);
    w = step5a(w);
    w = step5b(w);
    w.into_iter().collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Letter classes and measure
// ────────────────────────────────────────────────────────────────────────────

/// `true` at each consonant position. `y` is a consonant at the start or after a vowel.
fn consonant_flags(w: &[char]) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(w.len());
    for (i, c) in w.iter().enumerate() {
        let consonant = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !flags[i - 1],
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

/// Number of vowel→consonant transitions, the `m` in `[C](VC)^m[V]`.
fn measure(stem: &[char]) -> usize {
    consonant_flags(stem)
        .windows(2)
        .filter(|pair| !pair[0] && pair[1])
        .count()
}

fn contains_vowel(stem: &[char]) -> bool {
    consonant_flags(stem).iter().any(|c| !c)
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && consonant_flags(w)[n - 1]
}

/// consonant-vowel-consonant ending where the last consonant is not w, x or y.
/// A two-letter vowel-consonant word also qualifies.
fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();
    let f = consonant_flags(w);
    (n >= 3 && f[n - 3] && !f[n - 2] && f[n - 1] && !matches!(w[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !f[0] && f[1])
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let n = suffix.len();
    w.len() >= n && w[w.len() - n..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(w: &[char], suffix_len: usize, replacement: &str) -> Vec<char> {
    let mut out = w[..w.len() - suffix_len].to_vec();
    out.extend(replacement.chars());
    out
}

/// Applies the first rule whose suffix matches. A matching suffix whose condition
/// fails ends the search with the word unchanged.
fn apply_rules(
    w: Vec<char>,
    rules: &[(&str, &str)],
    condition: impl Fn(&str, &[char]) -> bool,
) -> Vec<char> {
    for &(suffix, replacement) in rules {
        if ends_with(&w, suffix) {
            let stem = &w[..w.len() - suffix.len()];
            if condition(suffix, stem) {
                return replace_suffix(&w, suffix.len(), replacement);
            }
            return w;
        }
    }
    w
}

// ────────────────────────────────────────────────────────────────────────────
// Steps
// ────────────────────────────────────────────────────────────────────────────

fn step1a(w: Vec<char>) -> Vec<char> {
    if w.len() == 4 && ends_with(&w, "ies") {
        return replace_suffix(&w, 3, "ie");
    }
    apply_rules(
        w,
        &[("sses", "ss"), ("ies", "i"), ("ss", "ss"), ("s", "")],
        |_, _| true,
    )
}

fn step1b(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "ied") {
        let replacement = if w.len() == 4 { "ie" } else { "i" };
        return replace_suffix(&w, 3, replacement);
    }

    if ends_with(&w, "eed") {
        let stem = &w[..w.len() - 3];
        if measure(stem) > 0 {
            return replace_suffix(&w, 3, "ee");
        }
        return w;
    }

    let stripped = ["ed", "ing"].iter().find_map(|suffix| {
        if ends_with(&w, suffix) {
            let stem = &w[..w.len() - suffix.len()];
            contains_vowel(stem).then(|| stem.to_vec())
        } else {
            None
        }
    });
    let Some(stem) = stripped else {
        return w;
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if ends_with(&stem, suffix) {
            return replace_suffix(&stem, suffix.len(), replacement);
        }
    }

    if ends_double_consonant(&stem) {
        let last = stem[stem.len() - 1];
        if matches!(last, 'l' | 's' | 'z') {
            return stem;
        }
        return stem[..stem.len() - 1].to_vec();
    }

    if measure(&stem) == 1 && ends_cvc(&stem) {
        let mut out = stem;
        out.push('e');
        return out;
    }
    stem
}

fn step1c(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "y") {
        let stem = &w[..w.len() - 1];
        if stem.len() > 1 && consonant_flags(stem)[stem.len() - 1] {
            return replace_suffix(&w, 1, "i");
        }
    }
    w
}

fn step2(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "alli") && measure(&w[..w.len() - 4]) > 0 {
        return step2(replace_suffix(&w, 4, "al"));
    }

    if ends_with(&w, "logi") {
        if measure(&w[..w.len() - 3]) > 0 {
            return replace_suffix(&w, 1, "");
        }
        return w;
    }

    apply_rules(w, STEP2_RULES, |_, stem| measure(stem) > 0)
}

fn step3(w: Vec<char>) -> Vec<char> {
    apply_rules(w, STEP3_RULES, |_, stem| measure(stem) > 0)
}

fn step4(w: Vec<char>) -> Vec<char> {
    let rules: Vec<(&str, &str)> = STEP4_SUFFIXES.iter().map(|s| (*s, "")).collect();
    apply_rules(w, &rules, |suffix, stem| {
        measure(stem) > 1
            && (suffix != "ion" || matches!(stem.last(), Some('s') | Some('t')))
    })
}

fn step5a(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    w
}

fn step5b(w: Vec<char>) -> Vec<char> {
    if ends_with(&w, "ll") && measure(&w[..w.len() - 1]) > 1 {
        return replace_suffix(&w, 1, "");
    }
    w
}
