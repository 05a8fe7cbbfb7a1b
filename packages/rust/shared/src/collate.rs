//! Fixed-locale string ordering.
//!
//! Every sort in agentsdoc (rule file names, rule titles) goes through
//! [`collate`] so output does not depend on the process locale. The ordering
//! follows the `en-US` collation levels:
//!
//! 1. primary: canonical decomposition with accents set aside, case ignored;
//!    whitespace < punctuation and symbols < digits < letters, with ASCII
//!    punctuation in CLDR root order (`_` before `-`)
//! 2. secondary: unaccented before accented
//! 3. tertiary: lowercase before uppercase
//!
//! Raw code points break any remaining tie so distinct strings never compare
//! equal.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Character classes in primary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Whitespace,
    Punctuation,
    Digit,
    Letter,
}

/// ASCII punctuation and symbols in CLDR root order.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// One base character with the marks that decorate it.
struct Element {
    primary: (Class, u32),
    accents: Vec<char>,
    upper: bool,
}

/// Typographic punctuation shares a primary weight with its ASCII form.
fn ascii_equivalent(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
        '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
        '\u{2026}' => '.',
        _ => c,
    }
}

fn primary(c: char) -> (Class, u32) {
    if c.is_whitespace() {
        (Class::Whitespace, c as u32)
    } else if c.is_numeric() {
        (Class::Digit, c.to_digit(10).unwrap_or(c as u32))
    } else if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        (Class::Letter, folded as u32)
    } else {
        let c = ascii_equivalent(c);
        let rank = PUNCTUATION_ORDER
            .find(c)
            .map_or(PUNCTUATION_ORDER.len() as u32 + c as u32, |i| i as u32);
        (Class::Punctuation, rank)
    }
}

fn elements(s: &str) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::new();
    for c in s.nfd() {
        if is_combining_mark(c) {
            if let Some(last) = out.last_mut() {
                last.accents.push(c);
                continue;
            }
        }
        out.push(Element {
            primary: primary(c),
            accents: Vec::new(),
            upper: c.is_uppercase(),
        });
    }
    out
}

/// Compare two strings with the fixed-locale ordering.
pub fn collate(a: &str, b: &str) -> Ordering {
    let (ea, eb) = (elements(a), elements(b));

    ea.iter()
        .map(|e| e.primary)
        .cmp(eb.iter().map(|e| e.primary))
        .then_with(|| ea.iter().map(|e| &e.accents).cmp(eb.iter().map(|e| &e.accents)))
        .then_with(|| ea.iter().map(|e| e.upper).cmp(eb.iter().map(|e| e.upper)))
        .then_with(|| a.cmp(b))
}
