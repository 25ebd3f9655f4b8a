//! Diacritic stripping for the empty-result fallback.
//!
//! Canonical decomposition (NFD) followed by removal of the combining
//! diacritical marks, so `"Nuvilù"` becomes `"Nuvilu"`. What remains is
//! recomposed (NFC) so scripts whose syllables decompose without marks
//! (Hangul) survive unchanged. No locale rules beyond Unicode.
//!
//! Only marks from the combining diacritical blocks are removed. Those are
//! the accents of Latin, Greek and Cyrillic text; the retry is meant for
//! them. Script-internal marks such as Indic vowel signs and viramas, or
//! Arabic and Hebrew points, are kept, since dropping them changes the word
//! rather than its accents.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip combining marks after canonical decomposition.
///
/// # Examples
///
/// ```
/// use nominis_search::orchestrator::diacritics::strip_diacritics;
///
/// assert_eq!(strip_diacritics("Nuvilù"), "Nuvilu");
/// assert_eq!(strip_diacritics("Acme"), "Acme");
/// ```
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_diacritic(*c)).nfc().collect()
}

/// A combining mark from one of the diacritical mark blocks.
fn is_diacritic(c: char) -> bool {
    is_combining_mark(c)
        && matches!(
            c,
            '\u{0300}'..='\u{036F}'
                | '\u{1AB0}'..='\u{1AFF}'
                | '\u{1DC0}'..='\u{1DFF}'
                | '\u{20D0}'..='\u{20FF}'
                | '\u{FE20}'..='\u{FE2F}'
        )
}

/// The stripped form of `text`, or `None` when stripping changes nothing.
///
/// Compares against the NFC form so an input that differs only in
/// composition is not treated as changed.
pub fn stripped_variant(text: &str) -> Option<String> {
    let stripped = strip_diacritics(text);
    let composed: String = text.nfc().collect();
    (stripped != composed).then_some(stripped)
}
