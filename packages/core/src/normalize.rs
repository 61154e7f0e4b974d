// ABOUTME: Answer normalization for duplicate comparison
// ABOUTME: Canonicalizes free-text answers by case, whitespace, and trailing punctuation

/// Trailing punctuation stripped from answers, Latin and Arabic alike.
const TRAILING_PUNCTUATION: [char; 7] = ['?', '.', '!', ':', '،', '؛', '؟'];

/// Canonicalize a free-text answer for comparison.
///
/// Trims, lowercases, collapses internal whitespace runs to a single space,
/// and strips trailing question/terminal punctuation in both supported
/// scripts. Pure function; normalized equality is the only notion of
/// "duplicate" the engine uses.
pub fn normalize_answer(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for lowered in ch.to_lowercase() {
            out.push(lowered);
        }
    }

    while out
        .chars()
        .next_back()
        .is_some_and(|ch| TRAILING_PUNCTUATION.contains(&ch) || ch.is_whitespace())
    {
        out.pop();
    }

    out
}
