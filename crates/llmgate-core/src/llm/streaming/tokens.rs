//! Whitespace-preserving token splitting

/// Split `text` into fragments of leading whitespace plus one word.
///
/// Trailing whitespace is attached to the last fragment, so concatenating the
/// fragments always reproduces `text` exactly. Whitespace-only text is a
/// single fragment and empty text yields none.
pub fn split_tokens(text: &str) -> Vec<&str> {
    let mut cuts = vec![0];
    let mut prev_is_word = false;

    for (index, ch) in text.char_indices() {
        let is_word = !ch.is_whitespace();
        if !is_word && prev_is_word {
            cuts.push(index);
        }
        prev_is_word = is_word;
    }

    if !prev_is_word && cuts.len() > 1 {
        cuts.pop();
    }
    cuts.push(text.len());

    cuts.windows(2)
        .map(|bounds| &text[bounds[0]..bounds[1]])
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
