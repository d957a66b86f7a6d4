/*!
 * Length-bounded text chunking.
 *
 * The translation API accepts a limited number of characters per request.
 * Oversized blocks are cut at sentence boundaries first, then at word
 * boundaries when a single sentence does not fit, and as a last resort in
 * the middle of a word.
 */

/// Characters that end a sentence
const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '।'];

/// Split text into chunks of at most `max_chars` characters
///
/// Text that already fits is returned as a single chunk. Chunks never
/// contain empty or whitespace-only entries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    if char_len(text) <= max_chars {
        return if text.trim().is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let additional = char_len(sentence) + usize::from(!current.is_empty());

        if current_len + additional <= max_chars {
            current.push(sentence);
            current_len += additional;
            continue;
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }

        if char_len(sentence) > max_chars {
            chunks.extend(chunk_words(sentence, max_chars));
        } else {
            current.push(sentence);
            current_len = char_len(sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}

/// Split text after sentence terminators that are followed by whitespace
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let at_boundary = SENTENCE_TERMINATORS.contains(&c)
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = idx + c.len_utf8();
            sentences.push(text[start..end].trim());
            start = end;
        }
    }
    sentences.push(text[start..].trim());

    sentences.retain(|s| !s.is_empty());
    sentences
}

fn chunk_words(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for word in sentence.split_whitespace() {
        let word_len = char_len(word);
        let additional = word_len + usize::from(!current.is_empty());

        if current_len + additional <= max_chars {
            current.push(word);
            current_len += additional;
            continue;
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }

        if word_len > max_chars {
            chunks.extend(split_long_word(word, max_chars));
        } else {
            current.push(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
