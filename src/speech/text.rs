// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text chunking for the TTS backend
//!
//! The backend rejects long inputs, so text is cut into pieces of at most
//! `MAX_CHUNK_CHARS` characters: first at punctuation, then at whitespace,
//! and as a last resort in the middle of a word.

/// Longest text accepted per TTS request (in characters)
pub const MAX_CHUNK_CHARS: usize = 100;

/// Characters that end a spoken phrase
const DELIMITERS: &[char] = &[
    '.', ',', '?', '!', ';', ':', '\n', '…', '。', '，', '、', '？', '！', '；', '：',
];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into chunks no longer than `max_chars`
///
/// Short text is returned whole. Whitespace between chunks is dropped;
/// everything else is preserved in order.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for phrase in split_phrases(text) {
        for part in minimize(phrase, max_chars) {
            let part_len = char_len(&part);
            let joined_len = if current.is_empty() {
                part_len
            } else {
                current_len + 1 + part_len
            };

            if joined_len <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&part);
                current_len = joined_len;
            } else {
                chunks.push(std::mem::take(&mut current));
                current = part;
                current_len = part_len;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split after each delimiter, keeping the delimiter with its phrase
fn split_phrases(text: &str) -> Vec<&str> {
    let mut phrases = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if DELIMITERS.contains(&c) {
            let end = i + c.len_utf8();
            phrases.push(text[start..end].trim());
            start = end;
        }
    }
    if start < text.len() {
        phrases.push(text[start..].trim());
    }

    phrases.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Cut one phrase into pieces of at most `max_chars`
fn minimize(phrase: &str, max_chars: usize) -> Vec<String> {
    if char_len(phrase) <= max_chars {
        return vec![phrase.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in phrase.split_whitespace() {
        let word_len = char_len(word);

        if word_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let joined_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if joined_len <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = joined_len;
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
