//! Transcript text segmentation.
//!
//! Splits Dutch free text into sentences (tolerating abbreviation
//! periods) and greedily packs sentences into bounded-length chunks for
//! per-chunk oracle calls. A sentence is never split mid-sentence: a
//! single sentence longer than the limit becomes its own oversized chunk.

/// Dutch abbreviations whose periods must not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Dr.", "Prof.", "etc.", "bijv.", "bv.", "nl.", "d.w.z.", "m.b.t.", "t.o.v.", "m.i.",
    "z.s.m.", "a.u.b.", "i.v.m.", "o.a.", "e.d.", "c.q.", "m.a.w.", "n.a.v.", "t.a.v.",
];

/// Placeholder for masked abbreviation periods. A control character so it
/// cannot collide with transcript content.
const MASK: char = '\u{1}';

fn mask_abbreviations(text: &str) -> String {
    let mut masked = text.to_string();
    for abbreviation in ABBREVIATIONS {
        if masked.contains(abbreviation) {
            let replacement = abbreviation.replace('.', &MASK.to_string());
            masked = masked.replace(abbreviation, &replacement);
        }
    }
    masked
}

fn flush_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.replace(MASK, ".").trim().to_string();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    current.clear();
}

/// Split text into sentences on `.` `!` `?` followed (possibly after
/// whitespace) by an uppercase letter. Terminal punctuation stays
/// attached to its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let masked = mask_abbreviations(text);
    let chars: Vec<char> = masked.chars().collect();

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);

        if matches!(ch, '.' | '!' | '?') {
            // Boundary when the next non-whitespace character is uppercase,
            // whether or not whitespace intervenes.
            let mut next = i + 1;
            while next < chars.len() && chars[next].is_whitespace() {
                next += 1;
            }
            if next < chars.len() && chars[next].is_uppercase() {
                flush_sentence(&mut sentences, &mut current);
                i = next;
                continue;
            }
        }

        i += 1;
    }

    flush_sentence(&mut sentences, &mut current);
    sentences
}

/// Normalize transcript text: drop characters outside alphanumerics and
/// common punctuation, collapse whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || "_.,!?;:'\"()-".contains(*c))
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into chunks of at most `max_length` characters while
/// preserving sentence boundaries.
///
/// Chunk length is measured as the cumulative character count of the
/// packed sentences; joining spaces are not counted. Empty input yields
/// no chunks; text without sentence-ending punctuation yields one chunk.
pub fn split_into_segments(text: &str, max_length: usize) -> Vec<String> {
    let sentences = split_sentences(text);

    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_length = 0;

    for sentence in sentences {
        let sentence_length = sentence.chars().count();
        if current_length + sentence_length > max_length && !current.is_empty() {
            segments.push(current.join(" "));
            current_length = sentence_length;
            current = vec![sentence];
        } else {
            current_length += sentence_length;
            current.push(sentence);
        }
    }

    if !current.is_empty() {
        segments.push(current.join(" "));
    }

    segments
}
