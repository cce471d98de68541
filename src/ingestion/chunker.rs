//! Fixed-size overlapping character windows.

use crate::ingestion::types::DocumentChunk;

/// Default window length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive windows in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits text into windows of at most `chunk_size` characters where window
/// `i + 1` starts `chunk_size - overlap` characters after window `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Returns `None` unless `0 <= overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Option<Self> {
        (chunk_size > 0 && overlap < chunk_size).then_some(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Window boundaries as `(start, end)` character offsets.
    pub fn boundaries(&self, char_len: usize) -> Vec<(usize, usize)> {
        let mut windows = Vec::new();
        let mut start = 0;
        while start < char_len {
            let end = (start + self.chunk_size).min(char_len);
            windows.push((start, end));
            if end == char_len {
                break;
            }
            start += self.step();
        }
        windows
    }

    /// Cut `text` into chunks tagged with `source_file`.
    ///
    /// Offsets count Unicode scalar values, so multi-byte text never splits
    /// inside a character.
    pub fn split(&self, text: &str, source_file: &str) -> Vec<DocumentChunk> {
        // Byte offset of every char, plus the end of the string.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = offsets.len() - 1;

        self.boundaries(char_len)
            .into_iter()
            .enumerate()
            .map(|(seq, (start, end))| {
                DocumentChunk::new(
                    text[offsets[start]..offsets[end]].to_string(),
                    source_file.to_string(),
                    seq,
                )
            })
            .collect()
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(Chunker::new(100, 100).is_none());
        assert!(Chunker::new(0, 0).is_none());
        assert!(Chunker::new(100, 99).is_some());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(Chunker::default().split("", "empty.txt").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = Chunker::default().split("hello world", "a.txt");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].source_file, "a.txt");
        assert_eq!(chunks[0].sequence_index, 0);
    }

    #[test]
    fn test_default_windows_start_800_apart() {
        let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = Chunker::default().split(&text, "long.txt");

        // Windows: [0,1000) [800,1800) [1600,2500)
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, text[0..1000]);
        assert_eq!(chunks[1].text, text[800..1800]);
        assert_eq!(chunks[2].text, text[1600..2500]);

        // Consecutive windows share exactly 200 characters.
        assert_eq!(chunks[0].text[800..], chunks[1].text[..200]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_sliver() {
        let chunker = Chunker::new(10, 2).unwrap();
        assert_eq!(chunker.boundaries(10), vec![(0, 10)]);
        assert_eq!(chunker.boundaries(18), vec![(0, 10), (8, 18)]);
        assert_eq!(chunker.boundaries(19), vec![(0, 10), (8, 18), (16, 19)]);
    }

    #[test]
    fn test_multibyte_text_split_on_char_boundaries() {
        let chunker = Chunker::new(3, 1).unwrap();
        let chunks = chunker.split("héllo wörld", "utf8.txt");
        assert_eq!(chunks[0].text, "hél");
        assert_eq!(chunks[1].text, "llo");
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 3));
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "lorem ipsum ".repeat(300);
        let chunker = Chunker::default();
        assert_eq!(chunker.split(&text, "x"), chunker.split(&text, "x"));
    }
}
