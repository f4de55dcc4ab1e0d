use super::Chunker;
use crate::models::ChunkSpan;
use semdex_config::{ChunkingConfig, ConfigError, Validate};

/// Sliding line window chunker.
///
/// Window `i` covers lines `[i, min(i + max_lines, n))`; the next window
/// starts `overlap_lines` before the previous end. Chunks whose text is
/// blank after trimming are dropped, and the remaining text is trimmed.
/// Line numbers in the output are 1-indexed and inclusive.
#[derive(Debug, Clone, Copy)]
pub struct LineChunker {
    config: ChunkingConfig,
}

impl LineChunker {
    /// Rejects `overlap_lines >= max_lines` up front, so chunking never stalls.
    pub fn new(config: ChunkingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }
}

impl Default for LineChunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

impl Chunker for LineChunker {
    fn chunk(&self, content: &str) -> Vec<ChunkSpan> {
        let lines: Vec<&str> = content.lines().collect();
        let n = lines.len();
        let max_lines = self.config.max_lines;
        let overlap = self.config.overlap_lines;

        let mut spans = Vec::new();
        let mut i = 0;
        while i < n {
            let start = i;
            let end = (i + max_lines).min(n);

            let text = lines[start..end].join("\n");
            let text = text.trim();
            if !text.is_empty() {
                spans.push(ChunkSpan {
                    start_line: start + 1,
                    end_line: end,
                    text: text.to_string(),
                });
            }

            if end == n {
                break;
            }
            i = end - overlap;
            if i <= start {
                i = end;
            }
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    fn ranges(spans: &[ChunkSpan]) -> Vec<(usize, usize)> {
        spans.iter().map(|s| (s.start_line, s.end_line)).collect()
    }

    #[test]
    fn test_95_lines_default_config() {
        let spans = LineChunker::default().chunk(&numbered(95));
        assert_eq!(ranges(&spans), vec![(1, 80), (71, 95)]);
        assert!(spans[1].text.starts_with("line 71"));
        assert!(spans[1].text.ends_with("line 95"));
    }

    #[test]
    fn test_short_file_is_single_chunk() {
        let spans = LineChunker::default().chunk(&numbered(12));
        assert_eq!(ranges(&spans), vec![(1, 12)]);
    }

    #[test]
    fn test_exact_window_is_single_chunk() {
        let spans = LineChunker::default().chunk(&numbered(80));
        assert_eq!(ranges(&spans), vec![(1, 80)]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        let chunker = LineChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\n\t\n").is_empty());
    }

    #[test]
    fn test_blank_window_is_dropped() {
        let chunker = LineChunker::new(ChunkingConfig {
            max_lines: 3,
            overlap_lines: 0,
        })
        .unwrap();
        let content = "a\nb\nc\n\n\n\nd";
        let spans = chunker.chunk(content);
        assert_eq!(ranges(&spans), vec![(1, 3), (7, 7)]);
    }

    #[test]
    fn test_chunk_text_is_trimmed() {
        let spans = LineChunker::default().chunk("\n\n  fn main() {}\n\n");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "fn main() {}");
        assert_eq!((spans[0].start_line, spans[0].end_line), (1, 4));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = LineChunker::new(ChunkingConfig {
            max_lines: 10,
            overlap_lines: 12,
        });
        assert!(err.is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn windows_cover_all_lines_with_exact_overlap(n in 1usize..600) {
            let spans = LineChunker::default().chunk(&numbered(n));
            prop_assert!(!spans.is_empty());
            prop_assert_eq!(spans[0].start_line, 1);
            prop_assert_eq!(spans.last().unwrap().end_line, n);
            for pair in spans.windows(2) {
                // no gaps, and exactly 10 shared lines between neighbours
                prop_assert_eq!(pair[0].end_line - pair[1].start_line + 1, 10);
                prop_assert!(pair[1].start_line > pair[0].start_line);
            }
        }

        #[test]
        fn any_valid_config_terminates(
            n in 0usize..300,
            max_lines in 1usize..50,
            overlap_seed in 0usize..50,
        ) {
            let overlap_lines = overlap_seed % max_lines;
            let chunker = LineChunker::new(ChunkingConfig { max_lines, overlap_lines }).unwrap();
            let spans = chunker.chunk(&numbered(n));
            for span in &spans {
                prop_assert!(span.start_line <= span.end_line);
                prop_assert!(span.end_line - span.start_line < max_lines);
            }
        }
    }
}
