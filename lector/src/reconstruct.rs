//! Spatial text reconstruction.
//!
//! The recognition engine returns detections in arbitrary order. This
//! module rebuilds natural reading order: detections are grouped into
//! visual lines top-to-bottom, ordered left-to-right within each line,
//! filtered by confidence, and joined into the output text.
//!
//! The algorithm is fully deterministic for a fixed input set and
//! threshold: both sort keys use `f32::total_cmp` and the grouping always
//! compares against the first detection admitted to the current line, so
//! membership does not depend on input order within a tolerance band.

use crate::models::{Detection, DocumentDetection, DocumentResult, DocumentStats};

pub struct Reconstructor {
    line_threshold: f32,
    min_confidence: f32,
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

impl Reconstructor {
    pub fn new(line_threshold: f32, min_confidence: f32) -> Self {
        Self {
            line_threshold,
            min_confidence,
        }
    }

    /// Rebuild a document from an unordered set of detections.
    pub fn reconstruct(&self, detections: &[Detection]) -> DocumentResult {
        if detections.is_empty() {
            return DocumentResult::empty();
        }

        let lines = self.group_into_lines(detections);

        let mut output_lines: Vec<String> = Vec::new();
        let mut emitted: Vec<DocumentDetection> = Vec::new();

        for line in &lines {
            let mut line_texts: Vec<&str> = Vec::new();
            for det in line {
                // Filtering is per-detection: one low-confidence member
                // never drops the rest of its line.
                if det.confidence >= self.min_confidence {
                    line_texts.push(&det.text);
                    emitted.push(DocumentDetection {
                        text: det.text.clone(),
                        confidence: round1(det.confidence * 100.0),
                        polygon: det.display_polygon(),
                    });
                }
            }
            if !line_texts.is_empty() {
                output_lines.push(line_texts.join(" "));
            }
        }

        let text = output_lines.join("\n");
        let stats = compute_stats(&text, output_lines.len(), &emitted);

        DocumentResult {
            text,
            detections: emitted,
            stats,
        }
    }

    /// Sort by `top_y` and greedily group into lines. A detection joins
    /// the current line while its `top_y` is within `line_threshold` of
    /// the line's first member; each line is then ordered by `center_x`.
    fn group_into_lines<'a>(&self, detections: &'a [Detection]) -> Vec<Vec<&'a Detection>> {
        let mut sorted: Vec<&Detection> = detections.iter().collect();
        sorted.sort_by(|a, b| a.top_y().total_cmp(&b.top_y()));

        let mut lines: Vec<Vec<&Detection>> = Vec::new();
        let mut current: Vec<&Detection> = vec![sorted[0]];

        for &det in &sorted[1..] {
            let anchor = current[0].top_y();
            if (det.top_y() - anchor).abs() < self.line_threshold {
                current.push(det);
            } else {
                lines.push(current);
                current = vec![det];
            }
        }
        lines.push(current);

        for line in &mut lines {
            line.sort_by(|a, b| a.center_x().total_cmp(&b.center_x()));
        }

        lines
    }
}

fn compute_stats(text: &str, line_count: usize, emitted: &[DocumentDetection]) -> DocumentStats {
    if emitted.is_empty() {
        return DocumentStats::default();
    }

    let sum: f32 = emitted.iter().map(|d| d.confidence).sum();

    DocumentStats {
        char_count: text.chars().count() as u32,
        word_count: text.split_whitespace().count() as u32,
        line_count: line_count as u32,
        detection_count: emitted.len() as u32,
        avg_confidence: round1(sum / emitted.len() as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use pretty_assertions::assert_eq;

    fn det(x: f32, top_y: f32, text: &str, confidence: f32) -> Detection {
        Detection::new(
            [
                Point { x, y: top_y },
                Point { x: x + 40.0, y: top_y },
                Point {
                    x: x + 40.0,
                    y: top_y + 20.0,
                },
                Point {
                    x,
                    y: top_y + 20.0,
                },
            ],
            text,
            confidence,
        )
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&[]);
        assert_eq!(result.text, "");
        assert!(result.detections.is_empty());
        assert_eq!(result.stats, DocumentStats::default());
    }

    #[test]
    fn groups_against_first_member_of_line() {
        // 100, 104, 108 all lie within 15 of the first member (100);
        // 140 starts a new line.
        let detections = vec![
            det(0.0, 100.0, "a", 0.9),
            det(50.0, 104.0, "b", 0.9),
            det(100.0, 108.0, "c", 0.9),
            det(0.0, 140.0, "d", 0.9),
        ];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "a b c\nd");
        assert_eq!(result.stats.line_count, 2);
    }

    #[test]
    fn orders_within_line_by_center_x_regardless_of_input_order() {
        let detections = vec![
            det(200.0, 102.0, "right", 0.9),
            det(0.0, 100.0, "left", 0.9),
            det(100.0, 104.0, "middle", 0.9),
        ];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "left middle right");
    }

    #[test]
    fn output_is_deterministic_across_invocations() {
        let detections = vec![
            det(30.0, 10.0, "one", 0.8),
            det(10.0, 12.0, "two", 0.7),
            det(90.0, 11.0, "three", 0.6),
            det(5.0, 60.0, "four", 0.95),
        ];
        let reconstructor = Reconstructor::new(15.0, 0.3);
        let first = reconstructor.reconstruct(&detections);
        for _ in 0..10 {
            assert_eq!(reconstructor.reconstruct(&detections), first);
        }
    }

    #[test]
    fn filters_per_detection_not_per_line() {
        let detections = vec![
            det(0.0, 100.0, "keep", 0.9),
            det(50.0, 102.0, "drop", 0.1),
            det(100.0, 104.0, "also", 0.8),
        ];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "keep also");
        assert_eq!(result.stats.detection_count, 2);
    }

    #[test]
    fn fully_filtered_line_contributes_no_blank_line() {
        let detections = vec![
            det(0.0, 100.0, "first", 0.9),
            det(0.0, 140.0, "noise", 0.05),
            det(0.0, 180.0, "last", 0.9),
        ];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "first\nlast");
        assert_eq!(result.stats.line_count, 2);
    }

    #[test]
    fn all_detections_filtered_yields_empty_text_and_zero_stats() {
        let detections = vec![det(0.0, 10.0, "a", 0.1), det(0.0, 40.0, "b", 0.1)];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "");
        assert_eq!(result.stats.detection_count, 0);
        assert_eq!(result.stats.avg_confidence, 0.0);
    }

    #[test]
    fn raising_min_confidence_never_increases_detection_count() {
        let detections = vec![
            det(0.0, 10.0, "a", 0.2),
            det(50.0, 12.0, "b", 0.5),
            det(100.0, 14.0, "c", 0.7),
            det(0.0, 50.0, "d", 0.95),
        ];
        let mut previous = usize::MAX;
        for threshold in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let count = Reconstructor::new(15.0, threshold)
                .reconstruct(&detections)
                .detections
                .len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn boundary_detection_at_exact_threshold_starts_new_line() {
        // The membership test is strict (< threshold), so a gap of
        // exactly 15 opens a new line.
        let detections = vec![det(0.0, 100.0, "a", 0.9), det(0.0, 115.0, "b", 0.9)];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "a\nb");
    }

    #[test]
    fn confidence_at_exact_min_is_emitted() {
        let detections = vec![det(0.0, 10.0, "edge", 0.3)];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "edge");
    }

    #[test]
    fn stats_reflect_reading_order_text() {
        let detections = vec![
            det(0.0, 10.0, "hello", 0.9),
            det(60.0, 12.0, "world", 0.7),
            det(0.0, 50.0, "bye", 0.8),
        ];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.text, "hello world\nbye");
        assert_eq!(result.stats.char_count, 15);
        assert_eq!(result.stats.word_count, 3);
        assert_eq!(result.stats.line_count, 2);
        assert_eq!(result.stats.detection_count, 3);
        assert_eq!(result.stats.avg_confidence, 80.0);
    }

    #[test]
    fn detection_confidence_is_percent_rounded_to_one_decimal() {
        let detections = vec![det(0.0, 10.0, "w", 0.8765)];
        let result = Reconstructor::new(15.0, 0.3).reconstruct(&detections);
        assert_eq!(result.detections[0].confidence, 87.7);
    }
}
