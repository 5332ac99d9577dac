use serde::{Deserialize, Serialize};

/// One corner of a detection polygon, in pixel coordinates of the buffer
/// that was fed to the recognition engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<[f32; 2]> for Point {
    fn from(xy: [f32; 2]) -> Self {
        Self { x: xy[0], y: xy[1] }
    }
}

/// A single recognized text span as reported by the recognition engine.
///
/// The polygon always has exactly four points and is not required to be
/// axis-aligned. Confidence is engine-reported and never renormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub polygon: [Point; 4],
    pub text: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(polygon: [Point; 4], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Topmost y coordinate of the polygon, the primary line-grouping key.
    pub fn top_y(&self) -> f32 {
        self.polygon.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    /// Horizontal center of the polygon, the in-line ordering key.
    pub fn center_x(&self) -> f32 {
        self.polygon.iter().map(|p| p.x).sum::<f32>() / 4.0
    }

    /// Polygon rounded to integer pixels for display.
    pub fn display_polygon(&self) -> [[i32; 2]; 4] {
        let mut out = [[0i32; 2]; 4];
        for (i, p) in self.polygon.iter().enumerate() {
            out[i] = [p.x.round() as i32, p.y.round() as i32];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(x: f32, y: f32, w: f32, h: f32) -> [Point; 4] {
        [
            Point { x, y },
            Point { x: x + w, y },
            Point { x: x + w, y: y + h },
            Point { x, y: y + h },
        ]
    }

    #[test]
    fn top_y_is_min_y_of_tilted_polygon() {
        let det = Detection::new(
            [
                Point { x: 10.0, y: 22.0 },
                Point { x: 90.0, y: 18.0 },
                Point { x: 92.0, y: 40.0 },
                Point { x: 12.0, y: 44.0 },
            ],
            "tilted",
            0.9,
        );
        assert_eq!(det.top_y(), 18.0);
    }

    #[test]
    fn center_x_is_mean_of_x_coordinates() {
        let det = Detection::new(quad(100.0, 50.0, 20.0, 10.0), "word", 0.8);
        assert_eq!(det.center_x(), 110.0);
    }

    #[test]
    fn display_polygon_rounds_to_integers() {
        let det = Detection::new(quad(10.4, 19.6, 10.0, 10.0), "w", 0.5);
        assert_eq!(det.display_polygon()[0], [10, 20]);
        assert_eq!(det.display_polygon()[2], [20, 30]);
    }
}
