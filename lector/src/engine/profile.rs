use serde::{Deserialize, Serialize};

/// Named speed/accuracy trade-off for the recognition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineProfileKind {
    Quick,
    Accurate,
}

impl std::str::FromStr for EngineProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "accurate" => Ok(Self::Accurate),
            other => Err(format!("unknown engine profile '{other}'")),
        }
    }
}

impl std::fmt::Display for EngineProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quick => write!(f, "quick"),
            Self::Accurate => write!(f, "accurate"),
        }
    }
}

/// Tunable engine parameters sent with every recognition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineProfile {
    pub min_text_size: u32,
    pub text_threshold: f32,
    pub low_text: f32,
    pub link_threshold: f32,
    pub canvas_size: u32,
    pub mag_ratio: f32,
}

impl EngineProfile {
    /// Light parameters: smaller canvas, no magnification, ignores small
    /// glyphs. Trades accuracy for latency.
    pub fn quick() -> Self {
        Self {
            min_text_size: 20,
            text_threshold: 0.6,
            low_text: 0.3,
            link_threshold: 0.3,
            canvas_size: 1280,
            mag_ratio: 1.0,
        }
    }

    pub fn accurate() -> Self {
        Self {
            min_text_size: 10,
            text_threshold: 0.7,
            low_text: 0.4,
            link_threshold: 0.4,
            canvas_size: 2560,
            mag_ratio: 1.5,
        }
    }

    pub fn for_kind(kind: EngineProfileKind) -> Self {
        match kind {
            EngineProfileKind::Quick => Self::quick(),
            EngineProfileKind::Accurate => Self::accurate(),
        }
    }
}
