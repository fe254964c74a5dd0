// =============================================================================
// Candlestick Classification — latest bar only
// =============================================================================
//
// Geometry:
//   body         = |C - O|
//   upper shadow = H - max(C, O)
//   lower shadow = min(C, O) - L
//   range        = H - L
//
// Rules are evaluated in order; the first match wins.  When none match, the
// label is composed from the body colour plus long-shadow qualifiers (a
// shadow longer than twice the body).
// =============================================================================

use serde::Serialize;

use crate::types::{Bar, CandleColor};

/// Shape of the latest candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum CandlePattern {
    /// High == Low.
    NoRange,
    /// Body under 10% of the range.
    Doji,
    /// Long lower shadow, almost no upper shadow.
    Hammer,
    /// Long upper shadow, almost no lower shadow.
    ShootingStar,
    /// Plain body with optional long-shadow qualifiers.
    Body {
        color: CandleColor,
        long_upper_shadow: bool,
        long_lower_shadow: bool,
    },
}

impl CandlePattern {
    /// Body colour, carried only by the composite `Body` label.  The named
    /// reversal shapes are colour-neutral.
    pub fn body_color(&self) -> Option<CandleColor> {
        match self {
            Self::Body { color, .. } => Some(*color),
            _ => None,
        }
    }
}

impl std::fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRange => write!(f, "Doji/no-range"),
            Self::Doji => write!(f, "Doji (indecision)"),
            Self::Hammer => write!(f, "Hammer/Hanging-man"),
            Self::ShootingStar => write!(f, "Shooting-star/inverted-hammer"),
            Self::Body {
                color,
                long_upper_shadow,
                long_lower_shadow,
            } => {
                write!(f, "{color} candle")?;
                if *long_upper_shadow {
                    write!(f, ", long upper shadow")?;
                }
                if *long_lower_shadow {
                    write!(f, ", long lower shadow")?;
                }
                Ok(())
            }
        }
    }
}

/// Measurements the rules are written against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    pub body: f64,
    pub upper_shadow: f64,
    pub lower_shadow: f64,
    pub range: f64,
    pub color: CandleColor,
}

impl From<&Bar> for CandleGeometry {
    fn from(bar: &Bar) -> Self {
        Self {
            body: bar.body(),
            upper_shadow: bar.upper_shadow(),
            lower_shadow: bar.lower_shadow(),
            range: bar.range(),
            color: bar.color(),
        }
    }
}

impl CandleGeometry {
    fn long_upper(&self) -> bool {
        self.upper_shadow > self.body * 2.0
    }

    fn long_lower(&self) -> bool {
        self.lower_shadow > self.body * 2.0
    }
}

/// One entry of the ordered decision table.
pub struct CandleRule {
    pub name: &'static str,
    pub matches: fn(&CandleGeometry) -> bool,
    pub pattern: CandlePattern,
}

/// Decision table, highest priority first.
pub const CANDLE_RULES: [CandleRule; 4] = [
    CandleRule {
        name: "no-range",
        matches: |g| g.range == 0.0,
        pattern: CandlePattern::NoRange,
    },
    CandleRule {
        name: "doji",
        matches: |g| g.body < g.range * 0.1,
        pattern: CandlePattern::Doji,
    },
    CandleRule {
        name: "hammer",
        matches: |g| g.long_lower() && g.upper_shadow < g.body * 0.5,
        pattern: CandlePattern::Hammer,
    },
    CandleRule {
        name: "shooting-star",
        matches: |g| g.long_upper() && g.lower_shadow < g.body * 0.5,
        pattern: CandlePattern::ShootingStar,
    },
];

/// Classify a candle from its geometry.
pub fn classify(geometry: &CandleGeometry) -> CandlePattern {
    CANDLE_RULES
        .iter()
        .find(|rule| (rule.matches)(geometry))
        .map(|rule| rule.pattern)
        .unwrap_or(CandlePattern::Body {
            color: geometry.color,
            long_upper_shadow: geometry.long_upper(),
            long_lower_shadow: geometry.long_lower(),
        })
}

/// Classify a bar.
pub fn classify_bar(bar: &Bar) -> CandlePattern {
    classify(&CandleGeometry::from(bar))
}
