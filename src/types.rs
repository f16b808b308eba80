// src/types.rs

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub zones: ZoneConfig,
    pub prediction: PredictionConfig,
    pub alert: AlertConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Height of the vehicle strip as a fraction of frame height
    pub vehicle_box_y_ratio: f64,
    /// Crash zone width as a fraction of frame width
    pub crash_zone_x_ratio: f64,
    /// Crash zone height as a fraction of the vehicle strip height
    pub crash_zone_y_ratio: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            vehicle_box_y_ratio: 0.7,
            crash_zone_x_ratio: 0.5,
            crash_zone_y_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Window of boxes required before an object is evaluated
    pub position_history_frames: usize,
    /// Boxes retained per object (capped at MAX_HISTORY_FRAMES)
    pub history_length: usize,
    /// Minimum summed corner speed in pixels/frame
    pub movement_threshold: f32,
    /// Extrapolation horizon
    pub seconds_to_predict: f32,
    pub critical_objects: Vec<String>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            position_history_frames: 6,
            history_length: 150,
            movement_threshold: 3.0,
            seconds_to_predict: 2.0,
            critical_objects: [
                "person",
                "bicycle",
                "car",
                "motorcycle",
                "bus",
                "train",
                "truck",
                "traffic light",
                "fire hydrant",
                "stop sign",
                "parking meter",
                "bench",
                "cat",
                "dog",
                "horse",
                "sheep",
                "cow",
                "elephant",
                "bear",
                "zebra",
                "giraffe",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub enabled: bool,
    /// Frames to stay silent after an alert fires
    pub cooldown_frames: u64,
    /// Pending events kept on the bus before the oldest is dropped
    pub max_pending: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_frames: 15,
            max_pending: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit a per-object diagnostic breakdown every frame (debug level)
    pub diagnostics: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            diagnostics: false,
        }
    }
}

// ============================================================================
// GEOMETRY VALUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Position after moving `frames` steps along `motion`
    pub fn advanced(&self, motion: MotionVector, frames: f32) -> Point {
        Point::new(self.x + motion.dx * frames, self.y + motion.dy * frames)
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box in pixel space. Coordinates are normalized on
/// construction so `x1 <= x2` and `y1 <= y2` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Smallest box enclosing every point. None for an empty slice.
    pub fn envelope(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        let (x1, y1, x2, y2) = points.iter().fold(init, |(x1, y1, x2, y2), p| {
            (x1.min(p.x), y1.min(p.y), x2.max(p.x), y2.max(p.y))
        });
        Some(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> f32 {
        self.x1
    }
    pub fn y1(&self) -> f32 {
        self.y1
    }
    pub fn x2(&self) -> f32 {
        self.x2
    }
    pub fn y2(&self) -> f32 {
        self.y2
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    pub fn corners(&self) -> CornerSet {
        CornerSet([
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
            Point::new(self.x1, self.y2),
            Point::new(self.x2, self.y2),
        ])
    }

    /// Outline in drawing order: top, right, bottom, left
    pub fn edges(&self) -> [(Point, Point); 4] {
        let tl = Point::new(self.x1, self.y1);
        let tr = Point::new(self.x2, self.y1);
        let br = Point::new(self.x2, self.y2);
        let bl = Point::new(self.x1, self.y2);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// True when `other` lies entirely inside (or on the border of) self
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.x1 <= other.x1 && self.x2 >= other.x2 && self.y1 <= other.y1 && self.y2 >= other.y2
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(b: [f32; 4]) -> Self {
        BoundingBox::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        b.as_array()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::TopLeft => "TL",
            Self::TopRight => "TR",
            Self::BottomLeft => "BL",
            Self::BottomRight => "BR",
        }
    }
}

/// Box side traced by a pair of adjacent corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn corners(&self) -> (Corner, Corner) {
        match self {
            Self::Top => (Corner::TopLeft, Corner::TopRight),
            Self::Right => (Corner::TopRight, Corner::BottomRight),
            Self::Bottom => (Corner::BottomRight, Corner::BottomLeft),
            Self::Left => (Corner::BottomLeft, Corner::TopLeft),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// The four corners of a box, indexed by `Corner`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerSet(pub [Point; 4]);

impl CornerSet {
    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Corner, Point)> + '_ {
        Corner::ALL.into_iter().map(move |c| (c, self[c]))
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(Point::is_finite)
    }
}

impl Index<Corner> for CornerSet {
    type Output = Point;

    fn index(&self, corner: Corner) -> &Point {
        &self.0[corner.index()]
    }
}

/// Average per-frame displacement of a single corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MotionVector {
    pub dx: f32,
    pub dy: f32,
}

impl MotionVector {
    pub const ZERO: MotionVector = MotionVector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// One motion vector per corner, in `Corner::ALL` order
pub type CornerMotion = [MotionVector; 4];

// ============================================================================
// VERDICT
// ============================================================================

/// Machine-readable cause attached to every verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DangerReason {
    InsufficientHistory,
    NotCriticalObject,
    InvalidMotionVectors,
    InsufficientMovement,
    InvalidPredictions,
    VectorHit(Corner),
    SweepThrough(Edge),
    WillContainCrashZone,
    NoDangerDetected,
}

/// Why an object was rejected before the trajectory tests ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    InsufficientHistory,
    UnsupportedClass,
    DegenerateMotion,
    InvalidPrediction,
}

impl DangerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientHistory => "insufficient_history",
            Self::NotCriticalObject => "not_critical_object",
            Self::InvalidMotionVectors => "invalid_motion_vectors",
            Self::InsufficientMovement => "insufficient_movement",
            Self::InvalidPredictions => "invalid_predictions",
            Self::VectorHit(Corner::TopLeft) => "vector_hit_TL_corner",
            Self::VectorHit(Corner::TopRight) => "vector_hit_TR_corner",
            Self::VectorHit(Corner::BottomLeft) => "vector_hit_BL_corner",
            Self::VectorHit(Corner::BottomRight) => "vector_hit_BR_corner",
            Self::SweepThrough(Edge::Top) => "sweep_through_top_edge",
            Self::SweepThrough(Edge::Right) => "sweep_through_right_edge",
            Self::SweepThrough(Edge::Bottom) => "sweep_through_bottom_edge",
            Self::SweepThrough(Edge::Left) => "sweep_through_left_edge",
            Self::WillContainCrashZone => "object_will_contain_crash_zone",
            Self::NoDangerDetected => "no_danger_detected",
        }
    }

    /// None for outcomes of the trajectory tests themselves
    pub fn rejection(&self) -> Option<RejectionKind> {
        match self {
            Self::InsufficientHistory => Some(RejectionKind::InsufficientHistory),
            Self::NotCriticalObject => Some(RejectionKind::UnsupportedClass),
            Self::InvalidMotionVectors | Self::InsufficientMovement => {
                Some(RejectionKind::DegenerateMotion)
            }
            Self::InvalidPredictions => Some(RejectionKind::InvalidPrediction),
            _ => None,
        }
    }
}

impl fmt::Display for DangerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DangerReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub is_dangerous: bool,
    pub reason: DangerReason,
}

impl Verdict {
    pub fn dangerous(reason: DangerReason) -> Self {
        Self {
            is_dangerous: true,
            reason,
        }
    }

    pub fn safe(reason: DangerReason) -> Self {
        Self {
            is_dangerous: false,
            reason,
        }
    }
}
