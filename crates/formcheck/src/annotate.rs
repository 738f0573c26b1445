//! Metric overlays for processed frames.

use formcheck_image::{
    draw::{self, FontSize},
    Color, Image, Rect,
};

use crate::exercise::{LimbMetrics, Metrics, DEFAULT_MIN_VISIBILITY};
use crate::info::ExerciseInfo;
use crate::pose::{Pose, Side};

const LEFT: i32 = 40;
const TOP: i32 = 40;
/// Vertical space between two text plates.
const LINE_GAP: i32 = 9;
const PADDING: u32 = 4;
const BAR_WIDTH: u32 = 120;
const BAR_HEIGHT: u32 = 8;

/// Draws exercise metrics onto frames.
///
/// Everything is drawn at fixed positions down the left edge of the frame, each line on its own
/// semi-transparent plate so that it stays legible on any background.
#[derive(Debug, Clone)]
pub struct Annotator {
    pub text: Color,
    pub plate: Color,
    pub warning_plate: Color,
    pub progress: Color,
    pub font: FontSize,
    /// Draw the pose skeleton under the overlay. Skeleton joints below this visibility are
    /// skipped.
    pub skeleton: Option<f32>,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            text: Color::WHITE,
            plate: Color::from_rgb8(14, 29, 118).with_alpha(201),
            warning_plate: Color::from_rgb8(180, 20, 20).with_alpha(220),
            progress: Color::GREEN,
            font: FontSize::Medium,
            skeleton: Some(DEFAULT_MIN_VISIBILITY),
        }
    }
}

impl Annotator {
    pub fn annotate(
        &self,
        frame: &mut Image,
        info: &ExerciseInfo,
        metrics: &Metrics,
        pose: Option<&Pose>,
    ) {
        if let (Some(min_visibility), Some(pose)) = (self.skeleton, pose) {
            pose.draw(frame, min_visibility);
        }

        let mut cursor = Cursor { y: TOP };
        self.line(frame, &mut cursor, &format!("Exercise: {}", info.name), self.plate);
        self.line(frame, &mut cursor, &format!("Reps: {}", info.reps), self.plate);
        self.line(frame, &mut cursor, &format!("Sets: {}", info.sets), self.plate);
        let set = info.current_set(metrics.reps());
        self.line(frame, &mut cursor, &format!("Set {set} of {}", info.sets), self.plate);

        for limb in &metrics.limbs {
            self.line(frame, &mut cursor, &limb_summary(limb), self.plate);
            if let Some(progress) = limb.progress {
                self.progress_bar(frame, &mut cursor, progress);
            }
        }

        for warning in metrics.warnings() {
            self.line(frame, &mut cursor, warning, self.warning_plate);
        }
    }

    fn line(&self, frame: &mut Image, cursor: &mut Cursor, text: &str, plate: Color) {
        draw::text(frame, LEFT, cursor.y, text)
            .align_left()
            .align_top()
            .font(self.font)
            .color(self.text)
            .background(plate, PADDING);
        cursor.y += self.line_spacing();
    }

    fn line_spacing(&self) -> i32 {
        self.font.line_height() as i32 + 2 * PADDING as i32 + LINE_GAP
    }

    fn progress_bar(&self, frame: &mut Image, cursor: &mut Cursor, progress: f32) {
        let y = cursor.y - self.line_spacing() / 2 + PADDING as i32;
        let outline = Rect::from_top_left(LEFT, y, BAR_WIDTH, BAR_HEIGHT);
        draw::rect(frame, outline.grow(1)).color(self.plate).filled();
        let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as u32;
        if filled > 0 {
            draw::rect(frame, Rect::from_top_left(LEFT, y, filled, BAR_HEIGHT))
                .color(self.progress)
                .filled();
        }
        draw::rect(frame, outline).color(self.text);
        cursor.y += BAR_HEIGHT as i32 + PADDING as i32;
    }
}

struct Cursor {
    y: i32,
}

fn limb_summary(limb: &LimbMetrics) -> String {
    let label = match limb.side {
        Some(Side::Left) => "Left",
        Some(Side::Right) => "Right",
        None => "Count",
    };
    let angle = match limb.angle {
        Some(angle) => format!("{angle:.0} deg"),
        None => "-".to_string(),
    };
    format!(
        "{label}: {}  Stage: {}  Angle: {angle}",
        limb.count, limb.stage
    )
}
