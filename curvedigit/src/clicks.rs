// Click capture model
// Left click adds a point, right click removes the last one, middle click finishes

use curvedigit_common::PixelPoint;
use serde::{Deserialize, Serialize};

use crate::transform::Curve;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClickEvent {
    Add { x: f64, y: f64 },
    Undo,
    Finish,
}

/// Accumulates clicks into a curve until finished
#[derive(Debug, Clone, Default)]
pub struct ClickRecorder {
    curve: Curve,
    finished: bool,
}

impl ClickRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Anything after `Finish` is ignored, as is undo on
    /// an empty recorder.
    pub fn apply(&mut self, event: ClickEvent) {
        if self.finished {
            return;
        }
        match event {
            ClickEvent::Add { x, y } => self.curve.push(PixelPoint::new(x, y)),
            ClickEvent::Undo => {
                self.curve.pop();
            }
            ClickEvent::Finish => self.finished = true,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    pub fn finish(self) -> Curve {
        self.curve
    }
}

/// Replay a list of events. A missing trailing `Finish` is fine; the end
/// of the list finishes the curve.
pub fn record(events: &[ClickEvent]) -> Curve {
    let mut recorder = ClickRecorder::new();
    for event in events {
        recorder.apply(*event);
    }
    recorder.finish()
}

/// Replay reference clicks; `None` unless exactly two points remain
pub fn reference_pair(events: &[ClickEvent]) -> Option<(PixelPoint, PixelPoint)> {
    match record(events).points() {
        [a, b] => Some((*a, *b)),
        _ => None,
    }
}
