//! Gesture vocabulary and the name-to-event table.
//!
//! The touch server names each gesture in its datagrams. Those names are
//! mapped to a closed set of [`GestureEvent`] identifiers through a
//! [`GestureTable`], built once and handed to the dispatcher.

use std::collections::HashMap;
use std::fmt;

/// Gesture events that can be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GestureEvent {
    OneTouch,
    OneDrag,
    TwoTouch,
    TwoDrag,
    ThreeTouch,
    ThreeDrag,
    FourTouch,
    FourDrag,
    FiveTouch,
    FiveDrag,
    SixTouch,
    SixDrag,
    Zoom,
    TranslateX,
    TranslateY,
    TranslateZ,
    RotateX,
    RotateY,
    RotateZ,
    /// All fingers lifted; ends the current gesture.
    Release,
}

impl GestureEvent {
    /// Every event, in identifier order.
    pub const ALL: [GestureEvent; 20] = [
        GestureEvent::OneTouch,
        GestureEvent::OneDrag,
        GestureEvent::TwoTouch,
        GestureEvent::TwoDrag,
        GestureEvent::ThreeTouch,
        GestureEvent::ThreeDrag,
        GestureEvent::FourTouch,
        GestureEvent::FourDrag,
        GestureEvent::FiveTouch,
        GestureEvent::FiveDrag,
        GestureEvent::SixTouch,
        GestureEvent::SixDrag,
        GestureEvent::Zoom,
        GestureEvent::TranslateX,
        GestureEvent::TranslateY,
        GestureEvent::TranslateZ,
        GestureEvent::RotateX,
        GestureEvent::RotateY,
        GestureEvent::RotateZ,
        GestureEvent::Release,
    ];

    /// Short label for logs.
    pub fn name(self) -> &'static str {
        match self {
            GestureEvent::OneTouch => "one-touch",
            GestureEvent::OneDrag => "one-drag",
            GestureEvent::TwoTouch => "two-touch",
            GestureEvent::TwoDrag => "two-drag",
            GestureEvent::ThreeTouch => "three-touch",
            GestureEvent::ThreeDrag => "three-drag",
            GestureEvent::FourTouch => "four-touch",
            GestureEvent::FourDrag => "four-drag",
            GestureEvent::FiveTouch => "five-touch",
            GestureEvent::FiveDrag => "five-drag",
            GestureEvent::SixTouch => "six-touch",
            GestureEvent::SixDrag => "six-drag",
            GestureEvent::Zoom => "zoom",
            GestureEvent::TranslateX => "translate-x",
            GestureEvent::TranslateY => "translate-y",
            GestureEvent::TranslateZ => "translate-z",
            GestureEvent::RotateX => "rotate-x",
            GestureEvent::RotateY => "rotate-y",
            GestureEvent::RotateZ => "rotate-z",
            GestureEvent::Release => "release",
        }
    }

    /// Returns true if the camera handler does something for this event.
    ///
    /// Taps, multi-finger drags, translate-Z and release are accepted but
    /// leave the camera alone.
    pub fn has_default_handler(self) -> bool {
        matches!(
            self,
            GestureEvent::OneDrag
                | GestureEvent::Zoom
                | GestureEvent::TranslateX
                | GestureEvent::TranslateY
                | GestureEvent::RotateX
                | GestureEvent::RotateY
                | GestureEvent::RotateZ
        )
    }
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable mapping from wire gesture names to events.
///
/// Names match exactly; there is no case folding or prefix matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureTable {
    entries: HashMap<String, GestureEvent>,
}

impl Default for GestureTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl GestureTable {
    /// The touch server's vocabulary.
    ///
    /// `about_X_axis` maps to [`GestureEvent::RotateY`] just like
    /// `about_Y_axis`, so nothing on the wire reaches rotate-X.
    pub fn standard() -> Self {
        [
            ("one_touch", GestureEvent::OneTouch),
            ("one_drag", GestureEvent::OneDrag),
            ("two_touch", GestureEvent::TwoTouch),
            ("two_drag", GestureEvent::TwoDrag),
            ("three_touch", GestureEvent::ThreeTouch),
            ("three_drag", GestureEvent::ThreeDrag),
            ("four_touch", GestureEvent::FourTouch),
            ("four_drag", GestureEvent::FourDrag),
            ("five_touch", GestureEvent::FiveTouch),
            ("five_drag", GestureEvent::FiveDrag),
            ("six_touch", GestureEvent::SixTouch),
            ("six_drag", GestureEvent::SixDrag),
            ("zoom", GestureEvent::Zoom),
            ("translate_x", GestureEvent::TranslateX),
            ("translate_y", GestureEvent::TranslateY),
            ("translate_z", GestureEvent::TranslateZ),
            ("about_X_axis", GestureEvent::RotateY),
            ("about_Y_axis", GestureEvent::RotateY),
            ("about_Z_axis", GestureEvent::RotateZ),
            ("release", GestureEvent::Release),
        ]
        .into_iter()
        .collect()
    }

    /// Look up the event for a gesture name.
    pub fn lookup(&self, name: &str) -> Option<GestureEvent> {
        self.entries.get(name).copied()
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table maps no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All names mapping to `event`, sorted.
    pub fn names_for(&self, event: GestureEvent) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| **e == event)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<(S, GestureEvent)> for GestureTable {
    fn from_iter<I: IntoIterator<Item = (S, GestureEvent)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, event)| (name.into(), event))
                .collect(),
        }
    }
}

/// Tuning for the camera gesture handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Degrees of rotation per unit of touch direction.
    pub rotate_scale: f64,
    /// Exponent scale applied to the zoom magnitude.
    pub zoom_scale: f64,
    /// Base of the zoom factor; the factor is `zoom_base ^ (magnitude * zoom_scale)`.
    pub zoom_base: f64,
    /// Display pixels of pan per unit of touch direction.
    pub translate_scale: f64,
    /// Recompute the clipping range after rotating or dollying.
    pub auto_adjust_clipping_range: bool,
    /// Move the headlight with the camera.
    pub light_follow_camera: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            rotate_scale: 500.0,
            zoom_scale: 20.0,
            zoom_base: 1.1,
            translate_scale: 1000.0,
            auto_adjust_clipping_range: true,
            light_follow_camera: true,
        }
    }
}
