//! Observers receiving dispatched gestures.

use crate::gestures::GestureEvent;
use touch_protocol::TouchPoint;

/// Receives gesture events with the touch points of their frame.
///
/// Every method defaults to doing nothing, so an observer only implements
/// the gestures it cares about. [`handle`](Self::handle) routes an event to
/// its method; override it instead to see every event in one place.
///
/// Any `FnMut(GestureEvent, &[TouchPoint])` closure is an observer.
pub trait GestureObserver {
    fn on_one_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_one_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_two_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_two_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_three_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_three_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_four_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_four_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_five_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_five_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_six_touch(&mut self, _touches: &[TouchPoint]) {}
    fn on_six_drag(&mut self, _touches: &[TouchPoint]) {}
    fn on_zoom(&mut self, _touches: &[TouchPoint]) {}
    fn on_translate_x(&mut self, _touches: &[TouchPoint]) {}
    fn on_translate_y(&mut self, _touches: &[TouchPoint]) {}
    fn on_translate_z(&mut self, _touches: &[TouchPoint]) {}
    fn on_rotate_x(&mut self, _touches: &[TouchPoint]) {}
    fn on_rotate_y(&mut self, _touches: &[TouchPoint]) {}
    fn on_rotate_z(&mut self, _touches: &[TouchPoint]) {}
    fn on_release(&mut self, _touches: &[TouchPoint]) {}

    /// Route `event` to its method.
    fn handle(&mut self, event: GestureEvent, touches: &[TouchPoint]) {
        match event {
            GestureEvent::OneTouch => self.on_one_touch(touches),
            GestureEvent::OneDrag => self.on_one_drag(touches),
            GestureEvent::TwoTouch => self.on_two_touch(touches),
            GestureEvent::TwoDrag => self.on_two_drag(touches),
            GestureEvent::ThreeTouch => self.on_three_touch(touches),
            GestureEvent::ThreeDrag => self.on_three_drag(touches),
            GestureEvent::FourTouch => self.on_four_touch(touches),
            GestureEvent::FourDrag => self.on_four_drag(touches),
            GestureEvent::FiveTouch => self.on_five_touch(touches),
            GestureEvent::FiveDrag => self.on_five_drag(touches),
            GestureEvent::SixTouch => self.on_six_touch(touches),
            GestureEvent::SixDrag => self.on_six_drag(touches),
            GestureEvent::Zoom => self.on_zoom(touches),
            GestureEvent::TranslateX => self.on_translate_x(touches),
            GestureEvent::TranslateY => self.on_translate_y(touches),
            GestureEvent::TranslateZ => self.on_translate_z(touches),
            GestureEvent::RotateX => self.on_rotate_x(touches),
            GestureEvent::RotateY => self.on_rotate_y(touches),
            GestureEvent::RotateZ => self.on_rotate_z(touches),
            GestureEvent::Release => self.on_release(touches),
        }
    }
}

impl<F> GestureObserver for F
where
    F: FnMut(GestureEvent, &[TouchPoint]),
{
    fn handle(&mut self, event: GestureEvent, touches: &[TouchPoint]) {
        self(event, touches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct ZoomCounter {
        zooms: usize,
        touches_seen: usize,
    }

    impl GestureObserver for ZoomCounter {
        fn on_zoom(&mut self, touches: &[TouchPoint]) {
            self.zooms += 1;
            self.touches_seen += touches.len();
        }
    }

    #[test]
    fn test_handle_routes_to_method() {
        let mut counter = ZoomCounter::default();
        let touches = [TouchPoint::default(); 2];
        for event in GestureEvent::ALL {
            counter.handle(event, &touches);
        }
        assert_eq!(counter.zooms, 1);
        assert_eq!(counter.touches_seen, 2);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |event: GestureEvent, touches: &[TouchPoint]| {
                seen.push((event, touches.len()));
            };
            observer.handle(GestureEvent::TranslateX, &[TouchPoint::default()]);
            observer.handle(GestureEvent::Release, &[]);
        }
        assert_eq!(
            seen,
            vec![(GestureEvent::TranslateX, 1), (GestureEvent::Release, 0)]
        );
    }
}
