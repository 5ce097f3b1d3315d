//! Button polling and edge detection.

use embedded_hal::i2c::I2c;
use thumbmouse_source::SharedTrackball;

/// A digital input read at the button poll cadence.
pub trait ButtonInput: Send {
    /// Whether the button is held right now.
    fn is_pressed(&mut self) -> bool;
}

/// Rising-edge detector.
///
/// The first poll never reports an edge, so a button already held at start
/// does not fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    last: Option<bool>,
}

impl ButtonEdge {
    /// Detector with no history.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Feed one poll. Returns `true` on a released-to-pressed transition.
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = self.last == Some(false) && pressed;
        self.last = Some(pressed);
        edge
    }

    /// Poll `input` and feed the result.
    pub fn poll(&mut self, input: &mut dyn ButtonInput) -> bool {
        self.update(input.is_pressed())
    }
}

/// Simulated button pressed for one poll in every `period`.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicButton {
    period: Option<u32>,
    tick: u32,
}

impl PeriodicButton {
    /// Pressed once every `period` polls, or never.
    pub fn new(period: Option<u32>) -> Self {
        Self {
            period: period.filter(|&p| p > 0),
            tick: 0,
        }
    }
}

impl ButtonInput for PeriodicButton {
    fn is_pressed(&mut self) -> bool {
        self.tick = self.tick.wrapping_add(1);
        self.period.is_some_and(|p| self.tick % p == 0)
    }
}

/// The trackball's push switch, as latched by the last motion read.
#[derive(Debug, Clone)]
pub struct TrackballSwitch<I: I2c>(pub SharedTrackball<I>);

impl<I> ButtonInput for TrackballSwitch<I>
where
    I: I2c + Send,
{
    fn is_pressed(&mut self) -> bool {
        self.0.switch_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_only_on_press() {
        let mut edge = ButtonEdge::new();
        let fired: Vec<bool> = [false, true, true, false, true]
            .into_iter()
            .map(|p| edge.update(p))
            .collect();
        assert_eq!(fired, [false, true, false, false, true]);
    }

    #[test]
    fn test_held_at_start_does_not_fire() {
        let mut edge = ButtonEdge::new();
        assert!(!edge.update(true));
        assert!(!edge.update(true));
        assert!(!edge.update(false));
        assert!(edge.update(true));
    }

    #[test]
    fn test_periodic_button() {
        let mut button = PeriodicButton::new(Some(3));
        let mut edge = ButtonEdge::new();
        let presses = (0..9).filter(|_| edge.poll(&mut button)).count();
        assert_eq!(presses, 3);

        let mut never = PeriodicButton::new(None);
        assert!((0..10).all(|_| !never.is_pressed()));
    }
}
