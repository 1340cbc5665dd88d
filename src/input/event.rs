/// Pixels of wheel travel treated as one scroll notch.
const PIXELS_PER_NOTCH: f32 = 100.0;

/// Platform-agnostic pointer events.
///
/// Native windows and the browser canvas both translate their pointer
/// events into these before handing them to
/// [`Engine::handle_input`](crate::engine::Engine::handle_input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute position in surface pixels.
    CursorMoved {
        /// Horizontal position.
        x: f32,
        /// Vertical position (down is positive).
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel, in notches (positive = towards the target).
    Scroll {
        /// Scroll amount.
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

impl InputEvent {
    /// Scroll event from a pixel-precise wheel delta (trackpads, DOM
    /// `WheelEvent.deltaY`). Browsers report scrolling away from the user
    /// as positive, so the sign is flipped.
    #[must_use]
    pub fn scroll_pixels(delta_y: f64) -> Self {
        Self::Scroll {
            delta: -(delta_y as f32) / PIXELS_PER_NOTCH,
        }
    }

    /// Cursor event from DOM `MouseEvent.offsetX/Y`. The canvas backing
    /// store is sized in CSS pixels, so offsets are used as-is.
    #[must_use]
    pub fn canvas_cursor(offset_x: i32, offset_y: i32) -> Self {
        Self::CursorMoved {
            x: offset_x as f32,
            y: offset_y as f32,
        }
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button: rotate.
    Left,
    /// Secondary (right) mouse button: pan.
    Right,
    /// Middle mouse button (wheel click): pan.
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index. Back/forward buttons have no
    /// orbit action.
    #[must_use]
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    /// Map a winit button. Back, forward and extra buttons map to `None`.
    #[cfg(feature = "viewer")]
    #[must_use]
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(Self::Left),
            winit::event::MouseButton::Right => Some(Self::Right),
            winit::event::MouseButton::Middle => Some(Self::Middle),
            winit::event::MouseButton::Back
            | winit::event::MouseButton::Forward
            | winit::event::MouseButton::Other(_) => None,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseScrollDelta> for InputEvent {
    fn from(delta: winit::event::MouseScrollDelta) -> Self {
        match delta {
            winit::event::MouseScrollDelta::LineDelta(_, y) => {
                Self::Scroll { delta: y }
            }
            // winit already reports "up" as positive for pixel deltas
            winit::event::MouseScrollDelta::PixelDelta(pos) => Self::Scroll {
                delta: pos.y as f32 / PIXELS_PER_NOTCH,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_buttons_map_to_orbit_buttons() {
        assert_eq!(MouseButton::from_dom(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom(1), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_dom(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_dom(3), None);
    }

    #[cfg(feature = "viewer")]
    #[test]
    fn winit_side_buttons_are_ignored() {
        use winit::event::MouseButton as Winit;
        assert_eq!(MouseButton::from_winit(Winit::Left), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_winit(Winit::Middle), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_winit(Winit::Back), None);
        assert_eq!(MouseButton::from_winit(Winit::Forward), None);
        assert_eq!(MouseButton::from_winit(Winit::Other(8)), None);
    }

    #[test]
    fn canvas_offsets_are_surface_pixels() {
        assert_eq!(
            InputEvent::canvas_cursor(320, 240),
            InputEvent::CursorMoved { x: 320.0, y: 240.0 }
        );
    }

    #[test]
    fn dom_wheel_down_zooms_out() {
        assert_eq!(
            InputEvent::scroll_pixels(100.0),
            InputEvent::Scroll { delta: -1.0 }
        );
    }
}
