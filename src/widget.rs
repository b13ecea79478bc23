use x11rb::errors::ReplyError;
use x11rb::protocol::xproto;
use x11rb::xcb_ffi::XCBConnection;

use crate::effect::Effect;
use crate::event::MouseEvent;
use crate::geometrics::Size;

/// The content of a dock window. The window classifies raw X11 events
/// and calls back into one of these typed handlers; every handler
/// returns an [`Effect`] describing what should happen next.
pub trait Widget {
    /// The size the widget wants its window to have.
    fn frame_size(&self) -> Size;

    fn render(
        &self,
        connection: &XCBConnection,
        screen_num: usize,
        window: xproto::Window,
        gc: xproto::Gcontext,
    ) -> Result<(), ReplyError>;

    /// Which event categories the window subscribes to on behalf of
    /// this widget. Override to narrow or extend the subscription.
    fn event_mask(&self) -> xproto::EventMask {
        xproto::EventMask::ENTER_WINDOW
            | xproto::EventMask::LEAVE_WINDOW
            | xproto::EventMask::POINTER_MOTION
            | xproto::EventMask::BUTTON_PRESS
            | xproto::EventMask::BUTTON_RELEASE
            | xproto::EventMask::EXPOSURE
    }

    fn on_mouse_enter(&mut self, _event: &MouseEvent) -> Effect {
        Effect::None
    }

    fn on_mouse_leave(&mut self, _event: &MouseEvent) -> Effect {
        Effect::None
    }

    fn on_mouse_move(&mut self, _event: &MouseEvent) -> Effect {
        Effect::None
    }

    fn on_mouse_down(&mut self, _event: &MouseEvent) -> Effect {
        Effect::None
    }

    fn on_mouse_up(&mut self, _event: &MouseEvent) -> Effect {
        Effect::None
    }
}
