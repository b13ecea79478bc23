use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};
use x11rb::protocol::xproto;

use crate::geometrics::PhysicalPoint;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

impl MouseButton {
    pub fn from_detail(detail: xproto::Button) -> Option<Self> {
        match detail {
            1 => Some(Self::Left),
            2 => Some(Self::Middle),
            3 => Some(Self::Right),
            8 => Some(Self::X1),
            9 => Some(Self::X2),
            _ => None,
        }
    }
}

/// Keyboard and pointer state carried alongside every mouse event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_: bool,
    pub button1: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
        alt: false,
        super_: false,
        button1: false,
    };

    pub const CONTROL: Self = Self {
        control: true,
        shift: false,
        alt: false,
        super_: false,
        button1: false,
    };

    pub const SHIFT: Self = Self {
        control: false,
        shift: true,
        alt: false,
        super_: false,
        button1: false,
    };

    pub const ALT: Self = Self {
        control: false,
        shift: false,
        alt: true,
        super_: false,
        button1: false,
    };

    pub const SUPER: Self = Self {
        control: false,
        shift: false,
        alt: false,
        super_: true,
        button1: false,
    };

    pub const BUTTON1: Self = Self {
        control: false,
        shift: false,
        alt: false,
        super_: false,
        button1: true,
    };
}

impl From<u16> for Modifiers {
    fn from(state: u16) -> Self {
        let mut modifiers = Modifiers::NONE;
        if (state & u16::from(xproto::KeyButMask::CONTROL)) != 0 {
            modifiers |= Modifiers::CONTROL;
        }
        if (state & u16::from(xproto::KeyButMask::SHIFT)) != 0 {
            modifiers |= Modifiers::SHIFT;
        }
        if (state & u16::from(xproto::KeyButMask::MOD1)) != 0 {
            modifiers |= Modifiers::ALT;
        }
        if (state & u16::from(xproto::KeyButMask::MOD4)) != 0 {
            modifiers |= Modifiers::SUPER;
        }
        if (state & u16::from(xproto::KeyButMask::BUTTON1)) != 0 {
            modifiers |= Modifiers::BUTTON1;
        }
        modifiers
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::NONE
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            control: self.control || rhs.control,
            shift: self.shift || rhs.shift,
            alt: self.alt || rhs.alt,
            super_: self.super_ || rhs.super_,
            button1: self.button1 || rhs.button1,
        }
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// A pointer event stripped down to what widgets care about. The raw
/// X11 structures never cross the widget boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub position: PhysicalPoint,
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

impl From<&xproto::ButtonPressEvent> for MouseEvent {
    fn from(event: &xproto::ButtonPressEvent) -> Self {
        Self {
            position: PhysicalPoint {
                x: event.event_x as i32,
                y: event.event_y as i32,
            },
            button: MouseButton::from_detail(event.detail),
            modifiers: Modifiers::from(event.state),
        }
    }
}

impl From<&xproto::MotionNotifyEvent> for MouseEvent {
    fn from(event: &xproto::MotionNotifyEvent) -> Self {
        Self {
            position: PhysicalPoint {
                x: event.event_x as i32,
                y: event.event_y as i32,
            },
            button: None,
            modifiers: Modifiers::from(event.state),
        }
    }
}

impl From<&xproto::EnterNotifyEvent> for MouseEvent {
    fn from(event: &xproto::EnterNotifyEvent) -> Self {
        Self {
            position: PhysicalPoint {
                x: event.event_x as i32,
                y: event.event_y as i32,
            },
            button: None,
            modifiers: Modifiers::from(event.state),
        }
    }
}
