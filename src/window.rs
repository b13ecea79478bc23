use std::error;
use std::fmt;
use std::rc::Rc;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol;
use x11rb::protocol::render;
use x11rb::protocol::render::ConnectionExt as _;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt as _;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::xcb_ffi::XCBConnection;

use crate::atoms::Atoms;
use crate::config::WindowConfig;
use crate::effect::Effect;
use crate::event::{Modifiers, MouseEvent};
use crate::event_loop::ControlFlow;
use crate::geometrics::{PhysicalPoint, PhysicalRect, PhysicalSize};
use crate::widget::Widget;

/// Color depth of every window we create. Compositing needs the alpha
/// channel, so anything shallower is a hard error.
const DEPTH: u8 = 32;

/// A top-level window backed by an ARGB32 visual. Owns the window, its
/// colormap and a graphics context, and releases all three on drop; the
/// display connection itself is shared and owned by the caller.
pub struct Window<Widget> {
    widget: Widget,
    connection: Rc<XCBConnection>,
    screen_num: usize,
    atoms: Rc<Atoms>,
    window: xproto::Window,
    colormap: xproto::Colormap,
    visual_id: xproto::Visualid,
    gc: xproto::Gcontext,
    position: PhysicalPoint,
    size: PhysicalSize,
    is_mapped: bool,
}

impl<Widget: self::Widget> Window<Widget> {
    pub fn new(
        widget: Widget,
        connection: Rc<XCBConnection>,
        screen_num: usize,
        atoms: Rc<Atoms>,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let visual_id = find_argb32_visual(connection.as_ref(), screen_num)?;
        let screen = &connection.setup().roots[screen_num];
        let root = screen.root;

        let size = widget.frame_size().snap();
        let position = PhysicalPoint {
            x: ((screen.width_in_pixels as i32 - size.width as i32) / 2).max(0),
            y: (screen.height_in_pixels as i32 - size.height as i32).max(0),
        };

        let colormap = connection.generate_id()?;
        connection
            .create_colormap(xproto::ColormapAlloc::NONE, colormap, root, visual_id)?
            .check()?;

        // From here on every acquired resource must be released again
        // if a later request fails.
        match Self::create_window(
            &widget, &connection, screen_num, &atoms, config, visual_id, colormap, position, size,
        ) {
            Ok((window, gc)) => Ok(Self {
                widget,
                connection,
                screen_num,
                atoms,
                window,
                colormap,
                visual_id,
                gc,
                position,
                size,
                is_mapped: false,
            }),
            Err(error) => {
                connection.free_colormap(colormap).ok();
                Err(error)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_window(
        widget: &Widget,
        connection: &Rc<XCBConnection>,
        screen_num: usize,
        atoms: &Atoms,
        config: &WindowConfig,
        visual_id: xproto::Visualid,
        colormap: xproto::Colormap,
        position: PhysicalPoint,
        size: PhysicalSize,
    ) -> Result<(xproto::Window, xproto::Gcontext), WindowError> {
        let screen = &connection.setup().roots[screen_num];

        let window = connection.generate_id()?;
        let event_mask = widget.event_mask() | xproto::EventMask::STRUCTURE_NOTIFY;
        let values = xproto::CreateWindowAux::new()
            .event_mask(event_mask)
            .colormap(colormap)
            .background_pixel(0)
            .border_pixel(0);

        connection
            .create_window(
                DEPTH,
                window,
                screen.root,
                position.x as i16,
                position.y as i16,
                size.width as u16,
                size.height as u16,
                0, // border_width
                xproto::WindowClass::INPUT_OUTPUT,
                visual_id,
                &values,
            )?
            .check()?;

        match Self::initialize_window(connection, window, atoms, config) {
            Ok(gc) => Ok((window, gc)),
            Err(error) => {
                connection.destroy_window(window).ok();
                Err(error)
            }
        }
    }

    fn initialize_window(
        connection: &Rc<XCBConnection>,
        window: xproto::Window,
        atoms: &Atoms,
        config: &WindowConfig,
    ) -> Result<xproto::Gcontext, WindowError> {
        connection
            .change_property32(
                xproto::PropMode::REPLACE,
                window,
                atoms.WM_PROTOCOLS,
                xproto::AtomEnum::ATOM,
                &[atoms.WM_DELETE_WINDOW],
            )?
            .check()?;

        connection
            .change_property8(
                xproto::PropMode::REPLACE,
                window,
                xproto::AtomEnum::WM_NAME,
                xproto::AtomEnum::STRING,
                config.title.as_bytes(),
            )?
            .check()?;

        connection
            .change_property8(
                xproto::PropMode::REPLACE,
                window,
                atoms._NET_WM_NAME,
                atoms.UTF8_STRING,
                config.title.as_bytes(),
            )?
            .check()?;

        {
            let class_string = format!("{}\0{}", config.instance_name, config.class_name);
            connection
                .change_property8(
                    xproto::PropMode::REPLACE,
                    window,
                    xproto::AtomEnum::WM_CLASS,
                    xproto::AtomEnum::STRING,
                    class_string.as_bytes(),
                )?
                .check()?;
        }

        connection
            .change_property32(
                xproto::PropMode::REPLACE,
                window,
                atoms._NET_WM_WINDOW_TYPE,
                xproto::AtomEnum::ATOM,
                &[atoms._NET_WM_WINDOW_TYPE_DOCK],
            )?
            .check()?;

        let gc = connection.generate_id()?;
        match connection
            .create_gc(gc, window, &xproto::CreateGCAux::new())?
            .check()
        {
            Ok(()) => Ok(gc),
            Err(error) => Err(error.into()),
        }
    }

    pub fn id(&self) -> xproto::Window {
        self.window
    }

    pub fn depth(&self) -> u8 {
        DEPTH
    }

    pub fn colormap(&self) -> xproto::Colormap {
        self.colormap
    }

    pub fn visual_id(&self) -> xproto::Visualid {
        self.visual_id
    }

    pub fn screen_num(&self) -> usize {
        self.screen_num
    }

    pub fn position(&self) -> PhysicalPoint {
        self.position
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn is_mapped(&self) -> bool {
        self.is_mapped
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }

    /// Asks the server for the window's current geometry instead of
    /// trusting the cached values.
    pub fn get_geometry(&self) -> Result<PhysicalRect, ReplyError> {
        let reply = self.connection.get_geometry(self.window)?.reply()?;
        Ok(PhysicalRect {
            x: reply.x as i32,
            y: reply.y as i32,
            width: reply.width as u32,
            height: reply.height as u32,
        })
    }

    pub fn show(&self) -> Result<(), ReplyError> {
        self.connection.map_window(self.window)?.check()?;
        self.connection.flush()?;
        Ok(())
    }

    pub fn hide(&self) -> Result<(), ReplyError> {
        self.connection.unmap_window(self.window)?.check()?;
        self.connection.flush()?;
        Ok(())
    }

    pub fn raise(&self) -> Result<(), ReplyError> {
        let values = xproto::ConfigureWindowAux::new().stack_mode(xproto::StackMode::ABOVE);
        self.connection
            .configure_window(self.window, &values)?
            .check()?;
        self.connection.flush()?;
        Ok(())
    }

    pub fn move_position(&self, position: PhysicalPoint) -> Result<(), ReplyError> {
        let values = xproto::ConfigureWindowAux::new()
            .x(position.x)
            .y(position.y);
        self.connection
            .configure_window(self.window, &values)?
            .check()?;
        self.connection.flush()?;
        Ok(())
    }

    pub fn resize(&self, size: PhysicalSize) -> Result<(), ReplyError> {
        let values = xproto::ConfigureWindowAux::new()
            .width(size.width)
            .height(size.height);
        self.connection
            .configure_window(self.window, &values)?
            .check()?;
        self.connection.flush()?;
        Ok(())
    }

    pub fn request_redraw(&mut self) -> Result<(), ReplyError> {
        self.redraw()
    }

    /// Classifies a raw X11 event and routes it to the widget's typed
    /// handlers. Crossing events caused by a pointer grab, or arriving
    /// while button 1 is held, are dropped so that dragging across the
    /// window edge does not toggle the hover state.
    pub fn on_event(
        &mut self,
        event: &protocol::Event,
        control_flow: &mut ControlFlow,
    ) -> Result<(), ReplyError> {
        use protocol::Event::*;

        match event {
            EnterNotify(event) if event.event == self.window => {
                if accepts_crossing(event.mode, event.state) {
                    let effect = self.widget.on_mouse_enter(&MouseEvent::from(event));
                    self.apply_effect(effect)?;
                }
            }
            LeaveNotify(event) if event.event == self.window => {
                if accepts_crossing(event.mode, event.state) {
                    let effect = self.widget.on_mouse_leave(&MouseEvent::from(event));
                    self.apply_effect(effect)?;
                }
            }
            MotionNotify(event) if event.event == self.window => {
                let effect = self.widget.on_mouse_move(&MouseEvent::from(event));
                self.apply_effect(effect)?;
            }
            ButtonPress(event) if event.event == self.window => {
                let effect = self.widget.on_mouse_down(&MouseEvent::from(event));
                self.apply_effect(effect)?;
            }
            ButtonRelease(event) if event.event == self.window => {
                let effect = self.widget.on_mouse_up(&MouseEvent::from(event));
                self.apply_effect(effect)?;
            }
            Expose(event) if event.window == self.window && event.count == 0 => {
                self.redraw()?;
            }
            ClientMessage(event) if event.window == self.window && event.format == 32 => {
                if event.type_ == self.atoms.WM_PROTOCOLS {
                    let [protocol, ..] = event.data.as_data32();
                    if protocol == self.atoms.WM_DELETE_WINDOW {
                        log::info!("close requested by the window manager");
                        *control_flow = ControlFlow::Break;
                    }
                }
            }
            ConfigureNotify(event) if event.window == event.event && event.window == self.window =>
            {
                self.position = PhysicalPoint {
                    x: event.x as i32,
                    y: event.y as i32,
                };
                self.size = PhysicalSize {
                    width: event.width as u32,
                    height: event.height as u32,
                };
            }
            MapNotify(event) if event.window == event.event && event.window == self.window => {
                self.is_mapped = true;
                self.redraw()?;
            }
            UnmapNotify(event) if event.window == event.event && event.window == self.window => {
                self.is_mapped = false;
            }
            DestroyNotify(event) if event.window == event.event && event.window == self.window => {
                *control_flow = ControlFlow::Break;
            }
            _ => {}
        }

        Ok(())
    }

    fn apply_effect(&mut self, effect: Effect) -> Result<(), ReplyError> {
        match effect {
            Effect::None => Ok(()),
            Effect::Batch(effects) => {
                for effect in effects {
                    self.apply_effect(effect)?;
                }
                Ok(())
            }
            Effect::RequestRedraw => self.redraw(),
        }
    }

    fn redraw(&mut self) -> Result<(), ReplyError> {
        if !self.is_mapped {
            return Ok(());
        }

        log::debug!("redraw window");

        self.widget.render(
            self.connection.as_ref(),
            self.screen_num,
            self.window,
            self.gc,
        )?;
        self.connection.flush()?;

        Ok(())
    }
}

impl<Widget> Drop for Window<Widget> {
    fn drop(&mut self) {
        self.connection.free_gc(self.gc).ok();
        self.connection.destroy_window(self.window).ok();
        self.connection.free_colormap(self.colormap).ok();
        self.connection.flush().ok();
    }
}

/// Whether a crossing event should change the hover state. Crossings
/// caused by a pointer grab, or arriving while button 1 is held, are
/// dropped so that dragging across the window edge does not toggle it.
fn accepts_crossing(mode: xproto::NotifyMode, state: u16) -> bool {
    mode == xproto::NotifyMode::NORMAL && !Modifiers::from(state).button1
}

/// Picks a 32-bit TrueColor visual whose pict format carries a direct
/// alpha channel. There is no fallback: without such a visual the dock
/// cannot composite and construction fails.
fn find_argb32_visual<C: Connection>(
    connection: &C,
    screen_num: usize,
) -> Result<xproto::Visualid, WindowError> {
    if connection
        .extension_information(render::X11_EXTENSION_NAME)?
        .is_none()
    {
        return Err(WindowError::VisualNotFound);
    }

    let formats = connection.render_query_pict_formats()?.reply()?;
    let screen = formats
        .screens
        .get(screen_num)
        .ok_or(WindowError::VisualNotFound)?;

    screen
        .depths
        .iter()
        .filter(|depth| depth.depth == DEPTH)
        .flat_map(|depth| &depth.visuals)
        .find(|pictvisual| {
            formats.formats.iter().any(|format| {
                format.id == pictvisual.format
                    && format.type_ == render::PictType::DIRECT
                    && format.direct.alpha_mask != 0
            })
        })
        .map(|pictvisual| pictvisual.visual)
        .ok_or(WindowError::VisualNotFound)
}

#[derive(Debug)]
pub enum WindowError {
    VisualNotFound,
    X11Error(ReplyOrIdError),
}

impl From<ReplyOrIdError> for WindowError {
    fn from(value: ReplyOrIdError) -> Self {
        Self::X11Error(value)
    }
}

impl From<ReplyError> for WindowError {
    fn from(value: ReplyError) -> Self {
        Self::X11Error(value.into())
    }
}

impl From<ConnectionError> for WindowError {
    fn from(value: ConnectionError) -> Self {
        Self::X11Error(value.into())
    }
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::VisualNotFound => {
                f.write_str("no 32-bit TrueColor visual with an alpha channel is available")
            }
            Self::X11Error(error) => error.fmt(f),
        }
    }
}

impl error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_crossings_are_dispatched() {
        assert!(accepts_crossing(xproto::NotifyMode::NORMAL, 0));
    }

    #[test]
    fn test_grab_crossings_are_dropped() {
        assert!(!accepts_crossing(xproto::NotifyMode::GRAB, 0));
        assert!(!accepts_crossing(xproto::NotifyMode::UNGRAB, 0));
    }

    #[test]
    fn test_crossings_while_dragging_are_dropped() {
        let state = u16::from(xproto::KeyButMask::BUTTON1);
        assert!(!accepts_crossing(xproto::NotifyMode::NORMAL, state));
        // Other held buttons do not suppress crossings.
        let state = u16::from(xproto::KeyButMask::BUTTON3);
        assert!(accepts_crossing(xproto::NotifyMode::NORMAL, state));
    }
}
