use x11rb::errors::ReplyError;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt as _;
use x11rb::xcb_ffi::XCBConnection;

use crate::config::UiConfig;
use crate::effect::Effect;
use crate::event::MouseEvent;
use crate::geometrics::{Rect, Size};
use crate::layout::LayoutStrategy;
use crate::widget::Widget;

/// A row of dock icons driven by a layout strategy. Pointer motion
/// re-focuses the layout, leaving it resets the layout, and clicks are
/// resolved against the rectangles the layout last produced.
pub struct DockContainer {
    layout: LayoutStrategy,
    ui_config: UiConfig,
    hovering: bool,
    pressed_widget: Option<usize>,
}

impl DockContainer {
    pub fn new(layout: LayoutStrategy, ui_config: UiConfig) -> Self {
        Self {
            layout,
            ui_config,
            hovering: false,
            pressed_widget: None,
        }
    }

    pub fn layout(&self) -> &LayoutStrategy {
        &self.layout
    }

    pub fn pressed_widget(&self) -> Option<usize> {
        self.pressed_widget
    }

    fn fill_rect(
        &self,
        connection: &XCBConnection,
        window: xproto::Window,
        gc: xproto::Gcontext,
        pixel: u32,
        rect: Rect,
    ) -> Result<(), ReplyError> {
        let rect = rect.snap();
        let values = xproto::ChangeGCAux::new().foreground(pixel);
        connection.change_gc(gc, &values)?.check()?;
        connection
            .poly_fill_rectangle(
                window,
                gc,
                &[xproto::Rectangle {
                    x: rect.x as i16,
                    y: rect.y as i16,
                    width: rect.width as u16,
                    height: rect.height as u16,
                }],
            )?
            .check()?;
        Ok(())
    }
}

impl Widget for DockContainer {
    fn frame_size(&self) -> Size {
        self.layout.frame_size()
    }

    // Placeholder rendering: the layout decides the rectangles, we only
    // fill them. Real icon content would be composited here.
    fn render(
        &self,
        connection: &XCBConnection,
        _screen_num: usize,
        window: xproto::Window,
        gc: xproto::Gcontext,
    ) -> Result<(), ReplyError> {
        let frame = self.layout.frame_size();
        self.fill_rect(
            connection,
            window,
            gc,
            0,
            Rect {
                x: 0.0,
                y: 0.0,
                width: frame.width,
                height: frame.height,
            },
        )?;

        self.fill_rect(
            connection,
            window,
            gc,
            self.ui_config.bar_background.to_argb_pixel(),
            self.layout.dock_bounds(),
        )?;

        for index in 0..self.layout.num_widgets() {
            let color = if self.pressed_widget == Some(index) {
                self.ui_config.pressed_widget_background
            } else {
                self.ui_config.widget_background
            };
            self.fill_rect(
                connection,
                window,
                gc,
                color.to_argb_pixel(),
                self.layout.widget_bounds(index),
            )?;
        }

        Ok(())
    }

    fn on_mouse_enter(&mut self, event: &MouseEvent) -> Effect {
        self.hovering = true;
        self.layout.focus(event.position.unsnap());
        Effect::RequestRedraw
    }

    fn on_mouse_leave(&mut self, _event: &MouseEvent) -> Effect {
        self.hovering = false;
        self.pressed_widget = None;
        self.layout.unfocus();
        Effect::RequestRedraw
    }

    fn on_mouse_move(&mut self, event: &MouseEvent) -> Effect {
        let position = event.position.unsnap();
        if self.layout.at_hover_zone(position) {
            self.hovering = true;
            self.layout.focus(position);
            Effect::RequestRedraw
        } else if self.hovering {
            self.hovering = false;
            self.layout.unfocus();
            Effect::RequestRedraw
        } else {
            Effect::None
        }
    }

    fn on_mouse_down(&mut self, event: &MouseEvent) -> Effect {
        self.pressed_widget = self.layout.widget_at(event.position.unsnap());
        match self.pressed_widget {
            Some(_) => Effect::RequestRedraw,
            None => Effect::None,
        }
    }

    fn on_mouse_up(&mut self, event: &MouseEvent) -> Effect {
        let released_widget = self.layout.widget_at(event.position.unsnap());
        if let (Some(pressed), Some(released)) = (self.pressed_widget, released_widget) {
            if pressed == released {
                log::info!("widget {} activated with {:?}", released, event.button);
            }
        }
        match self.pressed_widget.take() {
            Some(_) => Effect::RequestRedraw,
            None => Effect::None,
        }
    }
}
