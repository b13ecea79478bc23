use anyhow::Context as _;
use std::rc::Rc;
use x11rb::xcb_ffi::XCBConnection;

use crate::atoms::Atoms;
use crate::config::{Config, LayoutConfig, LayoutMode};
use crate::dock::DockContainer;
use crate::event_loop::{ControlFlow, Event, EventLoop};
use crate::layout::{LayoutStrategy, WaveLayout};
use crate::window::Window;

pub struct App {
    connection: Rc<XCBConnection>,
    screen_num: usize,
    atoms: Rc<Atoms>,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (connection, screen_num) =
            XCBConnection::connect(None).context("connect to the X server")?;
        let connection = Rc::new(connection);
        let atoms =
            Rc::new(Atoms::new(connection.as_ref()).context("intern the protocol atoms")?);
        Ok(Self {
            connection,
            screen_num,
            atoms,
            config,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let layout = build_layout(&self.config.layout)?;
        let dock = DockContainer::new(layout, self.config.ui.clone());
        let mut window = Window::new(
            dock,
            self.connection.clone(),
            self.screen_num,
            self.atoms.clone(),
            &self.config.window,
        )
        .context("create the dock window")?;
        let mut event_loop =
            EventLoop::new(self.connection.clone()).context("create the event loop")?;

        window.show().context("map the dock window")?;

        event_loop.run(|event, control_flow| match event {
            Event::X11Event(event) => {
                window.on_event(&event, control_flow)?;
                Ok(())
            }
            Event::Signal(_) => {
                *control_flow = ControlFlow::Break;
                Ok(())
            }
        })?;

        Ok(())
    }
}

fn build_layout(config: &LayoutConfig) -> anyhow::Result<LayoutStrategy> {
    match config.mode {
        LayoutMode::Wave => {
            let layout = WaveLayout::new(
                config.num_widgets,
                config.widget_size,
                config.num_anim,
                config.zoom_factor,
                config.jump_factor,
            )
            .context("configure the wave layout")?;
            Ok(LayoutStrategy::Wave(layout))
        }
        LayoutMode::Coverflow => anyhow::bail!("the coverflow layout is not implemented yet"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_layout_rejects_empty_docks() {
        let config = LayoutConfig {
            num_widgets: 0,
            ..LayoutConfig::default()
        };
        assert!(build_layout(&config).is_err());
    }

    #[test]
    fn test_build_layout_rejects_shrinking_zoom() {
        let config = LayoutConfig {
            zoom_factor: 0.5,
            ..LayoutConfig::default()
        };
        assert!(build_layout(&config).is_err());
    }

    #[test]
    fn test_build_layout_rejects_coverflow() {
        let config = LayoutConfig {
            mode: LayoutMode::Coverflow,
            ..LayoutConfig::default()
        };
        assert!(build_layout(&config).is_err());
    }

    #[test]
    fn test_build_layout_accepts_the_defaults() {
        let layout = build_layout(&LayoutConfig::default()).unwrap();
        assert_eq!(layout.num_widgets(), 7);
    }
}
