use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use form_engine::ResponseMap;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    action::Action,
    config::Config,
    pages::Page,
    tui::{Event, Tui},
};

/// Runs one page until it asks to quit.
pub struct App {
    tick_rate: f64,
    frame_rate: f64,
    page: Box<dyn Page>,
    should_quit: bool,
    responses: Option<ResponseMap>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: &Config, page: Box<dyn Page>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut page = page;
        page.register_action_handler(action_tx.clone())?;
        Ok(Self {
            tick_rate: config.tick_rate,
            frame_rate: config.frame_rate,
            page,
            should_quit: false,
            responses: None,
            action_tx,
            action_rx,
        })
    }

    /// Responses of the last accepted submission.
    pub fn take_responses(&mut self) -> Option<ResponseMap> {
        self.responses.take()
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate)
            .paste(true);
        tui.enter()?;

        info!(page = self.page.name(), "starting");
        self.page.init(tui.size()?)?;
        self.page.on_enter()?;
        self.action_tx.send(Action::ClearScreen)?;
        self.action_tx.send(Action::Render)?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_actions(&mut tui)?;
            if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        self.page.on_exit()?;
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };
        let action_tx = self.action_tx.clone();
        match &event {
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(*x, *y))?,
            Event::Key(key)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c') =>
            {
                action_tx.send(Action::Quit)?
            }
            _ => {}
        }
        if let Some(action) = self.page.handle_events(Some(event))? {
            action_tx.send(action)?;
        }
        Ok(())
    }

    fn handle_actions(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                debug!("{action:?}");
            }
            match &action {
                Action::Quit => self.should_quit = true,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Submitted(responses) => self.responses = Some(responses.clone()),
                _ => {}
            }
            if let Some(action) = self.page.update(action)? {
                self.action_tx.send(action)?
            };
        }
        Ok(())
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let action_tx = self.action_tx.clone();
        tui.draw(|frame| {
            if let Err(err) = self.page.draw(frame, frame.area()) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw: {:?}", err)));
            }
        })?;
        Ok(())
    }
}
