use crate::input::{collect_input_nonblocking, map_event, Command};
use crate::render::{compose, Terminal};
use anyhow::Context;
use std::time::{Duration, Instant};
use tamagotchi::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use tamagotchi::{ActionError, FileStore, GameEngine, PlayerAction};

const NOTICE_TTL: Duration = Duration::from_secs(3);

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    engine: GameEngine<FileStore>,
    term: Terminal,
    should_quit: bool,
    notice: Option<(String, Instant)>,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);
        let store = FileStore::new(&paths.data_dir);
        log::info!("save dir: {}", store.dir().display());
        let engine = GameEngine::new(store, &settings);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            paths,
            engine,
            term,
            should_quit: false,
            notice: None,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                match map_event(&ev) {
                    Some(Command::Quit) => {
                        self.should_quit = true;
                        break;
                    }
                    Some(Command::Act(action)) => self.handle(action),
                    None => {}
                }
            }

            let now = Instant::now();
            self.engine.advance(now.saturating_duration_since(last_frame));
            last_frame = now;

            if self
                .notice
                .as_ref()
                .is_some_and(|(_, at)| at.elapsed() >= NOTICE_TTL)
            {
                self.notice = None;
            }

            let frame = compose(
                self.engine.state(),
                self.notice.as_ref().map(|(n, _)| n.as_str()),
            );
            self.term.present(frame, self.settings.enable_color)?;

            std::thread::sleep(frame_dt);
        }

        Ok(())
    }

    fn handle(&mut self, action: PlayerAction) {
        match self.engine.act(action) {
            Ok(_) => {}
            Err(e @ ActionError::InsufficientFunds { .. }) => {
                self.notice = Some((format!("Not enough coins! ({e})"), Instant::now()));
            }
            Err(ActionError::GameOver) => {
                self.notice = Some(("Restart with r first.".to_string(), Instant::now()));
            }
        }
    }

    /// Session end: restore the terminal, then persist the pet and settings.
    fn finish(mut self) -> anyhow::Result<()> {
        let term_result = self.term.end();
        self.engine.shutdown().context("final save failed")?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        term_result
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    let result = app.run();
    app.finish()?;
    result
}
