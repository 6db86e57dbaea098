use crate::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_action, HostAction};
use crate::render::{panel, Terminal};
use crate::storage::{load_save, save_atomic, SaveFile, SAVE_VERSION};
use anyhow::Context;
use chrono::Utc;
use pocketpet::{
    catch_up, Command, ItemCatalog, Outcome, Pet, PetState, Scheduler, Session,
};
use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const AUTOSAVE_EVERY: Duration = Duration::from_secs(10);

pub(crate) struct App {
    settings: Settings,
    catalog: ItemCatalog,
    session: Session,
    scheduler: Scheduler,
    paths: Paths,
    term: Terminal,
    message: String,
    should_quit: bool,
    autosave_at: Instant,
}

fn init_logging(paths: &Paths) -> anyhow::Result<()> {
    // The terminal is in raw mode, so logs go to a file.
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)
        .with_context(|| format!("opening {}", paths.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        init_logging(&paths)?;
        let settings = load_settings(&paths.settings_path);
        let rules = settings.rules.clone();
        let now = Utc::now();

        let mut message = String::new();
        let session = match load_save(&paths.save_path)? {
            Some(save) => {
                let mut session = Session::restore(save.pet, rules)?;
                let summary = catch_up(&mut session, save.last_seen_utc, now);
                if summary.has_anything() {
                    message = format!(
                        "While you were away: lowest happiness {}, fullness {}, health {}{}{}",
                        summary.happiness_min,
                        summary.fullness_min,
                        summary.health_min,
                        if summary.exhausted > 0 { ", collapsed from exhaustion" } else { "" },
                        if summary.died { ", and it did not make it" } else { "" },
                    );
                }
                session
            }
            None => Session::new(Pet::new(settings.pet_name.clone(), settings.pet_kind), rules)?,
        };
        tracing::info!(name = session.pet().name(), kind = %session.pet().kind(), "session started");

        let scheduler = Scheduler::start(&session, now);
        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            catalog: ItemCatalog::default(),
            session,
            scheduler,
            paths,
            term,
            message,
            should_quit: false,
            autosave_at: Instant::now() + AUTOSAVE_EVERY,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(5, 120);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        while !self.should_quit {
            let frame_start = Instant::now();

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event_to_action(&ev) {
                    self.handle(action)?;
                }
                if self.should_quit {
                    break;
                }
            }

            self.scheduler.advance(&mut self.session, Utc::now());

            let lines = panel(&self.session.snapshot(), &self.message);
            self.term.present(&lines)?;

            if Instant::now() >= self.autosave_at {
                self.save_now()?;
                self.autosave_at = Instant::now() + AUTOSAVE_EVERY;
            }

            let spent = frame_start.elapsed();
            if spent < frame_dt {
                std::thread::sleep(frame_dt - spent);
            }
        }

        self.save_now()?;
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn handle(&mut self, action: HostAction) -> anyhow::Result<()> {
        let now = Utc::now();
        // Pending ticks land before the command sees the pet.
        self.scheduler.advance(&mut self.session, now);

        let cmd = match action {
            HostAction::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            HostAction::NewGame => {
                if self.session.pet().state() == PetState::Dead {
                    self.session
                        .reset(self.settings.pet_name.clone(), self.settings.pet_kind);
                    self.scheduler = Scheduler::start(&self.session, now);
                    self.message = format!("{} hatched.", self.session.pet().name());
                }
                return Ok(());
            }
            HostAction::Sleep => Command::Sleep,
            HostAction::Feed(name) => Command::Feed(self.catalog.food(name)?),
            HostAction::FeedFruit(name) => Command::FeedSpecial(self.catalog.fruit(name)?),
            HostAction::Give(name) => Command::Give(self.catalog.gift(name)?),
            HostAction::Vet => Command::Vet,
            HostAction::Play => Command::Play,
            HostAction::Exercise => Command::Exercise,
            HostAction::Pet => Command::Pet,
            HostAction::Bonk => Command::Bonk,
        };

        let name = self.session.pet().name().to_string();
        self.message = match self.session.apply(cmd, now) {
            Outcome::Applied => format!("{} enjoyed the {}.", name, cmd.name()),
            Outcome::Denied(denial) => format!("{} {}.", name, denial),
        };
        Ok(())
    }

    fn save_now(&self) -> anyhow::Result<()> {
        let save = SaveFile {
            version: SAVE_VERSION,
            last_seen_utc: Utc::now(),
            pet: self.session.snapshot(),
        };
        save_atomic(&self.paths.save_path, &save)?;
        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}
