//! A weighted selection wheel widget rendered into a pixel buffer.
//!
//! Items with weights become proportional sectors on a circle; a spin
//! accumulates rotation under an ease-out curve and the sector under the
//! fixed pointer when it stops is the winner. The crate splits into a
//! pure core (sector geometry in [`layout`], the animation in
//! [`animator`], the state machine in [`session`]) and the window shell
//! here, which wires the core to `winit`, `pixels` and the synthesized
//! audio in [`audio`].
//!
//! ```no_run
//! use spinwheel::{Wheel, WheelConfig};
//!
//! let config = WheelConfig::builder().title("Lunch".to_string()).build();
//! let mut wheel = Wheel::new(config)?;
//! wheel.run()?;
//! # Ok::<(), spinwheel::WheelError>(())
//! ```

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use bon::Builder;
use log::{info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::{Font, Scale};
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

pub mod animator;
pub mod audio;
pub mod config;
pub mod csv;
pub mod layout;
pub mod render;
pub mod roster;
pub mod session;
pub mod storage;

pub use animator::{SpinAnimator, SpinPlan};
pub use audio::{AudioSink, Chime, Clip, LogSink};
pub use config::{default_items, AudioConfig, Color, RenderConfig, WindowConfig};
pub use layout::{effective_weight, normalize_deg, pointer_angle, Item, Sector, SectorLayout};
pub use roster::Roster;
pub use session::{Phase, SpinOutcome, SpinSession, TickOutcome};
pub use storage::Storage;

use render::{render_wheel, wheel_size_for, Canvas};

#[derive(Debug, Error)]
pub enum WheelError {
    #[error("the wheel has no items")]
    EmptyWheel,
    #[error("operation refused while a spin is in progress")]
    SpinInProgress,
    #[error("cannot remove the last remaining item")]
    LastItem,
    #[error("no winner has been recorded")]
    NoWinner,
    #[error("item index {0} is out of bounds")]
    BadIndex(usize),
    #[error("no item labelled {0:?}")]
    UnknownLabel(String),
    #[error("CSV input is empty")]
    EmptyCsv,
    #[error("CSV input contains no valid rows")]
    NoValidRows,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Pixels(#[from] pixels::Error),
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error(transparent)]
    Os(#[from] winit::error::OsError),
}

/// Commands accepted over the channel given to [`Wheel::run_with_commands`].
#[derive(Debug, Clone)]
pub enum WheelCommand {
    Spin,
    ExcludeWinner,
    Reset,
    ImportCsv(String),
    ExportCsv(PathBuf),
}

#[derive(Debug, Clone, Builder)]
pub struct WheelConfig {
    #[builder(default = "Spin Wheel".to_string())]
    pub title: String,
    /// Spin duration in milliseconds.
    #[builder(default = 3000)]
    pub duration_ms: u64,
    /// Path the item list is persisted to between runs.
    #[builder(default = PathBuf::from("spinwheel-items.json"))]
    pub storage_path: PathBuf,
    /// TTF/OTF file for labels. Without one the wheel still renders and
    /// resolves winners; only the text is skipped.
    pub font_path: Option<PathBuf>,
    #[builder(default)]
    pub window: WindowConfig,
    #[builder(default)]
    pub render: RenderConfig,
    #[builder(default)]
    pub audio: AudioConfig,
}

/// The assembled widget: session, persistence and the window shell.
///
/// Keys while the window has focus: space spins, `e` excludes the
/// recorded winner, `r` resets to the default item list.
pub struct Wheel {
    config: WheelConfig,
    session: SpinSession,
    storage: Storage,
    chime: Chime,
}

impl Wheel {
    /// Loads the persisted item list (or falls back to the defaults) and
    /// builds the session around it.
    pub fn new(config: WheelConfig) -> Result<Self, WheelError> {
        let storage = Storage::new(config.storage_path.clone());
        let items = storage.load().unwrap_or_else(default_items);
        let session = SpinSession::new(items, Duration::from_millis(config.duration_ms))?;
        let chime = Chime::new(&config.audio, Box::new(LogSink));
        Ok(Self {
            config,
            session,
            storage,
            chime,
        })
    }

    pub fn session(&self) -> &SpinSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SpinSession {
        &mut self.session
    }

    /// Replaces the item list from a CSV file and persists the result.
    pub fn import_csv_file(&mut self, path: &std::path::Path) -> Result<usize, WheelError> {
        let text = std::fs::read_to_string(path)?;
        let count = self.session.import_csv(&text)?;
        self.storage.save(self.session.items());
        Ok(count)
    }

    pub fn export_csv_file(&self, path: &std::path::Path) -> Result<(), WheelError> {
        std::fs::write(path, self.session.export_csv())?;
        Ok(())
    }

    pub fn run(&mut self) -> Result<(), WheelError> {
        self.run_window(None)
    }

    pub fn run_with_commands(
        &mut self,
        receiver: Receiver<WheelCommand>,
    ) -> Result<(), WheelError> {
        self.run_window(Some(receiver))
    }

    fn load_font(&self) -> Option<Font<'static>> {
        let path = self.config.font_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => {
                let font = Font::try_from_vec(bytes);
                if font.is_none() {
                    warn!("font file {} did not parse; labels disabled", path.display());
                }
                font
            }
            Err(err) => {
                warn!("could not read font {}: {err}; labels disabled", path.display());
                None
            }
        }
    }

    fn run_window(&mut self, receiver: Option<Receiver<WheelCommand>>) -> Result<(), WheelError> {
        let size = wheel_size_for(
            self.session.items().len(),
            self.config.window.base_size,
            self.config.window.max_size,
        );

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(size as f64, size as f64))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);

        let window_clone = window.clone();
        let inner = window.inner_size();
        let mut fb_width = inner.width as usize;
        let mut fb_height = inner.height as usize;
        let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
        let mut pixels = Pixels::new(inner.width, inner.height, surface_texture)?;

        let font = self.load_font();
        let mut rng = rand::rng();

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.window.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        self.session.cancel();
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                repeat: false,
                                logical_key,
                                ..
                            },
                        ..
                    } => {
                        let now = Instant::now();
                        match logical_key {
                            Key::Named(NamedKey::Space) => self.spin(now, &mut rng),
                            Key::Character(ref c) if c == "e" => self.exclude_winner(),
                            Key::Character(ref c) if c == "r" => self.reset_items(),
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        if let Some(receiver) = &receiver {
                            while let Ok(command) = receiver.try_recv() {
                                self.handle_command(command, now, &mut rng);
                            }
                        }
                        if let TickOutcome::Settled { .. } = self.session.tick(now) {
                            self.chime.on_settle();
                        }
                        self.chime.on_frame(now, self.session.is_spinning());

                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_wheel(
                            &mut canvas,
                            self.session.layout(),
                            self.session.items(),
                            self.session.rotation_deg(),
                            self.session.winner(),
                            font.as_ref(),
                            &self.config.render,
                        );
                        if let Some(font) = &font {
                            self.draw_status(&mut canvas, font);
                        }
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }

    /// One status line under the wheel: the winner when settled, the
    /// sector under the pointer while spinning.
    fn draw_status(&self, canvas: &mut Canvas, font: &Font<'static>) {
        let text = match (self.session.winner(), self.session.live_index()) {
            (Some(winner), _) => self
                .session
                .items()
                .get(winner)
                .map(|item| format!("Winner: {}", item.label)),
            (None, Some(live)) => self.session.items().get(live).map(|item| item.label.clone()),
            _ => None,
        };
        if let Some(text) = text {
            let x = canvas.width as i32 / 2;
            let y = canvas.height as i32 - self.config.render.margin / 2;
            render::draw_text(
                canvas,
                font,
                &text,
                Scale::uniform(16.0),
                x,
                y,
                self.config.render.text_color,
            );
        }
    }

    fn spin(&mut self, now: Instant, rng: &mut impl rand::Rng) {
        if self.session.is_spinning() {
            return;
        }
        self.session.start_spin(rng, now);
        self.chime.on_spin_start(now);
    }

    fn exclude_winner(&mut self) {
        match self.session.exclude_winner() {
            Ok(_) => self.storage.save(self.session.items()),
            Err(err) => warn!("exclude refused: {err}"),
        }
    }

    fn reset_items(&mut self) {
        match self.session.set_items(default_items()) {
            Ok(()) => {
                self.storage.save(self.session.items());
                info!("wheel reset to default items");
            }
            Err(err) => warn!("reset refused: {err}"),
        }
    }

    fn handle_command(&mut self, command: WheelCommand, now: Instant, rng: &mut impl rand::Rng) {
        match command {
            WheelCommand::Spin => self.spin(now, rng),
            WheelCommand::ExcludeWinner => self.exclude_winner(),
            WheelCommand::Reset => self.reset_items(),
            WheelCommand::ImportCsv(text) => match self.session.import_csv(&text) {
                Ok(count) => {
                    self.storage.save(self.session.items());
                    info!("wheel replaced with {count} imported items");
                }
                Err(err) => warn!("CSV import refused: {err}"),
            },
            WheelCommand::ExportCsv(path) => match self.export_csv_file(&path) {
                Ok(()) => info!(
                    "exported {} items to {}",
                    self.session.items().len(),
                    path.display()
                ),
                Err(err) => warn!("CSV export to {} failed: {err}", path.display()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = WheelConfig::builder().build();
        assert_eq!(config.title, "Spin Wheel");
        assert_eq!(config.duration_ms, 3000);
        assert_eq!(config.storage_path, PathBuf::from("spinwheel-items.json"));
        assert!(config.font_path.is_none());
        assert_eq!(config.window.base_size, 400);
    }

    #[test]
    fn wheel_falls_back_to_default_items_without_a_store() {
        let config = WheelConfig::builder()
            .storage_path(std::env::temp_dir().join(format!(
                "spinwheel-missing-{}.json",
                std::process::id()
            )))
            .build();
        let wheel = Wheel::new(config).unwrap();
        assert_eq!(wheel.session().items().len(), 6);
        assert_eq!(wheel.session().items()[0].label, "Option 1");
    }

    #[test]
    fn csv_file_round_trip_and_missing_file() {
        let dir = std::env::temp_dir();
        let store = dir.join(format!("spinwheel-csv-store-{}.json", std::process::id()));
        let csv = dir.join(format!("spinwheel-csv-{}.csv", std::process::id()));
        let out = dir.join(format!("spinwheel-csv-out-{}.csv", std::process::id()));

        let config = WheelConfig::builder().storage_path(store.clone()).build();
        let mut wheel = Wheel::new(config).unwrap();

        std::fs::write(&csv, "Alice,2,#FF6B6B\nBob,1,teal").unwrap();
        assert_eq!(wheel.import_csv_file(&csv).unwrap(), 2);
        assert_eq!(wheel.session().items()[1].label, "Bob");

        wheel.export_csv_file(&out).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "\"Alice\",2,#FF6B6B\n\"Bob\",1,teal"
        );

        let missing = dir.join("spinwheel-no-such-file.csv");
        assert!(matches!(
            wheel.import_csv_file(&missing),
            Err(WheelError::Io(_))
        ));
        assert_eq!(wheel.session().items().len(), 2);

        for path in [&store, &csv, &out] {
            let _ = std::fs::remove_file(path);
        }
    }
}
