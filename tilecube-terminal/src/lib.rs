/// Terminal front end: keyboard, resize and animation timing around the scene
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tilecube_core::{Command, Renderer, Scene, ScheduledTick, Tick};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::AsciiSurface;

/// How long to block on input when no animation tick is pending
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Main application struct for the terminal view
pub struct TerminalApp {
    scene: Scene,
    renderer: Renderer,
    surface: AsciiSurface,
    running: bool,
    next_tick: Option<(Instant, u32)>,
}

impl TerminalApp {
    pub fn new(scene: Scene, renderer: Renderer, zoom: f64) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            renderer,
            surface: AsciiSurface::new(width as usize, height as usize, zoom),
            running: true,
            next_tick: None,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!(tiles = self.scene.tiles().len(), "terminal view started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;

        while self.running {
            let timeout = match self.next_tick {
                Some((at, _)) => at.saturating_duration_since(Instant::now()),
                None => IDLE_POLL,
            };

            if event::poll(timeout)? {
                self.handle_event(event::read()?)?;
            }

            if let Some((at, generation)) = self.next_tick {
                if Instant::now() >= at {
                    self.tick(generation)?;
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if code == KeyCode::Esc
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
                {
                    self.running = false;
                    return Ok(());
                }

                let Some(name) = key_name(code) else {
                    return Ok(());
                };
                let response = self.scene.apply(Command::from_key(&name));
                if let Some(next) = response.schedule_tick {
                    self.schedule(next);
                }
                if response.repaint {
                    self.render()?;
                }
            }
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.surface.resize(width as usize, height as usize);
                self.render()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn schedule(&mut self, next: ScheduledTick) {
        self.next_tick = Some((Instant::now() + next.delay, next.generation));
    }

    fn tick(&mut self, generation: u32) -> io::Result<()> {
        match self.scene.advance_animation(generation) {
            Tick::Continue(next) => {
                self.schedule(next);
                self.render()
            }
            Tick::Stop => {
                self.next_tick = None;
                Ok(())
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let viewport = self.surface.viewport();
        self.renderer.render(&self.scene, &viewport, &mut self.surface);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.scene.camera();
        let angles = camera.angles.wrapped();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "tilecube | {} | pitch {:.0} yaw {:.0} roll {:.0} | tiles {}{} | Arrows=Move WASD=Rotate Q/E=Roll O/P=Animate 1/2/3=View Esc=Quit",
                camera.mode.name(),
                angles.x.to_degrees(),
                angles.y.to_degrees(),
                angles.z.to_degrees(),
                self.scene.tiles().len(),
                if self.scene.is_animating() { " | animating" } else { "" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// DOM-style key name for a terminal key code
pub fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecube_core::{Axis, Direction};

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(KeyCode::Left).as_deref(), Some("ArrowLeft"));
        assert_eq!(key_name(KeyCode::Char('w')).as_deref(), Some("w"));
        assert_eq!(key_name(KeyCode::F(1)), None);
    }

    #[test]
    fn test_key_names_map_to_commands() {
        let command = |code| Command::from_key(&key_name(code).unwrap());
        assert_eq!(command(KeyCode::Down), Command::Move(Direction::Down));
        assert_eq!(
            command(KeyCode::Char('a')),
            Command::Rotate {
                axis: Axis::Yaw,
                positive: false
            }
        );
        assert_eq!(command(KeyCode::Char('o')), Command::StartAnimation);
    }
}
