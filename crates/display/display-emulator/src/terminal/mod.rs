//! Terminal plumbing shared by the ASCII backends
//!
//! - [`TerminalHost`]: the screen a backend paints on. [`CrosstermHost`]
//!   drives the real terminal, [`MemoryTerminal`] records everything for
//!   tests and headless runs.
//! - [`OutputCapture`]: buffers stdout/stderr text produced while a backend
//!   owns the screen, handed back exactly once on cleanup.
//! - [`TerminalSession`]: ties the two together for a backend's lifetime.

pub mod asciiart;
pub mod asciiblock;

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::{
    cursor, execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::backend::{self, Availability, Backend};
use crate::config::TerminalConfig;
use crate::error::{EmulatorError, Result};

/// A character-cell screen
pub trait TerminalHost {
    /// Take exclusive ownership of the screen
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the screen to its previous state
    fn leave(&mut self) -> io::Result<()>;

    /// `(columns, rows)`
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Where frames (and replayed stdout) are written
    fn out(&mut self) -> &mut dyn Write;

    /// Where replayed stderr is written
    fn err(&mut self) -> &mut dyn Write;
}

/// The process's real terminal, driven through crossterm
#[derive(Debug)]
pub struct CrosstermHost {
    stdout: io::Stdout,
    stderr: io::Stderr,
    alternate_screen: bool,
}

impl CrosstermHost {
    /// Fails with [`EmulatorError::BackendUnavailable`] when stdout is not a
    /// terminal
    pub fn new(backend: Backend, config: &TerminalConfig) -> Result<Self> {
        if let Availability::Unavailable(reason) = backend::terminal_availability() {
            return Err(EmulatorError::BackendUnavailable { backend, reason });
        }
        Ok(Self {
            stdout: io::stdout(),
            stderr: io::stderr(),
            alternate_screen: config.alternate_screen,
        })
    }
}

impl TerminalHost for CrosstermHost {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        if self.alternate_screen {
            execute!(self.stdout, EnterAlternateScreen)?;
        }
        execute!(self.stdout, cursor::Hide)
    }

    /// Every restore step runs; the first failure is returned
    fn leave(&mut self) -> io::Result<()> {
        let raw = disable_raw_mode();
        let screen = if self.alternate_screen {
            execute!(self.stdout, LeaveAlternateScreen)
        } else {
            Ok(())
        };
        let shown = execute!(self.stdout, cursor::Show);
        raw.and(screen).and(shown)
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn out(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }

    fn err(&mut self) -> &mut dyn Write {
        &mut self.stderr
    }
}

/// In-memory screen that records every byte
///
/// Clones share the same buffers, so a test can keep a handle after moving
/// one into a backend.
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    columns: u16,
    rows: u16,
    state: Arc<Mutex<MemoryState>>,
    out: SharedBytes,
    err: SharedBytes,
}

#[derive(Debug, Default)]
struct MemoryState {
    entered: bool,
    enter_count: u32,
    leave_count: u32,
}

impl MemoryTerminal {
    /// Blank screen of `columns × rows` cells
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            state: Arc::default(),
            out: SharedBytes::default(),
            err: SharedBytes::default(),
        }
    }

    /// Everything written to the screen so far
    pub fn output(&self) -> Vec<u8> {
        self.out.contents()
    }

    /// Everything written to the error stream so far
    pub fn errors(&self) -> Vec<u8> {
        self.err.contents()
    }

    /// Whether the screen is currently owned by a backend
    pub fn is_entered(&self) -> bool {
        self.lock().entered
    }

    /// Times a backend took the screen
    pub fn enter_count(&self) -> u32 {
        self.lock().enter_count
    }

    /// Times the screen was restored
    pub fn leave_count(&self) -> u32 {
        self.lock().leave_count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryTerminal {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl TerminalHost for MemoryTerminal {
    fn enter(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.entered = true;
        state.enter_count = state.enter_count.saturating_add(1);
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.entered = false;
        state.leave_count = state.leave_count.saturating_add(1);
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.columns, self.rows))
    }

    fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn err(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

/// Growable byte buffer shared between clones
#[derive(Debug, Clone, Default)]
struct SharedBytes(Arc<Mutex<Vec<u8>>>);

impl SharedBytes {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Write for SharedBytes {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writer handed out by [`OutputCapture`]
///
/// Buffers while the capture is active; once released, writes go straight
/// to the process's stdout or stderr.
#[derive(Debug, Clone)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Option<Vec<u8>>>>,
    stream: Stream,
}

impl CaptureWriter {
    fn new(stream: Stream, capturing: bool) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(capturing.then(Vec::new))),
            stream,
        }
    }

    fn take(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default()
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(captured) => {
                captured.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => match self.stream {
                Stream::Stdout => io::stdout().write(buf),
                Stream::Stderr => io::stderr().write(buf),
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}

/// Scoped stdout/stderr capture
///
/// Route log output through [`OutputCapture::stdout`] and
/// [`OutputCapture::stderr`] while a terminal backend owns the screen. The
/// buffered text is returned by [`OutputCapture::release`] exactly once.
#[derive(Debug, Clone)]
pub struct OutputCapture {
    stdout: CaptureWriter,
    stderr: CaptureWriter,
}

impl OutputCapture {
    /// Start buffering
    pub fn new() -> Self {
        Self {
            stdout: CaptureWriter::new(Stream::Stdout, true),
            stderr: CaptureWriter::new(Stream::Stderr, true),
        }
    }

    /// Writers that pass straight through; for backends that leave the
    /// terminal alone
    pub fn passthrough() -> Self {
        Self {
            stdout: CaptureWriter::new(Stream::Stdout, false),
            stderr: CaptureWriter::new(Stream::Stderr, false),
        }
    }

    /// Writer standing in for stdout
    pub fn stdout(&self) -> CaptureWriter {
        self.stdout.clone()
    }

    /// Writer standing in for stderr
    pub fn stderr(&self) -> CaptureWriter {
        self.stderr.clone()
    }

    /// Whether text is still being buffered
    pub fn is_capturing(&self) -> bool {
        self.stdout
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop buffering and return `(stdout, stderr)`
    ///
    /// Later calls return empty buffers.
    pub fn release(&self) -> (Vec<u8>, Vec<u8>) {
        (self.stdout.take(), self.stderr.take())
    }
}

impl Default for OutputCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// A backend's exclusive hold on a terminal
///
/// Entering happens on construction. [`TerminalSession::finish`] restores
/// the terminal and replays captured output; it runs at most once.
#[derive(Debug)]
pub struct TerminalSession<H: TerminalHost> {
    host: H,
    capture: OutputCapture,
    active: bool,
}

impl<H: TerminalHost> TerminalSession<H> {
    /// Enter the terminal; a partial enter is rolled back before the error
    /// is returned
    pub fn start(mut host: H, capture: OutputCapture) -> Result<Self> {
        if let Err(error) = host.enter() {
            if let Err(restore) = host.leave() {
                tracing::warn!(%restore, "failed to restore terminal after enter error");
            }
            return Err(error.into());
        }
        tracing::debug!("terminal session started");
        Ok(Self {
            host,
            capture,
            active: true,
        })
    }

    /// The screen being painted
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the screen, for painting
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Capture replayed on finish
    pub fn capture(&self) -> &OutputCapture {
        &self.capture
    }

    /// `false` once [`TerminalSession::finish`] has run
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the terminal, then replay buffered stdout/stderr
    ///
    /// Captured output is released and replayed even when restoring fails;
    /// the restore error is reported first.
    pub fn finish(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let left = self.host.leave();

        let (stdout, stderr) = self.capture.release();
        let replayed = self.replay(&stdout, &stderr);
        left?;
        replayed
    }

    fn replay(&mut self, stdout: &[u8], stderr: &[u8]) -> Result<()> {
        let out = self.host.out();
        let written = out.write_all(stdout).and_then(|()| out.flush());
        let err = self.host.err();
        err.write_all(stderr).and_then(|()| err.flush())?;
        written?;
        Ok(())
    }
}

/// Fit an image into `columns` character cells, keeping its aspect ratio
///
/// `cell_aspect` is cell width over cell height; one image row per cell row
/// for 1.0, half as many for 0.5.
pub(crate) fn fit_to_columns(width: u32, height: u32, columns: u16, cell_aspect: f32) -> (u32, u32) {
    if width == 0 || columns == 0 {
        return (0, 0);
    }
    let columns = u32::from(columns);
    let scale = columns as f32 / width as f32;
    let rows = (height as f32 * scale * cell_aspect) as u32;
    (columns, rows.max(1))
}
