//! Event-driven command shell session.
//!
//! A [`Shell`] turns bytes arriving from a terminal into edited command
//! lines, dispatches them to registered [`Command`]s and renders prompts,
//! echo and cursor movement back to the same terminal. It never blocks:
//! producers queue input through an [`InputProducer`](crate::InputProducer)
//! and raise a notification, and the owner of the session runs a processing
//! pass whenever that notification is pending. Each pass first pulls queued
//! bytes into the session's own ring buffer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ Input Queue │───▶│   Ring Buffer   │───▶│  Escape         │───▶│   Line Editor   │
//! │ (producers) │    │   (pending)     │    │  Decoder        │    │   & Renderer    │
//! └─────────────┘    └─────────────────┘    └─────────────────┘    └─────────────────┘
//!          │                                             │ Enter
//!          │ redirect mode                               ▼
//!          │                                    ┌─────────────────┐
//!          └───────────────────────────────────▶│   Dispatch &    │
//!                                               │   Contexts      │
//!                                               └─────────────────┘
//! ```
//!
//! # Session states
//!
//! ```text
//! Init ──▶ Reset ──▶ WaitInput ──▶ RedirectInputInit ──▶ RedirectInput
//!            ▲           │                                    │
//!            └───────────┴──────── foreground finishes ◀──────┘
//! ```
//!
//! While a foreground command runs without input redirection, typed bytes
//! are only echoed. They stay in the ring buffer and reach the line editor
//! once the command finishes, so nothing typed ahead is lost.
//!
//! # Examples
//!
//! ```rust
//! use core::fmt::Write;
//! use evshell::{Command, Config, Context, InputQueue, Shell, Terminal};
//!
//! struct Stdout;
//!
//! impl Terminal for Stdout {
//!     type Error = ();
//!
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
//!         print!("{}", String::from_utf8_lossy(buf));
//!         Ok(buf.len())
//!     }
//! }
//!
//! fn hello(ctx: &mut dyn Context, args: &[&str]) {
//!     let name = args.get(1).copied().unwrap_or("world");
//!     let _ = write!(ctx, "hello, {}\r\n", name);
//!     ctx.finish();
//! }
//!
//! static COMMANDS: [Command; 1] = [Command::new("hello", "Greet someone.", "hello [name]", hello)];
//!
//! let mut queue: InputQueue<256> = InputQueue::new();
//! let (mut keys, input) = queue.split();
//! let mut shell: Shell<Stdout> = Shell::new(Config::default(), Stdout, input).unwrap();
//! shell.register(&COMMANDS).unwrap();
//! keys.feed(b"hello rust\r");
//! shell.run_until_idle();
//! ```

pub mod builtin;
pub mod command;
pub mod context;
pub mod editor;
pub mod escape;
pub mod registry;
pub mod tokenize;

use core::fmt::{self, Write};

pub use command::{Command, CommandFlags, CommandFn, EventFn, Events};
pub use context::{Context, ContextId, RedirectInput, Slot};

use editor::{LineEditor, is_printable};
use escape::{BACKSPACE, CR, CTRL_C, CTRL_L, CTRL_N, CTRL_U, DEL, EscapeDecoder, Key, LF, TAB};
use registry::Registry;
use tokenize::tokenize;

use crate::config::Config;
use crate::input::InputConsumer;
use crate::ringbuf::RingBuffer;
use crate::terminal::{self, Printer, QuitResult, Terminal};
use crate::{Error, MAX_ARGS, MAX_BACKGROUND};

/// Processing state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Created; the next pass prints the banner.
    Init,
    /// The next pass clears the line and prints a fresh prompt.
    Reset,
    /// Input goes to the line editor, or is echoed while a foreground
    /// command runs.
    WaitInput,
    /// A redirect-capable command just took the foreground.
    RedirectInputInit,
    /// Raw input is forwarded to the foreground command.
    RedirectInput,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    command: &'static Command,
    user_data: usize,
    generation: u32,
}

/// An interactive shell session bound to one terminal.
///
/// `LINE` is the line buffer size (lines hold `LINE - 1` bytes), `INPUT`
/// the size of both the input queue and the pending ring buffer, and `CMDS`
/// the command table capacity, built-ins included.
pub struct Shell<
    'a,
    T: Terminal,
    const LINE: usize = 128,
    const INPUT: usize = 256,
    const CMDS: usize = 16,
> {
    config: Config,
    terminal: T,
    source: InputConsumer<'a, INPUT>,
    input: RingBuffer<INPUT>,
    registry: Registry<CMDS>,
    editor: LineEditor<LINE>,
    decoder: EscapeDecoder,
    state: State,
    foreground: Option<Entry>,
    background: [Option<Entry>; MAX_BACKGROUND],
    generation: u32,
    /// Bytes past the read position already echoed to a running command.
    echo_mark: usize,
    /// Bytes past the read position already handed to a redirect command.
    redirect_mark: usize,
    closing: bool,
    closed: bool,
}

impl<'a, T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize>
    Shell<'a, T, LINE, INPUT, CMDS>
{
    /// Creates a session reading from `source` and registers the built-in
    /// commands.
    ///
    /// The notification starts raised, so the first pass prints the banner
    /// and the prompt.
    ///
    /// # Errors
    ///
    /// - [`Error::LineBufferTooSmall`] if `LINE` is zero.
    /// - [`Error::InputBufferTooSmall`] if `INPUT` is below two words.
    /// - [`Error::CommandTableTooSmall`] if `CMDS` cannot hold the built-ins.
    pub fn new(config: Config, terminal: T, source: InputConsumer<'a, INPUT>) -> Result<Self, Error> {
        if LINE == 0 {
            error!("line buffer has no capacity");
            return Err(Error::LineBufferTooSmall);
        }
        if INPUT < 2 * core::mem::size_of::<u32>() {
            error!("input buffer of {} bytes is too small", INPUT);
            return Err(Error::InputBufferTooSmall);
        }
        if CMDS < builtin::COMMANDS.len() {
            error!(
                "command table of {} cannot hold {} built-ins",
                CMDS,
                builtin::COMMANDS.len()
            );
            return Err(Error::CommandTableTooSmall);
        }

        let mut shell = Self {
            config,
            terminal,
            source,
            input: RingBuffer::new(),
            registry: Registry::new(),
            editor: LineEditor::new(),
            decoder: EscapeDecoder::new(),
            state: State::Init,
            foreground: None,
            background: [None; MAX_BACKGROUND],
            generation: 0,
            echo_mark: 0,
            redirect_mark: 0,
            closing: false,
            closed: false,
        };
        shell.registry.register(&builtin::COMMANDS)?;
        shell.source.notify();
        info!("shell created for {}", shell.config.host.as_str());
        Ok(shell)
    }

    /// Registers a batch of commands.
    ///
    /// The batch is rejected as a whole on [`Error::RegistryFull`],
    /// [`Error::EmptyName`] or [`Error::DuplicateCommand`].
    pub fn register(&mut self, commands: &'static [Command]) -> Result<(), Error> {
        self.registry.register(commands)
    }

    /// Raises the notification.
    pub fn notify(&self) {
        self.source.notify();
    }

    /// Bytes received but not consumed yet, queued or pending.
    pub fn pending_input(&self) -> usize {
        self.input.size() + self.source.len()
    }

    /// Runs one pass if the notification was raised.
    pub fn poll(&mut self) -> bool {
        if self.closed || !self.source.take_notification() {
            return false;
        }
        self.process();
        true
    }

    /// Runs passes until the notification stays clear.
    pub fn run_until_idle(&mut self) {
        while self.poll() {}
    }

    /// Runs one processing pass regardless of the notification.
    pub fn process(&mut self) {
        if self.closed {
            return;
        }
        self.source.drain_into(&mut self.input);
        match self.state {
            State::Init => {
                if !self.config.welcome.is_empty() {
                    terminal::write_all(&mut self.terminal, self.config.welcome.as_bytes());
                }
                self.enter_reset();
                self.process_line_input();
            }
            State::Reset => {
                self.enter_reset();
                self.process_line_input();
            }
            State::WaitInput => self.process_line_input(),
            State::RedirectInputInit => {
                if self.enter_redirect() {
                    self.process_redirect_input();
                }
            }
            State::RedirectInput => self.process_redirect_input(),
        }
        // bytes left behind a full ring buffer need another pass once it drains
        if !self.source.is_empty() && self.input.free_size() > 0 {
            self.source.notify();
        }
    }

    /// Tokenizes `line` and dispatches it as if it had been typed.
    ///
    /// Diagnostics are printed to the terminal and returned as errors.
    pub fn run_command_str(&mut self, line: &str) -> Result<ContextId, Error> {
        if self.closed {
            return Err(Error::Closed);
        }
        let mut buf = [0u8; LINE];
        let Some(copy) = buf.get_mut(..line.len()).filter(|_| line.len() < LINE) else {
            self.report(Error::LineTooLong);
            return Err(Error::LineTooLong);
        };
        copy.copy_from_slice(line.as_bytes());
        self.run_line(copy)
    }

    /// Dispatches an already split argument vector.
    ///
    /// A trailing `&` argument runs the command in the background. Returns
    /// the id of the new context, which is already stale if the command
    /// finished synchronously.
    pub fn run_command(&mut self, args: &[&str]) -> Result<ContextId, Error> {
        self.dispatch(args)
    }

    /// Re-enters a running command, typically from a timer or another event
    /// source of the host.
    ///
    /// Returns `None` if `id` no longer names a running command.
    pub fn with_command<R, F>(&mut self, id: ContextId, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn Context) -> R,
    {
        let command = self.entry(id)?.command;
        let mut invocation = Invocation::new(self, id, command);
        let ctx: &mut dyn Context = &mut invocation;
        let result = f(ctx);
        terminal::flush(&mut self.terminal);
        Some(result)
    }

    /// Delivers `events` to a running command's event handler.
    pub fn send_event(&mut self, id: ContextId, events: Events) -> Result<(), Error> {
        if self.entry(id).is_none() {
            return Err(Error::CommandNotFound);
        }
        self.deliver(id, events);
        terminal::flush(&mut self.terminal);
        Ok(())
    }

    /// Current processing state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Content of the edit line.
    pub fn line(&self) -> &str {
        self.editor.as_str()
    }

    /// Cursor position in the edit line.
    pub fn cursor(&self) -> usize {
        self.editor.cursor()
    }

    /// Registered commands in name order.
    pub fn commands(&self) -> &[&'static Command] {
        self.registry.as_slice()
    }

    /// Looks up a registered command.
    pub fn find_command(&self, name: &str) -> Option<&'static Command> {
        self.registry.find(name)
    }

    /// The terminal.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The terminal, mutably.
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` once `exit` succeeded. A closed session ignores input.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Id of the foreground command, if one is running.
    pub fn foreground(&self) -> Option<ContextId> {
        self.foreground.map(|entry| ContextId {
            slot: Slot::Foreground,
            generation: entry.generation,
        })
    }

    /// Ids of the running background commands.
    pub fn background(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.background
            .iter()
            .zip(0u8..)
            .filter_map(|(entry, index)| {
                entry.map(|entry| ContextId {
                    slot: Slot::Background(index),
                    generation: entry.generation,
                })
            })
    }

    /// Tears the session down now. Same as dropping it.
    pub fn destroy(self) {}

    fn enter_reset(&mut self) {
        self.editor.clear();
        self.decoder.reset();
        self.echo_mark = 0;
        let _ = self
            .editor
            .render_prompt(self.config.host.as_str(), &mut Printer(&mut self.terminal));
        terminal::flush(&mut self.terminal);
        self.state = State::WaitInput;
    }

    fn process_line_input(&mut self) {
        let echo = self.foreground.is_some();
        let base = if echo { self.echo_mark } else { 0 };
        let available = self.input.size();
        if base >= available {
            return;
        }

        let mut consumed = 0;
        let mut refresh = false;
        while base + consumed < available {
            let Some(byte) = self.input.get(base + consumed) else {
                break;
            };
            consumed += 1;
            let Some(key) = self.decoder.feed(byte) else {
                continue;
            };
            if echo {
                if self.echo_key(key) {
                    refresh = true;
                    break;
                }
            } else if self.edit_key(key) {
                refresh = true;
                break;
            }
        }

        if refresh {
            self.source.notify();
        }
        terminal::flush(&mut self.terminal);
        if !echo {
            self.input.read_skip(consumed);
            self.echo_mark = 0;
        } else if self.foreground.is_some() {
            // type-ahead stays buffered until the command lets go of the terminal
            self.echo_mark = base + consumed;
        } else {
            self.echo_mark = 0;
        }
        self.terminal.input_processed();
    }

    /// Echo-only handling while a foreground command runs. Returns `true`
    /// on Ctrl-C.
    fn echo_key(&mut self, key: Key) -> bool {
        let mut out = Printer(&mut self.terminal);
        let _ = match key {
            Key::Byte(CTRL_C) => {
                let _ = out.write_str("^C");
                if let Some(id) = self.foreground() {
                    self.deliver(id, Events::INTERRUPT);
                }
                return true;
            }
            Key::Byte(LF | CR) => out.write_str("\r\n"),
            Key::Byte(BACKSPACE | DEL) => out.write_str("\x08 \x08"),
            Key::Byte(byte) if is_printable(byte) => out.write_char(char::from(byte)),
            Key::Byte(byte @ 0x01..=0x1A) => write!(out, "^{}", char::from(b'A' + byte - 1)),
            Key::Home => out.write_str("^[[H"),
            Key::End => out.write_str("^[[F"),
            Key::Left => out.write_str("^[[D"),
            Key::Right => out.write_str("^[[C"),
            Key::Up => out.write_str("^[[A"),
            Key::Down => out.write_str("^[[B"),
            Key::Delete => out.write_str("^[[3~"),
            Key::Byte(_) | Key::Unmapped | Key::Reset => Ok(()),
        };
        false
    }

    /// Line editing. Returns `true` when a dispatched command changed the
    /// session and the pass must stop.
    fn edit_key(&mut self, key: Key) -> bool {
        if matches!(key, Key::Byte(LF | CR)) {
            return self.submit_line();
        }

        let host = self.config.host.as_str();
        let mut out = Printer(&mut self.terminal);
        let editor = &mut self.editor;
        let _ = match key {
            Key::Byte(byte) if is_printable(byte) => editor.insert(byte, &mut out),
            Key::Byte(CTRL_C) => {
                let _ = out.write_str("^C\r\n");
                editor.clear();
                editor.render_prompt(host, &mut out)
            }
            Key::Byte(BACKSPACE | DEL) => editor.backspace(&mut out),
            Key::Byte(TAB) => {
                editor.complete(self.registry.iter().map(|c| c.name), host, &mut out)
            }
            Key::Byte(CTRL_L) => {
                let _ = out.write_str("\x1b[2J\x1b[H");
                editor.render_prompt(host, &mut out)
            }
            Key::Byte(CTRL_U | CTRL_N) | Key::Reset => {
                let _ = out.write_str("\x0e\r");
                editor.clear();
                editor.render_prompt(host, &mut out)
            }
            Key::Home => editor.home(&mut out),
            Key::End => editor.end(&mut out),
            Key::Left => editor.left(&mut out),
            Key::Right => editor.right(&mut out),
            Key::Delete => editor.delete(&mut out),
            // no history
            Key::Up | Key::Down => Ok(()),
            Key::Byte(_) | Key::Unmapped => Ok(()),
        };
        false
    }

    fn submit_line(&mut self) -> bool {
        terminal::write_all(&mut self.terminal, b"\r\n");
        let mut line = [0u8; LINE];
        let len = self.editor.len();
        line[..len].copy_from_slice(self.editor.as_bytes());
        self.editor.clear();
        if len > 0 && self.run_line(&mut line[..len]).is_ok() {
            return true;
        }
        self.decoder.reset();
        let _ = self
            .editor
            .render_prompt(self.config.host.as_str(), &mut Printer(&mut self.terminal));
        false
    }

    fn enter_redirect(&mut self) -> bool {
        let accepted = match self.foreground {
            None => {
                warn!("redirect input without a foreground command");
                false
            }
            Some(entry) if !entry.command.redirects_input() => {
                warn!("command {} does not take redirected input", entry.command.name);
                false
            }
            Some(entry) => {
                debug!("redirecting input to {}", entry.command.name);
                true
            }
        };
        if !accepted {
            self.state = State::Reset;
            self.source.notify();
            return false;
        }
        self.editor.clear();
        self.decoder.reset();
        self.redirect_mark = 0;
        self.state = State::RedirectInput;
        true
    }

    fn process_redirect_input(&mut self) {
        let Some(id) = self.foreground() else {
            self.state = State::Reset;
            self.source.notify();
            return;
        };
        let available = self.input.size();
        if self.redirect_mark >= available {
            return;
        }

        let mut interrupted = false;
        while self.redirect_mark < available {
            let Some(byte) = self.input.get(self.redirect_mark) else {
                break;
            };
            self.redirect_mark += 1;
            if self.decoder.feed(byte) == Some(Key::Byte(CTRL_C)) {
                interrupted = true;
                break;
            }
        }

        let mut events = Events::INPUT_DATA;
        if interrupted {
            events |= Events::INTERRUPT;
        }
        self.deliver(id, events);

        let mark = core::mem::take(&mut self.redirect_mark);
        self.input.read_skip(mark);
        if interrupted {
            self.source.notify();
        }
        if self.state != State::RedirectInput {
            debug!("redirect mode left");
        }
        terminal::flush(&mut self.terminal);
        self.terminal.input_processed();
    }

    fn run_line(&mut self, line: &mut [u8]) -> Result<ContextId, Error> {
        let args = tokenize(line).map_err(|err| {
            self.report(err);
            err
        })?;
        self.dispatch(&args)
    }

    fn report(&mut self, err: Error) {
        let mut out = Printer(&mut self.terminal);
        let _ = match err {
            Error::TooManyArguments => write!(
                out,
                "shell: too many arguments, limit is {}\r\n",
                MAX_ARGS
            ),
            Error::UnterminatedQuote => out.write_str("shell: unterminated quote\r\n"),
            Error::LineTooLong => out.write_str("shell: line too long\r\n"),
            Error::InvalidEncoding => out.write_str("shell: invalid encoding\r\n"),
            _ => Ok(()),
        };
        terminal::flush(&mut self.terminal);
    }

    fn dispatch(&mut self, args: &[&str]) -> Result<ContextId, Error> {
        if self.closed {
            return Err(Error::Closed);
        }
        let Some(&name) = args.first() else {
            return Err(Error::EmptyCommand);
        };
        let Some(command) = self.registry.find(name) else {
            let _ = write!(
                Printer(&mut self.terminal),
                "shell: command not found: {}\r\n",
                name
            );
            terminal::flush(&mut self.terminal);
            return Err(Error::CommandNotFound);
        };
        let (args, background) = match args {
            [rest @ .., last] if !rest.is_empty() && *last == "&" => (rest, true),
            _ => (args, false),
        };

        let id = self.attach(command, background)?;
        debug!("running {} (background: {})", command.name, background);
        let mut invocation = Invocation::new(self, id, command);
        (command.handler)(&mut invocation, args);
        terminal::flush(&mut self.terminal);
        Ok(id)
    }

    fn attach(&mut self, command: &'static Command, background: bool) -> Result<ContextId, Error> {
        let generation = self.generation.wrapping_add(1);
        let entry = Entry {
            command,
            user_data: 0,
            generation,
        };

        let slot = if background {
            let Some(index) = self.background.iter().position(Option::is_none) else {
                let _ = write!(
                    Printer(&mut self.terminal),
                    "shell: background slots exhausted ({}), cannot start {}\r\n",
                    MAX_BACKGROUND,
                    command.name
                );
                terminal::flush(&mut self.terminal);
                return Err(Error::BackgroundFull);
            };
            self.background[index] = Some(entry);
            // A running foreground command keeps the session as it is.
            if self.foreground.is_none() {
                self.state = State::Reset;
                self.source.notify();
            }
            // MAX_BACKGROUND fits in a u8
            Slot::Background(index as u8)
        } else {
            if let Some(running) = self.foreground {
                let _ = write!(
                    Printer(&mut self.terminal),
                    "shell: command {} is already running, cannot start {}\r\n",
                    running.command.name,
                    command.name
                );
                terminal::flush(&mut self.terminal);
                return Err(Error::ForegroundBusy);
            }
            self.foreground = Some(entry);
            if command.redirects_input() {
                self.state = State::RedirectInputInit;
                self.source.notify();
            }
            Slot::Foreground
        };

        self.generation = generation;
        Ok(ContextId { slot, generation })
    }

    fn entry(&self, id: ContextId) -> Option<&Entry> {
        let entry = match id.slot {
            Slot::Foreground => self.foreground.as_ref(),
            Slot::Background(index) => self.background.get(usize::from(index))?.as_ref(),
        };
        entry.filter(|entry| entry.generation == id.generation)
    }

    fn entry_mut(&mut self, id: ContextId) -> Option<&mut Entry> {
        let entry = match id.slot {
            Slot::Foreground => self.foreground.as_mut(),
            Slot::Background(index) => self.background.get_mut(usize::from(index))?.as_mut(),
        };
        entry.filter(|entry| entry.generation == id.generation)
    }

    fn deliver(&mut self, id: ContextId, events: Events) {
        let Some(command) = self.entry(id).map(|entry| entry.command) else {
            return;
        };
        if let Some(handler) = command.event_handler {
            let mut invocation = Invocation::new(self, id, command);
            handler(&mut invocation, events);
        }
    }

    fn release(&mut self, id: ContextId) {
        if self.entry(id).is_none() {
            warn!("finish on a context that is no longer running");
            return;
        }
        match id.slot {
            Slot::Background(index) => {
                if let Some(slot) = self.background.get_mut(usize::from(index)) {
                    *slot = None;
                }
            }
            Slot::Foreground => {
                self.foreground = None;
                if !self.closing {
                    self.state = State::Reset;
                    self.source.notify();
                }
            }
        }
    }

    fn redirect_input(&self, id: ContextId) -> Option<RedirectInput<'_>> {
        if self.state != State::RedirectInput
            || id.slot != Slot::Foreground
            || self.entry(id).is_none()
        {
            return None;
        }
        let head = self.input.peek(0);
        let head = &head[..head.len().min(self.redirect_mark)];
        let tail = self.input.peek(head.len());
        let tail = &tail[..tail.len().min(self.redirect_mark - head.len())];
        Some(RedirectInput { head, tail })
    }

    fn request_quit(&mut self) -> QuitResult {
        let result = self.terminal.quit();
        if result == QuitResult::Success {
            info!("host accepted quit, shell closed");
            self.closed = true;
        }
        result
    }

    fn teardown(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        for index in 0..MAX_BACKGROUND {
            let Some(entry) = self.background[index] else {
                continue;
            };
            let id = ContextId {
                slot: Slot::Background(index as u8),
                generation: entry.generation,
            };
            self.deliver(id, Events::SHELL_EXIT);
            self.background[index] = None;
        }
        if let Some(id) = self.foreground() {
            self.deliver(id, Events::SHELL_EXIT);
            self.foreground = None;
        }
        terminal::flush(&mut self.terminal);
        info!("shell for {} destroyed", self.config.host.as_str());
    }
}

impl<T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize> Drop
    for Shell<'_, T, LINE, INPUT, CMDS>
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize> fmt::Debug
    for Shell<'_, T, LINE, INPUT, CMDS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("host", &self.config.host.as_str())
            .field("state", &self.state)
            .field("line", &self.editor.as_str())
            .field("input", &self.input)
            .field("queued", &self.source.len())
            .field("foreground", &self.foreground())
            .field("background", &self.background().count())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// The [`Context`] handed to command handlers.
struct Invocation<'a, 's, T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize> {
    shell: &'a mut Shell<'s, T, LINE, INPUT, CMDS>,
    id: ContextId,
    command: &'static Command,
    finished: bool,
}

impl<'a, 's, T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize>
    Invocation<'a, 's, T, LINE, INPUT, CMDS>
{
    fn new(
        shell: &'a mut Shell<'s, T, LINE, INPUT, CMDS>,
        id: ContextId,
        command: &'static Command,
    ) -> Self {
        Self {
            shell,
            id,
            command,
            finished: false,
        }
    }
}

impl<T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize> fmt::Write
    for Invocation<'_, '_, T, LINE, INPUT, CMDS>
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        terminal::write_all(&mut self.shell.terminal, s.as_bytes());
        Ok(())
    }
}

impl<T: Terminal, const LINE: usize, const INPUT: usize, const CMDS: usize> Context
    for Invocation<'_, '_, T, LINE, INPUT, CMDS>
{
    fn id(&self) -> ContextId {
        self.id
    }

    fn command(&self) -> &'static Command {
        self.command
    }

    fn host(&self) -> &str {
        self.shell.config.host.as_str()
    }

    fn user_data(&self) -> usize {
        self.shell.entry(self.id).map_or(0, |entry| entry.user_data)
    }

    fn set_user_data(&mut self, data: usize) {
        if let Some(entry) = self.shell.entry_mut(self.id) {
            entry.user_data = data;
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        terminal::write_all(&mut self.shell.terminal, bytes);
    }

    fn flush(&mut self) {
        terminal::flush(&mut self.shell.terminal);
    }

    fn commands(&self) -> &[&'static Command] {
        self.shell.registry.as_slice()
    }

    fn find_command(&self, name: &str) -> Option<&'static Command> {
        self.shell.registry.find(name)
    }

    fn redirect_input(&self) -> Option<RedirectInput<'_>> {
        self.shell.redirect_input(self.id)
    }

    fn request_quit(&mut self) -> QuitResult {
        self.shell.request_quit()
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.shell.release(self.id);
    }

    fn is_finished(&self) -> bool {
        self.finished || self.shell.entry(self.id).is_none()
    }

    fn is_detached(&self) -> bool {
        self.shell.closing
    }
}
