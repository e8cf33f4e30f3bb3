//! Mochi Input Replay
//!
//! Feeds a JSON script of input events through the input bridge and prints
//! the bytes each event sends to the terminal session.

use std::io::{self, Read};
use std::process::ExitCode;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mochi_input::core::escape_bytes;
use mochi_input::gesture::{GestureEvent, GesturePhase};
use mochi_input::input::PageDirection;
use mochi_input::{
    InputBridge, InputConfig, Key, MemoryClipboard, MenuItem, ModeFlags, Modifiers, MouseEncoding, MouseMode,
    TerminalSession, TextRange,
};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut script_file: Option<String> = None;
    let mut config_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                if script_file.is_none() && !args[i].starts_with('-') {
                    script_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match &config_file {
        Some(path) => match InputConfig::load(std::path::Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => InputConfig::load_or_default(),
    };

    let script = match read_script(script_file.as_deref()) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    let steps = replay(script, config);

    match output_format {
        OutputFormat::Text => {
            for step in &steps {
                if step.sent.is_empty() {
                    println!("{:>4}  {:<14} -", step.index, step.event);
                }
                for unit in &step.sent {
                    println!("{:>4}  {:<14} {}", step.index, step.event, unit);
                }
            }
        },
        OutputFormat::Json => match serde_json::to_string_pretty(&steps) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

/// Replay script
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_rows")]
    rows: usize,
    /// Rows of screen text, used for word selection and copy
    #[serde(default)]
    screen: Vec<String>,
    #[serde(default)]
    clipboard: Option<String>,
    events: Vec<ScriptEvent>,
}

fn default_cols() -> usize {
    80
}

fn default_rows() -> usize {
    24
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScriptEvent {
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Text {
        text: String,
    },
    DeleteBackward,
    Marked {
        text: String,
        #[serde(default)]
        selected: Option<(usize, usize)>,
    },
    Unmark,
    Gesture {
        phase: GesturePhase,
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Menu {
        item: MenuItem,
    },
    /// DECSET
    SetMode {
        mode: u16,
    },
    /// DECRST
    ResetMode {
        mode: u16,
    },
    Control,
}

impl ScriptEvent {
    fn name(&self) -> &'static str {
        match self {
            ScriptEvent::Key { .. } => "key",
            ScriptEvent::Text { .. } => "text",
            ScriptEvent::DeleteBackward => "delete_backward",
            ScriptEvent::Marked { .. } => "marked",
            ScriptEvent::Unmark => "unmark",
            ScriptEvent::Gesture { .. } => "gesture",
            ScriptEvent::Menu { .. } => "menu",
            ScriptEvent::SetMode { .. } => "set_mode",
            ScriptEvent::ResetMode { .. } => "reset_mode",
            ScriptEvent::Control => "control",
        }
    }
}

/// Bytes sent while replaying one event
#[derive(Debug, Serialize)]
struct Step {
    index: usize,
    event: &'static str,
    sent: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_script(path: Option<&str>) -> Result<Script, ReplayError> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            content
        },
    };
    Ok(serde_json::from_str(&content)?)
}

/// Session that records sent bytes and serves fixed screen text
#[derive(Debug)]
struct ReplaySession {
    modes: ModeFlags,
    screen: Vec<String>,
    sent: Vec<Vec<u8>>,
}

impl ReplaySession {
    /// Apply a DEC private mode set (CSI ? Ps h) or reset (CSI ? Ps l).
    /// Modes that do not affect input encoding are ignored.
    fn set_dec_mode(&mut self, mode: u16, enable: bool) {
        let modes = &mut self.modes;
        match mode {
            1 => modes.application_cursor = enable,
            9 | 1000 | 1002 | 1003 if !enable => modes.mouse_mode = MouseMode::Off,
            9 => modes.mouse_mode = MouseMode::X10,
            1000 => modes.mouse_mode = MouseMode::Normal,
            1002 => modes.mouse_mode = MouseMode::ButtonMotion,
            1003 => modes.mouse_mode = MouseMode::AnyMotion,
            1005 | 1006 | 1015 if !enable => modes.mouse_encoding = MouseEncoding::X10,
            1005 => modes.mouse_encoding = MouseEncoding::Utf8,
            1006 => modes.mouse_encoding = MouseEncoding::Sgr,
            1015 => modes.mouse_encoding = MouseEncoding::Urxvt,
            2004 => modes.bracketed_paste = enable,
            _ => tracing::debug!(mode, "mode ignored"),
        }
    }
}

impl TerminalSession for ReplaySession {
    fn send(&mut self, bytes: &[u8]) {
        self.sent.push(bytes.to_vec());
    }

    fn modes(&self) -> ModeFlags {
        self.modes
    }

    fn row_text(&self, row: usize) -> Option<String> {
        self.screen.get(row).cloned()
    }

    fn scroll_page(&mut self, direction: PageDirection) {
        tracing::info!(?direction, "local page scroll");
    }

    fn reset(&mut self) {
        self.modes = ModeFlags::with_size(self.modes.cols, self.modes.rows);
    }
}

fn replay(script: Script, config: InputConfig) -> Vec<Step> {
    let session = ReplaySession {
        modes: ModeFlags::with_size(script.cols, script.rows),
        screen: script.screen,
        sent: Vec::new(),
    };
    let clipboard = script.clipboard.map(MemoryClipboard::with_text).unwrap_or_default();
    let mut bridge = InputBridge::new(session, config).with_clipboard(Box::new(clipboard));
    bridge.set_focused(true);

    let mut steps = Vec::with_capacity(script.events.len());
    for (index, event) in script.events.into_iter().enumerate() {
        let name = event.name();
        match event {
            ScriptEvent::Key { key, modifiers } => {
                bridge.key_down(key, modifiers);
            },
            ScriptEvent::Text { text } => bridge.insert_text(&text),
            ScriptEvent::DeleteBackward => bridge.delete_backward(),
            ScriptEvent::Marked { text, selected } => {
                let len = text.chars().count();
                let (start, end) = selected.unwrap_or((len, len));
                bridge.set_marked_text(&text, TextRange::new(start, end));
            },
            ScriptEvent::Unmark => bridge.unmark_text(),
            ScriptEvent::Gesture { phase, x, y, modifiers } => {
                bridge.gesture(GestureEvent { phase, x, y, modifiers });
            },
            ScriptEvent::Menu { item } => bridge.menu_action(item),
            ScriptEvent::SetMode { mode } => bridge.session_mut().set_dec_mode(mode, true),
            ScriptEvent::ResetMode { mode } => bridge.session_mut().set_dec_mode(mode, false),
            ScriptEvent::Control => bridge.arm_control(),
        }
        bridge.run_refresh();

        let sent = std::mem::take(&mut bridge.session_mut().sent);
        steps.push(Step {
            index,
            event: name,
            sent: sent.iter().map(|bytes| escape_bytes(bytes)).collect(),
        });
    }
    steps
}

fn print_help() {
    println!("Mochi Input Replay");
    println!();
    println!("Replays a JSON script of input events and prints the bytes sent");
    println!("to the terminal session for each event.");
    println!();
    println!("USAGE:");
    println!("    mochi-input-replay [OPTIONS] [SCRIPT]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>  Input config (default: ~/.config/mochi/input.json)");
    println!("    -j, --json           Output as JSON");
    println!("    -t, --text           Output as text (default)");
    println!("    -h, --help           Show this help message");
    println!();
    println!("If no script is given, it is read from stdin.");
    println!();
    println!("SCRIPT FORMAT:");
    println!(r#"    {{ "cols": 80, "rows": 24, "events": ["#);
    println!(r#"        {{ "type": "set_mode", "mode": 1 }},"#);
    println!(r#"        {{ "type": "key", "key": "Up" }},"#);
    println!(r#"        {{ "type": "text", "text": "ls\n" }}"#);
    println!(r#"    ] }}"#);
}
