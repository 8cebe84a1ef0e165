use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Output mode, carried explicitly to every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn print<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        if self.json {
            let s = serde_json::to_string_pretty(value)?;
            println!("{s}");
            return Ok(());
        }
        let mut out = stdout();
        print_human(&mut out, &serde_json::to_value(value)?, 0)?;
        Ok(())
    }

    /// Highlighted one-line status for humans; suppressed in JSON mode.
    pub fn headline(&self, msg: &str) {
        if self.json {
            return;
        }
        let mut out = stdout();
        let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = writeln!(out, "{msg}");
        let _ = out.reset();
    }

    pub fn error<T: Serialize>(&self, value: &T, msg: &str) {
        if self.json {
            if let Ok(s) = serde_json::to_string_pretty(value) {
                println!("{s}");
            }
            return;
        }
        let mut err = StandardStream::stderr(ColorChoice::Auto);
        let _ = err.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(err, "error: ");
        let _ = err.reset();
        let _ = writeln!(err, "{msg}");
    }
}

fn print_human(out: &mut StandardStream, value: &Value, indent: usize) -> io::Result<()> {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if v.is_null() {
                    continue;
                }
                out.set_color(ColorSpec::new().set_bold(true))?;
                write!(out, "{pad}{k}:")?;
                out.reset()?;
                if v.is_object() || v.is_array() {
                    writeln!(out)?;
                    print_human(out, v, indent + 1)?;
                } else {
                    writeln!(out, " {}", scalar(v))?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if item.is_object() {
                    writeln!(out, "{pad}-")?;
                    print_human(out, item, indent + 1)?;
                } else {
                    writeln!(out, "{pad}- {}", scalar(item))?;
                }
            }
        }
        other => writeln!(out, "{pad}{}", scalar(other))?,
    }
    Ok(())
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
