use std::error::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

use crate::language_utils;
use crate::run_context::RunContext;

// @module: Human-readable status panels

/// Console presentation of a run
///
/// Implementations must never fail: a broken terminal must not change the
/// outcome of the pipeline.
pub trait Reporter {
    /// Title panel shown first
    fn render_header(&mut self, title: &str);

    /// Summary of the consumed configuration
    fn render_config(&mut self, target_lang: &str, sheets: &[String], batch_size: usize);

    /// Completion panel pointing at the run's log and status files
    fn render_success(&mut self, context: &RunContext);

    /// Operator cancelled the run
    fn render_interrupt(&mut self);

    /// Run failed with `error`
    fn render_fatal(&mut self, error: &dyn Error);
}

/// Border color of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Cyan,
    Yellow,
    Green,
    Red,
}

impl PanelStyle {
    fn ansi(self) -> &'static str {
        match self {
            Self::Cyan => "\x1B[36m",
            Self::Yellow => "\x1B[33m",
            Self::Green => "\x1B[32m",
            Self::Red => "\x1B[31m",
        }
    }
}

const RESET: &str = "\x1B[0m";

/// A bordered block of text
#[derive(Debug, Clone)]
pub struct Panel {
    title: Option<String>,
    lines: Vec<String>,
    style: PanelStyle,
}

impl Panel {
    pub fn new(style: PanelStyle) -> Self {
        Self {
            title: None,
            lines: Vec::new(),
            style,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a line; embedded newlines start new panel lines
    pub fn line(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        if line.contains('\n') {
            self.lines
                .extend(line.lines().map(|l| l.trim_end_matches('\r').to_string()));
        } else {
            self.lines.push(line);
        }
        self
    }

    /// Render with rounded borders, colored when `color` is set
    pub fn render(&self, color: bool) -> String {
        let title_width = self.title.as_deref().map_or(0, |t| t.width() + 2);
        let inner = self
            .lines
            .iter()
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .max(title_width)
            + 2;

        let (open, close) = if color {
            (self.style.ansi(), RESET)
        } else {
            ("", "")
        };

        let mut out = String::new();

        let top = match &self.title {
            Some(title) => {
                let rest = inner - title.width() - 2;
                let left = rest / 2;
                format!(
                    "╭{} {} {}╮",
                    "─".repeat(left),
                    title,
                    "─".repeat(rest - left)
                )
            }
            None => format!("╭{}╮", "─".repeat(inner)),
        };
        out.push_str(&format!("{}{}{}\n", open, top, close));

        for line in &self.lines {
            let pad = inner - 2 - line.width();
            out.push_str(&format!(
                "{}│{} {}{} {}│{}\n",
                open,
                close,
                line,
                " ".repeat(pad),
                open,
                close
            ));
        }

        out.push_str(&format!("{}╰{}╯{}\n", open, "─".repeat(inner), close));
        out
    }
}

/// Reporter drawing panels on any writer
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter on standard output
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, panel: Panel) {
        let rendered = panel.render(self.color);
        let _ = self.out.write_all(rendered.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn render_header(&mut self, title: &str) {
        self.print(Panel::new(PanelStyle::Cyan).line(format!("🌐 {}", title)));
    }

    fn render_config(&mut self, target_lang: &str, sheets: &[String], batch_size: usize) {
        let target = match language_utils::get_language_name(target_lang) {
            Ok(name) => format!("{} ({})", target_lang, name),
            Err(_) => target_lang.to_string(),
        };

        self.print(
            Panel::new(PanelStyle::Yellow)
                .title("Configuration")
                .line(format!("Target Language: {}", target))
                .line(format!("Sheets to Translate: {}", sheets.join(", ")))
                .line(format!("Batch Size: {}", batch_size)),
        );
    }

    fn render_success(&mut self, context: &RunContext) {
        self.print(
            Panel::new(PanelStyle::Green)
                .line("✅ Translation pipeline completed successfully!")
                .line(format!("Log file: {}", context.log_file_path.display()))
                .line(format!("Status file: {}", context.keys_log_path.display())),
        );
    }

    fn render_interrupt(&mut self) {
        self.print(Panel::new(PanelStyle::Yellow).line("⚠️  Translation interrupted by user"));
    }

    fn render_fatal(&mut self, error: &dyn Error) {
        self.print(Panel::new(PanelStyle::Red).line(format!("❌ Fatal error: {}", error)));
    }
}
