// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::charset::Charset;
use crate::driver::{CancelToken, RenderSink};
use crate::error::Result;
use crate::frame::{Frame, Viewport};
use crate::palette::{caption_color, over_black, quantize};
use crate::runtime::ColorMode;
use crate::trail::TrailPoint;

pub struct Terminal {
    stdout: Stdout,
    last: Option<Frame>,
    restored: bool,
}

impl Terminal {
    pub fn new() -> std::io::Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: std::io::Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            restored: false,
        })
    }

    pub fn size(&self) -> std::io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> std::io::Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> std::io::Result<Event> {
        event::read()
    }

    /// Forgets what is on screen so the next draw repaints every cell.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Writes the cells that differ from the previous draw.
    pub fn draw(&mut self, frame: &Frame) -> std::io::Result<()> {
        let full = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);
        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_bold = false;
        let mut cur_pos: Option<(u16, u16)> = None;

        for y in 0..frame.height {
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                let prev = self
                    .last
                    .as_ref()
                    .filter(|_| !full)
                    .map(|l| l.cell_at_index(idx));
                if prev == Some(cell) || (full && cell == Cell::BLANK) {
                    continue;
                }

                if cur_pos != Some((x, y)) {
                    self.stdout.queue(cursor::MoveTo(x, y))?;
                }
                if cur_fg != Some(cell.fg) {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = Some(cell.fg);
                }
                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }
                self.stdout.queue(Print(cell.ch))?;
                cur_pos = if x + 1 < frame.width {
                    Some((x + 1, y))
                } else {
                    None
                };
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        if full {
            self.last = Some(frame.clone());
        } else if let Some(l) = self.last.as_mut() {
            l.clone_from(frame);
        }
        Ok(())
    }

    pub fn restore(&mut self) -> std::io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.stdout.execute(SetAttribute(Attribute::Reset))?;
        self.stdout.execute(ResetColor)?;
        self.stdout.execute(cursor::Show)?;
        self.stdout.execute(terminal::EnableLineWrap)?;
        self.stdout.execute(terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if !self.restored {
            restore_terminal_best_effort();
        }
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Keys that end the animation.
fn is_close_key(code: KeyCode, mods: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => mods.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Draws trail points as colored glyphs on the terminal.
pub struct TerminalSink {
    term: Terminal,
    frame: Frame,
    view: Viewport,
    color_mode: ColorMode,
    charset: Charset,
    cancel: CancelToken,
}

impl TerminalSink {
    pub fn new(color_mode: ColorMode, charset: Charset, cancel: CancelToken) -> Result<Self> {
        let term = Terminal::new()?;
        let (w, h) = term.size()?;
        Ok(Self {
            term,
            frame: Frame::new(w, h),
            view: Viewport::default(),
            color_mode,
            charset,
            cancel,
        })
    }

    fn rasterize(&mut self, points: &[TrailPoint], caption: &str) {
        self.frame.clear();
        for p in points {
            let Some((x, y)) = self.frame.project(&self.view, p.x, p.y) else {
                continue;
            };
            let fg = quantize(self.color_mode, over_black(p.rgba));
            let cell = Cell::glyph(self.charset.glyph_for(p.size), fg);
            self.frame.plot(x, y, cell, p.rgba[3] as f32);
        }
        let caption_cell = Cell {
            ch: ' ',
            fg: caption_color(self.color_mode),
            bold: true,
        };
        self.frame.put_centered(0, caption, caption_cell);
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press && is_close_key(k.code, k.modifiers) => {
                log::debug!("close requested from keyboard");
                self.cancel.cancel();
            }
            Event::Resize(w, h) => {
                self.frame = Frame::new(w, h);
                self.term.invalidate();
            }
            _ => {}
        }
    }
}

impl RenderSink for TerminalSink {
    fn present_frame(&mut self, points: &[TrailPoint], caption: &str) -> Result<()> {
        self.rasterize(points, caption);
        self.term.draw(&self.frame)?;
        Ok(())
    }

    fn pause(&mut self, interval: Duration) -> Result<()> {
        let deadline = Instant::now() + interval;
        loop {
            let now = Instant::now();
            if now >= deadline || self.cancel.is_cancelled() {
                return Ok(());
            }
            if Terminal::poll_event(deadline - now)? {
                let ev = Terminal::read_event()?;
                self.handle_event(ev);
            }
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        self.term.restore()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_keys() {
        assert!(is_close_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_close_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_close_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_close_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_close_key(KeyCode::Char(' '), KeyModifiers::NONE));
    }
}
