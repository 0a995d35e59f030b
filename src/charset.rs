// Copyright (c) 2026 rezky_nightky

/// Glyph ramps for trail points, smallest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Unicode,
    Ascii,
}

const UNICODE_RAMP: [char; 4] = ['·', '∙', '•', '●'];
const ASCII_RAMP: [char; 4] = ['.', ':', 'o', 'O'];

/// Upper size bound of every ramp step except the last.
const SIZE_STEPS: [f64; 3] = [2.0, 8.0, 30.0];

impl Charset {
    pub fn ramp(self) -> &'static [char; 4] {
        match self {
            Charset::Unicode => &UNICODE_RAMP,
            Charset::Ascii => &ASCII_RAMP,
        }
    }

    /// Glyph for a point of the given area.
    pub fn glyph_for(self, size: f64) -> char {
        let step = SIZE_STEPS.iter().take_while(|&&s| size >= s).count();
        self.ramp()[step]
    }
}

pub fn charset_from_str(spec: &str, default_to_ascii: bool) -> Result<Charset, String> {
    match spec.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(if default_to_ascii {
            Charset::Ascii
        } else {
            Charset::Unicode
        }),
        "unicode" | "utf8" | "utf-8" => Ok(Charset::Unicode),
        "ascii" => Ok(Charset::Ascii),
        _ => Err(format!(
            "invalid charset: {} (allowed: auto, unicode, ascii)",
            spec
        )),
    }
}
