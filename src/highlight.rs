use inksac::prelude::*;

/// Colours the shell's own diagnostics. Command output is never touched.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    color_support: ColorSupport,
    quiet: bool,
}

impl Diagnostics {
    pub fn new(quiet: bool) -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
            quiet,
        }
    }

    pub fn error(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.paint_error(message));
        }
    }

    pub fn hint(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.paint_hint(message));
        }
    }

    pub fn paint_error(&self, error: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return error.to_string();
        }

        let error_style = Style::builder()
            .foreground(Color::Red)
            .bold()
            .build();

        error.style(error_style).to_string()
    }

    pub fn paint_hint(&self, hint: &str) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();

        hint.style(hint_style).to_string()
    }
}
