//! Result rendering: tracing events by default, JSON on stdout with `--json`.

use serde::Serialize;

/// How command results reach the user.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    pub const fn is_json(self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON on stdout.
    #[allow(clippy::print_stdout)]
    pub fn json<T: Serialize>(self, value: &T) -> Result<(), serde_json::Error> {
        let rendered = serde_json::to_string_pretty(value)?;
        println!("{rendered}");
        Ok(())
    }
}
