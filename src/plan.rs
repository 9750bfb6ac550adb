//! Explain-plan rendering.
//!
//! Functions render themselves into a [`PlanSink`]; composite functions
//! delegate to their arguments so the text nests the same way the
//! expression tree does.

use crate::function::Function;

/// Accumulates the textual plan of an expression.
#[derive(Debug, Default, Clone)]
pub struct PlanSink {
    text: String,
}

impl PlanSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain string.
    pub fn val(&mut self, s: &str) -> &mut Self {
        self.text.push_str(s);
        self
    }

    pub fn ch(&mut self, c: char) -> &mut Self {
        self.text.push(c);
        self
    }

    /// Append a function's own rendering.
    pub fn func(&mut self, function: &dyn Function) -> &mut Self {
        function.to_plan(self);
        self
    }

    /// Append a single-quoted string literal, doubling embedded quotes.
    pub fn quoted(&mut self, s: &str) -> &mut Self {
        self.text.push('\'');
        for c in s.chars() {
            if c == '\'' {
                self.text.push('\'');
            }
            self.text.push(c);
        }
        self.text.push('\'');
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Render a function's plan into a fresh string.
pub fn explain(function: &dyn Function) -> String {
    let mut sink = PlanSink::new();
    sink.func(function);
    sink.text
}
