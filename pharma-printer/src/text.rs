//! Plain text layout for invoices
//!
//! Produces UTF-8 text laid out for right-to-left reading: lines are right
//! aligned to the paper width unless centered explicitly.

use crate::encoding::{pad_width, text_width};

/// Plain text builder
pub struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Right-aligned line
    pub fn line(&mut self, s: &str) -> &mut Self {
        let padded = if text_width(s) >= self.width {
            s.to_string()
        } else {
            pad_width(s, self.width, true)
        };
        self.buf.push_str(&padded);
        self.buf.push('\n');
        self
    }

    /// Centered line
    pub fn center(&mut self, s: &str) -> &mut Self {
        let w = text_width(s);
        if w < self.width {
            self.buf.push_str(&" ".repeat((self.width - w) / 2));
        }
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn sep_double(&mut self) -> &mut Self {
        self.buf.push_str(&"=".repeat(self.width));
        self.buf.push('\n');
        self
    }

    pub fn sep_single(&mut self) -> &mut Self {
        self.buf.push_str(&"-".repeat(self.width));
        self.buf.push('\n');
        self
    }

    /// Row of fixed-width cells, each right aligned
    pub fn columns(&mut self, cells: &[&str], widths: &[usize]) -> &mut Self {
        let row: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad_width(cell, *w, true))
            .collect();
        self.line(&row.join(" "))
    }

    pub fn build(self) -> String {
        self.buf
    }
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new(80)
    }
}
