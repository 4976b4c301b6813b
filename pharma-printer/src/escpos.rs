//! ESC/POS invoice bytes
//!
//! Receipt printers in the warehouse take Arabic text in Windows-1256, so
//! the builder selects that table up front and transcodes on `build`.

use crate::encoding::{encode_escpos, pad_width};

/// `ESC t` table number of the WPC1256 (Arabic) code page
pub const CODE_PAGE_WPC1256: u8 = 50;

/// ESC/POS command builder
///
/// Text is buffered as UTF-8 and converted to the selected code page by
/// [`EscPosBuilder::build`].
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    code_page: u8,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self {
            buf,
            width,
            code_page: CODE_PAGE_WPC1256,
        }
    }

    /// Use another `ESC t` code page table
    pub fn with_code_page(mut self, code_page: u8) -> Self {
        self.code_page = code_page;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print a row of fixed-width cells, each right aligned
    pub fn columns(&mut self, cells: &[&str], widths: &[usize]) -> &mut Self {
        let row: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad_width(cell, *w, true))
            .collect();
        self.line(&row.join(" "))
    }

    // === Paper Control ===

    /// Full cut after feeding n lines (GS V 66 n)
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    /// Build the final byte buffer in the selected code page
    pub fn build(self) -> Vec<u8> {
        encode_escpos(&self.buf, self.code_page)
    }

    /// Build without code page conversion (UTF-8 text, for debugging)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
