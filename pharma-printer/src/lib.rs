//! # pharma-printer
//!
//! Low-level invoice printing: layout builders and printer transport.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Plain text layout with right-to-left alignment
//! - ESC/POS command building
//! - Windows-1256 encoding for Arabic thermal printers
//! - Network printing (TCP port 9100)
//!
//! What goes on an invoice is decided by `pharma-client`.
//!
//! ## Example
//!
//! ```ignore
//! use pharma_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("فاتورة بيع");
//! builder.reset_size();
//! builder.sep_double();
//! builder.right();
//! builder.line("رقم الطلب: 123");
//! builder.cut_feed(3);
//!
//! let printer = NetworkPrinter::from_addr("192.168.1.100:9100")?;
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;
mod text;

// Re-exports
pub use encoding::{encode_cp1256, encode_escpos, pad_width, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{CODE_PAGE_WPC1256, EscPosBuilder};
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer};
pub use text::TextBuilder;
