//! Invoice composition
//!
//! [`Invoice::compose`] turns the invoice lines fetched for an order into a
//! layout-independent document: metadata lines, a right-to-left table and
//! decimal totals. Renderers turn that into bytes.

use pharma_printer::{EscPosBuilder, Printer, TextBuilder};
use rust_decimal::Decimal;
use shared::models::InvoiceItem;
use tracing::{info, instrument};

use crate::orders::format_order_date;
use crate::{ClientError, ClientResult};

const CURRENCY: &str = "ج.م";

/// Column headings in reading order; rendered reversed
const COLUMNS: [&str; 7] = [
    "م",
    "الصنف",
    "الكمية",
    "السعر (ج.م)",
    "الخصم %",
    "القيمة قبل الخصم",
    "القيمة بعد الخصم",
];

fn money(d: Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

/// Sums over all invoice lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvoiceTotals {
    pub before_discount: Decimal,
    pub discount: Decimal,
    pub after_discount: Decimal,
}

/// Printable invoice for one order
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub order_id: i64,
    /// Display date, with the Arabic fallbacks for missing or bad dates
    pub order_date: String,
    pub warehouse_name: String,
    pub pharmacy_name: String,
    pub pharmacy_number: String,
    pub pharmacy_address: String,
    pub items: Vec<InvoiceItem>,
    pub totals: InvoiceTotals,
}

impl Invoice {
    pub const TITLE: &'static str = "Pharma At Once";
    pub const SUBTITLE: &'static str = "فاتورة بيع";

    /// Build an invoice; pharmacy and warehouse details come from the first line
    pub fn compose(
        order_id: i64,
        order_date: Option<&str>,
        items: Vec<InvoiceItem>,
    ) -> ClientResult<Self> {
        let Some(first) = items.first() else {
            return Err(ClientError::NotFound(format!(
                "invoice lines for order {order_id}"
            )));
        };

        let totals = items.iter().fold(InvoiceTotals::default(), |mut t, i| {
            t.before_discount += i.total_before_discount;
            t.discount += i.discount_amount;
            t.after_discount += i.total_after_discount;
            t
        });

        Ok(Self {
            order_id,
            order_date: format_order_date(order_date),
            warehouse_name: first.warehouse_name.clone(),
            pharmacy_name: first.pharmacy_name.clone(),
            pharmacy_number: first.pharmacy_number.clone(),
            pharmacy_address: first.pharmacy_address.clone(),
            totals,
            items,
        })
    }

    pub fn metadata_lines(&self) -> Vec<String> {
        vec![
            format!("رقم الطلب: {}", self.order_id),
            format!("التاريخ: {}", self.order_date),
            format!("{} :مخزن", self.warehouse_name),
            format!("{} :الصيدلية", self.pharmacy_name),
            format!("{} :رقم الصيدلية", self.pharmacy_number),
            format!("{} :عنوان الصيدلية", self.pharmacy_address),
        ]
    }

    /// Table heading, right-to-left
    pub fn header_row(&self) -> Vec<&'static str> {
        COLUMNS.iter().rev().copied().collect()
    }

    /// Table body, right-to-left, numbered from 1
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut row = vec![
                    (i + 1).to_string(),
                    item.arabic_medicine_name.clone(),
                    item.quantity.to_string(),
                    money(item.medicine_price),
                    format!("{}%", money(item.discount_percentage)),
                    money(item.total_before_discount),
                    money(item.total_after_discount),
                ];
                row.reverse();
                row
            })
            .collect()
    }

    pub fn total_lines(&self) -> [String; 3] {
        [
            format!(
                "الإجمالي قبل الخصم: {} {CURRENCY}",
                money(self.totals.before_discount)
            ),
            format!("إجمالي الخصم: {} {CURRENCY}", money(self.totals.discount)),
            format!(
                "الإجمالي بعد الخصم: {} {CURRENCY}",
                money(self.totals.after_discount)
            ),
        ]
    }

    /// `invoice_order_{id}.{ext}`
    pub fn file_name(&self, extension: &str) -> String {
        format!("invoice_order_{}.{extension}", self.order_id)
    }
}

/// Output backend for an [`Invoice`]
pub trait InvoiceRenderer {
    /// File extension of the rendered output, without the dot
    fn extension(&self) -> &str;

    fn render(&self, invoice: &Invoice) -> Vec<u8>;
}

/// Column widths for a paper width, right-to-left order
fn column_widths(width: usize) -> [usize; 7] {
    // after, before, discount %, price, qty, name, index
    let fixed = [9, 9, 7, 8, 5, 3];
    let used: usize = fixed.iter().sum::<usize>() + 6;
    let name = width.saturating_sub(used).max(8);
    [fixed[0], fixed[1], fixed[2], fixed[3], fixed[4], name, fixed[5]]
}

/// UTF-8 text invoice
#[derive(Debug, Clone, Copy)]
pub struct TextInvoiceRenderer {
    pub width: usize,
}

impl Default for TextInvoiceRenderer {
    fn default() -> Self {
        Self { width: 80 }
    }
}

impl InvoiceRenderer for TextInvoiceRenderer {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, invoice: &Invoice) -> Vec<u8> {
        let widths = column_widths(self.width);
        let mut b = TextBuilder::new(self.width);
        b.center(Invoice::TITLE).center(Invoice::SUBTITLE).sep_double();
        for line in invoice.metadata_lines() {
            b.line(&line);
        }
        b.sep_single();
        b.columns(&invoice.header_row(), &widths);
        b.sep_single();
        for row in invoice.rows() {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            b.columns(&cells, &widths);
        }
        b.sep_double();
        for line in invoice.total_lines() {
            b.line(&line);
        }
        b.build().into_bytes()
    }
}

/// ESC/POS receipt for 80mm thermal printers
#[derive(Debug, Clone, Copy)]
pub struct EscPosInvoiceRenderer {
    pub width: usize,
}

impl Default for EscPosInvoiceRenderer {
    fn default() -> Self {
        Self { width: 48 }
    }
}

impl InvoiceRenderer for EscPosInvoiceRenderer {
    fn extension(&self) -> &str {
        "bin"
    }

    fn render(&self, invoice: &Invoice) -> Vec<u8> {
        let widths = column_widths(self.width);
        let mut b = EscPosBuilder::new(self.width);
        b.center().double_size().bold().line(Invoice::TITLE);
        b.reset_size().line(Invoice::SUBTITLE).bold_off();
        b.sep_double().right();
        for line in invoice.metadata_lines() {
            b.line(&line);
        }
        b.sep_single();
        b.bold().columns(&invoice.header_row(), &widths).bold_off();
        for row in invoice.rows() {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            b.columns(&cells, &widths);
        }
        b.sep_double().bold();
        for line in invoice.total_lines() {
            b.line(&line);
        }
        b.bold_off().cut_feed(4);
        b.build()
    }
}

/// Send an invoice to a receipt printer
#[instrument(skip(invoice, printer), fields(order_id = invoice.order_id))]
pub async fn print_invoice<P: Printer>(invoice: &Invoice, printer: &P) -> ClientResult<()> {
    let data = EscPosInvoiceRenderer::default().render(invoice);
    printer.print(&data).await?;
    info!(bytes = data.len(), "Invoice printed");
    Ok(())
}
