// 🧾 Reports - PDF and CSV export of the (filtered) history
//
// The PDF is for people, not for re-import: title block, a
// Date | Description | Category | Amount table that flows onto extra pages,
// a total row and a grand total line.

use crate::entities::{Expense, DATE_FORMAT};
use crate::format::{format_amount, format_date, truncate};
use crate::history::CategoryFilter;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("No data available for PDF")]
    Empty,
}

// ============================================================================
// REPORT MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseReport {
    pub generated_on: NaiveDate,
    pub filter_label: String,
    /// Already filtered and sorted
    pub rows: Vec<Expense>,
}

impl ExpenseReport {
    pub fn new(rows: Vec<Expense>, filter: &CategoryFilter, generated_on: NaiveDate) -> Self {
        ExpenseReport {
            generated_on,
            filter_label: filter.label().to_string(),
            rows,
        }
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|e| e.amount).sum()
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// `Expense_Report_2025-01-31.pdf`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("Expense_Report_{}.pdf", date.format(DATE_FORMAT))
}

// ============================================================================
// PDF
// ============================================================================

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 14.0;
const MARGIN_BOTTOM: f32 = 20.0;
const ROW_HEIGHT: f32 = 7.0;

// Column x positions (mm); amount is right-aligned against AMOUNT_RIGHT
const COL_DATE: f32 = 14.0;
const COL_DESCRIPTION: f32 = 44.0;
const COL_CATEGORY: f32 = 114.0;
const AMOUNT_RIGHT: f32 = 189.0;
const DESCRIPTION_MAX_CHARS: usize = 38;

const TITLE_BLUE: (u8, u8, u8) = (37, 99, 235);
const HEADER_INDIGO: (u8, u8, u8) = (79, 70, 229);
const TEXT_GRAY: (u8, u8, u8) = (100, 100, 100);
const TEXT_DARK: (u8, u8, u8) = (17, 24, 39);

fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Built-in PDF fonts cannot draw arbitrary Unicode; replace what they can't
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Rough Helvetica width (mm) for right alignment
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to load PDF font: {:?}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to load PDF font: {:?}", e))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PdfWriter {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - 22.0,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, color: (u8, u8, u8)) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(pdf_text(text), size, Mm(x), Mm(y), font);
    }

    fn rule(&self, y: f32, color: (u8, u8, u8), thickness: f32) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
                (Point::new(Mm(AMOUNT_RIGHT), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - 20.0;
    }

    /// Start a new page (with table header) if `needed` mm don't fit
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            self.new_page();
            self.table_header();
        }
    }

    fn table_header(&mut self) {
        let size = 9.0;
        self.text("Date", size, COL_DATE, self.y, true, HEADER_INDIGO);
        self.text("Description", size, COL_DESCRIPTION, self.y, true, HEADER_INDIGO);
        self.text("Category", size, COL_CATEGORY, self.y, true, HEADER_INDIGO);
        self.text(
            "Amount",
            size,
            AMOUNT_RIGHT - text_width_mm("Amount", size),
            self.y,
            true,
            HEADER_INDIGO,
        );
        self.rule(self.y - 2.0, HEADER_INDIGO, 0.8);
        self.y -= ROW_HEIGHT + 1.0;
    }

    fn row(&mut self, expense: &Expense) {
        self.ensure_space(ROW_HEIGHT);
        let size = 9.0;
        let amount = format_amount(expense.amount);

        self.text(&format_date(expense.date), size, COL_DATE, self.y, false, TEXT_DARK);
        self.text(
            &truncate(&expense.description, DESCRIPTION_MAX_CHARS),
            size,
            COL_DESCRIPTION,
            self.y,
            false,
            TEXT_DARK,
        );
        self.text(expense.category.label(), size, COL_CATEGORY, self.y, false, TEXT_DARK);
        self.text(
            &amount,
            size,
            AMOUNT_RIGHT - text_width_mm(&amount, size),
            self.y,
            true,
            TEXT_DARK,
        );
        self.y -= ROW_HEIGHT;
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| anyhow!("Failed to serialize PDF: {:?}", e))
    }
}

/// Render the report to PDF bytes
pub fn render_pdf(report: &ExpenseReport, currency_code: &str) -> Result<Vec<u8>> {
    if report.rows.is_empty() {
        return Err(ReportError::Empty.into());
    }

    let mut pdf = PdfWriter::new("Expense Report")?;

    // Title block
    pdf.text("Expense Report", 18.0, MARGIN_LEFT, pdf.y, true, TITLE_BLUE);
    pdf.y -= 8.0;
    pdf.text(
        &format!("Generated on: {}", format_date(report.generated_on)),
        10.0,
        MARGIN_LEFT,
        pdf.y,
        false,
        TEXT_GRAY,
    );
    pdf.y -= 6.0;
    pdf.text(
        &format!("Filter: {}", report.filter_label),
        10.0,
        MARGIN_LEFT,
        pdf.y,
        false,
        TEXT_GRAY,
    );
    pdf.y -= 10.0;

    pdf.table_header();
    for expense in &report.rows {
        pdf.row(expense);
    }

    // Footer row + totals
    pdf.ensure_space(ROW_HEIGHT + 22.0);
    pdf.rule(pdf.y + ROW_HEIGHT - 2.0, TEXT_GRAY, 0.4);
    let total = format_amount(report.total());
    pdf.text("Total:", 9.0, COL_CATEGORY, pdf.y, true, TEXT_DARK);
    pdf.text(
        &total,
        9.0,
        AMOUNT_RIGHT - text_width_mm(&total, 9.0),
        pdf.y,
        true,
        TEXT_DARK,
    );
    pdf.y -= 12.0;

    pdf.text(
        &format!("Total Expenses: {}", report.count()),
        11.0,
        MARGIN_LEFT,
        pdf.y,
        false,
        (0, 0, 0),
    );
    pdf.y -= 8.0;
    pdf.text(
        &format!("Grand Total: {} {}", currency_code, total),
        13.0,
        MARGIN_LEFT,
        pdf.y,
        true,
        TITLE_BLUE,
    );

    pdf.finish()
}

/// Render and write `Expense_Report_<date>.pdf` into `dir`
pub fn write_pdf(report: &ExpenseReport, dir: &Path, currency_code: &str) -> Result<PathBuf> {
    let bytes = render_pdf(report, currency_code)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(report_file_name(report.generated_on));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = report.count(), "PDF report written");
    Ok(path)
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    category: &'a str,
    amount: String,
    id: &'a str,
}

pub fn write_csv<W: Write>(writer: W, rows: &[Expense]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for expense in rows {
        wtr.serialize(CsvRow {
            date: expense.date.format(DATE_FORMAT).to_string(),
            description: &expense.description,
            category: expense.category.as_str(),
            amount: format!("{:.2}", expense.amount),
            id: &expense.id,
        })
        .context("Failed to write CSV row")?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `Expense_Report_<date>.csv` into `dir`
pub fn write_csv_file(report: &ExpenseReport, dir: &Path) -> Result<PathBuf> {
    if report.rows.is_empty() {
        return Err(ReportError::Empty.into());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(report_file_name(report.generated_on).replace(".pdf", ".csv"));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, &report.rows)?;

    tracing::info!(path = %path.display(), rows = report.count(), "CSV export written");
    Ok(path)
}
