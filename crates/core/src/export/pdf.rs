//! Plain text-table PDF rendering with `lopdf`.
//!
//! Output is US Letter, monospaced Courier, one table row per line,
//! paginated when the rows do not fit on a single page.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::Table;
use crate::error::CoreError;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 54;
const FONT_SIZE: i64 = 9;
const LEADING: i64 = 12;
const TITLE_SIZE: i64 = 14;
/// Widest column, in characters, before truncation.
const MAX_COLUMN_CHARS: usize = 28;

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2 * MARGIN - 3 * LEADING) / LEADING) as usize
}

/// Courier is a Type 1 font with WinAnsi glyphs; keep output to ASCII.
fn ascii(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths.into_iter().map(|w| w.min(MAX_COLUMN_CHARS)).collect()
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let parts: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let clipped: String = cell.chars().take(*width).collect();
            format!("{clipped:<width$}", width = *width)
        })
        .collect();
    ascii(parts.join("  ").trim_end())
}

fn text_line(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Render `table` to PDF bytes.
pub fn render(table: &Table) -> Result<Vec<u8>, CoreError> {
    let widths = column_widths(table);
    let header = format_row(&table.header, &widths);
    let rule = "-".repeat(header.len());
    let body: Vec<String> = table.rows.iter().map(|r| format_row(r, &widths)).collect();

    let per_page = lines_per_page().saturating_sub(2).max(1);
    let chunks: Vec<&[String]> = if body.is_empty() {
        vec![&body[..]]
    } else {
        body.chunks(per_page).collect()
    };
    let page_count = chunks.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(page_count);
    for (index, chunk) in chunks.iter().enumerate() {
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT - MARGIN;

        text_line(&mut ops, "F2", TITLE_SIZE, MARGIN, y, &ascii(&table.title));
        y -= LEADING + 4;
        if let Some(subtitle) = &table.subtitle {
            text_line(&mut ops, "F1", FONT_SIZE, MARGIN, y, &ascii(subtitle));
        }
        y -= LEADING * 2;

        text_line(&mut ops, "F2", FONT_SIZE, MARGIN, y, &header);
        y -= LEADING;
        text_line(&mut ops, "F1", FONT_SIZE, MARGIN, y, &rule);
        y -= LEADING;

        for line in chunk.iter() {
            text_line(&mut ops, "F1", FONT_SIZE, MARGIN, y, line);
            y -= LEADING;
        }

        let footer = format!("Page {} of {}", index + 1, page_count);
        text_line(&mut ops, "F1", FONT_SIZE, MARGIN, MARGIN / 2, &footer);

        let content = Content { operations: ops };
        let encoded = content
            .encode()
            .map_err(|e| CoreError::Internal(format!("PDF content encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| CoreError::Internal(format!("PDF write failed: {e}")))?;
    Ok(buf)
}
