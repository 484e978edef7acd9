//! Excel review table
//!
//! Same columns as the HTML table. The image column embeds the picture
//! decoded from each row's data URI.

use super::{field_value, LEADING_FIELDS, TRAILING_FIELDS};
use crate::catout::CatoutRow;
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_xlsxwriter::*;

const SHEET_NAME: &str = "catout";
const IMAGE_COLUMN_WIDTH: f64 = 40.0;
const TEXT_COLUMN_WIDTH: f64 = 22.0;
/// 1pt = 4/3px
const PX_TO_PT: f64 = 0.75;

fn xlsx_err(context: &str) -> impl Fn(XlsxError) -> Error + '_ {
    move |e| Error::Excel(format!("{}: {}", context, e))
}

/// Bytes of a base64 data URI; None for anything else
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload.trim()).ok()
}

/// Builds the workbook into a buffer
pub fn generate_table_excel(rows: &[CatoutRow], image_height_px: u32) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xE8E8E8))
        .set_border(FormatBorder::Thin);

    let value_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err("sheet name"))?;

    let image_col = LEADING_FIELDS.len() as u16;
    let headers = LEADING_FIELDS
        .iter()
        .chain(std::iter::once(&"img_data_uri"))
        .chain(TRAILING_FIELDS.iter());

    for (col, header) in headers.enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(xlsx_err("header"))?;
        let width = if col == image_col { IMAGE_COLUMN_WIDTH } else { TEXT_COLUMN_WIDTH };
        worksheet.set_column_width(col, width).map_err(xlsx_err("column width"))?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_err("freeze panes"))?;

    for (index, row) in rows.iter().enumerate() {
        let excel_row = index as u32 + 1;
        worksheet
            .set_row_height(excel_row, f64::from(image_height_px) * PX_TO_PT)
            .map_err(xlsx_err("row height"))?;

        for (col, field) in LEADING_FIELDS.iter().enumerate() {
            worksheet
                .write_string_with_format(excel_row, col as u16, field_value(row, field), &value_format)
                .map_err(xlsx_err("cell"))?;
        }
        for (offset, field) in TRAILING_FIELDS.iter().enumerate() {
            worksheet
                .write_string_with_format(
                    excel_row,
                    image_col + 1 + offset as u16,
                    field_value(row, field),
                    &value_format,
                )
                .map_err(xlsx_err("cell"))?;
        }

        let image = decode_data_uri(&row.img_data_uri)
            .and_then(|bytes| match Image::new_from_buffer(&bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(tp_time = row.tp_time, error = %e, "unreadable image data");
                    None
                }
            });

        match image {
            Some(image) => {
                let scale = if image.height() > 0.0 {
                    f64::from(image_height_px) / image.height()
                } else {
                    1.0
                };
                let image = image
                    .set_scale_width(scale)
                    .set_scale_height(scale)
                    .set_object_movement(ObjectMovement::MoveAndSizeWithCells);
                worksheet
                    .insert_image_with_offset(excel_row, image_col, &image, 2, 2)
                    .map_err(xlsx_err("insert image"))?;
            }
            None => {
                // keep the filename so the row still points at its frame
                worksheet
                    .write_string_with_format(excel_row, image_col, &row.img_fname, &value_format)
                    .map_err(xlsx_err("cell"))?;
            }
        }
    }

    if !rows.is_empty() {
        let last_col = image_col + TRAILING_FIELDS.len() as u16;
        worksheet
            .autofilter(0, 0, rows.len() as u32, last_col)
            .map_err(xlsx_err("autofilter"))?;
    }

    workbook.save_to_buffer().map_err(xlsx_err("save"))
}
