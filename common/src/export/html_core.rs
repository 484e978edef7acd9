//! HTML review table
//!
//! Standalone page with one row per catout item, made sortable and
//! faceted by the DataTables search panes.

use super::{field_value, LEADING_FIELDS, TRAILING_FIELDS};
use crate::catout::CatoutRow;
use std::fmt::Write;

const TABLE_ID: &str = "catdoor";

const STYLESHEETS: &[&str] = &[
    "https://cdn.datatables.net/2.0.0/css/dataTables.dataTables.css",
    "https://cdn.datatables.net/searchpanes/2.3.0/css/searchPanes.dataTables.css",
    "https://cdn.datatables.net/select/2.0.0/css/select.dataTables.css",
];

const SCRIPTS: &[&str] = &[
    "https://code.jquery.com/jquery-3.7.1.min.js",
    "https://cdn.datatables.net/2.0.0/js/dataTables.js",
    "https://cdn.datatables.net/searchpanes/2.3.0/js/dataTables.searchPanes.js",
    "https://cdn.datatables.net/searchpanes/2.3.0/js/searchPanes.dataTables.js",
    "https://cdn.datatables.net/select/2.0.0/js/dataTables.select.js",
];

/// Columns with a search pane: asset, cataloger, date, normalized name
const FACET_COLUMNS: &[usize] = &[0, 1, 2, 5];

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the review table page
pub fn render_table_html(rows: &[CatoutRow], image_height_px: u32) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang='en'>\n<head>\n<title>cat door</title>\n");
    for href in STYLESHEETS {
        let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\">", href);
    }
    let _ = writeln!(
        html,
        "<style>\nbody{{padding: 20px; font-family: sans-serif;}}\n\
         table{{background-color: #E8E8E8;}}\n\
         td{{border: 1px solid black;}}\nth{{border: 1px solid black;}}\n\
         img{{height: {}px;}}\n#{}{{ max-width: 1200px; margin: 0 auto; }}\n</style>",
        image_height_px, TABLE_ID
    );
    html.push_str("</head>\n<body>\n");

    let _ = write!(html, "<table id='{}'><thead><tr>\n", TABLE_ID);
    for field in LEADING_FIELDS {
        let _ = write!(html, "<th>{}</th>", field);
    }
    html.push_str("<th>img_data_uri</th>");
    for field in TRAILING_FIELDS {
        let _ = write!(html, "<th>{}</th>", field);
    }
    html.push_str("\n</tr></thead>\n<tbody>");

    for row in rows {
        html.push_str("\n<tr>\n");
        for field in LEADING_FIELDS {
            let _ = write!(html, "<td>{}</td>", escape_html(&field_value(row, field)));
        }
        let _ = write!(html, "<td><img src='{}'></td>", escape_html(&row.img_data_uri));
        for field in TRAILING_FIELDS {
            let _ = write!(html, "<td>{}</td>", escape_html(&field_value(row, field)));
        }
        html.push_str("\n</tr>\n");
    }
    html.push_str("</tbody></table>\n");

    for src in SCRIPTS {
        let _ = writeln!(html, "<script src=\"{}\"></script>", src);
    }
    let targets: Vec<String> = FACET_COLUMNS.iter().map(|c| c.to_string()).collect();
    let _ = writeln!(
        html,
        "<script>\n$(document).ready(function() {{\n  $('#{}').DataTable({{\n    \
         layout: {{ top1: {{ searchPanes: {{ show: false }} }} }},\n    \
         columnDefs: [\n      {{ searchPanes: {{ show: true }}, targets: [{}] }},\n      \
         {{ searchPanes: {{ show: false }}, targets: '_all' }}\n    ]\n  }});\n}});\n</script>",
        TABLE_ID,
        targets.join(", ")
    );
    html.push_str("\n</body></html>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CatoutRow {
        CatoutRow {
            asset_id: "cpb-aacip-1".to_string(),
            cataloger: "owen".to_string(),
            export_date: "2025-03-01".to_string(),
            tp_time: 65032,
            name_normalized: "Smith, <Jane>".to_string(),
            person_attributes: "Reporter & Anchor".to_string(),
            img_data_uri: "data:image/jpeg;base64,AAAA".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&'\""), "a&lt;b&gt;&amp;&#39;&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_table_columns_and_cells() {
        let html = render_table_html(&[row()], 180);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<th>asset_id</th><th>cataloger</th><th>export_date</th><th>tp_time</th><th>img_data_uri</th><th>name_normalized</th><th>person_attributes</th>"));
        assert!(html.contains("<td>65032</td>"));
        assert!(html.contains("<td>Smith, &lt;Jane&gt;</td>"));
        assert!(html.contains("<td>Reporter &amp; Anchor</td>"));
        assert!(html.contains("<img src='data:image/jpeg;base64,AAAA'>"));
        assert!(html.contains("img{height: 180px;}"));
        assert!(html.contains("targets: [0, 1, 2, 5]"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_render_empty_table() {
        let html = render_table_html(&[], 120);
        assert_eq!(html.matches("<tr>").count(), 1);
    }
}
