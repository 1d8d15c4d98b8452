use super::layout::{Cell, SheetRow};
use crate::error::SourceError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;

/// 参与分隔符识别的非空行数
const SNIFF_LINES: usize = 20;

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// 读取工作簿 (xlsx / xls / xlsb / ods) 的第一个工作表
///
/// 行列坐标从 A1 起算：工作表区域之前的空行、空列会被补齐。
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>, SourceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SourceError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<SheetRow> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(Cell::from));
        rows.push(cells);
    }

    tracing::debug!("工作表 '{}' 读取 {} 行", sheet_name, rows.len());
    Ok(rows)
}

/// 读取无表头 CSV 导出 (分隔符自动识别 ';' 或 ',')
pub fn read_csv(bytes: &[u8]) -> Result<Vec<SheetRow>, SourceError> {
    let delimiter = sniff_delimiter(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 分类标记行只有一列
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    tracing::debug!("CSV 读取 {} 行, 分隔符 '{}'", rows.len(), delimiter as char);
    Ok(rows)
}

/// 对前若干非空行逐行投票：哪个分隔符在该行出现更多就记一票
///
/// 标题行通常不含任何分隔符，不参与投票。
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let (mut semicolon_votes, mut comma_votes) = (0usize, 0usize);

    for line in bytes
        .split(|b| *b == b'\n')
        .filter(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
        .take(SNIFF_LINES)
    {
        let semicolons = line.iter().filter(|b| **b == b';').count();
        let commas = line.iter().filter(|b| **b == b',').count();
        if semicolons > commas {
            semicolon_votes += 1;
        } else if commas > semicolons {
            comma_votes += 1;
        }
    }

    if semicolon_votes > comma_votes {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::layout::{extract_sales_lines, SheetLayout};
    use rust_xlsxwriter::Workbook;

    #[test]
    fn csv_rows_keep_positions() {
        let csv = "Rapport;;;\nCatégorie;Article;Qté;Total\nTotal Burgers\n;Burger Classic;3;30\n";
        let rows = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], vec![Cell::Text("Total Burgers".to_string())]);
        assert_eq!(
            rows[3],
            vec![
                Cell::Empty,
                Cell::Text("Burger Classic".to_string()),
                Cell::Number(3.0),
                Cell::Number(30.0),
            ]
        );
    }

    #[test]
    fn csv_export_yields_sales_lines() {
        let csv = "\
Ventes,,,
Categorie,Article,Quantite,Total
Total Boissons,,,
,Coca-Cola,5,12.5
,Eau,0,0
Total Snacks,,,
,Frites,7,21
";
        let rows = read_csv(csv.as_bytes()).unwrap();
        let lines = extract_sales_lines(&rows, &SheetLayout::default()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].category, "Boissons");
        assert_eq!(lines[1].article, "Frites");
        assert_eq!(lines[1].unit_price(), 3.0);
    }

    #[test]
    fn semicolon_csv_with_plain_title_line() {
        let csv = "Rapport des ventes du 12/10\n\
                   Categorie;Article;Quantite;Total\n\
                   Total Burgers;;;\n\
                   ;Burger Classic;3;30\n\
                   ;Frites;7;21\n";
        let rows = read_csv(csv.as_bytes()).unwrap();
        let lines = extract_sales_lines(&rows, &SheetLayout::default()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].article, "Burger Classic");
        assert_eq!(lines[0].category, "Burgers");
        assert_eq!(lines[1].total_revenue, 21.0);
    }

    #[test]
    fn sniffs_delimiter_by_line_majority() {
        assert_eq!(sniff_delimiter(b"a;b;c\n1,5;2;3"), b';');
        assert_eq!(sniff_delimiter(b"Titre, du rapport\na;b;c\n;x;1;2\n;y;3;4"), b';');
        assert_eq!(sniff_delimiter(b"Titre\n\n  \na,b,c"), b',');
        assert_eq!(sniff_delimiter(b"a,b,c"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn garbage_bytes_are_not_a_workbook() {
        let err = read_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, SourceError::Workbook(_)));
    }

    #[test]
    fn xlsx_export_yields_sales_lines() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Rapport des ventes").unwrap();
        sheet.write_string(1, 0, "Catégorie").unwrap();
        sheet.write_string(1, 1, "Article").unwrap();
        sheet.write_string(2, 0, "Total Burgers").unwrap();
        sheet.write_string(3, 1, "Burger Classic").unwrap();
        sheet.write_number(3, 2, 3.0).unwrap();
        sheet.write_number(3, 3, 30.0).unwrap();
        sheet.write_string(4, 0, "Total Boissons").unwrap();
        sheet.write_string(5, 1, "Coca-Cola").unwrap();
        sheet.write_number(5, 2, 4.0).unwrap();
        sheet.write_number(5, 3, 10.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_workbook(&bytes).unwrap();
        let lines = extract_sales_lines(&rows, &SheetLayout::default()).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].article, "Burger Classic");
        assert_eq!(lines[0].category, "Burgers");
        assert_eq!(lines[0].quantity(), 3.0);
        assert_eq!(lines[1].category, "Boissons");
        assert_eq!(lines[1].unit_price(), 2.5);
    }

    #[test]
    fn sheet_starting_past_a1_keeps_column_positions() {
        // 前两行为空，A 列只有分类标记
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 0, "Total Burgers").unwrap();
        sheet.write_string(3, 1, "Burger Classic").unwrap();
        sheet.write_number(3, 2, 3.0).unwrap();
        sheet.write_number(3, 3, 30.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_workbook(&bytes).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2][0], Cell::Text("Total Burgers".to_string()));

        let lines = extract_sales_lines(&rows, &SheetLayout::default()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].article, "Burger Classic");
        assert_eq!(lines[0].category, "Burgers");
        assert_eq!(lines[0].total_revenue, 30.0);
    }

    #[test]
    fn sheet_without_column_a_is_padded() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Sous-total Desserts").unwrap();
        sheet.write_string(1, 2, "Tiramisu").unwrap();
        sheet.write_number(1, 3, 2.0).unwrap();
        sheet.write_number(1, 4, 9.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_workbook(&bytes).unwrap();
        assert_eq!(rows[1][0], Cell::Empty);
        assert_eq!(rows[1][2], Cell::Text("Tiramisu".to_string()));

        let layout = SheetLayout {
            header_rows: 0,
            category_column: 1,
            article_column: 2,
            quantity_column: 3,
            revenue_column: 4,
            category_marker: "Sous-total ".to_string(),
        };
        let lines = extract_sales_lines(&rows, &layout).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].category, "Desserts");
        assert_eq!(lines[0].unit_price(), 4.5);
    }
}
