use std::path::Path;

use thiserror::Error;

use crate::batch::RowInput;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table format: {0}")]
    InvalidFormat(String),
}

/// Parse a TSV/CSV file with columns: `display_name`, `reference`
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be read, or
/// `TableError::InvalidFormat` if the content is invalid.
pub fn parse_table_file(path: &Path, delimiter: char) -> Result<Vec<RowInput>, TableError> {
    let content = std::fs::read_to_string(path)?;
    parse_table_text(&content, delimiter)
}

/// Parse TSV/CSV text with columns: `display_name`, `reference`
///
/// Blank lines and `#` comments are ignored; a header row is detected
/// from common column names and skipped. Rows keep their raw cell
/// text; blank cells are filtered later by the batch driver, not here.
///
/// # Errors
///
/// Returns `TableError::InvalidFormat` if a line has fewer than 2
/// fields or no rows are found.
pub fn parse_table_text(text: &str, delimiter: char) -> Result<Vec<RowInput>, TableError> {
    let mut rows = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Split the untrimmed line: trimming first would eat the
        // delimiter of a row whose last cell is blank
        let fields: Vec<&str> = line.split(delimiter).collect();

        // Check if the first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.trim().to_lowercase()).unwrap_or_default();
            if matches!(
                first.as_str(),
                "display_name" | "display" | "name" | "label" | "gdf_field"
            ) {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(TableError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        rows.push(RowInput {
            display_name: fields[0].trim().to_string(),
            reference: fields[1].trim().to_string(),
        });
    }

    if rows.is_empty() {
        return Err(TableError::InvalidFormat(
            "No rows found in table".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_text() {
        let tsv = "display_name\treference\nClaim ID\tCLM01\nSubscriber\t2010BANM109\n";

        let rows = parse_table_text(tsv, '\t').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display_name, "Claim ID");
        assert_eq!(rows[0].reference, "CLM01");
        assert_eq!(rows[1].reference, "2010BANM109");
    }

    #[test]
    fn test_parse_csv_text() {
        let csv = "GDF_Field,Original_EDI_Field\nClaim ID,CLM01\nDiagnosis,2300HI01-2 -- BK/ABK\n";

        let rows = parse_table_text(csv, ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].reference, "2300HI01-2 -- BK/ABK");
    }

    #[test]
    fn test_parse_table_no_header() {
        let tsv = "Claim ID\tCLM01\nSubscriber\tNM109\n";
        let rows = parse_table_text(tsv, '\t').unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_table_comments_and_blanks() {
        let tsv = "# reference table\n\nname\treference\nClaim ID\tCLM01\n";
        let rows = parse_table_text(tsv, '\t').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_name, "Claim ID");
    }

    #[test]
    fn test_parse_table_too_few_fields() {
        let err = parse_table_text("Claim ID\tCLM01\nonly-one-field\n", '\t').unwrap_err();
        assert!(matches!(err, TableError::InvalidFormat(_)));
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_parse_table_empty() {
        assert!(matches!(
            parse_table_text("# nothing here\n", '\t'),
            Err(TableError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_blank_cells_are_kept_for_driver() {
        let rows = parse_table_text("Claim\t\nNext\tCLM01\n", '\t').unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].reference.is_empty());

        // Same for a blank display-name cell and for CSV
        let rows = parse_table_text("\tCLM01\n", '\t').unwrap();
        assert!(rows[0].display_name.is_empty());

        let rows = parse_table_text("Claim,\r\nNext,CLM01\r\n", ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].reference.is_empty());
    }
}
