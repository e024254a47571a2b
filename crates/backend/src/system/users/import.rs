//! CSV parsing for the user and owner imports.

use anyhow::Result;
use contracts::system::users::UserRecord;

/// A parsed row, or the reason it cannot be imported.
pub type ParsedRow<T> = std::result::Result<T, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRow {
    pub emp_no: String,
    pub owner: String,
}

fn reader(csv_text: &str) -> csv::Reader<&[u8]> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn normalize_date(value: String) -> std::result::Result<String, String> {
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&value, format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    Err(format!("invalid quit_date '{}'", value))
}

/// Rows of a user sheet; columns are matched by header name, case-insensitively.
/// Row numbers in messages count the header as row 1.
pub fn parse_users(csv_text: &str) -> Result<Vec<(usize, ParsedRow<UserRecord>)>> {
    let mut reader = reader(csv_text);
    let headers = reader
        .headers()
        .map_err(|e| anyhow::anyhow!("Failed to read CSV headers: {}", e))?
        .clone();

    if !headers.iter().any(|h| h.eq_ignore_ascii_case("emp_no")) {
        anyhow::bail!("CSV header must contain an emp_no column");
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows.push((line, Err(format!("malformed record: {}", e))));
                continue;
            }
        };

        let get_field = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .and_then(|i| record.get(i))
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(emp_no), Some(emp_name)) = (get_field("emp_no"), get_field("emp_name")) else {
            rows.push((line, Err("emp_no and emp_name are required".to_string())));
            continue;
        };

        let quit_date = match get_field("quit_date").map(normalize_date).transpose() {
            Ok(date) => date,
            Err(e) => {
                rows.push((line, Err(e)));
                continue;
            }
        };

        let defaults = UserRecord::default();
        rows.push((
            line,
            Ok(UserRecord {
                emp_no,
                emp_name,
                emp_rank: get_field("emp_rank").or(defaults.emp_rank),
                class_name: get_field("class_name"),
                station_name: get_field("station_name"),
                emp_pass: get_field("emp_pass"),
                emp_bc: get_field("emp_bc"),
                emp_pwd_pass: get_field("emp_pwd_pass"),
                email: get_field("email"),
                dept_name: get_field("dept_name").or(defaults.dept_name),
                owner: get_field("owner"),
                quit_date: quit_date.or(defaults.quit_date),
                ..defaults
            }),
        ));
    }
    Ok(rows)
}

/// Rows of an owner sheet (`emp_no`, `owner`).
pub fn parse_owners(csv_text: &str) -> Result<Vec<(usize, ParsedRow<OwnerRow>)>> {
    let mut reader = reader(csv_text);
    let headers = reader
        .headers()
        .map_err(|e| anyhow::anyhow!("Failed to read CSV headers: {}", e))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(emp_idx), Some(owner_idx)) = (position("emp_no"), position("owner")) else {
        anyhow::bail!("CSV header must contain emp_no and owner columns");
    };

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let parsed = match result {
            Ok(record) => {
                let emp_no = record.get(emp_idx).unwrap_or_default().to_string();
                let owner = record.get(owner_idx).unwrap_or_default().to_string();
                if emp_no.is_empty() || owner.is_empty() {
                    Err("emp_no and owner are required".to_string())
                } else {
                    Ok(OwnerRow { emp_no, owner })
                }
            }
            Err(e) => Err(format!("malformed record: {}", e)),
        };
        rows.push((line, parsed));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users() {
        let text = "\u{FEFF}EMP_NO,Emp_Name,emp_pass,quit_date\n\
                    E001, Alice ,Passw0rd!,31.12.2030\n\
                    ,Nobody,x,\n\
                    E002,Bob,,2031/01/15\n\
                    E003,Carol,,someday\n";
        let rows = parse_users(text).unwrap();
        assert_eq!(rows.len(), 4);

        let (line, alice) = &rows[0];
        assert_eq!(*line, 2);
        let alice = alice.as_ref().unwrap();
        assert_eq!(alice.emp_no, "E001");
        assert_eq!(alice.emp_name, "Alice");
        assert_eq!(alice.quit_date.as_deref(), Some("2030-12-31"));
        assert_eq!(alice.dept_name.as_deref(), Some("PD"));

        assert!(rows[1].1.is_err());
        assert_eq!(
            rows[2].1.as_ref().unwrap().quit_date.as_deref(),
            Some("2031-01-15")
        );
        assert_eq!(rows[3].1, Err("invalid quit_date 'someday'".to_string()));
    }

    #[test]
    fn test_users_header_requires_emp_no() {
        assert!(parse_users("name,owner\nA,B\n").is_err());
    }

    #[test]
    fn test_parse_owners() {
        let rows = parse_owners("emp_no,owner\nE001,E900\nE002,\n").unwrap();
        assert_eq!(
            rows[0].1,
            Ok(OwnerRow {
                emp_no: "E001".into(),
                owner: "E900".into()
            })
        );
        assert!(rows[1].1.is_err());
        assert!(parse_owners("emp_no\nE001\n").is_err());
    }
}
