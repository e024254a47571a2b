use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 15;
pub const PAGE_SIZE_OPTIONS: [u64; 4] = [15, 30, 50, 100];

/// Length of a stored password digest; such values skip the strength rules.
pub const PASSWORD_DIGEST_LEN: usize = 40;
pub const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProgram {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// MES employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub emp_no: String,
    pub emp_name: String,
    #[serde(default)]
    pub emp_rank: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub emp_pass: Option<String>,
    #[serde(default)]
    pub emp_bc: Option<String>,
    #[serde(default)]
    pub emp_pwd_pass: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dept_name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub quit_date: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "systemPrograms", default)]
    pub system_programs: Vec<SystemProgram>,
    #[serde(default)]
    pub stations: Vec<String>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            emp_no: String::new(),
            emp_name: String::new(),
            emp_rank: Some("0".to_string()),
            class_name: None,
            station_name: None,
            emp_pass: None,
            emp_bc: None,
            emp_pwd_pass: None,
            email: None,
            dept_name: Some("PD".to_string()),
            owner: None,
            quit_date: Some("2000-12-31".to_string()),
            roles: Vec::new(),
            system_programs: Vec::new(),
            stations: Vec::new(),
        }
    }
}

/// Query string of the paged user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    #[serde(default)]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub username: String,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            username: String::new(),
        }
    }
}

impl UserListQuery {
    /// Page size clamped to the selectable options.
    pub fn effective_page_size(&self) -> u64 {
        if PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }

    /// Row offset of the page, capped at `i64::MAX` so it binds as an SQLite integer.
    pub fn offset(&self) -> u64 {
        self.page_number
            .saturating_mul(self.effective_page_size())
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedUsers {
    pub total_count: u64,
    pub items: Vec<UserRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    User,
    Owner,
}

impl ImportKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ImportKind::User => "user",
            ImportKind::Owner => "owner",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ImportKind::User => "Import User",
            ImportKind::Owner => "Import Owner",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Imported: {} inserted, {} updated, {} skipped",
            self.inserted, self.updated, self.skipped
        );
        if !self.errors.is_empty() {
            text.push_str(&format!(" ({} errors)", self.errors.len()));
        }
        text
    }
}

/// Missing strength rules of a password field, `None` when it passes.
pub fn password_rule_error(value: &str, label: &str) -> Option<String> {
    if value.is_empty() || value.chars().count() == PASSWORD_DIGEST_LEN {
        return None;
    }

    let mut missing = Vec::new();
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("at least one uppercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        missing.push("at least one number".to_string());
    }
    if !value.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        missing.push(format!("at least one symbol ({})", PASSWORD_SYMBOLS));
    }

    if missing.is_empty() {
        None
    } else {
        Some(format!("{} must include {}", label, missing.join(", ")))
    }
}

fn required(value: Option<&str>, label: &str, min_len: usize, errors: &mut Vec<String>) {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.push(format!("{} is required", label));
    } else if value.chars().count() < min_len {
        errors.push(format!("{} must be at least {} characters", label, min_len));
    }
}

/// Checks a user record before it is saved; returns every failed rule.
pub fn validate_user(user: &UserRecord) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    required(Some(&user.emp_no), "Emp No", 1, &mut errors);
    required(Some(&user.emp_name), "Emp Name", 1, &mut errors);
    required(user.emp_pass.as_deref(), "Emp Pass", PASSWORD_MIN_LEN, &mut errors);
    required(user.emp_bc.as_deref(), "Emp BC", PASSWORD_MIN_LEN, &mut errors);

    let passwords = [
        (user.emp_pass.as_deref(), "Emp Pass"),
        (user.emp_bc.as_deref(), "Emp BC"),
        (user.emp_pwd_pass.as_deref(), "Emp Pwd Pass"),
    ];
    for (value, label) in passwords {
        if let Some(err) = value.and_then(|v| password_rule_error(v, label)) {
            errors.push(err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> UserRecord {
        UserRecord {
            emp_no: "E001".into(),
            emp_name: "Operator".into(),
            emp_pass: Some("Passw0rd!".into()),
            emp_bc: Some("Barc0de#".into()),
            ..UserRecord::default()
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert_eq!(validate_user(&valid_user()), Ok(()));
    }

    #[test]
    fn test_required_fields() {
        let user = UserRecord::default();
        let errors = validate_user(&user).unwrap_err();
        assert!(errors.contains(&"Emp No is required".to_string()));
        assert!(errors.contains(&"Emp Name is required".to_string()));
        assert!(errors.contains(&"Emp Pass is required".to_string()));
        assert!(errors.contains(&"Emp BC is required".to_string()));
    }

    #[test]
    fn test_password_lists_missing_rules() {
        let err = password_rule_error("lowercase", "Emp Pass").unwrap();
        assert!(err.starts_with("Emp Pass must include at least one uppercase letter, at least one number"));
        assert!(err.contains("at least one symbol"));

        let err = password_rule_error("Lowercase1", "Emp BC").unwrap();
        assert!(err.starts_with("Emp BC must include at least one symbol"));
    }

    #[test]
    fn test_digest_skips_strength_rules() {
        let digest = "a".repeat(PASSWORD_DIGEST_LEN);
        assert_eq!(password_rule_error(&digest, "Emp Pass"), None);

        let user = UserRecord {
            emp_pass: Some(digest.clone()),
            emp_bc: Some(digest),
            ..valid_user()
        };
        assert_eq!(validate_user(&user), Ok(()));
    }

    #[test]
    fn test_short_password_rejected() {
        let user = UserRecord {
            emp_pass: Some("Ab1!".into()),
            ..valid_user()
        };
        let errors = validate_user(&user).unwrap_err();
        assert_eq!(errors, vec!["Emp Pass must be at least 8 characters".to_string()]);
    }

    #[test]
    fn test_optional_pwd_pass_checked_when_present() {
        let user = UserRecord {
            emp_pwd_pass: Some("weakpassword".into()),
            ..valid_user()
        };
        let errors = validate_user(&user).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Emp Pwd Pass must include"));
    }

    #[test]
    fn test_list_query_wire_format() {
        let query: UserListQuery = serde_json::from_str(r#"{"pageNumber":2,"pageSize":30}"#).unwrap();
        assert_eq!(query.page_number, 2);
        assert_eq!(query.offset(), 60);
        assert_eq!(query.username, "");

        let odd = UserListQuery {
            page_size: 7,
            ..UserListQuery::default()
        };
        assert_eq!(odd.effective_page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_number_offset_saturates() {
        let query: UserListQuery =
            serde_json::from_str(r#"{"pageNumber":1229782938247303442,"pageSize":15}"#).unwrap();
        assert_eq!(query.offset(), i64::MAX as u64);

        let max = UserListQuery {
            page_number: u64::MAX,
            ..UserListQuery::default()
        };
        assert_eq!(max.offset(), i64::MAX as u64);
        assert!(max.offset() as i64 > 0);
    }

    #[test]
    fn test_record_uses_camel_case_programs() {
        let json = serde_json::to_value(valid_user()).unwrap();
        assert!(json.get("systemPrograms").is_some());
        assert!(json.get("system_programs").is_none());
    }
}
