/// Per-field request validation with aggregated errors
///
/// Each field validator normalizes its input and returns a
/// `Result<T, String>`: the cleaned value, or the message to report for that
/// field. [`FieldErrors`] collects failures from every field so a request
/// with three bad fields reports all three at once; validation never
/// short-circuits to the first failure.
///
/// # Example
///
/// ```
/// use crewplan_shared::validation::{self, FieldErrors};
///
/// let mut errors = FieldErrors::new();
/// let email = errors.capture("email", validation::email(Some("  PM@X.COM ")));
/// let password = errors.capture("password", validation::password(Some("abc")));
///
/// assert_eq!(email.as_deref(), Some("pm@x.com"));
/// assert!(password.is_none());
/// assert_eq!(errors.get("password"), Some("Password must be at least 6 characters long"));
/// ```

use std::collections::BTreeMap;

use crate::models::user::Role;

/// Collected field-level validation failures
///
/// Serializes as `{field: message}` in the 400 response body. BTreeMap keeps
/// field ordering stable.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field result, returning the cleaned value on success
    pub fn capture<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.insert(field, message);
                None
            }
        }
    }

    /// Inserts a failure directly
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &'static str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// Validates and normalizes an email address
///
/// Normalization is trim + lowercase; the shape check requires
/// `local@domain.tld` (no whitespace, exactly one `@`, a dot inside the
/// domain with characters on both sides).
pub fn email(raw: Option<&str>) -> Result<String, String> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err("Email is required".to_string()),
    };

    let email = raw.trim().to_lowercase();

    if !email_shape_is_valid(&email) {
        return Err("Invalid email format".to_string());
    }

    Ok(email)
}

fn email_shape_is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // The domain needs a dot with at least one character on each side.
    let chars: Vec<char> = domain.chars().collect();
    chars
        .iter()
        .enumerate()
        .any(|(i, &c)| c == '.' && i > 0 && i + 1 < chars.len())
}

/// Validates a password: present and at least six characters
pub fn password(raw: Option<&str>) -> Result<String, String> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err("Password is required".to_string()),
    };

    if raw.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    Ok(raw.to_string())
}

/// Validates a display name: 1-100 characters after trimming
pub fn name(raw: Option<&str>) -> Result<String, String> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err("Name is required".to_string()),
    };

    let name = raw.trim();

    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.chars().count() > 100 {
        return Err("Name cannot exceed 100 characters".to_string());
    }

    Ok(name.to_string())
}

/// Validates a role against the closed role set
pub fn role(raw: Option<&str>) -> Result<Role, String> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Err("Role is required".to_string()),
    };

    raw.parse::<Role>().map_err(|_| {
        r#"Role must be either "project_manager" or "team_member""#.to_string()
    })
}

/// Validates a project or task title: required, non-blank, at most 255 chars
///
/// `subject` names the entity in the error message ("Project" or "Task").
pub fn title(raw: Option<&str>, subject: &str) -> Result<String, String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(format!("{} title is required", subject)),
    };

    if raw.chars().count() > 255 {
        return Err("Title cannot exceed 255 characters".to_string());
    }

    Ok(raw.trim().to_string())
}

/// Validates an optional description: if present it must be a JSON string,
/// trimmed, with blank collapsing to None
///
/// Takes the raw JSON value so a non-string description becomes a field
/// error in the aggregated map instead of a body-level deserialization
/// rejection.
pub fn description(raw: Option<&serde_json::Value>) -> Result<Option<String>, String> {
    let value = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let text = value
        .as_str()
        .ok_or_else(|| "Description must be text".to_string())?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        assert_eq!(email(Some("  PM@Example.COM ")).unwrap(), "pm@example.com");
    }

    #[test]
    fn test_email_required() {
        assert_eq!(email(None).unwrap_err(), "Email is required");
        assert_eq!(email(Some("")).unwrap_err(), "Email is required");
    }

    #[test]
    fn test_email_shape() {
        assert!(email(Some("pm@x.com")).is_ok());
        assert!(email(Some("a.b@c.d.com")).is_ok());

        for bad in ["plainaddress", "missing@tld", "@x.com", "a@.com", "two@@x.com", "a b@x.com"] {
            assert_eq!(email(Some(bad)).unwrap_err(), "Invalid email format", "case: {}", bad);
        }
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(password(None).unwrap_err(), "Password is required");
        assert_eq!(
            password(Some("12345")).unwrap_err(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(password(Some("123456")).unwrap(), "123456");
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(name(None).unwrap_err(), "Name is required");
        assert_eq!(name(Some("   ")).unwrap_err(), "Name cannot be empty");
        assert_eq!(name(Some("  Ada  ")).unwrap(), "Ada");
        assert_eq!(
            name(Some(&"x".repeat(101))).unwrap_err(),
            "Name cannot exceed 100 characters"
        );
    }

    #[test]
    fn test_role_rules() {
        assert_eq!(role(Some("project_manager")).unwrap(), Role::ProjectManager);
        assert_eq!(role(Some("team_member")).unwrap(), Role::TeamMember);
        assert_eq!(role(None).unwrap_err(), "Role is required");
        assert!(role(Some("admin")).unwrap_err().contains("project_manager"));
    }

    #[test]
    fn test_title_rules() {
        assert_eq!(
            title(None, "Project").unwrap_err(),
            "Project title is required"
        );
        assert_eq!(title(Some(" "), "Task").unwrap_err(), "Task title is required");
        assert_eq!(title(Some("  Launch  "), "Project").unwrap(), "Launch");
        assert_eq!(
            title(Some(&"t".repeat(256)), "Project").unwrap_err(),
            "Title cannot exceed 255 characters"
        );
    }

    #[test]
    fn test_description_normalization() {
        assert_eq!(description(None).unwrap(), None);
        assert_eq!(description(Some(&serde_json::Value::Null)).unwrap(), None);
        assert_eq!(description(Some(&serde_json::json!("  "))).unwrap(), None);
        assert_eq!(
            description(Some(&serde_json::json!(" notes "))).unwrap(),
            Some("notes".to_string())
        );
    }

    #[test]
    fn test_description_must_be_text() {
        for bad in [
            serde_json::json!(7),
            serde_json::json!(true),
            serde_json::json!(["notes"]),
            serde_json::json!({"text": "notes"}),
        ] {
            assert_eq!(
                description(Some(&bad)).unwrap_err(),
                "Description must be text",
                "case: {}",
                bad
            );
        }
    }

    #[test]
    fn test_title_and_description_failures_aggregate() {
        let mut errors = FieldErrors::new();

        let title = errors.capture("title", title(Some("  "), "Project"));
        let description =
            errors.capture("description", description(Some(&serde_json::json!(42))));

        assert!(title.is_none());
        assert!(description.is_none());
        assert_eq!(errors.get("title"), Some("Project title is required"));
        assert_eq!(errors.get("description"), Some("Description must be text"));
    }

    #[test]
    fn test_field_errors_aggregate_all_failures() {
        let mut errors = FieldErrors::new();

        let email = errors.capture("email", email(Some("nope")));
        let name = errors.capture("name", name(None));
        let password = errors.capture("password", password(Some("short")));
        let role = errors.capture("role", role(Some("project_manager")));

        assert!(email.is_none());
        assert!(name.is_none());
        assert!(password.is_none());
        assert!(role.is_some());

        assert!(!errors.is_empty());
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters long")
        );
        assert_eq!(errors.get("role"), None);
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Project title is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"], "Project title is required");
    }
}
