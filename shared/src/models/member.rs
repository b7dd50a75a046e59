//! Member Model

use serde::{Deserialize, Serialize};

/// Normalize a member identifier into the email key used by every index
///
/// Records arrive with the member's email in whatever case the server stored;
/// all maps are keyed by the trimmed, lowercased form.
pub fn member_key(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase()
}

/// Chapter member, as returned by the directory fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Chapter role label (e.g. "Brother", "President")
    pub role: String,
    /// Officer privilege flag
    pub privileged: bool,
    /// Calendar year the member first attended; drives the class year
    pub first_year: i32,
    /// Graduation term, e.g. "Spring 2027"
    pub grad_term: String,
    /// Pledge class term, e.g. "Fall 2024"
    pub pledge_class: String,
    pub phone: String,
}

impl Member {
    /// Index key for this member
    pub fn key(&self) -> String {
        member_key(&self.email)
    }

    /// "First Last" display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply self-editable fields, returning the replacement entity
    pub fn with_edit(&self, edit: &MemberEdit) -> Self {
        let mut updated = self.clone();
        if let Some(phone) = &edit.phone {
            updated.phone = phone.clone();
        }
        if let Some(grad_term) = &edit.grad_term {
            updated.grad_term = grad_term.clone();
        }
        updated
    }
}

/// Self-editable member fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEdit {
    pub email: String,
    pub phone: Option<String>,
    pub grad_term: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Member {
        Member {
            email: "Alice@Example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Anders".to_string(),
            role: "Brother".to_string(),
            privileged: false,
            first_year: 2023,
            grad_term: "Spring 2027".to_string(),
            pledge_class: "Fall 2023".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_member_key_normalizes() {
        assert_eq!(member_key("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(alice().key(), "alice@example.com");
    }

    #[test]
    fn test_with_edit_only_touches_given_fields() {
        let edit = MemberEdit {
            email: "alice@example.com".to_string(),
            phone: Some("555-0199".to_string()),
            grad_term: None,
        };
        let updated = alice().with_edit(&edit);
        assert_eq!(updated.phone, "555-0199");
        assert_eq!(updated.grad_term, "Spring 2027");
        assert_eq!(updated.full_name(), "Alice Anders");
    }

    #[test]
    fn test_member_requires_all_fields() {
        let json = r#"{"email":"a@x.org","first_name":"A","last_name":"B"}"#;
        assert!(serde_json::from_str::<Member>(json).is_err());
    }
}
