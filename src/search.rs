//! Client-side listing and search over admin and staff rows.

use chrono::{DateTime, Local, Utc};

use crate::models::{Admin, Role, Staff};

/// Status shown for rows without one.
pub const DEFAULT_STATUS: &str = "Active";

/// A row shown in the user management table.
pub trait DirectoryEntry {
    fn email(&self) -> &str;

    /// Name as shown in the table.
    fn display_name(&self) -> String;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn status(&self) -> Option<&str>;

    fn status_label(&self) -> &str {
        self.status().filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_STATUS)
    }

    /// Case-insensitive substring match on email or display name.
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.email().to_lowercase().contains(&needle) || self.display_name().to_lowercase().contains(&needle)
    }
}

/// Join name parts with single spaces, skipping blanks.
fn join_names<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl DirectoryEntry for Admin {
    fn email(&self) -> &str {
        &self.email
    }

    fn display_name(&self) -> String {
        join_names([self.first_name.as_str(), self.last_name.as_str()])
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl DirectoryEntry for Staff {
    fn email(&self) -> &str {
        &self.email
    }

    fn display_name(&self) -> String {
        join_names([
            self.first_name.as_str(),
            self.middle_name.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ])
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Rows matching `query`, in their original order.
pub fn filter<'a, T: DirectoryEntry>(entries: &'a [T], query: &str) -> Vec<&'a T> {
    entries.iter().filter(|e| e.matches(query)).collect()
}

/// Up to two uppercase initials, e.g. "Ana Cruz" -> "AC".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Creation date as shown in the table, in local time.
pub fn format_created(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(dt) => dt.with_timezone(&Local).format("%B %-d, %Y at %-I:%M %p").to_string(),
        None => "-".to_string(),
    }
}

/// Cached rows and search state for the user management screen.
#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    pub admins: Vec<Admin>,
    pub staff: Vec<Staff>,
    pub view: Role,
    pub query: String,
    pub loaded: bool,
}

impl UserDirectory {
    /// Replace both lists after a successful fetch.
    pub fn replace(&mut self, admins: Vec<Admin>, staff: Vec<Staff>) {
        self.admins = admins;
        self.staff = staff;
        self.loaded = true;
    }

    pub fn visible_admins(&self) -> Vec<&Admin> {
        filter(&self.admins, &self.query)
    }

    pub fn visible_staff(&self) -> Vec<&Staff> {
        filter(&self.staff, &self.query)
    }

    /// (matching, total) for the current view.
    pub fn counts(&self) -> (usize, usize) {
        match self.view {
            Role::Admin => (self.visible_admins().len(), self.admins.len()),
            Role::Staff => (self.visible_staff().len(), self.staff.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn admin(first: &str, last: &str, email: &str) -> Admin {
        Admin {
            admin_uuid: None,
            email: email.to_string(),
            first_name: first.to_string(),
            middle_name: Some("Ignored".to_string()),
            last_name: last.to_string(),
            age: None,
            birthday: None,
            address: None,
            created_at: None,
            status: None,
        }
    }

    fn staff(first: &str, middle: Option<&str>, last: &str, email: &str) -> Staff {
        Staff {
            staff_id: 2025100000,
            email: email.to_string(),
            first_name: first.to_string(),
            middle_name: middle.map(str::to_string),
            last_name: last.to_string(),
            age: None,
            birthday: None,
            address: None,
            created_at: None,
            status: Some("On leave".to_string()),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let admins = vec![
            admin("Ana", "Cruz", "ana@library.ph"),
            admin("Ben", "Reyes", "ben@library.ph"),
        ];

        assert_eq!(filter(&admins, "CRU").len(), 1);
        assert_eq!(filter(&admins, "library.PH").len(), 2);
        assert_eq!(filter(&admins, "ana cruz").len(), 1);
        assert!(filter(&admins, "zzz").is_empty());
    }

    #[test]
    fn test_empty_query_matches_all() {
        let admins = vec![admin("Ana", "Cruz", "a@x"), admin("Ben", "Reyes", "b@x")];
        assert_eq!(filter(&admins, "").len(), 2);
        assert_eq!(filter(&admins, "   ").len(), 2);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(admin("Ana", "Cruz", "a@x").display_name(), "Ana Cruz");
        assert_eq!(staff("Ben", Some("Dela"), "Reyes", "b@x").display_name(), "Ben Dela Reyes");
        assert_eq!(staff("Ben", None, "Reyes", "b@x").display_name(), "Ben Reyes");
        assert_eq!(staff("Ben", Some(" "), "Reyes", "b@x").display_name(), "Ben Reyes");
    }

    #[test]
    fn test_staff_search_includes_middle_name() {
        let rows = vec![staff("Ben", Some("Dela"), "Reyes", "b@x")];
        assert_eq!(filter(&rows, "dela").len(), 1);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ana Cruz"), "AC");
        assert_eq!(initials("ben dela reyes"), "BD");
        assert_eq!(initials("Solo"), "S");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_status_label_defaults_to_active() {
        assert_eq!(admin("A", "B", "a@x").status_label(), "Active");
        assert_eq!(staff("A", None, "B", "a@x").status_label(), "On leave");
    }

    #[test]
    fn test_format_created() {
        assert_eq!(format_created(None), "-");
        let dt = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        let text = format_created(Some(dt));
        assert!(text.contains("2025"));
        assert!(text.contains(" at "));
    }

    #[test]
    fn test_directory_counts_follow_view() {
        let mut dir = UserDirectory::default();
        dir.replace(
            vec![admin("Ana", "Cruz", "ana@x"), admin("Ben", "Reyes", "ben@x")],
            vec![staff("Cy", None, "Lim", "cy@x")],
        );
        dir.query = "ana".to_string();
        assert_eq!(dir.counts(), (1, 2));

        dir.view = Role::Staff;
        assert_eq!(dir.counts(), (0, 1));
        assert!(dir.loaded);
    }
}
