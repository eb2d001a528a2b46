use crate::types::db::user::UserRole;

/// Human-readable employee role labels and the login role each one grants.
///
/// Labels are compared after trimming and lower-casing. Anything not listed
/// maps to [`DEFAULT_USER_ROLE`].
pub const ROLE_LABELS: &[(&str, UserRole)] = &[
    ("admin", UserRole::Admin),
    ("administrator", UserRole::Admin),
    ("super admin", UserRole::Admin),
    ("director", UserRole::Admin),
    ("manager", UserRole::Manager),
    ("project manager", UserRole::Manager),
    ("team lead", UserRole::Manager),
    ("team leader", UserRole::Manager),
    ("hr", UserRole::Hr),
    ("human resources", UserRole::Hr),
    ("hr manager", UserRole::Hr),
    ("hr executive", UserRole::Hr),
    ("employee", UserRole::Employee),
    ("developer", UserRole::Employee),
    ("intern", UserRole::Employee),
];

pub const DEFAULT_USER_ROLE: UserRole = UserRole::Employee;

/// Role label stored on employees created without one
pub const DEFAULT_ROLE_LABEL: &str = "Employee";

/// Map an employee role label onto the login role used for the user record
pub fn user_role_for(label: &str) -> UserRole {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    ROLE_LABELS
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, role)| *role)
        .unwrap_or(DEFAULT_USER_ROLE)
}
