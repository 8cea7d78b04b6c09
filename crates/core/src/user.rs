use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: &'static str,
    pub name: &'static str,
    pub avatar: &'static str,
}

pub const DEFAULT_USER_ID: &str = "user-1";

pub const USERS: [User; 3] = [
    User {
        id: "user-1",
        name: "Nguyen Van A",
        avatar: "👨‍💼",
    },
    User {
        id: "user-2",
        name: "Tran Thi B",
        avatar: "👩‍💼",
    },
    User {
        id: "user-3",
        name: "Le Van C",
        avatar: "👨‍🔧",
    },
];

pub fn users() -> &'static [User] {
    &USERS
}

pub fn find_user(id: &str) -> Option<&'static User> {
    USERS.iter().find(|u| u.id == id)
}

/// Resolve an id to a known user, falling back to the default user.
pub fn resolve_user(id: &str) -> &'static User {
    find_user(id).unwrap_or(&USERS[0])
}
