use crate::source::UserRecord;

/// Case-insensitive substring match over name, email and website.
///
/// `query` is expected to be lowercased already. Missing fields never match.
pub fn matches(user: &UserRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let hit = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(query));
    hit(Some(&user.name)) || hit(user.email.as_deref()) || hit(user.website.as_deref())
}

/// Keep the records matching `search_text`, preserving their order.
///
/// Leading and trailing whitespace is significant.
pub fn apply_search<'a>(users: &'a [UserRecord], search_text: &str) -> Vec<&'a UserRecord> {
    let q = search_text.to_lowercase();
    users.iter().filter(|u| matches(u, &q)).collect()
}
