use crate::app::Roster;

/// Narrow the visible user list to entries matching `query` (case-insensitive)
/// by name, email, or id. An empty query shows everyone.
pub fn apply_search(roster: &mut Roster, query: &str) {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        roster.users = roster.users_all.clone();
    } else {
        roster.users = roster
            .users_all
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&q)
                    || u.email.to_lowercase().contains(&q)
                    || u.id.to_lowercase().contains(&q)
            })
            .cloned()
            .collect();
    }
    roster.selected = 0;
}
