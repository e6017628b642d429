pub mod dashboard;
pub mod health;
pub mod participants;
pub mod questionnaires;
pub mod records;
pub mod studies;
pub mod templates;
pub mod visits;
pub mod wearables;

/// Path of a participant's detail page.
pub(crate) fn participant_path(pid: i64) -> String {
    format!("/participants/{pid}")
}

/// Path of a visit's dashboard.
pub(crate) fn visit_path(pid: i64, vid: i64) -> String {
    format!("/participants/{pid}/visits/{vid}")
}
