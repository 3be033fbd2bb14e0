use crate::record::Relationship;

/// Classify the raw text of a profile's relationship-action control.
///
/// Case-insensitive substring match, first hit wins: "pending" beats
/// "follow", and empty text (control missing or unreadable) degrades to
/// `AlreadyConnectedOrUnknown` rather than failing.
pub fn classify(control_text: &str) -> Relationship {
    let lower = control_text.trim().to_lowercase();
    if lower.contains("pending") {
        Relationship::Pending
    } else if lower.contains("follow") {
        Relationship::Following
    } else if lower.is_empty() {
        Relationship::AlreadyConnectedOrUnknown
    } else {
        Relationship::Unconnected
    }
}
