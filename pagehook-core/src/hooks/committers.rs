//! Committer list derived from commit history.

use pagehook_types::{CommitRecord, Committer};
use std::collections::HashSet;

/// Deduplicate commit authors by avatar URL, keeping first-seen order.
///
/// Records without an avatar URL or without a commit author are skipped.
/// The display string of a committer comes from its first record.
pub fn extract_committers(records: &[CommitRecord]) -> Vec<Committer> {
    let mut seen = HashSet::new();
    let mut committers = Vec::new();

    for record in records {
        let (Some(avatar_url), Some(signature)) = (record.avatar_url(), record.signature()) else {
            continue;
        };
        if !seen.insert(avatar_url) {
            continue;
        }

        committers.push(Committer {
            avatar_url: avatar_url.to_string(),
            display: format!(
                "{} | {}",
                signature.name.as_deref().unwrap_or_default(),
                signature.email.as_deref().unwrap_or_default()
            ),
        });
    }

    tracing::debug!("Number of committers extracted: {}", committers.len());
    committers
}
