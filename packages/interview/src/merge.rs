// ABOUTME: Append-only summary merge engine
// ABOUTME: Applies collaborator deltas with normalized-text deduplication, returning what was actually inserted

use std::collections::HashSet;

use specloom_core::{normalize_answer, Summary, SummaryDelta};

/// Merge a delta into the summary in place.
///
/// Per area: each delta item is appended only if no recorded item in that
/// area shares its normalized form; otherwise it is dropped silently. Blank
/// items are dropped too. Returns the subset of items that were actually
/// inserted, so callers can highlight what is new. Re-applying the same
/// delta is a no-op.
pub fn apply_delta(summary: &mut Summary, delta: &SummaryDelta) -> SummaryDelta {
    let mut inserted = SummaryDelta::new();

    for (area, items) in delta {
        let recorded = summary.entry(*area).or_default();
        let mut seen: HashSet<String> = recorded
            .iter()
            .map(|item| normalize_answer(&item.text))
            .collect();

        for item in items {
            let normalized = normalize_answer(&item.text);
            if normalized.is_empty() || seen.contains(&normalized) {
                continue;
            }
            seen.insert(normalized);
            recorded.push(item.clone());
            inserted.entry(*area).or_default().push(item.clone());
        }
    }

    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use specloom_core::{AreaId, InterviewState, ItemFlag, SummaryItem};

    fn delta(area: AreaId, items: &[&str]) -> SummaryDelta {
        let mut delta = SummaryDelta::new();
        delta.insert(area, items.iter().copied().map(SummaryItem::new).collect());
        delta
    }

    #[test]
    fn appends_new_items_in_discovery_order() {
        let mut summary = InterviewState::new("p1").summary;
        summary
            .get_mut(&AreaId::Discovery)
            .unwrap()
            .push(SummaryItem::new("Users struggle with manual steps"));

        let inserted = apply_delta(
            &mut summary,
            &delta(AreaId::Discovery, &["Users lose time waiting for approval"]),
        );

        let items = &summary[&AreaId::Discovery];
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "Users struggle with manual steps");
        assert_eq!(items[1].text, "Users lose time waiting for approval");
        assert_eq!(inserted[&AreaId::Discovery].len(), 1);
    }

    #[test]
    fn reapplying_the_same_delta_is_idempotent() {
        let mut summary = InterviewState::new("p1").summary;
        let d = delta(AreaId::Discovery, &["Users lose time waiting for approval"]);

        apply_delta(&mut summary, &d);
        let second = apply_delta(&mut summary, &d);

        assert_eq!(summary[&AreaId::Discovery].len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn dedup_is_by_normalized_form() {
        let mut summary = InterviewState::new("p1").summary;
        apply_delta(&mut summary, &delta(AreaId::Features, &["Export to PDF"]));
        let inserted = apply_delta(
            &mut summary,
            &delta(AreaId::Features, &["  export TO pdf! "]),
        );

        assert_eq!(summary[&AreaId::Features].len(), 1);
        assert!(inserted.is_empty());
    }

    #[test]
    fn same_text_may_appear_in_different_areas() {
        let mut summary = InterviewState::new("p1").summary;
        apply_delta(&mut summary, &delta(AreaId::Scope, &["Mobile app"]));
        apply_delta(&mut summary, &delta(AreaId::Features, &["Mobile app"]));

        assert_eq!(summary[&AreaId::Scope].len(), 1);
        assert_eq!(summary[&AreaId::Features].len(), 1);
    }

    #[test]
    fn duplicate_within_one_delta_inserts_once() {
        let mut summary = InterviewState::new("p1").summary;
        let inserted = apply_delta(
            &mut summary,
            &delta(AreaId::Users, &["Admins", "admins.", "Admins"]),
        );

        assert_eq!(summary[&AreaId::Users].len(), 1);
        assert_eq!(inserted[&AreaId::Users].len(), 1);
    }

    #[test]
    fn blank_items_are_dropped() {
        let mut summary = InterviewState::new("p1").summary;
        let inserted = apply_delta(&mut summary, &delta(AreaId::Constraints, &["", "  ", "?"]));

        assert!(summary[&AreaId::Constraints].is_empty());
        assert!(inserted.is_empty());
    }

    #[test]
    fn flags_survive_the_merge() {
        let mut summary = InterviewState::new("p1").summary;
        let mut d = SummaryDelta::new();
        d.insert(
            AreaId::Constraints,
            vec![SummaryItem::flagged(
                "Budget is unlimited",
                ItemFlag::Contradiction,
            )],
        );

        apply_delta(&mut summary, &d);
        assert_eq!(
            summary[&AreaId::Constraints][0].flag,
            ItemFlag::Contradiction
        );
    }

    #[test]
    fn summary_never_shrinks() {
        let mut summary = InterviewState::new("p1").summary;
        apply_delta(&mut summary, &delta(AreaId::Discovery, &["fact one"]));
        apply_delta(&mut summary, &SummaryDelta::new());
        apply_delta(&mut summary, &delta(AreaId::Discovery, &[]));

        assert_eq!(summary[&AreaId::Discovery].len(), 1);
    }
}
