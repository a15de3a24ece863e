use crate::model::{DuplicateGroup, Resolution};

/// Pick the survivor of a group: the largest member, the earliest discovered
/// one on equal sizes. Every other member is marked for removal.
///
/// Size is only a proxy for the most complete copy; no content is compared.
/// Returns `None` for a group without members.
pub fn resolve(group: &DuplicateGroup) -> Option<Resolution> {
    let survivor_index = group
        .members
        .iter()
        .enumerate()
        .fold(None::<usize>, |best, (idx, member)| match best {
            Some(b) if group.members[b].size_bytes >= member.size_bytes => Some(b),
            _ => Some(idx),
        })?;

    let removed = group
        .members
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != survivor_index)
        .map(|(_, member)| member.clone())
        .collect();

    Some(Resolution {
        group: group.clone(),
        survivor: group.members[survivor_index].clone(),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalKey, FileRecord};

    fn group_of(members: &[(&str, u64)]) -> DuplicateGroup {
        DuplicateGroup {
            key: CanonicalKey::new("Doc"),
            members: members
                .iter()
                .map(|(name, size)| FileRecord::new(format!("/lib/{}", name), *size))
                .collect(),
        }
    }

    #[test]
    fn test_largest_member_survives() {
        let group = group_of(&[("Doc 1.pdf", 100), ("Doc 2.pdf", 250), ("Doc.pdf", 80)]);
        let resolution = resolve(&group).unwrap();
        assert_eq!(resolution.survivor.display_name, "Doc 2.pdf");
        let removed: Vec<&str> = resolution
            .removed
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(removed, vec!["Doc 1.pdf", "Doc.pdf"]);
    }

    #[test]
    fn test_size_tie_goes_to_earliest_discovered() {
        let group = group_of(&[("Doc 3.pdf", 10), ("Doc.pdf", 500), ("Doc 2.pdf", 500)]);
        let resolution = resolve(&group).unwrap();
        assert_eq!(resolution.survivor.display_name, "Doc.pdf");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let group = group_of(&[("Doc.pdf", 7), ("Doc 1.pdf", 7), ("Doc 2.pdf", 7)]);
        let first = resolve(&group).unwrap();
        let second = resolve(&group).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.survivor.display_name, "Doc.pdf");
    }

    #[test]
    fn test_survivor_is_maximal_and_members_are_conserved() {
        let group = group_of(&[("a", 3), ("b", 9), ("c", 9), ("d", 1), ("e", 4)]);
        let resolution = resolve(&group).unwrap();
        assert!(group
            .members
            .iter()
            .all(|m| resolution.survivor.size_bytes >= m.size_bytes));
        assert_eq!(resolution.removed.len() + 1, group.members.len());
        assert!(!resolution.removed.contains(&resolution.survivor));
        assert!(group.members.contains(&resolution.survivor));
    }

    #[test]
    fn test_empty_group_has_no_resolution() {
        let group = group_of(&[]);
        assert!(resolve(&group).is_none());
    }
}
