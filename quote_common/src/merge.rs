//! Server-wins reconciliation of the local quote sequence with a fetched remote one.
//!
//! Records are matched by `id` only. For every remote record:
//!
//! - no local record with that id: the remote record is appended (an *addition*);
//! - a local record exists and its `text` differs: the local `text` and `category` are
//!   overwritten with the remote values (a *conflict resolved*; the server always wins);
//! - a local record exists with the same `text`: nothing happens.
//!
//! Records are never matched by content.

use crate::quote::Quote;

/// Counts produced by one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote records appended because their id was new locally.
    pub added: usize,
    /// Local records overwritten because the remote text differed.
    pub conflicts: usize,
}

impl MergeReport {
    /// Returns `true` if the merge modified the local sequence.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.conflicts > 0
    }
}

/// Merge `remote` into `local` in place and report what changed.
pub fn merge_server_wins(local: &mut Vec<Quote>, remote: &[Quote]) -> MergeReport {
    let mut report = MergeReport::default();

    for incoming in remote {
        match local.iter_mut().find(|q| q.id == incoming.id) {
            None => {
                local.push(incoming.clone());
                report.added += 1;
            }
            Some(existing) if existing.text != incoming.text => {
                existing.text = incoming.text.clone();
                existing.category = incoming.category.clone();
                report.conflicts += 1;
            }
            Some(_) => {}
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_wins_on_text_conflict() {
        let mut local = vec![Quote::new(1, "A", "X")];
        let remote = vec![Quote::new(1, "B", "Y")];

        let report = merge_server_wins(&mut local, &remote);

        assert_eq!(local, vec![Quote::new(1, "B", "Y")]);
        assert_eq!(report, MergeReport { added: 0, conflicts: 1 });
    }

    #[test]
    fn new_ids_are_appended_in_remote_order() {
        let mut local = vec![Quote::new(1, "A", "X")];
        let remote = vec![Quote::new(9, "C", "Server"), Quote::new(8, "D", "Server")];

        let report = merge_server_wins(&mut local, &remote);

        let ids: Vec<u64> = local.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 9, 8]);
        assert_eq!(report, MergeReport { added: 2, conflicts: 0 });
    }

    #[test]
    fn same_text_is_left_alone_even_if_category_differs() {
        let mut local = vec![Quote::new(1, "A", "Mine")];
        let report = merge_server_wins(&mut local, &[Quote::new(1, "A", "Server")]);

        assert!(!report.changed());
        assert_eq!(local[0].category, "Mine");
    }

    #[test]
    fn empty_remote_changes_nothing() {
        let mut local = vec![Quote::new(1, "A", "X")];
        let report = merge_server_wins(&mut local, &[]);
        assert_eq!(report, MergeReport::default());
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn only_first_local_duplicate_is_overwritten() {
        let mut local = vec![Quote::new(1, "A", "X"), Quote::new(1, "A", "X")];
        merge_server_wins(&mut local, &[Quote::new(1, "B", "Y")]);
        assert_eq!(local[0].text, "B");
        assert_eq!(local[1].text, "A");
    }
}
