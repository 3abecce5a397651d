use crate::state::FeedState;
use crate::FeedStore;
use domain::{Comment, Cursor, DiscussionId, Page};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    First,
    Next,
    /// Wholesale re-fetch; the current items stay visible until the result lands.
    Refresh,
}

/// Proof that the loading guard was taken. Hand it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub discussion_id: DiscussionId,
    pub cursor: Option<Cursor>,
    pub kind: LoadKind,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { appended: usize },
    /// The store was reset or closed while the fetch was in flight.
    Discarded,
}

fn restart(st: &mut FeedState, discussion_id: DiscussionId) -> LoadTicket {
    st.reset(discussion_id);
    st.is_loading = true;
    LoadTicket {
        discussion_id,
        cursor: None,
        kind: LoadKind::First,
        generation: st.generation,
    }
}

fn refresh_in_place(st: &mut FeedState, discussion_id: DiscussionId) -> LoadTicket {
    if st.discussion_id != Some(discussion_id) {
        return restart(st, discussion_id);
    }
    st.generation += 1;
    st.is_loading = true;
    LoadTicket {
        discussion_id,
        cursor: None,
        kind: LoadKind::Refresh,
        generation: st.generation,
    }
}

impl FeedStore {
    /// Resets the store for `discussion_id` and takes the loading guard.
    ///
    /// Rejected while a load for the same discussion is already in flight.
    /// A different discussion supersedes whatever is in flight.
    pub fn begin_first_page(&self, discussion_id: DiscussionId) -> Option<LoadTicket> {
        let mut st = self.lock();
        if st.closed {
            return None;
        }
        if st.is_loading && st.discussion_id == Some(discussion_id) {
            debug!(view = ?self.view(), %discussion_id, "first page already loading, rejected");
            return None;
        }
        Some(restart(&mut st, discussion_id))
    }

    /// Discards everything and takes the guard unconditionally, superseding
    /// any in-flight load.
    pub fn begin_reload(&self, discussion_id: DiscussionId) -> Option<LoadTicket> {
        let mut st = self.lock();
        if st.closed {
            return None;
        }
        Some(restart(&mut st, discussion_id))
    }

    /// Takes the guard for a wholesale re-fetch without clearing the items.
    /// A refresh requested while one is in flight only marks the store stale.
    pub fn begin_refresh(&self, discussion_id: DiscussionId) -> Option<LoadTicket> {
        let mut st = self.lock();
        if st.closed {
            return None;
        }
        if st.is_loading && st.discussion_id == Some(discussion_id) {
            st.stale = true;
            debug!(view = ?self.view(), %discussion_id, "refresh coalesced");
            return None;
        }
        Some(refresh_in_place(&mut st, discussion_id))
    }

    /// Follow-up for refreshes coalesced while the last one was in flight.
    /// Clears the stale mark; `None` when nothing was requested or another
    /// load already holds the guard.
    pub fn continue_refresh(&self, discussion_id: DiscussionId) -> Option<LoadTicket> {
        let mut st = self.lock();
        let stale = std::mem::take(&mut st.stale);
        if !stale || st.closed || st.is_loading {
            return None;
        }
        debug!(view = ?self.view(), %discussion_id, "running coalesced refresh");
        Some(refresh_in_place(&mut st, discussion_id))
    }

    /// Takes the guard for the page after the stored cursor.
    /// `None` when there is nothing more to load or a load is in flight.
    pub fn begin_next_page(&self) -> Option<LoadTicket> {
        let mut st = self.lock();
        if st.closed || st.is_loading || !st.has_next {
            return None;
        }
        let discussion_id = st.discussion_id?;
        let Some(cursor) = st.cursor.clone() else {
            warn!(view = ?self.view(), %discussion_id, "has_next without a cursor, stopping");
            st.has_next = false;
            return None;
        };
        st.is_loading = true;
        Some(LoadTicket {
            discussion_id,
            cursor: Some(cursor),
            kind: LoadKind::Next,
            generation: st.generation,
        })
    }

    /// Commits a fetched page and releases the guard.
    pub fn apply_page(&self, ticket: &LoadTicket, page: Page) -> ApplyOutcome {
        let mut st = self.lock();
        if st.closed || st.generation != ticket.generation {
            debug!(view = ?self.view(), discussion_id = %ticket.discussion_id, "stale page discarded");
            return ApplyOutcome::Discarded;
        }

        let appended = page.items.len();
        if ticket.kind != LoadKind::Next {
            st.items.clear();
            st.index.clear();
        }
        st.append(page.items);
        st.has_next = page.has_next;
        st.cursor = page.next_cursor;
        st.total_elements = page.total_elements;
        st.is_loading = false;

        info!(
            view = ?self.view(),
            discussion_id = %ticket.discussion_id,
            appended,
            total = st.total_elements,
            has_next = st.has_next,
            "page applied"
        );
        ApplyOutcome::Applied { appended }
    }

    /// Wholesale replacement for a view that is fetched in one piece.
    pub fn replace_all(&self, ticket: &LoadTicket, comments: Vec<Comment>) -> ApplyOutcome {
        let total_elements = comments.len() as u64;
        self.apply_page(
            ticket,
            Page {
                items: comments,
                has_next: false,
                next_cursor: None,
                total_elements,
            },
        )
    }

    /// Releases the guard after a failed fetch. Loaded items stay as they were.
    pub fn fail_load(&self, ticket: &LoadTicket) -> ApplyOutcome {
        let mut st = self.lock();
        if st.closed || st.generation != ticket.generation {
            return ApplyOutcome::Discarded;
        }
        st.is_loading = false;
        ApplyOutcome::Applied { appended: 0 }
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{comment, page};
    use crate::{ApplyOutcome, FeedStore, LoadKind};
    use domain::{CommentId, Cursor, DiscussionId, ViewKind};

    fn d(n: i64) -> DiscussionId {
        DiscussionId::new(n).unwrap()
    }

    #[test]
    fn pages_append_in_arrival_order() {
        let store = FeedStore::new(ViewKind::Full);
        let t = store.begin_first_page(d(1)).unwrap();
        store.apply_page(&t, page(&[1, 2], Some(2), 5));

        let t = store.begin_next_page().unwrap();
        assert_eq!(t.cursor, Some(Cursor::new("2")));
        store.apply_page(&t, page(&[3, 4], Some(4), 5));

        let t = store.begin_next_page().unwrap();
        store.apply_page(&t, page(&[5], None, 5));

        let snap = store.snapshot();
        let ids: Vec<i64> = snap.ids().into_iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(!snap.has_next);
        assert!(store.begin_next_page().is_none());
    }

    #[test]
    fn guard_rejects_a_second_load_while_in_flight() {
        let store = FeedStore::new(ViewKind::Full);
        let t = store.begin_first_page(d(1)).unwrap();
        assert!(store.begin_first_page(d(1)).is_none());
        assert!(store.begin_next_page().is_none());
        store.apply_page(&t, page(&[1], Some(1), 3));

        let next = store.begin_next_page().unwrap();
        assert!(store.begin_next_page().is_none());
        store.fail_load(&next);
        assert!(!store.is_loading());
        assert_eq!(store.len(), 1);
        assert!(store.begin_next_page().is_some());
    }

    #[test]
    fn switching_discussion_discards_the_old_result() {
        let store = FeedStore::new(ViewKind::Full);
        let old = store.begin_first_page(d(1)).unwrap();
        let new = store.begin_first_page(d(2)).unwrap();

        assert_eq!(store.apply_page(&old, page(&[1], None, 1)), ApplyOutcome::Discarded);
        assert!(store.is_loading());
        store.apply_page(&new, page(&[20, 21], None, 2));
        assert_eq!(store.discussion_id(), Some(d(2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn closed_store_ignores_late_results() {
        let store = FeedStore::new(ViewKind::Full);
        let t = store.begin_first_page(d(1)).unwrap();
        store.close();
        assert_eq!(store.apply_page(&t, page(&[1], None, 1)), ApplyOutcome::Discarded);
        assert!(store.is_empty());
        assert!(store.begin_first_page(d(1)).is_none());
        assert!(!store.sentinel_mounted());
    }

    #[test]
    fn refresh_during_flight_is_coalesced_into_one_follow_up() {
        let store = FeedStore::new(ViewKind::Digest);
        let t = store.begin_refresh(d(1)).unwrap();
        assert!(store.begin_refresh(d(1)).is_none());
        assert!(store.begin_refresh(d(1)).is_none());
        store.apply_page(&t, page(&[1], None, 1));

        let follow_up = store.continue_refresh(d(1)).unwrap();
        assert_eq!(follow_up.kind, LoadKind::Refresh);
        assert!(store.continue_refresh(d(1)).is_none());
        store.apply_page(&follow_up, page(&[2, 1], None, 2));
        assert!(store.continue_refresh(d(1)).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn refresh_keeps_items_until_the_result_lands() {
        let store = FeedStore::new(ViewKind::Digest);
        let t = store.begin_first_page(d(1)).unwrap();
        store.replace_all(&t, vec![comment(1), comment(2)]);

        let t = store.begin_refresh(d(1)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_elements(), 2);

        let mut liked = comment(2);
        liked.like_count = 3;
        assert!(store.merge_vote(&liked).is_some());

        assert_eq!(store.fail_load(&t), ApplyOutcome::Applied { appended: 0 });
        let snap = store.snapshot();
        assert_eq!(snap.ids(), vec![CommentId::new(1), CommentId::new(2)]);
        assert_eq!(snap.items[1].like_count, 3);
        assert!(!snap.is_loading);

        let t = store.begin_refresh(d(1)).unwrap();
        store.replace_all(&t, vec![comment(2)]);
        assert_eq!(store.snapshot().ids(), vec![CommentId::new(2)]);
    }

    #[test]
    fn refresh_for_another_discussion_starts_over() {
        let store = FeedStore::new(ViewKind::Digest);
        let t = store.begin_first_page(d(1)).unwrap();
        store.replace_all(&t, vec![comment(1)]);

        let t = store.begin_refresh(d(2)).unwrap();
        assert_eq!(t.kind, LoadKind::First);
        assert!(store.is_empty());
        assert_eq!(store.discussion_id(), Some(d(2)));
    }

    #[test]
    fn sentinel_needs_elements_and_an_idle_store() {
        let store = FeedStore::new(ViewKind::Full);
        let t = store.begin_first_page(d(1)).unwrap();
        assert!(!store.sentinel_mounted());
        store.apply_page(&t, page(&[], None, 0));
        assert!(!store.sentinel_mounted());

        let t = store.begin_reload(d(1)).unwrap();
        store.apply_page(&t, page(&[1], Some(1), 4));
        assert!(store.sentinel_mounted());
    }

    #[test]
    fn replace_all_swaps_the_whole_digest() {
        let store = FeedStore::new(ViewKind::Digest);
        let t = store.begin_first_page(d(1)).unwrap();
        store.replace_all(&t, vec![comment(4), comment(2)]);

        let t = store.begin_refresh(d(1)).unwrap();
        store.replace_all(&t, vec![comment(2), comment(7), comment(4)]);
        let snap = store.snapshot();
        let ids: Vec<i64> = snap.ids().into_iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![2, 7, 4]);
        assert_eq!(snap.total_elements, 3);
        assert!(!snap.has_next);
        assert_eq!(snap.cursor, None);
    }
}
