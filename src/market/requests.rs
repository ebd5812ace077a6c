//! Pending request queue.

use crate::types::{Request, SubmissionId};

/// Unordered collection of pending requests
///
/// Insertion order is kept only for display; matching always follows the
/// priority order of [`Request`]'s `Ord`.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    pending: Vec<Request>,
}

impl RequestQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request
    pub fn submit(&mut self, request: Request) {
        self.pending.push(request);
    }

    /// Remove every request, most urgent first, then earliest submitted
    pub fn drain_by_priority(&mut self) -> Vec<Request> {
        let mut drained = self.drain();
        // Submission ids are unique, so the order is total and the sort is
        // deterministic even though it is unstable.
        drained.sort_unstable();
        drained
    }

    /// Remove every request in submission order
    pub fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending)
    }

    /// Withdraw a single request before it is processed
    pub fn withdraw(&mut self, id: SubmissionId) -> Option<Request> {
        let pos = self.pending.iter().position(|r| r.submitted_at() == id)?;
        Some(self.pending.remove(pos))
    }

    /// Pending requests in submission order
    #[must_use]
    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    /// Number of pending requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Extend<Request> for RequestQueue {
    fn extend<I: IntoIterator<Item = Request>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}

impl FromIterator<Request> for RequestQueue {
    fn from_iter<I: IntoIterator<Item = Request>>(iter: I) -> Self {
        Self {
            pending: iter.into_iter().collect(),
        }
    }
}
