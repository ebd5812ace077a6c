//! Buyer requests.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

use super::Urgency;

static NEXT_SUBMISSION: AtomicU64 = AtomicU64::new(1);

/// Monotonic submission stamp
///
/// Assigned when a [`Request`] is created; strictly increasing across the
/// whole process, so it doubles as a unique request id and as the
/// first-come tie-break between equally urgent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(u64);

impl SubmissionId {
    fn next() -> Self {
        SubmissionId(NEXT_SUBMISSION.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw sequence value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request for a title
///
/// `Ord` is the matching priority: lower urgency first, then earlier
/// submission. Two distinct requests never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    title: String,
    requester: String,
    urgency: Urgency,
    submitted_at: SubmissionId,
}

impl Request {
    /// Create a request stamped with the next submission id
    pub fn new(title: impl Into<String>, requester: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            title: title.into(),
            requester: requester.into(),
            urgency,
            submitted_at: SubmissionId::next(),
        }
    }

    /// Requested title (matched ignoring case)
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Who asked for it
    pub fn requester(&self) -> &str {
        &self.requester
    }

    /// Urgency rank, lower is more urgent
    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Submission stamp
    pub fn submitted_at(&self) -> SubmissionId {
        self.submitted_at
    }
}

impl Ord for Request {
    fn cmp(&self, other: &Self) -> Ordering {
        self.urgency
            .cmp(&other.urgency)
            .then(self.submitted_at.cmp(&other.submitted_at))
    }
}

impl PartialOrd for Request {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Urgency: {}) - Requested by: {}",
            self.title, self.urgency, self.requester
        )
    }
}
