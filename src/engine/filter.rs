use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::model::{BlockedDate, Booking, PolicySettings, Span};

use super::slots::anchor;

// ── Candidate Filtering ───────────────────────────────────────────

/// Per-invocation filter inputs, resolved once so every candidate sees the
/// same notice cutoff and the same expanded windows.
pub(super) struct SlotFilter {
    notice_cutoff: DateTime<Utc>,
    /// Active bookings expanded by the buffer on both ends.
    busy: Vec<Span>,
    whole_day_blocked: bool,
    /// Timed blocks anchored to the target date in the owner zone.
    blocked: Vec<Span>,
}

impl SlotFilter {
    pub(super) fn build(
        date: NaiveDate,
        owner_tz: Tz,
        settings: &PolicySettings,
        now: DateTime<Utc>,
        bookings: &[Booking],
        blocked_dates: &[BlockedDate],
    ) -> Self {
        let buffer = settings.buffer();
        let busy = bookings
            .iter()
            .filter(|b| b.status.is_active())
            .map(|b| b.span.expand(buffer))
            .collect();

        let mut whole_day_blocked = false;
        let mut blocked = Vec::new();
        for bd in blocked_dates {
            if bd.blocks_whole_day() {
                whole_day_blocked = true;
                continue;
            }
            let (Some(bs), Some(be)) = (bd.start, bd.end) else {
                continue;
            };
            let (Some(start), Some(end)) = (anchor(date, bs, owner_tz), anchor(date, be, owner_tz))
            else {
                continue;
            };
            // An inverted or empty sub-range is degenerate data and blocks
            // nothing; no buffer expansion for blocks.
            if start < end {
                blocked.push(Span::new(start, end));
            }
        }

        Self {
            notice_cutoff: now + settings.min_notice(),
            busy,
            whole_day_blocked,
            blocked,
        }
    }

    /// The three rejections are independent; notice goes first as the
    /// cheapest short-circuit.
    pub(super) fn admits(&self, candidate: &Span) -> bool {
        if candidate.start < self.notice_cutoff {
            return false;
        }
        if self.whole_day_blocked {
            return false;
        }
        if self.busy.iter().any(|b| b.overlaps(candidate)) {
            return false;
        }
        !self.blocked.iter().any(|b| b.overlaps(candidate))
    }
}
