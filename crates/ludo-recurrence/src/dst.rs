//! DST transition policies for event instances.

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for instances whose local start or end time does not exist because
/// the clocks jump forward on that date.
///
/// Ambiguous local times (clocks going back) always resolve to the earlier
/// instant; the policy only concerns the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop instances that fall in the DST gap (e.g. 2:30 AM during spring forward).
    Skip,
    /// Read the local time with the offset in force before the gap, which moves
    /// 2:30 AM to 3:30 AM.
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to UTC.
///
/// Returns `None` when the time is in a DST gap and the policy is
/// [`DstPolicy::Skip`].
pub fn resolve_local(tz: Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    match policy {
        DstPolicy::Skip => None,
        DstPolicy::ShiftForward => {
            let before = tz
                .from_local_datetime(&(local - Duration::days(1)))
                .earliest()?;
            let offset = i64::from(before.offset().fix().local_minus_utc());
            Some((local - Duration::seconds(offset)).and_utc())
        }
    }
}
