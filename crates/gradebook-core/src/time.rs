use chrono::{DateTime, SubsecRound as _, Utc};

/// The current instant at the millisecond precision used on the wire, so a
/// value stamped here survives a JSON round trip unchanged.
pub(crate) fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }
