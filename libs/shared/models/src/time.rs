/// Parse a zero-padded 24h "HH:MM" string into minutes since midnight.
///
/// Slot comparisons work on these integers rather than date objects, so the
/// today-filter cannot trip over timezones or DST. Returns `None` for
/// anything that is not a well-formed wall-clock time.
pub fn minutes_since_midnight(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}
