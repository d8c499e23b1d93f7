use super::Program;
use crate::schedule::ScheduleInstant;

/// Picks the program on air at `instant` from a station's rows.
///
/// A slot of the instant's own day type is on air from its start until its
/// end (exclusive); a slot with `end <= start` stays on air for the rest of
/// that day. Only when none of those has started does the after-midnight
/// tail of an overnight slot from the previous day type apply. In both
/// cases the latest start wins.
pub fn on_air<'a>(programs: &'a [Program], instant: &ScheduleInstant) -> Option<&'a Program> {
    let now = instant.time;
    let started_today = programs
        .iter()
        .filter(|p| p.active && p.day_type == instant.day_type)
        .filter(|p| p.start_time <= now && (now < p.end_time || p.end_time <= p.start_time))
        .max_by_key(|p| p.start_time);

    started_today.or_else(|| {
        programs
            .iter()
            .filter(|p| p.active && p.day_type == instant.previous_day_type)
            .filter(|p| p.end_time < p.start_time && now < p.end_time)
            .max_by_key(|p| p.start_time)
    })
}
