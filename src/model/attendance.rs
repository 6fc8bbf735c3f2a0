use super::error::{msg, ModelError, ModelResult};
use super::ids::{EventId, RecordId};
use chrono::Weekday;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Late-minute ceiling (exclusive) of the delay table. Anything at or above it
/// has no status.
pub const MAX_LATE_MINUTES: i64 = 180;

pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Only full English day names are accepted ("Monday", not "mon").
pub fn parse_day(raw: &str) -> ModelResult<Weekday> {
    DAYS_OF_WEEK
        .iter()
        .copied()
        .find(|d| day_name(*d) == raw)
        .ok_or_else(|| {
            ModelError::validation(format!(
                "invalid day name {raw:?}, must be one of Monday..Sunday"
            ))
        })
}

fn serialize_day<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(day_name(*day))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Late, Self::Absent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Late => "Late",
            Self::Absent => "Absent",
        }
    }

    /// 0 => Present, 1..=5 => Late, 6..180 => Absent.
    pub fn from_late_minutes(late_minutes: i64) -> ModelResult<Self> {
        match late_minutes {
            0 => Ok(Self::Present),
            1..=5 => Ok(Self::Late),
            6..MAX_LATE_MINUTES => Ok(Self::Absent),
            _ => Err(ModelError::StatusUndefined(late_minutes)),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// One student's presence record for one day in one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    id: RecordId,
    event_id: EventId,
    total_minutes: i64,
    late_minutes: i64,
    #[serde(serialize_with = "serialize_day")]
    day: Weekday,
    status: AttendanceStatus,
}

impl Attendance {
    pub fn new(
        total_minutes: i64,
        late_minutes: i64,
        day: Weekday,
        event_id: EventId,
    ) -> ModelResult<Self> {
        check_minutes(total_minutes, late_minutes)?;
        let status = AttendanceStatus::from_late_minutes(late_minutes)?;
        Ok(Self {
            id: RecordId::fresh(),
            event_id,
            total_minutes,
            late_minutes,
            day,
            status,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn total_minutes(&self) -> i64 {
        self.total_minutes
    }

    pub fn late_minutes(&self) -> i64 {
        self.late_minutes
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    pub fn set_total_minutes(&mut self, total_minutes: i64) -> ModelResult<()> {
        if total_minutes < 0 {
            return Err(ModelError::validation(msg::NEG_MINUTES));
        }
        if total_minutes < self.late_minutes {
            return Err(ModelError::validation(msg::BAD_TOTAL));
        }
        self.total_minutes = total_minutes;
        Ok(())
    }

    pub fn set_late_minutes(&mut self, late_minutes: i64) -> ModelResult<()> {
        check_minutes(self.total_minutes, late_minutes)?;
        let status = AttendanceStatus::from_late_minutes(late_minutes)?;
        self.late_minutes = late_minutes;
        self.status = status;
        Ok(())
    }

    pub fn set_day(&mut self, day: &str) -> ModelResult<()> {
        self.day = parse_day(day)?;
        Ok(())
    }
}

fn check_minutes(total_minutes: i64, late_minutes: i64) -> ModelResult<()> {
    if total_minutes < 0 || late_minutes < 0 {
        return Err(ModelError::validation(msg::NEG_MINUTES));
    }
    if late_minutes > total_minutes {
        return Err(ModelError::validation(msg::BAD_LATE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(total: i64, late: i64) -> ModelResult<Attendance> {
        Attendance::new(total, late, Weekday::Mon, EventId::fresh())
    }

    #[test]
    fn status_follows_delay_table() {
        assert_eq!(att(200, 0).unwrap().status(), AttendanceStatus::Present);
        for late in 1..=5 {
            assert_eq!(att(200, late).unwrap().status(), AttendanceStatus::Late);
        }
        for late in [6, 60, 179] {
            assert_eq!(att(200, late).unwrap().status(), AttendanceStatus::Absent);
        }
        assert_eq!(att(200, 180), Err(ModelError::StatusUndefined(180)));
        assert_eq!(att(500, 400), Err(ModelError::StatusUndefined(400)));
    }

    #[test]
    fn create_rejects_bad_minutes() {
        assert_eq!(
            att(-1, 0),
            Err(ModelError::Validation(msg::NEG_MINUTES.into()))
        );
        assert_eq!(
            att(10, -1),
            Err(ModelError::Validation(msg::NEG_MINUTES.into()))
        );
        assert_eq!(
            att(10, 11),
            Err(ModelError::Validation(msg::BAD_LATE.into()))
        );
    }

    #[test]
    fn late_above_total_leaves_record_unchanged() {
        let mut a = att(30, 2).unwrap();
        let before = a.clone();
        assert!(a.set_late_minutes(31).is_err());
        assert!(a.set_late_minutes(-3).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn set_late_recomputes_status() {
        let mut a = att(180, 0).unwrap();
        a.set_late_minutes(4).unwrap();
        assert_eq!(a.status(), AttendanceStatus::Late);
        a.set_late_minutes(10).unwrap();
        assert_eq!(a.status(), AttendanceStatus::Absent);
        assert_eq!(a.set_late_minutes(180), Err(ModelError::StatusUndefined(180)));
        assert_eq!(a.late_minutes(), 10);
    }

    #[test]
    fn total_cannot_drop_below_late() {
        let mut a = att(60, 20).unwrap();
        assert!(a.set_total_minutes(19).is_err());
        assert!(a.set_total_minutes(-1).is_err());
        a.set_total_minutes(20).unwrap();
        assert_eq!(a.total_minutes(), 20);
    }

    #[test]
    fn day_names_are_full_english() {
        assert_eq!(parse_day("Sunday").unwrap(), Weekday::Sun);
        assert!(parse_day("sun").is_err());
        assert!(parse_day("Funday").is_err());

        let mut a = att(60, 0).unwrap();
        assert!(a.set_day("Someday").is_err());
        assert_eq!(a.day(), Weekday::Mon);
        a.set_day("Friday").unwrap();
        assert_eq!(a.day(), Weekday::Fri);
    }

    #[test]
    fn status_parses_known_names_only() {
        assert_eq!("Late".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert_eq!(
            "Excused".parse::<AttendanceStatus>(),
            Err(ModelError::UnknownStatus("Excused".into()))
        );
    }
}
