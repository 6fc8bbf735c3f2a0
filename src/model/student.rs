use super::assessment::{Assessment, AssessmentType};
use super::attendance::Attendance;
use super::error::{ModelError, ModelResult};
use super::ids::{EventId, StudentId, SubjectId};
use super::subject::{clean_name, Subject};
use chrono::Weekday;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => Err(ModelError::validation(format!(
                "invalid gender {s:?}, must be one of Male, Female"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Group {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

impl Group {
    pub const ALL: [Group; 10] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
        }
    }
}

impl FromStr for Group {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ModelError::validation(format!("invalid group {s:?}, must be one of A..J")))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Student {
    id: StudentId,
    name: String,
    gender: Gender,
    group: Group,
    subjects: Vec<SubjectId>,
    attendances: BTreeMap<SubjectId, Vec<Attendance>>,
    assessments: BTreeMap<SubjectId, Vec<Assessment>>,
}

impl Student {
    pub fn new(name: &str, gender: Gender, group: Group) -> ModelResult<Self> {
        Ok(Self {
            id: StudentId::fresh(),
            name: clean_name(name)?,
            gender,
            group,
            subjects: Vec::new(),
            attendances: BTreeMap::new(),
            assessments: BTreeMap::new(),
        })
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn set_name(&mut self, name: &str) -> ModelResult<()> {
        self.name = clean_name(name)?;
        Ok(())
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn set_group(&mut self, group: Group) {
        self.group = group;
    }

    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    pub fn is_enrolled(&self, subject: SubjectId) -> bool {
        self.subjects.contains(&subject)
    }

    pub fn attendances(&self, subject: SubjectId) -> &[Attendance] {
        self.attendances.get(&subject).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn assessments(&self, subject: SubjectId) -> &[Assessment] {
        self.assessments.get(&subject).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attendance records in `subject` taken on `day`.
    pub fn attendance_on(&self, subject: SubjectId, day: Weekday) -> Vec<&Attendance> {
        self.attendances(subject)
            .iter()
            .filter(|a| a.day() == day)
            .collect()
    }

    /// Only [`Term::enroll`](super::Term::enroll) calls this, together with
    /// the subject's side of the enrollment.
    pub(crate) fn add_subject(&mut self, subject: SubjectId) -> bool {
        if self.is_enrolled(subject) {
            return false;
        }
        self.subjects.push(subject);
        true
    }

    pub(crate) fn drop_subject(&mut self, subject: SubjectId) {
        self.subjects.retain(|s| *s != subject);
        self.attendances.remove(&subject);
        self.assessments.remove(&subject);
    }

    pub(crate) fn push_attendance(&mut self, subject: SubjectId, record: Attendance) {
        self.attendances.entry(subject).or_default().push(record);
    }

    pub(crate) fn push_assessment(&mut self, subject: SubjectId, record: Assessment) {
        self.assessments.entry(subject).or_default().push(record);
    }

    /// Records one attendance. Without an `event_id` the record gets an event
    /// of its own. Enrollment is not checked; records for a subject the
    /// student is not enrolled in are ignored by the final grade and reports.
    pub fn record_attendance(
        &mut self,
        subject: SubjectId,
        total_minutes: i64,
        late_minutes: i64,
        day: Weekday,
        event_id: Option<EventId>,
    ) -> ModelResult<EventId> {
        let event_id = event_id.unwrap_or_else(EventId::fresh);
        let record = Attendance::new(total_minutes, late_minutes, day, event_id)?;
        self.push_attendance(subject, record);
        Ok(event_id)
    }

    /// Records one assessment weighted from `subject`'s current table. The
    /// student must already be enrolled in `subject`, and enrollment only
    /// happens through [`Term::enroll`](super::Term::enroll), so callers
    /// outside a term should use
    /// [`Term::record_assessment_for_roster`](super::Term::record_assessment_for_roster).
    pub fn record_assessment(
        &mut self,
        subject: &Subject,
        assessment_type: AssessmentType,
        grade: i64,
        event_id: Option<EventId>,
    ) -> ModelResult<EventId> {
        let record = self.build_assessment(subject, assessment_type, grade, event_id)?;
        let event_id = record.event_id();
        self.push_assessment(subject.id(), record);
        Ok(event_id)
    }

    pub(crate) fn build_assessment(
        &self,
        subject: &Subject,
        assessment_type: AssessmentType,
        grade: i64,
        event_id: Option<EventId>,
    ) -> ModelResult<Assessment> {
        if !self.is_enrolled(subject.id()) {
            return Err(ModelError::lookup("subject", subject.id()));
        }
        let weight = subject.weight(assessment_type)?;
        Assessment::new(
            assessment_type,
            grade,
            weight,
            event_id.unwrap_or_else(EventId::fresh),
        )
    }

    pub fn modify_assessment_by_id(
        &mut self,
        subject: SubjectId,
        event_id: EventId,
        new_grade: i64,
    ) -> ModelResult<()> {
        self.assessments
            .get_mut(&subject)
            .and_then(|list| list.iter_mut().find(|a| a.event_id() == event_id))
            .ok_or_else(|| ModelError::lookup("assessment", event_id))?
            .set_grade(new_grade)
    }

    pub fn modify_attendance_by_id(
        &mut self,
        subject: SubjectId,
        event_id: EventId,
        new_late_minutes: i64,
    ) -> ModelResult<()> {
        self.attendances
            .get_mut(&subject)
            .and_then(|list| list.iter_mut().find(|a| a.event_id() == event_id))
            .ok_or_else(|| ModelError::lookup("attendance", event_id))?
            .set_late_minutes(new_late_minutes)
    }

    /// Returns whether a record was removed.
    pub fn remove_assessment(&mut self, subject: SubjectId, event_id: EventId) -> bool {
        let Some(list) = self.assessments.get_mut(&subject) else {
            return false;
        };
        match list.iter().position(|a| a.event_id() == event_id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns whether a record was removed.
    pub fn remove_attendance(&mut self, subject: SubjectId, event_id: EventId) -> bool {
        let Some(list) = self.attendances.get_mut(&subject) else {
            return false;
        };
        match list.iter().position(|a| a.event_id() == event_id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn reweight(
        &mut self,
        subject: SubjectId,
        assessment_type: AssessmentType,
        weight: f64,
    ) -> ModelResult<usize> {
        let mut n = 0;
        if let Some(list) = self.assessments.get_mut(&subject) {
            for a in list.iter_mut().filter(|a| a.assessment_type() == assessment_type) {
                a.set_weight(weight)?;
                n += 1;
            }
        }
        Ok(n)
    }

    /// Final grade across every enrolled subject.
    ///
    /// grade_total = sum of grade * weight over all assessments of all
    /// subjects; rate_total = sum over subjects of the mean attendance rate in
    /// that subject (subjects without attendance add 0). Result is
    /// grade_total * rate_total.
    ///
    /// NOTE: the rate total is summed across subjects, not averaged, so a
    /// student in two subjects with perfect attendance gets a 2.0 multiplier.
    /// Kept as-is until product confirms the intended formula.
    pub fn compute_final_grade<'a, F>(&self, subject_of: F) -> ModelResult<f64>
    where
        F: Fn(SubjectId) -> Option<&'a Subject>,
    {
        let mut grade_total = 0.0;
        let mut rate_total = 0.0;
        for &subject_id in &self.subjects {
            let subject = subject_of(subject_id).ok_or_else(|| ModelError::lookup("subject", subject_id))?;

            grade_total += self
                .assessments(subject_id)
                .iter()
                .map(|a| a.grade() as f64 * a.weight())
                .sum::<f64>();

            let records = self.attendances(subject_id);
            if records.is_empty() {
                continue;
            }
            let mut rate_sum = 0.0;
            for a in records {
                rate_sum += subject.rate(a.status())?;
            }
            rate_total += rate_sum / records.len() as f64;
        }
        Ok(grade_total * rate_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn kid() -> Student {
        Student::new("Amina", Gender::Female, Group::B).unwrap()
    }

    fn enrolled(subject: &Subject) -> Student {
        let mut s = kid();
        s.add_subject(subject.id());
        s
    }

    #[test]
    fn name_is_trimmed_and_validated() {
        let mut s = Student::new("  Yassine  ", Gender::Male, Group::A).unwrap();
        assert_eq!(s.name(), "Yassine");
        assert!(Student::new(" \t ", Gender::Male, Group::A).is_err());
        assert!(s.set_name("").is_err());
        assert_eq!(s.name(), "Yassine");
    }

    #[test]
    fn gender_and_group_parse_fixed_sets() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("female".parse::<Gender>().is_err());
        assert_eq!("J".parse::<Group>().unwrap(), Group::J);
        assert!(matches!("K".parse::<Group>(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn add_subject_is_idempotent() {
        let mut s = kid();
        let sub = SubjectId::fresh();
        assert!(s.add_subject(sub));
        assert!(!s.add_subject(sub));
        assert_eq!(s.subjects(), &[sub]);
    }

    #[test]
    fn record_assessment_requires_enrollment() {
        let subject = Subject::new("Chemistry", None).unwrap();
        let mut s = kid();
        assert!(matches!(
            s.record_assessment(&subject, AssessmentType::Exam, 12, None),
            Err(ModelError::Lookup { kind: "subject", .. })
        ));
        assert!(s.assessments(subject.id()).is_empty());
    }

    #[test]
    fn record_assessment_snapshots_weight() {
        let subject = Subject::new("Chemistry", None).unwrap();
        let mut s = enrolled(&subject);
        let ev = s
            .record_assessment(&subject, AssessmentType::TD, 14, None)
            .unwrap();
        let list = s.assessments(subject.id());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].event_id(), ev);
        assert_eq!(list[0].weight(), 25.0);
    }

    #[test]
    fn modify_and_remove_by_event_id() {
        let subject = Subject::new("Geography", None).unwrap();
        let mut s = enrolled(&subject);
        let ev = s
            .record_assessment(&subject, AssessmentType::Quizz, 8, None)
            .unwrap();

        s.modify_assessment_by_id(subject.id(), ev, 15).unwrap();
        assert_eq!(s.assessments(subject.id())[0].grade(), 15);
        assert!(s.modify_assessment_by_id(subject.id(), ev, 30).is_err());
        assert_eq!(s.assessments(subject.id())[0].grade(), 15);

        let missing = EventId::fresh();
        assert!(matches!(
            s.modify_assessment_by_id(subject.id(), missing, 10),
            Err(ModelError::Lookup { kind: "assessment", .. })
        ));
        assert!(!s.remove_assessment(subject.id(), missing));
        assert!(s.remove_assessment(subject.id(), ev));
        assert!(s.assessments(subject.id()).is_empty());
    }

    #[test]
    fn attendance_modify_remove_and_lookup_by_day() {
        let subject = SubjectId::fresh();
        let mut s = kid();
        let mon = s
            .record_attendance(subject, 90, 0, Weekday::Mon, None)
            .unwrap();
        s.record_attendance(subject, 90, 3, Weekday::Wed, None)
            .unwrap();

        assert_eq!(s.attendance_on(subject, Weekday::Wed).len(), 1);
        assert!(s.attendance_on(subject, Weekday::Fri).is_empty());

        s.modify_attendance_by_id(subject, mon, 7).unwrap();
        assert_eq!(s.attendances(subject)[0].status(), AttendanceStatus::Absent);
        assert!(s.modify_attendance_by_id(subject, mon, 91).is_err());
        assert!(s.remove_attendance(subject, mon));
        assert!(!s.remove_attendance(subject, mon));
        assert_eq!(s.attendances(subject).len(), 1);
    }

    #[test]
    fn final_grade_sums_rates_across_subjects() {
        let a = Subject::new("Algebra", None).unwrap();
        let b = Subject::new("Botany", None).unwrap();
        let mut s = kid();
        s.add_subject(a.id());
        s.add_subject(b.id());

        s.record_assessment(&a, AssessmentType::Exam, 10, None).unwrap();
        s.record_attendance(a.id(), 60, 0, Weekday::Mon, None).unwrap();
        s.record_attendance(a.id(), 60, 3, Weekday::Tue, None).unwrap();
        s.record_attendance(b.id(), 60, 0, Weekday::Mon, None).unwrap();

        let lookup = |id: SubjectId| [&a, &b].into_iter().find(|s| s.id() == id);
        let grade = s.compute_final_grade(lookup).unwrap();
        // 10 * 25 = 250; rates (1.0 + 0.9) / 2 + 1.0 = 1.95
        assert!((grade - 250.0 * 1.95).abs() < 1e-9);
    }

    #[test]
    fn final_grade_without_attendance_is_zero() {
        let a = Subject::new("Drawing", None).unwrap();
        let mut s = enrolled(&a);
        s.record_assessment(&a, AssessmentType::TP, 18, None).unwrap();
        let grade = s
            .compute_final_grade(|id| (id == a.id()).then_some(&a))
            .unwrap();
        assert_eq!(grade, 0.0);
    }

    #[test]
    fn final_grade_fails_on_unknown_subject() {
        let mut s = kid();
        s.add_subject(SubjectId::fresh());
        assert!(s.compute_final_grade(|_| None).is_err());
    }
}
