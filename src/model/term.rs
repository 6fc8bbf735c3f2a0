use super::assessment::{check_weight, AssessmentType};
use super::attendance::{day_name, Attendance, AttendanceStatus};
use super::error::{ModelError, ModelResult};
use super::ids::{EventId, StudentId, SubjectId};
use super::student::{Gender, Group, Student};
use super::subject::{clean_name, Subject};
use chrono::Weekday;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

/// A subject addressed either by id or by its registered name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRef {
    Id(SubjectId),
    Name(String),
}

impl From<SubjectId> for SubjectRef {
    fn from(id: SubjectId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for SubjectRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SubjectRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: StudentId,
    pub name: String,
    pub gender: Gender,
    pub group: Group,
    pub subjects: Vec<SubjectSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub subject_name: String,
    /// Grades grouped by assessment type, in recording order.
    pub grades: BTreeMap<AssessmentType, Vec<i64>>,
    /// Attendance ordered Monday..Sunday.
    pub attendance: Vec<AttendanceLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLine {
    pub attendance_id: EventId,
    pub day: &'static str,
    pub total_minutes: i64,
    pub late_minutes: i64,
    pub status: AttendanceStatus,
}

/// One school term: every subject and student of the session, plus the
/// name -> subject registry. Subject names are unique within a term.
#[derive(Debug)]
pub struct Term {
    session_id: Uuid,
    subjects: BTreeMap<SubjectId, Subject>,
    subject_names: HashMap<String, SubjectId>,
    students: BTreeMap<StudentId, Student>,
}

impl Default for Term {
    fn default() -> Self {
        Self::new()
    }
}

impl Term {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            subjects: BTreeMap::new(),
            subject_names: HashMap::new(),
            students: BTreeMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // --- subjects -------------------------------------------------------

    pub fn add_subject(
        &mut self,
        name: &str,
        weights: Option<BTreeMap<AssessmentType, f64>>,
    ) -> ModelResult<SubjectId> {
        let subject = Subject::new(name, weights)?;
        if self.subject_names.contains_key(subject.name()) {
            return Err(ModelError::validation(format!(
                "subject name {:?} is already registered",
                subject.name()
            )));
        }
        let id = subject.id();
        tracing::info!(subject_id = %id, name = subject.name(), "subject created");
        self.subject_names.insert(subject.name().to_string(), id);
        self.subjects.insert(id, subject);
        Ok(id)
    }

    pub fn resolve(&self, subject: &SubjectRef) -> ModelResult<SubjectId> {
        match subject {
            SubjectRef::Id(id) if self.subjects.contains_key(id) => Ok(*id),
            SubjectRef::Name(name) => self
                .subject_names
                .get(name.trim())
                .copied()
                .ok_or_else(|| ModelError::lookup("subject", subject)),
            SubjectRef::Id(_) => Err(ModelError::lookup("subject", subject)),
        }
    }

    pub fn subject(&self, subject: impl Into<SubjectRef>) -> ModelResult<&Subject> {
        let id = self.resolve(&subject.into())?;
        self.subject_by_id(id)
    }

    fn subject_by_id(&self, id: SubjectId) -> ModelResult<&Subject> {
        self.subjects
            .get(&id)
            .ok_or_else(|| ModelError::lookup("subject", id))
    }

    fn subject_mut(&mut self, id: SubjectId) -> ModelResult<&mut Subject> {
        self.subjects
            .get_mut(&id)
            .ok_or_else(|| ModelError::lookup("subject", id))
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    /// Renaming releases the old name in the registry.
    pub fn rename_subject(&mut self, subject: impl Into<SubjectRef>, new_name: &str) -> ModelResult<()> {
        let id = self.resolve(&subject.into())?;
        let new_name = clean_name(new_name)?;
        if let Some(owner) = self.subject_names.get(&new_name) {
            if *owner != id {
                return Err(ModelError::validation(format!(
                    "subject name {new_name:?} is already registered"
                )));
            }
        }
        let subject = self.subject_mut(id)?;
        let old_name = subject.name().to_string();
        subject.set_name(&new_name)?;
        self.subject_names.remove(&old_name);
        self.subject_names.insert(new_name.clone(), id);
        tracing::info!(subject_id = %id, from = %old_name, to = %new_name, "subject renamed");
        Ok(())
    }

    /// Drops the subject, its name reservation, and every participant's
    /// enrollment and records for it.
    pub fn remove_subject(&mut self, subject: impl Into<SubjectRef>) -> ModelResult<Subject> {
        let id = self.resolve(&subject.into())?;
        let removed = self
            .subjects
            .remove(&id)
            .ok_or_else(|| ModelError::lookup("subject", id))?;
        self.subject_names.remove(removed.name());
        for student_id in removed.participants() {
            if let Some(student) = self.students.get_mut(student_id) {
                student.drop_subject(id);
            }
        }
        tracing::info!(subject_id = %id, name = removed.name(), "subject removed");
        Ok(removed)
    }

    // --- students -------------------------------------------------------

    pub fn add_student(&mut self, name: &str, gender: Gender, group: Group) -> ModelResult<StudentId> {
        let student = Student::new(name, gender, group)?;
        self.insert_student(student)
    }

    /// Only fresh, unenrolled students are accepted; enrollment goes through
    /// [`Term::enroll`] so both sides stay in step.
    pub(crate) fn insert_student(&mut self, student: Student) -> ModelResult<StudentId> {
        let id = student.id();
        if self.students.contains_key(&id) {
            return Err(ModelError::validation(format!("student {id} is already registered")));
        }
        if !student.subjects().is_empty() {
            return Err(ModelError::validation(format!(
                "student {id} must be added before enrolling in any subject"
            )));
        }
        tracing::debug!(student_id = %id, name = student.name(), "student created");
        self.students.insert(id, student);
        Ok(id)
    }

    pub fn student(&self, id: StudentId) -> ModelResult<&Student> {
        self.students
            .get(&id)
            .ok_or_else(|| ModelError::lookup("student", id))
    }

    fn student_mut(&mut self, id: StudentId) -> ModelResult<&mut Student> {
        self.students
            .get_mut(&id)
            .ok_or_else(|| ModelError::lookup("student", id))
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// The name is the only fallible field, so it is applied first and a bad
    /// name leaves the student untouched.
    pub fn update_student(
        &mut self,
        id: StudentId,
        name: Option<&str>,
        gender: Option<Gender>,
        group: Option<Group>,
    ) -> ModelResult<()> {
        let student = self.student_mut(id)?;
        if let Some(name) = name {
            student.set_name(name)?;
        }
        if let Some(gender) = gender {
            student.set_gender(gender);
        }
        if let Some(group) = group {
            student.set_group(group);
        }
        Ok(())
    }

    /// Participant `student` of `subject`.
    pub fn participant(&self, subject: impl Into<SubjectRef>, student: StudentId) -> ModelResult<&Student> {
        let subject = self.subject(subject)?;
        self.student(subject.participant(student)?)
    }

    // --- enrollment and roster-wide recording ---------------------------

    /// Adds the student to the subject's roster and the subject to the
    /// student's list. Enrolling twice is a no-op; returns whether anything
    /// changed.
    pub fn enroll(&mut self, subject: impl Into<SubjectRef>, student_id: StudentId) -> ModelResult<bool> {
        let subject_id = self.resolve(&subject.into())?;
        let Some(student) = self.students.get_mut(&student_id) else {
            return Err(ModelError::lookup("student", student_id));
        };
        let Some(subject) = self.subjects.get_mut(&subject_id) else {
            return Err(ModelError::lookup("subject", subject_id));
        };
        let added_here = subject.add_participant(student_id);
        let added_there = student.add_subject(subject_id);
        let changed = added_here || added_there;
        if changed {
            tracing::debug!(subject_id = %subject_id, student_id = %student_id, "student enrolled");
        }
        Ok(changed)
    }

    /// One attendance per participant in roster order, all sharing one
    /// event id. Every record is validated before any is stored.
    pub fn record_attendance_for_roster(
        &mut self,
        subject: impl Into<SubjectRef>,
        total_minutes: i64,
        late_minutes: &[i64],
        day: Weekday,
    ) -> ModelResult<EventId> {
        let subject_id = self.resolve(&subject.into())?;
        let subject = self.subject_by_id(subject_id)?;
        check_arity(subject.participants().len(), late_minutes.len())?;

        let event_id = EventId::fresh();
        let mut pending = Vec::with_capacity(late_minutes.len());
        for (student_id, late) in subject.participants().iter().zip(late_minutes) {
            let record = Attendance::new(total_minutes, *late, day, event_id)?;
            pending.push((*student_id, record));
        }

        for (student_id, record) in pending {
            self.student_mut(student_id)?.push_attendance(subject_id, record);
        }
        tracing::info!(
            subject_id = %subject_id,
            attendance_id = %event_id,
            day = day_name(day),
            students = late_minutes.len(),
            "attendance recorded"
        );
        Ok(event_id)
    }

    /// One assessment per participant in roster order, all sharing one
    /// event id and weighted from the subject's table.
    pub fn record_assessment_for_roster(
        &mut self,
        subject: impl Into<SubjectRef>,
        assessment_type: AssessmentType,
        grades: &[i64],
    ) -> ModelResult<EventId> {
        let subject_id = self.resolve(&subject.into())?;
        let subject = self.subject_by_id(subject_id)?;
        check_arity(subject.participants().len(), grades.len())?;
        subject.weight(assessment_type)?;

        let event_id = EventId::fresh();
        let mut pending = Vec::with_capacity(grades.len());
        for (student_id, grade) in subject.participants().iter().zip(grades) {
            let student = self.student(*student_id)?;
            let record = student.build_assessment(subject, assessment_type, *grade, Some(event_id))?;
            pending.push((*student_id, record));
        }

        for (student_id, record) in pending {
            self.student_mut(student_id)?.push_assessment(subject_id, record);
        }
        tracing::info!(
            subject_id = %subject_id,
            assessment_id = %event_id,
            assessment_type = assessment_type.as_str(),
            students = grades.len(),
            "assessment recorded"
        );
        Ok(event_id)
    }

    /// Updates the weight table and retroactively every recorded assessment
    /// of that type in this subject. Returns how many records were updated.
    pub fn change_weight(
        &mut self,
        subject: impl Into<SubjectRef>,
        assessment_type: AssessmentType,
        weight: f64,
    ) -> ModelResult<usize> {
        check_weight(weight)?;
        let subject_id = self.resolve(&subject.into())?;
        let Some(subject) = self.subjects.get_mut(&subject_id) else {
            return Err(ModelError::lookup("subject", subject_id));
        };
        subject.set_weight(assessment_type, weight)?;

        let mut updated = 0;
        for student_id in subject.participants() {
            if let Some(student) = self.students.get_mut(student_id) {
                updated += student.reweight(subject_id, assessment_type, weight)?;
            }
        }
        tracing::info!(
            subject_id = %subject_id,
            assessment_type = assessment_type.as_str(),
            weight,
            updated,
            "weight changed"
        );
        Ok(updated)
    }

    pub fn set_rate(
        &mut self,
        subject: impl Into<SubjectRef>,
        status: AttendanceStatus,
        rate: f64,
    ) -> ModelResult<()> {
        let subject_id = self.resolve(&subject.into())?;
        self.subject_mut(subject_id)?.set_rate(status, rate)
    }

    // --- by-id edits ----------------------------------------------------

    fn participant_mut(&mut self, subject_id: SubjectId, student: StudentId) -> ModelResult<&mut Student> {
        self.subject_by_id(subject_id)?.participant(student)?;
        self.student_mut(student)
    }

    pub fn modify_assessment_by_id(
        &mut self,
        subject: impl Into<SubjectRef>,
        student: StudentId,
        assessment_id: EventId,
        new_grade: i64,
    ) -> ModelResult<()> {
        let subject_id = self.resolve(&subject.into())?;
        self.participant_mut(subject_id, student)?
            .modify_assessment_by_id(subject_id, assessment_id, new_grade)
    }

    pub fn modify_attendance_by_id(
        &mut self,
        subject: impl Into<SubjectRef>,
        student: StudentId,
        attendance_id: EventId,
        new_late_minutes: i64,
    ) -> ModelResult<()> {
        let subject_id = self.resolve(&subject.into())?;
        self.participant_mut(subject_id, student)?
            .modify_attendance_by_id(subject_id, attendance_id, new_late_minutes)
    }

    /// Removes the assessment event from every participant. Fails with a
    /// lookup error when no participant held it.
    pub fn remove_assessment(&mut self, subject: impl Into<SubjectRef>, assessment_id: EventId) -> ModelResult<usize> {
        let subject_id = self.resolve(&subject.into())?;
        let removed = self.remove_from_roster(subject_id, |student| {
            student.remove_assessment(subject_id, assessment_id)
        })?;
        if removed == 0 {
            return Err(ModelError::lookup("assessment", assessment_id));
        }
        tracing::info!(subject_id = %subject_id, assessment_id = %assessment_id, removed, "assessment removed");
        Ok(removed)
    }

    /// Attendance counterpart of [`Term::remove_assessment`].
    pub fn remove_attendance(&mut self, subject: impl Into<SubjectRef>, attendance_id: EventId) -> ModelResult<usize> {
        let subject_id = self.resolve(&subject.into())?;
        let removed = self.remove_from_roster(subject_id, |student| {
            student.remove_attendance(subject_id, attendance_id)
        })?;
        if removed == 0 {
            return Err(ModelError::lookup("attendance", attendance_id));
        }
        tracing::info!(subject_id = %subject_id, attendance_id = %attendance_id, removed, "attendance removed");
        Ok(removed)
    }

    fn remove_from_roster<F>(&mut self, subject_id: SubjectId, mut remove: F) -> ModelResult<usize>
    where
        F: FnMut(&mut Student) -> bool,
    {
        let Some(subject) = self.subjects.get(&subject_id) else {
            return Err(ModelError::lookup("subject", subject_id));
        };
        let mut removed = 0;
        for student_id in subject.participants() {
            if let Some(student) = self.students.get_mut(student_id) {
                if remove(student) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    // --- queries --------------------------------------------------------

    pub fn final_grade(&self, student: StudentId) -> ModelResult<f64> {
        self.student(student)?
            .compute_final_grade(|id| self.subjects.get(&id))
    }

    pub fn attendance_on(
        &self,
        subject: impl Into<SubjectRef>,
        student: StudentId,
        day: Weekday,
    ) -> ModelResult<Vec<&Attendance>> {
        let subject_id = self.resolve(&subject.into())?;
        Ok(self.student(student)?.attendance_on(subject_id, day))
    }

    pub fn student_summary(&self, student: StudentId) -> ModelResult<StudentSummary> {
        let student = self.student(student)?;
        let mut subjects = Vec::with_capacity(student.subjects().len());
        for &subject_id in student.subjects() {
            let subject = self.subject_by_id(subject_id)?;

            let mut grades: BTreeMap<AssessmentType, Vec<i64>> = BTreeMap::new();
            for a in student.assessments(subject_id) {
                grades.entry(a.assessment_type()).or_default().push(a.grade());
            }

            let mut records: Vec<&Attendance> = student.attendances(subject_id).iter().collect();
            records.sort_by_key(|a| a.day().num_days_from_monday());
            let attendance = records
                .into_iter()
                .map(|a| AttendanceLine {
                    attendance_id: a.event_id(),
                    day: day_name(a.day()),
                    total_minutes: a.total_minutes(),
                    late_minutes: a.late_minutes(),
                    status: a.status(),
                })
                .collect();

            subjects.push(SubjectSummary {
                subject_id,
                subject_name: subject.name().to_string(),
                grades,
                attendance,
            });
        }
        Ok(StudentSummary {
            student_id: student.id(),
            name: student.name().to_string(),
            gender: student.gender(),
            group: student.group(),
            subjects,
        })
    }
}

fn check_arity(expected: usize, actual: usize) -> ModelResult<()> {
    if expected != actual {
        return Err(ModelError::ArityMismatch { expected, actual });
    }
    Ok(())
}
