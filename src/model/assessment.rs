use super::error::{msg, ModelError, ModelResult};
use super::ids::{EventId, RecordId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const MAX_GRADE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AssessmentType {
    TD,
    TP,
    Quizz,
    Exam,
}

impl AssessmentType {
    pub const ALL: [AssessmentType; 4] = [Self::TD, Self::TP, Self::Quizz, Self::Exam];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TD => "TD",
            Self::TP => "TP",
            Self::Quizz => "Quizz",
            Self::Exam => "Exam",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownAssessmentType(s.to_string()))
    }
}

pub(crate) fn check_weight(weight: f64) -> ModelResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ModelError::validation(msg::BAD_WEIGHT));
    }
    Ok(())
}

fn check_grade(grade: i64) -> ModelResult<()> {
    if !(0..=MAX_GRADE).contains(&grade) {
        return Err(ModelError::validation(msg::BAD_GRADE));
    }
    Ok(())
}

/// One graded item. The weight is a snapshot of the subject's table at the
/// time of recording and is only changed by a subject-wide reweight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    id: RecordId,
    event_id: EventId,
    assessment_type: AssessmentType,
    grade: i64,
    weight: f64,
}

impl Assessment {
    pub fn new(
        assessment_type: AssessmentType,
        grade: i64,
        weight: f64,
        event_id: EventId,
    ) -> ModelResult<Self> {
        check_grade(grade)?;
        check_weight(weight)?;
        Ok(Self {
            id: RecordId::fresh(),
            event_id,
            assessment_type,
            grade,
            weight,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn assessment_type(&self) -> AssessmentType {
        self.assessment_type
    }

    pub fn grade(&self) -> i64 {
        self.grade
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_grade(&mut self, grade: i64) -> ModelResult<()> {
        check_grade(grade)?;
        self.grade = grade;
        Ok(())
    }

    pub fn set_type(&mut self, assessment_type: &str) -> ModelResult<()> {
        self.assessment_type = assessment_type.parse()?;
        Ok(())
    }

    pub fn set_weight(&mut self, weight: f64) -> ModelResult<()> {
        check_weight(weight)?;
        self.weight = weight;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(grade: i64) -> ModelResult<Assessment> {
        Assessment::new(AssessmentType::Exam, grade, 25.0, EventId::fresh())
    }

    #[test]
    fn grade_bounds_are_inclusive() {
        assert!(exam(0).is_ok());
        assert!(exam(20).is_ok());
        assert!(exam(21).is_err());
        assert!(exam(-1).is_err());
    }

    #[test]
    fn invalid_setters_do_not_mutate() {
        let mut a = exam(12).unwrap();
        let before = a.clone();
        assert!(a.set_grade(25).is_err());
        assert_eq!(
            a.set_type("Homework"),
            Err(ModelError::UnknownAssessmentType("Homework".into()))
        );
        assert!(a.set_weight(-0.5).is_err());
        assert!(a.set_weight(f64::NAN).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn setters_apply_valid_values() {
        let mut a = exam(12).unwrap();
        a.set_grade(20).unwrap();
        a.set_type("TP").unwrap();
        a.set_weight(0.0).unwrap();
        assert_eq!(a.grade(), 20);
        assert_eq!(a.assessment_type(), AssessmentType::TP);
        assert_eq!(a.weight(), 0.0);
    }

    #[test]
    fn negative_weight_rejected_on_create() {
        assert!(Assessment::new(AssessmentType::TD, 10, -1.0, EventId::fresh()).is_err());
    }
}
