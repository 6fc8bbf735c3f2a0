use super::assessment::{check_weight, AssessmentType};
use super::attendance::AttendanceStatus;
use super::error::{msg, ModelError, ModelResult};
use super::ids::{StudentId, SubjectId};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_WEIGHT: f64 = 25.0;

pub fn default_weights() -> BTreeMap<AssessmentType, f64> {
    AssessmentType::ALL
        .into_iter()
        .map(|t| (t, DEFAULT_WEIGHT))
        .collect()
}

pub fn default_rates() -> BTreeMap<AttendanceStatus, f64> {
    BTreeMap::from([
        (AttendanceStatus::Present, 1.0),
        (AttendanceStatus::Late, 0.9),
        (AttendanceStatus::Absent, 0.8),
    ])
}

pub(crate) fn clean_name(raw: &str) -> ModelResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ModelError::validation(msg::BAD_NAME));
    }
    Ok(name.to_string())
}

fn check_rate(rate: f64) -> ModelResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(ModelError::validation(msg::BAD_RATE));
    }
    Ok(())
}

/// A course: roster, weight table and rate table.
///
/// The weight table always has an entry for every [`AssessmentType`] and the
/// rate table one for every [`AttendanceStatus`]. Roster-wide recording and
/// reweighting need the enrolled students too, so they live on
/// [`Term`](super::Term).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    id: SubjectId,
    name: String,
    weights: BTreeMap<AssessmentType, f64>,
    rates: BTreeMap<AttendanceStatus, f64>,
    participants: Vec<StudentId>,
}

impl Subject {
    /// Custom weights are merged over the flat default, so a partial table
    /// still covers every assessment type.
    pub fn new(name: &str, weights: Option<BTreeMap<AssessmentType, f64>>) -> ModelResult<Self> {
        let name = clean_name(name)?;
        let mut table = default_weights();
        if let Some(custom) = weights {
            for (t, w) in custom {
                check_weight(w)?;
                table.insert(t, w);
            }
        }
        Ok(Self {
            id: SubjectId::fresh(),
            name,
            weights: table,
            rates: default_rates(),
            participants: Vec::new(),
        })
    }

    pub fn id(&self) -> SubjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &BTreeMap<AssessmentType, f64> {
        &self.weights
    }

    pub fn rates(&self) -> &BTreeMap<AttendanceStatus, f64> {
        &self.rates
    }

    pub fn weight(&self, assessment_type: AssessmentType) -> ModelResult<f64> {
        self.weights
            .get(&assessment_type)
            .copied()
            .ok_or_else(|| ModelError::UnknownAssessmentType(assessment_type.to_string()))
    }

    pub fn rate(&self, status: AttendanceStatus) -> ModelResult<f64> {
        self.rates
            .get(&status)
            .copied()
            .ok_or_else(|| ModelError::UnknownStatus(status.to_string()))
    }

    pub fn set_rate(&mut self, status: AttendanceStatus, rate: f64) -> ModelResult<()> {
        check_rate(rate)?;
        self.rates.insert(status, rate);
        Ok(())
    }

    pub fn participants(&self) -> &[StudentId] {
        &self.participants
    }

    pub fn is_participant(&self, student: StudentId) -> bool {
        self.participants.contains(&student)
    }

    pub fn participant(&self, student: StudentId) -> ModelResult<StudentId> {
        if self.is_participant(student) {
            Ok(student)
        } else {
            Err(ModelError::lookup("participant", student))
        }
    }

    /// Table half of a reweight; the retroactive part is driven by the term.
    pub(crate) fn set_weight(&mut self, assessment_type: AssessmentType, weight: f64) -> ModelResult<()> {
        check_weight(weight)?;
        self.weights.insert(assessment_type, weight);
        Ok(())
    }

    pub(crate) fn set_name(&mut self, name: &str) -> ModelResult<()> {
        self.name = clean_name(name)?;
        Ok(())
    }

    pub(crate) fn add_participant(&mut self, student: StudentId) -> bool {
        if self.is_participant(student) {
            return false;
        }
        self.participants.push(student);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_type_and_status() {
        let s = Subject::new("English", None).unwrap();
        for t in AssessmentType::ALL {
            assert_eq!(s.weight(t).unwrap(), DEFAULT_WEIGHT);
        }
        assert_eq!(s.rate(AttendanceStatus::Present).unwrap(), 1.0);
        assert_eq!(s.rate(AttendanceStatus::Late).unwrap(), 0.9);
        assert_eq!(s.rate(AttendanceStatus::Absent).unwrap(), 0.8);
        assert!(s.participants().is_empty());
    }

    #[test]
    fn custom_weights_merge_over_defaults() {
        let custom = BTreeMap::from([(AssessmentType::Exam, 50.0)]);
        let s = Subject::new("Maths", Some(custom)).unwrap();
        assert_eq!(s.weight(AssessmentType::Exam).unwrap(), 50.0);
        assert_eq!(s.weight(AssessmentType::TD).unwrap(), DEFAULT_WEIGHT);

        let bad = BTreeMap::from([(AssessmentType::TP, -1.0)]);
        assert!(Subject::new("Physics", Some(bad)).is_err());
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(Subject::new("  Art ", None).unwrap().name(), "Art");
        assert!(Subject::new("   ", None).is_err());
    }

    #[test]
    fn set_rate_validates_value() {
        let mut s = Subject::new("Biology", None).unwrap();
        s.set_rate(AttendanceStatus::Late, 0.5).unwrap();
        assert_eq!(s.rate(AttendanceStatus::Late).unwrap(), 0.5);
        assert!(s.set_rate(AttendanceStatus::Absent, -0.1).is_err());
        assert!(s.set_rate(AttendanceStatus::Absent, f64::INFINITY).is_err());
        assert_eq!(s.rate(AttendanceStatus::Absent).unwrap(), 0.8);
    }

    #[test]
    fn participant_lookup() {
        let mut s = Subject::new("History", None).unwrap();
        let kid = StudentId::fresh();
        assert!(s.add_participant(kid));
        assert!(!s.add_participant(kid));
        assert_eq!(s.participants(), &[kid]);
        assert_eq!(s.participant(kid).unwrap(), kid);
        assert!(matches!(
            s.participant(StudentId::fresh()),
            Err(ModelError::Lookup { kind: "participant", .. })
        ));
    }
}
