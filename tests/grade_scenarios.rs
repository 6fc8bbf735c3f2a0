use chrono::Weekday;
use classbookd::model::{AssessmentType, AttendanceStatus, Gender, Group, ModelError, StudentId, SubjectId, Term};

fn english_with_three() -> (Term, SubjectId, Vec<StudentId>) {
    let mut term = Term::new();
    let english = term.add_subject("English", None).expect("create English");
    let mut ids = Vec::new();
    for (name, gender, group) in [
        ("Hajar", Gender::Female, Group::A),
        ("Rayan", Gender::Male, Group::A),
        ("Sara", Gender::Female, Group::B),
    ] {
        let id = term.add_student(name, gender, group).expect("create student");
        term.enroll("English", id).expect("enroll");
        ids.push(id);
    }
    (term, english, ids)
}

#[test]
fn two_rounds_give_two_default_weighted_assessments_each() {
    let (mut term, english, ids) = english_with_three();
    term.record_assessment_for_roster(english, AssessmentType::Exam, &[10, 10, 10])
        .expect("exam round");
    term.record_assessment_for_roster(english, AssessmentType::TP, &[10, 10, 10])
        .expect("tp round");

    for id in ids {
        let list = term.student(id).unwrap().assessments(english);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|a| a.weight() == 25.0));
        assert_eq!(list[0].assessment_type(), AssessmentType::Exam);
        assert_eq!(list[1].assessment_type(), AssessmentType::TP);
    }
}

#[test]
fn roster_attendance_derives_statuses() {
    let (mut term, english, ids) = english_with_three();
    term.record_attendance_for_roster("English", 180, &[0, 2, 10], Weekday::Mon)
        .expect("attendance");

    let statuses: Vec<_> = ids
        .iter()
        .map(|id| term.student(*id).unwrap().attendances(english)[0].status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent
        ]
    );
}

#[test]
fn change_weight_is_retroactive_for_matching_type_only() {
    let (mut term, english, ids) = english_with_three();
    term.record_assessment_for_roster(english, AssessmentType::Exam, &[10, 12, 14])
        .unwrap();
    term.record_assessment_for_roster(english, AssessmentType::TP, &[9, 9, 9])
        .unwrap();

    let updated = term
        .change_weight("English", AssessmentType::Exam, 40.0)
        .expect("reweight");
    assert_eq!(updated, 3);
    assert_eq!(term.subject(english).unwrap().weight(AssessmentType::Exam).unwrap(), 40.0);

    for (id, grade) in ids.iter().zip([10, 12, 14]) {
        let list = term.student(*id).unwrap().assessments(english);
        assert_eq!(list[0].weight(), 40.0);
        assert_eq!(list[0].grade(), grade);
        assert_eq!(list[1].weight(), 25.0);
    }

    // New rounds pick up the new weight.
    term.record_assessment_for_roster(english, AssessmentType::Exam, &[1, 1, 1])
        .unwrap();
    assert_eq!(term.student(ids[0]).unwrap().assessments(english)[2].weight(), 40.0);
}

#[test]
fn final_grade_documented_formula() {
    let mut term = Term::new();
    let english = term.add_subject("English", None).unwrap();
    let kid = term.add_student("Lina", Gender::Female, Group::C).unwrap();
    term.enroll(english, kid).unwrap();

    term.record_assessment_for_roster(english, AssessmentType::Exam, &[10]).unwrap();
    term.record_assessment_for_roster(english, AssessmentType::Exam, &[10]).unwrap();
    term.record_attendance_for_roster(english, 90, &[0], Weekday::Tue).unwrap();

    // 10*25 + 10*25 = 500, one Present record -> rate 1.0
    let grade = term.final_grade(kid).expect("final grade");
    assert!((grade - 500.0).abs() < 1e-9, "got {grade}");
}

#[test]
fn final_grade_uses_configured_rates() {
    let mut term = Term::new();
    let english = term.add_subject("English", None).unwrap();
    let kid = term.add_student("Lina", Gender::Female, Group::C).unwrap();
    term.enroll(english, kid).unwrap();
    term.set_rate(english, AttendanceStatus::Late, 0.5).unwrap();

    term.record_assessment_for_roster(english, AssessmentType::TD, &[20]).unwrap();
    term.record_attendance_for_roster(english, 60, &[3], Weekday::Wed).unwrap();

    let grade = term.final_grade(kid).unwrap();
    assert!((grade - 20.0 * 25.0 * 0.5).abs() < 1e-9, "got {grade}");
}

#[test]
fn short_grade_list_records_nothing() {
    let (mut term, english, ids) = english_with_three();
    let res = term.record_assessment_for_roster(english, AssessmentType::Quizz, &[12, 13]);
    assert_eq!(
        res,
        Err(ModelError::ArityMismatch {
            expected: 3,
            actual: 2
        })
    );
    for id in ids {
        assert!(term.student(id).unwrap().assessments(english).is_empty());
    }
}

#[test]
fn remove_unknown_assessment_is_lookup_error_and_keeps_others() {
    let (mut term, english, ids) = english_with_three();
    let round = term
        .record_assessment_for_roster(english, AssessmentType::Exam, &[8, 9, 10])
        .unwrap();
    let other = term
        .record_assessment_for_roster(english, AssessmentType::TD, &[8, 9, 10])
        .unwrap();

    let err = term.remove_assessment(english, other.get().wrapping_add(1_000_000).into());
    assert!(matches!(err, Err(ModelError::Lookup { .. })));
    for id in &ids {
        assert_eq!(term.student(*id).unwrap().assessments(english).len(), 2);
    }

    assert_eq!(term.remove_assessment(english, round).unwrap(), 3);
    for id in &ids {
        let list = term.student(*id).unwrap().assessments(english);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].event_id(), other);
    }
}

#[test]
fn modify_attendance_through_subject_recomputes_status() {
    let (mut term, english, ids) = english_with_three();
    let monday = term
        .record_attendance_for_roster(english, 180, &[0, 0, 0], Weekday::Mon)
        .unwrap();

    term.modify_attendance_by_id(english, ids[2], monday, 4).unwrap();
    assert_eq!(
        term.student(ids[2]).unwrap().attendances(english)[0].status(),
        AttendanceStatus::Late
    );
    assert!(matches!(
        term.modify_attendance_by_id(english, ids[2], monday, 200),
        Err(ModelError::Validation(_))
    ));
    assert_eq!(
        term.modify_attendance_by_id(english, ids[2], monday, 180),
        Err(ModelError::StatusUndefined(180))
    );
    assert_eq!(term.student(ids[2]).unwrap().attendances(english)[0].late_minutes(), 4);
}
