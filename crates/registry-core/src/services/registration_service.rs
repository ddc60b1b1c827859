// ============================================================================
// Registry Core - Registration Service
// File: crates/registry-core/src/services/registration_service.rs
// ============================================================================
//! Registration, roster, suspension, and notification flows

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use registry_shared::utils::mask_email;
use registry_shared::CommonStudentsMode;

use crate::domain::{Student, Teacher};
use crate::error::DomainError;
use crate::repositories::{
    RegistrationRepository, StudentRepository, TeacherRepository, TransactionManager, UnitOfWork,
};
use crate::services::mentions::parse_mentions;
use crate::services::params::{
    CreateStudentParams, CreateTeacherParams, GetCommonStudentsParams, RegisterStudentsParams,
    SendNotificationsParams, SuspendStudentParams,
};
use crate::services::unique::unique;

/// Service for managing teachers, students, and their registrations.
///
/// Holds no mutable state; every mutating call opens its own transaction
/// through the `TransactionManager` and finishes it before returning.
#[derive(Clone)]
pub struct RegistrationService {
    students: Arc<dyn StudentRepository>,
    teachers: Arc<dyn TeacherRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    transactions: Arc<dyn TransactionManager>,
    common_students_mode: CommonStudentsMode,
}

impl RegistrationService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        teachers: Arc<dyn TeacherRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            students,
            teachers,
            registrations,
            transactions,
            common_students_mode: CommonStudentsMode::default(),
        }
    }

    pub fn with_common_students_mode(mut self, mode: CommonStudentsMode) -> Self {
        self.common_students_mode = mode;
        self
    }

    /// Create a student record
    pub async fn create_student(&self, params: CreateStudentParams) -> Result<(), DomainError> {
        params.validate()?;
        let student = Student::new(params.email, params.name)?;

        let mut uow = self.transactions.begin().await?;
        let result = uow.create_student(&student).await;
        self.finish("create_student", uow, result).await?;

        info!("Student created: {}", mask_email(&student.email));
        Ok(())
    }

    /// Create a teacher record
    pub async fn create_teacher(&self, params: CreateTeacherParams) -> Result<(), DomainError> {
        params.validate()?;
        let teacher = Teacher::new(params.email, params.name)?;

        let mut uow = self.transactions.begin().await?;
        let result = uow.create_teacher(&teacher).await;
        self.finish("create_teacher", uow, result).await?;

        info!("Teacher created: {}", mask_email(&teacher.email));
        Ok(())
    }

    pub async fn get_student(&self, email: &str) -> Result<Student, DomainError> {
        self.students
            .find_by_email(email)
            .await?
            .ok_or_else(DomainError::student_not_found)
    }

    pub async fn get_teacher(&self, email: &str) -> Result<Teacher, DomainError> {
        self.teachers
            .find_by_email(email)
            .await?
            .ok_or_else(DomainError::teacher_not_found)
    }

    /// Register students under a teacher.
    ///
    /// Either every listed student gets a registration row or none does.
    pub async fn register_students(&self, params: RegisterStudentsParams) -> Result<(), DomainError> {
        params.validate()?;
        let students = unique(params.students);

        let mut uow = self.transactions.begin().await?;
        let result = Self::register_in(uow.as_mut(), &params.teacher, &students).await;
        let inserted = self.finish("register_students", uow, result).await?;

        info!(
            "Registered {} student(s) under {} ({} new)",
            students.len(),
            mask_email(&params.teacher),
            inserted
        );
        Ok(())
    }

    /// Students only need to exist; a prior registration elsewhere is not required.
    async fn register_in(
        uow: &mut dyn UnitOfWork,
        teacher: &str,
        students: &[String],
    ) -> Result<u64, DomainError> {
        if uow.find_teacher_by_email(teacher).await?.is_none() {
            return Err(DomainError::teacher_not_found());
        }

        if students.is_empty() {
            debug!("Empty student list, nothing to register");
            return Ok(0);
        }

        let found = uow.find_existing_student_emails(students).await?;
        if found.len() < students.len() {
            return Err(DomainError::Validation("student not found in database".to_string()));
        }

        uow.create_registrations(teacher, students).await
    }

    /// Students with an active registration under the given teachers.
    pub async fn get_common_students(
        &self,
        params: GetCommonStudentsParams,
    ) -> Result<Vec<String>, DomainError> {
        params.validate()?;
        let teachers = unique(params.teachers);
        if teachers.is_empty() {
            return Ok(Vec::new());
        }

        let students = self
            .registrations
            .find_registered_student_emails(&teachers, self.common_students_mode)
            .await?;

        // An empty roster is only an error when none of the teachers exist.
        if students.is_empty() && self.teachers.count_existing(&teachers).await? == 0 {
            return Err(DomainError::teacher_not_found());
        }

        debug!(
            "Common students ({}) for {} teacher(s): {}",
            self.common_students_mode.as_str(),
            teachers.len(),
            students.len()
        );
        Ok(students)
    }

    /// Recipients of a notification: the teacher's active roster followed by
    /// actively registered students mentioned in the text.
    pub async fn send_notifications(
        &self,
        params: SendNotificationsParams,
    ) -> Result<Vec<String>, DomainError> {
        params.validate()?;
        self.get_teacher(&params.teacher).await?;

        let roster = self
            .registrations
            .find_registered_student_emails(
                std::slice::from_ref(&params.teacher),
                CommonStudentsMode::Union,
            )
            .await?;

        let mentioned = parse_mentions(&params.notification);
        let resolved = if mentioned.is_empty() {
            Vec::new()
        } else {
            let found: HashSet<String> = self
                .students
                .find_emails_in(&mentioned, false)
                .await?
                .into_iter()
                .collect();
            mentioned
                .into_iter()
                .filter(|email| found.contains(email))
                .collect()
        };

        let recipients = unique(roster.into_iter().chain(resolved));
        info!(
            "Notification from {} resolves to {} recipient(s)",
            mask_email(&params.teacher),
            recipients.len()
        );
        Ok(recipients)
    }

    /// Suspend a student's registrations. Suspending again is a no-op.
    pub async fn suspend(&self, params: SuspendStudentParams) -> Result<(), DomainError> {
        params.validate()?;

        let mut uow = self.transactions.begin().await?;
        let result = Self::suspend_in(uow.as_mut(), &params.student).await;
        let touched = self.finish("suspend", uow, result).await?;

        info!("Suspended {} ({} registration(s) updated)", mask_email(&params.student), touched);
        Ok(())
    }

    async fn suspend_in(uow: &mut dyn UnitOfWork, student: &str) -> Result<u64, DomainError> {
        if uow.find_student_by_email(student).await?.is_none() {
            return Err(DomainError::student_not_found());
        }
        uow.suspend_registrations(student).await
    }

    /// Commits on success, rolls back on failure. A failed rollback is
    /// logged and never replaces the original error.
    async fn finish<T: Send>(
        &self,
        operation: &'static str,
        uow: Box<dyn UnitOfWork>,
        result: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        match result {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!("[{}] rollback failed after '{}': {}", operation, err, rollback_err);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockRegistrationRepository, MockStudentRepository, MockTeacherRepository};
    use crate::testing::InMemoryStore;

    fn register(teacher: &str, students: &[&str]) -> RegisterStudentsParams {
        RegisterStudentsParams {
            teacher: teacher.to_string(),
            students: students.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn common(teachers: &[&str]) -> GetCommonStudentsParams {
        GetCommonStudentsParams {
            teachers: teachers.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn notify(teacher: &str, text: &str) -> SendNotificationsParams {
        SendNotificationsParams {
            teacher: teacher.to_string(),
            notification: text.to_string(),
        }
    }

    fn suspend(student: &str) -> SuspendStudentParams {
        SuspendStudentParams {
            student: student.to_string(),
        }
    }

    fn seeded() -> (RegistrationService, InMemoryStore) {
        let store = InMemoryStore::new();
        store.seed_teacher("t@x.com");
        store.seed_teacher("t2@x.com");
        for s in ["a@x.com", "b@x.com", "c@x.com", "d@x.com"] {
            store.seed_student(s);
        }
        (store.service(), store)
    }

    #[tokio::test]
    async fn test_register_creates_one_active_row_per_student() {
        let (service, store) = seeded();

        service.register_students(register("t@x.com", &["a@x.com", "b@x.com"])).await.unwrap();

        assert_eq!(store.registration_count(), 2);
        let students = service.get_common_students(common(&["t@x.com"])).await.unwrap();
        assert_eq!(students, vec!["a@x.com".to_string(), "b@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_reregister_reactivates_suspended_student() {
        let (service, store) = seeded();
        service.register_students(register("t@x.com", &["a@x.com"])).await.unwrap();
        service.suspend(suspend("a@x.com")).await.unwrap();
        assert!(service.get_common_students(common(&["t@x.com"])).await.unwrap().is_empty());

        service.register_students(register("t@x.com", &["a@x.com"])).await.unwrap();

        assert_eq!(store.registration_count(), 1);
        assert!(store.suspended_at("a@x.com").is_none());
        let students = service.get_common_students(common(&["t@x.com"])).await.unwrap();
        assert_eq!(students, vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_staged_writes() {
        let (_service, store) = seeded();

        let mut uow = store.begin().await.unwrap();
        let staged = uow
            .create_registrations("t@x.com", &["a@x.com".to_string(), "b@x.com".to_string()])
            .await
            .unwrap();
        assert_eq!(staged, 2);
        drop(uow);

        assert_eq!(store.registration_count(), 0);
        assert_eq!(store.commits(), 0);
    }

    #[tokio::test]
    async fn test_register_unknown_student_inserts_nothing() {
        let (service, store) = seeded();

        let err = service
            .register_students(register("t@x.com", &["a@x.com", "missing@x.com"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("student not found")));
        assert_eq!(store.registration_count(), 0);
        assert_eq!(store.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_register_unknown_teacher() {
        let (service, store) = seeded();

        let err = service
            .register_students(register("nobody@x.com", &["a@x.com"]))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::teacher_not_found());
        assert_eq!(store.registration_count(), 0);
    }

    #[tokio::test]
    async fn test_register_failure_leaves_no_partial_rows() {
        let (service, store) = seeded();
        store.fail_registration_insert_after(1);

        let err = service
            .register_students(register("t@x.com", &["a@x.com", "b@x.com", "c@x.com"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Store(_)));
        assert_eq!(store.registration_count(), 0);
    }

    #[tokio::test]
    async fn test_rollback_failure_does_not_shadow_original_error() {
        let (service, store) = seeded();
        store.fail_rollback();

        let err = service
            .register_students(register("t@x.com", &["missing@x.com"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_empty_list_is_noop() {
        let (service, store) = seeded();

        service.register_students(register("t@x.com", &[])).await.unwrap();

        assert_eq!(store.registration_count(), 0);
        assert_eq!(store.commits(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicates_in_request_are_collapsed() {
        let (service, store) = seeded();

        service
            .register_students(register("t@x.com", &["a@x.com", "a@x.com"]))
            .await
            .unwrap();

        assert_eq!(store.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let (service, _store) = seeded();

        let err = service
            .register_students(register("t@x.com", &["not-an-email"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_common_students_is_union_by_default() {
        let (service, _store) = seeded();
        service.register_students(register("t@x.com", &["a@x.com", "b@x.com"])).await.unwrap();
        service.register_students(register("t2@x.com", &["b@x.com", "c@x.com"])).await.unwrap();

        let students = service
            .get_common_students(common(&["t@x.com", "t2@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            students,
            vec!["a@x.com".to_string(), "b@x.com".to_string(), "c@x.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_common_students_intersection_mode() {
        let (service, _store) = seeded();
        let service = service.with_common_students_mode(CommonStudentsMode::Intersection);
        service.register_students(register("t@x.com", &["a@x.com", "b@x.com"])).await.unwrap();
        service.register_students(register("t2@x.com", &["b@x.com", "c@x.com"])).await.unwrap();

        let students = service
            .get_common_students(common(&["t@x.com", "t2@x.com"]))
            .await
            .unwrap();

        assert_eq!(students, vec!["b@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_common_students_empty_and_unknown() {
        let (service, _store) = seeded();

        assert!(service.get_common_students(common(&[])).await.unwrap().is_empty());
        assert_eq!(
            service.get_common_students(common(&["ghost@x.com"])).await.unwrap_err(),
            DomainError::teacher_not_found()
        );
        // Known teacher without students is an empty roster, not an error.
        assert!(service.get_common_students(common(&["t@x.com"])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_common_students_excludes_suspended() {
        let (service, _store) = seeded();
        service.register_students(register("t@x.com", &["a@x.com", "b@x.com"])).await.unwrap();
        service.suspend(suspend("a@x.com")).await.unwrap();

        let students = service.get_common_students(common(&["t@x.com"])).await.unwrap();
        assert_eq!(students, vec!["b@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_notifications_roster_first_then_mentions() {
        let (service, _store) = seeded();
        service.register_students(register("t@x.com", &["b@x.com", "c@x.com"])).await.unwrap();
        // d and a need an active registration somewhere to be mentionable.
        service.register_students(register("t2@x.com", &["d@x.com", "a@x.com"])).await.unwrap();

        let recipients = service
            .send_notifications(notify("t@x.com", "Hello @d@x.com @c@x.com @a@x.com @d@x.com"))
            .await
            .unwrap();

        assert_eq!(
            recipients,
            vec![
                "b@x.com".to_string(),
                "c@x.com".to_string(),
                "d@x.com".to_string(),
                "a@x.com".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_notifications_skip_suspended_and_unknown_mentions() {
        let (service, _store) = seeded();
        service.register_students(register("t2@x.com", &["a@x.com", "b@x.com"])).await.unwrap();
        service.suspend(suspend("a@x.com")).await.unwrap();

        let recipients = service
            .send_notifications(notify(
                "t@x.com",
                "Hey @a@x.com @b@x.com @ghost@x.com @c@x.com",
            ))
            .await
            .unwrap();

        // c exists but has no registration, a is suspended, ghost is unknown.
        assert_eq!(recipients, vec!["b@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_notifications_without_recipients_is_empty_list() {
        let (service, _store) = seeded();

        let recipients = service
            .send_notifications(notify("t@x.com", "Nobody to tell"))
            .await
            .unwrap();

        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn test_notifications_unknown_teacher() {
        let (service, _store) = seeded();

        let err = service
            .send_notifications(notify("ghost@x.com", "hello"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::teacher_not_found());
    }

    #[tokio::test]
    async fn test_suspend_twice_succeeds() {
        let (service, store) = seeded();
        service.register_students(register("t@x.com", &["a@x.com"])).await.unwrap();

        service.suspend(suspend("a@x.com")).await.unwrap();
        let first = store.suspended_at("a@x.com");
        service.suspend(suspend("a@x.com")).await.unwrap();

        assert!(first.is_some());
        assert_eq!(store.suspended_at("a@x.com"), first);
    }

    #[tokio::test]
    async fn test_suspend_unknown_student() {
        let (service, _store) = seeded();

        let err = service.suspend(suspend("ghost@x.com")).await.unwrap_err();
        assert_eq!(err, DomainError::student_not_found());
    }

    #[tokio::test]
    async fn test_create_duplicate_teacher_is_constraint_error() {
        let (service, _store) = seeded();

        let params = CreateTeacherParams {
            email: "t@x.com".to_string(),
            name: None,
        };
        let err = service.create_teacher(params).await.unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_create_student_then_lookup() {
        let (service, _store) = seeded();

        service
            .create_student(CreateStudentParams {
                email: "new@x.com".to_string(),
                name: Some("New".to_string()),
            })
            .await
            .unwrap();

        let student = service.get_student("new@x.com").await.unwrap();
        assert_eq!(student.name, "New");
    }

    fn mocked(
        students: MockStudentRepository,
        teachers: MockTeacherRepository,
        registrations: MockRegistrationRepository,
    ) -> RegistrationService {
        RegistrationService::new(
            Arc::new(students),
            Arc::new(teachers),
            Arc::new(registrations),
            Arc::new(InMemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn test_notifications_propagate_store_errors() {
        let mut teachers = MockTeacherRepository::new();
        teachers
            .expect_find_by_email()
            .returning(|email| Ok(Some(Teacher::new(email.to_string(), None).unwrap())));
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_find_registered_student_emails()
            .returning(|_, _| Ok(vec!["a@x.com".to_string()]));
        let mut students = MockStudentRepository::new();
        students
            .expect_find_emails_in()
            .returning(|_, _| Err(DomainError::Store("connection reset".to_string())));

        let service = mocked(students, teachers, registrations);
        let err = service
            .send_notifications(notify("t@x.com", "hi @b@x.com"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::Store("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_notifications_without_mentions_skip_student_lookup() {
        let mut teachers = MockTeacherRepository::new();
        teachers
            .expect_find_by_email()
            .returning(|email| Ok(Some(Teacher::new(email.to_string(), None).unwrap())));
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_find_registered_student_emails()
            .times(1)
            .returning(|_, _| Ok(vec!["a@x.com".to_string()]));
        let mut students = MockStudentRepository::new();
        students.expect_find_emails_in().never();

        let service = mocked(students, teachers, registrations);
        let recipients = service
            .send_notifications(notify("t@x.com", "plain text"))
            .await
            .unwrap();

        assert_eq!(recipients, vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_common_students_store_error_is_not_masked() {
        let teachers = MockTeacherRepository::new();
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_find_registered_student_emails()
            .returning(|_, _| Err(DomainError::Store("timeout".to_string())));

        let service = mocked(MockStudentRepository::new(), teachers, registrations);
        let err = service.get_common_students(common(&["t@x.com"])).await.unwrap_err();

        assert_eq!(err, DomainError::Store("timeout".to_string()));
    }
}
