//! In-memory store for exercising the service and HTTP layers without a
//! database. Transactions stage a copy of the tables and publish it on
//! commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use registry_shared::CommonStudentsMode;

use crate::domain::{Registration, Student, Teacher};
use crate::error::DomainError;
use crate::repositories::{
    RegistrationRepository, StudentRepository, TeacherRepository, TransactionManager, UnitOfWork,
};
use crate::services::RegistrationService;

#[derive(Debug, Clone, Default)]
struct Tables {
    students: BTreeMap<String, Student>,
    teachers: BTreeMap<String, Teacher>,
    registrations: Vec<Registration>,
    next_id: i64,
}

impl Tables {
    fn student_emails_in(&self, emails: &[String], include_suspended: bool) -> Vec<String> {
        let wanted: HashSet<&str> = emails.iter().map(String::as_str).collect();
        self.registrations
            .iter()
            .filter(|r| wanted.contains(r.student_email.as_str()))
            .filter(|r| include_suspended || r.is_active())
            .filter(|r| self.students.contains_key(&r.student_email))
            .map(|r| r.student_email.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Default)]
struct Faults {
    registration_insert_after: Option<usize>,
    rollback: bool,
}

#[derive(Debug, Default)]
struct State {
    tables: Tables,
    faults: Faults,
    commits: usize,
    rollbacks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Service wired to this store for every port.
    pub fn service(&self) -> RegistrationService {
        RegistrationService::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    pub fn seed_student(&self, email: &str) {
        let student = Student {
            email: email.to_string(),
            name: String::new(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.state().tables.students.insert(email.to_string(), student);
    }

    pub fn seed_teacher(&self, email: &str) {
        let teacher = Teacher {
            email: email.to_string(),
            name: String::new(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.state().tables.teachers.insert(email.to_string(), teacher);
    }

    pub fn registration_count(&self) -> usize {
        self.state().tables.registrations.len()
    }

    pub fn suspended_at(&self, student_email: &str) -> Option<DateTime<Utc>> {
        self.state()
            .tables
            .registrations
            .iter()
            .find(|r| r.student_email == student_email)
            .and_then(|r| r.suspended_at)
    }

    pub fn commits(&self) -> usize {
        self.state().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }

    /// Makes bulk registration fail once `n` rows have been staged.
    pub fn fail_registration_insert_after(&self, n: usize) {
        self.state().faults.registration_insert_after = Some(n);
    }

    pub fn fail_rollback(&self) {
        self.state().faults.rollback = true;
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        Ok(self.state().tables.students.get(email).cloned())
    }

    async fn find_emails_in(
        &self,
        emails: &[String],
        include_suspended: bool,
    ) -> Result<Vec<String>, DomainError> {
        Ok(self.state().tables.student_emails_in(emails, include_suspended))
    }
}

#[async_trait]
impl TeacherRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Teacher>, DomainError> {
        Ok(self.state().tables.teachers.get(email).cloned())
    }

    async fn count_existing(&self, emails: &[String]) -> Result<u64, DomainError> {
        let state = self.state();
        let distinct: HashSet<&String> = emails.iter().collect();
        Ok(distinct
            .into_iter()
            .filter(|email| state.tables.teachers.contains_key(*email))
            .count() as u64)
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn find_registered_student_emails(
        &self,
        teacher_emails: &[String],
        mode: CommonStudentsMode,
    ) -> Result<Vec<String>, DomainError> {
        let state = self.state();
        let wanted: HashSet<&str> = teacher_emails.iter().map(String::as_str).collect();

        let mut teachers_per_student: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
        for reg in state.tables.registrations.iter().filter(|r| r.is_active()) {
            if wanted.contains(reg.teacher_email.as_str()) {
                teachers_per_student
                    .entry(reg.student_email.as_str())
                    .or_default()
                    .insert(reg.teacher_email.as_str());
            }
        }

        Ok(teachers_per_student
            .into_iter()
            .filter(|(_, teachers)| match mode {
                CommonStudentsMode::Union => true,
                CommonStudentsMode::Intersection => teachers.len() == wanted.len(),
            })
            .map(|(student, _)| student.to_string())
            .collect())
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        let staged = self.state().tables.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            store: self.clone(),
            staged,
        }))
    }
}

struct InMemoryUnitOfWork {
    store: InMemoryStore,
    staged: Tables,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_teacher_by_email(&mut self, email: &str) -> Result<Option<Teacher>, DomainError> {
        Ok(self.staged.teachers.get(email).cloned())
    }

    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<Student>, DomainError> {
        Ok(self.staged.students.get(email).cloned())
    }

    async fn find_existing_student_emails(
        &mut self,
        emails: &[String],
    ) -> Result<Vec<String>, DomainError> {
        let distinct: BTreeSet<&String> = emails.iter().collect();
        Ok(distinct
            .into_iter()
            .filter(|email| self.staged.students.contains_key(*email))
            .cloned()
            .collect())
    }

    async fn create_student(&mut self, student: &Student) -> Result<(), DomainError> {
        if self.staged.students.contains_key(&student.email) {
            return Err(DomainError::Constraint(format!(
                "student email already exists: {}",
                student.email
            )));
        }
        self.staged.students.insert(student.email.clone(), student.clone());
        Ok(())
    }

    async fn create_teacher(&mut self, teacher: &Teacher) -> Result<(), DomainError> {
        if self.staged.teachers.contains_key(&teacher.email) {
            return Err(DomainError::Constraint(format!(
                "teacher email already exists: {}",
                teacher.email
            )));
        }
        self.staged.teachers.insert(teacher.email.clone(), teacher.clone());
        Ok(())
    }

    async fn create_registrations(
        &mut self,
        teacher_email: &str,
        student_emails: &[String],
    ) -> Result<u64, DomainError> {
        let fail_after = self.store.state().faults.registration_insert_after;
        let mut inserted = 0u64;
        for (staged, student_email) in student_emails.iter().enumerate() {
            if fail_after.is_some_and(|n| staged >= n) {
                return Err(DomainError::Store("injected insert failure".to_string()));
            }
            let existing = self
                .staged
                .registrations
                .iter_mut()
                .find(|r| r.student_email == *student_email && r.teacher_email == teacher_email);
            if let Some(reg) = existing {
                if !reg.is_active() {
                    reg.reactivate();
                    inserted += 1;
                }
                continue;
            }
            self.staged.next_id += 1;
            self.staged.registrations.push(Registration {
                id: self.staged.next_id,
                student_email: student_email.clone(),
                teacher_email: teacher_email.to_string(),
                created_at: Utc::now(),
                suspended_at: None,
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn suspend_registrations(&mut self, student_email: &str) -> Result<u64, DomainError> {
        let now = Utc::now();
        let mut touched = 0u64;
        for reg in self
            .staged
            .registrations
            .iter_mut()
            .filter(|r| r.student_email == student_email && r.is_active())
        {
            reg.suspend(now);
            touched += 1;
        }
        Ok(touched)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        let mut state = this.store.state();
        state.tables = this.staged;
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        let mut state = self.store.state();
        state.rollbacks += 1;
        if state.faults.rollback {
            return Err(DomainError::Store("injected rollback failure".to_string()));
        }
        Ok(())
    }
}
