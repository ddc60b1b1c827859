//! Domain services (business logic)

pub mod params;
pub mod mentions;
pub mod unique;
pub mod registration_service;

pub use params::{
    CreateStudentParams, CreateTeacherParams, GetCommonStudentsParams, RegisterStudentsParams,
    SendNotificationsParams, SuspendStudentParams,
};
pub use mentions::{mentions, parse_mentions};
pub use unique::unique;
pub use registration_service::RegistrationService;
