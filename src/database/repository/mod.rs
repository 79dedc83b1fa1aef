//! Repositories, the database frontends used by the services.

mod approved_certificate_repository;
mod pending_certificate_repository;

pub use approved_certificate_repository::ApprovedCertificateRepository;
pub use pending_certificate_repository::PendingCertificateRepository;
