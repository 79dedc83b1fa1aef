mod delete_approved_certificate;
mod get_approved_certificate;
mod insert_approved_certificate;

pub use delete_approved_certificate::DeleteApprovedCertificateRecordQuery;
pub use get_approved_certificate::GetApprovedCertificateRecordQuery;
pub use insert_approved_certificate::InsertApprovedCertificateRecordQuery;
