mod delete_pending_certificate;
mod get_pending_certificate;
mod insert_pending_certificate;
mod reject_pending_certificate;

pub use delete_pending_certificate::DeletePendingCertificateRecordQuery;
pub use get_pending_certificate::GetPendingCertificateRecordQuery;
pub use insert_pending_certificate::InsertPendingCertificateRecordQuery;
pub use reject_pending_certificate::RejectPendingCertificateRecordQuery;
