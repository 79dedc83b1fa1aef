//! Queries of the database layer, one type per statement shape.

mod approved_certificate;
mod pending_certificate;

pub use approved_certificate::{
    DeleteApprovedCertificateRecordQuery, GetApprovedCertificateRecordQuery,
    InsertApprovedCertificateRecordQuery,
};
pub use pending_certificate::{
    DeletePendingCertificateRecordQuery, GetPendingCertificateRecordQuery,
    InsertPendingCertificateRecordQuery, RejectPendingCertificateRecordQuery,
};
