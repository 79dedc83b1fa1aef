//! Services hold the business rules of the certificate approval workflow.

mod workflow;

pub use workflow::{
    CertificateWorkflowError, CertificateWorkflowService, CertiflowWorkflowService,
};

#[cfg(test)]
pub use workflow::MockCertificateWorkflowService;
