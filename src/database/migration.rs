//! Migration module
//!
use crate::sqlite::SqlMigration;

/// Get all the migrations required by this version of the software.
/// There shall be one migration per database version. There could be several
/// statements per migration.
pub fn get_migrations() -> Vec<SqlMigration> {
    vec![
        // Migration 1
        // Add the `pending_certificate` and `approved_certificate` tables.
        SqlMigration::new(
            1,
            r#"
create table pending_certificate (
    certificate_id      text    not null,
    certificate_type    text    not null,
    recipient_name      text    not null,
    creator_name        text    not null,
    issue_date          text    not null,
    signatories         json    not null,
    approvers           json    not null,
    extra_fields        json    not null,
    artifact_location   text    not null,
    status              text    not null default 'pending',
    created_at          text    not null,
    primary key (certificate_id)
);
create index pending_certificate_status_index on pending_certificate(status);
create table approved_certificate (
    certificate_id          text    not null,
    source_certificate_id   text    not null,
    certificate_type        text    not null,
    recipient_name          text    not null,
    creator_name            text    not null,
    issue_date              text    not null,
    signatories             json    not null,
    approvers               json    not null,
    extra_fields            json    not null,
    artifact_location       text    not null,
    approved_at             text    not null,
    primary key (certificate_id)
);
"#,
        ),
    ]
}
