//! Table definitions, one table per entity kind.
//!
//! Every statement is idempotent so `migrate` can run on each start. All
//! identities come from the shared `sequence_generator`, which keeps them
//! monotonic across kinds. Foreign keys do not cascade: deleting a row
//! referenced elsewhere is rejected by the store.

pub const STATEMENTS: &[&str] = &[
    "CREATE SEQUENCE IF NOT EXISTS sequence_generator START WITH 1050 INCREMENT BY 1",
    r#"CREATE TABLE IF NOT EXISTS "organization" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        parent_id BIGINT,
        name VARCHAR(255),
        address VARCHAR(255),
        city VARCHAR(255),
        postal_code VARCHAR(255),
        country VARCHAR(255),
        type VARCHAR(255),
        created_or_edited TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "platform_user" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        user_name VARCHAR(255),
        first_name VARCHAR(255),
        last_name VARCHAR(255),
        email VARCHAR(255),
        password VARCHAR(255),
        last_password_change TIMESTAMPTZ,
        password_change_required BOOLEAN,
        created_or_edited TIMESTAMPTZ,
        organization_id BIGINT REFERENCES "organization" (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "protocol_content" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        content TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "protocol_pdf_file" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        content TEXT,
        mime_type VARCHAR(255)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "protocol" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        is_draft BOOLEAN,
        review_comment VARCHAR(255),
        is_closed BOOLEAN,
        closed_at TIMESTAMPTZ,
        created_or_edited TIMESTAMPTZ,
        protocol_content_id BIGINT UNIQUE REFERENCES "protocol_content" (id),
        protocol_pdf_file_id BIGINT UNIQUE REFERENCES "protocol_pdf_file" (id),
        platform_user_id BIGINT REFERENCES "platform_user" (id),
        organization_id BIGINT REFERENCES "organization" (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "additional_user" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        platform_user_id BIGINT REFERENCES "platform_user" (id),
        protocol_id BIGINT REFERENCES "protocol" (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "protocol_template" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        name VARCHAR(255),
        description VARCHAR(255),
        template TEXT,
        created_or_edited TIMESTAMPTZ
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "template_organization" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        organization_id BIGINT REFERENCES "organization" (id),
        protocol_template_id BIGINT REFERENCES "protocol_template" (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "role" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        name VARCHAR(255),
        description VARCHAR(255)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "user_role" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        platform_user_id BIGINT REFERENCES "platform_user" (id),
        organization_id BIGINT REFERENCES "organization" (id),
        role_id BIGINT REFERENCES "role" (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "user_sessions" (
        id BIGINT PRIMARY KEY DEFAULT nextval('sequence_generator'),
        platform_user_id BIGINT REFERENCES "platform_user" (id)
    )"#,
];
