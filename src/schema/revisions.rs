use super::{Revision, Step};

const INITIAL_UP: &[Step] = &[
    Step::Sql(
        r#"
        CREATE TABLE users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(64) NOT NULL UNIQUE,
            email VARCHAR(120) NOT NULL UNIQUE,
            password_hash VARCHAR(256) NOT NULL,
            first_name VARCHAR(64),
            last_name VARCHAR(64),
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
    Step::Sql(
        r#"
        CREATE TABLE clients (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(120),
            phone VARCHAR(32),
            address TEXT,
            contact_person VARCHAR(100),
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
    Step::Sql(
        r#"
        CREATE TABLE invoices (
            id SERIAL PRIMARY KEY,
            client_id INTEGER NOT NULL REFERENCES clients (id),
            invoice_number VARCHAR(50) NOT NULL,
            issue_date DATE NOT NULL,
            due_date DATE,
            status VARCHAR(20) NOT NULL DEFAULT 'draft',
            notes TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
    Step::Sql(
        r#"
        CREATE TABLE income (
            id SERIAL PRIMARY KEY,
            date DATE NOT NULL,
            amount NUMERIC(12, 2) NOT NULL,
            details TEXT,
            invoice VARCHAR(50),
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
    Step::Sql(
        r#"
        CREATE TABLE expenses (
            id SERIAL PRIMARY KEY,
            date DATE NOT NULL,
            title VARCHAR(200) NOT NULL,
            amount NUMERIC(12, 2) NOT NULL,
            vendor VARCHAR(100),
            category VARCHAR(50) NOT NULL,
            payment_method VARCHAR(50),
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
];

const INITIAL_DOWN: &[Step] = &[
    Step::Sql("DROP TABLE expenses"),
    Step::Sql("DROP TABLE income"),
    Step::Sql("DROP TABLE invoices"),
    Step::Sql("DROP TABLE clients"),
    Step::Sql("DROP TABLE users"),
];

const LAST_LOGIN_UP: &[Step] = &[Step::Sql("ALTER TABLE users ADD COLUMN last_login TIMESTAMP")];

const LAST_LOGIN_DOWN: &[Step] = &[Step::Sql("ALTER TABLE users DROP COLUMN last_login")];

const OWNERSHIP_UP: &[Step] = &[
    Step::Sql("ALTER TABLE clients ADD COLUMN user_id INTEGER REFERENCES users (id)"),
    Step::Sql("ALTER TABLE clients ADD CONSTRAINT uq_clients_name UNIQUE (name)"),
    Step::Sql(
        r#"
        CREATE TABLE projects (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            description TEXT,
            status VARCHAR(20) NOT NULL DEFAULT 'active',
            hourly_rate NUMERIC(10, 2),
            client_id INTEGER NOT NULL REFERENCES clients (id),
            user_id INTEGER NOT NULL REFERENCES users (id),
            created_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    ),
    Step::Sql("ALTER TABLE invoices ADD COLUMN project_id INTEGER REFERENCES projects (id)"),
];

const OWNERSHIP_DOWN: &[Step] = &[
    Step::Sql("ALTER TABLE invoices DROP COLUMN project_id"),
    Step::Sql("DROP TABLE projects"),
    Step::Sql("ALTER TABLE clients DROP CONSTRAINT uq_clients_name"),
    Step::Sql("ALTER TABLE clients DROP COLUMN user_id"),
];

const TIMESHEETS_UP: &[Step] = &[Step::Sql(
    r#"
    CREATE TABLE timesheets (
        id SERIAL PRIMARY KEY,
        date DATE NOT NULL,
        hours NUMERIC(6, 2) NOT NULL,
        hourly_rate NUMERIC(10, 2) NOT NULL,
        description TEXT,
        client_id INTEGER NOT NULL REFERENCES clients (id),
        project_id INTEGER NOT NULL REFERENCES projects (id),
        invoice_id INTEGER REFERENCES invoices (id),
        created_at TIMESTAMP NOT NULL DEFAULT now()
    )
    "#,
)];

const TIMESHEETS_DOWN: &[Step] = &[Step::Sql("DROP TABLE timesheets")];

const INCOME_LINKS_UP: &[Step] = &[
    Step::Sql(
        "ALTER TABLE income ADD COLUMN client_id INTEGER REFERENCES clients (id) ON DELETE SET NULL",
    ),
    Step::Sql(
        "ALTER TABLE income ADD COLUMN project_id INTEGER REFERENCES projects (id) ON DELETE SET NULL",
    ),
    Step::Sql(
        "ALTER TABLE income ADD COLUMN invoice_id INTEGER REFERENCES invoices (id) ON DELETE SET NULL",
    ),
    Step::LinkIncomeInvoices,
];

const INCOME_LINKS_DOWN: &[Step] = &[
    Step::Sql("ALTER TABLE income DROP COLUMN invoice_id"),
    Step::Sql("ALTER TABLE income DROP COLUMN project_id"),
    Step::Sql("ALTER TABLE income DROP COLUMN client_id"),
];

const RECEIPTS_UP: &[Step] = &[
    Step::Sql("ALTER TABLE expenses ADD COLUMN receipt_blob_name VARCHAR(255)"),
    Step::Sql("ALTER TABLE expenses ADD COLUMN receipt_url VARCHAR(500)"),
];

const RECEIPTS_DOWN: &[Step] = &[
    Step::Sql("ALTER TABLE expenses DROP COLUMN receipt_url"),
    Step::Sql("ALTER TABLE expenses DROP COLUMN receipt_blob_name"),
];

const CLIENT_OWNER_REQUIRED_UP: &[Step] = &[Step::Sql(
    "ALTER TABLE clients ALTER COLUMN user_id SET NOT NULL",
)];

const CLIENT_OWNER_REQUIRED_DOWN: &[Step] = &[Step::Sql(
    "ALTER TABLE clients ALTER COLUMN user_id DROP NOT NULL",
)];

/// Every schema revision, root first.
pub fn akowe_revisions() -> Vec<Revision> {
    vec![
        Revision {
            id: "a1c0f4e2b7d1",
            parent: None,
            summary: "users, clients, invoices, income and expenses",
            upgrade: INITIAL_UP,
            downgrade: INITIAL_DOWN,
        },
        Revision {
            id: "b2d1e5f3c8a2",
            parent: Some("a1c0f4e2b7d1"),
            summary: "track last login",
            upgrade: LAST_LOGIN_UP,
            downgrade: LAST_LOGIN_DOWN,
        },
        Revision {
            id: "c3e2f6a4d9b3",
            parent: Some("b2d1e5f3c8a2"),
            summary: "client ownership, unique client names, projects",
            upgrade: OWNERSHIP_UP,
            downgrade: OWNERSHIP_DOWN,
        },
        Revision {
            id: "d4f3a7b5e0c4",
            parent: Some("c3e2f6a4d9b3"),
            summary: "timesheets",
            upgrade: TIMESHEETS_UP,
            downgrade: TIMESHEETS_DOWN,
        },
        Revision {
            id: "e5a4b8c6f1d5",
            parent: Some("d4f3a7b5e0c4"),
            summary: "link income to clients, projects and invoices",
            upgrade: INCOME_LINKS_UP,
            downgrade: INCOME_LINKS_DOWN,
        },
        Revision {
            id: "f6b5c9d7a2e6",
            parent: Some("e5a4b8c6f1d5"),
            summary: "expense receipts",
            upgrade: RECEIPTS_UP,
            downgrade: RECEIPTS_DOWN,
        },
        Revision {
            id: "g7c6d0e8b3f7",
            parent: Some("f6b5c9d7a2e6"),
            summary: "every client belongs to a user",
            upgrade: CLIENT_OWNER_REQUIRED_UP,
            downgrade: CLIENT_OWNER_REQUIRED_DOWN,
        },
    ]
}
