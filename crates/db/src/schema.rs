use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: &[(&str, &str)] = &[
    (
        "services",
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "locations",
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "billing_companies",
        r#"
        CREATE TABLE IF NOT EXISTS billing_companies (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "appointments",
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            professional_id UUID NOT NULL,
            patient_name VARCHAR(255) NULL,
            service_id UUID NULL REFERENCES services(id),
            scheduled_at TIMESTAMP NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'scheduled',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_appointment_status CHECK (
                status IN ('scheduled', 'confirmed', 'completed', 'cancelled', 'no_show')
            )
        );
        "#,
    ),
    (
        "shared_schedules",
        r#"
        CREATE TABLE IF NOT EXISTS shared_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            token VARCHAR(64) NOT NULL UNIQUE,
            title VARCHAR(255) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            created_by UUID NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_date_range CHECK (end_date >= start_date)
        );
        "#,
    ),
    (
        "shared_schedule_services",
        r#"
        CREATE TABLE IF NOT EXISTS shared_schedule_services (
            shared_schedule_id UUID NOT NULL REFERENCES shared_schedules(id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(id),
            PRIMARY KEY (shared_schedule_id, service_id)
        );
        "#,
    ),
    (
        "shared_schedule_locations",
        r#"
        CREATE TABLE IF NOT EXISTS shared_schedule_locations (
            shared_schedule_id UUID NOT NULL REFERENCES shared_schedules(id) ON DELETE CASCADE,
            location_id UUID NOT NULL REFERENCES locations(id),
            PRIMARY KEY (shared_schedule_id, location_id)
        );
        "#,
    ),
    (
        "shared_schedule_companies",
        r#"
        CREATE TABLE IF NOT EXISTS shared_schedule_companies (
            shared_schedule_id UUID NOT NULL REFERENCES shared_schedules(id) ON DELETE CASCADE,
            company_id UUID NOT NULL REFERENCES billing_companies(id),
            PRIMARY KEY (shared_schedule_id, company_id)
        );
        "#,
    ),
    (
        "shared_schedule_slots",
        r#"
        CREATE TABLE IF NOT EXISTS shared_schedule_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shared_schedule_id UUID NOT NULL REFERENCES shared_schedules(id) ON DELETE CASCADE,
            slot_time TIMESTAMP NOT NULL,
            selected_at TIMESTAMP WITH TIME ZONE NULL,
            selected_by VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_schedule_slot UNIQUE (shared_schedule_id, slot_time)
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_appointments_professional_time ON appointments(professional_id, scheduled_at)",
    "CREATE INDEX IF NOT EXISTS idx_shared_schedules_created_by ON shared_schedules(created_by)",
    "CREATE INDEX IF NOT EXISTS idx_shared_schedule_slots_schedule_id ON shared_schedule_slots(shared_schedule_id)",
    "CREATE INDEX IF NOT EXISTS idx_shared_schedule_slots_slot_time ON shared_schedule_slots(slot_time)",
];

/// Creates every table and index the shared schedule feature needs.
/// Safe to run repeatedly.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, statement) in TABLES {
        tracing::debug!("Ensuring table {}", table);
        sqlx::query(statement).execute(pool).await?;
    }

    // Prepared statements hold a single command each.
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
