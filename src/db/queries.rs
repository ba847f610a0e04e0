//! SQL query constants
//!
//! Contains all SQL used by the PostgreSQL store.

/// Idempotent schema, executed in order at startup.
///
/// Every child table references its parent with `ON DELETE CASCADE`, so
/// deleting a bill removes its stages and everything hanging from them.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS bills (
        id SERIAL PRIMARY KEY,
        nickname TEXT NOT NULL DEFAULT '',
        theme TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stages (
        id SERIAL PRIMARY KEY,
        external_id INTEGER NOT NULL,
        bill_id INTEGER REFERENCES bills(id) ON DELETE CASCADE,
        number INTEGER NOT NULL,
        type_code VARCHAR(3) NOT NULL,
        presented_on DATE NOT NULL,
        chamber VARCHAR(6) NOT NULL,
        regime VARCHAR(10),
        appreciation VARCHAR(10),
        summary TEXT NOT NULL DEFAULT '',
        justification TEXT NOT NULL DEFAULT '',
        keywords TEXT NOT NULL DEFAULT '',
        author_name TEXT NOT NULL DEFAULT '',
        rapporteur_name TEXT NOT NULL DEFAULT '',
        origin_chamber TEXT NOT NULL DEFAULT '',
        temperature DOUBLE PRECISION,
        on_agenda BOOLEAN,
        nickname TEXT,
        theme VARCHAR(40)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_stages_chamber_external_id ON stages(chamber, external_id)",
    "CREATE INDEX IF NOT EXISTS idx_stages_bill_id ON stages(bill_id)",
    r#"
    CREATE TABLE IF NOT EXISTS proceedings_events (
        id SERIAL PRIMARY KEY,
        stage_id INTEGER NOT NULL REFERENCES stages(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        sequence INTEGER NOT NULL,
        event TEXT NOT NULL,
        venue_code TEXT NOT NULL DEFAULT '',
        venue TEXT NOT NULL,
        situation TEXT NOT NULL,
        text TEXT NOT NULL,
        status TEXT NOT NULL,
        full_text_link TEXT,
        level INTEGER
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_proceedings_stage_order ON proceedings_events(stage_id, date, sequence)",
    r#"
    CREATE TABLE IF NOT EXISTS temperature_history (
        id SERIAL PRIMARY KEY,
        stage_id INTEGER NOT NULL REFERENCES stages(id) ON DELETE CASCADE,
        period DATE NOT NULL,
        period_events INTEGER NOT NULL,
        recent_temperature DOUBLE PRECISION NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_temperature_stage_period ON temperature_history(stage_id, period DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS agenda_history (
        id SERIAL PRIMARY KEY,
        stage_id INTEGER NOT NULL REFERENCES stages(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        week INTEGER NOT NULL,
        venue TEXT NOT NULL DEFAULT '',
        on_agenda BOOLEAN
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS progress_phases (
        id SERIAL PRIMARY KEY,
        bill_id INTEGER NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
        venue_chamber VARCHAR(30),
        global_phase TEXT NOT NULL DEFAULT '',
        venue TEXT,
        started_on DATE,
        ended_on DATE,
        skipped BOOLEAN
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS amendments (
        id SERIAL PRIMARY KEY,
        stage_id INTEGER NOT NULL REFERENCES stages(id) ON DELETE CASCADE,
        presented_on DATE NOT NULL,
        venue TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        full_text_link TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS committee_members (
        id SERIAL PRIMARY KEY,
        role TEXT,
        parliamentarian_id TEXT,
        party TEXT,
        state TEXT,
        seat TEXT,
        name TEXT,
        photo TEXT,
        committee_code TEXT NOT NULL,
        chamber TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_committee_members_lookup ON committee_members(chamber, committee_code)",
    r#"
    CREATE TABLE IF NOT EXISTS general_info (
        id SERIAL PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        value JSONB NOT NULL
    )
    "#,
];

// -- bills ---------------------------------------------------------------------

pub const INSERT_BILL: &str =
    "INSERT INTO bills (nickname, theme) VALUES ($1, $2) RETURNING id, nickname, theme";

pub const GET_BILL: &str = "SELECT id, nickname, theme FROM bills WHERE id = $1";

pub const DELETE_BILL: &str = "DELETE FROM bills WHERE id = $1";

// -- stages --------------------------------------------------------------------

const STAGE_COLUMNS: &str = "id, external_id, bill_id, number, type_code, presented_on, chamber, \
    regime, appreciation, summary, justification, keywords, author_name, rapporteur_name, \
    origin_chamber, temperature, on_agenda, nickname, theme";

pub fn insert_stage() -> String {
    format!(
        "INSERT INTO stages (external_id, bill_id, number, type_code, presented_on, chamber, \
         regime, appreciation, summary, justification, keywords, author_name, rapporteur_name, \
         origin_chamber, temperature, on_agenda, nickname, theme) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
         RETURNING {}",
        STAGE_COLUMNS
    )
}

pub fn get_stage() -> String {
    format!("SELECT {} FROM stages WHERE id = $1", STAGE_COLUMNS)
}

pub fn find_stage() -> String {
    format!(
        "SELECT {} FROM stages WHERE chamber = $1 AND external_id = $2 \
         ORDER BY presented_on, id LIMIT 1",
        STAGE_COLUMNS
    )
}

pub fn stages_for_bill() -> String {
    format!(
        "SELECT {} FROM stages WHERE bill_id = $1 ORDER BY presented_on, id",
        STAGE_COLUMNS
    )
}

pub const SET_STAGE_TEMPERATURE: &str = "UPDATE stages SET temperature = $2 WHERE id = $1";

// -- proceedings -----------------------------------------------------------------

const EVENT_COLUMNS: &str = "id, stage_id, date, sequence, event, venue_code, venue, situation, \
    text, status, full_text_link, level";

pub fn insert_event() -> String {
    format!(
        "INSERT INTO proceedings_events (stage_id, date, sequence, event, venue_code, venue, \
         situation, text, status, full_text_link, level) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
        EVENT_COLUMNS
    )
}

pub fn events_for_stage() -> String {
    format!(
        "SELECT {} FROM proceedings_events WHERE stage_id = $1 ORDER BY date, sequence, id",
        EVENT_COLUMNS
    )
}

pub fn latest_event() -> String {
    format!(
        "SELECT {} FROM proceedings_events WHERE stage_id = $1 \
         ORDER BY date DESC, sequence DESC, id DESC LIMIT 1",
        EVENT_COLUMNS
    )
}

// -- weekly history ----------------------------------------------------------------

pub const INSERT_TEMPERATURE: &str = "INSERT INTO temperature_history \
    (stage_id, period, period_events, recent_temperature) VALUES ($1, $2, $3, $4) \
    RETURNING id, stage_id, period, period_events, recent_temperature";

pub const TEMPERATURE_HISTORY: &str = "SELECT id, stage_id, period, period_events, recent_temperature \
    FROM temperature_history WHERE stage_id = $1 ORDER BY period DESC, id LIMIT $2";

pub const INSERT_AGENDA: &str = "INSERT INTO agenda_history (stage_id, date, week, venue, on_agenda) \
    VALUES ($1, $2, $3, $4, $5) RETURNING id, stage_id, date, week, venue, on_agenda";

pub const AGENDA_HISTORY: &str = "SELECT id, stage_id, date, week, venue, on_agenda \
    FROM agenda_history WHERE stage_id = $1 ORDER BY date DESC, id";

// -- progress --------------------------------------------------------------------

pub const INSERT_PROGRESS: &str = "INSERT INTO progress_phases \
    (bill_id, venue_chamber, global_phase, venue, started_on, ended_on, skipped) \
    VALUES ($1, $2, $3, $4, $5, $6, $7) \
    RETURNING id, bill_id, venue_chamber, global_phase, venue, started_on, ended_on, skipped";

pub const PROGRESS_FOR_BILL: &str = "SELECT id, bill_id, venue_chamber, global_phase, venue, \
    started_on, ended_on, skipped FROM progress_phases WHERE bill_id = $1 ORDER BY id";

// -- amendments ------------------------------------------------------------------

const AMENDMENT_COLUMNS: &str = "id, stage_id, presented_on, venue, author, full_text_link";

pub fn insert_amendment() -> String {
    format!(
        "INSERT INTO amendments (stage_id, presented_on, venue, author, full_text_link) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        AMENDMENT_COLUMNS
    )
}

pub fn get_amendment() -> String {
    format!("SELECT {} FROM amendments WHERE id = $1", AMENDMENT_COLUMNS)
}

pub fn amendments_for_stage() -> String {
    format!(
        "SELECT {} FROM amendments WHERE stage_id = $1 ORDER BY presented_on DESC, id",
        AMENDMENT_COLUMNS
    )
}

// -- committees ------------------------------------------------------------------

pub const INSERT_COMMITTEE_MEMBER: &str = "INSERT INTO committee_members \
    (role, parliamentarian_id, party, state, seat, name, photo, committee_code, chamber) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
    RETURNING id, role, parliamentarian_id, party, state, seat, name, photo, committee_code, chamber";

pub const COMMITTEE_MEMBERS: &str = "SELECT id, role, parliamentarian_id, party, state, seat, name, \
    photo, committee_code, chamber FROM committee_members \
    WHERE chamber = $1 AND committee_code = $2 ORDER BY id";

// -- general info ----------------------------------------------------------------

pub const UPSERT_INFO: &str = "INSERT INTO general_info (name, value) VALUES ($1, $2) \
    ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value RETURNING id, name, value";

pub const GET_INFO: &str = "SELECT id, name, value FROM general_info WHERE name = $1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_cascade_from_parents() {
        let schema = SCHEMA.join("\n");
        for child in [
            "stages",
            "proceedings_events",
            "temperature_history",
            "agenda_history",
            "progress_phases",
            "amendments",
        ] {
            let ddl = SCHEMA
                .iter()
                .find(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", child)))
                .unwrap_or_else(|| panic!("missing table {}", child));
            assert!(ddl.contains("ON DELETE CASCADE"), "{} must cascade", child);
        }
        assert!(schema.contains("ON stages(chamber, external_id)"));
    }

    #[test]
    fn test_event_queries_follow_date_sequence_order() {
        assert!(events_for_stage().contains("ORDER BY date, sequence"));
        assert!(latest_event().contains("ORDER BY date DESC, sequence DESC"));
    }

    #[test]
    fn test_insert_placeholders_match_columns() {
        let sql = insert_stage();
        assert!(sql.contains("$18"));
        assert!(!sql.contains("$19"));
    }
}
