/// Table name for the Experiment Registry.
pub const EXPERIMENTS: &str = "experiments";

/// Pure schema definition, built at compile time with `const_format`, matching
/// this codebase's existing table-creation convention.
pub const CREATES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    EXPERIMENTS,
    " (
        experiment_id  TEXT PRIMARY KEY,
        n_arms         INTEGER NOT NULL,
        status         TEXT NOT NULL DEFAULT 'running',
        winner_arm     INTEGER,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
        concluded_at   TIMESTAMPTZ,
        CONSTRAINT experiments_status_check CHECK (status IN ('running', 'concluded')),
        CONSTRAINT experiments_n_arms_check CHECK (n_arms >= 2)
    );"
);
