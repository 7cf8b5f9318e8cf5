/// Defaults shared by the CLI, the config loader and the emitter.

// Google Sheets export of the slot catalogue (two columns: game, provider)
pub const DEFAULT_SOURCE_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/Unbenannte%20Tabelle%20-%20Tabellenblatt1-85M3iTtbHDVj5UfglfVN8Ufe8Mll5f.csv";

pub const SOURCE_URL_ENV: &str = "SLOT_SEEDER_URL";
pub const DEFAULT_CONFIG_PATH: &str = "slot_seeder.toml";

pub const DEFAULT_TABLE: &str = "slots";
pub const GAME_NAME_COLUMN: &str = "game_name";
pub const PROVIDER_COLUMN: &str = "provider";

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

// Metric names
pub const METRIC_ROWS_READ: &str = "slot_seeder_rows_read_total";
pub const METRIC_ROWS_SKIPPED: &str = "slot_seeder_rows_skipped_total";
pub const METRIC_STATEMENTS: &str = "slot_seeder_statements_total";
