// src/config/consts.rs

// Input layout
pub const LANGUAGES_PAGE: &str = "languages.html";
pub const CONCEPTS_SUBDIR: &str = "datsemshift-concepts";
pub const SHIFTS_SUBDIR: &str = "datsemshift-data";
pub const SHIFT_PAGE_PREFIX: &str = "shift";
pub const PAGE_EXT: &str = "html";

// Defaults
pub const DEFAULT_INPUT_DIR: &str = "raw/raw-data";
pub const DEFAULT_OUT_DIR: &str = "out";

// Output tables (stems; extension follows the export format)
pub const LANGUAGES_FILE: &str = "languages";
pub const CONCEPTS_FILE: &str = "concepts";
pub const SHIFTS_FILE: &str = "shifts";
pub const LEXEMES_FILE: &str = "lexemes";
pub const PARAMETERS_FILE: &str = "parameters";
pub const PAIRS_FILE: &str = "concept-pairs";
pub const MAPPED_FILE: &str = "concepts-mapped";

// Shift page markers
pub const HEADER_CLASS: &str = "shift__header";
pub const HEADER_ITEM_CLASS: &str = "shift__header_item";
pub const REALIZATION_COUNT_CLASS: &str = "realization_number";
pub const REALIZATION_TABLE_CLASS: &str = "realization__table";

// Progress
pub const PROGRESS_EVERY: usize = 500;
