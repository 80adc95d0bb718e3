// ============================================================
// FILESYSTEM DISCOVERY LAYER
// ============================================================
// Folder matching and recursive CSV file discovery

mod folders;
mod walker;

pub use folders::match_folders;
pub use walker::collect_csv_files;
