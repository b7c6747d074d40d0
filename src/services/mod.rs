pub mod appearances;
pub mod ingest;
pub mod ordering;
pub mod roster;
pub mod threads;

pub use appearances::{
    appearance_ranges, collapse_runs, replace_appearances, AppearanceRange, RangeEntry, MAX_ORD,
};
pub use ingest::{
    classify_upload, ingest_strip, plan_image_pages, plan_pdf_pages, replace_installment_pages,
    IngestPlan, PageSeed, UploadKind, ARCHIVE_EXTS, IMAGE_EXTS,
};
pub use ordering::{resequence_after_save, suggest_next_number, SaveChange};
pub use roster::{
    backfill_creators, delete_persona_guarded, display_name, first_appearances,
    set_primary_persona, FirstAppearance,
};
pub use threads::reading_order;
