//! Upload normalization: heterogeneous uploads to an ordered page sequence.
//!
//! Editors upload loose image files, one PDF, or (someday) a CBZ/ZIP archive.
//! Filenames carry the ordering: a name containing "cover" is the cover, and
//! a regex slices the page number out of everything else. The planner is
//! pure; applying a plan replaces the installment's pages in one transaction.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use surrealdb::RecordId;

use crate::db::connection::LongboxDb;
use crate::models::installment::Installment;
use crate::models::page::{Page, PageCreate};
use crate::models::series::Series;
use crate::models::{InstallmentCreate, SeriesUpdate};
use crate::services::ordering::{self, SaveChange};
use crate::utils::numeral::IssueNumber;
use crate::LongboxError;

/// Image extensions accepted as loose page files.
pub const IMAGE_EXTS: &[&str] = &[
    "bmp", "gif", "jp2", "j2k", "jpc", "jpf", "jpx", "j2c", "jpg", "jpeg", "jpe", "png", "apng",
    "tif", "tiff",
];

/// Archive extensions accepted as a single-file upload.
pub const ARCHIVE_EXTS: &[&str] = &["pdf", "zip"];

/// Slices `label`/`number`/`ext` out of a page filename, tolerating a
/// word-ish prefix and zero padding ("page_012.png", "b03.jpg", "12.png").
static NAME_SLICER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<label>(?:[-_a-z\s]+(?:\d+[-_\s]+)?)?0*(?P<number>\d+)).*\.(?P<ext>[a-z1-9]+)$",
    )
    .expect("page name regex is valid")
});

/// Lowercased filename extension, without the dot.
pub fn ext_name(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// What an upload turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// One or more loose image files.
    Images,
    /// A single PDF.
    Pdf,
}

/// Classify an upload by its filenames, rejecting the combinations the
/// ingest pipeline cannot handle.
pub fn classify_upload(names: &[String]) -> Result<UploadKind, LongboxError> {
    if names.is_empty() {
        return Err(LongboxError::Validation("No files to ingest.".into()));
    }

    let exts: HashSet<String> = names.iter().map(|n| ext_name(n)).collect();

    if names.len() > 1 && exts.iter().any(|e| ARCHIVE_EXTS.contains(&e.as_str())) {
        return Err(LongboxError::Validation(
            "Only one archive file at a time is accepted.".into(),
        ));
    }
    if exts.contains("zip") {
        return Err(LongboxError::Validation("Zip unpacking not implemented.".into()));
    }
    if exts.contains("pdf") {
        return Ok(UploadKind::Pdf);
    }
    if let Some(bad) = exts.iter().find(|e| !IMAGE_EXTS.contains(&e.as_str())) {
        return Err(LongboxError::Validation(format!(
            "Unsupported file type '{}'.",
            bad
        )));
    }
    Ok(UploadKind::Images)
}

/// One planned page, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSeed {
    pub order: i64,
    pub name: String,
    /// Display label sliced from the filename ("12", "b3"); strips use it
    /// as the installment number.
    pub label: Option<String>,
}

/// The normalized outcome of scanning an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestPlan {
    pub has_cover: bool,
    pub pages: Vec<PageSeed>,
}

struct ParsedName {
    number: i64,
    is_cover: bool,
    name: String,
    label: Option<String>,
}

fn parse_name(name: &str) -> Option<ParsedName> {
    if name.to_lowercase().contains("cover") {
        return Some(ParsedName {
            number: 0,
            is_cover: true,
            name: name.to_string(),
            label: None,
        });
    }

    let caps = NAME_SLICER.captures(name)?;
    let number: i64 = caps["number"].parse().ok()?;

    // "issue"/"page" prefixes are noise; any other word contributes its
    // first letter to the label ("bonus03.png" -> "b3")
    let prefix: String = caps["label"]
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    let label = match prefix.chars().next() {
        None => number.to_string(),
        Some(c) if c.eq_ignore_ascii_case(&'i') || c.eq_ignore_ascii_case(&'p') => {
            number.to_string()
        }
        Some(c) => format!("{}{}", c.to_ascii_lowercase(), number),
    };

    Some(ParsedName {
        number,
        is_cover: false,
        name: name.to_string(),
        label: Some(label),
    })
}

/// Plan a loose-images upload: cover first, everything else by its parsed
/// page number, re-indexed densely from zero. Unparseable names are skipped.
pub fn plan_image_pages(names: &[String]) -> IngestPlan {
    let mut parsed: Vec<ParsedName> = names.iter().filter_map(|n| parse_name(n)).collect();
    let has_cover = parsed.iter().any(|p| p.is_cover);

    parsed.sort_by(|a, b| {
        (!a.is_cover, a.number, &a.name).cmp(&(!b.is_cover, b.number, &b.name))
    });

    let pages = parsed
        .into_iter()
        .enumerate()
        .map(|(i, p)| PageSeed {
            order: i as i64,
            name: p.name,
            label: p.label,
        })
        .collect();

    IngestPlan { has_cover, pages }
}

/// Generated name for a page cut out of a PDF.
pub fn page_name(stem: &str, index: i64, ext: &str) -> String {
    format!("{}_{:04}{}", stem, index, ext)
}

/// Plan a PDF upload: the caller supplies the page count (the PDF itself is
/// a media concern); pages are named after the file and numbered in order.
/// Page zero of a PDF is its cover.
pub fn plan_pdf_pages(pdf_file: &str, page_count: i64) -> IngestPlan {
    let stem = Path::new(pdf_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());

    let pages = (0..page_count)
        .map(|i| PageSeed {
            order: i,
            name: page_name(&stem, i, ".jpg"),
            label: None,
        })
        .collect();

    IngestPlan {
        has_cover: true,
        pages,
    }
}

/// Replace an installment's pages with a plan's, updating `has_cover` and
/// `page_count` to match. One transaction; prior pages are gone only if the
/// new ones land.
pub async fn replace_installment_pages(
    db: &LongboxDb,
    installment: &RecordId,
    plan: &IngestPlan,
) -> Result<Vec<Page>, LongboxError> {
    let seeds: Vec<PageCreate> = plan
        .pages
        .iter()
        .map(|p| PageCreate {
            installment: installment.clone(),
            order: p.order,
            original_name: Some(p.name.clone()),
        })
        .collect();
    let page_count = seeds.len() as i64;

    let mut response = db
        .query(
            r#"
            BEGIN TRANSACTION;
            DELETE appearance WHERE installment = $installment;
            DELETE page WHERE installment = $installment;
            INSERT INTO page $seeds;
            UPDATE $installment SET has_cover = $has_cover, page_count = $page_count;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("installment", installment.clone()))
        .bind(("seeds", seeds))
        .bind(("has_cover", plan.has_cover))
        .bind(("page_count", page_count))
        .await?
        .check()?;

    let pages: Vec<Page> = response.take(response.num_statements() - 2)?;
    Ok(pages)
}

/// Re-seed a strip series from loose images: every image becomes its own
/// single-page installment labeled from its filename, replacing all prior
/// installments of the series.
pub async fn ingest_strip(
    db: &LongboxDb,
    series: &Series,
    names: &[String],
) -> Result<Vec<Installment>, LongboxError> {
    classify_upload(names).and_then(|kind| match kind {
        UploadKind::Images => Ok(()),
        UploadKind::Pdf => Err(LongboxError::Validation(
            "A strip series takes loose images, not archives.".into(),
        )),
    })?;

    let mut plan = plan_image_pages(names);
    // strips read in filename order, not parsed-number order
    plan.pages.sort_by(|a, b| a.name.cmp(&b.name));

    // full replace: drop the old strip run
    let old = crate::models::installment::list_installments(db, &series.id).await?;
    for installment in &old {
        crate::models::installment::delete_installment(db, &installment.id.key().to_string())
            .await?;
    }

    let mut created = Vec::with_capacity(plan.pages.len());
    for seed in &plan.pages {
        let number = seed
            .label
            .as_deref()
            .and_then(|l| l.parse::<IssueNumber>().ok());
        let title = match number {
            Some(_) => None,
            None => Some(seed.label.clone().unwrap_or_else(|| seed.name.clone())),
        };

        let mut data = InstallmentCreate::new(series.id.clone());
        data.number = number;
        data.title = title;
        data.has_cover = Some(false);

        let installment = crate::models::installment::create_installment(db, data).await?;
        ordering::resequence_after_save(db, &installment, SaveChange::created()).await?;

        let single = IngestPlan {
            has_cover: false,
            pages: vec![PageSeed {
                order: 0,
                name: seed.name.clone(),
                label: seed.label.clone(),
            }],
        };
        replace_installment_pages(db, &installment.id, &single).await?;

        let refreshed =
            crate::models::installment::get_installment(db, &installment.id.key().to_string())
                .await?
                .unwrap_or(installment);
        created.push(refreshed);
    }

    if !series.is_strip {
        let update = SeriesUpdate {
            is_strip: Some(true),
            ..Default::default()
        };
        crate::models::series::update_series(db, &series.id.key().to_string(), update).await?;
    }

    Ok(created)
}
