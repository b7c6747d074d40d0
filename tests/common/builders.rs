//! Test data builders for entity construction.
//!
//! Provides fluent API for creating test entities with sensible defaults.

use surrealdb::RecordId;

use longbox::models::{InstallmentCreate, SeriesCreate};
use longbox::utils::numeral::IssueNumber;

/// Builder for creating test series.
pub struct SeriesBuilder {
    name: String,
    slug: String,
    installment_label: String,
    is_strip: bool,
}

impl SeriesBuilder {
    /// Create a new series builder with the given name; the slug defaults to
    /// the upper-cased name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        Self {
            name,
            slug,
            installment_label: "issue".to_string(),
            is_strip: false,
        }
    }

    /// Override the slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Mark the series as a strip.
    pub fn strip(mut self) -> Self {
        self.is_strip = true;
        self
    }

    /// Build the SeriesCreate struct.
    pub fn build(self) -> SeriesCreate {
        let mut data = SeriesCreate::new(self.name, self.slug);
        data.installment_label = self.installment_label;
        data.is_strip = self.is_strip;
        data
    }
}

/// Builder for creating test installments.
pub struct InstallmentBuilder {
    series: RecordId,
    number: Option<IssueNumber>,
    title: Option<String>,
}

impl InstallmentBuilder {
    /// Create a new installment builder for the given series.
    pub fn new(series: RecordId) -> Self {
        Self {
            series,
            number: None,
            title: None,
        }
    }

    /// Set a whole-part number.
    pub fn number(mut self, whole: i64) -> Self {
        self.number = Some(IssueNumber::pack(whole, 0).expect("valid test number"));
        self
    }

    /// Set a two-part number.
    pub fn number_parts(mut self, whole: i64, second: i64) -> Self {
        self.number = Some(IssueNumber::pack(whole, second).expect("valid test number"));
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the InstallmentCreate struct.
    pub fn build(self) -> InstallmentCreate {
        let mut data = InstallmentCreate::new(self.series);
        data.number = self.number;
        data.title = self.title;
        data
    }
}
