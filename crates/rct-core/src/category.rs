//! Data-entry category routing.
//!
//! Each visit has up to one record per category. A category slug from a
//! route resolves through [`CATEGORY_TABLE`] to its record table and form
//! kind; there is no other lookup path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::{BiologicalSample, ClinicalAssessment, Neuroimaging};
use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DataCategory {
    ClinicalFunctional,
    BiologicalSamples,
    Neuroimaging,
}

/// One row of the category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    pub category: DataCategory,
    /// Route segment, e.g. `clinical-functional`.
    pub slug: &'static str,
    /// Display title, e.g. `Clinical Functional`.
    pub title: &'static str,
    /// Backing SQL table.
    pub table: &'static str,
}

pub const CATEGORY_TABLE: [CategoryEntry; 3] = [
    CategoryEntry {
        category: DataCategory::ClinicalFunctional,
        slug: "clinical-functional",
        title: "Clinical Functional",
        table: "clinical_assessments",
    },
    CategoryEntry {
        category: DataCategory::BiologicalSamples,
        slug: "biological-samples",
        title: "Biological Samples",
        table: "biological_samples",
    },
    CategoryEntry {
        category: DataCategory::Neuroimaging,
        slug: "neuroimaging",
        title: "Neuroimaging",
        table: "neuroimaging",
    },
];

impl DataCategory {
    pub const ALL: [Self; 3] = [
        Self::ClinicalFunctional,
        Self::BiologicalSamples,
        Self::Neuroimaging,
    ];

    #[must_use]
    pub const fn entry(self) -> &'static CategoryEntry {
        match self {
            Self::ClinicalFunctional => &CATEGORY_TABLE[0],
            Self::BiologicalSamples => &CATEGORY_TABLE[1],
            Self::Neuroimaging => &CATEGORY_TABLE[2],
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        self.entry().slug
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        self.entry().title
    }

    #[must_use]
    pub const fn table(self) -> &'static str {
        self.entry().table
    }

    /// Resolve a route slug.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownCategory` for any slug not in the table.
    pub fn from_slug(slug: &str) -> Result<Self, CoreError> {
        CATEGORY_TABLE
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.category)
            .ok_or_else(|| CoreError::UnknownCategory(slug.to_string()))
    }
}

impl FromStr for DataCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s)
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A per-visit data-entry record of any category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "category", content = "record", rename_all = "kebab-case")]
pub enum CategoryRecord {
    ClinicalFunctional(ClinicalAssessment),
    BiologicalSamples(BiologicalSample),
    Neuroimaging(Neuroimaging),
}

impl CategoryRecord {
    #[must_use]
    pub const fn category(&self) -> DataCategory {
        match self {
            Self::ClinicalFunctional(_) => DataCategory::ClinicalFunctional,
            Self::BiologicalSamples(_) => DataCategory::BiologicalSamples,
            Self::Neuroimaging(_) => DataCategory::Neuroimaging,
        }
    }

    #[must_use]
    pub const fn visit_id(&self) -> i64 {
        match self {
            Self::ClinicalFunctional(r) => r.visit_id,
            Self::BiologicalSamples(r) => r.visit_id,
            Self::Neuroimaging(r) => r.visit_id,
        }
    }
}
