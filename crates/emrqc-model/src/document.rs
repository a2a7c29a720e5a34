use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known document type identifiers used by the rule catalog.
pub mod document_types {
    pub const ADMISSION_RECORD: &str = "admission_record";
    pub const PROGRESS_NOTE: &str = "progress_note";
    pub const DISCHARGE_SUMMARY: &str = "discharge_summary";
}

/// Well-known section names.
pub mod sections {
    pub const CHIEF_COMPLAINT: &str = "chief_complaint";
    pub const PRESENT_ILLNESS: &str = "present_illness";
    pub const PAST_HISTORY: &str = "past_history";
    pub const PHYSICAL_EXAM: &str = "physical_exam";
    pub const AUXILIARY_EXAM: &str = "auxiliary_exam";
    pub const DIAGNOSIS: &str = "diagnosis";
    pub const TREATMENT_PLAN: &str = "treatment_plan";
}

/// A segmented medical-record document as supplied by the host system.
///
/// Section segmentation happens upstream; the pipeline only ever sees the
/// already-split section texts keyed by section name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub document_type: String,
    pub sections: BTreeMap<String, String>,
}

impl Document {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            sections: BTreeMap::new(),
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.sections.insert(name.into(), text.into());
        self
    }

    /// Text of a section, or `None` when the section was not supplied.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }
}
