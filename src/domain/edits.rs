//! Edit overlay: human overrides of generated documentation, merged into a decoded archive before
//! re-encoding. Storing the edits is the caller's business.

use serde::{Deserialize, Serialize};

use crate::domain::archive::{Archive, ArchiveContent, CurrentContent};
use crate::domain::legacy::{LegacyContent, LegacyParam};

/// One user's override for one symbol. Absent or empty fields leave the generated text in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolEdit {
    /// Node id (current shape) or symbol id (legacy shape)
    pub symbol_id: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub complexity_notes: Option<String>,
    #[serde(default)]
    pub usage_hints: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<Vec<LegacyParam>>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub notes: Option<Vec<String>>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReport {
    /// Edits that touched at least one record
    pub applied: usize,
    /// Symbol ids of edits that matched nothing
    pub unmatched: Vec<String>,
}

/// Merges `edits` into the archive's documentation. Members other than the documentation (and, for
/// legacy archives, the symbol list) are not touched.
pub fn apply_edits(archive: &mut Archive, edits: &[SymbolEdit]) -> EditReport {
    let mut report = EditReport::default();
    for edit in edits {
        let matched = match &mut archive.content {
            ArchiveContent::Current(current) => apply_current(current, edit),
            ArchiveContent::Legacy(legacy) => apply_legacy(legacy, edit),
        };
        if matched {
            report.applied += 1;
        } else {
            report.unmatched.push(edit.symbol_id.clone());
        }
    }
    report
}

fn apply_current(current: &mut CurrentContent, edit: &SymbolEdit) -> bool {
    let Some(doc) = current
        .documentation
        .symbol_summaries
        .get_mut(&edit.symbol_id)
    else {
        return false;
    };

    overwrite(&mut doc.purpose, text(&edit.purpose).or(text(&edit.summary)));
    overwrite(
        &mut doc.explanation,
        text(&edit.explanation).or(text(&edit.description)),
    );
    if let Some(notes) = text(&edit.complexity_notes) {
        doc.complexity_notes = Some(notes.to_string());
    }
    if let Some(hints) = text(&edit.usage_hints) {
        doc.usage_hints = Some(hints.to_string());
    }
    true
}

fn apply_legacy(legacy: &mut LegacyContent, edit: &SymbolEdit) -> bool {
    let mut matched = false;

    for symbol in legacy.symbols.iter_mut().filter(|s| s.id == edit.symbol_id) {
        matched = true;
        if let Some(signature) = text(&edit.signature) {
            symbol.signature = Some(signature.to_string());
        }
        overwrite(&mut symbol.kind, text(&edit.kind));
    }

    for doc in legacy
        .docs
        .values_mut()
        .filter(|d| d.symbol == edit.symbol_id)
    {
        matched = true;
        overwrite(&mut doc.summary, text(&edit.summary).or(text(&edit.purpose)));
        overwrite(
            &mut doc.description,
            text(&edit.description).or(text(&edit.explanation)),
        );
        if let Some(parameters) = &edit.parameters {
            doc.parameters = parameters.clone();
        }
        overwrite(&mut doc.returns, text(&edit.returns));
        overwrite(&mut doc.example, text(&edit.example));
        if let Some(notes) = &edit.notes {
            doc.notes = notes.clone();
        }
    }

    matched
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn overwrite(slot: &mut String, value: Option<&str>) {
    if let Some(value) = value {
        *slot = value.to_string();
    }
}
