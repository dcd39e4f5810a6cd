//! Cluster JSON format
//!
//!     The file is an array with one record per document:
//!
//!         {
//!           "doc_id": "wsj-1",
//!           "tokens": ["John", "said", "he", "##", "left"],
//!           "clusters_token_offsets": [[[0, 0], [2, 2]]],
//!           "clusters_text_mentions": [["John", "he"]]
//!         }
//!
//!     Offsets index `tokens`. Mention texts are for people reading the file and are not
//!     consulted when decoding. Blind records carry `null` for both cluster lists.

use coref_conllu::Document;
use serde::{Deserialize, Serialize};

use crate::cluster_codec::encode_clusters;
use crate::error::FormatError;
use crate::format::{Annotation, Format, ReferenceDocument};
use crate::options::EncodeOptions;
use crate::render::Rendering;

/// One document as stored in the JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRecord {
    pub doc_id: String,
    pub tokens: Vec<String>,
    #[serde(default)]
    pub clusters_token_offsets: Option<Vec<Vec<[usize; 2]>>>,
    #[serde(default)]
    pub clusters_text_mentions: Option<Vec<Vec<String>>>,
}

impl JsonRecord {
    pub fn from_document(doc: &Document, rendering: &Rendering, options: &EncodeOptions) -> Self {
        let (offsets, texts) = if options.blind {
            (None, None)
        } else {
            let clusters = encode_clusters(doc, rendering, options.empty_node_form);
            (Some(clusters.offsets), Some(clusters.texts))
        };
        JsonRecord {
            doc_id: doc.id.clone(),
            tokens: rendering.forms(doc, options.empty_node_form),
            clusters_token_offsets: offsets,
            clusters_text_mentions: texts,
        }
    }
}

impl From<JsonRecord> for ReferenceDocument {
    fn from(record: JsonRecord) -> Self {
        ReferenceDocument {
            doc_id: Some(record.doc_id),
            words: record.tokens,
            annotation: Annotation::Clusters(record.clusters_token_offsets),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Entity clusters as token offsets"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<ReferenceDocument>, FormatError> {
        let records: Vec<JsonRecord> = serde_json::from_str(source)?;
        Ok(records.into_iter().map(ReferenceDocument::from).collect())
    }

    /// The record pretty-printed and indented one level, as an element of the array.
    fn serialize(
        &self,
        doc: &Document,
        rendering: &Rendering,
        options: &EncodeOptions,
    ) -> Result<String, FormatError> {
        let record = JsonRecord::from_document(doc, rendering, options);
        let pretty = serde_json::to_string_pretty(&record)?;
        Ok(pretty
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn begin(&self) -> &str {
        "[\n"
    }

    fn separator(&self) -> &str {
        ",\n"
    }

    fn end(&self) -> &str {
        "\n]\n"
    }
}
