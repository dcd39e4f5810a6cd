//! Entities to token-offset clusters and back
//!
//!     A cluster lists the mentions of one entity as inclusive `[start, end]` positions in
//!     the rendered token sequence, alongside the rendered text of each mention. Clusters
//!     carry no entity ids, so decoding names entities `e1, e2, …` in cluster order.

use coref_conllu::{Document, TokenId};

use crate::error::{Result, TranscodeError};
use crate::render::Rendering;

/// Offset clusters plus the parallel mention texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clusters {
    pub offsets: Vec<Vec<[usize; 2]>>,
    pub texts: Vec<Vec<String>>,
}

/// One cluster per entity with at least one rendered mention.
pub fn encode_clusters(doc: &Document, rendering: &Rendering, empty_node_form: bool) -> Clusters {
    let forms = rendering.forms(doc, empty_node_form);
    let mut clusters = Clusters::default();
    for entity in doc.entities() {
        let (offsets, texts): (Vec<[usize; 2]>, Vec<String>) = entity
            .mentions
            .iter()
            .filter_map(|mention| rendering.mention_range(doc, mention))
            .map(|(start, end)| ([start, end], forms[start..=end].join(" ")))
            .unzip();
        if !offsets.is_empty() {
            clusters.offsets.push(offsets);
            clusters.texts.push(texts);
        }
    }
    clusters
}

/// Create one entity per cluster and one mention per offset pair.
///
/// Every pair is checked before anything is created; a pair outside the aligned tokens
/// fails the whole document.
pub fn decode_clusters(
    doc: &mut Document,
    aligned: &[TokenId],
    clusters: &[Vec<[usize; 2]>],
) -> Result<()> {
    if let Some([start, end]) = clusters
        .iter()
        .flatten()
        .find(|[start, end]| start > end || *end >= aligned.len())
    {
        return Err(TranscodeError::InvalidOffsets {
            doc: doc.id.clone(),
            start: *start,
            end: *end,
            tokens: aligned.len(),
        });
    }
    for (index, cluster) in clusters.iter().enumerate() {
        let entity = doc.create_entity(&format!("e{}", index + 1))?;
        for [start, end] in cluster {
            doc.create_mention(entity, &aligned[*start..=*end])?;
        }
    }
    Ok(())
}
