//! Transcoding drivers
//!
//!     `encode` streams graph documents through a format; `decode` applies a format's
//!     reference documents to a skeleton graph and streams the result as CoNLL-U. The four
//!     file pipelines are thin wrappers over the two.
//!
//!     Output is written record by record and flushed after each document. A fatal error
//!     stops the run at the failing document: records already written stay in the output
//!     and the error is returned to the caller.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use coref_conllu::{write_document, Document};
use tracing::{debug, info, warn};

use crate::align::align;
use crate::cluster_codec::decode_clusters;
use crate::error::{AlignmentError, FormatError, Result};
use crate::format::{Annotation, Format};
use crate::formats::{JsonFormat, TextFormat};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::render::Rendering;
use crate::span_codec::decode_markers;

/// Write every document as one record of `format`. Returns the number of records.
pub fn encode<W: Write>(
    docs: &mut [Document],
    format: &dyn Format,
    options: &EncodeOptions,
    out: &mut W,
) -> Result<usize> {
    if !format.supports_serialization() {
        return Err(FormatError::NotSupported(format!("{} cannot be written", format.name())).into());
    }
    out.write_all(format.begin().as_bytes())?;
    for (index, doc) in docs.iter_mut().enumerate() {
        let rendering = Rendering::prepare(doc, options.zero_mentions);
        let record = format.serialize(doc, &rendering, options)?;
        if index > 0 {
            out.write_all(format.separator().as_bytes())?;
        }
        out.write_all(record.as_bytes())?;
        out.flush()?;
        debug!(doc = %doc.id, tokens = rendering.len(), format = format.name(), "encoded document");
    }
    out.write_all(format.end().as_bytes())?;
    out.flush()?;
    Ok(docs.len())
}

/// Apply the coreference in `source` to `skeleton` and write the result as CoNLL-U.
///
/// The skeleton's own coreference is discarded. Returns the number of documents written.
pub fn decode<W: Write>(
    source: &str,
    mut skeleton: Vec<Document>,
    format: &dyn Format,
    options: &DecodeOptions,
    out: &mut W,
) -> Result<usize> {
    if !format.supports_parsing() {
        return Err(FormatError::NotSupported(format!("{} cannot be read", format.name())).into());
    }
    let references = format.parse(source)?;
    if references.len() != skeleton.len() {
        return Err(AlignmentError::DocumentCount {
            expected: skeleton.len(),
            found: references.len(),
        }
        .into());
    }

    for (reference, doc) in references.iter().zip(skeleton.iter_mut()) {
        if let Some(id) = reference.doc_id.as_deref().filter(|id| *id != doc.id) {
            warn!(doc = %doc.id, reference = id, "document ids differ, matching by position");
        }
        doc.clear_coref();
        let aligned = align(doc, &reference.words, options.use_gold_empty_nodes)?;
        match &reference.annotation {
            Annotation::Markers(markers) => decode_markers(doc, &aligned, markers)?,
            Annotation::Clusters(Some(clusters)) => decode_clusters(doc, &aligned, clusters)?,
            Annotation::Clusters(None) => {}
        }
        write_document(doc, out)?;
        out.flush()?;
        debug!(doc = %doc.id, entities = doc.entities().len(), "decoded document");
    }
    Ok(skeleton.len())
}

/// `input` with its extension replaced by `extension`.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

fn create(output: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(output)?))
}

/// CoNLL-U → marked-up text.
pub fn conllu_to_text(input: &Path, output: &Path, options: &EncodeOptions) -> Result<usize> {
    let mut docs = coref_conllu::load(input)?;
    let format = TextFormat::new(options.marker_style);
    let count = encode(&mut docs, &format, options, &mut create(output)?)?;
    info!(documents = count, output = %output.display(), "wrote text");
    Ok(count)
}

/// CoNLL-U → cluster JSON.
pub fn conllu_to_json(input: &Path, output: &Path, options: &EncodeOptions) -> Result<usize> {
    let mut docs = coref_conllu::load(input)?;
    let count = encode(&mut docs, &JsonFormat, options, &mut create(output)?)?;
    info!(documents = count, output = %output.display(), "wrote JSON");
    Ok(count)
}

/// Marked-up text + skeleton CoNLL-U → CoNLL-U.
pub fn text_to_conllu(
    input: &Path,
    skeleton: &Path,
    output: &Path,
    format: &TextFormat,
    options: &DecodeOptions,
) -> Result<usize> {
    let source = fs::read_to_string(input)?;
    let docs = coref_conllu::load(skeleton)?;
    let count = decode(&source, docs, format, options, &mut create(output)?)?;
    info!(documents = count, style = ?format.style(), output = %output.display(), "wrote CoNLL-U");
    Ok(count)
}

/// Cluster JSON + skeleton CoNLL-U → CoNLL-U.
pub fn json_to_conllu(
    input: &Path,
    skeleton: &Path,
    output: &Path,
    options: &DecodeOptions,
) -> Result<usize> {
    let source = fs::read_to_string(input)?;
    let docs = coref_conllu::load(skeleton)?;
    let count = decode(&source, docs, &JsonFormat, options, &mut create(output)?)?;
    info!(documents = count, output = %output.display(), "wrote CoNLL-U");
    Ok(count)
}
