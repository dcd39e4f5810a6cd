//! CoNLL-U writer
//!
//!     Writes documents back out with their current ordinals. Enhanced dependency heads are
//!     resolved through the arena at write time, so relocated empty tokens are referenced by
//!     their new ordinal. Coreference is re-encoded from the entity table into `Entity=`; the
//!     tokens themselves are not modified.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::corefud;
use crate::document::{Dep, Document, HeadRef, Token};
use crate::error::Result;

/// Write all documents to `path`, replacing the file.
pub fn save<P: AsRef<Path>>(docs: &[Document], path: P) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    for doc in docs {
        write_document(doc, &mut out)?;
    }
    out.flush()?;
    debug!(path = %path.as_ref().display(), documents = docs.len(), "saved CoNLL-U");
    Ok(())
}

/// Serialize one document, starting with its `# newdoc` line.
pub fn write_document<W: Write>(doc: &Document, out: &mut W) -> Result<()> {
    let entities = corefud::encode_entities(doc);
    writeln!(out, "# newdoc id = {}", doc.id)?;
    writeln!(out, "# global.Entity = {}", doc.entity_layout.join("-"))?;

    let mut tokens = doc.tokens().peekable();
    for (index, sentence) in doc.sentences.iter().enumerate() {
        for comment in &sentence.comments {
            writeln!(out, "{comment}")?;
        }
        while let Some((id, token)) = tokens.next_if(|(_, t)| t.sentence == index) {
            if !token.is_empty() {
                for (_, line) in sentence.multiword.iter().filter(|(w, _)| *w == token.ord.word) {
                    writeln!(out, "{line}")?;
                }
            }
            let mut misc = token.misc.clone();
            if let Some(value) = entities.get(&id) {
                misc.set("Entity", value.as_str());
            }
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                token.ord,
                token.form,
                token.lemma,
                token.upos,
                token.xpos,
                token.feats,
                token.head.map_or_else(|| "_".to_string(), |h| h.to_string()),
                token.deprel,
                format_deps(doc, token),
                misc
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Serialize documents into a string.
pub fn to_string(docs: &[Document]) -> Result<String> {
    let mut out = Vec::new();
    for doc in docs {
        write_document(doc, &mut out)?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn format_deps(doc: &Document, token: &Token) -> String {
    if token.deps.is_empty() {
        return "_".to_string();
    }
    token
        .deps
        .iter()
        .filter_map(|Dep { head, deprel }| match head {
            HeadRef::Root => Some(format!("0:{deprel}")),
            HeadRef::Token(id) => doc.get(*id).map(|h| format!("{}:{deprel}", h.ord)),
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_str;

    const SOURCE: &str = "\
# newdoc id = d1
# global.Entity = eid-etype-head-other
# sent_id = 1
1-2\tdon't\t_\t_\t_\t_\t_\t_\t_\t_
1\tdo\tdo\tAUX\t_\t_\t0\troot\t0:root\tEntity=(e1-event-1
2\tn't\tnot\tPART\t_\t_\t1\tadvmod\t1:advmod\tEntity=e1)
2.1\t_\t_\t_\t_\t_\t_\t_\t1:nsubj\tEntity=(e2-person-1)

";

    #[test]
    fn round_trips_verbatim() {
        let docs = parse_str(SOURCE).unwrap();
        assert_eq!(to_string(&docs).unwrap(), SOURCE);
    }

    #[test]
    fn relocated_empty_tokens_are_referenced_by_new_ordinal() {
        let mut docs = parse_str(SOURCE).unwrap();
        let doc = &mut docs[0];
        let empty = doc.empty_ids()[0];
        doc.shift_empty(empty);
        let out = to_string(&docs).unwrap();
        assert!(out.contains("1.1\t_\t_\t_\t_\t_\t_\t_\t1:nsubj\tEntity=(e2-person-1)\n2\tn't"));
    }
}
