//! CoNLL-U reader
//!
//!     Splits the input into documents at `# newdoc` comments (the whole file is one document
//!     when there are none), builds each document's token arena and decodes its `Entity=`
//!     annotations into entities and mentions.
//!
//!     `# newdoc` and `# global.Entity` are consumed here. All other comments stay with their
//!     sentence, and multiword token lines (`3-4`) are kept verbatim.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::corefud;
use crate::document::{Dep, Document, HeadRef, Misc, Sentence, Token, TokenId};
use crate::error::{ConlluError, Result};
use crate::ordinal::Ordinal;

/// Load every document of a CoNLL-U file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let source = fs::read_to_string(path.as_ref())?;
    let docs = parse_str(&source)?;
    debug!(path = %path.as_ref().display(), documents = docs.len(), "loaded CoNLL-U");
    Ok(docs)
}

/// Parse CoNLL-U source into documents.
pub fn parse_str(source: &str) -> Result<Vec<Document>> {
    let mut reader = Reader::default();
    for (index, line) in source.lines().enumerate() {
        reader.line(index + 1, line.trim_end_matches('\r'))?;
    }
    reader.finish()
}

struct Row {
    line: usize,
    columns: Vec<String>,
}

#[derive(Default)]
struct Reader {
    docs: Vec<Document>,
    current: Option<Document>,
    comments: Vec<String>,
    rows: Vec<Row>,
}

impl Reader {
    fn line(&mut self, number: usize, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return self.end_sentence();
        }
        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if let Some(rest) = comment.strip_prefix("newdoc") {
                self.end_sentence()?;
                self.end_document()?;
                let id = rest
                    .trim()
                    .strip_prefix("id")
                    .and_then(|r| r.trim().strip_prefix('='))
                    .map(|r| r.trim().to_string());
                self.current = Some(Document::new(id.unwrap_or_default()));
            } else if let Some(rest) = comment.strip_prefix("global.Entity") {
                let layout = rest.trim().trim_start_matches('=').trim();
                self.document().entity_layout = layout.split('-').map(str::to_string).collect();
            } else {
                self.comments.push(line.to_string());
            }
            return Ok(());
        }
        let columns: Vec<String> = line.split('\t').map(str::to_string).collect();
        if columns.len() != 10 {
            return Err(ConlluError::parse(
                number,
                format!("expected 10 tab-separated columns, found {}", columns.len()),
            ));
        }
        self.rows.push(Row {
            line: number,
            columns,
        });
        Ok(())
    }

    fn document(&mut self) -> &mut Document {
        self.current.get_or_insert_with(|| Document::new(String::new()))
    }

    fn end_sentence(&mut self) -> Result<()> {
        // pending comments wait for the tokens of their sentence
        if self.rows.is_empty() {
            return Ok(());
        }
        let rows = std::mem::take(&mut self.rows);
        let comments = std::mem::take(&mut self.comments);
        let doc = self.document();
        let sentence = doc.sentences.len();
        doc.sentences.push(Sentence {
            comments,
            multiword: Vec::new(),
        });

        let mut by_ord: HashMap<Ordinal, TokenId> = HashMap::new();
        let mut pending_deps = Vec::new();
        for row in rows {
            let c = &row.columns;
            if let Some((first, _)) = c[0].split_once('-') {
                let first = first
                    .parse()
                    .map_err(|_| ConlluError::parse(row.line, format!("bad range '{}'", c[0])))?;
                let line = c.join("\t");
                doc.sentences[sentence].multiword.push((first, line));
                continue;
            }
            let ord: Ordinal = c[0]
                .parse()
                .map_err(|e| ConlluError::parse(row.line, format!("{e}")))?;
            let head = match c[6].as_str() {
                "_" => None,
                h => Some(
                    h.parse()
                        .map_err(|_| ConlluError::parse(row.line, format!("bad head '{h}'")))?,
                ),
            };
            let id = doc.push_token(Token {
                sentence,
                ord,
                form: c[1].clone(),
                lemma: c[2].clone(),
                upos: c[3].clone(),
                xpos: c[4].clone(),
                feats: c[5].clone(),
                head,
                deprel: c[7].clone(),
                deps: Vec::new(),
                misc: Misc::parse(&c[9]),
            });
            if by_ord.insert(ord, id).is_some() {
                return Err(ConlluError::parse(row.line, format!("duplicate token id {ord}")));
            }
            pending_deps.push((row.line, id, c[8].clone()));
        }

        for (line, id, column) in pending_deps {
            let deps = parse_deps(&column, &by_ord).map_err(|m| ConlluError::parse(line, m))?;
            if let Some(token) = doc.get_mut(id) {
                token.deps = deps;
            }
        }
        doc.reorder();
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        let Some(mut doc) = self.current.take() else {
            return Ok(());
        };
        if doc.sentences.is_empty() {
            return Ok(());
        }
        if doc.id.is_empty() {
            doc.id = format!("doc{}", self.docs.len() + 1);
        }
        corefud::decode_entities(&mut doc)?;
        self.docs.push(doc);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Document>> {
        self.end_sentence()?;
        self.end_document()?;
        Ok(self.docs)
    }
}

fn parse_deps(
    column: &str,
    by_ord: &HashMap<Ordinal, TokenId>,
) -> std::result::Result<Vec<Dep>, String> {
    if column == "_" {
        return Ok(Vec::new());
    }
    column
        .split('|')
        .map(|item| {
            let (head, deprel) = item
                .split_once(':')
                .ok_or_else(|| format!("bad dependency '{item}'"))?;
            let head = match head {
                "0" => HeadRef::Root,
                h => {
                    let ord: Ordinal = h.parse().map_err(|e| format!("{e}"))?;
                    let id = by_ord
                        .get(&ord)
                        .ok_or_else(|| format!("dependency head {ord} is not in the sentence"))?;
                    HeadRef::Token(*id)
                }
            };
            Ok(Dep {
                head,
                deprel: deprel.to_string(),
            })
        })
        .collect()
}
