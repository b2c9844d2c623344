mod sink;

use crate::dom::Document;
use anyhow::{Context as _, Result};
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use log::debug;
use std::io::Read;

pub use sink::{DocumentSink, SinkHandle};

impl Document {
    /// Parse an HTML document with html5ever's tree builder.
    ///
    /// HTML parsing never fails: malformed markup is recovered the way browsers do.
    pub fn parse(html: &str) -> Self {
        let doc = parse_document(DocumentSink::default(), ParseOpts::default()).one(html);
        debug!("Parsed document with {} elements", doc.elements().len());
        doc
    }

    /// Parse UTF-8 HTML from a reader.
    ///
    /// # Errors
    /// Returns an error if reading from `reader` fails.
    pub fn parse_reader<R: Read>(mut reader: R) -> Result<Self> {
        let doc = parse_document(DocumentSink::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut reader)
            .context("failed to read HTML input")?;
        debug!("Parsed document with {} elements", doc.elements().len());
        Ok(doc)
    }
}
