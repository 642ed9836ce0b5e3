use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;

use crate::error::{Error, Result};

/// A feed body that has passed a cheap structural scan: the root element is
/// known, the full grammar is not yet interpreted. Parsers dispatch on the
/// root name (and default namespace) without touching the rest of the
/// document.
#[derive(Debug, Clone)]
pub struct Document {
    root: String,
    namespace: Option<String>,
    body: Vec<u8>,
}

impl Document {
    /// Scans the body up to its root element. Fails when the input is not
    /// well-formed XML or has no root element at all; structural problems
    /// deeper in the document are left to the selected parser.
    pub fn scan(body: &[u8]) -> Result<Document> {
        let mut reader = XmlReader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let root = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let mut namespace = None;
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"xmlns" {
                            namespace =
                                Some(String::from_utf8_lossy(&attr.value).to_string());
                        }
                    }
                    return Ok(Document {
                        root,
                        namespace,
                        body: body.to_vec(),
                    });
                }
                Ok(Event::Eof) => {
                    return Err(Error::Malformed("document has no root element".to_string()))
                }
                Err(e) => return Err(Error::Malformed(e.to_string())),
                // Prolog, comments, processing instructions
                Ok(_) => {}
            }
            buf.clear();
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
