//! Navigation document generation.

use quick_xml::escape::escape;

use crate::model::{Book, DocumentRecord};

/// Generate `toc.xhtml`: one link per document, in reading order.
///
/// Link targets are document paths relative to the navigation document,
/// which sits next to the package document.
pub fn generate_nav(book: &Book, documents: &[DocumentRecord]) -> String {
    let mut nav = String::new();

    nav.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
  <head>
    <meta charset="utf-8"/>
    <title>{title}</title>
  </head>
  <body>
    <header>
      <h1>Contents</h1>
    </header>
    <nav epub:type="toc">
      <ol>
"#,
        lang = escape(book.language.as_str()),
        title = escape(book.title.as_str()),
    ));

    for doc in documents {
        nav.push_str(&format!(
            "        <li>\n          <a href=\"{}\">{}</a>\n        </li>\n",
            escape(doc.target.as_str()),
            escape(doc.title.as_str())
        ));
    }

    nav.push_str("      </ol>\n    </nav>\n  </body>\n</html>\n");
    nav
}
