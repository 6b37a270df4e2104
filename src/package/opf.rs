//! OPF package document generation.

use quick_xml::escape::escape;

use super::Package;

const UNIQUE_ID: &str = "uid";

/// Generate `package.opf` from the package view.
pub fn generate_opf(package: &Package<'_>) -> String {
    let book = package.book;
    let mut opf = String::new();

    opf.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" xml:lang="{}" unique-identifier="{UNIQUE_ID}" prefix="cc: http://creativecommons.org/ns#">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
        escape(book.language.as_str())
    ));

    opf.push_str(&format!(
        "    <dc:identifier id=\"{UNIQUE_ID}\">{}</dc:identifier>\n",
        escape(book.identifier.as_str())
    ));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape(book.language.as_str())
    ));
    opf.push_str(&format!(
        "    <dc:title id=\"title\">{}</dc:title>\n",
        escape(book.title.as_str())
    ));

    // dcterms:modified (required for EPUB3)
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        book.modified()
    ));

    if let Some(ref license) = book.license_url {
        opf.push_str(&format!(
            "    <link rel=\"cc:license\" href=\"{}\"/>\n",
            escape(license.as_str())
        ));
    }

    // Contributors with role refinements
    for (i, contributor) in book.contributors.iter().enumerate() {
        let contrib_id = format!("contrib-{}", i + 1);
        opf.push_str(&format!(
            "    <dc:contributor id=\"{contrib_id}\">{}</dc:contributor>\n",
            escape(contributor.name.as_str())
        ));
        if let Some(ref role) = contributor.role {
            opf.push_str(&format!(
                "    <meta refines=\"#{contrib_id}\" property=\"role\" scheme=\"marc:relators\">{}</meta>\n",
                escape(role.as_str())
            ));
        }
    }

    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    for item in package.manifest() {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"",
            escape(item.id.as_str()),
            escape(item.href.as_str()),
            escape(item.media_type.as_str())
        ));
        if let Some(properties) = item.properties {
            opf.push_str(&format!(" properties=\"{properties}\""));
        }
        opf.push_str("/>\n");
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine>\n");
    for itemref in package.spine() {
        let linear = if itemref.linear { "" } else { " linear=\"no\"" };
        opf.push_str(&format!(
            "    <itemref idref=\"{}\"{linear}/>\n",
            escape(itemref.idref.as_str())
        ));
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}
