//! Property tests over loading and package projection.

use proptest::prelude::*;

use html_epub::{Book, ContentProperties, EpubBuilder, Error, HtmlItem, ResourceRoot, ResourceKind};

fn builder() -> EpubBuilder {
    let root = ResourceRoot::parse("file:///books/data/").unwrap();
    EpubBuilder::new(Book::new("com.example/1", "Test Book"), root)
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(String::from),
        Just("..".to_string()),
        Just(".".to_string()),
        Just("data".to_string()),
        Just("..%2f..".to_string()),
        Just("..%5C".to_string()),
        Just("%2F".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_references_stay_inside_root(
        segments in prop::collection::vec(segment(), 1..6),
        leading_slash in any::<bool>(),
        is_style in any::<bool>(),
    ) {
        let mut reference = segments.join("/");
        reference.push_str(if is_style { ".css" } else { ".png" });
        if leading_slash {
            reference.insert(0, '/');
        }

        let html = if is_style {
            format!("<head><link rel=\"stylesheet\" href=\"{reference}\"></head><body></body>")
        } else {
            format!("<p><img src=\"{reference}\"></p>")
        };

        let mut builder = builder();
        let root = builder.root().clone();
        let expected_inside = root.contains(&root.resolve(&reference).unwrap());

        match builder.load(vec![HtmlItem::new(html.into_bytes())]) {
            Ok(()) => {
                prop_assert!(expected_inside);
                prop_assert_eq!(builder.resources().len(), 1);
                let resource = &builder.resources()[0];
                prop_assert!(resource.source.as_str().starts_with(root.as_str()));
                let decoded_escape = ["%2f", "%5c"]
                    .iter()
                    .any(|sep| resource.source.path().to_ascii_lowercase().contains(sep));
                prop_assert!(!decoded_escape);
                let dir = match resource.kind {
                    ResourceKind::Image => "images/",
                    ResourceKind::Stylesheet => "styles/",
                };
                prop_assert!(resource.target.starts_with(dir));
            }
            Err(Error::SecurityViolation { .. }) => {
                prop_assert!(!expected_inside);
                prop_assert!(builder.resources().is_empty());
                prop_assert!(builder.documents().is_empty());
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn prop_spine_follows_input_order(
        headings in prop::collection::vec("[A-Za-z][A-Za-z ]{0,15}", 1..8),
    ) {
        let items: Vec<_> = headings
            .iter()
            .map(|h| HtmlItem::new(format!("<h1>{h}</h1>").into_bytes()))
            .collect();

        let mut builder = builder();
        builder.load(items).unwrap();
        let documents = builder.documents();
        prop_assert_eq!(documents.len(), headings.len());

        let spine = builder.package().spine();
        prop_assert_eq!(spine.len(), documents.len() + 1);
        prop_assert_eq!(spine[0].idref.as_str(), "toc");
        for (i, doc) in documents.iter().enumerate() {
            prop_assert_eq!(&spine[i + 1].idref, &doc.id);
            prop_assert_eq!(doc.id.clone(), format!("chapter-{}", i + 1));
            let collapsed = headings[i].split_whitespace().collect::<Vec<_>>().join(" ");
            prop_assert_eq!(&doc.title, &collapsed);
        }
    }

    #[test]
    fn prop_property_detection_is_idempotent(
        tags in prop::collection::vec(
            prop::sample::select(vec!["p", "script", "svg", "math", "input", "em", "button", "div"]),
            0..6,
        ),
    ) {
        let body: String = tags.iter().map(|t| format!("<{t}></{t}>")).collect();
        let dom = builder().parse(format!("<body>{body}</body>").as_bytes()).unwrap();

        let first = ContentProperties::detect(&dom);
        let second = ContentProperties::detect(&dom);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.svg, tags.contains(&"svg"));
        prop_assert_eq!(first.mathml, tags.contains(&"math"));
    }

    #[test]
    fn prop_parse_titles_with_book_title(source_title in "[A-Za-z0-9 ]{0,20}") {
        let html = format!("<html><head><title>{source_title}</title></head><body><p>x</p></body></html>");
        let dom = builder().parse(html.as_bytes()).unwrap();

        let titles = dom.find_all_by_tag("title");
        prop_assert_eq!(titles.len(), 1);
        prop_assert_eq!(dom.text_of(titles[0]), "Test Book");

        let html_el = dom.root_element().unwrap();
        prop_assert_eq!(dom.get_attr(html_el, "xmlns"), Some("http://www.w3.org/1999/xhtml"));
    }
}
