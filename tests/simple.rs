use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use tree_select::Selector;

static CALLS: AtomicUsize = AtomicUsize::new(0);

/// The words of a document, doubled by a factor.
static WORDS: LazyLock<Selector<Document, (usize,), (Arc<str>,), usize>> =
    LazyLock::new(|| {
        Selector::new(
            |doc: &Document, _: &(usize,)| (doc.text.clone(),),
            |(text,): &(Arc<str>,), &(factor,): &(usize,)| {
                CALLS.fetch_add(1, Ordering::SeqCst);
                factor * text.split_whitespace().count()
            },
        )
    });

struct Document {
    text: Arc<str>,
    title: Arc<str>,
}

#[test]
fn test_simple() {
    let mut doc = Document { text: "The world is big".into(), title: "World".into() };

    assert_eq!(WORDS.select(&doc, (1,)).unwrap(), 4); // [Miss] The cache is empty.
    assert_eq!(WORDS.select(&doc, (1,)).unwrap(), 4); // [Hit] Nothing changed.
    assert_eq!(WORDS.select(&doc, (2,)).unwrap(), 8); // [Miss] Different factor.
    assert_eq!(WORDS.select(&doc, (1,)).unwrap(), 4); // [Hit] Same factor as initially.

    doc.title = "Earth".into();
    assert_eq!(WORDS.select(&doc, (1,)).unwrap(), 4); // [Hit] The title is not read.

    doc.text = "The world is big".into();
    assert_eq!(WORDS.select(&doc, (1,)).unwrap(), 4); // [Miss] New text, same words.
    assert_eq!(WORDS.select(&doc, (2,)).unwrap(), 8); // [Miss] Stale slot for factor 2.

    assert_eq!(CALLS.load(Ordering::SeqCst), 4);
    assert_eq!(WORDS.len(), 2);
    assert_eq!(&*doc.title, "Earth");
}
