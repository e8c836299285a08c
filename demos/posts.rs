//! Select the posts of a site from a state tree with immutable updates.
//!
//! Run with `cargo run --example posts`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tree_select::Selector;

#[derive(Debug)]
struct Post {
    title: String,
    site: u64,
}

#[derive(Clone, Default)]
struct State {
    posts: Arc<BTreeMap<u64, Arc<Post>>>,
    drafts: Arc<Vec<String>>,
}

impl State {
    /// Add a post, replacing the posts subtree and keeping everything else.
    fn publish(&self, id: u64, site: u64, title: &str) -> Self {
        let mut posts = (*self.posts).clone();
        posts.insert(id, Arc::new(Post { title: title.into(), site }));
        Self { posts: Arc::new(posts), ..self.clone() }
    }
}

fn main() {
    let site_titles = Selector::new(
        |state: &State, _: &(u64,)| (state.posts.clone(),),
        |(posts,): &(Arc<BTreeMap<u64, Arc<Post>>>,), &(site,): &(u64,)| {
            println!("  computing titles for site {site}");
            let titles: Vec<_> = posts
                .values()
                .filter(|post| post.site == site)
                .map(|post| post.title.clone())
                .collect();
            Arc::new(titles)
        },
    );

    let state = State::default().publish(1, 7, "Hello").publish(2, 8, "Elsewhere");

    // [Miss] The cache is empty.
    println!("{:?}", site_titles.select(&state, (7,)));

    // [Hit] The posts are the same.
    println!("{:?}", site_titles.select(&state, (7,)));

    // [Hit] Drafts are not a dependent.
    let mut state = state;
    state.drafts = Arc::new(vec!["Soon".into()]);
    println!("{:?}", site_titles.select(&state, (7,)));

    // [Miss] The posts were replaced.
    let state = state.publish(3, 7, "World");
    println!("{:?}", site_titles.select(&state, (7,)));

    // [Miss] Another site is another slot.
    println!("{:?}", site_titles.select(&state, (8,)));

    println!("{} slots, {} drafts", site_titles.len(), state.drafts.len());
    println!("{:?}", state.posts.get(&1));
}
