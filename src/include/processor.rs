//! The include pass.
//!
//! ```text
//! query_all ──► [target₀, target₁, …]          (snapshot, taken once)
//!                  │        │
//!               resolve  resolve
//!                  │        │
//!                fetch    fetch                 (concurrent, one thread)
//!                  │        │
//!            replace / render_failure           (as each fetch settles)
//!                  └────┬───┘
//!                    barrier                    (every target terminal)
//! ```

use futures::stream::{FuturesUnordered, StreamExt};

use super::error::FragmentError;
use super::fetch::FetchFragment;
use super::root::SiteRoot;
use super::target::IncludeTarget;

/// Placeholder attribute.
pub const DEFAULT_ATTRIBUTE: &str = "data-include";

/// Class of the inline diagnostic rendered into failed placeholders.
pub const DEFAULT_ERROR_CLASS: &str = "include-error";

/// Tree operations the include pass needs.
///
/// Targets own disjoint nodes, so the pass never needs more than one
/// mutation in flight.
pub trait IncludeTree {
    type Node: Copy;

    /// Point-in-time snapshot of elements carrying `attribute`.
    fn query_all(&self, attribute: &str) -> Vec<Self::Node>;

    /// Decoded attribute value.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Replace `node` itself with the nodes parsed from `markup`.
    fn replace_with_fragment(&mut self, node: Self::Node, markup: &str);

    /// Replace the content of `node` with one diagnostic element.
    fn render_failure(&mut self, node: Self::Node, class: &str, message: &str);
}

/// Everything a pass needs besides the tree and the fetcher.
#[derive(Debug, Clone)]
pub struct IncludeOptions {
    pub root: SiteRoot,
    pub attribute: String,
    pub error_class: String,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self {
            root: SiteRoot::default(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            error_class: DEFAULT_ERROR_CLASS.to_string(),
        }
    }
}

/// Text of the inline diagnostic for a failed include.
pub fn failure_message(err: &FragmentError) -> String {
    format!("Include failed: {}", err.url())
}

/// Snapshot the placeholders of `tree` and resolve their URLs.
///
/// Elements whose attribute value is empty are skipped.
pub fn discover<T: IncludeTree>(tree: &T, options: &IncludeOptions) -> Vec<IncludeTarget<T::Node>> {
    tree.query_all(&options.attribute)
        .into_iter()
        .filter_map(|node| {
            let path = tree.attribute(node, &options.attribute)?;
            (!path.is_empty()).then(|| IncludeTarget::new(node, path, options.root.as_str()))
        })
        .collect()
}

/// Run one include pass over `tree`.
///
/// Returns once every placeholder found at the start has been replaced or
/// error-rendered. Failures stay inside the tree; nothing is reported back.
pub async fn process_includes<T, F>(tree: &mut T, fetcher: &F, options: &IncludeOptions)
where
    T: IncludeTree,
    F: FetchFragment,
{
    drive(tree, fetcher, options).await;
}

async fn drive<T, F>(
    tree: &mut T,
    fetcher: &F,
    options: &IncludeOptions,
) -> Vec<IncludeTarget<T::Node>>
where
    T: IncludeTree,
    F: FetchFragment,
{
    let mut targets = discover(tree, options);

    let mut pending: FuturesUnordered<_> = targets
        .iter_mut()
        .enumerate()
        .map(|(index, target)| {
            target.begin_fetch();
            let url = target.url.clone();
            async move { (index, fetcher.fetch(&url).await) }
        })
        .collect();

    while let Some((index, result)) = pending.next().await {
        let target = &mut targets[index];
        match &result {
            Ok(markup) => tree.replace_with_fragment(target.node, markup),
            Err(err) => {
                tree.render_failure(target.node, &options.error_class, &failure_message(err))
            }
        }
        target.finish(&result);
    }

    debug_assert!(targets.iter().all(|t| t.state().is_terminal()));
    targets
}
