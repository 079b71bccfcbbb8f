//! Page lifecycle contract
//!
//! Every page managed by the router implements [`Page`]. The optional hooks
//! have no-op defaults so the router can call them unconditionally.

pub mod content;

pub use content::{ContentNode, PageContent};

use crate::error::PageResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Trait for all pages
#[async_trait]
pub trait Page: Send + Sync {
    /// Produce the content to install into the page container.
    ///
    /// Must be safe to call repeatedly when the instance is reused from cache.
    fn render(&self) -> PageResult<PageContent>;

    /// Populate the page after a fresh render
    async fn init(&mut self) -> PageResult<()> {
        Ok(())
    }

    /// Called instead of `init` when a cached instance is reused
    async fn reinit(&mut self) -> PageResult<()> {
        self.init().await
    }

    /// Release timers and any resources opened by the page
    async fn destroy(&mut self) -> PageResult<()> {
        Ok(())
    }
}

/// Factory trait for creating pages
pub trait PageFactory: Send + Sync {
    /// Create a new instance of the page
    fn create(&self) -> PageResult<Box<dyn Page>>;
}

impl<F> PageFactory for F
where
    F: Fn() -> PageResult<Box<dyn Page>> + Send + Sync,
{
    fn create(&self) -> PageResult<Box<dyn Page>> {
        self()
    }
}

/// Build a factory from an infallible constructor
pub fn factory_fn<P, F>(constructor: F) -> Arc<dyn PageFactory>
where
    P: Page + 'static,
    F: Fn() -> P + Send + Sync + 'static,
{
    Arc::new(move || -> PageResult<Box<dyn Page>> { Ok(Box::new(constructor())) })
}

/// Shared handle to a live page instance.
///
/// Clones refer to the same instance; use [`PageHandle::ptr_eq`] to compare
/// identity.
#[derive(Clone)]
pub struct PageHandle {
    id: Uuid,
    page: Arc<Mutex<Box<dyn Page>>>,
}

impl PageHandle {
    pub fn new(page: Box<dyn Page>) -> Self {
        Self {
            id: Uuid::new_v4(),
            page: Arc::new(Mutex::new(page)),
        }
    }

    /// Unique id of the wrapped instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether both handles refer to the same instance
    pub fn ptr_eq(&self, other: &PageHandle) -> bool {
        Arc::ptr_eq(&self.page, &other.page)
    }

    /// Lock the page for a lifecycle call
    pub async fn lock(&self) -> MutexGuard<'_, Box<dyn Page>> {
        self.page.lock().await
    }
}

impl std::fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPage;

    #[async_trait]
    impl Page for StaticPage {
        fn render(&self) -> PageResult<PageContent> {
            Ok("<p>static</p>".into())
        }
    }

    struct CountingPage {
        inits: u32,
    }

    #[async_trait]
    impl Page for CountingPage {
        fn render(&self) -> PageResult<PageContent> {
            Ok(format!("<p>{}</p>", self.inits).into())
        }

        async fn init(&mut self) -> PageResult<()> {
            self.inits += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_hooks_are_noops() {
        let mut page = StaticPage;
        assert!(page.init().await.is_ok());
        assert!(page.reinit().await.is_ok());
        assert!(page.destroy().await.is_ok());
    }

    #[tokio::test]
    async fn test_reinit_falls_back_to_init() {
        let mut page = CountingPage { inits: 0 };
        page.init().await.unwrap();
        page.reinit().await.unwrap();
        assert_eq!(page.inits, 2);
        assert_eq!(page.render().unwrap().to_markup(), "<p>2</p>");
    }

    #[test]
    fn test_closure_factory_and_handle_identity() {
        let factory = factory_fn(|| StaticPage);
        let first = PageHandle::new(factory.create().unwrap());
        let second = PageHandle::new(factory.create().unwrap());

        assert!(first.ptr_eq(&first.clone()));
        assert!(!first.ptr_eq(&second));
        assert_ne!(first.id(), second.id());
    }
}
